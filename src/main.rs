/* src/main.rs */

mod build;
mod compiler;
mod config;
mod serve;
mod ui;
mod watch;

use anyhow::Result;
use clap::Parser;

use build::Orchestrator;
use compiler::EsbuildService;
use config::BuildConfig;
use ui::{RED, RESET};

#[derive(Parser)]
#[command(name = "lebeben", about = "Bundle, watch, and serve a browser app with esbuild")]
pub struct Cli {
  /// one or many directories to watch for changes
  #[arg(short, long, value_name = "DIR")]
  pub watch: Vec<String>,
  /// serve app locally
  #[arg(short, long)]
  pub serve: bool,
  /// the directory to serve
  #[arg(short = 'u', long, default_value = "public")]
  pub public: String,
  /// the port to serve
  #[arg(short, long, default_value_t = 5000)]
  pub port: u16,
  /// enable more detailed logs
  #[arg(short, long)]
  pub verbose: bool,
  /// generate the es2015 fallback bundle
  #[arg(short, long)]
  pub nomodule: bool,
  /// minify all output
  #[arg(short, long)]
  pub minify: bool,
  /// jsx render function to use for nodes
  #[arg(short = 'j', long = "jsxFactory", default_value = "h")]
  pub jsx_factory: String,
  /// jsx render function to use for fragments
  #[arg(long = "jsxFragment", default_value = "Fragment")]
  pub jsx_fragment: String,
  /// the path(s) to entrypoints for the app to be built
  #[arg(value_name = "ENTRY")]
  pub entry_points: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();
  let config = BuildConfig::resolve(cli)?;

  if config.serve {
    let public = config.public.clone();
    let port = config.port;
    tokio::spawn(async move {
      if let Err(e) = serve::serve(public, port).await {
        println!("  {RED}static server error: {e:#}{RESET}");
      }
    });
  }

  let service = EsbuildService::start(config.verbose).await?;
  if config.verbose {
    ui::detail("started esbuild service");
  }

  let mut orchestrator = Orchestrator::new(service, config.clone());
  orchestrator.build_once("init").await?;

  if !config.watch() {
    orchestrator.shutdown()?;
    return Ok(());
  }

  watch::run(orchestrator, &config).await
}

#[cfg(test)]
mod tests {
  use clap::{CommandFactory, Parser};

  use super::Cli;

  #[test]
  fn short_aliases() {
    let cli = Cli::try_parse_from([
      "lebeben", "-w", "src", "-s", "-u", "dist", "-p", "8080", "-v", "-n", "-m", "-j",
      "React.createElement", "app.tsx",
    ])
    .unwrap();
    assert_eq!(cli.watch, vec!["src"]);
    assert!(cli.serve);
    assert_eq!(cli.public, "dist");
    assert_eq!(cli.port, 8080);
    assert!(cli.verbose);
    assert!(cli.nomodule);
    assert!(cli.minify);
    assert_eq!(cli.jsx_factory, "React.createElement");
    assert_eq!(cli.entry_points, vec!["app.tsx"]);
  }

  #[test]
  fn camel_case_long_flags() {
    let cli = Cli::try_parse_from([
      "lebeben",
      "--jsxFactory",
      "createElement",
      "--jsxFragment",
      "Frag",
      "app.tsx",
    ])
    .unwrap();
    assert_eq!(cli.jsx_factory, "createElement");
    assert_eq!(cli.jsx_fragment, "Frag");
  }

  #[test]
  fn positionals_become_entry_points() {
    let cli = Cli::try_parse_from(["lebeben", "a.ts", "b.ts", "c.ts"]).unwrap();
    assert_eq!(cli.entry_points, vec!["a.ts", "b.ts", "c.ts"]);
  }

  #[test]
  fn help_documents_every_option() {
    let help = Cli::command().render_long_help().to_string();
    for flag in [
      "--watch",
      "--serve",
      "--public",
      "--port",
      "--verbose",
      "--nomodule",
      "--minify",
      "--jsxFactory",
      "--jsxFragment",
      "--help",
    ] {
      assert!(help.contains(flag), "help is missing {flag}");
    }
    assert!(help.contains("ENTRY"));
  }
}
