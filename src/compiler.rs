/* src/compiler.rs */

// The esbuild handle: resolve the binary once at startup, reuse it for every
// build request. Incremental rebuild speed is esbuild's contract, not ours.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tokio::process::Command;

use crate::ui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleFormat {
  Esm,
  Iife,
}

impl ModuleFormat {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Esm => "esm",
      Self::Iife => "iife",
    }
  }
}

/// One physical build: everything needed to assemble an esbuild invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
  pub entry_points: Vec<String>,
  pub out_dir: PathBuf,
  pub format: ModuleFormat,
  pub target: &'static str,
  pub minify: bool,
  pub jsx_factory: String,
  pub jsx_fragment: String,
  pub metafile: Option<PathBuf>,
}

impl BuildRequest {
  pub fn to_args(&self) -> Vec<String> {
    let mut args = self.entry_points.clone();
    args.push("--bundle".to_string());
    args.push("--platform=browser".to_string());
    args.push("--sourcemap".to_string());
    args.push(format!("--format={}", self.format.as_str()));
    args.push(format!("--target={}", self.target));
    args.push(format!("--outdir={}", self.out_dir.display()));
    // Markdown is an opaque text asset, not code to parse
    args.push("--loader:.md=text".to_string());
    args.push(format!("--jsx-factory={}", self.jsx_factory));
    args.push(format!("--jsx-fragment={}", self.jsx_fragment));
    if self.minify {
      args.push("--minify".to_string());
    }
    if let Some(meta) = &self.metafile {
      args.push(format!("--metafile={}", meta.display()));
    }
    args
  }
}

/// Boundary between the orchestrator and the bundler backend. Production
/// code talks to esbuild; tests substitute a recording fake.
#[allow(async_fn_in_trait)]
pub trait BundlerService {
  async fn build(&mut self, req: &BuildRequest) -> Result<()>;
  fn shutdown(self) -> Result<()>;
}

pub struct EsbuildService {
  bin: PathBuf,
  verbose: bool,
}

impl EsbuildService {
  /// Resolve and probe the esbuild binary. Failure here is fatal: nothing
  /// downstream can run without a working bundler.
  pub async fn start(verbose: bool) -> Result<Self> {
    let bin = resolve_binary().context(
      "esbuild binary not found -- install it with `npm install esbuild` or put it on PATH",
    )?;
    let probe = Command::new(&bin)
      .arg("--version")
      .output()
      .await
      .with_context(|| format!("failed to start esbuild at {}", bin.display()))?;
    if !probe.status.success() {
      bail!("esbuild --version exited with status {}", probe.status);
    }
    if verbose {
      let version = String::from_utf8_lossy(&probe.stdout);
      ui::detail(&format!("esbuild {} at {}", version.trim(), bin.display()));
    }
    Ok(Self { bin, verbose })
  }
}

impl BundlerService for EsbuildService {
  async fn build(&mut self, req: &BuildRequest) -> Result<()> {
    let args = req.to_args();
    if self.verbose {
      ui::detail(&format!("esbuild {}", args.join(" ")));
    }
    let output =
      Command::new(&self.bin).args(&args).output().await.context("failed to run esbuild")?;
    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      let stdout = String::from_utf8_lossy(&output.stdout);
      let mut msg = format!("esbuild exited with status {}", output.status);
      if !stderr.trim().is_empty() {
        msg.push('\n');
        msg.push_str(stderr.trim_end());
      }
      if !stdout.trim().is_empty() {
        msg.push('\n');
        msg.push_str(stdout.trim_end());
      }
      bail!("{msg}");
    }
    Ok(())
  }

  fn shutdown(self) -> Result<()> {
    Ok(())
  }
}

/// Prefer the project-local install over a global one.
fn resolve_binary() -> Option<PathBuf> {
  let local = Path::new("node_modules/.bin/esbuild");
  if local.exists() {
    return Some(local.to_path_buf());
  }
  let paths = std::env::var_os("PATH")?;
  std::env::split_paths(&paths).map(|dir| dir.join("esbuild")).find(|p| p.is_file())
}
