/* src/config.rs */

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

use crate::Cli;

/// Resolved once per process from CLI flags; read-only afterwards.
#[derive(Debug, Clone)]
pub struct BuildConfig {
  pub entry_points: Vec<String>,
  pub public: String,
  pub watch_dirs: Vec<String>,
  pub serve: bool,
  pub port: u16,
  pub verbose: bool,
  pub nomodule: bool,
  pub minify: bool,
  pub jsx_factory: String,
  pub jsx_fragment: String,
}

impl BuildConfig {
  pub fn resolve(cli: Cli) -> Result<Self> {
    if cli.entry_points.is_empty() {
      bail!("at least one entry point is required (pass source files as positional arguments)");
    }
    // Trailing slash would double up when joining module/nomodule subdirs
    let public = cli.public.strip_suffix('/').unwrap_or(&cli.public).to_string();
    Ok(Self {
      entry_points: cli.entry_points,
      public,
      watch_dirs: cli.watch,
      serve: cli.serve,
      port: cli.port,
      verbose: cli.verbose,
      nomodule: cli.nomodule,
      minify: cli.minify,
      jsx_factory: cli.jsx_factory,
      jsx_fragment: cli.jsx_fragment,
    })
  }

  pub fn watch(&self) -> bool {
    !self.watch_dirs.is_empty()
  }

  /// ESM output: `<public>/module`
  pub fn module_out_dir(&self) -> PathBuf {
    Path::new(&self.public).join("module")
  }

  /// Legacy IIFE output: `<public>/nomodule`
  pub fn nomodule_out_dir(&self) -> PathBuf {
    Path::new(&self.public).join("nomodule")
  }
}
