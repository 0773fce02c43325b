/* src/build.rs */

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Result;
use serde::Deserialize;

use crate::compiler::{BuildRequest, BundlerService, ModuleFormat};
use crate::config::BuildConfig;
use crate::ui::{self, DIM, GREEN, RED, RESET, YELLOW};

const MODULE_TARGET: &str = "es2020";
const NOMODULE_TARGET: &str = "es2015";

/// Human-readable build-speed signal; never drives control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
  Fast,
  Moderate,
  Slow,
}

impl Tier {
  pub fn classify(elapsed: Duration) -> Self {
    if elapsed < Duration::from_millis(100) {
      Self::Fast
    } else if elapsed < Duration::from_millis(500) {
      Self::Moderate
    } else {
      Self::Slow
    }
  }

  fn color(self) -> &'static str {
    match self {
      Self::Fast => GREEN,
      Self::Moderate => YELLOW,
      Self::Slow => RED,
    }
  }
}

fn format_elapsed(elapsed: Duration) -> String {
  if elapsed >= Duration::from_secs(1) {
    format!("{:.1}s", elapsed.as_secs_f64())
  } else {
    format!("{}ms", elapsed.as_millis())
  }
}

fn basename(trigger: &str) -> String {
  Path::new(trigger)
    .file_name()
    .map_or_else(|| trigger.to_string(), |name| name.to_string_lossy().to_string())
}

/// Owns the warm bundler handle for the whole process lifetime and issues
/// one logical build (ESM, plus the optional IIFE fallback) per trigger.
pub struct Orchestrator<S: BundlerService> {
  service: S,
  config: BuildConfig,
  metafile: Option<PathBuf>,
}

impl<S: BundlerService> Orchestrator<S> {
  pub fn new(service: S, config: BuildConfig) -> Self {
    // Metafile only feeds the verbose size report; keep it out of <public>
    let metafile = config
      .verbose
      .then(|| std::env::temp_dir().join(format!("lebeben-meta-{}.json", std::process::id())));
    Self { service, config, metafile }
  }

  fn primary_request(&self) -> BuildRequest {
    BuildRequest {
      entry_points: self.config.entry_points.clone(),
      out_dir: self.config.module_out_dir(),
      format: ModuleFormat::Esm,
      target: MODULE_TARGET,
      minify: self.config.minify,
      jsx_factory: self.config.jsx_factory.clone(),
      jsx_fragment: self.config.jsx_fragment.clone(),
      metafile: self.metafile.clone(),
    }
  }

  fn fallback_request(&self) -> BuildRequest {
    BuildRequest {
      out_dir: self.config.nomodule_out_dir(),
      format: ModuleFormat::Iife,
      target: NOMODULE_TARGET,
      metafile: None,
      ..self.primary_request()
    }
  }

  /// One logical build for `trigger` (a changed path, or "init"). The primary
  /// ESM build propagates its error; the IIFE fallback is best-effort.
  pub async fn build_once(&mut self, trigger: &str) -> Result<()> {
    let started = Instant::now();
    self.service.build(&self.primary_request()).await?;
    if self.config.nomodule {
      if let Err(e) = self.service.build(&self.fallback_request()).await {
        ui::fail(&format!("nomodule bundle failed: {e:#}"));
      }
    }
    let elapsed = started.elapsed();
    let color = Tier::classify(elapsed).color();
    println!("  {color}{}{RESET} {DIM}{}{RESET}", format_elapsed(elapsed), basename(trigger));
    if self.config.verbose {
      self.report_output_sizes();
    }
    Ok(())
  }

  /// Release the bundler handle; single-shot path only. Watch mode holds the
  /// handle until the process dies.
  pub fn shutdown(self) -> Result<()> {
    self.service.shutdown()
  }

  fn report_output_sizes(&self) {
    let Some(path) = &self.metafile else { return };
    let Some(outputs) = read_metafile(path) else { return };
    for (file, bytes) in outputs {
      ui::detail(&format!("{file}  {}", ui::format_size(bytes)));
    }
  }
}

#[derive(Deserialize)]
struct Metafile {
  outputs: BTreeMap<String, MetafileOutput>,
}

#[derive(Deserialize)]
struct MetafileOutput {
  bytes: u64,
}

/// Diagnostic-only path: any read or parse failure is treated as "no data".
fn read_metafile(path: &Path) -> Option<Vec<(String, u64)>> {
  let content = std::fs::read_to_string(path).ok()?;
  let meta: Metafile = serde_json::from_str(&content).ok()?;
  Some(meta.outputs.into_iter().map(|(file, out)| (file, out.bytes)).collect())
}
