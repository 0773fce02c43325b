/* src/watch.rs */

// Watch loop: coalesce bursts of change events into one rebuild and keep
// looping no matter how a rebuild ends.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::signal;

use crate::build::Orchestrator;
use crate::compiler::BundlerService;
use crate::config::BuildConfig;
use crate::ui::{self, DIM, GREEN, RED, RESET};

const DEBOUNCE: Duration = Duration::from_millis(300);

fn setup_watcher() -> Result<(RecommendedWatcher, tokio::sync::mpsc::Receiver<PathBuf>)> {
  let (tx, rx) = tokio::sync::mpsc::channel(64);
  let watcher = RecommendedWatcher::new(
    move |res: std::result::Result<notify::Event, notify::Error>| {
      if let Ok(event) = res {
        for path in event.paths {
          let _ = tx.blocking_send(path);
        }
      }
    },
    notify::Config::default(),
  )?;
  Ok((watcher, rx))
}

/// Runs until Ctrl+C. Rebuild failures are printed and contained; only a
/// failure to subscribe to a watch directory aborts.
pub async fn run<S: BundlerService>(
  mut orchestrator: Orchestrator<S>,
  config: &BuildConfig,
) -> Result<()> {
  let (mut watcher, mut rx) = setup_watcher()?;
  for dir in &config.watch_dirs {
    watcher
      .watch(Path::new(dir), RecursiveMode::Recursive)
      .with_context(|| format!("failed to watch {dir}"))?;
  }
  println!("  {GREEN}watching{RESET}  {DIM}{}{RESET}", config.watch_dirs.join(" "));

  loop {
    tokio::select! {
      _ = signal::ctrl_c() => {
        println!();
        println!("  {DIM}shutting down...{RESET}");
        return Ok(());
      }
      Some(path) = rx.recv() => {
        // Editors fire several events per save; wait 300ms and drain the
        // queue, keeping the newest path as the trigger label. Builds are
        // serialized: the next event is consumed only after this one ends.
        tokio::time::sleep(DEBOUNCE).await;
        let mut trigger = path;
        while let Ok(newer) = rx.try_recv() {
          trigger = newer;
        }
        let label = trigger.display().to_string();
        if let Err(e) = orchestrator.build_once(&label).await {
          println!("  {RED}failed to rebuild after {label} change{RESET}");
          if config.verbose {
            ui::detail(&format!("{e:#}"));
          }
        }
      }
    }
  }
}
