// SPDX-License-Identifier: MIT
//
// glyphclock: a configurable terminal clock.
//
// This binary wires the two crates together:
//
//   gc-term → terminal control, input parsing, frame output, event loop
//   gc-face → glyphs, layout, colors, commands, config scripts
//
// Startup order: parse flags, install logging, apply the config script
// (printing any diagnostics on the plain terminal), load prompt history,
// then hand a `Clock` to the event loop. History is saved on the way out.

mod clock;
mod prompt;

use std::fs::{self, File};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use gc_face::config::ClockConfig;
use gc_face::script::{self, Diagnostic};
use gc_term::event_loop::EventLoop;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::clock::Clock;
use crate::prompt::History;

/// Path value that turns a file off.
const DISABLED: &str = "NONE";

/// Directory under `$HOME` holding the default config and history.
const APP_DIR: &str = ".glyphclock";

// ─── Arguments ───────────────────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(name = "glyphclock", version, about)]
struct Args {
    /// Config script to apply at startup, or NONE
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Prompt history file, or NONE
    #[arg(long, value_name = "PATH")]
    history: Option<PathBuf>,

    /// Write logs to this file (filtered by RUST_LOG, default info)
    #[arg(long, value_name = "PATH")]
    log: Option<PathBuf>,
}

/// Where a file setting points after defaults and `NONE` are resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
enum FileChoice {
    Disabled,
    /// The user named this file; it is expected to exist.
    Explicit(PathBuf),
    /// Our default location; fine if absent.
    Default(PathBuf),
}

impl FileChoice {
    fn resolve(flag: Option<PathBuf>, default_name: &str) -> Self {
        match flag {
            Some(path) if path.as_os_str() == DISABLED => Self::Disabled,
            Some(path) => Self::Explicit(path),
            None => dirs::home_dir()
                .map_or(Self::Disabled, |home| Self::Default(home.join(APP_DIR).join(default_name))),
        }
    }

    fn path(&self) -> Option<&Path> {
        match self {
            Self::Disabled => None,
            Self::Explicit(p) | Self::Default(p) => Some(p),
        }
    }
}

// ─── Logging ─────────────────────────────────────────────────────────────────

/// Install the tracing subscriber. Without a log file nothing is recorded,
/// so the alternate screen is never written to by logs.
fn init_tracing(log: Option<&Path>) -> Result<()> {
    let Some(path) = log else {
        return Ok(());
    };
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open log file '{}'", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("cannot install log subscriber")
}

// ─── Config ──────────────────────────────────────────────────────────────────

/// Apply the config script, returning user-facing error lines.
fn load_config(cfg: &mut ClockConfig, choice: &FileChoice) -> Vec<String> {
    let Some(path) = choice.path() else {
        return Vec::new();
    };
    let origin = path.display().to_string();

    match fs::read_to_string(path) {
        Ok(source) => script::apply(cfg, &source, &origin)
            .iter()
            .map(Diagnostic::to_string)
            .collect(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => match choice {
            FileChoice::Explicit(_) => vec![format!("error: the file '{origin}' does not exist")],
            _ => {
                info!(path = %origin, "no config file");
                Vec::new()
            }
        },
        Err(e) => vec![format!("error: cannot read '{origin}': {e}")],
    }
}

/// Show config errors on the normal screen and wait for ENTER.
fn report(errors: &[String]) -> Result<()> {
    let mut stderr = io::stderr().lock();
    for line in errors {
        writeln!(stderr, "{line}")?;
    }
    write!(stderr, "Press ENTER to continue")?;
    stderr.flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(())
}

// ─── Entry Point ─────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log.as_deref())?;

    let mut config = ClockConfig::default();
    let config_file = FileChoice::resolve(args.config, "config");
    let errors = load_config(&mut config, &config_file);
    if !errors.is_empty() {
        report(&errors).context("cannot report config errors")?;
    }

    let history_file = FileChoice::resolve(args.history, "history");
    let history = match history_file.path().map(History::load).transpose() {
        Ok(history) => history.unwrap_or_default(),
        Err(e) => {
            warn!(error = %e, "history not loaded");
            History::new()
        }
    };

    info!(mode = config.face.mode.name(), "starting");
    let mut clock = Clock::new(config, history);
    EventLoop::new()
        .run(&mut clock)
        .context("terminal session failed")?;

    if let Some(path) = history_file.path() {
        clock
            .history()
            .save(path)
            .with_context(|| format!("cannot save history to '{}'", path.display()))?;
    }
    info!("exiting");
    Ok(())
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("glyphclock-{}-{name}", std::process::id()));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn none_disables_files() {
        assert_eq!(
            FileChoice::resolve(Some(PathBuf::from("NONE")), "config"),
            FileChoice::Disabled
        );
        assert_eq!(
            FileChoice::resolve(Some(PathBuf::from("/tmp/c")), "config"),
            FileChoice::Explicit(PathBuf::from("/tmp/c"))
        );
    }

    #[test]
    fn default_lives_under_home() {
        if let FileChoice::Default(path) = FileChoice::resolve(None, "history") {
            assert!(path.ends_with(".glyphclock/history"));
        }
    }

    #[test]
    fn config_errors_name_file_and_line() {
        let path = temp_file("config", "block 3 1\nnope\n");
        let mut cfg = ClockConfig::default();
        let errors = load_config(&mut cfg, &FileChoice::Explicit(path.clone()));
        assert_eq!(errors, vec![format!("{}:2: unknown command 'nope'", path.display())]);
        assert_eq!(cfg.layout.block_width, 3);
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn missing_explicit_config_is_reported() {
        let path = std::env::temp_dir().join("glyphclock-missing-config");
        let mut cfg = ClockConfig::default();
        let errors = load_config(&mut cfg, &FileChoice::Explicit(path.clone()));
        assert_eq!(errors, vec![format!("error: the file '{}' does not exist", path.display())]);
        assert!(load_config(&mut cfg, &FileChoice::Default(path)).is_empty());
    }

    #[test]
    fn args_parse() {
        let args = Args::try_parse_from(["glyphclock", "--config", "NONE", "--log", "/tmp/gc.log"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("NONE")));
        assert_eq!(args.log, Some(PathBuf::from("/tmp/gc.log")));
        assert!(args.history.is_none());
    }
}
