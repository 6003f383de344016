// SPDX-License-Identifier: MIT
//
// Config scripts: a file of commands applied one line at a time.

use std::fmt;

use tracing::{debug, info};

use crate::config::ClockConfig;
use crate::settings::{Outcome, execute};

/// A line of a script that could not be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Where the script came from, usually its path.
    pub origin: String,
    /// 1-based line number.
    pub line: usize,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.origin, self.line, self.message)
    }
}

/// Apply every command in `source` to `cfg`.
///
/// Lines are trimmed; empty lines and `#` comments are skipped. A failing
/// line is reported and the rest of the script still runs. Read-back and
/// quit commands have no effect in a script.
pub fn apply(cfg: &mut ClockConfig, source: &str, origin: &str) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for (index, raw) in source.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match execute(cfg, line) {
            Outcome::Nothing => {}
            Outcome::Reply(_) | Outcome::Quit => {
                debug!(origin, line = index + 1, command = line, "ignored in script");
            }
            Outcome::Failed(e) => diagnostics.push(Diagnostic {
                origin: origin.to_owned(),
                line: index + 1,
                message: e.to_string(),
            }),
        }
    }

    info!(origin, errors = diagnostics.len(), "config script applied");
    diagnostics
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn applies_commands_and_skips_comments() {
        let mut cfg = ClockConfig::default();
        let source = "\
# clock setup
  block 3 2

mode icon
   # indented comment
set seconds off
";
        let diags = apply(&mut cfg, source, "config");
        assert!(diags.is_empty());
        assert_eq!((cfg.layout.block_width, cfg.layout.block_height), (3, 2));
        assert_eq!(cfg.face.mode, crate::config::DisplayMode::Icon);
        assert!(!cfg.face.seconds);
    }

    #[test]
    fn failures_carry_origin_and_line() {
        let mut cfg = ClockConfig::default();
        let source = "block 2 1\nblok 1\nratio 0 1\nmode binary\n";
        let diags = apply(&mut cfg, source, "/home/me/.glyphclock/config");
        let shown: Vec<String> = diags.iter().map(ToString::to_string).collect();
        assert_eq!(
            shown,
            vec![
                "/home/me/.glyphclock/config:2: unknown command 'blok 1'",
                "/home/me/.glyphclock/config:3: ratio must be greater than 0",
            ]
        );
        assert_eq!(cfg.face.mode, crate::config::DisplayMode::Binary);
    }

    #[test]
    fn quit_and_reads_are_ignored() {
        let mut cfg = ClockConfig::default();
        let diags = apply(&mut cfg, "q\nblock\n", "inline");
        assert!(diags.is_empty());
        assert_eq!(cfg, ClockConfig::default());
    }
}
