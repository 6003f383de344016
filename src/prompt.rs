// SPDX-License-Identifier: MIT
//
// The `:` prompt: a one-line editor plus its command history.
//
// The leading `>` is drawn by the status line, not stored. History is kept
// oldest-first and saved one command per line.

use std::fs;
use std::io;
use std::path::Path;

use unicode_width::UnicodeWidthStr;

/// Most commands kept in history.
pub const HISTORY_LIMIT: usize = 1000;

// ─── CommandLine ─────────────────────────────────────────────────────────────

/// The text being typed and a cursor inside it.
#[derive(Debug, Clone, Default)]
pub struct CommandLine {
    input: String,
    /// Char offset, 0-indexed.
    cursor: usize,
}

impl CommandLine {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            input: String::new(),
            cursor: 0,
        }
    }

    #[inline]
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Display columns before the cursor.
    #[must_use]
    pub fn cursor_column(&self) -> usize {
        self.input[..self.char_to_byte(self.cursor)].width()
    }

    pub fn insert_char(&mut self, ch: char) {
        let at = self.char_to_byte(self.cursor);
        self.input.insert(at, ch);
        self.cursor += 1;
    }

    /// Delete before the cursor. Returns `false` at the start of the line.
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let at = self.char_to_byte(self.cursor);
        self.input.remove(at);
        true
    }

    /// Delete under the cursor. Returns `false` at the end of the line.
    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.input.chars().count() {
            return false;
        }
        let at = self.char_to_byte(self.cursor);
        self.input.remove(at);
        true
    }

    pub const fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.input.chars().count() {
            self.cursor += 1;
        }
    }

    pub const fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.input.chars().count();
    }

    /// Replace the text, cursor at the end.
    pub fn set(&mut self, text: &str) {
        self.input = text.to_owned();
        self.move_end();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    /// Take the text out, leaving the line empty.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.input)
    }

    fn char_to_byte(&self, char_idx: usize) -> usize {
        self.input
            .char_indices()
            .nth(char_idx)
            .map_or(self.input.len(), |(byte_idx, _)| byte_idx)
    }
}

// ─── History ─────────────────────────────────────────────────────────────────

/// Previously entered commands with an up/down browsing position.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<String>,
    /// Index into `entries` while browsing, `None` at the live line.
    position: Option<usize>,
    /// The live line, saved when browsing starts.
    draft: String,
}

impl History {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read one command per line. A missing file is an empty history.
    ///
    /// # Errors
    ///
    /// Any I/O error other than the file not existing.
    pub fn load(path: &Path) -> io::Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::new()),
            Err(e) => return Err(e),
        };
        let mut history = Self::new();
        for line in text.lines() {
            history.push(line);
        }
        Ok(history)
    }

    /// Write every entry, one per line, creating parent directories.
    ///
    /// # Errors
    ///
    /// Propagates directory creation and write failures.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let mut text = self.entries.join("\n");
        if !text.is_empty() {
            text.push('\n');
        }
        fs::write(path, text)
    }

    /// Record a command. Blank lines and repeats of the last entry are
    /// skipped. Browsing is reset.
    pub fn push(&mut self, command: &str) {
        self.position = None;
        self.draft.clear();
        if command.trim().is_empty() || self.entries.last().is_some_and(|last| last == command) {
            return;
        }
        self.entries.push(command.to_owned());
        if self.entries.len() > HISTORY_LIMIT {
            let excess = self.entries.len() - HISTORY_LIMIT;
            self.entries.drain(..excess);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Step to an older entry. `live` is the line being typed, kept so that
    /// stepping back down restores it.
    pub fn older(&mut self, live: &str) -> Option<&str> {
        let next = match self.position {
            None => {
                self.draft = live.to_owned();
                self.entries.len().checked_sub(1)?
            }
            Some(0) => 0,
            Some(i) => i - 1,
        };
        self.position = Some(next);
        self.entries.get(next).map(String::as_str)
    }

    /// Step to a newer entry, ending at the saved live line.
    pub fn newer(&mut self) -> Option<&str> {
        let i = self.position?;
        if i + 1 < self.entries.len() {
            self.position = Some(i + 1);
            self.entries.get(i + 1).map(String::as_str)
        } else {
            self.position = None;
            Some(self.draft.as_str())
        }
    }

    /// Stop browsing without recording anything.
    pub fn reset(&mut self) {
        self.position = None;
        self.draft.clear();
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
