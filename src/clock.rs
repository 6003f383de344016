// SPDX-License-Identifier: MIT
//
// Clock: the interactive application driven by gc-term's event loop.
//
// Layout:
//
//   ┌──────────────────────────────┐
//   │ clock face (whole viewport)  │  ← gc_face::render
//   │                              │
//   ├──────────────────────────────┤
//   │ > status or prompt           │  ← bottom row, drawn over the face
//   └──────────────────────────────┘
//
// Keys either mutate the configuration directly (toggles, selector,
// adjustments, modes) or open the `:` prompt, whose lines go through the
// same command interpreter as config scripts.

use std::time::{Duration, Instant};

use gc_face::config::{ClockConfig, DisplayMode, TimeSettings};
use gc_face::settings::{self, Outcome, on_off};
use gc_face::time::{TimeSnapshot, TimeSource, Zone};
use gc_face::toggle::{Direction, ToggleState};
use gc_term::buffer::FrameBuffer;
use gc_term::cell::{Attr, Cell};
use gc_term::color::CellColor;
use gc_term::event_loop::{Action, App};
use gc_term::input::{Event, KeyCode, KeyEvent};
use gc_term::terminal::Size;
use tracing::{debug, warn};

use crate::prompt::{CommandLine, History};

/// Smallest viewport the face is drawn in.
pub const MIN_SIZE: Size = Size { cols: 6, rows: 4 };

/// Columns the status text leaves free on the bottom row.
const STATUS_MARGIN: u16 = 5;

// ─── Status ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
struct Status {
    text: String,
    error: bool,
    shown_at: Instant,
}

// ─── Clock ───────────────────────────────────────────────────────────────────

pub struct Clock {
    config: ClockConfig,
    source: TimeSource,
    snapshot: TimeSnapshot,
    last_paint: Instant,

    /// Open while the `:` prompt is active.
    prompt: Option<CommandLine>,
    history: History,
    status: Option<Status>,

    /// The last successfully rendered face and the viewport it was drawn for.
    last_good: Option<(Size, FrameBuffer)>,
    /// Screen position of the prompt cursor, set during paint.
    cursor: Option<(u16, u16)>,
}

impl Clock {
    #[must_use]
    pub fn new(config: ClockConfig, history: History) -> Self {
        let source = TimeSource::from_settings(&config.time).unwrap_or_else(|e| {
            warn!(error = %e, "time settings rejected, using local time");
            TimeSource::new(Zone::Local, None, TimeSettings::default().datefmt)
        });
        let snapshot = source.snapshot();
        Self {
            config,
            source,
            snapshot,
            last_paint: Instant::now(),
            prompt: None,
            history,
            status: None,
            last_good: None,
            cursor: None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn config(&self) -> &ClockConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub const fn history(&self) -> &History {
        &self.history
    }

    fn set_status(&mut self, text: impl Into<String>, error: bool) {
        self.status = Some(Status {
            text: text.into(),
            error,
            shown_at: Instant::now(),
        });
    }

    // ─── Normal Keys ─────────────────────────────────────────────────────

    fn handle_key(&mut self, key: &KeyEvent) -> Action {
        if key.is_ctrl('c') {
            return Action::Quit;
        }
        let KeyCode::Char(ch) = key.code else {
            if key.code == KeyCode::Escape {
                self.status = None;
            }
            return Action::Continue;
        };

        match ch {
            'q' | 'Q' => return Action::Quit,
            ':' => {
                self.prompt = Some(CommandLine::new());
                self.history.reset();
            }
            'a' | 's' | 'd' | 'f' | 'g' => self.flip(ch),
            'h' | 'j' | 'k' | 'l' | ';' | '\'' => self.adjust(ch),
            'w' | 'e' | 'r' | 't' => self.switch_mode(ch),
            _ => {
                if let Some(state) = toggle_for_key(ch) {
                    self.config.select(state);
                    self.set_status(format!("toggle {}", state.name()), false);
                }
            }
        }
        Action::Continue
    }

    fn flip(&mut self, key: char) {
        let (name, value) = match key {
            'a' => ("hour-24", &mut self.config.face.hour_24),
            's' => ("seconds", &mut self.config.face.seconds),
            'd' => ("date", &mut self.config.face.show_date),
            'f' => ("auto-size", &mut self.config.layout.auto_size),
            _ => ("auto-ratio", &mut self.config.layout.auto_ratio),
        };
        *value = !*value;
        let text = format!("set {name} {}", on_off(*value));
        self.set_status(text, false);
    }

    fn adjust(&mut self, key: char) {
        let direction = match key {
            'h' => Direction::DecX,
            'j' => Direction::IncY,
            'k' => Direction::DecY,
            'l' => Direction::IncX,
            ';' => Direction::DecLum,
            _ => Direction::IncLum,
        };
        if let Some(text) = self.config.adjust(direction) {
            self.set_status(text, false);
        }
    }

    fn switch_mode(&mut self, key: char) {
        let mode = match key {
            'w' => DisplayMode::Date,
            'e' => DisplayMode::Digital,
            'r' => DisplayMode::Binary,
            _ => DisplayMode::Icon,
        };
        self.config.face.mode = mode;
        self.set_status(format!("mode {}", mode.name()), false);
    }

    // ─── Prompt Keys ─────────────────────────────────────────────────────

    fn handle_prompt(&mut self, key: &KeyEvent) -> Action {
        let Some(line) = self.prompt.as_mut() else {
            return Action::Continue;
        };

        match key.code {
            KeyCode::Escape => self.close_prompt(),
            KeyCode::Char('c') if key.is_ctrl('c') => self.close_prompt(),
            KeyCode::Enter => return self.submit(),
            KeyCode::Backspace => {
                if line.is_empty() {
                    self.close_prompt();
                } else {
                    line.backspace();
                }
            }
            KeyCode::Delete => {
                line.delete();
            }
            KeyCode::Left => line.move_left(),
            KeyCode::Right => line.move_right(),
            KeyCode::Home => line.move_home(),
            KeyCode::End => line.move_end(),
            KeyCode::Up => {
                if let Some(text) = self.history.older(line.input()) {
                    line.set(text);
                }
            }
            KeyCode::Down => {
                if let Some(text) = self.history.newer() {
                    line.set(text);
                }
            }
            KeyCode::Char(ch) if key.modifiers.is_empty() || ch.is_uppercase() => line.insert_char(ch),
            KeyCode::Char(_) | KeyCode::Tab => {}
        }
        Action::Continue
    }

    fn close_prompt(&mut self) {
        self.prompt = None;
        self.history.reset();
    }

    fn submit(&mut self) -> Action {
        let input = self.prompt.take().map(|mut line| line.take()).unwrap_or_default();
        self.history.push(&input);
        self.run_command(&input)
    }

    /// Execute one command line and report the outcome on the status line.
    pub fn run_command(&mut self, line: &str) -> Action {
        match settings::execute(&mut self.config, line) {
            Outcome::Nothing => self.refresh_source(),
            Outcome::Reply(text) => self.set_status(text, false),
            Outcome::Quit => return Action::Quit,
            Outcome::Failed(e) => self.set_status(format!("warning: {e}"), true),
        }
        Action::Continue
    }

    /// Pick up time setting changes.
    fn refresh_source(&mut self) {
        match TimeSource::from_settings(&self.config.time) {
            Ok(source) => {
                self.source = source;
                self.snapshot = self.source.snapshot();
            }
            Err(e) => warn!(error = %e, "time settings rejected"),
        }
    }

    // ─── Painting ────────────────────────────────────────────────────────

    fn page(&self, size: Size) -> FrameBuffer {
        let bg = self.config.ui.background.to_cell_color();
        FrameBuffer::filled(size.cols, size.rows, Cell::styled(' ', CellColor::Default, bg))
    }

    fn paint_face(&mut self, size: Size) -> FrameBuffer {
        if !size.fits(MIN_SIZE) {
            let mut frame = self.page(size);
            let bg = self.config.ui.background.to_cell_color();
            let fg = self.config.ui.error.to_cell_color();
            frame.print(0, 0, &too_small_message(size), fg, bg);
            return frame;
        }

        match gc_face::render(size, &self.snapshot, &self.config) {
            Ok(frame) => {
                self.last_good = Some((size, frame.clone()));
                frame
            }
            Err(e) => {
                debug!(error = %e, "render failed");
                let message = format!("error: {e}");
                if self.status.as_ref().is_none_or(|s| s.text != message) {
                    self.set_status(message, true);
                }
                match &self.last_good {
                    Some((drawn_for, frame)) if *drawn_for == size => frame.clone(),
                    _ => self.page(size),
                }
            }
        }
    }

    /// Draw the prompt or status message on the bottom row.
    fn paint_bottom(&mut self, frame: &mut FrameBuffer) {
        self.cursor = None;
        let (cols, rows) = (frame.width(), frame.height());
        if rows == 0 || cols == 0 {
            return;
        }
        let y = rows - 1;
        let ui = &self.config.ui;
        let bg = ui.background.to_cell_color();

        if let Some(line) = &self.prompt {
            frame.fill_row(y, 0, Cell::styled(' ', CellColor::Default, bg));
            frame.print(0, y, ">", ui.prompt.to_cell_color(), bg);
            let room = usize::from(cols.saturating_sub(3));
            let column = line.cursor_column();
            let shift = column.saturating_sub(room);
            let visible = skip_columns(line.input(), shift);
            frame.print(2, y, visible, ui.text.to_cell_color(), bg);
            let x = 2 + u16::try_from(column - shift).unwrap_or(0);
            self.cursor = Some((x.min(cols - 1), y));
        } else if let Some(status) = &self.status {
            let fg = if status.error { ui.error } else { ui.success };
            frame.fill_row(y, 0, Cell::styled(' ', CellColor::Default, bg));
            frame.print(0, y, ">", ui.prompt.to_cell_color(), bg);
            let text = truncate_columns(&status.text, usize::from(cols.saturating_sub(STATUS_MARGIN)));
            let end = frame.print(2, y, text, fg.to_cell_color(), bg);
            if status.error {
                for x in 2..end {
                    if let Some(cell) = frame.get(x, y).copied() {
                        frame.set(x, y, cell.with_attrs(Attr::BOLD));
                    }
                }
            }
        }
    }
}

// ─── App ─────────────────────────────────────────────────────────────────────

impl App for Clock {
    fn on_event(&mut self, event: &Event) -> Action {
        let Event::Key(key) = event;
        if self.prompt.is_some() {
            self.handle_prompt(key)
        } else {
            self.handle_key(key)
        }
    }

    fn on_resize(&mut self, size: Size) {
        debug!(cols = size.cols, rows = size.rows, "viewport resized");
    }

    fn on_tick(&mut self) -> bool {
        let mut dirty = false;

        let now = self.source.snapshot();
        if (now.hour, now.minute, now.second) != (self.snapshot.hour, self.snapshot.minute, self.snapshot.second)
            || now.date != self.snapshot.date
        {
            self.snapshot = now;
            dirty = true;
        }

        let lifetime = Duration::from_millis(self.config.rates.status_ms);
        if self.prompt.is_none() && self.status.as_ref().is_some_and(|s| s.shown_at.elapsed() >= lifetime) {
            self.status = None;
            dirty = true;
        }

        dirty || self.last_paint.elapsed() >= Duration::from_millis(self.config.rates.refresh_ms)
    }

    fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.config.rates.input_ms.max(1))
    }

    fn paint(&mut self, size: Size) -> FrameBuffer {
        self.last_paint = Instant::now();
        let mut frame = self.paint_face(size);
        self.paint_bottom(&mut frame);
        frame
    }

    fn cursor(&self) -> Option<(u16, u16)> {
        self.cursor
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Selector keys: `p o i u` layout groups, `x c v` / `b n m` fg / bg of
/// active, inactive and colon, `.` background, `,` date.
const fn toggle_for_key(key: char) -> Option<ToggleState> {
    Some(match key {
        'p' => ToggleState::Block,
        'o' => ToggleState::Padding,
        'i' => ToggleState::Margin,
        'u' => ToggleState::Ratio,
        'x' => ToggleState::ActiveFg,
        'c' => ToggleState::InactiveFg,
        'v' => ToggleState::ColonFg,
        'b' => ToggleState::ActiveBg,
        'n' => ToggleState::InactiveBg,
        'm' => ToggleState::ColonBg,
        '.' => ToggleState::Background,
        ',' => ToggleState::Date,
        _ => return None,
    })
}

fn too_small_message(size: Size) -> String {
    let width = size.cols < MIN_SIZE.cols;
    let height = size.rows < MIN_SIZE.rows;
    match (width, height) {
        (true, true) => format!(
            "Error: width {} (min {}) height {} (min {})",
            size.cols, MIN_SIZE.cols, size.rows, MIN_SIZE.rows
        ),
        (true, false) => format!("Error: width {} (min {})", size.cols, MIN_SIZE.cols),
        _ => format!("Error: height {} (min {})", size.rows, MIN_SIZE.rows),
    }
}

/// The longest prefix of `text` at most `columns` wide.
fn truncate_columns(text: &str, columns: usize) -> &str {
    use unicode_width::UnicodeWidthChar;
    let mut used = 0;
    for (i, ch) in text.char_indices() {
        used += ch.width().unwrap_or(0);
        if used > columns {
            return &text[..i];
        }
    }
    text
}

/// `text` without its first `columns` display columns.
fn skip_columns(text: &str, columns: usize) -> &str {
    use unicode_width::UnicodeWidthChar;
    let mut used = 0;
    for (i, ch) in text.char_indices() {
        if used >= columns {
            return &text[i..];
        }
        used += ch.width().unwrap_or(0);
    }
    ""
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use gc_term::input::Modifiers;
    use pretty_assertions::assert_eq;

    fn clock() -> Clock {
        Clock::new(ClockConfig::default(), History::new())
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, Modifiers::empty()))
    }

    fn press(c: &mut Clock, ch: char) -> Action {
        c.on_event(&key(KeyCode::Char(ch)))
    }

    fn type_line(c: &mut Clock, text: &str) -> Action {
        press(c, ':');
        for ch in text.chars() {
            press(c, ch);
        }
        c.on_event(&key(KeyCode::Enter))
    }

    fn status(c: &Clock) -> Option<&str> {
        c.status.as_ref().map(|s| s.text.as_str())
    }

    #[test]
    fn quit_keys() {
        assert_eq!(press(&mut clock(), 'q'), Action::Quit);
        assert_eq!(press(&mut clock(), 'Q'), Action::Quit);
        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), Modifiers::CTRL));
        assert_eq!(clock().on_event(&ctrl_c), Action::Quit);
    }

    #[test]
    fn flag_keys_toggle_and_report() {
        let mut c = clock();
        press(&mut c, 's');
        assert!(!c.config().face.seconds);
        assert_eq!(status(&c), Some("set seconds off"));
        press(&mut c, 'a');
        assert_eq!(status(&c), Some("set hour-24 off"));
        press(&mut c, 'g');
        assert!(c.config().layout.auto_ratio);
    }

    #[test]
    fn adjustment_keys_follow_selector() {
        let mut c = clock();
        let before = c.config().layout.block_width;
        press(&mut c, 'l');
        assert_eq!(c.config().layout.block_width, before + 1);
        assert_eq!(status(&c), Some(format!("block-x {}", before + 1).as_str()));

        press(&mut c, 'o');
        assert_eq!(c.config().toggle, ToggleState::Padding);
        assert_eq!(status(&c), Some("toggle padding"));
        press(&mut c, 'j');
        assert_eq!(c.config().layout.pad_y, 1);
    }

    #[test]
    fn selector_keys() {
        let mut c = clock();
        for (k, state) in [('x', ToggleState::ActiveFg), ('m', ToggleState::ColonBg), ('.', ToggleState::Background), (',', ToggleState::Date)] {
            press(&mut c, k);
            assert_eq!(c.config().toggle, state);
        }
    }

    #[test]
    fn mode_keys() {
        let mut c = clock();
        press(&mut c, 'r');
        assert_eq!(c.config().face.mode, DisplayMode::Binary);
        assert_eq!(status(&c), Some("mode binary"));
        press(&mut c, 'w');
        assert_eq!(c.config().face.mode, DisplayMode::Date);
    }

    #[test]
    fn escape_clears_status() {
        let mut c = clock();
        press(&mut c, 's');
        c.on_event(&key(KeyCode::Escape));
        assert_eq!(status(&c), None);
    }

    #[test]
    fn prompt_runs_commands_and_records_history() {
        let mut c = clock();
        assert_eq!(type_line(&mut c, "block 5 2"), Action::Continue);
        assert_eq!((c.config().layout.block_width, c.config().layout.block_height), (5, 2));
        assert!(c.prompt.is_none());
        assert_eq!(c.history().len(), 1);

        type_line(&mut c, "block");
        assert_eq!(status(&c), Some("block 5 2"));
    }

    #[test]
    fn prompt_reports_failures() {
        let mut c = clock();
        type_line(&mut c, "blok 1");
        assert_eq!(status(&c), Some("warning: unknown command 'blok 1'"));
        assert!(c.status.as_ref().unwrap().error);
    }

    #[test]
    fn prompt_quit_word_quits() {
        let mut c = clock();
        assert_eq!(type_line(&mut c, "quit"), Action::Quit);
    }

    #[test]
    fn prompt_history_recall() {
        let mut c = clock();
        type_line(&mut c, "mode icon");
        press(&mut c, ':');
        c.on_event(&key(KeyCode::Up));
        assert_eq!(c.prompt.as_ref().unwrap().input(), "mode icon");
        c.on_event(&key(KeyCode::Down));
        assert_eq!(c.prompt.as_ref().unwrap().input(), "");
    }

    #[test]
    fn prompt_keys_are_text_not_commands() {
        let mut c = clock();
        press(&mut c, ':');
        assert_eq!(press(&mut c, 'q'), Action::Continue);
        assert_eq!(c.prompt.as_ref().unwrap().input(), "q");
        c.on_event(&key(KeyCode::Escape));
        assert!(c.prompt.is_none());
    }

    #[test]
    fn paint_covers_viewport() {
        let mut c = clock();
        let frame = c.paint(Size { cols: 80, rows: 24 });
        assert_eq!(frame.total_cells(), 80 * 24);
        assert!(c.cursor().is_none());
    }

    #[test]
    fn paint_shows_prompt_and_cursor() {
        let mut c = clock();
        press(&mut c, ':');
        for ch in "mode".chars() {
            press(&mut c, ch);
        }
        let frame = c.paint(Size { cols: 40, rows: 12 });
        assert_eq!(frame.row_text(11).trim_end(), "> mode");
        assert_eq!(c.cursor(), Some((6, 11)));
    }

    #[test]
    fn status_text_is_truncated() {
        let mut c = clock();
        c.set_status("x".repeat(100), false);
        let frame = c.paint(Size { cols: 20, rows: 6 });
        assert_eq!(frame.row_text(5), format!("> {}   ", "x".repeat(15)));
    }

    #[test]
    fn errors_are_bold() {
        let mut c = clock();
        c.run_command("nope");
        let frame = c.paint(Size { cols: 40, rows: 8 });
        assert_eq!(frame.get(2, 7).map(|cell| cell.attrs), Some(Attr::BOLD));
        assert_eq!(frame.get(0, 7).map(|cell| cell.attrs), Some(Attr::empty()));
    }

    #[test]
    fn tiny_viewport_message() {
        let mut c = clock();
        let frame = c.paint(Size { cols: 80, rows: 3 });
        assert_eq!(frame.row_text(0).trim_end(), "Error: height 3 (min 4)");
        assert_eq!(too_small_message(Size { cols: 5, rows: 3 }), "Error: width 5 (min 6) height 3 (min 4)");
        assert_eq!(too_small_message(Size { cols: 5, rows: 9 }), "Error: width 5 (min 6)");
    }

    #[test]
    fn render_error_keeps_last_good_frame() {
        let mut c = clock();
        let size = Size { cols: 80, rows: 24 };
        c.run_command("set auto-size off");
        let good = c.paint(size);

        c.run_command("block 40 40");
        let fallback = c.paint(size);
        for y in 0..23 {
            assert_eq!(fallback.row_text(y), good.row_text(y), "row {y}");
        }
        assert!(status(&c).unwrap().starts_with("error: viewport 80x24"));
    }

    #[test]
    fn render_error_after_resize_paints_page() {
        let mut c = clock();
        c.run_command("set auto-size off");
        c.paint(Size { cols: 80, rows: 24 });
        c.run_command("block 40 40");
        let frame = c.paint(Size { cols: 60, rows: 20 });
        assert_eq!(frame.row_text(0), " ".repeat(60));
    }

    #[test]
    fn column_helpers() {
        assert_eq!(truncate_columns("abcdef", 3), "abc");
        assert_eq!(truncate_columns("日本語", 3), "日");
        assert_eq!(skip_columns("abcdef", 2), "cdef");
        assert_eq!(skip_columns("日本", 2), "本");
        assert_eq!(skip_columns("ab", 5), "");
    }
}
