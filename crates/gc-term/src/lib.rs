// SPDX-License-Identifier: MIT
//
// gc-term: Terminal engine for glyphclock.
//
// Direct terminal control via ANSI escape sequences and raw termios, with
// no TUI framework in between. The clock repaints its whole face on every
// tick, so the output side writes complete frames: every cell, every time,
// in a single write() with redundant SGR codes elided.
//
// Pipeline:
//
//   stdin → reader thread → Parser → App::on_event
//   App::paint → FrameBuffer → FrameWriter → stdout

pub mod ansi;
pub mod buffer;
pub mod cell;
pub mod color;
pub mod event_loop;
pub mod input;
pub mod output;
pub mod reader;
pub mod terminal;
