//! Terminal command list for one frame.
//!
//! The frame is assembled as an ordered list of primitive commands and only
//! then encoded into the ANSI/VT100 dialect via crossterm's `Command`
//! implementations, so the emitted escape codes stay in one place.
//!
//! Invariants:
//! * Commands preserve ordering.
//! * Positions are absolute with a (0,0) origin; caller ensures bounds.
//! * Encoding targets a `String` and performs no I/O.

use crossterm::{
    Command as _,
    cursor::{Hide, MoveTo, Show},
    terminal::{Clear, ClearType},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    HideCursor,
    ShowCursor,
    /// Clear the whole screen and home the cursor.
    ClearScreen,
    ClearLine,
    MoveTo(u16, u16),
    Print(String),
    /// Row separator (`\r\n`; raw mode disables output post-processing).
    NewLine,
}

#[derive(Debug, Default)]
pub struct Writer {
    cmds: Vec<Command>,
}

impl Writer {
    pub fn new() -> Self {
        Self { cmds: Vec::new() }
    }
    pub fn hide_cursor(&mut self) {
        self.cmds.push(Command::HideCursor);
    }
    pub fn show_cursor(&mut self) {
        self.cmds.push(Command::ShowCursor);
    }
    pub fn clear_screen(&mut self) {
        self.cmds.push(Command::ClearScreen);
    }
    pub fn clear_line(&mut self) {
        self.cmds.push(Command::ClearLine);
    }
    pub fn move_to(&mut self, x: u16, y: u16) {
        self.cmds.push(Command::MoveTo(x, y));
    }
    pub fn print<S: Into<String>>(&mut self, s: S) {
        let s: String = s.into();
        if !s.is_empty() {
            self.cmds.push(Command::Print(s));
        }
    }
    pub fn new_line(&mut self) {
        self.cmds.push(Command::NewLine);
    }

    pub fn commands(&self) -> &[Command] {
        &self.cmds
    }

    /// Append the encoded escape sequences and text to `out`.
    pub fn encode_into(&self, out: &mut String) {
        // Writing into a String cannot fail; fmt::Result is ignored.
        for c in &self.cmds {
            match c {
                Command::HideCursor => {
                    let _ = Hide.write_ansi(out);
                }
                Command::ShowCursor => {
                    let _ = Show.write_ansi(out);
                }
                Command::ClearScreen => {
                    let _ = Clear(ClearType::All).write_ansi(out);
                    let _ = MoveTo(0, 0).write_ansi(out);
                }
                Command::ClearLine => {
                    let _ = Clear(ClearType::CurrentLine).write_ansi(out);
                }
                Command::MoveTo(x, y) => {
                    let _ = MoveTo(*x, *y).write_ansi(out);
                }
                Command::Print(s) => out.push_str(s),
                Command::NewLine => out.push_str("\r\n"),
            }
        }
    }

    pub fn encode(&self) -> String {
        let mut out = String::new();
        self.encode_into(&mut out);
        out
    }
}
