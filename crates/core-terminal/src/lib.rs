//! Terminal backend abstraction and crossterm implementation.
//!
//! The backend owns the terminal mode (raw mode, alternate screen) and the
//! output stream. Frames reach the terminal through its `io::Write` impl, so
//! the session loop can drive a backend or an in-memory sink alike. Entering
//! is idempotent, and leaving happens on drop so a panic or early return
//! still restores the shell.

use anyhow::Result;
use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode, enable_raw_mode,
    },
};
use std::io::{self, Stdout, Write, stdout};
use std::ops::{Deref, DerefMut};
use tracing::debug;

pub trait TerminalBackend {
    fn enter(&mut self) -> Result<()>;
    fn leave(&mut self) -> Result<()>;
    fn set_title(&mut self, title: &str) -> Result<()>;
    /// Current terminal size as `(cols, rows)`.
    fn size(&self) -> Result<(u16, u16)>;
}

pub struct CrosstermBackend<W: Write = Stdout> {
    out: W,
    entered: bool,
}

/// RAII guard ensuring terminal state restoration even if caller early-returns or panics.
pub struct TerminalGuard<'a, W: Write = Stdout> {
    backend: &'a mut CrosstermBackend<W>,
    active: bool,
}

impl Default for CrosstermBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CrosstermBackend {
    pub fn new() -> Self {
        Self::with_writer(stdout())
    }
}

impl<W: Write> CrosstermBackend<W> {
    pub fn with_writer(out: W) -> Self {
        Self {
            out,
            entered: false,
        }
    }

    pub fn is_entered(&self) -> bool {
        self.entered
    }

    /// Enter and return a guard that will leave on drop.
    pub fn enter_guard(&mut self) -> Result<TerminalGuard<'_, W>> {
        self.enter()?;
        Ok(TerminalGuard {
            backend: self,
            active: true,
        })
    }
}

impl<W: Write> TerminalBackend for CrosstermBackend<W> {
    fn enter(&mut self) -> Result<()> {
        if !self.entered {
            enable_raw_mode()?;
            execute!(self.out, EnterAlternateScreen, Hide)?;
            self.entered = true;
            debug!(target: "runtime", "terminal_entered");
        }
        Ok(())
    }

    fn leave(&mut self) -> Result<()> {
        if self.entered {
            execute!(self.out, LeaveAlternateScreen, Show)?;
            disable_raw_mode()?;
            self.entered = false;
            debug!(target: "runtime", "terminal_left");
        }
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        execute!(self.out, SetTitle(title))?;
        Ok(())
    }

    fn size(&self) -> Result<(u16, u16)> {
        Ok(crossterm::terminal::size()?)
    }
}

/// Frame output; bytes pass through to the underlying stream unchanged.
impl<W: Write> Write for CrosstermBackend<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.out.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

impl<W: Write> Drop for CrosstermBackend<W> {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

impl<W: Write> Deref for TerminalGuard<'_, W> {
    type Target = CrosstermBackend<W>;

    fn deref(&self) -> &Self::Target {
        &*self.backend
    }
}

impl<W: Write> DerefMut for TerminalGuard<'_, W> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.backend
    }
}

impl<W: Write> Drop for TerminalGuard<'_, W> {
    fn drop(&mut self) {
        if self.active {
            let _ = self.backend.leave();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_render::compose_frame;
    use core_state::Viewport;
    use core_text::LineBuffer;

    #[test]
    fn frames_pass_through_verbatim() {
        let vp = Viewport::new(LineBuffer::from_text("hello"), 3, 20).unwrap();
        let frame = compose_frame(&vp);
        let mut backend = CrosstermBackend::with_writer(Vec::new());
        backend.write_all(frame.as_bytes()).unwrap();
        backend.flush().unwrap();
        assert_eq!(backend.out.as_slice(), frame.as_bytes());
    }

    #[test]
    fn leave_without_enter_is_noop() {
        let mut backend = CrosstermBackend::with_writer(Vec::new());
        assert!(!backend.is_entered());
        backend.leave().unwrap();
        assert!(backend.out.is_empty());
    }

    #[test]
    fn title_is_an_osc_sequence() {
        let mut backend = CrosstermBackend::with_writer(Vec::new());
        backend.set_title("minivim").unwrap();
        let text = String::from_utf8(backend.out.clone()).unwrap();
        assert!(text.contains("minivim"));
        assert!(text.starts_with("\x1b]0;"));
    }
}
