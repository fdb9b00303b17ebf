//! KeyTranslator: key -> Action translation.
//!
//! Bindings:
//! * `Ctrl-Q`, `q`: quit
//! * arrows, `h` / `j` / `k` / `l`: cursor left / down / up / right
//! * `Ctrl-E` / `Ctrl-Y`: scroll down / up by the configured step
//! * `Ctrl-N`: toggle the line-number gutter
//!
//! Anything else (including modified arrows) is unbound.

use crate::{Action, MotionKind, ScrollKind};
use core_events::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy)]
pub struct KeyTranslator {
    /// Lines moved per scroll key press (>= 1).
    scroll_lines: usize,
}

impl Default for KeyTranslator {
    fn default() -> Self {
        Self::new(1)
    }
}

impl KeyTranslator {
    pub fn new(scroll_lines: usize) -> Self {
        Self {
            scroll_lines: scroll_lines.max(1),
        }
    }

    pub fn scroll_lines(&self) -> usize {
        self.scroll_lines
    }

    pub fn translate(&self, key: &KeyEvent) -> Option<Action> {
        if key.mods.contains(KeyModifiers::ALT) {
            return None;
        }
        let ctrl = key.mods.contains(KeyModifiers::CTRL);
        let action = match (key.code, ctrl) {
            (KeyCode::Char('q'), _) => Action::Quit,
            (KeyCode::Char('e'), true) => self.scroll(ScrollKind::Down),
            (KeyCode::Char('y'), true) => self.scroll(ScrollKind::Up),
            (KeyCode::Char('n'), true) => Action::ToggleLineNumbers,
            (KeyCode::Left | KeyCode::Char('h'), false) => Action::Motion(MotionKind::Left),
            (KeyCode::Right | KeyCode::Char('l'), false) => Action::Motion(MotionKind::Right),
            (KeyCode::Up | KeyCode::Char('k'), false) => Action::Motion(MotionKind::Up),
            (KeyCode::Down | KeyCode::Char('j'), false) => Action::Motion(MotionKind::Down),
            _ => return None,
        };
        Some(action)
    }

    fn scroll(&self, kind: ScrollKind) -> Action {
        Action::Scroll {
            kind,
            lines: self.scroll_lines,
        }
    }
}
