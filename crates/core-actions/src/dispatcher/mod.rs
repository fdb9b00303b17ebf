//! Dispatcher applying `Action` to the viewport.
//!
//! * `motion` - cursor movement and window scrolling
//!
//! Dispatch never fails: every out-of-range request is absorbed by the
//! viewport's clamping, so the only signal returned is whether the session
//! should keep running.

use crate::Action;
use core_state::Viewport;

mod motion;

/// Loop control returned by `dispatch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

pub fn dispatch(viewport: &mut Viewport, action: Action) -> Flow {
    match action {
        Action::Quit => {
            tracing::debug!(target: "actions.dispatch", "quit");
            return Flow::Stop;
        }
        Action::Motion(kind) => motion::handle_motion(kind, viewport),
        Action::Scroll { kind, lines } => motion::handle_scroll(kind, lines, viewport),
        Action::ToggleLineNumbers => {
            viewport.toggle_line_numbers();
            tracing::trace!(
                target: "actions.dispatch",
                line_numbers = viewport.line_numbers(),
                "toggle_line_numbers"
            );
        }
    }
    Flow::Continue
}
