//! Motion sub-dispatch (cursor movement and window scrolling).

use crate::{MotionKind, ScrollKind};
use core_state::Viewport;

pub(crate) fn handle_motion(kind: MotionKind, viewport: &mut Viewport) {
    let before = viewport.cursor();
    let before_line = viewport.current();
    match kind {
        MotionKind::Left => viewport.move_left(),
        MotionKind::Right => viewport.move_right(),
        MotionKind::Up => viewport.move_up(),
        MotionKind::Down => viewport.move_down(),
    }
    let after = viewport.cursor();
    if before != after || before_line != viewport.current() {
        tracing::trace!(target: "actions.dispatch", motion=?kind, row=before.row, col=before.col, to_row=after.row, to_col=after.col, "motion");
    }
}

pub(crate) fn handle_scroll(kind: ScrollKind, lines: usize, viewport: &mut Viewport) {
    let scrolled = match kind {
        ScrollKind::Up => viewport.scroll_up(lines),
        ScrollKind::Down => viewport.scroll_down(lines),
    };
    tracing::trace!(target: "actions.dispatch", scroll=?kind, requested = lines, scrolled, "scroll");
}
