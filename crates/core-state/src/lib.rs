//! Viewport state: the visible window onto a `LineBuffer` plus the cursor.
//!
//! The window is a contiguous run of lines `[top, bottom]` at most
//! `rows - 1` tall (the last terminal row is reserved for the status line).
//! The cursor is a `(row, col)` pair, both 1-based, where `row` is the
//! offset of the buffer's current line inside the window and `col` is a
//! scalar-value column inside that line.
//!
//! Every mutation funnels through two clamp operations, always applied in
//! the same order:
//! 1. `fix_row_bounds` pulls the row back inside the window, snapping the
//!    current line to `top` / `bottom` when it fell off an edge.
//! 2. `fix_col_bounds` clamps the column to the (possibly new) current line.
//!
//! Navigation never fails; out-of-range requests are clamped silently.

mod viewport;

pub use viewport::{CursorPos, Viewport};

/// Construction / resize failures for a `Viewport`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ViewportError {
    /// One body row plus one status row is the smallest usable terminal.
    #[error("terminal too small: {rows} rows x {cols} cols (need at least 2 x 2)")]
    TooSmall { rows: usize, cols: usize },
}

/// Number of decimal digits needed to print `n` (`digit_count(0) == 1`).
pub fn digit_count(mut n: usize) -> usize {
    let mut digits = 1;
    while n >= 10 {
        n /= 10;
        digits += 1;
    }
    digits
}
