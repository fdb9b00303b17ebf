//! Status / debug line composition.
//!
//! Two-stage pipeline:
//! 1. `compose_status` produces an ordered vector of `StatusSegment` items.
//! 2. `format_status` renders those segments into the final string.
//!
//! Format: `<rows>x<cols> <row>:<col> L<len> #<line> <top>-<bottom> G<gutter> <bytes>B`
//!
//! Every field is diagnostic. On an empty buffer the line number, length and
//! window bounds all read 0. Labels are single characters so the whole line
//! fits in 40 columns for files under ten thousand lines; the caller clips
//! only when the terminal is narrower than that.

use std::fmt::Write as _;

/// Values shown on the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusContext {
    pub rows: usize,
    pub cols: usize,
    /// 1-based cursor row within the viewport body.
    pub row: usize,
    /// 1-based cursor column within the current line.
    pub col: usize,
    pub line_len: usize,
    pub line_number: usize,
    pub top: usize,
    pub bottom: usize,
    pub gutter: usize,
    /// Byte size of the frame body emitted before the status line.
    pub frame_bytes: usize,
}

/// Discrete status line segments (order-sensitive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusSegment {
    Dimensions { rows: usize, cols: usize },
    Cursor { row: usize, col: usize },
    LineLength(usize),
    LineNumber(usize),
    Window { top: usize, bottom: usize },
    Gutter(usize),
    FrameBytes(usize),
}

pub fn compose_status(ctx: &StatusContext) -> Vec<StatusSegment> {
    vec![
        StatusSegment::Dimensions {
            rows: ctx.rows,
            cols: ctx.cols,
        },
        StatusSegment::Cursor {
            row: ctx.row,
            col: ctx.col,
        },
        StatusSegment::LineLength(ctx.line_len),
        StatusSegment::LineNumber(ctx.line_number),
        StatusSegment::Window {
            top: ctx.top,
            bottom: ctx.bottom,
        },
        StatusSegment::Gutter(ctx.gutter),
        StatusSegment::FrameBytes(ctx.frame_bytes),
    ]
}

pub fn format_status(segments: &[StatusSegment]) -> String {
    let mut s = String::with_capacity(64);
    for (i, seg) in segments.iter().enumerate() {
        if i > 0 {
            s.push(' ');
        }
        let _ = match seg {
            StatusSegment::Dimensions { rows, cols } => write!(s, "{rows}x{cols}"),
            StatusSegment::Cursor { row, col } => write!(s, "{row}:{col}"),
            StatusSegment::LineLength(n) => write!(s, "L{n}"),
            StatusSegment::LineNumber(n) => write!(s, "#{n}"),
            StatusSegment::Window { top, bottom } => write!(s, "{top}-{bottom}"),
            StatusSegment::Gutter(n) => write!(s, "G{n}"),
            StatusSegment::FrameBytes(n) => write!(s, "{n}B"),
        };
    }
    s
}

pub fn build_status(ctx: &StatusContext) -> String {
    format_status(&compose_status(ctx))
}
