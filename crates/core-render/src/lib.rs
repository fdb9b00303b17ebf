//! Frame composition for the viewport.
//!
//! A frame is one opaque string of VT100 control sequences interleaved with
//! line text, emitted in this order:
//! 1. hide cursor
//! 2. clear screen + home
//! 3. each body row from `top` downward: optional zero-padded line-number
//!    gutter followed by the line text, or the `~` filler past end-of-file;
//!    rows are separated by `\r\n` (none after the last body row)
//! 4. move to the status row
//! 5. status / debug line (see `status`)
//! 6. move to `(row, col + gutter)`
//! 7. show cursor
//!
//! `compose_frame` is a pure function of viewport state: composing twice
//! without an intervening mutation yields byte-identical frames. The
//! `Renderer` wrapper only adds counters (frames rendered, last frame size)
//! which never feed back into frame content.
//!
//! There is no horizontal scrolling. Text wider than the space left after the
//! gutter is clipped by display width; the status line is clipped to the
//! terminal width. Control characters would let the terminal move the cursor
//! on its own, so each one is drawn as a single cell: a tab as a space and
//! anything else as U+FFFD. One scalar value stays one column.

pub mod status;
pub mod writer;

use core_state::Viewport;
use status::{StatusContext, build_status};
use std::borrow::Cow;
use tracing::trace;
use unicode_width::UnicodeWidthChar;
use writer::Writer;

/// Glyph drawn on body rows past the end of the buffer.
pub const FILLER: &str = "~";

/// Encoded output for one refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    text: String,
    body_bytes: usize,
}

impl Frame {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Bytes emitted before the status line (reported on the status line).
    pub fn body_bytes(&self) -> usize {
        self.body_bytes
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

/// Per-renderer diagnostics counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RenderMetrics {
    pub frames: u64,
    pub last_frame_bytes: usize,
}

#[derive(Debug, Default)]
pub struct Renderer {
    metrics: RenderMetrics,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn metrics(&self) -> RenderMetrics {
        self.metrics
    }

    pub fn render(&mut self, viewport: &Viewport) -> Frame {
        let frame = compose_frame(viewport);
        self.metrics.frames += 1;
        self.metrics.last_frame_bytes = frame.len();
        trace!(
            target: "render",
            frame = self.metrics.frames,
            bytes = frame.len(),
            body_bytes = frame.body_bytes(),
            "frame_composed"
        );
        frame
    }
}

/// Build the full frame for `viewport`.
pub fn compose_frame(viewport: &Viewport) -> Frame {
    let body_rows = viewport.body_rows();
    let gutter = viewport.gutter_width();
    let text_width = viewport.cols().saturating_sub(gutter);

    let mut w = Writer::new();
    w.hide_cursor();
    w.clear_screen();
    let mut visible = viewport.visible_lines();
    for row in 0..body_rows {
        w.clear_line();
        match visible.next() {
            Some((_, line)) => {
                if gutter > 0 {
                    let number = format!("{:0width$}", line.number(), width = gutter);
                    w.print(clip_to_width(&number, viewport.cols()));
                }
                let text = printable(line.text());
                w.print(clip_to_width(&text, text_width));
            }
            None => w.print(FILLER),
        }
        if row + 1 < body_rows {
            w.new_line();
        }
    }

    let mut text = String::new();
    w.encode_into(&mut text);
    let body_bytes = text.len();

    let buffer = viewport.buffer();
    let cursor = viewport.cursor();
    let (top, bottom) = if buffer.is_empty() {
        (0, 0)
    } else {
        (
            buffer.line(viewport.top()).number(),
            buffer.line(viewport.bottom()).number(),
        )
    };
    let status = build_status(&StatusContext {
        rows: viewport.rows(),
        cols: viewport.cols(),
        row: cursor.row,
        col: cursor.col,
        line_len: viewport.current_len(),
        line_number: viewport.current_line().number(),
        top,
        bottom,
        gutter,
        frame_bytes: body_bytes,
    });

    let mut tail = Writer::new();
    tail.move_to(0, to_u16(body_rows));
    tail.clear_line();
    tail.print(clip_to_width(&status, viewport.cols()));
    tail.move_to(to_u16(cursor.col + gutter - 1), to_u16(cursor.row - 1));
    tail.show_cursor();
    tail.encode_into(&mut text);

    Frame { text, body_bytes }
}

/// `text` with every control character replaced by a one-cell stand-in.
pub fn printable(text: &str) -> Cow<'_, str> {
    if !text.chars().any(char::is_control) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.chars()
            .map(|ch| match ch {
                '\t' => ' ',
                c if c.is_control() => char::REPLACEMENT_CHARACTER,
                c => c,
            })
            .collect(),
    )
}

/// Longest prefix of `text` whose display width fits in `max_width` cells.
pub fn clip_to_width(text: &str, max_width: usize) -> &str {
    let mut width = 0;
    for (idx, ch) in text.char_indices() {
        width += ch.width().unwrap_or(0);
        if width > max_width {
            return &text[..idx];
        }
    }
    text
}

fn to_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}
