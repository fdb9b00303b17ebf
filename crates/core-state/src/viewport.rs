use crate::{ViewportError, digit_count};
use core_text::{Line, LineBuffer, LineId};
use tracing::{debug, trace};

/// 1-based cursor coordinates inside the viewport body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorPos {
    pub row: usize,
    pub col: usize,
}

/// Window + cursor over an owned `LineBuffer`.
#[derive(Debug, Clone)]
pub struct Viewport {
    buffer: LineBuffer,
    top: LineId,
    bottom: LineId,
    rows: usize,
    cols: usize,
    cursor_x: usize,
    cursor_y: usize,
    line_numbers: bool,
    /// Digit count of the total line count; fixed because the buffer is read-only.
    number_digits: usize,
}

impl Viewport {
    pub const MIN_ROWS: usize = 2;
    pub const MIN_COLS: usize = 2;

    /// Open a viewport at the top of `buffer` with the cursor on (1,1).
    pub fn new(mut buffer: LineBuffer, rows: usize, cols: usize) -> Result<Self, ViewportError> {
        check_dimensions(rows, cols)?;
        let top = buffer.first();
        buffer.set_current(top);
        let number_digits = digit_count(buffer.line_count());
        let mut vp = Self {
            buffer,
            top,
            bottom: top,
            rows,
            cols,
            cursor_x: 1,
            cursor_y: 1,
            line_numbers: true,
            number_digits,
        };
        vp.extend_bottom();
        debug!(
            target: "state.viewport",
            rows,
            cols,
            line_count = vp.buffer.line_count(),
            window = vp.window_len(),
            "viewport_created"
        );
        Ok(vp)
    }

    pub fn buffer(&self) -> &LineBuffer {
        &self.buffer
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Rows available for buffer text (everything except the status row).
    pub fn body_rows(&self) -> usize {
        self.rows - 1
    }

    pub fn top(&self) -> LineId {
        self.top
    }

    pub fn bottom(&self) -> LineId {
        self.bottom
    }

    pub fn current(&self) -> LineId {
        self.buffer.current()
    }

    pub fn current_line(&self) -> &Line {
        self.buffer.line(self.buffer.current())
    }

    /// Scalar length of the current line (0 on an empty buffer).
    pub fn current_len(&self) -> usize {
        self.buffer.len(self.buffer.current())
    }

    pub fn cursor(&self) -> CursorPos {
        CursorPos {
            row: self.cursor_y,
            col: self.cursor_x,
        }
    }

    /// Number of buffer lines shown, i.e. `min(rows - 1, line_count)`.
    pub fn window_len(&self) -> usize {
        if self.buffer.is_empty() {
            0
        } else {
            self.window_span()
        }
    }

    /// Lines from `top` to `bottom` inclusive, in buffer order.
    pub fn visible_lines(&self) -> impl Iterator<Item = (LineId, &Line)> + '_ {
        self.buffer.iter_from(self.top).take(self.window_len())
    }

    pub fn line_numbers(&self) -> bool {
        self.line_numbers
    }

    pub fn set_line_numbers(&mut self, on: bool) {
        self.line_numbers = on;
    }

    pub fn toggle_line_numbers(&mut self) {
        self.line_numbers = !self.line_numbers;
        trace!(target: "state.viewport", on = self.line_numbers, "line_numbers_toggled");
    }

    /// Columns taken by the line-number gutter (0 when hidden or nothing loaded).
    pub fn gutter_width(&self) -> usize {
        if self.line_numbers && !self.buffer.is_empty() {
            self.number_digits
        } else {
            0
        }
    }

    pub fn move_left(&mut self) {
        self.cursor_x = self.cursor_x.saturating_sub(1);
        self.fix_col_bounds();
        self.trace_cursor("move_left");
    }

    /// Advance one column, stopping one short of the line end.
    pub fn move_right(&mut self) {
        if self.cursor_x + 1 < self.current_len() {
            self.cursor_x += 1;
        }
        self.trace_cursor("move_right");
    }

    pub fn move_down(&mut self) {
        let Some(next) = self.buffer.next(self.current()) else {
            return;
        };
        if self.cursor_y == self.body_rows() {
            let steps = self.shift_window_down(1);
            self.cursor_y -= steps;
        }
        self.buffer.set_current(next);
        self.cursor_y += 1;
        self.fix_row_bounds();
        self.fix_col_bounds();
        self.trace_cursor("move_down");
    }

    pub fn move_up(&mut self) {
        let Some(prev) = self.buffer.prev(self.current()) else {
            return;
        };
        if self.cursor_y == 1 {
            let steps = self.shift_window_up(1);
            self.cursor_y += steps;
        }
        self.buffer.set_current(prev);
        self.cursor_y = self.cursor_y.saturating_sub(1);
        self.fix_row_bounds();
        self.fix_col_bounds();
        self.trace_cursor("move_up");
    }

    /// Slide the window `n` lines toward the end of the buffer, keeping the
    /// cursor on the same buffer line while it stays visible. Returns the
    /// number of lines actually scrolled.
    pub fn scroll_down(&mut self, n: usize) -> usize {
        let steps = self.shift_window_down(n);
        self.cursor_y = self.cursor_y.saturating_sub(steps);
        self.fix_row_bounds();
        self.fix_col_bounds();
        self.trace_cursor("scroll_down");
        steps
    }

    /// Slide the window `n` lines toward the start of the buffer.
    pub fn scroll_up(&mut self, n: usize) -> usize {
        let steps = self.shift_window_up(n);
        self.cursor_y += steps;
        self.fix_row_bounds();
        self.fix_col_bounds();
        self.trace_cursor("scroll_up");
        steps
    }

    /// Adopt new terminal dimensions. `top` stays put unless the window would
    /// come up short at the end of the buffer, in which case it is pulled back.
    pub fn resize(&mut self, rows: usize, cols: usize) -> Result<(), ViewportError> {
        check_dimensions(rows, cols)?;
        self.rows = rows;
        self.cols = cols;
        self.extend_bottom();
        let target = self.body_rows().min(self.buffer.line_count());
        while self.window_span() < target {
            match self.buffer.prev(self.top) {
                Some(prev) => self.top = prev,
                None => break,
            }
        }
        let top_no = self.number_of(self.top);
        let cur_no = self.number_of(self.current());
        self.cursor_y = if cur_no >= top_no {
            cur_no - top_no + 1
        } else {
            0
        };
        self.fix_row_bounds();
        self.fix_col_bounds();
        debug!(
            target: "state.viewport",
            rows,
            cols,
            window = self.window_len(),
            row = self.cursor_y,
            col = self.cursor_x,
            "viewport_resized"
        );
        Ok(())
    }

    fn number_of(&self, id: LineId) -> usize {
        self.buffer.line(id).number()
    }

    /// Lines between `top` and `bottom` inclusive; the empty-buffer sentinel
    /// counts as one so row clamping always has a valid row to land on.
    fn window_span(&self) -> usize {
        self.number_of(self.bottom) - self.number_of(self.top) + 1
    }

    /// Reset `bottom` to `top` and walk it forward to fill the body rows.
    fn extend_bottom(&mut self) {
        self.bottom = self.top;
        while self.window_span() < self.body_rows() {
            match self.buffer.next(self.bottom) {
                Some(next) => self.bottom = next,
                None => break,
            }
        }
    }

    /// Move `top` and `bottom` forward together; a step only happens when
    /// `bottom` has a successor so the window never shrinks.
    fn shift_window_down(&mut self, n: usize) -> usize {
        let mut steps = 0;
        while steps < n {
            match (self.buffer.next(self.top), self.buffer.next(self.bottom)) {
                (Some(top), Some(bottom)) => {
                    self.top = top;
                    self.bottom = bottom;
                    steps += 1;
                }
                _ => break,
            }
        }
        steps
    }

    /// Move `top` back; `bottom` follows only when the window would otherwise
    /// grow past the body rows.
    fn shift_window_up(&mut self, n: usize) -> usize {
        let mut steps = 0;
        while steps < n {
            let Some(top) = self.buffer.prev(self.top) else {
                break;
            };
            self.top = top;
            if self.window_span() > self.body_rows()
                && let Some(bottom) = self.buffer.prev(self.bottom)
            {
                self.bottom = bottom;
            }
            steps += 1;
        }
        steps
    }

    fn fix_row_bounds(&mut self) {
        let span = self.window_span();
        if self.cursor_y > span {
            self.cursor_y = span;
            self.buffer.set_current(self.bottom);
        } else if self.cursor_y < 1 {
            self.cursor_y = 1;
            self.buffer.set_current(self.top);
        }
    }

    fn fix_col_bounds(&mut self) {
        let len = self.current_len();
        self.cursor_x = if len == 0 {
            1
        } else {
            self.cursor_x.clamp(1, len)
        };
    }

    fn trace_cursor(&self, op: &'static str) {
        trace!(
            target: "state.viewport",
            op,
            row = self.cursor_y,
            col = self.cursor_x,
            line = self.current_line().number(),
            top = self.number_of(self.top),
            bottom = self.number_of(self.bottom),
            "cursor"
        );
    }
}

fn check_dimensions(rows: usize, cols: usize) -> Result<(), ViewportError> {
    if rows < Viewport::MIN_ROWS || cols < Viewport::MIN_COLS {
        return Err(ViewportError::TooSmall { rows, cols });
    }
    Ok(())
}
