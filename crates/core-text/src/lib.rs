//! Read-only line buffer backed by an arena of `Line`s.
//!
//! Lines are stored contiguously in a `Vec` and addressed by `LineId`
//! handles. Each line carries optional `prev` / `next` handles, so local
//! traversal stays O(1) without any shared ownership between neighbours.
//!
//! Invariants (hold after `LineBuffer::from_text` / `from_reader`):
//! * `line_count() > 0` => `first()` reaches `last()` by following `next`
//!   exactly `line_count() - 1` times, and line numbers are `1..=line_count()`
//!   in chain order.
//! * `line_count() == 0` => a single sentinel line (empty text, number 0, no
//!   neighbours) backs `first`, `last` and `current`.
//! * `current()` always names a member of the chain; there is no way to set it
//!   to a foreign handle.
//!
//! Lengths are measured in Unicode scalar values (`char`s), never bytes.

use std::borrow::Cow;
use std::io::BufRead;
use tracing::debug;

/// Stable handle to a line inside its owning `LineBuffer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineId(usize);

impl LineId {
    /// Arena slot backing this handle.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Traversal direction along the line chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// One row of the loaded source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    text: String,
    number: usize,
    prev: Option<LineId>,
    next: Option<LineId>,
}

impl Line {
    fn new(text: String, number: usize, prev: Option<LineId>) -> Self {
        Self {
            text,
            number,
            prev,
            next: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// 1-based number fixed at load time (0 for the empty-buffer sentinel).
    pub fn number(&self) -> usize {
        self.number
    }

    /// Length in Unicode scalar values.
    pub fn len(&self) -> usize {
        scalar_len(&self.text)
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn prev(&self) -> Option<LineId> {
        self.prev
    }

    pub fn next(&self) -> Option<LineId> {
        self.next
    }
}

/// Number of Unicode scalar values in `s`.
#[inline]
pub fn scalar_len(s: &str) -> usize {
    s.chars().count()
}

/// Ordered, bidirectionally traversable sequence of lines loaded once.
#[derive(Debug, Clone)]
pub struct LineBuffer {
    lines: Vec<Line>,
    first: LineId,
    last: LineId,
    current: LineId,
    count: usize,
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::empty()
    }
}

impl LineBuffer {
    /// Buffer with no content: one sentinel line keeps every query well defined.
    pub fn empty() -> Self {
        Self {
            lines: vec![Line::new(String::new(), 0, None)],
            first: LineId(0),
            last: LineId(0),
            current: LineId(0),
            count: 0,
        }
    }

    /// Build a buffer from an in-memory string, one line per line terminator
    /// (`\n` or `\r\n`; a trailing terminator does not open an extra line).
    pub fn from_text(content: &str) -> Self {
        Self::from_lines(content.lines().map(str::to_owned))
    }

    /// Build a buffer by reading `reader` to its end. Read failures are the
    /// caller's to handle; the buffer itself never fails to assemble.
    ///
    /// Bytes that are not valid UTF-8 are decoded lossily: each invalid
    /// sequence becomes one U+FFFD and so occupies one column.
    pub fn from_reader<R: BufRead>(mut reader: R) -> std::io::Result<Self> {
        let mut lines = Vec::new();
        let mut raw = Vec::new();
        let mut lossy = 0usize;
        loop {
            raw.clear();
            if reader.read_until(b'\n', &mut raw)? == 0 {
                break;
            }
            if raw.last() == Some(&b'\n') {
                raw.pop();
                if raw.last() == Some(&b'\r') {
                    raw.pop();
                }
            }
            let text = match String::from_utf8_lossy(&raw) {
                Cow::Borrowed(text) => text.to_owned(),
                Cow::Owned(text) => {
                    lossy += 1;
                    text
                }
            };
            lines.push(text);
        }
        if lossy > 0 {
            debug!(target: "text.load", lossy_lines = lossy, "invalid_utf8_replaced");
        }
        Ok(Self::from_lines(lines))
    }

    fn from_lines<I>(source: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut lines: Vec<Line> = Vec::new();
        for text in source {
            let idx = lines.len();
            let prev = idx.checked_sub(1).map(LineId);
            if let Some(prev_line) = lines.last_mut() {
                prev_line.next = Some(LineId(idx));
            }
            lines.push(Line::new(text, idx + 1, prev));
        }
        if lines.is_empty() {
            debug!(target: "text.load", line_count = 0, "buffer_loaded_empty");
            return Self::empty();
        }
        let count = lines.len();
        debug!(target: "text.load", line_count = count, "buffer_loaded");
        Self {
            lines,
            first: LineId(0),
            last: LineId(count - 1),
            current: LineId(0),
            count,
        }
    }

    /// Total number of loaded lines (0 for an empty source).
    pub fn line_count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn first(&self) -> LineId {
        self.first
    }

    pub fn last(&self) -> LineId {
        self.last
    }

    /// Line logically associated with the cursor.
    pub fn current(&self) -> LineId {
        self.current
    }

    /// Point `current` at `id`. Handles always come from this buffer, so the
    /// chain membership invariant cannot be broken from outside.
    pub fn set_current(&mut self, id: LineId) {
        debug_assert!(id.0 < self.lines.len(), "foreign line handle");
        self.current = id;
    }

    pub fn line(&self, id: LineId) -> &Line {
        &self.lines[id.0]
    }

    /// Scalar-value length of the line behind `id`.
    pub fn len(&self, id: LineId) -> usize {
        self.line(id).len()
    }

    pub fn next(&self, id: LineId) -> Option<LineId> {
        self.line(id).next
    }

    pub fn prev(&self, id: LineId) -> Option<LineId> {
        self.line(id).prev
    }

    /// Adjacent line in `direction`, or `None` past either end.
    pub fn traverse(&self, id: LineId, direction: Direction) -> Option<LineId> {
        match direction {
            Direction::Forward => self.next(id),
            Direction::Backward => self.prev(id),
        }
    }

    /// Walk forward from `start` (inclusive) along `next` links.
    pub fn iter_from(&self, start: LineId) -> LineIter<'_> {
        LineIter {
            buffer: self,
            cursor: if self.is_empty() { None } else { Some(start) },
        }
    }

    /// Walk all lines in chain order.
    pub fn iter(&self) -> LineIter<'_> {
        self.iter_from(self.first)
    }
}

/// Forward iterator over `(LineId, &Line)` pairs.
pub struct LineIter<'a> {
    buffer: &'a LineBuffer,
    cursor: Option<LineId>,
}

impl<'a> Iterator for LineIter<'a> {
    type Item = (LineId, &'a Line);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        let line = self.buffer.line(id);
        self.cursor = line.next;
        Some((id, line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_lines_in_input_order() {
        let buf = LineBuffer::from_text("alpha\nbeta\ngamma\n");
        assert_eq!(buf.line_count(), 3);
        let numbers: Vec<usize> = buf.iter().map(|(_, l)| l.number()).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(buf.line(buf.first()).text(), "alpha");
        assert_eq!(buf.line(buf.last()).text(), "gamma");
        assert_eq!(buf.current(), buf.first());
    }

    #[test]
    fn first_reaches_last_in_count_minus_one_steps() {
        let buf = LineBuffer::from_text("a\nb\nc\nd");
        let mut id = buf.first();
        let mut steps = 0;
        while let Some(n) = buf.next(id) {
            id = n;
            steps += 1;
        }
        assert_eq!(id, buf.last());
        assert_eq!(steps, buf.line_count() - 1);
        // and back again
        let mut back = 0;
        while let Some(p) = buf.prev(id) {
            id = p;
            back += 1;
        }
        assert_eq!(id, buf.first());
        assert_eq!(back, steps);
    }

    #[test]
    fn traverse_stops_at_both_ends() {
        let buf = LineBuffer::from_text("only");
        assert_eq!(buf.traverse(buf.first(), Direction::Backward), None);
        assert_eq!(buf.traverse(buf.last(), Direction::Forward), None);
    }

    #[test]
    fn empty_source_yields_sentinel() {
        let buf = LineBuffer::from_text("");
        assert!(buf.is_empty());
        assert_eq!(buf.line_count(), 0);
        assert_eq!(buf.first(), buf.last());
        assert_eq!(buf.current(), buf.first());
        let cur = buf.line(buf.current());
        assert_eq!(cur.number(), 0);
        assert_eq!(cur.len(), 0);
        assert_eq!(buf.next(buf.current()), None);
        assert_eq!(buf.prev(buf.current()), None);
        assert_eq!(buf.iter().count(), 0);
    }

    #[test]
    fn length_counts_scalar_values_not_bytes() {
        let buf = LineBuffer::from_text("héllo wörld\n日本語");
        let first = buf.first();
        let second = buf.last();
        assert_eq!(buf.len(first), 11);
        assert_eq!(buf.len(second), 3);
        assert_eq!(buf.line(second).text().len(), 9);
    }

    #[test]
    fn blank_lines_are_kept() {
        let buf = LineBuffer::from_text("ab\n\ncdef");
        assert_eq!(buf.line_count(), 3);
        let mid = buf.next(buf.first()).unwrap();
        assert!(buf.line(mid).is_empty());
        assert_eq!(buf.line(mid).number(), 2);
    }

    #[test]
    fn reader_strips_crlf() {
        let src = std::io::Cursor::new(b"one\r\ntwo\r\n".to_vec());
        let buf = LineBuffer::from_reader(src).unwrap();
        assert_eq!(buf.line_count(), 2);
        assert_eq!(buf.line(buf.first()).text(), "one");
        assert_eq!(buf.line(buf.last()).text(), "two");
    }

    #[test]
    fn reader_replaces_invalid_utf8() {
        let src = std::io::Cursor::new(b"caf\xe9\nok\n\xff\xfe".to_vec());
        let buf = LineBuffer::from_reader(src).unwrap();
        assert_eq!(buf.line_count(), 3);
        let first = buf.line(buf.first());
        assert_eq!(first.text(), "caf\u{fffd}");
        assert_eq!(first.len(), 4);
        assert_eq!(buf.line(buf.last()).len(), 2);
    }

    #[test]
    fn reader_keeps_blank_and_unterminated_lines() {
        let src = std::io::Cursor::new(b"a\n\r\n\nlast".to_vec());
        let buf = LineBuffer::from_reader(src).unwrap();
        let texts: Vec<&str> = buf.iter().map(|(_, l)| l.text()).collect();
        assert_eq!(texts, vec!["a", "", "", "last"]);
    }

    #[test]
    fn set_current_moves_pointer() {
        let mut buf = LineBuffer::from_text("x\ny");
        let last = buf.last();
        buf.set_current(last);
        assert_eq!(buf.current(), last);
        assert_eq!(buf.line(buf.current()).number(), 2);
    }

    #[test]
    fn iter_from_middle() {
        let buf = LineBuffer::from_text("1\n2\n3\n4");
        let second = buf.next(buf.first()).unwrap();
        let texts: Vec<&str> = buf.iter_from(second).map(|(_, l)| l.text()).collect();
        assert_eq!(texts, vec!["2", "3", "4"]);
    }
}
