//! Editor session: one buffer, one viewport, one renderer.
//!
//! `EditorSession` ties the pieces together for the single-threaded loop:
//!
//! ```text
//! render -> write frame -> read event -> translate -> dispatch -> render ...
//! ```
//!
//! The session owns no terminal state. Frames go to any `io::Write` and events
//! come from any `InputSource`, so the whole loop runs unchanged against a
//! scripted input and an in-memory sink in tests.
//!
//! Invariants after every public call:
//! * the viewport satisfies its window / cursor bounds (see `core_state`).
//! * `render` is pure with respect to the viewport: two renders with no
//!   intervening key or resize produce byte-identical frames.

use anyhow::Result;
use core_actions::{Flow, KeyTranslator, dispatch};
use core_config::clamp_scroll_lines;
use core_events::{InputEvent, KeyEvent};
use core_input::InputSource;
use core_render::{Frame, RenderMetrics, Renderer};
use core_state::{Viewport, ViewportError};
use core_text::LineBuffer;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace, warn};

/// Fatal startup failures.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("cannot read {}: {source}", path.display())]
    Source {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot read input: {0}")]
    Read(#[source] io::Error),
    #[error(transparent)]
    Viewport(#[from] ViewportError),
    #[error("terminal unavailable: {0}")]
    Terminal(String),
}

/// Startup knobs resolved from config and command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    pub line_numbers: bool,
    /// Configured scroll step. The effective step is re-clamped to the body
    /// height on open and after every resize.
    pub scroll_lines: u16,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            line_numbers: true,
            scroll_lines: 1,
        }
    }
}

#[derive(Debug)]
pub struct EditorSession {
    viewport: Viewport,
    renderer: Renderer,
    translator: KeyTranslator,
    scroll_lines: u16,
}

impl EditorSession {
    /// Load the whole of `source` and size the viewport to `rows` x `cols`.
    pub fn open<R: BufRead>(
        source: R,
        rows: usize,
        cols: usize,
        options: SessionOptions,
    ) -> Result<Self, InitError> {
        let buffer = LineBuffer::from_reader(source).map_err(InitError::Read)?;
        Self::with_buffer(buffer, rows, cols, options)
    }

    /// Open `path`, or an empty buffer when no path was given or the file does
    /// not exist yet.
    pub fn open_path(
        path: Option<&Path>,
        rows: usize,
        cols: usize,
        options: SessionOptions,
    ) -> Result<Self, InitError> {
        let Some(path) = path else {
            debug!(target: "io", "no_path_empty_buffer");
            return Self::with_buffer(LineBuffer::empty(), rows, cols, options);
        };
        match std::fs::File::open(path) {
            Ok(file) => {
                let buffer = LineBuffer::from_reader(BufReader::new(file)).map_err(|source| {
                    InitError::Source {
                        path: path.to_path_buf(),
                        source,
                    }
                })?;
                info!(target: "io", path = %path.display(), lines = buffer.line_count(), "file_loaded");
                Self::with_buffer(buffer, rows, cols, options)
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                warn!(target: "io", path = %path.display(), "file_not_found_empty_buffer");
                Self::with_buffer(LineBuffer::empty(), rows, cols, options)
            }
            Err(source) => Err(InitError::Source {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    fn with_buffer(
        buffer: LineBuffer,
        rows: usize,
        cols: usize,
        options: SessionOptions,
    ) -> Result<Self, InitError> {
        let mut viewport = Viewport::new(buffer, rows, cols)?;
        viewport.set_line_numbers(options.line_numbers);
        let translator = Self::translator_for(options.scroll_lines, &viewport);
        Ok(Self {
            viewport,
            renderer: Renderer::new(),
            translator,
            scroll_lines: options.scroll_lines,
        })
    }

    fn translator_for(scroll_lines: u16, viewport: &Viewport) -> KeyTranslator {
        let body_rows = u16::try_from(viewport.body_rows()).unwrap_or(u16::MAX);
        KeyTranslator::new(clamp_scroll_lines(scroll_lines, body_rows) as usize)
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Lines moved per scroll key at the current terminal height.
    pub fn scroll_step(&self) -> usize {
        self.translator.scroll_lines()
    }

    pub fn metrics(&self) -> RenderMetrics {
        self.renderer.metrics()
    }

    /// Translate and apply one key. Unbound keys leave state untouched.
    pub fn handle_key(&mut self, key: &KeyEvent) -> Flow {
        match self.translator.translate(key) {
            Some(action) => dispatch(&mut self.viewport, action),
            None => {
                trace!(target: "actions.dispatch", %key, "unbound_key");
                Flow::Continue
            }
        }
    }

    pub fn render(&mut self) -> Frame {
        self.renderer.render(&self.viewport)
    }

    /// Terminal size changed. Sizes below the minimum are ignored (logged)
    /// and the previous geometry is kept.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        match self.viewport.resize(rows as usize, cols as usize) {
            Ok(()) => self.translator = Self::translator_for(self.scroll_lines, &self.viewport),
            Err(err) => warn!(target: "runtime", %err, "resize_ignored"),
        }
    }

    /// Drive the loop until a quit key or until `input` is exhausted.
    pub fn run<I, W>(&mut self, input: &mut I, out: &mut W) -> Result<()>
    where
        I: InputSource,
        W: Write,
    {
        info!(target: "runtime", "session_start");
        self.write_frame(out)?;
        while let Some(event) = input.next_event()? {
            let flow = match event {
                InputEvent::Key(key) => self.handle_key(&key),
                InputEvent::Resize(cols, rows) => {
                    self.resize(cols, rows);
                    Flow::Continue
                }
            };
            if flow == Flow::Stop {
                break;
            }
            self.write_frame(out)?;
        }
        info!(target: "runtime", frames = self.renderer.metrics().frames, "session_end");
        Ok(())
    }

    fn write_frame<W: Write>(&mut self, out: &mut W) -> Result<()> {
        let frame = self.render();
        out.write_all(frame.as_bytes())?;
        out.flush()?;
        Ok(())
    }
}
