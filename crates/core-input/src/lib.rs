//! Blocking input sources feeding the single-threaded session loop.
//!
//! The loop pulls exactly one event at a time and fully processes it before
//! asking for the next, so sources are plain synchronous iterators over
//! `InputEvent`s rather than channels.

mod key_token;

use anyhow::Result;
use core_events::InputEvent;
use std::collections::VecDeque;
use tracing::trace;

/// A producer of decoded input events.
pub trait InputSource {
    /// Block until the next event is available. `Ok(None)` means the source is
    /// exhausted and the session should end.
    fn next_event(&mut self) -> Result<Option<InputEvent>>;
}

/// Reads the controlling terminal through `crossterm::event::read`.
#[derive(Debug, Default)]
pub struct CrosstermInput;

impl CrosstermInput {
    pub fn new() -> Self {
        Self
    }
}

impl InputSource for CrosstermInput {
    fn next_event(&mut self) -> Result<Option<InputEvent>> {
        loop {
            let raw = crossterm::event::read()?;
            match key_token::map_event(&raw) {
                Some(event) => {
                    trace!(target: "input", ?event, "input_event");
                    return Ok(Some(event));
                }
                None => trace!(target: "input", "input_event_ignored"),
            }
        }
    }
}

/// Replays a fixed event sequence, then reports exhaustion.
#[derive(Debug, Default, Clone)]
pub struct ScriptedInput {
    events: VecDeque<InputEvent>,
}

impl ScriptedInput {
    pub fn new<I>(events: I) -> Self
    where
        I: IntoIterator<Item = InputEvent>,
    {
        Self {
            events: events.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

impl InputSource for ScriptedInput {
    fn next_event(&mut self) -> Result<Option<InputEvent>> {
        Ok(self.events.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_events::{KeyCode, KeyEvent};

    #[test]
    fn scripted_input_replays_in_order() {
        let mut input = ScriptedInput::new([
            InputEvent::Key(KeyEvent::plain(KeyCode::Down)),
            InputEvent::Resize(80, 24),
        ]);
        assert_eq!(input.remaining(), 2);
        assert_eq!(
            input.next_event().unwrap(),
            Some(InputEvent::Key(KeyEvent::plain(KeyCode::Down)))
        );
        assert_eq!(input.next_event().unwrap(), Some(InputEvent::Resize(80, 24)));
        assert_eq!(input.next_event().unwrap(), None);
    }
}
