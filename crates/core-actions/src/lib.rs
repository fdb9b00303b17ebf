//! Key translation and dispatch onto the viewport.
//!
//! Input keys are first translated into an `Action` by `KeyTranslator`, then
//! `dispatcher::dispatch` applies the action to a `Viewport`. Unbound keys
//! translate to `None` and are dropped without touching any state.

pub mod dispatcher;
pub mod key_translator;

pub use dispatcher::{Flow, dispatch};
pub use key_translator::KeyTranslator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionKind {
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollKind {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Motion(MotionKind),
    Scroll { kind: ScrollKind, lines: usize },
    ToggleLineNumbers,
}
