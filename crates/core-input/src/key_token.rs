use core_events::{InputEvent, KeyCode, KeyEvent, KeyModifiers};
use crossterm::event::{
    Event as CEvent, KeyCode as CKeyCode, KeyEvent as CKeyEvent, KeyEventKind as CKeyEventKind,
    KeyModifiers as CKeyModifiers,
};

/// Map a terminal event into an `InputEvent`.
///
/// Returns `None` for events the viewer ignores (mouse, focus, paste, key
/// releases and unsupported key codes).
pub(crate) fn map_event(event: &CEvent) -> Option<InputEvent> {
    match event {
        CEvent::Key(key) => map_key_event(key).map(InputEvent::Key),
        CEvent::Resize(cols, rows) => Some(InputEvent::Resize(*cols, *rows)),
        _ => None,
    }
}

/// Map a crossterm key event into a `KeyEvent`. Releases are dropped so a
/// single physical press dispatches once on terminals reporting both edges.
pub(crate) fn map_key_event(event: &CKeyEvent) -> Option<KeyEvent> {
    if matches!(event.kind, CKeyEventKind::Release) {
        return None;
    }
    let code = map_key_code(&event.code)?;
    Some(KeyEvent {
        code,
        mods: map_mods(event.modifiers),
    })
}

/// Convert a crossterm key code into the logical `KeyCode`. Only characters
/// and arrows reach the translator; Shift is already folded into the character.
pub(crate) fn map_key_code(code: &CKeyCode) -> Option<KeyCode> {
    let code = match code {
        CKeyCode::Char(c) => KeyCode::Char(*c),
        CKeyCode::Up => KeyCode::Up,
        CKeyCode::Down => KeyCode::Down,
        CKeyCode::Left => KeyCode::Left,
        CKeyCode::Right => KeyCode::Right,
        _ => return None,
    };
    Some(code)
}

pub(crate) fn map_mods(mods: CKeyModifiers) -> KeyModifiers {
    let mut out = KeyModifiers::empty();
    if mods.contains(CKeyModifiers::CONTROL) {
        out |= KeyModifiers::CTRL;
    }
    if mods.contains(CKeyModifiers::ALT) {
        out |= KeyModifiers::ALT;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState as CKeyEventState;

    fn key_event(code: CKeyCode, modifiers: CKeyModifiers, kind: CKeyEventKind) -> CKeyEvent {
        CKeyEvent {
            code,
            modifiers,
            kind,
            state: CKeyEventState::empty(),
        }
    }

    #[test]
    fn maps_basic_char() {
        let ev = key_event(
            CKeyCode::Char('j'),
            CKeyModifiers::NONE,
            CKeyEventKind::Press,
        );
        let key = map_key_event(&ev).expect("char should map");
        assert_eq!(key.code, KeyCode::Char('j'));
        assert!(key.mods.is_empty());
    }

    #[test]
    fn maps_arrow_keys() {
        for (c, expected) in [
            (CKeyCode::Up, KeyCode::Up),
            (CKeyCode::Down, KeyCode::Down),
            (CKeyCode::Left, KeyCode::Left),
            (CKeyCode::Right, KeyCode::Right),
        ] {
            let ev = key_event(c, CKeyModifiers::NONE, CKeyEventKind::Press);
            assert_eq!(map_key_event(&ev).map(|k| k.code), Some(expected));
        }
    }

    #[test]
    fn maps_control_modifier() {
        let ev = key_event(
            CKeyCode::Char('q'),
            CKeyModifiers::CONTROL,
            CKeyEventKind::Press,
        );
        let key = map_key_event(&ev).expect("ctrl-q should map");
        assert_eq!(key, KeyEvent::ctrl('q'));
    }

    #[test]
    fn repeat_kept_release_dropped() {
        let repeat = key_event(
            CKeyCode::Char('j'),
            CKeyModifiers::NONE,
            CKeyEventKind::Repeat,
        );
        assert!(map_key_event(&repeat).is_some());
        let release = key_event(
            CKeyCode::Char('j'),
            CKeyModifiers::NONE,
            CKeyEventKind::Release,
        );
        assert!(map_key_event(&release).is_none());
    }

    #[test]
    fn unsupported_keys_return_none() {
        let ev = key_event(
            CKeyCode::CapsLock,
            CKeyModifiers::NONE,
            CKeyEventKind::Press,
        );
        assert!(map_key_event(&ev).is_none());
        for code in [CKeyCode::Enter, CKeyCode::Tab, CKeyCode::PageDown] {
            let ev = key_event(code, CKeyModifiers::NONE, CKeyEventKind::Press);
            assert!(map_key_event(&ev).is_none());
        }
    }

    #[test]
    fn shifted_char_drops_shift() {
        let ev = key_event(
            CKeyCode::Char('Q'),
            CKeyModifiers::SHIFT,
            CKeyEventKind::Press,
        );
        assert_eq!(map_key_event(&ev), Some(KeyEvent::plain(KeyCode::Char('Q'))));
    }

    #[test]
    fn resize_and_focus_events() {
        assert_eq!(
            map_event(&CEvent::Resize(120, 40)),
            Some(InputEvent::Resize(120, 40))
        );
        assert_eq!(map_event(&CEvent::FocusGained), None);
    }
}
