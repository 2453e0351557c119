use crossterm::event::Event;
use crossterm::event::KeyEventKind;

use crate::input::InputEvent;
use crate::input::KeyCode;
use crate::input::KeyEvent;
use crate::input::KeyModifiers;
use crate::input::MouseButton;
use crate::input::MouseEvent;
use crate::input::MouseEventKind;

/// Converts a crossterm event. Key releases, resizes and unsupported keys map to `None`.
pub fn input_event_from_crossterm(ev: Event) -> Option<InputEvent> {
    match ev {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            key_event_from_crossterm(key).map(InputEvent::Key)
        }
        Event::Mouse(m) => mouse_event_from_crossterm(m).map(InputEvent::Mouse),
        _ => None,
    }
}

pub fn key_event_from_crossterm(key: crossterm::event::KeyEvent) -> Option<KeyEvent> {
    use crossterm::event::KeyCode as C;

    let code = match key.code {
        C::Char(c) => KeyCode::Char(c),
        C::Up => KeyCode::Up,
        C::Down => KeyCode::Down,
        C::PageUp => KeyCode::PageUp,
        C::PageDown => KeyCode::PageDown,
        C::Home => KeyCode::Home,
        C::End => KeyCode::End,
        C::Esc => KeyCode::Esc,
        _ => return None,
    };
    Some(KeyEvent {
        code,
        modifiers: modifiers_from_crossterm(key.modifiers),
    })
}

pub fn mouse_event_from_crossterm(m: crossterm::event::MouseEvent) -> Option<MouseEvent> {
    use crossterm::event::MouseEventKind as K;

    let kind = match m.kind {
        K::Down(b) => MouseEventKind::Down(button(b)),
        K::Drag(b) => MouseEventKind::Drag(button(b)),
        K::Up(b) => MouseEventKind::Up(button(b)),
        K::ScrollUp => MouseEventKind::ScrollUp,
        K::ScrollDown => MouseEventKind::ScrollDown,
        _ => return None,
    };
    Some(MouseEvent {
        x: m.column,
        y: m.row,
        kind,
    })
}

fn modifiers_from_crossterm(m: crossterm::event::KeyModifiers) -> KeyModifiers {
    use crossterm::event::KeyModifiers as M;

    KeyModifiers {
        shift: m.contains(M::SHIFT),
        ctrl: m.contains(M::CONTROL),
        alt: m.contains(M::ALT),
    }
}

fn button(b: crossterm::event::MouseButton) -> MouseButton {
    match b {
        crossterm::event::MouseButton::Left => MouseButton::Left,
        crossterm::event::MouseButton::Right => MouseButton::Right,
        crossterm::event::MouseButton::Middle => MouseButton::Middle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_keys_and_wheel() {
        let ev = Event::Key(crossterm::event::KeyEvent::new(
            crossterm::event::KeyCode::Char(']'),
            crossterm::event::KeyModifiers::NONE,
        ));
        assert_eq!(
            input_event_from_crossterm(ev),
            Some(InputEvent::Key(KeyEvent::char(']')))
        );

        let wheel = Event::Mouse(crossterm::event::MouseEvent {
            kind: crossterm::event::MouseEventKind::ScrollDown,
            column: 3,
            row: 4,
            modifiers: crossterm::event::KeyModifiers::NONE,
        });
        assert_eq!(
            input_event_from_crossterm(wheel),
            Some(InputEvent::Mouse(MouseEvent {
                x: 3,
                y: 4,
                kind: MouseEventKind::ScrollDown,
            }))
        );
        assert_eq!(input_event_from_crossterm(Event::Resize(10, 10)), None);
    }
}
