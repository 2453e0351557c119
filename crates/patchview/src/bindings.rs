use crate::input::KeyCode;
use crate::input::KeyEvent;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavAction {
    LineUp,
    LineDown,
    PageUp,
    PageDown,
    Top,
    Bottom,
    NextBlock,
    PreviousBlock,
}

/// Key bindings for scrolling and change-block navigation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavBindings {
    pub line_up: Vec<KeyEvent>,
    pub line_down: Vec<KeyEvent>,
    pub page_up: Vec<KeyEvent>,
    pub page_down: Vec<KeyEvent>,
    pub top: Vec<KeyEvent>,
    pub bottom: Vec<KeyEvent>,
    pub next_block: Vec<KeyEvent>,
    pub previous_block: Vec<KeyEvent>,
}

impl Default for NavBindings {
    fn default() -> Self {
        Self {
            line_up: vec![KeyEvent::new(KeyCode::Up), KeyEvent::char('k')],
            line_down: vec![KeyEvent::new(KeyCode::Down), KeyEvent::char('j')],
            page_up: vec![KeyEvent::new(KeyCode::PageUp), KeyEvent::ctrl('u')],
            page_down: vec![KeyEvent::new(KeyCode::PageDown), KeyEvent::ctrl('d')],
            top: vec![KeyEvent::new(KeyCode::Home), KeyEvent::char('g')],
            bottom: vec![KeyEvent::new(KeyCode::End), KeyEvent::char('G')],
            next_block: vec![KeyEvent::char('n'), KeyEvent::char(']')],
            previous_block: vec![KeyEvent::char('p'), KeyEvent::char('[')],
        }
    }
}

impl NavBindings {
    pub fn action_for(&self, key: &KeyEvent) -> Option<NavAction> {
        let table: [(&[KeyEvent], NavAction); 8] = [
            (&self.line_up, NavAction::LineUp),
            (&self.line_down, NavAction::LineDown),
            (&self.page_up, NavAction::PageUp),
            (&self.page_down, NavAction::PageDown),
            (&self.top, NavAction::Top),
            (&self.bottom, NavAction::Bottom),
            (&self.next_block, NavAction::NextBlock),
            (&self.previous_block, NavAction::PreviousBlock),
        ];
        table
            .into_iter()
            .find(|(keys, _)| keys.iter().any(|k| k.matches(key)))
            .map(|(_, action)| action)
    }
}
