use std::time::Duration;
use tracing::trace;

use ratatui::crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};

use crate::domain::{GridConfig, GridError, Message};
use crate::model::Model;

pub struct Controller {
    event_poll_time: u64,
}

impl Controller {
    pub fn new(cfg: &GridConfig) -> Self {
        Self {
            event_poll_time: cfg.event_poll_time,
        }
    }

    pub fn handle_event(&self, model: &Model) -> Result<Option<Message>, GridError> {
        if event::poll(Duration::from_millis(self.event_poll_time))? {
            return Ok(self.map_event(event::read()?, model.raw_keyevents()));
        }
        Ok(None)
    }

    fn map_event(&self, event: Event, raw: bool) -> Option<Message> {
        match event {
            // crossterm also emits release and repeat events on Windows
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key, raw),
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::Moved => Some(Message::Hover(mouse.column, mouse.row)),
                MouseEventKind::Down(MouseButton::Left) => {
                    Some(Message::Click(mouse.column, mouse.row))
                }
                _ => None,
            },
            Event::Resize(width, height) => Some(Message::Resize(width, height)),
            _ => None,
        }
    }

    fn handle_key(&self, key: KeyEvent, raw: bool) -> Option<Message> {
        // The search shortcut works in every mode, it never reaches an input
        if Self::is_search_shortcut(&key) {
            trace!("Mapped: {key:?} => ToggleSearch");
            return Some(Message::ToggleSearch);
        }
        if raw {
            return Some(Message::RawKey(key));
        }

        let message = match (key.code, key.modifiers) {
            (KeyCode::Char('v'), KeyModifiers::CONTROL) => Some(Message::Paste),
            (_, m) if m.contains(KeyModifiers::CONTROL) => None,
            (KeyCode::Char('q'), _) => Some(Message::Quit),
            (KeyCode::Char('j') | KeyCode::Down, _) => Some(Message::MoveDown),
            (KeyCode::Char('k') | KeyCode::Up, _) => Some(Message::MoveUp),
            (KeyCode::Char('h') | KeyCode::Left, _) => Some(Message::MoveLeft),
            (KeyCode::Char('l') | KeyCode::Right, _) => Some(Message::MoveRight),
            (KeyCode::PageDown, _) => Some(Message::MovePageDown),
            (KeyCode::PageUp, _) => Some(Message::MovePageUp),
            (KeyCode::Char('g'), _) => Some(Message::MoveBeginning),
            (KeyCode::Char('G'), _) => Some(Message::MoveEnd),
            (KeyCode::Home, _) => Some(Message::MoveToFirstColumn),
            (KeyCode::End, _) => Some(Message::MoveToLastColumn),
            (KeyCode::Enter, _) => Some(Message::Enter),
            (KeyCode::Esc, _) => Some(Message::Exit),
            (KeyCode::Char('c'), _) => Some(Message::CopyCell),
            (KeyCode::Char('C'), _) => Some(Message::CopyRow),
            (KeyCode::Char('p'), _) => Some(Message::Paste),
            (KeyCode::Char('?'), _) => Some(Message::Help),
            _ => None,
        };
        trace!("Mapped: {key:?} => {message:?}");
        message
    }

    fn is_search_shortcut(key: &KeyEvent) -> bool {
        matches!(key.code, KeyCode::Char('f') | KeyCode::Char('F'))
            && key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::SUPER | KeyModifiers::META)
    }
}
