use ratatui::crossterm::event::KeyEvent;

use crate::cells::GridCell;
use crate::inputter::{InputResult, Inputter};

pub type CommitFn = fn(original: &GridCell, value: &str) -> GridCell;

/// Inline overlay editor bound to the value of one cell.
#[derive(Debug, Clone)]
pub struct CellEditor {
    input: Inputter,
    original: GridCell,
    on_commit: CommitFn,
}

impl CellEditor {
    pub fn new(original: GridCell, on_commit: CommitFn) -> Self {
        Self {
            input: Inputter::with_value(original.value()),
            original,
            on_commit,
        }
    }

    /// The default editor for plain text cells.
    pub fn text(original: GridCell) -> Self {
        Self::new(original, |_, value| GridCell::text(value))
    }

    pub fn read(&mut self, key: KeyEvent) -> InputResult {
        self.input.read(key)
    }

    pub fn input(&self) -> InputResult {
        self.input.get()
    }

    pub fn original(&self) -> &GridCell {
        &self.original
    }

    /// The edited cell, built from the original and the current input.
    pub fn commit(&self) -> GridCell {
        (self.on_commit)(&self.original, self.input.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::{KeyCode, KeyModifiers};

    #[test]
    fn text_editor_commits_plain_text() {
        let mut editor = CellEditor::text(GridCell::text("Toddle"));
        assert_eq!(editor.input().input, "Toddle");
        editor.read(KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE));
        editor.read(KeyEvent::new(KeyCode::Char('y'), KeyModifiers::NONE));
        let result = editor.read(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        assert!(result.finished);
        assert_eq!(editor.commit(), GridCell::text("Toddly"));
        assert_eq!(editor.original(), &GridCell::text("Toddle"));
    }
}
