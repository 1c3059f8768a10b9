use derive_setters::Setters;
use ratatui::crossterm::event::KeyEvent;

use crate::cells::TextCellStyle;
use crate::records::Field;

#[derive(Debug, thiserror::Error)]
pub enum GridError {
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("invalid log file path: {0}")]
    LogPath(String),
    #[error("failed to set up logging: {0}")]
    Logging(String),
    #[error("unknown header icon \"{0}\"")]
    UnknownIcon(String),
    #[error("invalid colour \"{0}\", expected #rrggbb or #rrggbbaa")]
    InvalidColor(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Quit,
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    MovePageUp,
    MovePageDown,
    MoveBeginning,
    MoveEnd,
    MoveToFirstColumn,
    MoveToLastColumn,
    Enter,
    Exit,
    ToggleSearch,
    CopyCell,
    CopyRow,
    Paste,
    Help,
    Resize(u16, u16),
    Hover(u16, u16),
    Click(u16, u16),
    RawKey(KeyEvent),
}

/// Grid wide settings, assembled from the command line.
#[derive(Debug, Clone, Setters)]
pub struct GridConfig {
    pub event_poll_time: u64,
    pub header_height: u16,
    pub freeze_columns: usize,
    pub freeze_trailing_rows: usize,
    pub fixed_shadow_x: bool,
    pub fixed_shadow_y: bool,
    pub row_markers: bool,
    pub styled_columns: Vec<Field>,
    pub text_style: TextCellStyle,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            event_poll_time: 100,
            header_height: 2,
            freeze_columns: 2,
            freeze_trailing_rows: 2,
            fixed_shadow_x: false,
            fixed_shadow_y: true,
            row_markers: true,
            styled_columns: Vec::new(),
            text_style: TextCellStyle::default(),
        }
    }
}

pub const HELP_TEXT: &str = "\
Navigation
  ←↓↑→ / hjkl     move selection
  PgUp / PgDn     page up / down
  g / G           first / last row
  Home / End      first / last column
  mouse           hover headers, click to select

Editing
  Enter           edit selected cell, Enter commits, Esc cancels
  p / Ctrl+V      paste clipboard into selected cell
  c               copy cell
  C               copy row

Search
  Ctrl+F          toggle search
  Enter / ↓       next match
  ↑               previous match
  Esc             close search

  ?               this help
  q               quit";
