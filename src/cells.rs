use derive_setters::Setters;
use ratatui::style::Color;

/// Discriminator of the built-in cell kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridCellKind {
    Text,
    Custom,
}

/// A cell as exchanged between the store and the grid.
#[derive(Debug, Clone, PartialEq)]
pub enum GridCell {
    Text(TextCell),
    Custom(CustomCell),
}

impl GridCell {
    pub fn text(value: impl Into<String>) -> Self {
        let data = value.into();
        GridCell::Text(TextCell {
            display_data: data.clone(),
            data,
            allow_overlay: true,
            readonly: false,
        })
    }

    pub fn empty() -> Self {
        GridCell::text("")
    }

    pub fn kind(&self) -> GridCellKind {
        match self {
            GridCell::Text(_) => GridCellKind::Text,
            GridCell::Custom(_) => GridCellKind::Custom,
        }
    }

    /// The string payload regardless of kind.
    pub fn value(&self) -> &str {
        match self {
            GridCell::Text(cell) => &cell.data,
            GridCell::Custom(cell) => cell.value(),
        }
    }

    /// Custom cells are a presentation of the stored string. Convert the
    /// cell into the plain text edit the store understands.
    pub fn into_store_edit(self) -> GridCell {
        match self {
            GridCell::Text(_) => self,
            GridCell::Custom(cell) => GridCell::text(cell.value()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextCell {
    pub data: String,
    pub display_data: String,
    pub allow_overlay: bool,
    pub readonly: bool,
}

/// Payloads of custom cell kinds, each identified by a string discriminator.
#[derive(Debug, Clone, PartialEq)]
pub enum CustomCell {
    StyledText(StyledTextCell),
}

impl CustomCell {
    pub fn kind(&self) -> &'static str {
        match self {
            CustomCell::StyledText(_) => StyledTextCell::KIND,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            CustomCell::StyledText(cell) => &cell.value,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// Styling shared by all cells of a styled column.
#[derive(Debug, Clone, Default, PartialEq, Setters)]
pub struct TextCellStyle {
    pub align: Align,
    pub bold: bool,
    pub italic: bool,
    #[setters(strip_option)]
    pub color: Option<Color>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StyledTextCell {
    pub value: String,
    pub align: Align,
    pub bold: bool,
    pub italic: bool,
    pub color: Option<Color>,
}

impl StyledTextCell {
    pub const KIND: &'static str = "text-cell";

    pub fn new(value: impl Into<String>, style: &TextCellStyle) -> Self {
        Self {
            value: value.into(),
            align: style.align,
            bold: style.bold,
            italic: style.italic,
            color: style.color,
        }
    }

    /// Same styling, new value.
    pub fn with_value(&self, value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..self.clone()
        }
    }
}
