use arboard::Clipboard;
use ratatui::crossterm::event::{KeyCode, KeyEvent};
use std::time::Instant;
use tracing::{debug, info, trace, warn};

use crate::cells::{CustomCell, GridCell, StyledTextCell};
use crate::domain::{GridConfig, HELP_TEXT, Message};
use crate::editor::CellEditor;
use crate::icons::HeaderIcon;
use crate::inputter::{InputResult, Inputter};
use crate::records::{COLUMN_FIELDS, Field};
use crate::renderers::Renderers;
use crate::store::{ContactStore, EditOutcome};
use crate::theme::Theme;
use crate::ui::STATUSLINE_HEIGHT;

#[derive(Debug, PartialEq)]
pub enum Status {
    READY,
    QUITTING,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Modus {
    TABLE,
    EDIT,
    SEARCH,
    POPUP,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Header(usize),
    Cell(usize, usize),
}

#[derive(Debug, Clone)]
pub struct GridColumn {
    pub title: &'static str,
    pub id: &'static str,
    pub icon: Option<HeaderIcon>,
    pub field: Field,
    pub width: u16,
}

/// Column definitions in display order, derived from the column mapping the
/// store reads and writes with.
pub fn grid_columns() -> Vec<GridColumn> {
    COLUMN_FIELDS
        .iter()
        .map(|&field| GridColumn {
            title: field.title(),
            id: field.id(),
            icon: Some(HeaderIcon::for_field(field)),
            field,
            width: match field {
                Field::Name => 18,
                Field::Company => 12,
                Field::Email => 28,
                Field::Phone => 16,
            },
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSlot {
    pub column: usize,
    pub x: u16,
    pub width: u16,
    pub frozen: bool,
    pub clipped: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowSlot {
    pub row: usize,
    pub y: u16,
    pub trailing: bool,
}

/// Screen positions of everything the grid draws.
#[derive(Default, Clone, Debug)]
pub struct UILayout {
    pub width: u16,
    pub height: u16,
    pub index_width: u16,
    pub header_height: u16,
    pub body_height: usize,
    pub trailing_rows: usize,
    pub frozen_columns: usize,
    pub shadow_x: Option<u16>,
    pub shadow_y: Option<u16>,
    pub columns: Vec<ColumnSlot>,
    pub rows: Vec<RowSlot>,
    pub statusline_y: u16,
}

impl UILayout {
    pub fn build(
        config: &GridConfig,
        columns: &[GridColumn],
        nrows: usize,
        offset_row: usize,
        offset_column: usize,
        width: u16,
        height: u16,
    ) -> Self {
        let table_height = height.saturating_sub(STATUSLINE_HEIGHT);
        let header_height = config.header_height.min(table_height);
        let trailing_rows = config.freeze_trailing_rows.min(nrows);
        let separator = u16::from(trailing_rows > 0 && config.fixed_shadow_y);
        let body_height =
            table_height.saturating_sub(header_height + separator + trailing_rows as u16) as usize;

        let index_width = if config.row_markers {
            (nrows.to_string().len().max(3) + 2) as u16
        } else {
            0
        };

        // Frozen columns first, then the scrolled ones from the offset on
        let frozen_columns = config.freeze_columns.min(columns.len());
        let mut slots = Vec::new();
        let mut x = index_width;
        let mut shadow_x = None;
        for (idx, column) in columns.iter().enumerate() {
            if idx == frozen_columns && frozen_columns > 0 && config.fixed_shadow_x && x < width {
                shadow_x = Some(x);
                x += 1;
            }
            if idx >= frozen_columns && idx < frozen_columns + offset_column {
                continue;
            }
            if x >= width {
                break;
            }
            let slot_width = column.width.min(width - x);
            slots.push(ColumnSlot {
                column: idx,
                x,
                width: slot_width,
                frozen: idx < frozen_columns,
                clipped: slot_width < column.width,
            });
            x += slot_width;
        }

        let scroll_rows = nrows - trailing_rows;
        let mut rows = Vec::new();
        let mut y = header_height;
        let rend = std::cmp::min(offset_row + body_height, scroll_rows);
        for row in offset_row..rend {
            rows.push(RowSlot { row, y, trailing: false });
            y += 1;
        }
        let mut y = header_height + body_height as u16;
        let shadow_y = (separator > 0 && y < table_height).then_some(y);
        y += separator;
        for row in scroll_rows..nrows {
            if y >= table_height {
                break;
            }
            rows.push(RowSlot { row, y, trailing: true });
            y += 1;
        }

        let layout = UILayout {
            width,
            height,
            index_width,
            header_height,
            body_height,
            trailing_rows,
            frozen_columns,
            shadow_x,
            shadow_y,
            columns: slots,
            rows,
            statusline_y: table_height,
        };
        trace!(
            "Build UILayout: w {}, h {}, body {}, columns {}, rows {}",
            width,
            height,
            body_height,
            layout.columns.len(),
            layout.rows.len()
        );
        layout
    }

    pub fn slot(&self, column: usize) -> Option<&ColumnSlot> {
        self.columns.iter().find(|s| s.column == column)
    }

    fn fully_visible(&self, column: usize) -> bool {
        self.slot(column).is_some_and(|s| !s.clipped)
    }

    pub fn hit_test(&self, x: u16, y: u16) -> Option<Hit> {
        let slot = self.columns.iter().find(|s| x >= s.x && x < s.x + s.width)?;
        if y < self.header_height {
            return Some(Hit::Header(slot.column));
        }
        self.rows
            .iter()
            .find(|r| r.y == y)
            .map(|r| Hit::Cell(slot.column, r.row))
    }
}

pub struct HeaderView {
    pub title: String,
    pub glyph: Option<char>,
    pub hovered: bool,
}

pub struct CellView {
    pub cell: GridCell,
    pub selected: bool,
    pub highlighted: bool,
    pub search_hit: bool,
}

pub struct RowView {
    pub marker: String,
    pub selected: bool,
    pub cells: Vec<CellView>,
}

pub struct SearchView {
    pub input: InputResult,
    pub matches: usize,
    pub current: Option<usize>,
}

pub struct EditorView {
    pub input: InputResult,
    pub column: usize,
    pub row: usize,
}

pub struct UIData {
    pub name: String,
    pub headers: Vec<HeaderView>,
    pub rows: Vec<RowView>,
    pub layout: UILayout,
    pub search: Option<SearchView>,
    pub editor: Option<EditorView>,
    pub popup_message: Option<String>,
    pub status_message: String,
}

impl UIData {
    pub fn empty() -> Self {
        UIData {
            name: String::new(),
            headers: Vec::new(),
            rows: Vec::new(),
            layout: UILayout::default(),
            search: None,
            editor: None,
            popup_message: None,
            status_message: String::new(),
        }
    }
}

#[derive(Debug, Default)]
struct GridView {
    cursor_row: usize,
    cursor_column: usize,
    offset_row: usize,
    offset_column: usize,
}

#[derive(Debug, Default)]
struct SearchState {
    input: Inputter,
    results: Vec<(usize, usize)>,
    idx: usize,
}

impl SearchState {
    fn current(&self) -> Option<(usize, usize)> {
        self.results.get(self.idx).copied()
    }
}

struct EditSession {
    column: usize,
    row: usize,
    editor: CellEditor,
}

pub struct Model {
    config: GridConfig,
    theme: Theme,
    pub status: Status,
    modus: Modus,
    previous_modus: Modus,
    store: ContactStore,
    renderers: Renderers,
    columns: Vec<GridColumn>,
    grid: GridView,
    search: SearchState,
    editor: Option<EditSession>,
    hovered: Option<Hit>,
    popup_message: Option<String>,
    ui_width: u16,
    ui_height: u16,
    uilayout: UILayout,
    uidata: UIData,
    clipboard: Option<Clipboard>,
    status_message: String,
}

impl Model {
    pub fn init(config: &GridConfig, store: ContactStore, ui_width: u16, ui_height: u16) -> Self {
        let clipboard = match Clipboard::new() {
            Ok(clipboard) => Some(clipboard),
            Err(e) => {
                warn!("Clipboard is not available: {e}");
                None
            }
        };
        Self::with_clipboard(config, store, clipboard, ui_width, ui_height)
    }

    pub(crate) fn with_clipboard(
        config: &GridConfig,
        store: ContactStore,
        clipboard: Option<Clipboard>,
        ui_width: u16,
        ui_height: u16,
    ) -> Self {
        let mut model = Self {
            config: config.clone(),
            theme: Theme::default(),
            status: Status::READY,
            modus: Modus::TABLE,
            previous_modus: Modus::TABLE,
            store,
            renderers: Renderers::default(),
            columns: grid_columns(),
            grid: GridView::default(),
            search: SearchState::default(),
            editor: None,
            hovered: None,
            popup_message: None,
            ui_width,
            ui_height,
            uilayout: UILayout::default(),
            uidata: UIData::empty(),
            clipboard,
            status_message: String::new(),
        };
        info!(
            "Grid with {} rows and {} columns",
            model.store.len(),
            model.columns.len()
        );
        model.set_status_message(format!("Generated {} contacts", model.store.len()));
        model.update_table_data();
        model
    }

    pub fn get_uidata(&self) -> &UIData {
        &self.uidata
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn renderers(&self) -> &Renderers {
        &self.renderers
    }

    pub fn ui_size(&self) -> (u16, u16) {
        (self.ui_width, self.ui_height)
    }

    /// Whether key events should be forwarded untranslated.
    pub fn raw_keyevents(&self) -> bool {
        matches!(self.modus, Modus::EDIT | Modus::SEARCH)
    }

    pub fn quit(&mut self) {
        self.status = Status::QUITTING;
    }

    pub fn update(&mut self, message: Option<Message>) {
        let Some(msg) = message else {
            return;
        };

        match msg {
            Message::Quit => return self.quit(),
            Message::Resize(width, height) => return self.ui_resize(width, height),
            Message::Hover(x, y) => return self.hover(x, y),
            Message::Click(x, y) => return self.click(x, y),
            _ => {}
        }

        match self.modus {
            Modus::TABLE => match msg {
                Message::MoveDown => self.move_table_selection_down(1),
                Message::MoveUp => self.move_table_selection_up(1),
                Message::MoveLeft => self.move_table_selection_left(),
                Message::MoveRight => self.move_table_selection_right(),
                Message::MovePageDown => {
                    self.move_table_selection_down(self.uilayout.body_height.max(1))
                }
                Message::MovePageUp => self.move_table_selection_up(self.uilayout.body_height.max(1)),
                Message::MoveBeginning => self.move_table_selection_beginning(),
                Message::MoveEnd => self.move_table_selection_end(),
                Message::MoveToFirstColumn => self.select_cell(self.grid.cursor_row, 0),
                Message::MoveToLastColumn => {
                    self.select_cell(self.grid.cursor_row, self.columns.len().saturating_sub(1))
                }
                Message::Enter => self.begin_edit(),
                Message::ToggleSearch => self.open_search(),
                Message::CopyCell => self.copy_table_cell(),
                Message::CopyRow => self.copy_table_row(),
                Message::Paste => self.paste(),
                Message::Help => self.show_help(),
                _ => (),
            },
            Modus::EDIT => match msg {
                Message::RawKey(key) => self.edit_input(key),
                Message::ToggleSearch => {
                    self.cancel_edit();
                    self.open_search();
                }
                _ => (),
            },
            Modus::SEARCH => match msg {
                Message::RawKey(key) => self.search_input(key),
                Message::ToggleSearch => self.close_search(),
                _ => (),
            },
            Modus::POPUP => match msg {
                Message::Exit | Message::Enter | Message::Help => self.exit(),
                _ => (),
            },
        }
    }

    // -------------------- View building ---------------------- //

    fn build_layout(&self) -> UILayout {
        UILayout::build(
            &self.config,
            &self.columns,
            self.store.len(),
            self.grid.offset_row,
            self.grid.offset_column,
            self.ui_width,
            self.ui_height,
        )
    }

    fn update_table_data(&mut self) {
        self.uilayout = self.build_layout();
        self.scroll_to_cursor();
        self.update_uidata_for_table();
    }

    // Move the offsets so the cursor cell is on screen
    fn scroll_to_cursor(&mut self) {
        let scroll_rows = self.store.len() - self.uilayout.trailing_rows;
        let body = self.uilayout.body_height;
        let row = self.grid.cursor_row;
        if row < scroll_rows && body > 0 {
            if row < self.grid.offset_row {
                self.grid.offset_row = row;
            } else if row >= self.grid.offset_row + body {
                self.grid.offset_row = row + 1 - body;
            }
        }

        let frozen = self.uilayout.frozen_columns;
        let column = self.grid.cursor_column;
        if column >= frozen && column - frozen < self.grid.offset_column {
            self.grid.offset_column = column - frozen;
        }
        self.uilayout = self.build_layout();

        while column >= frozen
            && self.grid.offset_column < column - frozen
            && !self.uilayout.fully_visible(column)
        {
            self.grid.offset_column += 1;
            self.uilayout = self.build_layout();
        }
    }

    fn display_cell(&self, column: usize, row: usize) -> GridCell {
        let cell = self.store.cell_content_at(column, row);
        match self.columns.get(column) {
            Some(c) if self.config.styled_columns.contains(&c.field) => GridCell::Custom(
                CustomCell::StyledText(StyledTextCell::new(cell.value(), &self.config.text_style)),
            ),
            _ => cell,
        }
    }

    fn update_uidata_for_table(&mut self) {
        let layout = &self.uilayout;
        let current_hit = self.search.current();

        let headers = layout
            .columns
            .iter()
            .map(|slot| {
                let column = &self.columns[slot.column];
                HeaderView {
                    title: column.title.to_string(),
                    glyph: column.icon.map(|i| i.glyph()),
                    hovered: self.hovered == Some(Hit::Header(slot.column)),
                }
            })
            .collect();

        let rows = layout
            .rows
            .iter()
            .map(|row_slot| {
                let row = row_slot.row;
                let cells = layout
                    .columns
                    .iter()
                    .map(|slot| {
                        let selected =
                            row == self.grid.cursor_row && slot.column == self.grid.cursor_column;
                        CellView {
                            cell: self.display_cell(slot.column, row),
                            selected,
                            highlighted: selected || current_hit == Some((row, slot.column)),
                            search_hit: self.search.results.binary_search(&(row, slot.column)).is_ok(),
                        }
                    })
                    .collect();
                RowView {
                    marker: (row + 1).to_string(),
                    selected: row == self.grid.cursor_row,
                    cells,
                }
            })
            .collect();

        let search = (self.modus == Modus::SEARCH).then(|| SearchView {
            input: self.search.input.get(),
            matches: self.search.results.len(),
            current: current_hit.map(|_| self.search.idx + 1),
        });

        let editor = self.editor.as_ref().map(|session| EditorView {
            input: session.editor.input(),
            column: session.column,
            row: session.row,
        });

        self.uidata = UIData {
            name: format!("Contacts [{}]", self.store.len()),
            headers,
            rows,
            layout: layout.clone(),
            search,
            editor,
            popup_message: self.popup_message.clone(),
            status_message: self.status_message.clone(),
        };
    }

    fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
        self.uidata.status_message = self.status_message.clone();
    }

    // -------------------- Control handling functions ---------------------- //

    fn ui_resize(&mut self, width: u16, height: u16) {
        trace!(
            "UI was resized! w:{}->{}, h:{}->{}",
            self.ui_width, width, self.ui_height, height
        );
        self.ui_width = width;
        self.ui_height = height;
        self.update_table_data();
    }

    fn hover(&mut self, x: u16, y: u16) {
        let hovered = self.uilayout.hit_test(x, y);
        if hovered != self.hovered {
            trace!("Hover {:?} -> {:?}", self.hovered, hovered);
            self.hovered = hovered;
            self.update_uidata_for_table();
        }
    }

    fn click(&mut self, x: u16, y: u16) {
        if !matches!(self.modus, Modus::TABLE | Modus::SEARCH) {
            return;
        }
        if let Some(Hit::Cell(column, row)) = self.uilayout.hit_test(x, y) {
            self.select_cell(row, column);
        }
    }

    fn exit(&mut self) {
        if self.modus == Modus::POPUP {
            trace!("Close popup ...");
            self.modus = self.previous_modus;
            self.previous_modus = Modus::POPUP;
            self.popup_message = None;
            self.update_uidata_for_table();
        }
    }

    fn show_help(&mut self) {
        self.previous_modus = self.modus;
        self.modus = Modus::POPUP;
        self.popup_message = Some(HELP_TEXT.to_string());
        self.update_uidata_for_table();
    }

    fn begin_edit(&mut self) {
        let (column, row) = (self.grid.cursor_column, self.grid.cursor_row);
        if row >= self.store.len() {
            return;
        }
        let cell = self.display_cell(column, row);
        if let GridCell::Text(text) = &cell
            && (text.readonly || !text.allow_overlay)
        {
            self.set_status_message("Cell is read only");
            return;
        }
        trace!("Editing {}:{} with {:?} cell", column, row, cell.kind());
        let editor = self.renderers.provide_editor(&cell);
        self.editor = Some(EditSession { column, row, editor });
        self.previous_modus = self.modus;
        self.modus = Modus::EDIT;
        self.update_uidata_for_table();
    }

    fn edit_input(&mut self, key: KeyEvent) {
        let Some(session) = self.editor.as_mut() else {
            self.modus = Modus::TABLE;
            return;
        };
        let result = session.editor.read(key);
        if !result.finished {
            self.update_uidata_for_table();
            return;
        }
        if result.canceled {
            self.cancel_edit();
        } else if let Some(session) = self.editor.take() {
            self.modus = Modus::TABLE;
            self.previous_modus = Modus::EDIT;
            let cell = session.editor.commit();
            if cell.value() == session.editor.original().value() {
                self.set_status_message("No changes");
                self.update_uidata_for_table();
            } else {
                self.write_cell(session.column, session.row, cell);
            }
        }
    }

    fn cancel_edit(&mut self) {
        trace!("Edit canceled");
        self.editor = None;
        self.modus = Modus::TABLE;
        self.previous_modus = Modus::EDIT;
        self.update_uidata_for_table();
    }

    fn write_cell(&mut self, column: usize, row: usize, cell: GridCell) {
        let title = self.columns.get(column).map(|c| c.title).unwrap_or("?");
        match self.store.apply_edit(column, row, &cell.into_store_edit()) {
            EditOutcome::Applied => {
                debug!("Updated {}:{}", column, row);
                self.set_status_message(format!("Updated {} of row {}", title, row + 1));
            }
            EditOutcome::IgnoredKind => self.set_status_message("Edit ignored"),
            EditOutcome::OutOfBounds => self.set_status_message("Row is out of range"),
        }
        self.update_table_data();
    }

    fn open_search(&mut self) {
        trace!("Opening search ...");
        self.previous_modus = self.modus;
        self.modus = Modus::SEARCH;
        self.search = SearchState::default();
        self.update_uidata_for_table();
    }

    fn close_search(&mut self) {
        trace!("Closing search ...");
        self.modus = Modus::TABLE;
        self.previous_modus = Modus::SEARCH;
        self.search = SearchState::default();
        self.update_uidata_for_table();
    }

    fn search_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.close_search(),
            KeyCode::Enter | KeyCode::Down => self.search_next(1),
            KeyCode::Up => self.search_next(-1),
            _ => {
                let before = self.search.input.value().to_string();
                self.search.input.read(key);
                if self.search.input.value() != before {
                    self.run_search();
                } else {
                    self.update_uidata_for_table();
                }
            }
        }
    }

    fn run_search(&mut self) {
        let term = self.search.input.value().to_string();
        let start_time = Instant::now();
        self.search.results = self.store.search(&term);
        trace!(
            "Search for \"{}\" found {} matches in {}ms",
            term,
            self.search.results.len(),
            start_time.elapsed().as_millis()
        );

        if self.search.results.is_empty() {
            self.search.idx = 0;
            if !term.is_empty() {
                self.set_status_message("Found no matches!");
            }
            self.update_uidata_for_table();
        } else {
            // Start at the first match at or after the cursor
            let cursor_row = self.grid.cursor_row;
            self.search.idx = self
                .search
                .results
                .iter()
                .position(|&(row, _)| row >= cursor_row)
                .unwrap_or(0);
            self.search_next(0);
        }
    }

    fn search_next(&mut self, step: i64) {
        let total = self.search.results.len();
        if total == 0 {
            return;
        }
        self.search.idx = (self.search.idx as i64 + step).rem_euclid(total as i64) as usize;
        let (row, column) = self.search.results[self.search.idx];
        self.set_status_message(format!("Search result {}/{}", self.search.idx + 1, total));
        self.select_cell(row, column);
    }

    fn select_cell(&mut self, row: usize, column: usize) {
        trace!("Select cell {}:{}", column, row);
        self.grid.cursor_row = row.min(self.store.len().saturating_sub(1));
        self.grid.cursor_column = column.min(self.columns.len().saturating_sub(1));
        self.update_table_data();
    }

    fn move_table_selection_beginning(&mut self) {
        self.grid.cursor_row = 0;
        self.grid.offset_row = 0;
        self.update_table_data();
    }

    fn move_table_selection_end(&mut self) {
        self.grid.cursor_row = self.store.len().saturating_sub(1);
        self.update_table_data();
    }

    fn move_table_selection_up(&mut self, size: usize) {
        self.grid.cursor_row = self.grid.cursor_row.saturating_sub(size);
        self.update_table_data();
    }

    fn move_table_selection_down(&mut self, size: usize) {
        let last = self.store.len().saturating_sub(1);
        self.grid.cursor_row = std::cmp::min(self.grid.cursor_row + size, last);
        self.update_table_data();
    }

    fn move_table_selection_left(&mut self) {
        self.grid.cursor_column = self.grid.cursor_column.saturating_sub(1);
        self.update_table_data();
    }

    fn move_table_selection_right(&mut self) {
        let last = self.columns.len().saturating_sub(1);
        self.grid.cursor_column = std::cmp::min(self.grid.cursor_column + 1, last);
        self.update_table_data();
    }

    fn copy_table_cell(&mut self) {
        let column = self.grid.cursor_column;
        let cell = self.store.cell_content_at(column, self.grid.cursor_row);
        trace!(
            "Cell content of {}: {}",
            self.columns.get(column).map(|c| c.id).unwrap_or("?"),
            cell.value()
        );
        self.set_clipboard(cell.value().to_string());
    }

    fn wrap_cell_content(c: &str) -> String {
        let needs_escaping = c.contains('"');
        let needs_wrapping = c.chars().any(|c| c == ' ' || c == '\t' || c == ',');
        let mut out = String::from(c);

        if needs_escaping {
            out = out.replace('"', "\"\"");
        }
        if needs_wrapping || needs_escaping {
            out = format!("\"{out}\"");
        }
        out
    }

    fn row_as_csv(&self, row: usize) -> Option<String> {
        let values = self.store.row_values(row)?;
        Some(
            values
                .iter()
                .map(|v| Model::wrap_cell_content(v))
                .collect::<Vec<String>>()
                .join(","),
        )
    }

    fn copy_table_row(&mut self) {
        if let Some(content) = self.row_as_csv(self.grid.cursor_row) {
            self.set_clipboard(content);
        }
    }

    fn set_clipboard(&mut self, content: String) {
        let Some(clipboard) = self.clipboard.as_mut() else {
            self.set_status_message("Clipboard is not available");
            return;
        };
        match clipboard.set_text(content) {
            Ok(_) => {
                trace!("Copied content to clipboard.");
                self.set_status_message("Copied to clipboard");
            }
            Err(e) => {
                trace!("Error copying to clipboard: {:?}", e);
                self.set_status_message("Copy failed");
            }
        }
    }

    fn paste(&mut self) {
        let Some(clipboard) = self.clipboard.as_mut() else {
            self.set_status_message("Clipboard is not available");
            return;
        };
        match clipboard.get_text() {
            Ok(text) => self.paste_value(&text),
            Err(e) => {
                trace!("Error reading clipboard: {:?}", e);
                self.set_status_message("Nothing to paste");
            }
        }
    }

    // Cells are single line, only the first line of the pasted text is used
    fn paste_value(&mut self, text: &str) {
        let (column, row) = (self.grid.cursor_column, self.grid.cursor_row);
        if row >= self.store.len() {
            return;
        }
        let line = text.lines().next().unwrap_or_default();
        let cell = self.display_cell(column, row);
        let pasted = self.renderers.on_paste(line, &cell);
        self.write_cell(column, row, pasted);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cells::{Align, TextCellStyle};
    use crate::records::RecordGenerator;
    use ratatui::crossterm::event::KeyModifiers;

    const WIDTH: u16 = 100;
    const HEIGHT: u16 = 20;

    fn model_with(config: GridConfig, rows: usize, width: u16) -> Model {
        let table = RecordGenerator::with_seed(17).generate(&["name", "email", "phone", "company"], rows);
        Model::with_clipboard(&config, ContactStore::new(table), None, width, HEIGHT)
    }

    fn shadowed() -> GridConfig {
        GridConfig::default().fixed_shadow_x(true)
    }

    fn model() -> Model {
        model_with(shadowed(), 50, WIDTH)
    }

    fn key(model: &mut Model, code: KeyCode) {
        model.update(Some(Message::RawKey(KeyEvent::new(code, KeyModifiers::NONE))));
    }

    fn type_str(model: &mut Model, s: &str) {
        for c in s.chars() {
            key(model, KeyCode::Char(c));
        }
    }

    fn selected(model: &Model) -> (usize, usize) {
        (model.grid.cursor_column, model.grid.cursor_row)
    }

    #[test]
    fn layout_positions() {
        let model = model();
        let layout = &model.uilayout;
        assert_eq!(layout.index_width, 5);
        assert_eq!(layout.body_height, 14);
        assert_eq!(layout.trailing_rows, 2);
        assert_eq!(layout.shadow_y, Some(16));
        assert_eq!(layout.shadow_x, Some(35));
        assert_eq!(layout.statusline_y, 19);

        let xs: Vec<(usize, u16)> = layout.columns.iter().map(|s| (s.column, s.x)).collect();
        assert_eq!(xs, vec![(0, 5), (1, 23), (2, 36), (3, 64)]);

        let rows: Vec<(usize, u16)> = layout.rows.iter().map(|r| (r.row, r.y)).collect();
        assert_eq!(rows.len(), 16);
        assert_eq!(rows[0], (0, 2));
        assert_eq!(rows[13], (13, 15));
        assert_eq!(rows[14], (48, 17));
        assert_eq!(rows[15], (49, 18));
    }

    #[test]
    fn no_column_separator_by_default() {
        let model = model_with(GridConfig::default(), 50, WIDTH);
        let layout = &model.uilayout;
        assert_eq!(layout.shadow_x, None);
        assert_eq!(layout.shadow_y, Some(16));
        let xs: Vec<(usize, u16)> = layout.columns.iter().map(|s| (s.column, s.x)).collect();
        assert_eq!(xs, vec![(0, 5), (1, 23), (2, 35), (3, 63)]);
    }

    #[test]
    fn headers_follow_column_mapping() {
        let model = model();
        let titles: Vec<&str> = model.uidata.headers.iter().map(|h| h.title.as_str()).collect();
        assert_eq!(titles, vec!["Name", "Company", "Email", "Phone"]);
        let first_row = &model.uidata.rows[0];
        assert_eq!(first_row.cells[1].cell, model.store.cell_content_at(1, 0));
    }

    #[test]
    fn scrolls_body_and_keeps_trailing_rows() {
        let mut model = model();
        for _ in 0..20 {
            model.update(Some(Message::MoveDown));
        }
        assert_eq!(selected(&model), (0, 20));
        assert_eq!(model.grid.offset_row, 7);
        let rows: Vec<usize> = model.uilayout.rows.iter().map(|r| r.row).collect();
        assert_eq!(rows.first(), Some(&7));
        assert!(rows.ends_with(&[20, 48, 49]));

        model.update(Some(Message::MoveEnd));
        assert_eq!(selected(&model), (0, 49));
        model.update(Some(Message::MoveBeginning));
        assert_eq!(selected(&model), (0, 0));
        assert_eq!(model.grid.offset_row, 0);
    }

    #[test]
    fn horizontal_scroll_keeps_frozen_columns() {
        let mut model = model_with(shadowed(), 50, 50);
        model.update(Some(Message::MoveToLastColumn));
        assert_eq!(selected(&model), (3, 0));
        let visible: Vec<usize> = model.uilayout.columns.iter().map(|s| s.column).collect();
        assert_eq!(visible, vec![0, 1, 3]);

        model.update(Some(Message::MoveToFirstColumn));
        model.update(Some(Message::MoveRight));
        model.update(Some(Message::MoveRight));
        let visible: Vec<usize> = model.uilayout.columns.iter().map(|s| s.column).collect();
        assert_eq!(visible, vec![0, 1, 2]);
    }

    #[test]
    fn hover_and_click() {
        let mut model = model();
        model.update(Some(Message::Hover(25, 0)));
        assert_eq!(model.hovered, Some(Hit::Header(1)));
        assert!(model.uidata.headers[1].hovered);
        assert!(!model.uidata.headers[0].hovered);

        model.update(Some(Message::Click(40, 5)));
        assert_eq!(selected(&model), (2, 3));
        model.update(Some(Message::Click(70, 18)));
        assert_eq!(selected(&model), (3, 49));
        assert!(model.uidata.rows.iter().any(|r| r.cells.iter().any(|c| c.selected && c.highlighted)));

        model.update(Some(Message::Click(1, 5)));
        assert_eq!(selected(&model), (3, 49));
    }

    #[test]
    fn edit_commits_into_store() {
        let mut model = model();
        model.update(Some(Message::MoveRight));
        model.update(Some(Message::MoveDown));
        model.update(Some(Message::Enter));
        assert!(model.raw_keyevents());
        assert!(model.uidata.editor.is_some());

        for _ in 0..20 {
            key(&mut model, KeyCode::Backspace);
        }
        type_str(&mut model, "Acme");
        key(&mut model, KeyCode::Enter);

        assert!(!model.raw_keyevents());
        assert!(model.uidata.editor.is_none());
        assert_eq!(model.store.cell_content_at(1, 1).value(), "Acme");
        assert_eq!(model.status_message, "Updated Company of row 2");
    }

    #[test]
    fn edit_cancel_keeps_value() {
        let mut model = model();
        let before = model.store.cell_content_at(0, 0);
        model.update(Some(Message::Enter));
        type_str(&mut model, "xyz");
        key(&mut model, KeyCode::Esc);
        assert_eq!(model.store.cell_content_at(0, 0), before);
        assert_eq!(model.modus, Modus::TABLE);
    }

    #[test]
    fn unchanged_edit_is_not_written() {
        let mut model = model();
        model.update(Some(Message::Enter));
        key(&mut model, KeyCode::Enter);
        assert_eq!(model.modus, Modus::TABLE);
        assert_eq!(model.status_message, "No changes");
    }

    #[test]
    fn styled_column_uses_custom_cells() {
        let config = GridConfig::default()
            .styled_columns(vec![Field::Name])
            .text_style(TextCellStyle::default().bold(true).align(Align::Center));
        let mut model = model_with(config, 10, WIDTH);
        let cell = &model.uidata.rows[0].cells[0].cell;
        let GridCell::Custom(CustomCell::StyledText(data)) = cell else {
            panic!("name column should be styled");
        };
        assert!(data.bold);
        assert_eq!(data.align, Align::Center);
        assert!(matches!(model.uidata.rows[0].cells[1].cell, GridCell::Text(_)));

        model.update(Some(Message::Enter));
        key(&mut model, KeyCode::Char('!'));
        key(&mut model, KeyCode::Enter);
        let stored = model.store.cell_content_at(0, 0);
        assert!(stored.value().ends_with('!'));
        assert!(matches!(stored, GridCell::Text(_)));
    }

    #[test]
    fn paste_into_cells() {
        let config = GridConfig::default().styled_columns(vec![Field::Company]);
        let mut model = model_with(config, 10, WIDTH);
        model.paste_value("Jane Roe\nsecond line");
        assert_eq!(model.store.cell_content_at(0, 0).value(), "Jane Roe");

        model.update(Some(Message::MoveRight));
        model.paste_value("Acme");
        assert_eq!(model.store.cell_content_at(1, 0).value(), "Acme");
    }

    #[test]
    fn search_selects_matches() {
        let mut model = model();
        model.update(Some(Message::ToggleSearch));
        assert!(model.raw_keyevents());
        assert!(model.uidata.search.is_some());

        let term = model.store.cell_content_at(3, 30).value().to_string();
        type_str(&mut model, &term);
        assert_eq!(model.search.results, vec![(30, 3)]);
        assert_eq!(selected(&model), (3, 30));
        let view = model.uidata.search.as_ref().unwrap();
        assert_eq!(view.matches, 1);
        assert_eq!(view.current, Some(1));

        key(&mut model, KeyCode::Esc);
        assert!(!model.raw_keyevents());
        assert!(model.uidata.search.is_none());
        assert!(model.search.results.is_empty());
    }

    #[test]
    fn search_cycles_through_results() {
        let mut model = model();
        model.update(Some(Message::ToggleSearch));
        type_str(&mut model, "@");
        let total = model.search.results.len();
        assert_eq!(total, 50);
        assert_eq!(model.search.idx, 0);

        key(&mut model, KeyCode::Up);
        assert_eq!(model.search.idx, total - 1);
        assert_eq!(selected(&model), (2, 49));
        key(&mut model, KeyCode::Down);
        assert_eq!(model.search.idx, 0);
        assert_eq!(selected(&model), (2, 0));

        model.update(Some(Message::ToggleSearch));
        assert_eq!(model.modus, Modus::TABLE);
    }

    #[test]
    fn search_interrupts_edit() {
        let mut model = model();
        model.update(Some(Message::Enter));
        model.update(Some(Message::ToggleSearch));
        assert_eq!(model.modus, Modus::SEARCH);
        assert!(model.editor.is_none());
    }

    #[test]
    fn help_popup() {
        let mut model = model();
        model.update(Some(Message::Help));
        assert_eq!(model.uidata.popup_message.as_deref(), Some(HELP_TEXT));
        model.update(Some(Message::MoveDown));
        assert_eq!(selected(&model), (0, 0));
        model.update(Some(Message::Exit));
        assert!(model.uidata.popup_message.is_none());
        model.update(Some(Message::Quit));
        assert_eq!(model.status, Status::QUITTING);
    }

    #[test]
    fn empty_table() {
        let mut model = model_with(GridConfig::default(), 0, WIDTH);
        assert!(model.uidata.rows.is_empty());
        model.update(Some(Message::MoveDown));
        model.update(Some(Message::Enter));
        assert_eq!(model.modus, Modus::TABLE);
        model.paste_value("x");
        assert_eq!(model.store.len(), 0);
    }

    #[test]
    fn csv_row() {
        assert_eq!(Model::wrap_cell_content("Tesla"), "Tesla");
        assert_eq!(Model::wrap_cell_content("Jane Doe"), "\"Jane Doe\"");
        assert_eq!(Model::wrap_cell_content("a\"b"), "\"a\"\"b\"");

        let model = model();
        let line = model.row_as_csv(0).unwrap();
        assert_eq!(line.matches(',').count(), 3);
        assert!(model.row_as_csv(50).is_none());
    }
}
