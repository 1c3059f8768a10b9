//! Rendering hooks for custom cell kinds.
//!
//! The grid asks the registry for a renderer whenever it meets a custom cell.
//! A renderer recognises its cells by their discriminator and supplies the
//! draw, editor and paste behaviour for them.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use tracing::trace;

use crate::cells::{Align, CustomCell, GridCell, StyledTextCell};
use crate::editor::CellEditor;
use crate::theme::Theme;

pub struct DrawArgs<'a> {
    pub buf: &'a mut Buffer,
    pub theme: &'a Theme,
    pub rect: Rect,
    pub highlighted: bool,
}

pub trait CustomRenderer {
    fn kind(&self) -> &'static str;

    fn is_match(&self, cell: &CustomCell) -> bool {
        cell.kind() == self.kind()
    }

    /// Paint the cell. Returns false if the cell could not be drawn.
    fn draw(&self, args: &mut DrawArgs<'_>, cell: &CustomCell) -> bool;

    fn provide_editor(&self, cell: &CustomCell) -> Option<CellEditor>;

    /// The payload resulting from pasting `value` onto `cell`.
    fn on_paste(&self, value: &str, cell: &CustomCell) -> Option<CustomCell>;
}

pub struct Renderers {
    renderers: Vec<Box<dyn CustomRenderer>>,
}

impl Default for Renderers {
    fn default() -> Self {
        Renderers {
            renderers: vec![Box::new(TextCellRenderer)],
        }
    }
}

impl Renderers {
    pub fn find(&self, cell: &CustomCell) -> Option<&dyn CustomRenderer> {
        self.renderers
            .iter()
            .find(|r| r.is_match(cell))
            .map(|r| r.as_ref())
    }

    /// Draw any cell, falling back to plain text when no renderer matches.
    pub fn draw(&self, args: &mut DrawArgs<'_>, cell: &GridCell) {
        let drawn = match cell {
            GridCell::Custom(custom) => self
                .find(custom)
                .map(|r| r.draw(args, custom))
                .unwrap_or(false),
            GridCell::Text(_) => false,
        };
        if !drawn {
            let style = Style::default().fg(args.theme.text_dark);
            draw_text(args, cell.value(), Align::Left, style);
        }
        draw_corner_indicator(args);
    }

    pub fn provide_editor(&self, cell: &GridCell) -> CellEditor {
        match cell {
            GridCell::Custom(custom) => self
                .find(custom)
                .and_then(|r| r.provide_editor(custom))
                .unwrap_or_else(|| CellEditor::text(cell.clone())),
            GridCell::Text(_) => CellEditor::text(cell.clone()),
        }
    }

    pub fn on_paste(&self, value: &str, cell: &GridCell) -> GridCell {
        match cell {
            GridCell::Custom(custom) => self
                .find(custom)
                .and_then(|r| r.on_paste(value, custom))
                .map(GridCell::Custom)
                .unwrap_or_else(|| GridCell::text(value)),
            GridCell::Text(_) => GridCell::text(value),
        }
    }
}

/// Row offset of the text line inside `rect`. Even heights have no middle
/// row; the text goes to the upper of the two.
pub fn middle_center_bias(rect: Rect) -> u16 {
    rect.height.saturating_sub(1) / 2
}

/// Draw a single line of text aligned inside `rect`, vertically centred.
/// Parts of `rect` outside the buffer are not drawn.
pub fn draw_text(args: &mut DrawArgs<'_>, value: &str, align: Align, style: Style) {
    let rect = args.rect.intersection(args.buf.area);
    if rect.is_empty() {
        return;
    }
    let padding = args.theme.cell_horizontal_padding.min(rect.width / 2);
    let inner_width = rect.width - 2 * padding;
    let text_width = (Span::raw(value).width() as u16).min(inner_width);

    let x = match align {
        Align::Left => rect.x + padding,
        Align::Center => rect.x + padding + (inner_width - text_width) / 2,
        Align::Right => rect.x + rect.width - padding - text_width,
    };
    let y = rect.y + middle_center_bias(rect);
    args.buf.set_stringn(x, y, value, text_width as usize, style);
}

/// Red triangle in the top right corner of highlighted cells.
pub fn draw_corner_indicator(args: &mut DrawArgs<'_>) {
    let rect = args.rect.intersection(args.buf.area);
    if !args.highlighted || rect.is_empty() {
        return;
    }
    let color = args.theme.corner_indicator;
    args.buf[(rect.right() - 1, rect.y)]
        .set_char('◥')
        .set_fg(color);
}

pub struct TextCellRenderer;

impl CustomRenderer for TextCellRenderer {
    fn kind(&self) -> &'static str {
        StyledTextCell::KIND
    }

    fn draw(&self, args: &mut DrawArgs<'_>, cell: &CustomCell) -> bool {
        let CustomCell::StyledText(data) = cell;
        let mut style = Style::default().fg(data.color.unwrap_or(args.theme.text_dark));
        if data.bold {
            style = style.add_modifier(Modifier::BOLD);
        }
        if data.italic {
            style = style.add_modifier(Modifier::ITALIC);
        }
        draw_text(args, &data.value, data.align, style);
        true
    }

    fn provide_editor(&self, cell: &CustomCell) -> Option<CellEditor> {
        trace!("Providing {} editor", self.kind());
        Some(CellEditor::new(GridCell::Custom(cell.clone()), |original, value| {
            match original {
                GridCell::Custom(CustomCell::StyledText(data)) => {
                    GridCell::Custom(CustomCell::StyledText(data.with_value(value)))
                }
                GridCell::Text(_) => GridCell::text(value),
            }
        }))
    }

    fn on_paste(&self, value: &str, cell: &CustomCell) -> Option<CustomCell> {
        let CustomCell::StyledText(data) = cell;
        Some(CustomCell::StyledText(data.with_value(value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cells::TextCellStyle;
    use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::style::Color;

    fn styled(value: &str, style: TextCellStyle) -> CustomCell {
        CustomCell::StyledText(StyledTextCell::new(value, &style))
    }

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width).map(|x| buf[(x, y)].symbol()).collect()
    }

    fn render(cell: &GridCell, rect: Rect) -> Buffer {
        let theme = Theme::default();
        let mut buf = Buffer::empty(Rect::new(0, 0, 12, 3));
        let mut args = DrawArgs {
            buf: &mut buf,
            theme: &theme,
            rect,
            highlighted: false,
        };
        Renderers::default().draw(&mut args, cell);
        buf
    }

    #[test]
    fn matches_by_kind() {
        let cell = styled("x", TextCellStyle::default());
        assert!(TextCellRenderer.is_match(&cell));
        assert!(Renderers::default().find(&cell).is_some());
    }

    #[test]
    fn draws_alignment() {
        let rect = Rect::new(0, 0, 12, 3);
        let left = render(&GridCell::Custom(styled("abc", TextCellStyle::default())), rect);
        assert_eq!(row_text(&left, 1), " abc        ");

        let center = TextCellStyle::default().align(Align::Center);
        let center = render(&GridCell::Custom(styled("abcd", center)), rect);
        assert_eq!(row_text(&center, 1), "    abcd    ");

        let right = TextCellStyle::default().align(Align::Right);
        let right = render(&GridCell::Custom(styled("abc", right)), rect);
        assert_eq!(row_text(&right, 1), "        abc ");
        assert_eq!(row_text(&right, 0), "            ");
    }

    #[test]
    fn draws_style() {
        let style = TextCellStyle::default().bold(true).italic(true).color(Color::Red);
        let buf = render(&GridCell::Custom(styled("abc", style)), Rect::new(0, 0, 12, 1));
        let cell = &buf[(1, 0)];
        assert_eq!(cell.symbol(), "a");
        assert_eq!(cell.fg, Color::Red);
        assert!(cell.modifier.contains(Modifier::BOLD | Modifier::ITALIC));
    }

    #[test]
    fn default_color_comes_from_theme() {
        let buf = render(&GridCell::Custom(styled("abc", TextCellStyle::default())), Rect::new(0, 0, 12, 1));
        assert_eq!(buf[(1, 0)].fg, Theme::default().text_dark);
    }

    #[test]
    fn long_values_are_clipped() {
        let buf = render(&GridCell::text("abcdefghijklmnop"), Rect::new(0, 0, 6, 1));
        assert_eq!(row_text(&buf, 0), " abcd       ");
    }

    #[test]
    fn corner_indicator_on_highlight() {
        let theme = Theme::default();
        let mut buf = Buffer::empty(Rect::new(0, 0, 8, 2));
        let mut args = DrawArgs {
            buf: &mut buf,
            theme: &theme,
            rect: Rect::new(0, 0, 8, 2),
            highlighted: true,
        };
        Renderers::default().draw(&mut args, &GridCell::text("ab"));
        assert_eq!(buf[(7, 0)].symbol(), "◥");
        assert_eq!(buf[(7, 0)].fg, theme.corner_indicator);

        let plain = render(&GridCell::text("ab"), Rect::new(0, 0, 8, 2));
        assert_eq!(plain[(7, 0)].symbol(), " ");
    }

    #[test]
    fn rect_outside_buffer_is_clipped() {
        let theme = Theme::default();
        let mut buf = Buffer::empty(Rect::new(0, 0, 6, 2));
        let mut args = DrawArgs {
            buf: &mut buf,
            theme: &theme,
            rect: Rect::new(2, 1, 10, 3),
            highlighted: true,
        };
        Renderers::default().draw(&mut args, &GridCell::text("abcdef"));
        assert_eq!(row_text(&buf, 1), "   ab◥");
        assert_eq!(buf[(5, 1)].fg, theme.corner_indicator);

        let mut args = DrawArgs {
            buf: &mut buf,
            theme: &theme,
            rect: Rect::new(0, 5, 6, 1),
            highlighted: true,
        };
        Renderers::default().draw(&mut args, &GridCell::text("zz"));
        assert_eq!(row_text(&buf, 0), "      ");
    }

    #[test]
    fn vertical_bias() {
        assert_eq!(middle_center_bias(Rect::new(0, 0, 1, 1)), 0);
        assert_eq!(middle_center_bias(Rect::new(0, 0, 1, 2)), 0);
        assert_eq!(middle_center_bias(Rect::new(0, 0, 1, 3)), 1);
        assert_eq!(middle_center_bias(Rect::new(0, 0, 1, 4)), 1);
    }

    #[test]
    fn editor_keeps_styling() {
        let style = TextCellStyle::default().bold(true).align(Align::Right);
        let cell = styled("Tesla", style);
        let mut editor = TextCellRenderer.provide_editor(&cell).unwrap();
        assert_eq!(editor.input().input, "Tesla");
        editor.read(KeyEvent::new(KeyCode::Char('!'), KeyModifiers::NONE));

        let GridCell::Custom(CustomCell::StyledText(edited)) = editor.commit() else {
            panic!("editor changed the cell kind");
        };
        assert_eq!(edited.value, "Tesla!");
        assert!(edited.bold);
        assert_eq!(edited.align, Align::Right);
    }

    #[test]
    fn paste_replaces_value_only() {
        let style = TextCellStyle::default().italic(true).align(Align::Center);
        let cell = styled("Google", style);
        let CustomCell::StyledText(pasted) = TextCellRenderer.on_paste("Tesla", &cell).unwrap();
        assert_eq!(pasted.value, "Tesla");
        assert!(pasted.italic);
        assert_eq!(pasted.align, Align::Center);
    }

    #[test]
    fn plain_cells_use_text_editor_and_paste() {
        let renderers = Renderers::default();
        let cell = GridCell::text("a");
        assert_eq!(renderers.provide_editor(&cell).commit(), GridCell::text("a"));
        assert_eq!(renderers.on_paste("b", &cell), GridCell::text("b"));
    }
}
