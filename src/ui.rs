use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Position, Rect},
    style::{Modifier, Style, Stylize},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Widget, Wrap},
};

use crate::cells::Align;
use crate::inputter::InputResult;
use crate::model::{Model, UIData};
use crate::renderers::{DrawArgs, Renderers, draw_text};
use crate::theme::{Rgba, Theme};

pub const STATUSLINE_HEIGHT: u16 = 1;
const SEARCH_WIDTH: u16 = 40;
const SEARCH_HIT: Rgba = Rgba { r: 0xff, g: 0xd8, b: 0x4d, a: 0x80 };

#[derive(Debug, Default)]
pub struct TableUI {}

impl TableUI {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draw(&mut self, model: &Model, frame: &mut Frame) {
        let cursor = render(model.get_uidata(), model.theme(), model.renderers(), frame.buffer_mut());
        if let Some(position) = cursor {
            frame.set_cursor_position(position);
        }
    }
}

/// Draw the grid and its overlays. Returns where the text cursor goes when
/// an input is active.
pub fn render(uidata: &UIData, theme: &Theme, renderers: &Renderers, buf: &mut Buffer) -> Option<Position> {
    let area = buf.area;
    let layout = &uidata.layout;
    let table = Rect::new(area.x, area.y, area.width, layout.statusline_y.min(area.height));
    buf.set_style(table, Style::default().bg(theme.bg_cell.into()));

    render_headers(uidata, theme, buf);
    render_rows(uidata, theme, renderers, buf);
    render_shadows(uidata, theme, buf);
    render_statusline(uidata, theme, buf);

    let mut cursor = None;
    if let Some(editor) = &uidata.editor {
        let slot = layout.slot(editor.column);
        let row = layout.rows.iter().find(|r| r.row == editor.row);
        if let (Some(slot), Some(row)) = (slot, row) {
            let width = slot.width.max(12).min(area.width.saturating_sub(slot.x));
            let rect = Rect::new(slot.x, row.y, width, 1);
            cursor = render_input(&editor.input, rect, theme, buf);
        }
    }
    if let Some(search) = &uidata.search {
        let width = SEARCH_WIDTH.min(area.width);
        let rect = Rect::new(area.right() - width, area.y, width, 3.min(area.height));
        Clear.render(rect, buf);
        let counter = match search.current {
            Some(current) => format!(" {}/{} ", current, search.matches),
            None if search.input.input.is_empty() => String::new(),
            None => " no results ".to_string(),
        };
        Block::bordered()
            .title(Line::from(" Search ".bold()))
            .title_bottom(Line::from(counter).right_aligned())
            .border_set(border::ROUNDED)
            .border_style(Style::default().fg(theme.accent))
            .style(Style::default().bg(theme.bg_cell.into()))
            .render(rect, buf);
        let inner = Rect::new(rect.x + 1, rect.y + 1, rect.width.saturating_sub(2), 1);
        cursor = render_input(&search.input, inner, theme, buf);
    }
    if let Some(message) = &uidata.popup_message {
        render_popup(message, area, theme, buf);
    }
    cursor
}

fn render_headers(uidata: &UIData, theme: &Theme, buf: &mut Buffer) {
    let layout = &uidata.layout;
    if layout.header_height == 0 {
        return;
    }
    let header = Rect::new(0, 0, buf.area.width, layout.header_height);
    buf.set_style(header, Style::default().bg(theme.bg_header.into()));

    for (slot, view) in layout.columns.iter().zip(uidata.headers.iter()) {
        let rect = Rect::new(slot.x, 0, slot.width, layout.header_height).intersection(buf.area);
        if rect.is_empty() {
            continue;
        }
        if view.hovered {
            // Vertical gradient, transparent at the top
            for i in 0..rect.height {
                let strength = (i + 1) as f32 / rect.height as f32;
                let bg = theme.header_hover.over(theme.bg_header, strength);
                buf.set_style(Rect::new(rect.x, rect.y + i, rect.width, 1), Style::default().bg(bg));
            }
        }
        let title = match view.glyph {
            Some(glyph) => format!("{glyph} {}", view.title),
            None => view.title.clone(),
        };
        let mut style = Style::default().fg(theme.text_header);
        if slot.frozen {
            style = style.add_modifier(Modifier::BOLD);
        }
        let mut args = DrawArgs { buf: &mut *buf, theme, rect, highlighted: false };
        draw_text(&mut args, &title, Align::Left, style);
    }
}

fn render_rows(uidata: &UIData, theme: &Theme, renderers: &Renderers, buf: &mut Buffer) {
    let layout = &uidata.layout;
    for (row_slot, row) in layout.rows.iter().zip(uidata.rows.iter()) {
        // The layout lags one frame behind a shrinking terminal
        if row_slot.y >= buf.area.bottom() {
            continue;
        }
        if layout.index_width > 0 {
            let marker = Rect::new(0, row_slot.y, layout.index_width, 1);
            let fg = if row.selected { theme.accent } else { theme.text_light };
            let mut args = DrawArgs { buf: &mut *buf, theme, rect: marker, highlighted: false };
            draw_text(&mut args, &row.marker, Align::Right, Style::default().fg(fg));
        }

        for (slot, cell) in layout.columns.iter().zip(row.cells.iter()) {
            let rect = Rect::new(slot.x, row_slot.y, slot.width, 1).intersection(buf.area);
            if rect.is_empty() {
                continue;
            }
            let bg = if cell.selected {
                theme.accent_light
            } else if cell.search_hit {
                SEARCH_HIT.over(theme.bg_cell, 1.0)
            } else if row_slot.trailing {
                theme.bg_header.into()
            } else {
                theme.bg_cell.into()
            };
            buf.set_style(rect, Style::default().bg(bg));
            let mut args = DrawArgs { buf: &mut *buf, theme, rect, highlighted: cell.highlighted };
            renderers.draw(&mut args, &cell.cell);
        }
    }
}

fn render_shadows(uidata: &UIData, theme: &Theme, buf: &mut Buffer) {
    let layout = &uidata.layout;
    let area = buf.area;
    let style = Style::default().fg(theme.border);
    if let Some(x) = layout.shadow_x.filter(|&x| x < area.right()) {
        for y in 0..layout.statusline_y.min(area.height) {
            buf[(x, y)].set_char('│').set_style(style);
        }
    }
    if let Some(y) = layout.shadow_y.filter(|&y| y < area.bottom()) {
        for x in 0..area.width {
            let symbol = if layout.shadow_x == Some(x) { '┼' } else { '─' };
            buf[(x, y)].set_char(symbol).set_style(style);
        }
    }
}

fn render_statusline(uidata: &UIData, theme: &Theme, buf: &mut Buffer) {
    let y = uidata.layout.statusline_y;
    if y >= buf.area.height {
        return;
    }
    let rect = Rect::new(0, y, buf.area.width, STATUSLINE_HEIGHT);
    let style = Style::default().fg(theme.bg_cell.into()).bg(theme.accent);
    buf.set_style(rect, style);
    let mut args = DrawArgs { buf: &mut *buf, theme, rect, highlighted: false };
    draw_text(&mut args, &uidata.name, Align::Left, style.add_modifier(Modifier::BOLD));
    draw_text(&mut args, &uidata.status_message, Align::Right, style);
}

// Single line input, scrolled so the cursor stays visible
fn render_input(input: &InputResult, rect: Rect, theme: &Theme, buf: &mut Buffer) -> Option<Position> {
    let rect = rect.intersection(buf.area);
    if rect.is_empty() {
        return None;
    }
    Clear.render(rect, buf);
    let style = Style::default().fg(theme.text_dark).bg(theme.bg_cell.into());
    buf.set_style(rect, style);

    let skip = input.cursor_pos.saturating_sub(rect.width as usize - 1);
    let visible: String = input.input.chars().skip(skip).collect();
    buf.set_stringn(rect.x, rect.y, &visible, rect.width as usize, style);
    let column = Span::raw(input.input.chars().skip(skip).take(input.cursor_pos - skip).collect::<String>()).width();
    Some(Position::new(rect.x + column as u16, rect.y))
}

fn render_popup(message: &str, area: Rect, theme: &Theme, buf: &mut Buffer) {
    let lines = message.lines().count() as u16 + 2;
    let width = (message.lines().map(|l| Span::raw(l).width()).max().unwrap_or(0) as u16 + 4).min(area.width);
    let height = lines.min(area.height);
    let rect = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );
    Clear.render(rect, buf);
    Paragraph::new(message)
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(theme.text_dark).bg(theme.bg_cell.into()))
        .block(
            Block::bordered()
                .title(Line::from(" Help ".bold()).centered())
                .title_bottom(Line::from(vec![" Close ".into(), "<Esc> ".blue().bold()]).centered())
                .border_set(border::THICK),
        )
        .render(rect, buf);
}
