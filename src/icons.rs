//! Header icons.
//!
//! Every icon is a pure function of its foreground and background colour that
//! returns a 20x20 SVG document. The terminal grid shows a glyph instead, the
//! SVG form is printed by `cgrid icon`.

use crate::domain::GridError;
use crate::records::Field;

pub type IconFn = fn(fg: &str, bg: &str) -> String;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderIcon {
    Name,
    Company,
    Email,
    Phone,
}

pub const HEADER_ICONS: [(&str, IconFn); 4] = [
    ("header-name", name_svg),
    ("header-company", company_svg),
    ("header-email", email_svg),
    ("header-phone", phone_svg),
];

impl HeaderIcon {
    pub fn for_field(field: Field) -> Self {
        match field {
            Field::Name => HeaderIcon::Name,
            Field::Company => HeaderIcon::Company,
            Field::Email => HeaderIcon::Email,
            Field::Phone => HeaderIcon::Phone,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            HeaderIcon::Name => "header-name",
            HeaderIcon::Company => "header-company",
            HeaderIcon::Email => "header-email",
            HeaderIcon::Phone => "header-phone",
        }
    }

    pub fn glyph(&self) -> char {
        match self {
            HeaderIcon::Name => '☺',
            HeaderIcon::Company => '▦',
            HeaderIcon::Email => '✉',
            HeaderIcon::Phone => '☎',
        }
    }
}

/// Look up the SVG producer registered under `key`.
pub fn icon_fn(key: &str) -> Result<IconFn, GridError> {
    HEADER_ICONS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, f)| *f)
        .ok_or_else(|| GridError::UnknownIcon(key.to_string()))
}

fn frame(bg: &str, body: String) -> String {
    format!(
        r#"<svg width="20" height="20" fill="none" xmlns="http://www.w3.org/2000/svg"><rect x="2" y="2" width="16" height="16" rx="2" fill="{bg}"/>{body}</svg>"#
    )
}

fn name_svg(fg: &str, bg: &str) -> String {
    frame(
        bg,
        format!(
            r#"<circle cx="10" cy="7.5" r="2.75" fill="{fg}"/><path d="M5 15.5c0-2.5 2.2-4.25 5-4.25s5 1.75 5 4.25" fill="{fg}"/>"#
        ),
    )
}

fn company_svg(fg: &str, bg: &str) -> String {
    frame(
        bg,
        format!(
            r#"<path d="M5 16V5.5h6V16M11 8.5h4V16M4 16h12" stroke="{fg}" stroke-width="1.5"/><path d="M7 8h2M7 10.5h2M7 13h2" stroke="{fg}"/>"#
        ),
    )
}

fn email_svg(fg: &str, bg: &str) -> String {
    frame(
        bg,
        format!(
            r#"<rect x="4.5" y="6" width="11" height="8" rx="1" stroke="{fg}" stroke-width="1.5"/><path d="M5 6.5l5 4 5-4" stroke="{fg}" stroke-width="1.5"/>"#
        ),
    )
}

fn phone_svg(fg: &str, bg: &str) -> String {
    frame(
        bg,
        format!(
            r#"<path d="M6.5 4.5h2l1 3-1.5 1a6.5 6.5 0 0 0 3.5 3.5l1-1.5 3 1v2a1.5 1.5 0 0 1-1.5 1.5A10 10 0 0 1 5 6a1.5 1.5 0 0 1 1.5-1.5z" fill="{fg}"/>"#
        ),
    )
}
