use ratatui::style::Color;

/// An RGB colour with alpha, parsed from `#rrggbb` or `#rrggbbaa`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub fn parse(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#')?;
        let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            6 => Some(Rgba { r: byte(0)?, g: byte(2)?, b: byte(4)?, a: 255 }),
            8 => Some(Rgba { r: byte(0)?, g: byte(2)?, b: byte(4)?, a: byte(6)? }),
            _ => None,
        }
    }

    /// Composite `self` over an opaque background, scaling the alpha by
    /// `strength` (0.0 to 1.0).
    pub fn over(&self, bg: Rgba, strength: f32) -> Color {
        let alpha = (self.a as f32 / 255.0) * strength.clamp(0.0, 1.0);
        let mix = |fg: u8, bg: u8| (fg as f32 * alpha + bg as f32 * (1.0 - alpha)).round() as u8;
        Color::Rgb(mix(self.r, bg.r), mix(self.g, bg.g), mix(self.b, bg.b))
    }
}

impl From<Rgba> for Color {
    fn from(c: Rgba) -> Self {
        Color::Rgb(c.r, c.g, c.b)
    }
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub text_dark: Color,
    pub text_header: Color,
    pub text_light: Color,
    pub bg_cell: Rgba,
    pub bg_header: Rgba,
    pub accent: Color,
    pub accent_light: Color,
    pub border: Color,
    pub cell_horizontal_padding: u16,
    // Last stop of the hovered header gradient
    pub header_hover: Rgba,
    pub corner_indicator: Color,
    pub icon_fg: &'static str,
    pub icon_bg: &'static str,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            text_dark: Color::Rgb(0x31, 0x35, 0x39),
            text_header: Color::Rgb(0x31, 0x35, 0x39),
            text_light: Color::Rgb(0xb2, 0xb2, 0xc0),
            bg_cell: Rgba { r: 0xff, g: 0xff, b: 0xff, a: 255 },
            bg_header: Rgba { r: 0xf7, g: 0xf7, b: 0xf8, a: 255 },
            accent: Color::Rgb(0x46, 0x80, 0xff),
            accent_light: Color::Rgb(0xd9, 0xe4, 0xff),
            border: Color::Rgb(0xe1, 0xe2, 0xe5),
            cell_horizontal_padding: 1,
            header_hover: Rgba { r: 0x00, g: 0xa2, b: 0xff, a: 0x34 },
            corner_indicator: Color::Rgb(0xff, 0x00, 0x00),
            icon_fg: "#ffffff",
            icon_bg: "#4f5dff",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hex() {
        assert_eq!(Rgba::parse("#00a2ff34"), Some(Rgba { r: 0, g: 0xa2, b: 0xff, a: 0x34 }));
        assert_eq!(Rgba::parse("#ff0000"), Some(Rgba { r: 255, g: 0, b: 0, a: 255 }));
        assert_eq!(Rgba::parse("ff0000"), None);
        assert_eq!(Rgba::parse("#ff00"), None);
        assert_eq!(Rgba::parse("#gg0000"), None);
    }

    #[test]
    fn blending() {
        let white = Rgba { r: 255, g: 255, b: 255, a: 255 };
        let red = Rgba { r: 255, g: 0, b: 0, a: 255 };
        assert_eq!(red.over(white, 1.0), Color::Rgb(255, 0, 0));
        assert_eq!(red.over(white, 0.0), Color::Rgb(255, 255, 255));
        assert_eq!(red.over(white, 0.5), Color::Rgb(255, 128, 128));
    }
}
