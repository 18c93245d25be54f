//! Color palettes for the terminal views
//!
//! The palette is chosen from the configured `ThemeMode` and handed to every
//! draw function.

use odak_core::ThemeMode;
use ratatui::style::Color;

use focus::Category;

#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub background: Color,
    pub card: Color,
    pub text: Color,
    pub muted: Color,
    pub primary: Color,
    pub secondary: Color,
    pub success: Color,
    pub warning: Color,
    pub danger: Color,
}

impl Palette {
    pub fn for_mode(mode: ThemeMode) -> Self {
        let shared = Self {
            background: Color::Rgb(0xF3, 0xF4, 0xF6),
            card: Color::Rgb(0xFF, 0xFF, 0xFF),
            text: Color::Rgb(0x1F, 0x29, 0x37),
            muted: Color::Rgb(0x6B, 0x72, 0x80),
            primary: Color::Rgb(0x63, 0x66, 0xF1),
            secondary: Color::Rgb(0x8B, 0x5C, 0xF6),
            success: Color::Rgb(0x10, 0xB9, 0x81),
            warning: Color::Rgb(0xF5, 0x9E, 0x0B),
            danger: Color::Rgb(0xEF, 0x44, 0x44),
        };

        match mode {
            ThemeMode::Light => shared,
            ThemeMode::Dark => Self {
                background: Color::Rgb(0x12, 0x12, 0x12),
                card: Color::Rgb(0x1E, 0x1E, 0x1E),
                text: Color::Rgb(0xFF, 0xFF, 0xFF),
                muted: Color::Rgb(0xA0, 0xA0, 0xA0),
                ..shared
            },
        }
    }
}

/// Display color of a category
pub fn category_color(category: Category) -> Color {
    let (r, g, b) = category.rgb();
    Color::Rgb(r, g, b)
}
