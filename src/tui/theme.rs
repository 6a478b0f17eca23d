//! Terminal theme detection and color definitions

use ratatui::style::Color;

/// Terminal color scheme (dark or light background)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Auto-detect terminal theme from background luminance.
    /// Must be called **before** entering raw mode (ratatui::init).
    /// Falls back to Dark if detection fails.
    pub fn detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.6 => Self::Light,
            _ => Self::Dark,
        }
    }

    /// Primary text color (headers, body text)
    pub fn text(self) -> Color {
        match self {
            Self::Dark => Color::White,
            Self::Light => Color::Black,
        }
    }

    /// Active/accent color (cursor, selected sprite, keybinding keys)
    pub fn accent(self) -> Color {
        match self {
            Self::Dark => Color::Cyan,
            Self::Light => Color::Indexed(25), // dark blue (ANSI 256)
        }
    }

    /// Secondary/muted text (labels, separators, margin columns, hints)
    pub fn muted(self) -> Color {
        match self {
            Self::Dark => Color::DarkGray,
            Self::Light => Color::Gray,
        }
    }

    /// Date text color
    pub fn date(self) -> Color {
        match self {
            Self::Dark => Color::Yellow,
            Self::Light => Color::Indexed(130), // dark orange/yellow (ANSI 256)
        }
    }

    /// Error/negative indicator color
    pub fn error(self) -> Color {
        match self {
            Self::Dark => Color::Red,
            Self::Light => Color::Indexed(124), // dark red (ANSI 256)
        }
    }

    /// Ghost preview color (uncommitted stamp)
    pub fn ghost(self) -> Color {
        match self {
            Self::Dark => Color::Indexed(141), // soft purple (ANSI 256)
            Self::Light => Color::Indexed(98),
        }
    }

    /// Intensity color for a cell level (0-4, GitHub-style green gradient)
    pub fn level_color(self, level: u8) -> Color {
        match self {
            Self::Dark => match level {
                0 => Color::Indexed(236),
                1 => Color::Indexed(22),
                2 => Color::Indexed(28),
                3 => Color::Indexed(34),
                _ => Color::Indexed(40),
            },
            Self::Light => match level {
                0 => Color::Indexed(254),
                1 => Color::Indexed(194),
                2 => Color::Indexed(157),
                3 => Color::Indexed(71),
                _ => Color::Indexed(28),
            },
        }
    }
}
