//! Intensity legend: "Less ■■■■■ More" with the text-format characters

use ratatui::{buffer::Buffer, layout::Rect, style::Style, widgets::Widget};

use crate::tui::theme::Theme;
use crate::types::{level_to_char, MAX_LEVEL};

const LESS: &str = "Less ";
const MORE: &str = " More";

pub struct Legend {
    theme: Theme,
    /// Show the `.-:=#` row under the swatches
    show_chars: bool,
}

impl Legend {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            show_chars: false,
        }
    }

    pub fn with_chars(mut self) -> Self {
        self.show_chars = true;
        self
    }

    /// Width needed for the full legend
    pub fn min_width() -> u16 {
        (LESS.len() + (MAX_LEVEL as usize + 1) * 2 - 1 + MORE.len()) as u16
    }
}

impl Widget for Legend {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < Self::min_width() || area.height == 0 {
            return;
        }

        let muted = Style::default().fg(self.theme.muted());
        buf.set_string(area.x, area.y, LESS, muted);

        let mut x = area.x + LESS.len() as u16;
        for level in 0..=MAX_LEVEL {
            buf.set_string(
                x,
                area.y,
                "■",
                Style::default().fg(self.theme.level_color(level)),
            );
            if self.show_chars && area.height > 1 {
                buf.set_string(x, area.y + 1, level_to_char(level).to_string(), muted);
            }
            x += 2;
        }
        buf.set_string(x - 1, area.y, MORE, muted);
    }
}
