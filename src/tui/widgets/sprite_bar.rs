//! Sprite selector bar for stamp mode

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use crate::services::sprites;
use crate::tui::theme::Theme;

/// Next catalog index (wrapping)
pub fn next_index(index: usize) -> usize {
    let len = sprites::catalog().len();
    if len == 0 {
        0
    } else {
        (index + 1) % len
    }
}

/// Previous catalog index (wrapping)
pub fn prev_index(index: usize) -> usize {
    let len = sprites::catalog().len();
    if len == 0 {
        0
    } else {
        (index + len - 1) % len
    }
}

/// Row of sprite names with the selected one bracketed
pub struct SpriteBar {
    selected: usize,
    theme: Theme,
}

impl SpriteBar {
    pub fn new(selected: usize, theme: Theme) -> Self {
        Self { selected, theme }
    }
}

impl Widget for SpriteBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let mut x = area.x;
        for (i, sprite) in sprites::catalog().iter().enumerate() {
            let is_selected = i == self.selected;
            let display = if is_selected {
                format!("[{}]", sprite.name)
            } else {
                sprite.name.to_string()
            };

            let display_len = display.chars().count() as u16;
            if x + display_len > area.right() {
                break;
            }

            let style = if is_selected {
                Style::default()
                    .fg(self.theme.accent())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.muted())
            };

            buf.set_string(x, area.y, &display, style);
            x += display_len + 2;
        }
    }
}
