//! Bottom status line: mode, brush, hovered date, undo depth, last message

use chrono::NaiveDate;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::services::calendar::format_tooltip_date;
use crate::tui::theme::Theme;

pub struct StatusBar<'a> {
    mode: &'a str,
    brush: u8,
    hovered: Option<NaiveDate>,
    undo_depth: usize,
    message: Option<&'a str>,
    theme: Theme,
}

impl<'a> StatusBar<'a> {
    pub fn new(mode: &'a str, brush: u8, theme: Theme) -> Self {
        Self {
            mode,
            brush,
            hovered: None,
            undo_depth: 0,
            message: None,
            theme,
        }
    }

    pub fn hovered(mut self, date: Option<NaiveDate>) -> Self {
        self.hovered = date;
        self
    }

    pub fn undo_depth(mut self, depth: usize) -> Self {
        self.undo_depth = depth;
        self
    }

    pub fn message(mut self, message: Option<&'a str>) -> Self {
        self.message = message;
        self
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }

        let muted = Style::default().fg(self.theme.muted());
        let mut spans = vec![
            Span::styled(
                format!(" {} ", self.mode),
                Style::default()
                    .fg(self.theme.accent())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("│ brush ", muted),
            Span::styled(
                "■",
                Style::default().fg(self.theme.level_color(self.brush)),
            ),
            Span::styled(format!(" {} ", self.brush), Style::default().fg(self.theme.text())),
        ];

        if let Some(date) = self.hovered {
            spans.push(Span::styled("│ ", muted));
            spans.push(Span::styled(
                format!("{} ", format_tooltip_date(date)),
                Style::default().fg(self.theme.date()),
            ));
        }

        spans.push(Span::styled(format!("│ undo {} ", self.undo_depth), muted));

        if let Some(message) = self.message {
            spans.push(Span::styled("│ ", muted));
            spans.push(Span::styled(
                message.to_string(),
                Style::default().fg(self.theme.text()),
            ));
        }

        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Left)
            .render(area, buf);
    }
}
