//! Help popup widget - displays keyboard shortcuts

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use crate::tui::theme::Theme;

/// Version from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Width and height of the help popup
const POPUP_WIDTH: u16 = 48;
const POPUP_HEIGHT: u16 = 24;

const PAINT_KEYS: &[(&str, &str)] = &[
    ("Arrows / h j k l", "Move cursor"),
    ("0-4", "Paint with level"),
    ("Space", "Cycle cell level"),
    ("Enter / mouse", "Paint with brush"),
    ("f / c", "Fill / clear grid"),
    ("u", "Undo"),
    ("e / E", "Export .txt / .toml"),
];

const MODE_KEYS: &[(&str, &str)] = &[
    ("s", "Stamp mode"),
    ("Tab / Shift+Tab", "Next / prev sprite"),
    ("t", "Text mode"),
    ("Enter (text)", "Stamp text at cursor"),
    ("Tab (text)", "Replace grid with text"),
    ("Esc", "Back to paint / quit"),
    ("?", "Toggle help"),
];

/// Help popup widget showing keyboard shortcuts
pub struct HelpPopup {
    theme: Theme,
}

impl HelpPopup {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    /// Calculate centered popup area
    pub fn centered_area(area: Rect) -> Rect {
        let x = area.x + (area.width.saturating_sub(POPUP_WIDTH)) / 2;
        let y = area.y + (area.height.saturating_sub(POPUP_HEIGHT)) / 2;
        Rect {
            x,
            y,
            width: POPUP_WIDTH.min(area.width),
            height: POPUP_HEIGHT.min(area.height),
        }
    }

    fn render_section(
        &self,
        title: &str,
        keys: &[(&str, &str)],
        rows: &[Rect],
        buf: &mut Buffer,
    ) {
        let Some((header, rest)) = rows.split_first() else {
            return;
        };
        let header_line = Line::from(vec![Span::styled(
            title.to_string(),
            Style::default()
                .fg(self.theme.date())
                .add_modifier(Modifier::BOLD),
        )]);
        Paragraph::new(header_line)
            .alignment(Alignment::Left)
            .render(*header, buf);

        if let Some(sep_row) = rest.first() {
            let sep = "─".repeat(sep_row.width as usize);
            buf.set_string(
                sep_row.x,
                sep_row.y,
                &sep,
                Style::default().fg(self.theme.muted()),
            );
        }

        for ((key, desc), row) in keys.iter().zip(rest.iter().skip(1)) {
            render_keybinding(*row, buf, key, desc, self.theme);
        }
    }
}

impl Default for HelpPopup {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}

impl Widget for HelpPopup {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Clear the area first (for overlay effect)
        Clear.render(area, buf);

        let title = format!(" ghstamp v{} ", VERSION);
        let block = Block::default()
            .title(title)
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.accent()));

        let inner = block.inner(area);
        block.render(area, buf);

        // header + separator + keys, per section
        let paint_rows = PAINT_KEYS.len() as u16 + 2;
        let mode_rows = MODE_KEYS.len() as u16 + 2;
        let chunks = Layout::vertical([
            Constraint::Length(paint_rows),
            Constraint::Length(1),
            Constraint::Length(mode_rows),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

        let rows = |r: Rect| -> Vec<Rect> {
            Layout::vertical(vec![Constraint::Length(1); r.height as usize]).split(r).to_vec()
        };

        self.render_section("Paint", PAINT_KEYS, &rows(chunks[0]), buf);
        self.render_section("Modes", MODE_KEYS, &rows(chunks[2]), buf);

        let hint = Line::from(vec![Span::styled(
            "Press ? to close",
            Style::default().fg(self.theme.muted()),
        )]);
        Paragraph::new(hint)
            .alignment(Alignment::Center)
            .render(chunks[4], buf);
    }
}

/// Render a single keybinding line
fn render_keybinding(area: Rect, buf: &mut Buffer, key: &str, desc: &str, theme: Theme) {
    let line = Line::from(vec![
        Span::styled(
            format!("  {:<20}", key),
            Style::default().fg(theme.accent()),
        ),
        Span::styled(desc.to_string(), Style::default().fg(theme.text())),
    ]);
    Paragraph::new(line)
        .alignment(Alignment::Left)
        .render(area, buf);
}
