//! Editable contribution-calendar canvas widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use crate::services::calendar::{date_for_column, is_date_active};
use crate::services::editor::Editor;
use crate::tui::theme::Theme;
use crate::types::ROWS;

/// Cell dimensions: 1 block + 1 gap
pub const CELL_WIDTH: u16 = 2;
/// "Sun " prefix
pub const LABEL_WIDTH: u16 = 4;
/// Month label row + 7 weekday rows
pub const CANVAS_HEIGHT: u16 = 1 + ROWS as u16;

const CELL_SYMBOL: &str = "■";
const MARGIN_SYMBOL: &str = "·";

const DAY_LABELS: [&str; ROWS] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Screen geometry of the canvas, shared by rendering and mouse hit-testing.
///
/// Columns here are display columns of the full graph: 0 and
/// `total_columns - 1` are the margins, template column `c` is display `c + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasLayout {
    pub area: Rect,
    /// First visible display column
    pub scroll: usize,
    pub total_columns: usize,
}

impl CanvasLayout {
    /// Display columns that fit in the area
    pub fn visible_columns(&self) -> usize {
        let fit = (self.area.width.saturating_sub(LABEL_WIDTH) / CELL_WIDTH) as usize;
        fit.min(self.total_columns.saturating_sub(self.scroll))
    }

    /// Screen x of a display column, if visible
    pub fn column_x(&self, display_col: usize) -> Option<u16> {
        if display_col < self.scroll || display_col >= self.scroll + self.visible_columns() {
            return None;
        }
        Some(self.area.x + LABEL_WIDTH + (display_col - self.scroll) as u16 * CELL_WIDTH)
    }

    /// Screen y of a weekday row
    pub fn row_y(&self, row: usize) -> u16 {
        self.area.y + 1 + row as u16
    }

    /// Template cell (row, col) under a screen position; margins excluded
    pub fn cell_at(&self, x: u16, y: u16) -> Option<(usize, usize)> {
        let grid_x = self.area.x + LABEL_WIDTH;
        if x < grid_x || y <= self.area.y || y >= self.row_y(ROWS) {
            return None;
        }
        let offset = ((x - grid_x) / CELL_WIDTH) as usize;
        if offset >= self.visible_columns() {
            return None;
        }
        let display_col = self.scroll + offset;
        if display_col == 0 || display_col + 1 >= self.total_columns {
            return None;
        }
        Some(((y - self.area.y - 1) as usize, display_col - 1))
    }
}

/// Scroll offset that keeps `display_col` inside a window of `visible` columns
pub fn scroll_to_show(scroll: usize, display_col: usize, visible: usize, total: usize) -> usize {
    if visible == 0 {
        return 0;
    }
    let max_scroll = total.saturating_sub(visible);
    let scroll = if display_col < scroll {
        display_col
    } else if display_col >= scroll + visible {
        display_col + 1 - visible
    } else {
        scroll
    };
    scroll.min(max_scroll)
}

/// Calendar canvas rendering the live template, ghost preview and cursor
pub struct Canvas<'a> {
    editor: &'a Editor,
    cursor: Option<(usize, usize)>,
    scroll: usize,
    theme: Theme,
}

impl<'a> Canvas<'a> {
    pub fn new(editor: &'a Editor, theme: Theme) -> Self {
        Self {
            editor,
            cursor: None,
            scroll: 0,
            theme,
        }
    }

    pub fn cursor(mut self, row: usize, col: usize) -> Self {
        self.cursor = Some((row, col));
        self
    }

    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }

    fn render_month_labels(&self, layout: &CanvasLayout, buf: &mut Buffer) {
        let right = layout.area.right();
        for (col, name) in self.editor.calendar().month_labels() {
            if let Some(x) = layout.column_x(col) {
                if x + name.len() as u16 <= right {
                    buf.set_string(x, layout.area.y, name, Style::default().fg(self.theme.muted()));
                }
            }
        }
    }

    fn cell_style(&self, row: usize, col: usize) -> Style {
        let level = self.editor.template().get(row, col).unwrap_or(0);
        let fg = match self.editor.ghost_at(row, col) {
            Some(_) => self.theme.ghost(),
            None => self.theme.level_color(level),
        };
        let style = Style::default().fg(fg);
        if self.cursor == Some((row, col)) {
            style.bg(self.theme.accent()).add_modifier(Modifier::BOLD)
        } else {
            style
        }
    }
}

impl Widget for Canvas<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let calendar = self.editor.calendar();
        let layout = CanvasLayout {
            area,
            scroll: self.scroll,
            total_columns: calendar.total_columns,
        };
        if area.height == 0 {
            return;
        }

        self.render_month_labels(&layout, buf);

        let label_style = Style::default().fg(self.theme.muted());
        for (row, label) in DAY_LABELS.iter().enumerate() {
            let y = layout.row_y(row);
            if y >= area.bottom() {
                break;
            }
            if area.width >= LABEL_WIDTH {
                buf.set_string(area.x, y, label, label_style);
            }

            for display_col in layout.scroll..layout.scroll + layout.visible_columns() {
                let Some(x) = layout.column_x(display_col) else {
                    continue;
                };
                let date = date_for_column(display_col, row, calendar.graph_start_date);
                if !is_date_active(date, calendar.today) {
                    continue;
                }

                let is_margin = display_col == 0 || display_col + 1 >= calendar.total_columns;
                if is_margin {
                    buf.set_string(x, y, MARGIN_SYMBOL, label_style);
                } else {
                    let style = self.cell_style(row, display_col - 1);
                    buf.set_string(x, y, CELL_SYMBOL, style);
                }
            }
        }
    }
}
