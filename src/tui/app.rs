//! Application state and event loop

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use chrono::NaiveDate;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
    DefaultTerminal, Frame,
};

use crate::services::calendar::{compute_calendar_grid, format_anchor_date};
use crate::services::config::Config;
use crate::services::editor::Editor;
use crate::services::font::{BitmapFont, RenderOptions, TextRenderer};
use crate::services::sprites;
use crate::services::template_io::TemplateFormat;
use crate::types::{Sprite, MAX_LEVEL, ROWS};

use super::theme::Theme;
use super::widgets::{
    canvas::{scroll_to_show, Canvas, CanvasLayout, CANVAS_HEIGHT, LABEL_WIDTH},
    help::HelpPopup,
    legend::Legend,
    sprite_bar::{self, SpriteBar},
    status_bar::StatusBar,
};

/// Input mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Paint,
    Stamp,
    Text,
}

impl Mode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Paint => "PAINT",
            Self::Stamp => "STAMP",
            Self::Text => "TEXT",
        }
    }
}

/// Screen regions, shared by rendering and mouse hit-testing
struct ScreenLayout {
    title: Rect,
    canvas: Rect,
    legend: Rect,
    mode_line: Rect,
    status: Rect,
}

fn screen_layout(area: Rect) -> ScreenLayout {
    let chunks = Layout::vertical([
        Constraint::Length(1),             // [0] Title
        Constraint::Length(1),             // [1] Padding
        Constraint::Length(CANVAS_HEIGHT), // [2] Canvas
        Constraint::Length(1),             // [3] Padding
        Constraint::Length(2),             // [4] Legend
        Constraint::Length(1),             // [5] Mode line
        Constraint::Min(0),                // [6] Remaining
        Constraint::Length(1),             // [7] Status
    ])
    .split(area);

    ScreenLayout {
        title: chunks[0],
        canvas: chunks[2],
        legend: chunks[4],
        mode_line: chunks[5],
        status: chunks[7],
    }
}

/// Lowercase file stem made of `[a-z0-9_-]`
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "untitled".to_string()
    } else {
        cleaned
    }
}

pub struct App {
    editor: Editor,
    renderer: BitmapFont,
    render_options: RenderOptions,
    export_dir: PathBuf,
    theme: Theme,
    mode: Mode,
    /// (row, template column)
    cursor: (usize, usize),
    brush: u8,
    sprite_index: usize,
    text_input: String,
    scroll: usize,
    show_help: bool,
    status: Option<String>,
    should_quit: bool,
    area: Rect,
    mouse_down: bool,
}

impl App {
    pub fn new(editor: Editor, config: &Config, theme: Theme) -> Self {
        Self {
            editor,
            renderer: BitmapFont,
            render_options: config.render_options(),
            export_dir: config.export_dir(),
            theme,
            mode: Mode::default(),
            cursor: (0, 0),
            brush: MAX_LEVEL,
            sprite_index: 0,
            text_input: String::new(),
            scroll: 0,
            show_help: false,
            status: None,
            should_quit: false,
            area: Rect::default(),
            mouse_down: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Record the terminal size used for layout and hit-testing
    pub fn set_area(&mut self, area: Rect) {
        self.area = area;
        self.follow_cursor();
    }

    fn canvas_layout(&self) -> CanvasLayout {
        CanvasLayout {
            area: screen_layout(self.area).canvas,
            scroll: self.scroll,
            total_columns: self.editor.calendar().total_columns,
        }
    }

    fn selected_sprite(&self) -> Option<&'static Sprite> {
        sprites::catalog().get(self.sprite_index)
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    // ========== events ==========

    /// Handle keyboard and mouse events
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            _ => {}
        }
        self.refresh_ghost();
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.show_help {
            if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc) {
                self.show_help = false;
            }
            return;
        }

        if self.mode == Mode::Text {
            self.handle_text_key(key.code);
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Esc if self.mode == Mode::Paint => self.should_quit = true,
            KeyCode::Esc => self.set_mode(Mode::Paint),
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Left | KeyCode::Char('h') => self.move_cursor(0, -1),
            KeyCode::Right | KeyCode::Char('l') => self.move_cursor(0, 1),
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1, 0),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1, 0),
            KeyCode::Char('u') => {
                if self.editor.can_undo() {
                    self.editor.undo();
                    self.clamp_cursor();
                    self.set_status("Undone");
                } else {
                    self.set_status("Nothing to undo");
                }
            }
            KeyCode::Char('s') => {
                let next = if self.mode == Mode::Stamp {
                    Mode::Paint
                } else {
                    Mode::Stamp
                };
                self.set_mode(next);
            }
            KeyCode::Char('t') => self.set_mode(Mode::Text),
            code if self.mode == Mode::Stamp => self.handle_stamp_key(code),
            code => self.handle_paint_key(code),
        }
    }

    fn handle_paint_key(&mut self, code: KeyCode) {
        let (row, col) = self.cursor;
        match code {
            KeyCode::Char(c @ '0'..='4') => {
                self.brush = c as u8 - b'0';
                self.paint_at(row, col, self.brush);
            }
            KeyCode::Enter => self.paint_at(row, col, self.brush),
            KeyCode::Char(' ') => {
                self.editor.cycle_cell(row, col);
                self.editor.end_stroke();
            }
            KeyCode::Char('f') => {
                self.editor.fill_grid(self.brush as i32);
                self.set_status(format!("Filled with level {}", self.brush));
            }
            KeyCode::Char('c') => {
                self.editor.clear_grid();
                self.set_status("Cleared");
            }
            KeyCode::Char('e') => self.export_and_report(TemplateFormat::Txt),
            KeyCode::Char('E') => self.export_and_report(TemplateFormat::Toml),
            _ => {}
        }
    }

    fn handle_stamp_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Tab => self.sprite_index = sprite_bar::next_index(self.sprite_index),
            KeyCode::BackTab => self.sprite_index = sprite_bar::prev_index(self.sprite_index),
            KeyCode::Enter | KeyCode::Char(' ') => self.stamp_sprite_at(self.cursor.1),
            _ => {}
        }
    }

    fn handle_text_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => self.set_mode(Mode::Paint),
            KeyCode::Left => self.move_cursor(0, -1),
            KeyCode::Right => self.move_cursor(0, 1),
            KeyCode::Backspace => {
                self.text_input.pop();
            }
            KeyCode::Enter => self.stamp_text_at(self.cursor.1),
            KeyCode::Tab => {
                if self.check_text() {
                    self.editor
                        .load_full_text(&self.renderer, &self.text_input, &self.render_options);
                    self.clamp_cursor();
                    self.set_status(format!("Replaced grid with \"{}\"", self.text_input));
                }
            }
            KeyCode::Char(c) => self.text_input.push(c),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let layout = self.canvas_layout();
        let cell = layout.cell_at(mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Down(button) => {
                let Some((row, col)) = cell else {
                    return;
                };
                self.cursor = (row, col);
                match (self.mode, button) {
                    (Mode::Stamp, MouseButton::Left) => self.stamp_sprite_at(col),
                    (Mode::Text, MouseButton::Left) => self.stamp_text_at(col),
                    (Mode::Paint, MouseButton::Left) => {
                        self.mouse_down = true;
                        self.editor.begin_stroke();
                        self.editor.set_cell(row, col, self.brush as i32);
                    }
                    (Mode::Paint, MouseButton::Right) => {
                        self.editor.set_cell(row, col, 0);
                        self.editor.end_stroke();
                    }
                    _ => {}
                }
            }
            MouseEventKind::Drag(MouseButton::Left) if self.mouse_down => {
                if let Some((row, col)) = cell {
                    self.cursor = (row, col);
                    self.editor.set_cell(row, col, self.brush as i32);
                }
            }
            MouseEventKind::Up(_) => {
                if self.mouse_down {
                    self.mouse_down = false;
                    self.editor.end_stroke();
                }
            }
            MouseEventKind::Moved => {
                if let Some(pos) = cell {
                    self.cursor = pos;
                }
            }
            MouseEventKind::ScrollDown => self.scroll_by(1),
            MouseEventKind::ScrollUp => self.scroll_by(-1),
            _ => {}
        }
    }

    // ========== actions ==========

    fn set_mode(&mut self, mode: Mode) {
        log::debug!("mode {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
        if mode != Mode::Text {
            self.text_input.clear();
        }
    }

    /// Single-cell edit recorded as its own undo step
    fn paint_at(&mut self, row: usize, col: usize, level: u8) {
        self.editor.set_cell(row, col, level as i32);
        self.editor.end_stroke();
    }

    fn stamp_sprite_at(&mut self, col: usize) {
        if let Some(sprite) = self.selected_sprite() {
            self.editor.stamp(&sprite.grid, 0, col as isize);
            self.set_status(format!("Stamped {}", sprite.name));
        }
    }

    /// Whether the text buffer renders; reports the failure otherwise
    fn check_text(&mut self) -> bool {
        match self.renderer.render(&self.text_input, &self.render_options) {
            Ok(_) => true,
            Err(e) => {
                self.set_status(e.to_string());
                false
            }
        }
    }

    fn stamp_text_at(&mut self, col: usize) {
        if !self.check_text() {
            return;
        }
        if let Some(fitted) =
            self.editor
                .load_from_text(&self.renderer, &self.text_input, &self.render_options)
        {
            if fitted.grid.iter().all(|row| row.iter().all(|&v| v == 0)) {
                self.set_status("Text renders blank");
                return;
            }
        }
        self.editor.apply_text(
            &self.renderer,
            &self.text_input,
            col as isize,
            &self.render_options,
        );
        self.set_status(format!("Stamped \"{}\"", self.text_input));
        self.text_input.clear();
    }

    fn export_and_report(&mut self, format: TemplateFormat) {
        match self.export(format) {
            Ok(path) => self.set_status(format!("Exported {}", path.display())),
            Err(e) => {
                log::error!("Export failed: {:#}", e);
                self.set_status(format!("Export failed: {}", e));
            }
        }
    }

    fn export(&self, format: TemplateFormat) -> anyhow::Result<PathBuf> {
        let content = match format {
            TemplateFormat::Txt => self.editor.export_txt(),
            TemplateFormat::Toml => self.editor.export_toml(),
        };
        fs::create_dir_all(&self.export_dir)
            .with_context(|| format!("creating {}", self.export_dir.display()))?;
        let path = self.export_dir.join(format!(
            "{}.{}",
            sanitize_file_name(self.editor.name()),
            format.extension()
        ));
        fs::write(&path, content + "\n").with_context(|| format!("writing {}", path.display()))?;
        log::info!("Exported {}", path.display());
        Ok(path)
    }

    fn move_cursor(&mut self, d_row: isize, d_col: isize) {
        let width = self.editor.width();
        if width == 0 {
            return;
        }
        let (row, col) = self.cursor;
        self.cursor = (
            row.saturating_add_signed(d_row).min(ROWS - 1),
            col.saturating_add_signed(d_col).min(width - 1),
        );
        self.follow_cursor();
    }

    fn clamp_cursor(&mut self) {
        let max_col = self.editor.width().saturating_sub(1);
        self.cursor.1 = self.cursor.1.min(max_col);
        self.follow_cursor();
    }

    /// Columns that fit on screen, independent of the scroll offset
    fn fitting_columns(&self) -> usize {
        CanvasLayout {
            scroll: 0,
            ..self.canvas_layout()
        }
        .visible_columns()
    }

    fn follow_cursor(&mut self) {
        let total = self.editor.calendar().total_columns;
        self.scroll = scroll_to_show(self.scroll, self.cursor.1 + 1, self.fitting_columns(), total);
    }

    fn scroll_by(&mut self, delta: isize) {
        let total = self.editor.calendar().total_columns;
        let max = total.saturating_sub(self.fitting_columns());
        self.scroll = self.scroll.saturating_add_signed(delta).min(max);
    }

    /// Preview what Enter would place at the cursor
    fn refresh_ghost(&mut self) {
        let col = self.cursor.1 as isize;
        match self.mode {
            Mode::Paint => self.editor.clear_ghost_preview(),
            Mode::Stamp => match self.selected_sprite() {
                Some(sprite) => self.editor.set_ghost_preview(&sprite.grid, col),
                None => self.editor.clear_ghost_preview(),
            },
            Mode::Text => match self.renderer.render(&self.text_input, &self.render_options) {
                Ok(rendered) => self.editor.set_ghost_preview(&rendered.grid, col),
                Err(_) => self.editor.clear_ghost_preview(),
            },
        }
    }

    /// Draw the application
    pub fn draw(&self, frame: &mut Frame) {
        frame.render_widget(self, frame.area());
    }

    fn hovered_date(&self) -> NaiveDate {
        let (row, col) = self.cursor;
        self.editor.calendar().date_for_template_cell(row, col)
    }

    fn render_title(&self, area: Rect, buf: &mut Buffer) {
        let muted = Style::default().fg(self.theme.muted());
        let line = Line::from(vec![
            Span::styled(
                " ghstamp ",
                Style::default()
                    .fg(self.theme.accent())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                self.editor.name().to_string(),
                Style::default().fg(self.theme.text()),
            ),
            Span::styled(
                format!(
                    "  {} columns · anchor {}",
                    self.editor.width(),
                    format_anchor_date(self.editor.calendar().anchor_date)
                ),
                muted,
            ),
        ]);
        Paragraph::new(line).render(area, buf);
    }

    fn render_mode_line(&self, area: Rect, buf: &mut Buffer) {
        let indented = Rect {
            x: area.x + LABEL_WIDTH,
            width: area.width.saturating_sub(LABEL_WIDTH),
            ..area
        };
        match self.mode {
            Mode::Stamp => SpriteBar::new(self.sprite_index, self.theme).render(indented, buf),
            Mode::Text => {
                let line = Line::from(vec![
                    Span::styled("Text: ", Style::default().fg(self.theme.muted())),
                    Span::styled(
                        format!("{}_", self.text_input),
                        Style::default().fg(self.theme.text()),
                    ),
                ]);
                Paragraph::new(line).render(indented, buf);
            }
            Mode::Paint => {
                let hint = "s stamp · t text · e export · u undo · ? help";
                buf.set_string(
                    indented.x,
                    indented.y,
                    hint,
                    Style::default().fg(self.theme.muted()),
                );
            }
        }
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let layout = screen_layout(area);

        self.render_title(layout.title, buf);

        let (row, col) = self.cursor;
        Canvas::new(&self.editor, self.theme)
            .cursor(row, col)
            .scroll(self.scroll)
            .render(layout.canvas, buf);

        let legend_area = Rect {
            x: layout.legend.x + LABEL_WIDTH,
            width: Legend::min_width().min(layout.legend.width.saturating_sub(LABEL_WIDTH)),
            ..layout.legend
        };
        Legend::new(self.theme).with_chars().render(legend_area, buf);

        self.render_mode_line(layout.mode_line, buf);

        StatusBar::new(self.mode.label(), self.brush, self.theme)
            .hovered(Some(self.hovered_date()))
            .undo_depth(self.editor.undo_depth())
            .message(self.status.as_deref())
            .render(layout.status, buf);

        // Render help popup overlay if active
        if self.show_help {
            let popup_area = HelpPopup::centered_area(area);
            HelpPopup::new(self.theme).render(popup_area, buf);
        }
    }
}

/// Run the TUI editor for the calendar ending at `date`
pub fn run(config: &Config, date: NaiveDate, open: Option<&Path>) -> anyhow::Result<()> {
    // Theme detection must happen before raw mode
    let theme = Theme::detect();

    let calendar = compute_calendar_grid(date);
    let mut editor = Editor::new(calendar, config.default_name.clone());
    if let Some(path) = open {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        editor
            .import_file(&content, &path.to_string_lossy())
            .with_context(|| format!("importing {}", path.display()))?;
    }
    log::info!(
        "Starting editor: {} usable columns, anchor {}",
        calendar.usable_columns,
        format_anchor_date(calendar.anchor_date)
    );

    let mut app = App::new(editor, config, theme);
    if let Some(path) = open {
        app.set_status(format!("Opened {}", path.display()));
    }

    let mut terminal = ratatui::init();
    let result = crossterm::execute!(io::stdout(), EnableMouseCapture)
        .map_err(anyhow::Error::from)
        .and_then(|_| run_app(&mut terminal, &mut app));
    let _ = crossterm::execute!(io::stdout(), DisableMouseCapture);
    ratatui::restore();
    result
}

fn run_app(terminal: &mut DefaultTerminal, app: &mut App) -> anyhow::Result<()> {
    loop {
        let size = terminal.size()?;
        app.set_area(Rect::new(0, 0, size.width, size.height));
        terminal.draw(|frame| app.draw(frame))?;

        if app.should_quit() {
            break;
        }

        if event::poll(Duration::from_millis(100))? {
            app.handle_event(event::read()?);
        }
    }

    Ok(())
}
