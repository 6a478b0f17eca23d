//! Grid editor: the live template, stroke-coalesced undo and stamping
//!
//! One `Editor` exists per session and is handed by reference to whichever
//! front end drives it. Every operation is a synchronous call.

use std::collections::BTreeMap;

use crate::services::calendar::{format_anchor_date, CalendarGrid};
use crate::services::font::{RenderOptions, TextRenderer};
use crate::services::history::UndoStack;
use crate::services::template_io::{
    from_plain_text, from_structured_text, to_plain_text, to_structured_text, TemplateFormat,
    IMPORTED_NAME,
};
use crate::types::{clamp_level, Grid, Result, Template, MAX_LEVEL, ROWS};

/// Uncommitted stamp overlay: (row, col) -> level
pub type GhostMap = BTreeMap<(usize, usize), u8>;

/// Whether a paint stroke is open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrokeState {
    #[default]
    Idle,
    InStroke,
}

/// Truncate or zero-pad every row to `target_width`; height is forced to 7
pub fn fit_to_calendar(template: &Template, target_width: usize) -> Template {
    let grid = (0..ROWS)
        .map(|r| {
            let mut row: Vec<u8> = template
                .grid
                .get(r)
                .map(|src| src.iter().take(target_width).copied().collect())
                .unwrap_or_default();
            row.resize(target_width, 0);
            row
        })
        .collect();

    Template {
        name: template.name.clone(),
        grid,
        width: target_width,
        height: ROWS,
    }
}

pub struct Editor {
    calendar: CalendarGrid,
    template: Template,
    undo_stack: UndoStack,
    stroke: StrokeState,
    ghost: GhostMap,
}

impl Editor {
    /// Empty template sized to the calendar's usable columns
    pub fn new(calendar: CalendarGrid, name: impl Into<String>) -> Self {
        Self {
            template: Template::empty(calendar.usable_columns, name),
            calendar,
            undo_stack: UndoStack::new(),
            stroke: StrokeState::Idle,
            ghost: GhostMap::new(),
        }
    }

    pub fn calendar(&self) -> &CalendarGrid {
        &self.calendar
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn grid(&self) -> &Grid {
        &self.template.grid
    }

    pub fn width(&self) -> usize {
        self.template.width
    }

    pub fn name(&self) -> &str {
        &self.template.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.template.name = name.into();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn stroke_state(&self) -> StrokeState {
        self.stroke
    }

    fn push_undo(&mut self) {
        self.undo_stack.push(self.template.grid.clone());
    }

    // ========== cell editing ==========

    /// Open a stroke, recording one snapshot if none is open yet
    pub fn begin_stroke(&mut self) {
        if self.stroke == StrokeState::Idle {
            self.push_undo();
            self.stroke = StrokeState::InStroke;
        }
    }

    pub fn end_stroke(&mut self) {
        self.stroke = StrokeState::Idle;
    }

    /// Set one cell; out-of-range coordinates are ignored
    pub fn set_cell(&mut self, row: usize, col: usize, level: i32) {
        if row >= ROWS || col >= self.template.width {
            return;
        }
        self.begin_stroke();
        if let Some(cell) = self.template.grid.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = clamp_level(level);
        }
    }

    /// Advance a cell to the next level, wrapping 4 -> 0
    pub fn cycle_cell(&mut self, row: usize, col: usize) {
        let current = self.template.get(row, col).unwrap_or(0);
        self.set_cell(row, col, (current as i32 + 1) % (MAX_LEVEL as i32 + 1));
    }

    pub fn clear_grid(&mut self) {
        self.fill_with(0);
    }

    pub fn fill_grid(&mut self, level: i32) {
        self.fill_with(clamp_level(level));
    }

    fn fill_with(&mut self, level: u8) {
        self.push_undo();
        for row in &mut self.template.grid {
            row.iter_mut().for_each(|cell| *cell = level);
        }
    }

    /// Restore the most recent snapshot, if any
    pub fn undo(&mut self) {
        if let Some(prev) = self.undo_stack.pop() {
            let width = prev.first().map(Vec::len).unwrap_or(self.template.width);
            log::debug!("undo: restoring {}x{} snapshot", prev.len(), width);
            self.template.grid = prev;
            self.template.width = width;
        }
    }

    /// Overlay `pattern` at the given offset; cells landing outside the grid
    /// are dropped
    pub fn stamp(&mut self, pattern: &[Vec<u8>], start_row: isize, start_col: isize) {
        self.push_undo();
        let width = self.template.width;
        for (r, src_row) in pattern.iter().enumerate() {
            let Some(tr) = offset_index(start_row, r, ROWS) else {
                continue;
            };
            for (c, &value) in src_row.iter().enumerate() {
                if let Some(tc) = offset_index(start_col, c, width) {
                    self.template.grid[tr][tc] = value.min(MAX_LEVEL);
                }
            }
        }
    }

    // ========== ghost preview ==========

    /// Replace the preview with the non-zero cells of `pattern` that land on
    /// the canvas
    pub fn set_ghost_preview(&mut self, pattern: &[Vec<u8>], start_col: isize) {
        let width = self.template.width;
        let mut ghost = GhostMap::new();
        for (r, row) in pattern.iter().enumerate().take(ROWS) {
            for (c, &value) in row.iter().enumerate() {
                if value == 0 {
                    continue;
                }
                if let Some(tc) = offset_index(start_col, c, width) {
                    ghost.insert((r, tc), value.min(MAX_LEVEL));
                }
            }
        }
        self.ghost = ghost;
    }

    pub fn clear_ghost_preview(&mut self) {
        self.ghost.clear();
    }

    pub fn ghost_cells(&self) -> &GhostMap {
        &self.ghost
    }

    pub fn ghost_at(&self, row: usize, col: usize) -> Option<u8> {
        self.ghost.get(&(row, col)).copied()
    }

    // ========== text rendering ==========

    /// Render text and fit it to the calendar without touching the editor.
    /// Failures are logged and yield `None`.
    pub fn load_from_text(
        &self,
        renderer: &dyn TextRenderer,
        text: &str,
        options: &RenderOptions,
    ) -> Option<Template> {
        match renderer.render(text, options) {
            Ok(rendered) => Some(fit_to_calendar(&rendered, self.calendar.usable_columns)),
            Err(e) => {
                log::error!("Failed to render text: {}", e);
                None
            }
        }
    }

    /// Stamp rendered text at `start_col`; failures are logged and ignored
    pub fn apply_text(
        &mut self,
        renderer: &dyn TextRenderer,
        text: &str,
        start_col: isize,
        options: &RenderOptions,
    ) {
        match renderer.render(text, options) {
            Ok(rendered) => self.stamp(&rendered.grid, 0, start_col),
            Err(e) => log::error!("Failed to apply text: {}", e),
        }
    }

    /// Replace the whole template with rendered text; failures are logged and
    /// leave the template unchanged
    pub fn load_full_text(
        &mut self,
        renderer: &dyn TextRenderer,
        text: &str,
        options: &RenderOptions,
    ) {
        self.push_undo();
        match renderer.render(text, options) {
            Ok(rendered) => self.replace_fitted(&rendered),
            Err(e) => log::error!("Failed to render text: {}", e),
        }
    }

    // ========== import / export ==========

    pub fn export_txt(&self) -> String {
        to_plain_text(&self.template)
    }

    pub fn export_toml(&self) -> String {
        let anchor = format_anchor_date(self.calendar.anchor_date);
        to_structured_text(&self.template, Some(&anchor))
    }

    pub fn import_txt(&mut self, content: &str) -> Result<()> {
        self.push_undo();
        match from_plain_text(content, IMPORTED_NAME) {
            Ok(parsed) => {
                log::info!("Imported TXT template ({} columns)", parsed.width);
                self.replace_fitted(&parsed);
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to import TXT: {}", e);
                Err(e)
            }
        }
    }

    pub fn import_toml(&mut self, content: &str) -> Result<()> {
        self.push_undo();
        match from_structured_text(content) {
            Ok(parsed) => {
                log::info!(
                    "Imported TOML template '{}' ({} columns)",
                    parsed.name,
                    parsed.width
                );
                self.replace_fitted(&parsed);
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to import TOML: {}", e);
                Err(e)
            }
        }
    }

    /// Import file contents, choosing the parser from the file name
    pub fn import_file(&mut self, content: &str, filename: &str) -> Result<()> {
        match TemplateFormat::from_path(filename) {
            TemplateFormat::Toml => self.import_toml(content),
            TemplateFormat::Txt => self.import_txt(content),
        }
    }

    fn replace_fitted(&mut self, template: &Template) {
        self.template = fit_to_calendar(template, self.calendar.usable_columns);
    }
}

/// `base + offset` when it lands in `[0, limit)`
fn offset_index(base: isize, offset: usize, limit: usize) -> Option<usize> {
    let idx = base.checked_add(offset as isize)?;
    usize::try_from(idx).ok().filter(|&i| i < limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::calendar::compute_calendar_grid;
    use crate::services::font::BitmapFont;
    use crate::services::history::UNDO_MAX;
    use crate::services::sprites;
    use crate::types::GhstampError;
    use chrono::NaiveDate;

    fn calendar() -> CalendarGrid {
        // 51 usable columns
        compute_calendar_grid(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap())
    }

    /// Editor whose canvas is `width` columns wide
    fn editor_with_width(width: usize) -> Editor {
        let mut cal = calendar();
        cal.usable_columns = width;
        cal.total_columns = width + 2;
        Editor::new(cal, "test")
    }

    fn seven_rows(row: &str) -> String {
        vec![row; 7].join("\n")
    }

    // ========== construction ==========

    #[test]
    fn test_new_editor_sized_to_calendar() {
        let editor = Editor::new(calendar(), "my-design");
        assert_eq!(editor.width(), 51);
        assert_eq!(editor.grid().len(), ROWS);
        assert_eq!(editor.name(), "my-design");
        assert!(!editor.can_undo());
        assert_eq!(editor.stroke_state(), StrokeState::Idle);
    }

    #[test]
    fn test_set_name() {
        let mut editor = editor_with_width(3);
        editor.set_name("renamed");
        assert_eq!(editor.name(), "renamed");
        assert!(!editor.can_undo());
    }

    // ========== set_cell / strokes ==========

    #[test]
    fn test_set_cell_clamps() {
        let mut editor = editor_with_width(5);
        editor.set_cell(0, 0, 9);
        editor.set_cell(1, 1, -2);
        editor.set_cell(2, 2, 3);
        assert_eq!(editor.grid()[0][0], 4);
        assert_eq!(editor.grid()[1][1], 0);
        assert_eq!(editor.grid()[2][2], 3);
    }

    #[test]
    fn test_set_cell_out_of_range_is_noop() {
        let mut editor = editor_with_width(5);
        editor.set_cell(7, 0, 4);
        editor.set_cell(0, 5, 4);
        assert!(!editor.can_undo());
        assert_eq!(editor.stroke_state(), StrokeState::Idle);
        assert!(editor.grid().iter().flatten().all(|&v| v == 0));
    }

    #[test]
    fn test_set_cell_then_undo_restores() {
        let mut editor = editor_with_width(10);
        editor.set_cell(2, 3, 1);
        editor.end_stroke();
        let before = editor.grid().clone();

        for (row, col, level) in [(0, 0, 4), (6, 9, 2), (2, 3, 0), (3, 5, 3)] {
            editor.set_cell(row, col, level);
            editor.end_stroke();
            editor.undo();
            assert_eq!(editor.grid(), &before);
        }
    }

    #[test]
    fn test_stroke_coalesces_into_one_snapshot() {
        let mut editor = editor_with_width(10);
        let before = editor.grid().clone();

        editor.begin_stroke();
        for col in 0..5 {
            editor.set_cell(0, col, 4);
        }
        editor.end_stroke();

        assert_eq!(editor.undo_depth(), 1);
        editor.undo();
        assert_eq!(editor.grid(), &before);
        assert!(!editor.can_undo());
    }

    #[test]
    fn test_first_mutation_opens_stroke() {
        let mut editor = editor_with_width(10);
        editor.set_cell(0, 0, 1);
        assert_eq!(editor.stroke_state(), StrokeState::InStroke);
        editor.set_cell(0, 1, 1);
        assert_eq!(editor.undo_depth(), 1);

        editor.end_stroke();
        editor.set_cell(0, 2, 1);
        assert_eq!(editor.undo_depth(), 2);
    }

    #[test]
    fn test_cycle_cell_wraps() {
        let mut editor = editor_with_width(3);
        for expected in [1, 2, 3, 4, 0] {
            editor.cycle_cell(0, 0);
            assert_eq!(editor.grid()[0][0], expected);
        }
        // all five cycles were one stroke
        assert_eq!(editor.undo_depth(), 1);
    }

    #[test]
    fn test_cycle_cell_out_of_range_is_noop() {
        let mut editor = editor_with_width(3);
        editor.cycle_cell(0, 3);
        assert!(!editor.can_undo());
    }

    // ========== bulk operations ==========

    #[test]
    fn test_fill_and_clear() {
        let mut editor = editor_with_width(4);
        editor.fill_grid(4);
        assert!(editor.grid().iter().flatten().all(|&v| v == 4));
        editor.fill_grid(7);
        assert!(editor.grid().iter().flatten().all(|&v| v == 4));
        editor.fill_grid(2);
        assert!(editor.grid().iter().flatten().all(|&v| v == 2));
        editor.clear_grid();
        assert!(editor.grid().iter().flatten().all(|&v| v == 0));
        assert_eq!(editor.undo_depth(), 4);

        editor.undo();
        assert!(editor.grid().iter().flatten().all(|&v| v == 2));
    }

    #[test]
    fn test_undo_empty_is_noop() {
        let mut editor = editor_with_width(4);
        editor.undo();
        assert_eq!(editor.width(), 4);
        assert!(editor.grid().iter().flatten().all(|&v| v == 0));
    }

    #[test]
    fn test_undo_capacity() {
        let mut editor = editor_with_width(4);
        for i in 0..60 {
            editor.fill_grid(i % 5);
        }
        assert_eq!(editor.undo_depth(), UNDO_MAX);

        let mut undone = 0;
        while editor.can_undo() {
            editor.undo();
            undone += 1;
        }
        assert_eq!(undone, 50);
        // the oldest surviving snapshot is the state before mutation #11 (fill 0)
        assert!(editor.grid().iter().flatten().all(|&v| v == 4));
    }

    #[test]
    fn test_snapshots_are_not_aliased() {
        let mut editor = editor_with_width(3);
        editor.fill_grid(1);
        editor.set_cell(0, 0, 4);
        editor.end_stroke();
        editor.undo();
        assert_eq!(editor.grid()[0][0], 1);
        editor.undo();
        assert_eq!(editor.grid()[0][0], 0);
    }

    // ========== stamp ==========

    #[test]
    fn test_stamp_clips_to_right_edge() {
        let mut editor = editor_with_width(10);
        let heart = sprites::find("Heart").unwrap();
        editor.stamp(&heart.grid, 0, 8);

        for (r, row) in editor.grid().iter().enumerate() {
            assert!(row[..8].iter().all(|&v| v == 0), "row {} touched", r);
            assert_eq!(&row[8..], &heart.grid[r][..2]);
        }
        assert_eq!(editor.undo_depth(), 1);
    }

    #[test]
    fn test_stamp_negative_offset() {
        let mut editor = editor_with_width(10);
        let pattern = vec![vec![1, 2, 3]; 3];
        editor.stamp(&pattern, -1, -2);
        assert_eq!(editor.grid()[0][0], 3);
        assert_eq!(editor.grid()[1][0], 3);
        assert_eq!(editor.grid()[2][0], 0);
        assert_eq!(editor.grid()[0][1], 0);
    }

    #[test]
    fn test_stamp_overwrites_including_zero_and_clamps() {
        let mut editor = editor_with_width(4);
        editor.fill_grid(2);
        editor.stamp(&[vec![0, 9]], 3, 1);
        assert_eq!(editor.grid()[3], vec![2, 0, 4, 2]);
        editor.undo();
        assert_eq!(editor.grid()[3], vec![2, 2, 2, 2]);
    }

    #[test]
    fn test_stamp_entirely_outside_still_records_snapshot() {
        let mut editor = editor_with_width(4);
        editor.stamp(&[vec![4]], 0, 40);
        assert!(editor.grid().iter().flatten().all(|&v| v == 0));
        assert_eq!(editor.undo_depth(), 1);
    }

    // ========== ghost preview ==========

    #[test]
    fn test_ghost_preview_skips_zero_and_out_of_bounds() {
        let mut editor = editor_with_width(4);
        editor.set_ghost_preview(&[vec![0, 3, 4], vec![2]], 2);
        assert_eq!(editor.ghost_at(0, 3), Some(3));
        assert_eq!(editor.ghost_at(0, 2), None);
        assert_eq!(editor.ghost_at(1, 2), Some(2));
        assert_eq!(editor.ghost_cells().len(), 2);
        assert!(!editor.can_undo());
        assert!(editor.grid().iter().flatten().all(|&v| v == 0));
    }

    #[test]
    fn test_ghost_preview_replaced_and_cleared() {
        let mut editor = editor_with_width(4);
        editor.set_ghost_preview(&[vec![4]], 0);
        editor.set_ghost_preview(&[vec![4]], 1);
        assert_eq!(editor.ghost_at(0, 0), None);
        assert_eq!(editor.ghost_at(0, 1), Some(4));
        editor.clear_ghost_preview();
        assert!(editor.ghost_cells().is_empty());
    }

    #[test]
    fn test_ghost_preview_negative_start() {
        let mut editor = editor_with_width(4);
        editor.set_ghost_preview(&[vec![1, 2, 3]], -1);
        assert_eq!(editor.ghost_at(0, 0), Some(2));
        assert_eq!(editor.ghost_at(0, 1), Some(3));
    }

    // ========== fit_to_calendar ==========

    #[test]
    fn test_fit_pads_narrow_template() {
        let t = Template::from_grid("n", &[vec![4, 4]]);
        let fitted = fit_to_calendar(&t, 5);
        assert_eq!(fitted.width, 5);
        assert_eq!(fitted.height, ROWS);
        assert_eq!(fitted.grid[0], vec![4, 4, 0, 0, 0]);
        assert!(fitted.grid.iter().all(|r| r.len() == 5));
        assert_eq!(fitted.name, "n");
    }

    #[test]
    fn test_fit_truncates_wide_template() {
        let t = Template::from_grid("w", &[vec![1, 2, 3, 4]]);
        let fitted = fit_to_calendar(&t, 2);
        assert_eq!(fitted.grid[0], vec![1, 2]);
        assert_eq!(fitted.width, 2);
        // original untouched
        assert_eq!(t.width, 4);
    }

    // ========== text ==========

    #[test]
    fn test_load_from_text_does_not_mutate() {
        let editor = editor_with_width(20);
        let t = editor
            .load_from_text(&BitmapFont, "HI", &RenderOptions::default())
            .unwrap();
        assert_eq!(t.width, 20);
        assert_eq!(t.grid[1][0], 4);
        assert!(!editor.can_undo());

        assert!(editor
            .load_from_text(&BitmapFont, "@@", &RenderOptions::default())
            .is_none());
    }

    #[test]
    fn test_apply_text_stamps_at_column() {
        let mut editor = editor_with_width(20);
        editor.apply_text(&BitmapFont, "I", 5, &RenderOptions::default());
        assert_eq!(editor.grid()[1][5..8], [4, 4, 4]);
        assert_eq!(editor.grid()[1][4], 0);
        assert_eq!(editor.undo_depth(), 1);
    }

    #[test]
    fn test_apply_text_failure_swallowed() {
        let mut editor = editor_with_width(20);
        editor.apply_text(&BitmapFont, "", 0, &RenderOptions::default());
        assert!(!editor.can_undo());
        assert!(editor.grid().iter().flatten().all(|&v| v == 0));
    }

    #[test]
    fn test_load_full_text_replaces_template() {
        let mut editor = editor_with_width(20);
        editor.fill_grid(1);
        editor.load_full_text(&BitmapFont, "HI", &RenderOptions::default());
        assert_eq!(editor.width(), 20);
        assert_eq!(editor.name(), "HI");
        assert_eq!(editor.grid()[0], vec![0; 20]);
        assert_eq!(editor.undo_depth(), 2);

        editor.undo();
        assert!(editor.grid().iter().flatten().all(|&v| v == 1));
    }

    #[test]
    fn test_load_full_text_failure_keeps_state() {
        let mut editor = editor_with_width(6);
        editor.fill_grid(3);
        editor.load_full_text(&BitmapFont, "~", &RenderOptions::default());
        assert!(editor.grid().iter().flatten().all(|&v| v == 3));
        // the pre-render snapshot is still recorded
        assert_eq!(editor.undo_depth(), 2);
    }

    // ========== import / export ==========

    #[test]
    fn test_import_txt_fits_width() {
        let mut editor = editor_with_width(6);
        editor.import_txt(&seven_rows("##")).unwrap();
        assert_eq!(editor.width(), 6);
        assert_eq!(editor.grid()[0], vec![4, 4, 0, 0, 0, 0]);
        assert_eq!(editor.name(), IMPORTED_NAME);

        editor.import_txt(&seven_rows("=========")).unwrap();
        assert_eq!(editor.grid()[6], vec![3; 6]);
    }

    #[test]
    fn test_import_txt_error_propagates_and_keeps_template() {
        let mut editor = editor_with_width(6);
        editor.fill_grid(2);
        let err = editor.import_txt("##\n##").unwrap_err();
        assert!(matches!(err, GhstampError::Format(_)));
        assert!(editor.grid().iter().flatten().all(|&v| v == 2));
        assert_eq!(editor.width(), 6);
    }

    #[test]
    fn test_import_toml_uses_name() {
        let mut editor = editor_with_width(6);
        let content = format!(
            "[template]\nname = \"wave\"\n\n[grid]\ndata = \"\"\"\n{}\n\"\"\"\n",
            seven_rows("-:=#")
        );
        editor.import_toml(&content).unwrap();
        assert_eq!(editor.name(), "wave");
        assert_eq!(editor.grid()[3], vec![1, 2, 3, 4, 0, 0]);
    }

    #[test]
    fn test_import_file_routes_by_extension() {
        let mut editor = editor_with_width(4);
        let toml = format!("name = \"f\"\ndata = \"\"\"\n{}\n\"\"\"", seven_rows("#"));
        editor.import_file(&toml, "pattern.toml").unwrap();
        assert_eq!(editor.name(), "f");

        assert!(editor.import_file(&toml, "pattern.txt").is_err());
        editor.import_file(&seven_rows(":"), "pattern.txt").unwrap();
        assert_eq!(editor.grid()[0][0], 2);
    }

    #[test]
    fn test_export_round_trip_through_import() {
        let mut editor = editor_with_width(8);
        editor.stamp(&sprites::find("Star").unwrap().grid, 0, 1);
        let grid = editor.grid().clone();

        let txt = editor.export_txt();
        let toml = editor.export_toml();

        editor.clear_grid();
        editor.import_txt(&txt).unwrap();
        assert_eq!(editor.grid(), &grid);

        editor.clear_grid();
        editor.set_name("other");
        editor.import_toml(&toml).unwrap();
        assert_eq!(editor.grid(), &grid);
        assert_eq!(editor.name(), "test");
    }

    #[test]
    fn test_export_toml_has_anchor_date() {
        let editor = Editor::new(calendar(), "x");
        let toml = editor.export_toml();
        assert!(toml.contains("anchor_date = \"2023-06-18\""));
        assert!(toml.contains("columns = 51"));
    }

    #[test]
    fn test_undo_restores_width_after_import() {
        let mut editor = editor_with_width(4);
        editor.import_txt(&seven_rows("#")).unwrap();
        editor.undo();
        assert_eq!(editor.width(), 4);
    }
}
