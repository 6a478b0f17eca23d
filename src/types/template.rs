//! Template model: a 7-row grid of intensity levels

use serde::{Deserialize, Serialize};

/// Rows in every template (one per weekday, Sunday first)
pub const ROWS: usize = 7;

/// Highest intensity level
pub const MAX_LEVEL: u8 = 4;

/// Row-major intensity grid
pub type Grid = Vec<Vec<u8>>;

/// Clamp an arbitrary level into [0, MAX_LEVEL]
pub fn clamp_level(level: i32) -> u8 {
    level.clamp(0, MAX_LEVEL as i32) as u8
}

/// Export character for an intensity level
pub fn level_to_char(level: u8) -> char {
    match level {
        0 => '.',
        1 => '-',
        2 => ':',
        3 => '=',
        4 => '#',
        _ => '.',
    }
}

/// Intensity level for an import character (unknown characters are 0)
pub fn char_to_level(c: char) -> u8 {
    match c {
        '.' | ' ' => 0,
        '-' => 1,
        ':' => 2,
        '=' => 3,
        '#' => 4,
        _ => 0,
    }
}

/// Editable pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub name: String,
    pub grid: Grid,
    pub width: usize,
    pub height: usize,
}

impl Template {
    /// All-zero template of the given width
    pub fn empty(width: usize, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            grid: vec![vec![0; width]; ROWS],
            width,
            height: ROWS,
        }
    }

    /// Build a template from arbitrary rows.
    ///
    /// Missing rows are added as zeros, extra rows are dropped, short rows are
    /// zero-padded to the widest row and every value is clamped.
    pub fn from_grid(name: impl Into<String>, rows: &[Vec<u8>]) -> Self {
        let width = rows.iter().take(ROWS).map(Vec::len).max().unwrap_or(0);
        let grid = (0..ROWS)
            .map(|r| {
                let mut row: Vec<u8> = rows
                    .get(r)
                    .map(|src| src.iter().map(|&v| v.min(MAX_LEVEL)).collect())
                    .unwrap_or_default();
                row.resize(width, 0);
                row
            })
            .collect();
        Self {
            name: name.into(),
            grid,
            width,
            height: ROWS,
        }
    }

    /// Cell value, or None when out of range
    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        self.grid.get(row).and_then(|r| r.get(col)).copied()
    }
}

impl Default for Template {
    fn default() -> Self {
        Self::empty(10, "untitled")
    }
}
