//! Named read-only stamp pattern

use super::Grid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprite {
    pub name: &'static str,
    pub width: usize,
    pub height: usize,
    pub grid: Grid,
}
