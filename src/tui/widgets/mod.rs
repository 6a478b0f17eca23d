//! TUI widgets

pub mod canvas;
pub mod help;
pub mod legend;
pub mod sprite_bar;
pub mod status_bar;
