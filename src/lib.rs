//! Pixel-art editor for GitHub contribution calendars

pub mod cli;
pub mod services;
pub mod tui;
pub mod types;
