//! Calendar geometry, template editing and (de)serialization

pub mod calendar;
pub mod config;
pub mod editor;
pub mod font;
pub mod history;
pub mod sprites;
pub mod template_io;

pub use calendar::{compute_calendar_grid, CalendarGrid};
pub use config::Config;
pub use editor::{fit_to_calendar, Editor};
pub use font::{BitmapFont, RenderOptions, TextRenderer, VerticalAlign};
pub use history::UndoStack;
pub use template_io::TemplateFormat;
