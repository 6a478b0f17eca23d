//! Type definitions for ghstamp

mod error;
mod sprite;
mod template;

pub use error::*;
pub use sprite::Sprite;
pub use template::*;
