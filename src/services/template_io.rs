//! Plain-text and structured (TOML subset) template serialization

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::types::{char_to_level, level_to_char, GhstampError, Result, Template, ROWS};

/// Name used when an import carries no name of its own
pub const IMPORTED_NAME: &str = "imported";

/// Legend declaration written into structured exports
const LEGEND_CHARS: &str = ".:-=#";

/// Export/import file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemplateFormat {
    #[default]
    Txt,
    Toml,
}

impl TemplateFormat {
    /// Route by file name: `.toml` is structured, everything else plain text
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        if path.as_ref().to_string_lossy().ends_with(".toml") {
            Self::Toml
        } else {
            Self::Txt
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Txt => "txt",
            Self::Toml => "toml",
        }
    }
}

/// One line per row, one character per cell
pub fn to_plain_text(template: &Template) -> String {
    template
        .grid
        .iter()
        .map(|row| row.iter().map(|&level| level_to_char(level)).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse a plain-text grid; exactly 7 non-empty lines are required
pub fn from_plain_text(content: &str, name: &str) -> Result<Template> {
    let lines: Vec<&str> = content
        .trim()
        .lines()
        .filter(|line| !line.is_empty())
        .collect();

    if lines.len() != ROWS {
        return Err(GhstampError::Format(format!(
            "Template must have exactly {} rows, got {}",
            ROWS,
            lines.len()
        )));
    }

    let width = lines
        .iter()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0);

    let grid = lines
        .iter()
        .map(|line| {
            let mut row: Vec<u8> = line.chars().map(char_to_level).collect();
            row.resize(width, 0);
            row
        })
        .collect();

    Ok(Template {
        name: name.to_string(),
        grid,
        width,
        height: ROWS,
    })
}

/// Structured export; the `[meta]` section is only written with an anchor date
pub fn to_structured_text(template: &Template, anchor_date: Option<&str>) -> String {
    let grid_data = to_plain_text(template);
    let meta = match anchor_date {
        Some(anchor) => format!(
            "[meta]\nanchor_date = \"{}\"\ncolumns = {}\nrows = {}\n\n",
            anchor, template.width, template.height
        ),
        None => String::new(),
    };

    format!(
        "{meta}[template]\nname = \"{name}\"\n\n[legend]\nchars = \"{legend}\"\n\n[grid]\ndata = \"\"\"\n{grid_data}\n\"\"\"\n",
        name = template.name,
        legend = LEGEND_CHARS,
    )
}

fn name_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"name\s*=\s*"([^"]+)""#).expect("valid regex"))
}

fn data_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"data\s*=\s*"""([\s\S]*?)""""#).expect("valid regex"))
}

/// Parse this program's own structured export.
///
/// Only `name` and the triple-quoted `data` block are read; every other key
/// is informational. A missing `data` block parses as an empty grid and so
/// fails the row-count check.
pub fn from_structured_text(content: &str) -> Result<Template> {
    let name = name_pattern()
        .captures(content)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or(IMPORTED_NAME);

    let grid_data = data_pattern()
        .captures(content)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .unwrap_or("");

    from_plain_text(grid_data, name)
}

/// Parse file contents, choosing the parser from the file name
pub fn parse_file_contents(content: &str, filename: &str) -> Result<Template> {
    match TemplateFormat::from_path(filename) {
        TemplateFormat::Toml => from_structured_text(content),
        TemplateFormat::Txt => from_plain_text(content, IMPORTED_NAME),
    }
}
