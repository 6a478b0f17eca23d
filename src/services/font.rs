//! Text-to-pattern rendering with a built-in 3x5 bitmap font

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::{GhstampError, Result, Template, MAX_LEVEL, ROWS};

/// Glyph height in rows
const GLYPH_HEIGHT: usize = 5;

/// Where the glyph band sits inside the 7-row grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    Top,
    #[default]
    Center,
    Bottom,
}

impl VerticalAlign {
    /// First grid row occupied by the glyph band
    fn row_offset(self) -> usize {
        match self {
            Self::Top => 0,
            Self::Center => (ROWS - GLYPH_HEIGHT) / 2,
            Self::Bottom => ROWS - GLYPH_HEIGHT,
        }
    }
}

impl FromStr for VerticalAlign {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "top" => Ok(Self::Top),
            "center" | "middle" => Ok(Self::Center),
            "bottom" => Ok(Self::Bottom),
            other => Err(format!("invalid alignment '{}': use top, center or bottom", other)),
        }
    }
}

impl fmt::Display for VerticalAlign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Top => "top",
            Self::Center => "center",
            Self::Bottom => "bottom",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Blank columns between glyphs
    pub spacing: usize,
    pub align: VerticalAlign,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            spacing: 1,
            align: VerticalAlign::Center,
        }
    }
}

/// Converts a string into a 7-row intensity pattern
pub trait TextRenderer {
    fn render(&self, text: &str, options: &RenderOptions) -> Result<Template>;
}

/// Renderer backed by the built-in 3x5 glyph table
#[derive(Debug, Clone, Copy, Default)]
pub struct BitmapFont;

impl TextRenderer for BitmapFont {
    fn render(&self, text: &str, options: &RenderOptions) -> Result<Template> {
        if text.trim().is_empty() {
            return Err(GhstampError::Render("nothing to render".into()));
        }

        let glyphs = text
            .chars()
            .map(|c| {
                glyph(c.to_ascii_uppercase()).ok_or_else(|| {
                    GhstampError::Render(format!("unsupported character '{}'", c))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let offset = options.align.row_offset();
        let mut grid: Vec<Vec<u8>> = vec![Vec::new(); ROWS];

        for (i, glyph) in glyphs.iter().enumerate() {
            let glyph_width = glyph[0].len();
            for (r, row) in grid.iter_mut().enumerate() {
                if i > 0 {
                    row.extend(std::iter::repeat_n(0, options.spacing));
                }
                match r.checked_sub(offset).and_then(|g| glyph.get(g)) {
                    Some(line) => row.extend(
                        line.bytes()
                            .map(|b| if b == b'#' { MAX_LEVEL } else { 0 }),
                    ),
                    None => row.extend(std::iter::repeat_n(0, glyph_width)),
                }
            }
        }

        let width = grid[0].len();
        Ok(Template {
            name: text.to_string(),
            grid,
            width,
            height: ROWS,
        })
    }
}

type Glyph = [&'static str; GLYPH_HEIGHT];

/// Glyph rows for an uppercase character
fn glyph(c: char) -> Option<Glyph> {
    let g = match c {
        'A' => [".#.", "#.#", "###", "#.#", "#.#"],
        'B' => ["##.", "#.#", "##.", "#.#", "##."],
        'C' => [".##", "#..", "#..", "#..", ".##"],
        'D' => ["##.", "#.#", "#.#", "#.#", "##."],
        'E' => ["###", "#..", "##.", "#..", "###"],
        'F' => ["###", "#..", "##.", "#..", "#.."],
        'G' => [".##", "#..", "#.#", "#.#", ".##"],
        'H' => ["#.#", "#.#", "###", "#.#", "#.#"],
        'I' => ["###", ".#.", ".#.", ".#.", "###"],
        'J' => ["..#", "..#", "..#", "#.#", ".#."],
        'K' => ["#.#", "#.#", "##.", "#.#", "#.#"],
        'L' => ["#..", "#..", "#..", "#..", "###"],
        'M' => ["#.#", "###", "###", "#.#", "#.#"],
        'N' => ["##.", "#.#", "#.#", "#.#", "#.#"],
        'O' => [".#.", "#.#", "#.#", "#.#", ".#."],
        'P' => ["##.", "#.#", "##.", "#..", "#.."],
        'Q' => [".#.", "#.#", "#.#", "##.", ".##"],
        'R' => ["##.", "#.#", "##.", "#.#", "#.#"],
        'S' => [".##", "#..", ".#.", "..#", "##."],
        'T' => ["###", ".#.", ".#.", ".#.", ".#."],
        'U' => ["#.#", "#.#", "#.#", "#.#", "###"],
        'V' => ["#.#", "#.#", "#.#", "#.#", ".#."],
        'W' => ["#.#", "#.#", "###", "###", "#.#"],
        'X' => ["#.#", "#.#", ".#.", "#.#", "#.#"],
        'Y' => ["#.#", "#.#", ".#.", ".#.", ".#."],
        'Z' => ["###", "..#", ".#.", "#..", "###"],
        '0' => ["###", "#.#", "#.#", "#.#", "###"],
        '1' => [".#.", "##.", ".#.", ".#.", "###"],
        '2' => ["##.", "..#", ".#.", "#..", "###"],
        '3' => ["##.", "..#", ".#.", "..#", "##."],
        '4' => ["#.#", "#.#", "###", "..#", "..#"],
        '5' => ["###", "#..", "##.", "..#", "##."],
        '6' => [".##", "#..", "###", "#.#", "###"],
        '7' => ["###", "..#", ".#.", ".#.", ".#."],
        '8' => ["###", "#.#", "###", "#.#", "###"],
        '9' => ["###", "#.#", "###", "..#", "##."],
        ' ' => ["...", "...", "...", "...", "..."],
        '!' => ["#", "#", "#", ".", "#"],
        '?' => ["##.", "..#", ".#.", "...", ".#."],
        '.' => [".", ".", ".", ".", "#"],
        ',' => [".", ".", ".", "#", "#"],
        '-' => ["...", "...", "###", "...", "..."],
        ':' => [".", "#", ".", "#", "."],
        '\'' => ["#", "#", ".", ".", "."],
        '+' => ["...", ".#.", "###", ".#.", "..."],
        '=' => ["...", "###", "...", "###", "..."],
        '/' => ["..#", "..#", ".#.", "#..", "#.."],
        '#' => ["#.#", "###", "#.#", "###", "#.#"],
        '<' => ["..#", ".#.", "#..", ".#.", "..#"],
        _ => return None,
    };
    Some(g)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(text: &str, options: RenderOptions) -> Result<Template> {
        BitmapFont.render(text, &options)
    }

    #[test]
    fn test_single_glyph_centered() {
        let t = render("I", RenderOptions::default()).unwrap();
        assert_eq!(t.width, 3);
        assert_eq!(t.height, ROWS);
        assert_eq!(t.grid[0], vec![0, 0, 0]);
        assert_eq!(t.grid[1], vec![4, 4, 4]);
        assert_eq!(t.grid[2], vec![0, 4, 0]);
        assert_eq!(t.grid[5], vec![4, 4, 4]);
        assert_eq!(t.grid[6], vec![0, 0, 0]);
    }

    #[test]
    fn test_alignment_offsets() {
        let top = render("I", RenderOptions { spacing: 1, align: VerticalAlign::Top }).unwrap();
        assert_eq!(top.grid[0], vec![4, 4, 4]);
        assert_eq!(top.grid[5], vec![0, 0, 0]);

        let bottom = render(
            "I",
            RenderOptions {
                spacing: 1,
                align: VerticalAlign::Bottom,
            },
        )
        .unwrap();
        assert_eq!(bottom.grid[1], vec![0, 0, 0]);
        assert_eq!(bottom.grid[2], vec![4, 4, 4]);
        assert_eq!(bottom.grid[6], vec![4, 4, 4]);
    }

    #[test]
    fn test_spacing_between_glyphs() {
        let t = render("HI", RenderOptions::default()).unwrap();
        // 3 + 1 + 3
        assert_eq!(t.width, 7);
        assert!(t.grid.iter().all(|row| row.len() == 7 && row[3] == 0));

        let wide = render("HI", RenderOptions { spacing: 3, ..Default::default() }).unwrap();
        assert_eq!(wide.width, 9);

        let tight = render("HI", RenderOptions { spacing: 0, ..Default::default() }).unwrap();
        assert_eq!(tight.width, 6);
    }

    #[test]
    fn test_lowercase_is_uppercased() {
        let lower = render("hi", RenderOptions::default()).unwrap();
        let upper = render("HI", RenderOptions::default()).unwrap();
        assert_eq!(lower.grid, upper.grid);
        assert_eq!(lower.name, "hi");
    }

    #[test]
    fn test_narrow_punctuation() {
        let t = render("!", RenderOptions::default()).unwrap();
        assert_eq!(t.width, 1);
    }

    #[test]
    fn test_empty_text_fails() {
        let err = render("   ", RenderOptions::default()).unwrap_err();
        assert!(matches!(err, GhstampError::Render(_)));
    }

    #[test]
    fn test_unsupported_character_fails() {
        let err = render("A@B", RenderOptions::default()).unwrap_err();
        assert!(err.to_string().contains("'@'"));
    }

    #[test]
    fn test_glyph_table_consistent() {
        let all = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789 !?.,-:'+=/#<";
        for c in all.chars() {
            let g = glyph(c).unwrap_or_else(|| panic!("missing glyph {:?}", c));
            let w = g[0].len();
            assert!(g.iter().all(|row| row.len() == w), "ragged glyph {:?}", c);
        }
    }

    #[test]
    fn test_vertical_align_from_str() {
        assert_eq!("TOP".parse::<VerticalAlign>().unwrap(), VerticalAlign::Top);
        assert_eq!("middle".parse::<VerticalAlign>().unwrap(), VerticalAlign::Center);
        assert_eq!("bottom".parse::<VerticalAlign>().unwrap(), VerticalAlign::Bottom);
        assert!("left".parse::<VerticalAlign>().is_err());
        assert_eq!(VerticalAlign::Center.to_string(), "center");
    }
}
