//! Built-in sprite catalog for stamp mode

use std::sync::OnceLock;

use crate::types::{Grid, Sprite};

/// (name, rows) source table; `1`-`4` are levels, `#` is 4, anything else 0
const SOURCES: &[(&str, [&str; 7])] = &[
    (
        "Heart",
        [".#.#.", "#####", "#####", ".###.", ".###.", "..#..", "....."],
    ),
    (
        "Star",
        ["..#..", ".###.", "#####", ".###.", ".#.#.", "#...#", "....."],
    ),
    (
        "Diamond",
        ["..#..", ".###.", "#####", "#####", ".###.", "..#..", "....."],
    ),
    (
        "Arrow R",
        ["..#..", "...#.", "#####", "#####", "#####", "...#.", "..#.."],
    ),
    (
        "Arrow L",
        ["..#..", ".#...", "#####", "#####", "#####", ".#...", "..#.."],
    ),
    (
        "Dino",
        [
            "....33..32.",
            "...3443.3..",
            ".22.344432.",
            ".234444432.",
            "2233.2342..",
            ".22..233...",
            "2.2..22....",
        ],
    ),
    (
        "Invader",
        [
            ".3.....3.",
            "..3...3..",
            "..34343..",
            ".33.3.33.",
            "343434343",
            "3.3...3.3",
            "..33.33..",
        ],
    ),
    (
        "Fish",
        [
            ".........",
            ".2..233..",
            "22.23443.",
            ".2234.432",
            "22.23443.",
            ".2..233..",
            ".........",
        ],
    ),
    (
        "Whale",
        [
            "22.........",
            ".22.23332..",
            "..2234443..",
            "..2234.4432",
            "..2234443..",
            ".22.23332..",
            "22.........",
        ],
    ),
    (
        "UFO",
        [
            "....222....",
            "...23332...",
            "..2234322..",
            "34343434343",
            ".233333332.",
            "..2.2.2.2..",
            "...........",
        ],
    ),
];

fn parse_rows(rows: &[&str]) -> Grid {
    rows.iter()
        .map(|row| {
            row.chars()
                .map(|c| match c {
                    '1'..='4' => c as u8 - b'0',
                    '#' => 4,
                    _ => 0,
                })
                .collect()
        })
        .collect()
}

/// All built-in sprites, in display order
pub fn catalog() -> &'static [Sprite] {
    static CATALOG: OnceLock<Vec<Sprite>> = OnceLock::new();
    CATALOG.get_or_init(|| {
        SOURCES
            .iter()
            .map(|(name, rows)| {
                let grid = parse_rows(rows);
                Sprite {
                    name: *name,
                    width: grid.iter().map(Vec::len).max().unwrap_or(0),
                    height: grid.len(),
                    grid,
                }
            })
            .collect()
    })
}

/// Look up a sprite by name (case-insensitive)
pub fn find(name: &str) -> Option<&'static Sprite> {
    catalog().iter().find(|s| s.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MAX_LEVEL, ROWS};

    #[test]
    fn test_catalog_size_and_order() {
        let names: Vec<&str> = catalog().iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            vec![
                "Heart", "Star", "Diamond", "Arrow R", "Arrow L", "Dino", "Invader", "Fish",
                "Whale", "UFO"
            ]
        );
    }

    #[test]
    fn test_sprites_are_rectangular_and_in_range() {
        for sprite in catalog() {
            assert_eq!(sprite.height, ROWS, "{}", sprite.name);
            assert_eq!(sprite.grid.len(), sprite.height);
            for row in &sprite.grid {
                assert_eq!(row.len(), sprite.width, "{}", sprite.name);
                assert!(row.iter().all(|&v| v <= MAX_LEVEL));
            }
        }
    }

    #[test]
    fn test_heart_shape() {
        let heart = find("heart").unwrap();
        assert_eq!(heart.width, 5);
        assert_eq!(heart.grid[0], vec![0, 4, 0, 4, 0]);
        assert_eq!(heart.grid[5], vec![0, 0, 4, 0, 0]);
        assert_eq!(heart.grid[6], vec![0; 5]);
    }

    #[test]
    fn test_digit_levels_parsed() {
        let dino = find("Dino").unwrap();
        assert_eq!(dino.width, 11);
        assert_eq!(dino.grid[0][4], 3);
        assert_eq!(dino.grid[0][9], 2);
        assert_eq!(dino.grid[1][4], 4);
    }

    #[test]
    fn test_find_unknown() {
        assert!(find("Dragon").is_none());
        assert!(find("arrow r").is_some());
    }
}
