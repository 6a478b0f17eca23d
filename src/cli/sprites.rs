//! `ghstamp sprites` subcommand

use anyhow::bail;
use clap::Args;

use crate::services::sprites;
use crate::services::template_io::to_plain_text;
use crate::types::Template;

/// List or print built-in sprites
#[derive(Args, Debug)]
pub struct SpritesArgs {
    /// Sprite to print (omit to list all)
    #[arg(value_name = "NAME")]
    pub name: Option<String>,
}

impl SpritesArgs {
    pub fn run(self) -> anyhow::Result<()> {
        let output = match self.name {
            Some(name) => sprite_text(&name)?,
            None => sprite_list(),
        };
        super::write_output(&output, None)
    }
}

fn sprite_list() -> String {
    sprites::catalog()
        .iter()
        .map(|s| format!("{:<10} {}x{}", s.name, s.width, s.height))
        .collect::<Vec<_>>()
        .join("\n")
}

fn sprite_text(name: &str) -> anyhow::Result<String> {
    let Some(sprite) = sprites::find(name) else {
        bail!("unknown sprite '{}'", name);
    };
    Ok(to_plain_text(&Template::from_grid(sprite.name, &sprite.grid)))
}
