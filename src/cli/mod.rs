mod calendar;
mod convert;
mod render;
mod sprites;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};

use crate::services::config::Config;
use crate::services::template_io::TemplateFormat;

pub use calendar::CalendarArgs;
pub use convert::ConvertArgs;
pub use render::RenderArgs;
pub use sprites::SpritesArgs;

/// Pixel-art editor for GitHub contribution calendars
#[derive(Parser)]
#[command(name = "ghstamp")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch interactive editor (default)
    Tui {
        /// Reference date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Import a .txt or .toml template at start
        #[arg(long, value_name = "FILE")]
        open: Option<PathBuf>,
    },

    /// Show calendar geometry and month labels
    Calendar(CalendarArgs),

    /// Render text into a calendar-sized template
    Render(RenderArgs),

    /// List built-in sprites or print one
    Sprites(SpritesArgs),

    /// Import a template file and export it fitted to the calendar
    Convert(ConvertArgs),
}

/// Output format flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Txt,
    Toml,
}

impl From<FormatArg> for TemplateFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Txt => TemplateFormat::Txt,
            FormatArg::Toml => TemplateFormat::Toml,
        }
    }
}

impl Cli {
    /// Whether this invocation takes over the terminal
    pub fn is_tui(&self) -> bool {
        matches!(self.command, None | Some(Commands::Tui { .. }))
    }

    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        match self.command {
            None => crate::tui::run(config, today(), None),
            Some(Commands::Tui { date, open }) => {
                crate::tui::run(config, date.unwrap_or_else(today), open.as_deref())
            }
            Some(Commands::Calendar(args)) => args.run(),
            Some(Commands::Render(args)) => args.run(config),
            Some(Commands::Sprites(args)) => args.run(),
            Some(Commands::Convert(args)) => args.run(config),
        }
    }
}

/// Local calendar date
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Write to `output`, or stdout when none is given
fn write_output(content: &str, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            let mut data = content.to_string();
            if !data.ends_with('\n') {
                data.push('\n');
            }
            fs::write(path, data).with_context(|| format!("writing {}", path.display()))?;
            log::info!("Wrote {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", content.trim_end_matches('\n'))?;
        }
    }
    Ok(())
}

/// Explicit format flag, else the output file's extension, else plain text
fn resolve_format(format: Option<FormatArg>, output: Option<&Path>) -> TemplateFormat {
    match (format, output) {
        (Some(f), _) => f.into(),
        (None, Some(path)) => TemplateFormat::from_path(path),
        (None, None) => TemplateFormat::Txt,
    }
}
