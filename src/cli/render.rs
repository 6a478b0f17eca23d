//! `ghstamp render` subcommand

use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::Args;

use super::FormatArg;
use crate::services::calendar::{compute_calendar_grid, format_anchor_date, CalendarGrid};
use crate::services::config::Config;
use crate::services::editor::fit_to_calendar;
use crate::services::font::{BitmapFont, RenderOptions, TextRenderer, VerticalAlign};
use crate::services::template_io::{to_plain_text, to_structured_text, TemplateFormat};

/// Render text into a template
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Text to render (A-Z, 0-9 and basic punctuation)
    pub text: String,

    /// Blank columns between glyphs (config default when omitted)
    #[arg(long)]
    pub spacing: Option<usize>,

    /// Vertical placement: top, center or bottom
    #[arg(long)]
    pub align: Option<VerticalAlign>,

    /// Output format (defaults to the output file's extension, else txt)
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// Write to file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Reference date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

impl RenderArgs {
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let calendar = compute_calendar_grid(self.date.unwrap_or_else(super::today));
        let mut options = config.render_options();
        if let Some(spacing) = self.spacing {
            options.spacing = spacing;
        }
        if let Some(align) = self.align {
            options.align = align;
        }

        let format = super::resolve_format(self.format, self.output.as_deref());
        let content = render_export(&self.text, &options, &calendar, format)?;
        super::write_output(&content, self.output.as_deref())
    }
}

/// Render, fit to the calendar and serialize
fn render_export(
    text: &str,
    options: &RenderOptions,
    calendar: &CalendarGrid,
    format: TemplateFormat,
) -> anyhow::Result<String> {
    let rendered = BitmapFont
        .render(text, options)
        .with_context(|| format!("rendering {:?}", text))?;
    if rendered.width > calendar.usable_columns {
        log::warn!(
            "Rendered text is {} columns wide, calendar fits {}; truncating",
            rendered.width,
            calendar.usable_columns
        );
    }
    let fitted = fit_to_calendar(&rendered, calendar.usable_columns);

    Ok(match format {
        TemplateFormat::Txt => to_plain_text(&fitted),
        TemplateFormat::Toml => {
            let anchor = format_anchor_date(calendar.anchor_date);
            to_structured_text(&fitted, Some(&anchor))
        }
    })
}
