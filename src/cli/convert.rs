//! `ghstamp convert` subcommand

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDate;
use clap::Args;

use super::FormatArg;
use crate::services::calendar::{compute_calendar_grid, CalendarGrid};
use crate::services::config::Config;
use crate::services::editor::Editor;
use crate::services::template_io::TemplateFormat;

/// Import a template and re-export it fitted to the calendar
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Template to import (.toml is structured, anything else plain text)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

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

impl ConvertArgs {
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let calendar = compute_calendar_grid(self.date.unwrap_or_else(super::today));
        let format = super::resolve_format(self.format, self.output.as_deref());
        let content = convert_file(&self.input, &calendar, format, config)?;
        super::write_output(&content, self.output.as_deref())
    }
}

fn convert_file(
    input: &Path,
    calendar: &CalendarGrid,
    format: TemplateFormat,
    config: &Config,
) -> anyhow::Result<String> {
    let content =
        fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))?;

    let mut editor = Editor::new(*calendar, config.default_name.as_str());
    editor
        .import_file(&content, &input.to_string_lossy())
        .with_context(|| format!("importing {}", input.display()))?;

    Ok(match format {
        TemplateFormat::Txt => editor.export_txt(),
        TemplateFormat::Toml => editor.export_toml(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn calendar() -> CalendarGrid {
        compute_calendar_grid(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap())
    }

    #[test]
    fn test_convert_txt_to_toml() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("wave.txt");
        fs::write(&input, vec!["-:=#"; 7].join("\n")).unwrap();

        let out = convert_file(&input, &calendar(), TemplateFormat::Toml, &Config::default())
            .unwrap();
        assert!(out.contains("name = \"imported\""));
        assert!(out.contains("columns = 51"));
        assert!(out.contains(&format!("-:=#{}", ".".repeat(47))));
    }

    #[test]
    fn test_convert_toml_to_txt() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("dots.toml");
        let body = vec!["#"; 7].join("\n");
        fs::write(
            &input,
            format!("[template]\nname = \"dots\"\n[grid]\ndata = \"\"\"\n{}\n\"\"\"\n", body),
        )
        .unwrap();

        let out = convert_file(&input, &calendar(), TemplateFormat::Txt, &Config::default())
            .unwrap();
        assert_eq!(out.lines().count(), 7);
        assert!(out.lines().all(|l| l.starts_with("#.") && l.len() == 51));
    }

    #[test]
    fn test_convert_bad_rows() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("bad.txt");
        fs::write(&input, "##\n##\n").unwrap();

        let err = convert_file(&input, &calendar(), TemplateFormat::Txt, &Config::default())
            .unwrap_err();
        assert!(format!("{:#}", err).contains("exactly 7 rows"));
    }

    #[test]
    fn test_convert_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = convert_file(
            &dir.path().join("missing.txt"),
            &calendar(),
            TemplateFormat::Txt,
            &Config::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("reading"));
    }
}
