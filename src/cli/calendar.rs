//! `ghstamp calendar` subcommand

use std::collections::BTreeMap;

use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;

use crate::services::calendar::{compute_calendar_grid, format_tooltip_date, CalendarGrid};

/// Show calendar geometry
#[derive(Args, Debug)]
pub struct CalendarArgs {
    /// Reference date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct CalendarReport {
    #[serde(flatten)]
    grid: CalendarGrid,
    month_labels: BTreeMap<usize, &'static str>,
}

impl CalendarArgs {
    pub fn run(self) -> anyhow::Result<()> {
        let grid = compute_calendar_grid(self.date.unwrap_or_else(super::today));
        let report = if self.json {
            calendar_json(&grid)?
        } else {
            calendar_text(&grid)
        };
        super::write_output(&report, None)
    }
}

fn calendar_json(grid: &CalendarGrid) -> anyhow::Result<String> {
    let report = CalendarReport {
        grid: *grid,
        month_labels: grid.month_labels(),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

fn calendar_text(grid: &CalendarGrid) -> String {
    let months = grid
        .month_labels()
        .iter()
        .map(|(col, name)| format!("{}@{}", name, col))
        .collect::<Vec<_>>()
        .join(" ");

    [
        format!("Reference date:  {}", format_tooltip_date(grid.today)),
        format!("Graph start:     {}", format_tooltip_date(grid.graph_start_date)),
        format!("Anchor date:     {}", format_tooltip_date(grid.anchor_date)),
        format!("Total columns:   {}", grid.total_columns),
        format!("Usable columns:  {}", grid.usable_columns),
        format!("Months:          {}", months),
    ]
    .join("\n")
}
