//! Contribution calendar geometry
//!
//! The graph shows the trailing year of activity, starting on a Sunday. One
//! margin column is reserved on each side for timezone/rollover protection, so
//! the editable canvas starts one week after the graph does.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const DAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Date-aligned layout of the contribution graph for one reference date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalendarGrid {
    /// Date of cell [row 0, col 0] of the full graph (margins included)
    pub graph_start_date: NaiveDate,
    /// Date of cell [row 0, col 0] of the usable canvas
    pub anchor_date: NaiveDate,
    /// Full graph columns including both margin columns
    pub total_columns: usize,
    /// Editable columns (`total_columns - 2`)
    pub usable_columns: usize,
    pub today: NaiveDate,
}

impl CalendarGrid {
    /// Date of a usable-canvas cell (display column `col + 1`)
    pub fn date_for_template_cell(&self, row: usize, col: usize) -> NaiveDate {
        date_for_column(col + 1, row, self.graph_start_date)
    }

    /// Sparse month labels for the full graph
    pub fn month_labels(&self) -> BTreeMap<usize, &'static str> {
        month_labels(self.total_columns, self.graph_start_date)
    }
}

/// Compute the calendar layout for `today`
pub fn compute_calendar_grid(today: NaiveDate) -> CalendarGrid {
    let one_year_ago = one_year_before(today);

    // Round backward to the most recent Sunday
    let days_since_sunday = one_year_ago.weekday().num_days_from_sunday();
    let graph_start_date = one_year_ago - Duration::days(days_since_sunday as i64);

    let diff_days = (today - graph_start_date).num_days();
    let total_columns = (diff_days / 7 + 1) as usize;

    CalendarGrid {
        graph_start_date,
        anchor_date: graph_start_date + Duration::days(7),
        total_columns,
        usable_columns: total_columns.saturating_sub(2),
        today,
    }
}

/// Same month/day one year earlier; Feb 29 rolls over to Mar 1
fn one_year_before(date: NaiveDate) -> NaiveDate {
    let year = date.year() - 1;
    date.with_year(year)
        .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
        .unwrap_or(date)
}

/// Date of a cell in the full display grid (column 0 is the left margin)
pub fn date_for_column(column: usize, row: usize, graph_start_date: NaiveDate) -> NaiveDate {
    graph_start_date + Duration::days((column * 7 + row) as i64)
}

/// Whether a date is within the active range (not in the future)
pub fn is_date_active(date: NaiveDate, today: NaiveDate) -> bool {
    date <= today
}

/// Column -> month abbreviation, emitted at the first column whose Sunday
/// falls in a new month
pub fn month_labels(
    total_columns: usize,
    graph_start_date: NaiveDate,
) -> BTreeMap<usize, &'static str> {
    let mut labels = BTreeMap::new();
    let mut prev_month: Option<u32> = None;

    for col in 0..total_columns {
        let month = date_for_column(col, 0, graph_start_date).month0();
        if prev_month != Some(month) {
            labels.insert(col, MONTHS[month as usize]);
            prev_month = Some(month);
        }
    }

    labels
}

/// Tooltip text, e.g. "Mon 14 Apr 2025"
pub fn format_tooltip_date(date: NaiveDate) -> String {
    format!(
        "{} {} {} {}",
        DAYS[date.weekday().num_days_from_sunday() as usize],
        date.day(),
        MONTHS[date.month0() as usize],
        date.year()
    )
}

/// Anchor date as YYYY-MM-DD for structured export
pub fn format_anchor_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
