//! Board exports: an `.xlsx` workbook with a status chart, and plain CSV.
//!
//! Both formats share the same rows: one per task, in board order, with
//! timestamps rendered in the caller's timezone.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use kankai_core::{ProgressSummary, Task};
use rust_xlsxwriter::{Chart, ChartType, Format, Workbook, XlsxError};
use std::io;
use thiserror::Error;

pub const HEADERS: [&str; 8] = [
    "ID",
    "Name",
    "Status",
    "Difficulty",
    "Estimated",
    "Efficiency",
    "Started",
    "Completed",
];

const SHEET: &str = "Tasks";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("spreadsheet error: {0}")]
    Xlsx(#[from] XlsxError),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub id: String,
    pub name: String,
    pub status: String,
    pub difficulty: String,
    pub estimated: String,
    pub efficiency: String,
    pub started: String,
    pub completed: String,
}

impl ReportRow {
    pub fn from_task(task: &Task, tz: Tz) -> Self {
        Self {
            id: task.id.clone(),
            name: task.name.clone(),
            status: task.status.label().to_string(),
            difficulty: task.difficulty.label().to_string(),
            estimated: task.estimate_label(),
            efficiency: task.efficiency_label().unwrap_or_default().to_string(),
            started: local_stamp(task.started_at, tz),
            completed: local_stamp(task.completed_at, tz),
        }
    }

    pub fn fields(&self) -> [&str; 8] {
        [
            self.id.as_str(),
            self.name.as_str(),
            self.status.as_str(),
            self.difficulty.as_str(),
            self.estimated.as_str(),
            self.efficiency.as_str(),
            self.started.as_str(),
            self.completed.as_str(),
        ]
    }
}

fn local_stamp(at: Option<DateTime<Utc>>, tz: Tz) -> String {
    at.map(|dt| dt.with_timezone(&tz).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

pub fn report_rows(tasks: &[Task], tz: Tz) -> Vec<ReportRow> {
    tasks.iter().map(|t| ReportRow::from_task(t, tz)).collect()
}

/// e.g. `kankai_report_20260302.xlsx`
pub fn default_file_name(now: DateTime<Utc>) -> String {
    format!("kankai_report_{}.xlsx", now.format("%Y%m%d"))
}

/// Build the workbook in memory.
///
/// Layout: the task table from A1, then a status summary two rows below it
/// with a pie chart of the distribution beside the summary. The chart is
/// left out when the board is empty.
pub fn xlsx_report(tasks: &[Task], summary: &ProgressSummary, tz: Tz) -> Result<Vec<u8>, ReportError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET)?;

    for (col, header) in HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &bold)?;
    }
    sheet.set_column_width(1, 32.0)?;
    sheet.set_column_width(5, 28.0)?;
    sheet.set_column_width(6, 18.0)?;
    sheet.set_column_width(7, 18.0)?;

    let rows = report_rows(tasks, tz);
    for (i, row) in rows.iter().enumerate() {
        for (col, value) in row.fields().iter().enumerate() {
            sheet.write_string(i as u32 + 1, col as u16, *value)?;
        }
    }

    let summary_top = rows.len() as u32 + 2;
    sheet.write_string_with_format(summary_top, 0, "Status", &bold)?;
    sheet.write_string_with_format(summary_top, 1, "Count", &bold)?;
    let distribution = summary.distribution();
    for (i, (label, count)) in distribution.iter().enumerate() {
        let row = summary_top + 1 + i as u32;
        sheet.write_string(row, 0, *label)?;
        sheet.write_number(row, 1, *count as f64)?;
    }
    let totals_row = summary_top + 1 + distribution.len() as u32;
    sheet.write_string_with_format(totals_row, 0, "Completed %", &bold)?;
    sheet.write_number(totals_row, 1, summary.done_percentage)?;

    if summary.total > 0 {
        let first = summary_top + 1;
        let last = summary_top + distribution.len() as u32;
        let mut chart = Chart::new(ChartType::Pie);
        chart.title().set_name("Status distribution");
        chart
            .add_series()
            .set_name("Tasks")
            .set_categories((SHEET, first, 0, last, 0))
            .set_values((SHEET, first, 1, last, 1));
        sheet.insert_chart(summary_top, 3, &chart)?;
    }

    Ok(workbook.save_to_buffer()?)
}

/// Same rows as the workbook, as CSV with a header line.
pub fn write_csv<W: io::Write>(tasks: &[Task], tz: Tz, writer: W) -> Result<(), ReportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(HEADERS)?;
    for row in report_rows(tasks, tz) {
        wtr.write_record(row.fields())?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use kankai_core::{Difficulty, TaskStatus, TaskStore};

    #[test]
    fn row_renders_local_timestamps() {
        let start = Utc.with_ymd_and_hms(2026, 2, 20, 15, 0, 0).unwrap();
        let mut store = TaskStore::new();
        store.create("Ship it", 90, Difficulty::High).unwrap();
        store.transition("task-1", TaskStatus::InProgress, start).unwrap();

        // Feb is CST (UTC-6)
        let row = ReportRow::from_task(store.get("task-1").unwrap(), chrono_tz::America::Chicago);
        assert_eq!(row.started, "2026-02-20 09:00");
        assert_eq!(row.completed, "");
        assert_eq!(row.estimated, "1h 30m");
        assert_eq!(row.status, "In progress");
        assert_eq!(row.difficulty, "High");
    }

    #[test]
    fn default_name_uses_date() {
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 23, 0, 0).unwrap();
        assert_eq!(default_file_name(now), "kankai_report_20260302.xlsx");
    }
}
