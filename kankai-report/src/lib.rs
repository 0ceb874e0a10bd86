//! kankai-report: spreadsheet and CSV exports of the board

pub mod export;

pub use export::{default_file_name, report_rows, write_csv, xlsx_report, ReportError, ReportRow};
