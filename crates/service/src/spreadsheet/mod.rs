//! Spreadsheet interchange for honor records.
//! - `schema` is the single column layout shared by both directions.
//! - `import` reads xlsx bytes with calamine; `export` writes them with rust_xlsxwriter.

pub mod schema;
pub mod import;
pub mod export;

use thiserror::Error;

pub use export::write_honor_workbook;
pub use import::{read_honor_rows, ImportedHonor};
pub use schema::{CellKind, ColumnSpec, HONOR_COLUMNS};

#[derive(Debug, Error)]
pub enum SpreadsheetError {
    #[error("cannot open workbook: {0}")]
    OpenWorkbook(String),
    #[error("workbook has no worksheet")]
    NoWorksheet,
    #[error("cannot read worksheet: {0}")]
    ReadSheet(String),
    #[error("row {row}, column {column}: expected {expected}, found {found}")]
    CellType {
        row: u32,
        column: &'static str,
        expected: &'static str,
        found: String,
    },
    #[error("row {row}, column {column}: value out of range")]
    OutOfRange { row: u32, column: &'static str },
    #[error("cannot write workbook: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),
}
