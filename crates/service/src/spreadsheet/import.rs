use std::io::Cursor;

use calamine::{open_workbook_from_rs, Data, Range, Reader, Xlsx};
use tracing::debug;

use super::schema::{record_from_cells, CellKind, CellValue, ColumnSpec, RowCells, HONOR_COLUMNS};
use super::SpreadsheetError;
use crate::honor::domain::HonorRecord;

/// One parsed data row. `source_id` is the sheet's id column, kept for
/// logging only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportedHonor {
    pub row: u32,
    pub source_id: Option<i64>,
    pub record: HonorRecord,
}

/// Parse the first worksheet of an xlsx file. Row 0 is the header; blank rows
/// are skipped. Fails on the first cell that does not fit its column.
pub fn read_honor_rows(bytes: &[u8]) -> Result<Vec<ImportedHonor>, SpreadsheetError> {
    let mut workbook = open_workbook_from_rs::<Xlsx<_>, _>(Cursor::new(bytes))
        .map_err(|e| SpreadsheetError::OpenWorkbook(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(SpreadsheetError::NoWorksheet)?
        .map_err(|e| SpreadsheetError::ReadSheet(e.to_string()))?;
    rows_from_range(&range)
}

fn rows_from_range(range: &Range<Data>) -> Result<Vec<ImportedHonor>, SpreadsheetError> {
    let Some((last_row, _)) = range.end() else {
        return Ok(Vec::new());
    };
    let mut out = Vec::new();
    for row in 1..=last_row {
        let cells = check_row(range, row)?;
        if cells.iter().all(Option::is_none) {
            debug!(row, "skipping blank row");
            continue;
        }
        let (source_id, record) = record_from_cells(cells);
        out.push(ImportedHonor { row, source_id, record });
    }
    Ok(out)
}

fn check_row(range: &Range<Data>, row: u32) -> Result<RowCells, SpreadsheetError> {
    let mut cells: RowCells = Default::default();
    for (slot, col) in cells.iter_mut().zip(HONOR_COLUMNS.iter()) {
        let raw = range.get_value((row, u32::from(col.index)));
        *slot = check_cell(raw, col, row)?;
    }
    Ok(cells)
}

fn check_cell(raw: Option<&Data>, col: &ColumnSpec, row: u32) -> Result<Option<CellValue>, SpreadsheetError> {
    let mismatch = |found: &Data| SpreadsheetError::CellType {
        row,
        column: col.key,
        expected: col.kind.label(),
        found: describe(found),
    };
    let data = match raw {
        None | Some(Data::Empty) => return Ok(None),
        Some(Data::String(s)) if s.trim().is_empty() => return Ok(None),
        Some(d) => d,
    };
    let value = match (col.kind, data) {
        (CellKind::Integer, Data::Int(v)) => CellValue::Integer(*v),
        (CellKind::Integer, Data::Float(f)) => {
            if !f.is_finite() || f.trunc() < i64::MIN as f64 || f.trunc() > i64::MAX as f64 {
                return Err(SpreadsheetError::OutOfRange { row, column: col.key });
            }
            CellValue::Integer(f.trunc() as i64)
        }
        (CellKind::Text, Data::String(s)) => CellValue::Text(s.clone()),
        (CellKind::Text, Data::Int(v)) => CellValue::Text(v.to_string()),
        (CellKind::Text, Data::Float(f)) => CellValue::Text(format_number(*f)),
        (CellKind::Text, Data::DateTimeIso(s) | Data::DurationIso(s)) => CellValue::Text(s.clone()),
        (_, other) => return Err(mismatch(other)),
    };
    Ok(Some(value))
}

/// Integral floats drop the fractional part: `2023.0` reads as `2023`.
fn format_number(f: f64) -> String {
    if f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}

fn describe(d: &Data) -> String {
    match d {
        Data::Int(_) => "integer".into(),
        Data::Float(_) => "number".into(),
        Data::String(s) => format!("text {s:?}"),
        Data::Bool(b) => format!("boolean {b}"),
        Data::DateTime(_) => "date".into(),
        Data::DateTimeIso(_) | Data::DurationIso(_) => "iso date".into(),
        Data::Error(e) => format!("error {e:?}"),
        Data::Empty => "empty".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

    fn workbook(build: impl FnOnce(&mut rust_xlsxwriter::Worksheet)) -> Vec<u8> {
        let mut wb = Workbook::new();
        let ws = wb.add_worksheet();
        for col in HONOR_COLUMNS.iter() {
            ws.write_string(0, col.index, col.header).unwrap();
        }
        build(ws);
        wb.save_to_buffer().unwrap()
    }

    #[test]
    fn reads_two_data_rows() {
        let bytes = workbook(|ws| {
            ws.write_number(1, 0, 1.0).unwrap();
            ws.write_string(1, 1, "Excellence Award").unwrap();
            ws.write_string(1, 2, "2023-06").unwrap();
            ws.write_string(1, 3, "A").unwrap();
            ws.write_string(1, 4, "Dept X").unwrap();
            ws.write_number(2, 0, 2.0).unwrap();
            ws.write_string(2, 1, "Service Award").unwrap();
            ws.write_string(2, 2, "2022-12").unwrap();
            ws.write_string(2, 3, "B").unwrap();
            ws.write_string(2, 4, "Dept Y").unwrap();
        });
        let rows = read_honor_rows(&bytes).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].source_id, Some(1));
        assert_eq!(rows[0].record.honor_name.as_deref(), Some("Excellence Award"));
        assert_eq!(rows[1].record.obtain_time.as_deref(), Some("2022-12"));
        assert_eq!(rows[1].record.issuing_organization.as_deref(), Some("Dept Y"));
        assert!(rows.iter().all(|r| r.record.honor_id.is_none()));
    }

    #[test]
    fn skips_blank_rows_and_leaves_absent_cells_unset() {
        let bytes = workbook(|ws| {
            ws.write_string(1, 1, "Only Name").unwrap();
            ws.write_string(3, 1, "After Gap").unwrap();
            ws.write_number(3, 2, 2023.0).unwrap();
        });
        let rows = read_honor_rows(&bytes).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].source_id, None);
        assert_eq!(rows[0].record.obtain_time, None);
        assert_eq!(rows[1].row, 3);
        assert_eq!(rows[1].record.obtain_time.as_deref(), Some("2023"));
    }

    #[test]
    fn text_in_id_column_is_rejected() {
        let bytes = workbook(|ws| {
            ws.write_string(1, 0, "abc").unwrap();
            ws.write_string(1, 1, "Award").unwrap();
        });
        match read_honor_rows(&bytes) {
            Err(SpreadsheetError::CellType { row, column, .. }) => {
                assert_eq!(row, 1);
                assert_eq!(column, "honorId");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn header_only_sheet_yields_nothing() {
        assert!(read_honor_rows(&workbook(|_| {})).unwrap().is_empty());
    }

    #[test]
    fn garbage_bytes_fail_to_open() {
        assert!(matches!(read_honor_rows(b"not a workbook"), Err(SpreadsheetError::OpenWorkbook(_))));
    }

    #[test]
    fn float_formatting() {
        assert_eq!(format_number(2023.0), "2023");
        assert_eq!(format_number(1.5), "1.5");
    }
}
