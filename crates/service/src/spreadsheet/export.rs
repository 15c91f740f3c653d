use rust_xlsxwriter::{Format, Workbook};
use serde_json::{Map, Value};

use super::schema::{cells_from_map, CellValue, HONOR_COLUMNS};
use super::SpreadsheetError;

pub const SHEET_NAME: &str = "Honor List";

/// Header row plus one row per plain map, columns in schema order.
pub fn write_honor_workbook(rows: &[Map<String, Value>]) -> Result<Vec<u8>, SpreadsheetError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for col in HONOR_COLUMNS.iter() {
        sheet.write_string_with_format(0, col.index, col.header, &header)?;
    }
    for (i, map) in rows.iter().enumerate() {
        let row = u32::try_from(i + 1).map_err(|_| SpreadsheetError::OutOfRange { row: u32::MAX, column: "row" })?;
        for (col, cell) in HONOR_COLUMNS.iter().zip(cells_from_map(map)) {
            match cell {
                Some(CellValue::Integer(v)) => { sheet.write_number(row, col.index, v as f64)?; }
                Some(CellValue::Text(s)) => { sheet.write_string(row, col.index, s)?; }
                None => {}
            }
        }
    }
    sheet.autofit();
    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};
    use serde_json::json;
    use std::io::Cursor;

    #[test]
    fn writes_header_and_rows_in_schema_order() {
        let rows: Vec<Map<String, Value>> = vec![
            json!({"honorId": 1, "honorName": "Excellence Award", "obtainTime": "2023-06", "honorLevel": "A", "issuingOrganization": "Dept X"}),
            json!({"honorId": 2, "honorName": "Service Award", "obtainTime": null, "honorLevel": "B", "issuingOrganization": "Dept Y"}),
        ]
        .into_iter()
        .map(|v| v.as_object().cloned().unwrap())
        .collect();
        let bytes = write_honor_workbook(&rows).unwrap();

        let mut wb: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).unwrap();
        assert_eq!(wb.sheet_names(), vec![SHEET_NAME.to_string()]);
        let range = wb.worksheet_range(SHEET_NAME).unwrap();
        assert_eq!(range.height(), 3);
        let header: Vec<String> = range.rows().next().unwrap().iter().map(|c| c.to_string()).collect();
        assert_eq!(header, ["荣誉ID", "荣誉名称", "获得时间", "荣誉等级", "颁发组织"]);
        assert_eq!(range.get_value((1, 0)), Some(&Data::Float(1.0)));
        assert_eq!(range.get_value((1, 1)), Some(&Data::String("Excellence Award".into())));
        assert_eq!(range.get_value((2, 4)), Some(&Data::String("Dept Y".into())));
        assert!(matches!(range.get_value((2, 2)), None | Some(Data::Empty)));
    }

    #[test]
    fn empty_result_still_has_header() {
        let bytes = write_honor_workbook(&[]).unwrap();
        let mut wb: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).unwrap();
        let range = wb.worksheet_range_at(0).unwrap().unwrap();
        assert_eq!(range.height(), 1);
    }
}
