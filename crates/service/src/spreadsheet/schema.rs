use serde_json::{Map, Value};

use crate::honor::domain::HonorRecord;

/// What a column holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellKind {
    Integer,
    Text,
}

impl CellKind {
    pub fn label(self) -> &'static str {
        match self {
            CellKind::Integer => "integer",
            CellKind::Text => "text",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnSpec {
    pub index: u16,
    /// Plain-map key, see `honor::mapper::to_plain_map`.
    pub key: &'static str,
    pub header: &'static str,
    pub kind: CellKind,
}

pub const COLUMN_COUNT: usize = 5;

pub const HONOR_COLUMNS: [ColumnSpec; COLUMN_COUNT] = [
    ColumnSpec { index: 0, key: "honorId", header: "荣誉ID", kind: CellKind::Integer },
    ColumnSpec { index: 1, key: "honorName", header: "荣誉名称", kind: CellKind::Text },
    ColumnSpec { index: 2, key: "obtainTime", header: "获得时间", kind: CellKind::Text },
    ColumnSpec { index: 3, key: "honorLevel", header: "荣誉等级", kind: CellKind::Text },
    ColumnSpec { index: 4, key: "issuingOrganization", header: "颁发组织", kind: CellKind::Text },
];

/// A cell that passed the shape check for its column.
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    Integer(i64),
    Text(String),
}

/// One data row, positionally aligned with [`HONOR_COLUMNS`].
pub type RowCells = [Option<CellValue>; COLUMN_COUNT];

/// Fill a record from checked cells. Text columns map by key; the id column
/// is returned separately since stored ids are generated by the database.
pub fn record_from_cells(cells: RowCells) -> (Option<i64>, HonorRecord) {
    let mut id = None;
    let mut record = HonorRecord::default();
    for (col, cell) in HONOR_COLUMNS.iter().zip(cells) {
        match (col.key, cell) {
            ("honorId", Some(CellValue::Integer(v))) => id = Some(v),
            ("honorName", Some(CellValue::Text(v))) => record.honor_name = Some(v),
            ("obtainTime", Some(CellValue::Text(v))) => record.obtain_time = Some(v),
            ("honorLevel", Some(CellValue::Text(v))) => record.honor_level = Some(v),
            ("issuingOrganization", Some(CellValue::Text(v))) => record.issuing_organization = Some(v),
            _ => {}
        }
    }
    (id, record)
}

/// Project a plain map onto the schema for writing. Missing keys and
/// `null` become empty cells.
pub fn cells_from_map(map: &Map<String, Value>) -> RowCells {
    HONOR_COLUMNS.map(|col| match (col.kind, map.get(col.key)) {
        (CellKind::Integer, Some(Value::Number(n))) => n.as_i64().map(CellValue::Integer),
        (CellKind::Text, Some(Value::String(s))) => Some(CellValue::Text(s.clone())),
        (CellKind::Text, Some(Value::Number(n))) => Some(CellValue::Text(n.to_string())),
        _ => None,
    })
}
