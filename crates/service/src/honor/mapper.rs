//! Record → transport conversions.

use serde_json::{Map, Value};

use super::domain::{HonorRecord, HonorView};

pub fn to_view(record: &HonorRecord) -> HonorView {
    HonorView {
        honor_id: record.honor_id,
        honor_name: record.honor_name.clone(),
        obtain_time: record.obtain_time.clone(),
        honor_level: record.honor_level.clone(),
        issuing_organization: record.issuing_organization.clone(),
    }
}

/// Keyed `honorId, honorName, obtainTime, honorLevel, issuingOrganization`.
/// `None` yields an empty map.
pub fn to_plain_map(record: Option<&HonorRecord>) -> Map<String, Value> {
    let Some(record) = record else { return Map::new() };
    let mut m = Map::new();
    m.insert("honorId".into(), record.honor_id.map(Value::from).unwrap_or(Value::Null));
    m.insert("honorName".into(), opt_str(&record.honor_name));
    m.insert("obtainTime".into(), opt_str(&record.obtain_time));
    m.insert("honorLevel".into(), opt_str(&record.honor_level));
    m.insert("issuingOrganization".into(), opt_str(&record.issuing_organization));
    m
}

fn opt_str(v: &Option<String>) -> Value {
    v.as_deref().map(Value::from).unwrap_or(Value::Null)
}
