use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Result envelope returned by every JSON endpoint.
///
/// `code` is `0` on success and `1` on failure. `data` and `msg` are omitted
/// when empty so clients can tell "no payload" apart from `null`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DataResponse {
    pub code: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
}

impl DataResponse {
    pub const OK: i32 = 0;
    pub const ERROR: i32 = 1;

    /// Success with a payload. Serialization failures degrade to `null` data.
    pub fn ok<T: Serialize>(data: T) -> Self {
        Self { code: Self::OK, data: Some(serde_json::to_value(data).unwrap_or(Value::Null)), msg: None }
    }

    pub fn ok_message() -> Self {
        Self { code: Self::OK, data: None, msg: None }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self { code: Self::ERROR, data: None, msg: Some(msg.into()) }
    }

    pub fn is_ok(&self) -> bool { self.code == Self::OK }
}
