//! The `{code, message, data}` wrapper every backend response uses
//!
//! A transport-level success does not imply a domain success: the backend
//! reports failures such as "user already exists" with HTTP 200 and a
//! non-200 `code`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Envelope code signalling domain success
pub const SUCCESS_CODE: i64 = 200;

/// Uniform backend response envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub code: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Payload; `null` when the backend omits it
    #[serde(default)]
    pub data: Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl Envelope {
    /// Successful envelope carrying `data`
    pub fn success(data: Value) -> Self {
        Self {
            code: SUCCESS_CODE,
            message: None,
            data,
            timestamp: None,
        }
    }

    /// Failed envelope carrying a server message
    pub fn failure(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: Some(message.into()),
            data: Value::Null,
            timestamp: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    /// Server message, if it is present and non-blank
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_success_envelope() {
        let envelope: Envelope = serde_json::from_value(json!({
            "code": 200,
            "message": "操作成功",
            "data": {"token": "abc"},
            "timestamp": 1760000000000i64
        }))
        .unwrap();

        assert!(envelope.is_success());
        assert_eq!(envelope.data, json!({"token": "abc"}));
        assert_eq!(envelope.timestamp, Some(1760000000000));
    }

    #[test]
    fn test_missing_data_is_null() {
        let envelope: Envelope =
            serde_json::from_value(json!({"code": 200, "message": "删除成功"})).unwrap();
        assert!(envelope.is_success());
        assert!(envelope.data.is_null());
    }

    #[test]
    fn test_failure_envelope() {
        let envelope: Envelope =
            serde_json::from_value(json!({"code": 500, "message": "批量删除失败", "data": null}))
                .unwrap();
        assert!(!envelope.is_success());
        assert_eq!(envelope.message(), Some("批量删除失败"));
    }

    #[test]
    fn test_blank_message_is_absent() {
        let envelope = Envelope::failure(500, "   ");
        assert_eq!(envelope.message(), None);
    }

    #[test]
    fn test_code_is_required() {
        let result: std::result::Result<Envelope, _> =
            serde_json::from_value(json!({"message": "hi"}));
        assert!(result.is_err());
    }
}
