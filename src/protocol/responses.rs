//! Response envelopes
//!
//! Every call answers with one JSON line carrying either a result or an
//! error kind, code and message.

use log::error;
use serde::Serialize;
use serde_json::Value;

use crate::error::FileError;
use crate::error::handlers::error_to_code;

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub kind: String,
    pub code: u16,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Response {
    pub id: Value,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl Response {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            id,
            ok: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Value, err: &FileError) -> Self {
        Self {
            id,
            ok: false,
            result: None,
            error: Some(ErrorBody {
                kind: err.kind().to_string(),
                code: error_to_code(err),
                message: err.to_string(),
            }),
        }
    }

    /// Format the response as a newline-terminated JSON line
    pub fn to_line(&self) -> String {
        match serde_json::to_string(self) {
            Ok(json) => format!("{}\n", json),
            Err(e) => {
                error!("Failed to serialize response: {}", e);
                "{\"id\":null,\"ok\":false}\n".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn failure_carries_kind_and_code() {
        let response = Response::failure(json!(3), &FileError::NotFound("a.txt".into()));
        let line = response.to_line();
        let parsed: Value = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(parsed["id"], 3);
        assert_eq!(parsed["ok"], false);
        assert_eq!(parsed["error"]["kind"], "NOT_FOUND");
        assert_eq!(parsed["error"]["code"], 1);
        assert!(parsed.get("result").is_none());
    }
}
