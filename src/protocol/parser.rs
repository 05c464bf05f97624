//! Request parsing
//!
//! Decodes request lines and extracts typed parameters from them.

use serde_json::{Map, Value};

use crate::error::{FileError, FileResult};
use crate::protocol::commands::Request;
use crate::storage::{DirectoryAlias, Encoding};

/// Parse one request line
pub fn parse_request(line: &str, max_request_bytes: usize) -> FileResult<Request> {
    if line.len() > max_request_bytes {
        return Err(FileError::MissingParameter(format!(
            "request exceeds {} bytes",
            max_request_bytes
        )));
    }

    serde_json::from_str(line)
        .map_err(|e| FileError::MissingParameter(format!("malformed request: {}", e)))
}

/// Typed view over a parameter mapping.
///
/// Values of the wrong JSON type read as absent.
#[derive(Debug, Clone, Copy)]
pub struct Params<'a> {
    map: Option<&'a Map<String, Value>>,
}

impl<'a> Params<'a> {
    pub fn new(map: &'a Map<String, Value>) -> Self {
        Self { map: Some(map) }
    }

    fn get(&self, name: &str) -> Option<&'a Value> {
        self.map.and_then(|map| map.get(name))
    }

    pub fn required_str(&self, name: &str) -> FileResult<&'a str> {
        self.optional_str(name)
            .ok_or_else(|| FileError::MissingParameter(name.to_string()))
    }

    pub fn optional_str(&self, name: &str) -> Option<&'a str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn bool_or(&self, name: &str, default: bool) -> bool {
        self.get(name).and_then(Value::as_bool).unwrap_or(default)
    }

    pub fn optional_i64(&self, name: &str) -> Option<i64> {
        let value = self.get(name)?;
        value
            .as_i64()
            .or_else(|| value.as_f64().map(|f| f as i64))
    }

    /// Nested object parameter, empty when absent
    pub fn nested(&self, name: &str) -> Params<'a> {
        Params {
            map: self.get(name).and_then(Value::as_object),
        }
    }

    pub fn alias(&self, name: &str) -> DirectoryAlias {
        DirectoryAlias::parse(self.optional_str(name))
    }

    /// Alias that is only set when the parameter is present
    pub fn optional_alias(&self, name: &str) -> Option<DirectoryAlias> {
        self.optional_str(name)
            .map(|alias| DirectoryAlias::parse(Some(alias)))
    }

    pub fn encoding(&self, name: &str) -> Option<Encoding> {
        self.optional_str(name).map(Encoding::parse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_envelope_with_defaults() {
        let request = parse_request(r#"{"verb":"getFreeDiskSpace"}"#, 1024).unwrap();
        assert_eq!(request.verb, "getFreeDiskSpace");
        assert!(request.id.is_null());
        assert!(request.params.is_empty());
    }

    #[test]
    fn rejects_malformed_and_oversized_lines() {
        assert!(matches!(
            parse_request("{not json", 1024),
            Err(FileError::MissingParameter(_))
        ));
        let line = format!(r#"{{"verb":"stat","params":{{"path":"{}"}}}}"#, "a".repeat(64));
        assert!(parse_request(&line, 16).is_err());
    }

    #[test]
    fn wrong_types_read_as_absent() {
        let map = json!({"path": 7, "append": "yes", "offset": 4.0, "options": {"create": true}});
        let params = Params::new(map.as_object().unwrap());
        assert!(matches!(
            params.required_str("path"),
            Err(FileError::MissingParameter(_))
        ));
        assert!(!params.bool_or("append", false));
        assert_eq!(params.optional_i64("offset"), Some(4));
        assert!(params.nested("options").bool_or("create", false));
        assert!(!params.nested("missing").bool_or("create", false));
    }
}
