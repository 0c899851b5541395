//! The uniform result shape returned by every command.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result of a single command invocation, serialized as one JSON line.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Envelope {
    pub success: bool,
    /// Human-readable summary. Never empty on failure.
    pub message: String,
    /// Command-specific payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Raw error text reported by the device or the failing call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Full cause chain, only set by the dispatcher's catch-all path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traceback: Option<String>,
}

impl Envelope {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
            error: None,
            traceback: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        let mut message = message.into();
        if message.is_empty() {
            message = "Unknown error".to_string();
        }
        Self {
            success: false,
            message,
            data: None,
            error: None,
            traceback: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn with_traceback(mut self, traceback: impl Into<String>) -> Self {
        self.traceback = Some(traceback.into());
        self
    }

    /// Serialize to the single output line.
    pub fn to_line(&self) -> String {
        match serde_json::to_string(self) {
            Ok(line) => line,
            // Only reachable with a non-string map key in `data`.
            Err(e) => format!(
                r#"{{"success":false,"message":{}}}"#,
                Value::String(format!("Failed to serialize result: {e}"))
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_failure_message_never_empty() {
        let envelope = Envelope::failure("");
        assert!(!envelope.success);
        assert_eq!(envelope.message, "Unknown error");
    }

    #[test]
    fn test_optional_fields_omitted() {
        let line = Envelope::success("Print job canceled successfully").to_line();
        assert_eq!(line, r#"{"success":true,"message":"Print job canceled successfully"}"#);
    }

    #[test]
    fn test_line_has_no_newlines() {
        let envelope = Envelope::failure("boom")
            .with_error("first\nsecond")
            .with_traceback("boom\ncaused by: first\nsecond")
            .with_data(json!({ "filename": "a.gcode" }));
        let line = envelope.to_line();
        assert!(!line.contains('\n'));
        let parsed: Envelope = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed, envelope);
    }
}
