use serde_json::Value;

/// Print-job activity as reported by the device's job endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobState {
    Idle,
    Printing,
    Paused,
    Finished,
    Error,
    /// Missing or unrecognized state; keeps the raw text when there was one.
    Unknown(Option<String>),
}

impl JobState {
    /// Map the device's `state` string. `Printing` is matched exactly.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "Printing" => JobState::Printing,
            "Paused" | "Pausing" => JobState::Paused,
            "Operational" | "Idle" | "Ready" => JobState::Idle,
            "Finished" => JobState::Finished,
            "Error" => JobState::Error,
            other => JobState::Unknown(Some(other.to_string())),
        }
    }

    /// Read the `state` field out of a decoded job report.
    pub fn from_job(job: &Value) -> Self {
        match job.get("state").and_then(Value::as_str) {
            Some(raw) => Self::parse(raw),
            None => JobState::Unknown(None),
        }
    }

    /// Cancellation is only allowed while actively printing.
    pub fn can_cancel(&self) -> bool {
        matches!(self, JobState::Printing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_only_printing_can_cancel() {
        assert!(JobState::from_job(&json!({ "state": "Printing" })).can_cancel());
        let refused = [
            "Paused", "Idle", "Operational", "Finished", "Error", "PRINTING", "printing", "",
        ];
        for raw in refused {
            assert!(!JobState::parse(raw).can_cancel(), "{raw} must not allow cancel");
        }
    }

    #[test]
    fn test_missing_state_is_unknown() {
        assert_eq!(JobState::from_job(&json!({ "job": null })), JobState::Unknown(None));
        assert_eq!(JobState::from_job(&json!({ "state": 3 })), JobState::Unknown(None));
        assert_eq!(JobState::parse("Busy"), JobState::Unknown(Some("Busy".to_string())));
    }
}
