use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One instant-vector sample returned by the query endpoints: the label
/// set identifying the series plus the `[timestamp, value]` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrometheusMetric {
    #[serde(default)]
    pub metric: HashMap<String, String>,
    pub value: (f64, String),
}

impl PrometheusMetric {
    /// The `__name__` label, when the series carries one.
    pub fn name(&self) -> Option<&str> {
        self.metric.get("__name__").map(String::as_str)
    }

    pub fn timestamp(&self) -> f64 {
        self.value.0
    }

    /// The sample value as the backend rendered it.
    pub fn sample(&self) -> &str {
        &self.value.1
    }
}

/// The envelope every HTTP API endpoint wraps its payload in.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse {
    pub(crate) status: String,
    #[serde(default)]
    pub(crate) data: Option<serde_json::Value>,
    #[serde(default)]
    pub(crate) error: Option<String>,
    #[serde(rename = "errorType", default)]
    pub(crate) error_type: Option<String>,
    #[serde(default)]
    pub(crate) warnings: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_sample_decodes() {
        let json = r#"{"metric": {"__name__": "up", "job": "node"}, "value": [1609746000.5, "1"]}"#;
        let sample: PrometheusMetric = serde_json::from_str(json).unwrap();
        assert_eq!(Some("up"), sample.name());
        assert_eq!(1609746000.5, sample.timestamp());
        assert_eq!("1", sample.sample());
    }

    #[test]
    fn test_missing_label_map_defaults_to_empty() {
        let json = r#"{"value": [1609746000, "42"]}"#;
        let sample: PrometheusMetric = serde_json::from_str(json).unwrap();
        assert!(sample.metric.is_empty());
        assert_eq!(None, sample.name());
    }

    #[test]
    fn test_error_envelope_decodes() {
        let json = r#"{"status": "error", "errorType": "bad_data", "error": "parse error"}"#;
        let resp: ApiResponse = serde_json::from_str(json).unwrap();
        assert_eq!("error", resp.status);
        assert_eq!(Some("bad_data".to_string()), resp.error_type);
        assert_eq!(Some("parse error".to_string()), resp.error);
        assert!(resp.data.is_none());
    }

    #[test]
    fn test_success_envelope_keeps_payload() {
        let json = r#"{"status": "success", "data": ["a", "b"], "warnings": ["w"]}"#;
        let resp: ApiResponse = serde_json::from_str(json).unwrap();
        assert_eq!("success", resp.status);
        assert!(resp.data.is_some());
        assert_eq!(Some(vec!["w".to_string()]), resp.warnings);
    }
}
