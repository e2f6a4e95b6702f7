use std::collections::HashMap;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::{PromscopeError, Result};
use crate::metric::{ApiResponse, PrometheusMetric};

/// Connection settings for the metrics backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrometheusConfig {
    /// Base URL of the backend, without the `/api/v1` suffix.
    pub root_url: String,
    /// Per-request timeout.
    pub timeout_ms: u64,
}

impl Default for PrometheusConfig {
    fn default() -> Self {
        Self {
            root_url: "http://127.0.0.1:9090".to_string(),
            timeout_ms: 10_000,
        }
    }
}

/// Asynchronous client for the Prometheus HTTP API.
///
/// Wraps a shared connection pool, so cloning is cheap and clones can be
/// used concurrently. Every request asks for a JSON response; endpoints
/// answering with an error envelope surface as [`PromscopeError::Api`]
/// rather than a bare HTTP status.
#[derive(Debug, Clone)]
pub struct PrometheusClient {
    cfg: PrometheusConfig,
    http: reqwest::Client,
}

impl PrometheusClient {
    /// Initializes a new `PrometheusClientBuilder` instance.
    pub fn builder() -> PrometheusClientBuilder {
        PrometheusClientBuilder::default()
    }

    pub fn new(cfg: PrometheusConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .default_headers(headers)
            .build()?;
        Ok(Self { cfg, http })
    }

    /// Evaluates an instant query and returns the resulting samples.
    pub async fn instant_query(&self, query: &str) -> Result<Vec<PrometheusMetric>> {
        let resp = self.get("query", &[("query", query)]).await?;
        decode_instant_result(resp.data.unwrap_or(serde_json::Value::Null))
    }

    /// Returns the label sets of all series matching the given selectors.
    pub async fn series(&self, matches: &[String]) -> Result<Vec<HashMap<String, String>>> {
        let params: Vec<(&str, &str)> = matches.iter().map(|m| ("match[]", m.as_str())).collect();
        let resp = self.get("series", &params).await?;
        Ok(serde_json::from_value(
            resp.data.unwrap_or(serde_json::Value::Null),
        )?)
    }

    /// Returns all known values of one label, e.g. `__name__`.
    pub async fn label_values(&self, label: &str) -> Result<Vec<String>> {
        let path = format!("label/{label}/values");
        let resp = self.get(&path, &[]).await?;
        Ok(serde_json::from_value(
            resp.data.unwrap_or(serde_json::Value::Null),
        )?)
    }

    /// Deletes the series matching the given selectors from the TSDB.
    /// Start and end bound the deleted range when provided.
    pub async fn delete_series(
        &self,
        matches: &[String],
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<()> {
        let mut params: Vec<(&str, &str)> =
            matches.iter().map(|m| ("match[]", m.as_str())).collect();
        if let Some(start) = start {
            params.push(("start", start));
        }
        if let Some(end) = end {
            params.push(("end", end));
        }
        self.post_no_content("admin/tsdb/delete_series", &params)
            .await
    }

    /// Removes deleted data from disk and cleans up the tombstones.
    pub async fn clean_tombstones(&self) -> Result<()> {
        self.post_no_content("admin/tsdb/clean_tombstones", &[])
            .await
    }

    /// Takes a TSDB snapshot and returns the snapshot directory name.
    pub async fn snapshot(&self) -> Result<String> {
        let resp = self.post("admin/tsdb/snapshot", &[]).await?;
        let data: SnapshotData =
            serde_json::from_value(resp.data.unwrap_or(serde_json::Value::Null))?;
        Ok(data.name)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/v1/{}", self.cfg.root_url.trim_end_matches('/'), path)
    }

    async fn get(&self, path: &str, params: &[(&str, &str)]) -> Result<ApiResponse> {
        let resp = self
            .http
            .get(self.endpoint(path))
            .query(params)
            .send()
            .await?;
        decode_envelope(&resp.text().await?)
    }

    async fn post(&self, path: &str, params: &[(&str, &str)]) -> Result<ApiResponse> {
        let resp = self
            .http
            .post(self.endpoint(path))
            .query(params)
            .send()
            .await?;
        decode_envelope(&resp.text().await?)
    }

    // The TSDB admin endpoints answer 204 with an empty body on success
    // and a JSON envelope only on failure.
    async fn post_no_content(&self, path: &str, params: &[(&str, &str)]) -> Result<()> {
        let resp = self
            .http
            .post(self.endpoint(path))
            .query(params)
            .send()
            .await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        let body = resp.text().await?;
        match decode_envelope(&body) {
            Ok(_) => Err(PromscopeError::Unrecoverable(format!(
                "unexpected response status {status}"
            ))),
            Err(err) => Err(err),
        }
    }
}

fn decode_envelope(body: &str) -> Result<ApiResponse> {
    let parsed: ApiResponse = serde_json::from_str(body)?;
    if let Some(warnings) = &parsed.warnings {
        for warning in warnings {
            warn!(warning = %warning, "prometheus returned a warning");
        }
    }
    if parsed.status != "success" {
        return Err(PromscopeError::Api {
            error_type: parsed.error_type.unwrap_or_default(),
            message: parsed.error.unwrap_or_default(),
        });
    }
    Ok(parsed)
}

#[derive(Debug, Deserialize)]
struct QueryData {
    #[serde(rename = "resultType")]
    result_type: String,
    result: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct SnapshotData {
    name: String,
}

fn decode_instant_result(data: serde_json::Value) -> Result<Vec<PrometheusMetric>> {
    let data: QueryData = serde_json::from_value(data)?;
    match data.result_type.as_str() {
        "vector" => Ok(serde_json::from_value(data.result)?),
        "scalar" => {
            let value: (f64, String) = serde_json::from_value(data.result)?;
            Ok(vec![PrometheusMetric {
                metric: HashMap::new(),
                value,
            }])
        }
        other => Err(PromscopeError::UnexpectedResultType(other.to_string())),
    }
}

/// A builder for configuring and creating a `PrometheusClient` instance.
#[derive(Debug, Clone, Default)]
pub struct PrometheusClientBuilder {
    cfg: PrometheusConfig,
}

impl PrometheusClientBuilder {
    /// Sets the base URL of the metrics backend.
    pub fn root_url(mut self, url: impl Into<String>) -> Self {
        self.cfg.root_url = url.into();
        self
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn build(self) -> Result<PrometheusClient> {
        PrometheusClient::new(self.cfg)
    }
}
