use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use promscope_core::Rbac;

use crate::client::PrometheusClient;
use crate::errors::Result;
use crate::metric::PrometheusMetric;

/// The query-facing API surface: lists, shows, and evaluates metrics with
/// the caller's project scoping applied before anything reaches the
/// backend.
///
/// Every operation takes a `disable_rbac` flag threaded down from the
/// caller; it bypasses scoping for that one call. When the controller
/// never resolved an identity, all operations silently run unscoped --
/// callers that need to surface this inspect [`Rbac::is_ready`].
#[derive(Debug, Clone)]
pub struct QueryManager {
    prom: Arc<PrometheusClient>,
    rbac: Rbac,
}

impl QueryManager {
    pub fn new(prom: Arc<PrometheusClient>, rbac: Rbac) -> Self {
        if !rbac.is_ready() {
            warn!("no project id resolved, queries will run without scoping");
        }
        Self { prom, rbac }
    }

    /// The scoping controller backing this manager.
    pub fn rbac(&self) -> &Rbac {
        &self.rbac
    }

    /// Lists the names of the metrics visible to the caller, sorted.
    ///
    /// With scoping active only series carrying the caller's scope labels
    /// are consulted; otherwise the backend's full name index is listed.
    pub async fn list(&self, disable_rbac: bool) -> Result<Vec<String>> {
        if disable_rbac || !self.rbac.is_ready() {
            let mut names = self.prom.label_values("__name__").await?;
            names.sort();
            Ok(names)
        } else {
            let selector = scope_selector(&self.rbac);
            let series = self.prom.series(std::slice::from_ref(&selector)).await?;
            Ok(metric_names(series))
        }
    }

    /// Returns the current samples of one metric.
    pub async fn show(&self, metric: &str, disable_rbac: bool) -> Result<Vec<PrometheusMetric>> {
        let query = self.rbac.append_rbac(metric, disable_rbac);
        debug!(%query, "showing metric");
        self.prom.instant_query(&query).await
    }

    /// Evaluates a free-form query expression.
    pub async fn query(&self, promql: &str, disable_rbac: bool) -> Result<Vec<PrometheusMetric>> {
        let query = self.rbac.enrich_query(promql, disable_rbac);
        debug!(%query, "evaluating query");
        self.prom.instant_query(&query).await
    }

    /// Deletes the series matching the given selectors. The selectors are
    /// passed to the backend as given, without scoping.
    pub async fn delete(
        &self,
        matches: &[String],
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<()> {
        self.prom.delete_series(matches, start, end).await
    }

    pub async fn clean_tombstones(&self) -> Result<()> {
        self.prom.clean_tombstones().await
    }

    pub async fn snapshot(&self) -> Result<String> {
        self.prom.snapshot().await
    }
}

/// Renders the series selector matching everything in the caller's scope,
/// e.g. `{project='p1'}`.
fn scope_selector(rbac: &Rbac) -> String {
    format!("{{{}}}", rbac.scope_labels().to_matchers())
}

fn metric_names(series: Vec<HashMap<String, String>>) -> Vec<String> {
    let mut names: Vec<String> = series
        .into_iter()
        .filter_map(|mut labels| labels.remove("__name__"))
        .collect();
    names.sort();
    names.dedup();
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use promscope_core::ScopeLabels;

    #[test]
    fn test_scope_selector_renders_all_labels() {
        let mut scope = ScopeLabels::new();
        scope.push("project", "p1");
        scope.push("domain", "d1");
        let rbac = Rbac::from_scope(scope);
        assert_eq!("{project='p1', domain='d1'}", scope_selector(&rbac));
    }

    #[test]
    fn test_metric_names_are_sorted_and_deduplicated() {
        let series = vec![
            HashMap::from([
                ("__name__".to_string(), "metric1".to_string()),
                ("label1".to_string(), "foo".to_string()),
            ]),
            HashMap::from([("__name__".to_string(), "test42".to_string())]),
            HashMap::from([("__name__".to_string(), "abc2".to_string())]),
            HashMap::from([("__name__".to_string(), "metric1".to_string())]),
        ];
        assert_eq!(vec!["abc2", "metric1", "test42"], metric_names(series));
    }

    #[test]
    fn test_metric_names_skip_series_without_a_name() {
        let series = vec![
            HashMap::from([("label1".to_string(), "foo".to_string())]),
            HashMap::from([("__name__".to_string(), "up".to_string())]),
        ];
        assert_eq!(vec!["up"], metric_names(series));
    }
}
