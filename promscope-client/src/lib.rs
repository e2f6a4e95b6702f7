//! Promscope-Client
//!
//! Promscope-Client -- Prometheus HTTP client with per-project scoping.
//!
//! Combines the query rewriting engine from `promscope-core` with an
//! asynchronous client for the Prometheus HTTP API. The [`QueryManager`]
//! is the intended entry point: it scopes every query to the caller's
//! project before the backend sees it.

mod client;
pub use client::{PrometheusClient, PrometheusClientBuilder, PrometheusConfig};

mod metric;
pub use metric::PrometheusMetric;

mod query;
pub use query::QueryManager;

mod session;
pub use session::{EnvSession, StaticSession};

pub mod errors;

pub use promscope_core::{IdentityProvider, Rbac, ScopeLabels, DEFAULT_SCOPE_LABEL};
