//! Promscope-Core
//!
//! Promscope-Core -- per-project scoping for PromQL-style queries.
//!
//! Rewrites metrics queries so that every vector selector carries the
//! caller's tenant label, without requiring the metrics backend to be
//! tenant-aware. The engine is a two-phase text pipeline: a locator finds
//! every selector span with the help of a quote/escape tracker, then an
//! injector rewrites each span in place. No network I/O happens here; the
//! embedding client supplies the tenant identity through the
//! [`IdentityProvider`] seam and executes the rewritten query itself.

mod inject;
mod quoting;
mod selector;

mod rbac;
pub use rbac::{Rbac, DEFAULT_SCOPE_LABEL};

mod scope;
pub use scope::ScopeLabels;

mod session;
pub use session::IdentityProvider;

pub mod errors;
