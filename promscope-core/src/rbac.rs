use tracing::warn;

use crate::inject::inject_labels;
use crate::quoting::LiteralMap;
use crate::scope::ScopeLabels;
use crate::selector::locate_selectors;
use crate::session::IdentityProvider;

/// Label name used for tenant scoping unless the caller picks another one.
pub const DEFAULT_SCOPE_LABEL: &str = "project";

/// The per-session scoping controller.
///
/// Holds the scope label set derived from the caller's identity and
/// rewrites queries so that every vector selector carries it. Constructed
/// once per client session and immutable afterwards, so it can be shared
/// read-only across concurrent callers.
///
/// When the identity provider cannot supply a project id the controller
/// is still constructed, but `is_ready` reports false and both rewrite
/// entry points return their input unchanged. Callers that need to warn
/// the user about unscoped results must inspect `is_ready`; no error is
/// ever raised for an unresolved identity.
#[derive(Debug, Clone)]
pub struct Rbac {
    scope: ScopeLabels,
    project_id: Option<String>,
    ready: bool,
}

impl Rbac {
    /// Builds a controller scoping on the default `project` label.
    ///
    /// The provider is consulted exactly once. On failure the controller
    /// degrades to pass-through mode instead of propagating the error.
    pub fn new(session: &dyn IdentityProvider) -> Self {
        Self::with_scope_label(session, DEFAULT_SCOPE_LABEL)
    }

    /// Builds a controller scoping on a custom label name, with the value
    /// resolved from the identity provider.
    pub fn with_scope_label(session: &dyn IdentityProvider, label: impl Into<String>) -> Self {
        match session.project_id() {
            Ok(project_id) => Rbac {
                scope: ScopeLabels::single(label, project_id.clone()),
                project_id: Some(project_id),
                ready: true,
            },
            Err(err) => {
                warn!(error = %err, "project id resolution failed, query scoping is disabled");
                Rbac {
                    scope: ScopeLabels::new(),
                    project_id: None,
                    ready: false,
                }
            }
        }
    }

    /// Builds a controller from an explicit, prebuilt scope label set.
    /// An empty set yields a pass-through controller.
    pub fn from_scope(scope: ScopeLabels) -> Self {
        let ready = !scope.is_empty();
        let project_id = scope.get(DEFAULT_SCOPE_LABEL).map(str::to_string);
        Rbac {
            scope,
            project_id,
            ready,
        }
    }

    /// True when the tenant identity resolved at construction and queries
    /// will actually be scoped.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// The project id the controller scopes on, when one resolved.
    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    pub fn scope_labels(&self) -> &ScopeLabels {
        &self.scope
    }

    /// Rewrites `query` so that every vector selector carries the scope
    /// labels, leaving all other text untouched.
    ///
    /// Returns the query unchanged when `disable_rbac` is set or the
    /// controller never resolved an identity. The rewrite is a pure
    /// function of the input and the controller state: spans are located
    /// left to right and replaced right to left, so earlier offsets stay
    /// valid while the string is reassembled.
    ///
    /// Scoping is applied unconditionally, without checking whether a
    /// selector already carries a matcher for the same label; enriching
    /// an already-enriched query therefore doubles the matcher.
    pub fn enrich_query(&self, query: &str, disable_rbac: bool) -> String {
        if disable_rbac || !self.ready {
            return query.to_string();
        }

        let literals = LiteralMap::scan(query);
        let spans = locate_selectors(query, &literals);

        let mut enriched = query.to_string();
        for span in spans.iter().rev() {
            let replacement = inject_labels(query, span, &self.scope);
            enriched.replace_range(span.start..span.end, &replacement);
        }
        enriched
    }

    /// Scopes a single metric name or one already-delimited selector
    /// fragment, under the same bypass and readiness conditions as
    /// `enrich_query`.
    pub fn append_rbac(&self, fragment: &str, disable_rbac: bool) -> String {
        self.enrich_query(fragment, disable_rbac)
    }
}
