use promscope_core::{errors::IdentityError, IdentityProvider};

/// Identity carrying an explicitly configured project id.
#[derive(Debug, Clone)]
pub struct StaticSession {
    project_id: String,
}

impl StaticSession {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
        }
    }
}

impl IdentityProvider for StaticSession {
    fn project_id(&self) -> Result<String, IdentityError> {
        Ok(self.project_id.clone())
    }
}

/// Identity resolved from the process environment.
///
/// Reads `OS_PROJECT_ID` by default, the variable the surrounding cloud
/// tooling exports for the authenticated project. An unset or empty
/// variable reports missing credentials, which the scoping controller
/// turns into pass-through mode.
#[derive(Debug, Clone)]
pub struct EnvSession {
    var: String,
}

impl EnvSession {
    pub const DEFAULT_VAR: &'static str = "OS_PROJECT_ID";

    pub fn new() -> Self {
        Self::from_var(Self::DEFAULT_VAR)
    }

    pub fn from_var(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvSession {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityProvider for EnvSession {
    fn project_id(&self) -> Result<String, IdentityError> {
        match std::env::var(&self.var) {
            Ok(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(IdentityError::MissingCredentials),
        }
    }
}
