use serde::{Deserialize, Serialize};

/// The ordered set of labels injected into every selector.
///
/// In the common deployment this holds a single `project` entry carrying
/// the caller's tenant id, but nothing here assumes cardinality one:
/// every entry is injected, in insertion order, as one comma-separated
/// group. The set is built once and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeLabels(Vec<(String, String)>);

impl ScopeLabels {
    pub fn new() -> Self {
        Self::default()
    }

    /// A set with one entry, the usual tenant-scoping shape.
    pub fn single(name: impl Into<String>, value: impl Into<String>) -> Self {
        ScopeLabels(vec![(name.into(), value.into())])
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Renders the set as matcher text, e.g. `project='p1', domain='d1'`.
    /// Injected values are always single-quoted.
    pub fn to_matchers(&self) -> String {
        self.0
            .iter()
            .map(|(name, value)| format!("{name}='{value}'"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matchers_keep_insertion_order() {
        let mut labels = ScopeLabels::new();
        labels.push("project", "p1");
        labels.push("domain", "d1");
        assert_eq!("project='p1', domain='d1'", labels.to_matchers());
    }

    #[test]
    fn test_single_entry() {
        let labels = ScopeLabels::single("project", "p1");
        assert_eq!(1, labels.len());
        assert_eq!(Some("p1"), labels.get("project"));
        assert_eq!("project='p1'", labels.to_matchers());
    }

    #[test]
    fn test_empty_set_renders_nothing() {
        assert!(ScopeLabels::new().is_empty());
        assert_eq!("", ScopeLabels::new().to_matchers());
    }
}
