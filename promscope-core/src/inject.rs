use crate::scope::ScopeLabels;
use crate::selector::SelectorSpan;

/// Builds the replacement text for one selector span.
///
/// Three shapes, depending on what the query already spells out:
/// a bare metric name gets a synthesized `{...}` list, an empty list gets
/// the scope matchers alone, and a populated list keeps its original text
/// byte for byte and gains `, ` plus the scope matchers at the end.
///
/// A list that was implicitly closed at the end of the input is extended
/// in place; no closing brace is fabricated for it.
pub(crate) fn inject_labels(query: &str, span: &SelectorSpan, scope: &ScopeLabels) -> String {
    let matchers = scope.to_matchers();
    match &span.braces {
        None => format!("{}{{{}}}", &query[span.start..span.metric_end], matchers),
        Some(braces) => {
            let prefix = &query[span.start..braces.labels_start];
            let labels = &query[braces.labels_start..braces.labels_end];
            let suffix = &query[braces.labels_end..span.end];
            if labels.trim().is_empty() {
                format!("{prefix}{matchers}{suffix}")
            } else {
                format!("{prefix}{labels}, {matchers}{suffix}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quoting::LiteralMap;
    use crate::selector::locate_selectors;

    fn scope() -> ScopeLabels {
        ScopeLabels::single("project", "p1")
    }

    fn inject_first(query: &str, scope: &ScopeLabels) -> String {
        let literals = LiteralMap::scan(query);
        let spans = locate_selectors(query, &literals);
        inject_labels(query, &spans[0], scope)
    }

    #[test]
    fn test_bare_name_gets_synthesized_braces() {
        assert_eq!("m{project='p1'}", inject_first("m", &scope()));
    }

    #[test]
    fn test_empty_list_gets_matchers_without_comma() {
        assert_eq!("m{project='p1'}", inject_first("m{}", &scope()));
    }

    #[test]
    fn test_populated_list_is_appended_to() {
        assert_eq!(
            "m{a='x', project='p1'}",
            inject_first("m{a='x'}", &scope())
        );
    }

    #[test]
    fn test_original_matcher_text_is_untouched() {
        // Odd spacing and operators survive byte for byte.
        assert_eq!(
            "m{a!='x',b=~'y.*', project='p1'}",
            inject_first("m{a!='x',b=~'y.*'}", &scope())
        );
    }

    #[test]
    fn test_multiple_scope_labels_form_one_group() {
        let mut scope = ScopeLabels::new();
        scope.push("project", "p1");
        scope.push("domain", "d1");
        assert_eq!("m{project='p1', domain='d1'}", inject_first("m", &scope));
    }

    #[test]
    fn test_unterminated_list_is_extended_without_close() {
        assert_eq!("m{a='x', project='p1'", inject_first("m{a='x'", &scope()));
    }
}
