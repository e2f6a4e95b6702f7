/// Per-byte map of which parts of a query sit inside a quoted string literal.
///
/// Built in a single pass over the input. A `'` or `"` opens a literal and
/// only the same character closes it again, so an apostrophe inside a
/// double-quoted value stays inert. A backslash escapes the byte that
/// follows it, which keeps `\'` and `\"` from terminating the literal and
/// lets `\\` end one right before the closing quote.
///
/// Unterminated literals are not an error: everything from the opening
/// quote to the end of the input reports as inside the literal.
#[derive(Debug)]
pub(crate) struct LiteralMap {
    inside: Vec<bool>,
}

impl LiteralMap {
    pub(crate) fn scan(input: &str) -> Self {
        let bytes = input.as_bytes();
        let mut inside = vec![false; bytes.len()];
        let mut open: Option<u8> = None;

        let mut i = 0;
        while i < bytes.len() {
            match open {
                Some(quote) => {
                    inside[i] = true;
                    if bytes[i] == b'\\' {
                        // The escaped byte belongs to the literal as well.
                        if i + 1 < bytes.len() {
                            inside[i + 1] = true;
                        }
                        i += 2;
                        continue;
                    }
                    if bytes[i] == quote {
                        open = None;
                    }
                }
                None => {
                    if bytes[i] == b'\'' || bytes[i] == b'"' {
                        open = Some(bytes[i]);
                        inside[i] = true;
                    }
                }
            }
            i += 1;
        }

        LiteralMap { inside }
    }

    /// True if the byte at `idx` is part of a string literal, including
    /// both quote delimiters.
    pub(crate) fn is_inside(&self, idx: usize) -> bool {
        self.inside.get(idx).copied().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inside_of(input: &str) -> Vec<usize> {
        let map = LiteralMap::scan(input);
        (0..input.len()).filter(|&i| map.is_inside(i)).collect()
    }

    #[test]
    fn test_plain_text_has_no_literals() {
        assert!(inside_of("rate(http_requests[5m])").is_empty());
    }

    #[test]
    fn test_quoted_value_is_inside() {
        //        0123456789
        let q = "m{a='xy'}";
        assert_eq!(vec![4, 5, 6, 7], inside_of(q));
    }

    #[test]
    fn test_mixed_quotes_do_not_close_each_other() {
        // The apostrophe inside the double-quoted value must not close it.
        let q = r#"m{a="it's"}"#;
        let map = LiteralMap::scan(q);
        assert!(map.is_inside(q.find('\'').unwrap()));
        assert!(!map.is_inside(q.len() - 1));
    }

    #[test]
    fn test_escaped_quote_does_not_close() {
        // 'ab\'c' -- the escaped quote is content, the last quote closes.
        let q = r"m{a='ab\'c'}";
        let map = LiteralMap::scan(q);
        assert!(map.is_inside(8)); // the escaped quote
        assert!(map.is_inside(10)); // the closing quote
        assert!(!map.is_inside(11)); // the brace after it
    }

    #[test]
    fn test_escaped_backslash_then_quote_closes() {
        // 'ab\\' -- the backslash is escaped, the quote terminates.
        let q = r"m{a='ab\\'}";
        let map = LiteralMap::scan(q);
        assert!(map.is_inside(9)); // the closing quote
        assert!(!map.is_inside(10)); // the brace after it
    }

    #[test]
    fn test_unterminated_literal_runs_to_end() {
        let q = "m{a='never closed}";
        let map = LiteralMap::scan(q);
        for i in 4..q.len() {
            assert!(map.is_inside(i), "byte {i} should be inside");
        }
    }

    #[test]
    fn test_braces_inside_literal_are_covered() {
        let q = "m{a='{}{'}";
        let map = LiteralMap::scan(q);
        assert!(map.is_inside(5));
        assert!(map.is_inside(6));
        assert!(map.is_inside(7));
        assert!(!map.is_inside(9)); // the structural closing brace
    }
}
