use crate::quoting::LiteralMap;

/// One vector-selector occurrence inside a query string.
///
/// `start..end` is the half-open byte range the injector replaces. The
/// metric name, when present, is `start..metric_end`; a metric-less
/// selector such as `{label='x'}` has `metric_end == start`. Range
/// suffixes (`[5m]`) and the `offset`/`@` modifiers are never part of the
/// range, so replacements land before them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SelectorSpan {
    pub(crate) start: usize,
    pub(crate) end: usize,
    pub(crate) metric_end: usize,
    pub(crate) braces: Option<BraceList>,
}

/// The `{...}` part of a selector, when the query spells one out.
///
/// `labels_end` points at the closing brace, or at the end of the input
/// when the list is left unterminated (`closed == false`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BraceList {
    pub(crate) labels_start: usize,
    pub(crate) labels_end: usize,
    pub(crate) closed: bool,
}

/// Identifiers that are query-language keywords, never metric names.
const RESERVED: &[&str] = &[
    "and",
    "atan2",
    "bool",
    "by",
    "group_left",
    "group_right",
    "ignoring",
    "offset",
    "on",
    "or",
    "unless",
    "without",
];

/// Keywords whose parenthesized argument list names labels, not series.
/// Everything inside the list is skipped wholesale.
const GROUPING: &[&str] = &[
    "by",
    "group_left",
    "group_right",
    "ignoring",
    "on",
    "without",
];

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b':'
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b':'
}

/// Locates every vector selector in `query`, left to right, without
/// overlaps. Structural characters inside string literals are inert, and
/// malformed input never fails: an unterminated brace list is closed
/// implicitly at the end of the string.
pub(crate) fn locate_selectors(query: &str, literals: &LiteralMap) -> Vec<SelectorSpan> {
    let bytes = query.as_bytes();
    let mut spans = Vec::new();

    let mut i = 0;
    while i < bytes.len() {
        if literals.is_inside(i) {
            i += 1;
            continue;
        }
        let b = bytes[i];

        if is_ident_start(b) {
            let ident_end = scan_ident(bytes, i);
            let token = &query[i..ident_end];

            if RESERVED.contains(&token) {
                i = if GROUPING.contains(&token) {
                    skip_group_list(bytes, literals, ident_end)
                } else {
                    ident_end
                };
                continue;
            }

            match next_non_space(bytes, ident_end).map(|j| (j, bytes[j])) {
                // Function or aggregation call: the name is not a selector,
                // but its arguments are scanned as usual.
                Some((_, b'(')) => i = ident_end,
                Some((open, b'{')) => {
                    let (labels_end, closed) = matching_brace(bytes, literals, open);
                    let end = if closed { labels_end + 1 } else { labels_end };
                    spans.push(SelectorSpan {
                        start: i,
                        end,
                        metric_end: ident_end,
                        braces: Some(BraceList {
                            labels_start: open + 1,
                            labels_end,
                            closed,
                        }),
                    });
                    i = end;
                }
                next => {
                    // An aggregation can carry its grouping clause before the
                    // argument list, e.g. `sum by (le) (...)`. The name in
                    // front of `by`/`without` is not a selector.
                    if let Some((j, nb)) = next {
                        if is_ident_start(nb) {
                            let t = &query[j..scan_ident(bytes, j)];
                            if t == "by" || t == "without" {
                                i = ident_end;
                                continue;
                            }
                        }
                    }
                    spans.push(SelectorSpan {
                        start: i,
                        end: ident_end,
                        metric_end: ident_end,
                        braces: None,
                    });
                    i = ident_end;
                }
            }
        } else if b == b'{' {
            // Metric-less selector, e.g. `{label='no-metric'}`.
            let (labels_end, closed) = matching_brace(bytes, literals, i);
            let end = if closed { labels_end + 1 } else { labels_end };
            spans.push(SelectorSpan {
                start: i,
                end,
                metric_end: i,
                braces: Some(BraceList {
                    labels_start: i + 1,
                    labels_end,
                    closed,
                }),
            });
            i = end;
        } else if b == b'[' {
            // Range and subquery suffixes hold durations only.
            i = skip_range(bytes, literals, i);
        } else if b.is_ascii_digit() {
            i = scan_number(bytes, i);
        } else {
            i += 1;
        }
    }

    spans
}

fn scan_ident(bytes: &[u8], from: usize) -> usize {
    let mut i = from;
    while i < bytes.len() && is_ident_byte(bytes[i]) {
        i += 1;
    }
    i
}

// Numbers, durations (5m, 1h30m) and timestamps share one token shape.
fn scan_number(bytes: &[u8], from: usize) -> usize {
    let mut i = from;
    while i < bytes.len() && (is_ident_byte(bytes[i]) || bytes[i] == b'.') {
        i += 1;
    }
    i
}

fn next_non_space(bytes: &[u8], from: usize) -> Option<usize> {
    (from..bytes.len()).find(|&i| !bytes[i].is_ascii_whitespace())
}

/// Finds the brace closing the list opened at `open`, counting depth and
/// ignoring braces inside literals. Returns `(input_len, false)` when the
/// list never closes.
fn matching_brace(bytes: &[u8], literals: &LiteralMap, open: usize) -> (usize, bool) {
    let mut depth = 0i32;
    let mut i = open;
    while i < bytes.len() {
        if !literals.is_inside(i) {
            match bytes[i] {
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        return (i, true);
                    }
                }
                _ => {}
            }
        }
        i += 1;
    }
    (bytes.len(), false)
}

/// Skips the `(...)` label list following a grouping keyword, when one is
/// present. Returns the position to resume scanning from.
fn skip_group_list(bytes: &[u8], literals: &LiteralMap, from: usize) -> usize {
    match next_non_space(bytes, from) {
        Some(j) if bytes[j] == b'(' && !literals.is_inside(j) => {
            let mut depth = 0i32;
            let mut i = j;
            while i < bytes.len() {
                if !literals.is_inside(i) {
                    match bytes[i] {
                        b'(' => depth += 1,
                        b')' => {
                            depth -= 1;
                            if depth == 0 {
                                return i + 1;
                            }
                        }
                        _ => {}
                    }
                }
                i += 1;
            }
            bytes.len()
        }
        _ => from,
    }
}

fn skip_range(bytes: &[u8], literals: &LiteralMap, from: usize) -> usize {
    let mut i = from;
    while i < bytes.len() {
        if !literals.is_inside(i) && bytes[i] == b']' {
            return i + 1;
        }
        i += 1;
    }
    bytes.len()
}
