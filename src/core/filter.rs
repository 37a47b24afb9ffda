/// Row predicate applied to one field value.
///
/// `Equals` compares case-insensitively, `Like` matches a pattern where `%`
/// stands for zero or more characters. Every other pattern character is
/// literal; there is no single-character wildcard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowFilter {
    Equals(String),
    Like(String),
}

impl RowFilter {
    #[must_use]
    pub fn matches(&self, field: &str) -> bool {
        match self {
            Self::Equals(value) => field.eq_ignore_ascii_case(value),
            Self::Like(pattern) => like_match(field, pattern),
        }
    }
}

/// Matches `value` against `pattern` where `%` expands to any run of
/// characters (including none). The pattern covers the whole value: segments
/// between wildcards are literal and must appear in order.
fn like_match(value: &str, pattern: &str) -> bool {
    let segments: Vec<&str> = pattern.split('%').collect();
    if segments.len() == 1 {
        return value == pattern;
    }

    let first = segments[0];
    let last = segments[segments.len() - 1];
    let Some(mut rest) = value.strip_prefix(first) else {
        return false;
    };

    for segment in &segments[1..segments.len() - 1] {
        if segment.is_empty() {
            continue;
        }
        match rest.find(segment) {
            Some(at) => rest = &rest[at + segment.len()..],
            None => return false,
        }
    }

    rest.ends_with(last)
}
