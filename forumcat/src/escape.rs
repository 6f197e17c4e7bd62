use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Matches a bare `&`, capturing a following named entity body when present.
static AMPERSAND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&([0-9A-Za-z_]+;)?").expect("ampersand pattern is valid"));

/// Escapes `&`, `<`, `>` and `"` for safe inclusion in HTML.
///
/// An `&` that already starts an entity reference (word characters followed by `;`, as in
/// `&amp;` or `&nbsp;`) is left alone, so escaping is idempotent.
pub fn escape_html(input: &str) -> String {
    let ampersands = AMPERSAND.replace_all(input, |caps: &Captures<'_>| match caps.get(1) {
        Some(entity) => format!("&{}", entity.as_str()),
        None => "&amp;".to_string(),
    });

    let mut escaped = String::with_capacity(ampersands.len());
    for ch in ampersands.chars() {
        match ch {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            other => escaped.push(other),
        }
    }
    escaped
}
