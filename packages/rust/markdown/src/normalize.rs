//! Whitespace and invisible-character normalization.

use std::sync::LazyLock;

use regex::Regex;

/// Collapse whitespace runs to one space, trim, and drop zero-width characters.
///
/// Zero-width space/non-joiner/joiner and the byte-order mark are removed
/// first, so removing them can never leave a double or edge space behind.
pub fn clean_text(text: &str) -> String {
    static INVISIBLE_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"[\x{200B}-\x{200D}\x{FEFF}]").expect("valid regex")
    });
    static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

    let visible = INVISIBLE_RE.replace_all(text, "");
    WS_RE.replace_all(visible.trim(), " ").into_owned()
}
