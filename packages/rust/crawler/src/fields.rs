//! Title and author extraction via ordered fallback chains.
//!
//! A chain is a slice of [`FieldRule`]s tried in order; the first rule that
//! produces a value wins. Rules are pure functions of the parsed document.

use scraper::{Html, Selector};

use gleaner_markdown::{clean_text, plain_text};

/// Placeholder title when no rule produces one.
pub const UNTITLED: &str = "Untitled";

/// Default title chain: first `<h1>`, then `<title>`.
pub const TITLE_RULES: &[FieldRule] = &[FieldRule::new("h1"), FieldRule::new("title")];

/// Default author chain, highest priority first.
pub const AUTHOR_RULES: &[FieldRule] = &[
    FieldRule::new(r#"meta[name="author"]"#),
    FieldRule::new(".author"),
    FieldRule::new(".by-author"),
    FieldRule::new(".post-author"),
    FieldRule::new(r#"[rel="author"]"#),
    FieldRule::new(".byline"),
];

/// One step of a fallback chain: the first element matching a CSS selector.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    selector: &'static str,
}

impl FieldRule {
    pub const fn new(selector: &'static str) -> Self {
        Self { selector }
    }

    /// Value of the first matching element, or `None` when nothing matches.
    ///
    /// `<meta>` elements yield their trimmed `content` attribute; anything
    /// else yields its normalized text. An unparseable selector never matches.
    pub fn apply(&self, doc: &Html) -> Option<String> {
        let sel = Selector::parse(self.selector).ok()?;
        let el = doc.select(&sel).next()?;

        if el.value().name() == "meta" {
            let content = el.value().attr("content").unwrap_or_default();
            Some(content.trim().to_string())
        } else {
            Some(plain_text(el))
        }
    }
}

/// Title from the first rule yielding non-empty text, else `placeholder`.
pub fn extract_title(doc: &Html, rules: &[FieldRule], placeholder: &str) -> String {
    rules
        .iter()
        .find_map(|rule| rule.apply(doc).filter(|title| !title.is_empty()))
        .unwrap_or_else(|| clean_text(placeholder))
}

/// Author from the first rule whose selector matches, else `""`.
///
/// Priority list, not a merge: a matching element with empty text still wins.
pub fn extract_author(doc: &Html, rules: &[FieldRule]) -> String {
    rules
        .iter()
        .find_map(|rule| rule.apply(doc))
        .unwrap_or_default()
}
