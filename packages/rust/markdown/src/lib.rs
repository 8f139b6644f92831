//! HTML-to-structured-text conversion and text normalization.
//!
//! Walks a parsed HTML subtree and emits a markdown-like stream (headings,
//! paragraphs, list items, inline code, fenced code blocks), then flattens it
//! through [`clean_text`]. Knowledge items store this flattened form.

mod normalize;

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

pub use normalize::clean_text;

/// Tags the flat scan looks for.
const BLOCK_SELECTOR: &str = "h1, h2, h3, h4, h5, h6, p, li, pre, code";

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// How the converter visits the subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traversal {
    /// Every descendant element in document order. Recognized elements nested
    /// inside other recognized elements are emitted again (a `p` inside an
    /// `li` shows up twice).
    Descendants,
    /// Only the outermost recognized elements; anything nested inside one is
    /// folded into its parent's text, with inline `code` kept as a
    /// backtick span.
    Flat,
}

/// How a document body is turned into item content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFormat {
    /// Markdown-like structure via the given traversal.
    Structured(Traversal),
    /// Normalized plain text of the subtree.
    Plain,
}

// ---------------------------------------------------------------------------
// Converter
// ---------------------------------------------------------------------------

/// Render `root` according to `format`.
pub fn render(root: ElementRef<'_>, format: BodyFormat) -> String {
    match format {
        BodyFormat::Structured(traversal) => to_structured_text(root, traversal),
        BodyFormat::Plain => plain_text(root),
    }
}

/// Convert an element subtree to normalized markdown-like text.
///
/// Never fails: if the flat scan cannot build its selector, the normalized
/// plain text of the subtree is returned instead.
pub fn to_structured_text(root: ElementRef<'_>, traversal: Traversal) -> String {
    let mut out = String::new();

    match traversal {
        Traversal::Descendants => {
            for el in root.descendants().skip(1).filter_map(ElementRef::wrap) {
                let Some(block) = Block::from_tag(el.value().name()) else {
                    continue;
                };
                if block == Block::InlineCode && inside_pre(el) {
                    continue;
                }
                block.emit(el, &mut out);
            }
        }
        Traversal::Flat => {
            let selector = match Selector::parse(BLOCK_SELECTOR) {
                Ok(sel) => sel,
                Err(e) => {
                    warn!(error = %e, "block selector rejected, falling back to plain text");
                    return plain_text(root);
                }
            };
            for el in root.select(&selector) {
                if nested_in_block(el, root) {
                    continue;
                }
                if let Some(block) = Block::from_tag(el.value().name()) {
                    block.emit_flat(el, &mut out);
                }
            }
        }
    }

    debug!(raw_len = out.len(), ?traversal, "structured text assembled");
    clean_text(&out)
}

/// Normalized text content of an element subtree.
pub fn plain_text(root: ElementRef<'_>) -> String {
    clean_text(&root.text().collect::<String>())
}

/// Normalized text content of a whole document.
pub fn document_text(doc: &Html) -> String {
    plain_text(doc.root_element())
}

// ---------------------------------------------------------------------------
// Block mapping
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    Heading(usize),
    Paragraph,
    ListItem,
    InlineCode,
    Preformatted,
}

impl Block {
    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "h1" => Some(Self::Heading(1)),
            "h2" => Some(Self::Heading(2)),
            "h3" => Some(Self::Heading(3)),
            "h4" => Some(Self::Heading(4)),
            "h5" => Some(Self::Heading(5)),
            "h6" => Some(Self::Heading(6)),
            "p" => Some(Self::Paragraph),
            "li" => Some(Self::ListItem),
            "code" => Some(Self::InlineCode),
            "pre" => Some(Self::Preformatted),
            _ => None,
        }
    }

    fn emit(self, el: ElementRef<'_>, out: &mut String) {
        self.write(el.text().collect::<String>().trim(), out);
    }

    /// Like [`Block::emit`], but text blocks render nested `code` as spans.
    fn emit_flat(self, el: ElementRef<'_>, out: &mut String) {
        match self {
            Self::InlineCode | Self::Preformatted => self.emit(el, out),
            _ => {
                let mut raw = String::new();
                inline_text(el, &mut raw);
                self.write(raw.trim(), out);
            }
        }
    }

    fn write(self, text: &str, out: &mut String) {
        match self {
            Self::Heading(level) => {
                out.push('\n');
                out.push_str(&"#".repeat(level));
                out.push(' ');
                out.push_str(text);
                out.push_str("\n\n");
            }
            Self::Paragraph => {
                out.push_str(text);
                out.push_str("\n\n");
            }
            Self::ListItem => {
                out.push_str("- ");
                out.push_str(text);
                out.push('\n');
            }
            Self::InlineCode => {
                out.push('`');
                out.push_str(text);
                out.push('`');
            }
            Self::Preformatted => {
                out.push_str("\n```\n");
                out.push_str(text);
                out.push_str("\n```\n\n");
            }
        }
    }
}

/// Text of `el` with each nested `code` element wrapped in backticks.
fn inline_text(el: ElementRef<'_>, out: &mut String) {
    for child in el.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child) = ElementRef::wrap(child) {
            if child.value().name() == "code" {
                out.push('`');
                out.push_str(child.text().collect::<String>().trim());
                out.push('`');
            } else {
                inline_text(child, out);
            }
        }
    }
}

/// Whether `el` sits anywhere inside a `<pre>`.
fn inside_pre(el: ElementRef<'_>) -> bool {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .any(|a| a.value().name() == "pre")
}

/// Whether `el` has a recognized block ancestor below `root`.
fn nested_in_block(el: ElementRef<'_>, root: ElementRef<'_>) -> bool {
    el.ancestors()
        .take_while(|node| node.id() != root.id())
        .filter_map(ElementRef::wrap)
        .any(|a| Block::from_tag(a.value().name()).is_some())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
