//! Text normalization ahead of tokenization.
//!
//! Markup, links, and addresses carry no signal the classifier was trained
//! on; stripping them before inference keeps short inputs from being
//! dominated by boilerplate.

use newscheck_core::Result;
use regex::Regex;

/// Normalizes raw submitted text into the form the classifier expects.
///
/// Pure and deterministic: no I/O, and malformed input is treated as an
/// ordinary string. Always produces a string output, possibly empty.
pub struct TextNormalizer {
    tags: Regex,
    urls: Regex,
    emails: Regex,
    whitespace: Regex,
}

impl TextNormalizer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            tags: Self::build_pattern(r"<[^>]+>")?,
            urls: Self::build_pattern(r"https?://\S+|www\.\S+")?,
            emails: Self::build_pattern(r"\S+@\S+")?,
            whitespace: Self::build_pattern(r"\s+")?,
        })
    }

    fn build_pattern(pattern: &str) -> Result<Regex> {
        Regex::new(pattern).map_err(|e| {
            newscheck_core::Error::config(format!(
                "failed to compile normalizer pattern {pattern:?}: {e}"
            ))
        })
    }

    /// Clean raw input text:
    /// 1. Decode HTML entities (`&amp;` -> `&`)
    /// 2. Strip HTML tags
    /// 3. Strip URL-shaped substrings
    /// 4. Strip email-shaped tokens
    /// 5. Collapse consecutive whitespace; trim
    ///
    /// Entities decode before tag stripping so markup arriving encoded is
    /// still removed as markup.
    pub fn clean(&self, raw: &str) -> String {
        let text = html_escape::decode_html_entities(raw);
        let text = self.tags.replace_all(&text, "");
        let text = self.urls.replace_all(&text, "");
        let text = self.emails.replace_all(&text, "");
        let text = self.whitespace.replace_all(&text, " ");
        text.trim().to_string()
    }
}
