//! Small helpers over `scraper` used by the HTML-scraping adapters.
//!
//! `scraper::Html` is not `Send`, so pages are always parsed inside a
//! synchronous function that returns owned values before the next `.await`.

use crate::error::LookupError;
use scraper::{ElementRef, Selector};

/// Compile a CSS selector
pub(crate) fn selector(css: &str) -> Result<Selector, LookupError> {
    Selector::parse(css).map_err(|e| LookupError::Selector {
        selector: css.to_string(),
        reason: e.to_string(),
    })
}

/// Concatenated, trimmed text content of an element
pub(crate) fn text_of(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
