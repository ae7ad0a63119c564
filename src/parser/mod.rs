//! Document extraction, then per-parameter normalization.

pub mod html;
pub mod normalize;

use crate::error::Result;
use crate::model::{Extraction, Field};
use scraper::Html;

/// Parse raw HTML and extract its parameter rows.
pub fn parse_document(input: &str) -> Result<Extraction> {
    html::extract(&Html::parse_document(input))
}

/// Normalize every extracted parameter, preserving extraction order.
pub fn normalize_all(extraction: Extraction) -> Result<(String, Vec<Field>)> {
    let fields = extraction
        .parameters
        .into_iter()
        .map(normalize::normalize)
        .collect::<Result<Vec<_>>>()?;
    Ok((extraction.kind_list, fields))
}
