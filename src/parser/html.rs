//! Parameter reference extractor. Walks the parsed HTML tree.
//!
//! Each parameter is an `<h3>` heading (label inside an `<a>`) followed by a
//! block element whose children are, in order: the requirement note, the
//! documentation, a table with one data row of five cells and the examples.

use crate::error::{GenError, Result};
use crate::model::*;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

static SEL_HEADING: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h3").unwrap());

static SEL_ANCHOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());

static SEL_CELL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr td").unwrap());

/// Number of data cells in a parameter table row.
const CELL_COUNT: usize = 5;

/// Minimum child elements of a parameter block (note, docs, table, examples).
const BLOCK_CHILDREN: usize = 4;

fn text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Extract every parameter row, capturing the kind list on the way.
pub fn extract(doc: &Html) -> Result<Extraction> {
    let mut extraction = Extraction::default();
    let mut kind_list: Option<String> = None;

    for heading in doc.select(&SEL_HEADING) {
        let param = extract_parameter(heading)?;
        if param.name == KIND_LIST_LABEL {
            kind_list = Some(param.documentation.clone());
        }
        extraction.parameters.push(param);
    }

    if extraction.parameters.is_empty() {
        return Err(GenError::Shape("no parameter headings found".to_string()));
    }
    extraction.kind_list = kind_list
        .ok_or_else(|| GenError::Shape(format!("no '{}' parameter found", KIND_LIST_LABEL)))?;
    Ok(extraction)
}

fn extract_parameter(heading: ElementRef<'_>) -> Result<ParameterDefinition> {
    let name = heading
        .select(&SEL_ANCHOR)
        .map(text)
        .collect::<String>()
        .trim()
        .to_string();
    if name.is_empty() {
        return Err(GenError::Shape(format!(
            "heading '{}' has no labelled anchor",
            text(heading)
        )));
    }

    let block = heading
        .next_siblings()
        .find_map(ElementRef::wrap)
        .ok_or_else(|| GenError::Shape(format!("'{}' has no parameter block", name)))?;

    let children: Vec<ElementRef<'_>> = block.children().filter_map(ElementRef::wrap).collect();
    if children.len() < BLOCK_CHILDREN {
        return Err(GenError::Shape(format!(
            "'{}' block has {} child elements, expected at least {}",
            name,
            children.len(),
            BLOCK_CHILDREN
        )));
    }

    let cells: Vec<String> = children[2].select(&SEL_CELL).map(text).collect();
    if cells.len() != CELL_COUNT {
        return Err(GenError::Shape(format!(
            "'{}' table has {} data cells, expected {}",
            name,
            cells.len(),
            CELL_COUNT
        )));
    }

    Ok(ParameterDefinition {
        required: !text(children[0]).contains("Optional"),
        documentation: text(children[1]),
        wire_key: cells[0].clone(),
        value_kind: cells[1].clone(),
        default_value: cells[2].clone(),
        max_length: cells[3].clone(),
        applicable_kinds: cells[4].split(", ").map(str::to_string).collect(),
        examples: text(children[3]),
        name,
    })
}
