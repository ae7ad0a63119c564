//! Trait-based dispatch over output formats.

pub mod json;
pub mod rust;

use crate::error::Result;
use crate::kinds::KindModel;
use crate::model::RecordKind;
use anyhow::anyhow;

/// Trait for rendering record kinds into a specific output format.
pub trait Renderer {
    /// Render one self-contained output unit for a kind.
    fn render(&self, kind: &RecordKind) -> Result<String>;

    /// Render the unit tying all kinds together, if the format has one.
    fn render_index(&self, _model: &KindModel) -> Result<Option<(String, String)>> {
        Ok(None)
    }

    fn file_extension(&self) -> &str;
}

/// Create a renderer for the given format name.
pub fn create_renderer(format: &str) -> anyhow::Result<Box<dyn Renderer>> {
    match format {
        "rust" | "rs" => Ok(Box::new(rust::RustRenderer)),
        "json" => Ok(Box::new(json::JsonRenderer)),
        _ => Err(anyhow!("unknown format: {}. Use rust or json", format)),
    }
}

/// Base name of a kind's output unit: `event` → `type_event`.
pub fn unit_name(kind: &RecordKind) -> String {
    format!("type_{}", kind.name)
}

/// Render every unit in memory, in kind-name order.
///
/// Returns `(file name, contents)` pairs; nothing is written on failure.
pub fn render_all(renderer: &dyn Renderer, model: &KindModel) -> Result<Vec<(String, String)>> {
    let ext = renderer.file_extension();
    let mut units = Vec::with_capacity(model.len() + 1);
    for kind in model.iter() {
        let contents = renderer.render(kind)?;
        units.push((format!("{}.{}", unit_name(kind), ext), contents));
    }
    if let Some(index) = renderer.render_index(model)? {
        units.push(index);
    }
    Ok(units)
}
