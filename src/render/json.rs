//! JSON renderer. Dumps the kind model for inspection.
//!
//! Unlike the Rust renderer this keeps the advisory metadata (default value,
//! max length, examples) of every field.

use crate::error::{GenError, Result};
use crate::model::RecordKind;
use crate::render::Renderer;

pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, kind: &RecordKind) -> Result<String> {
        let mut out = serde_json::to_string_pretty(kind).map_err(|source| GenError::Dump {
            kind: kind.name.clone(),
            source,
        })?;
        out.push('\n');
        Ok(out)
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::normalize::normalize;
    use crate::model::ParameterDefinition;
    use serde_json::Value;

    #[test]
    fn dump_keeps_advisory_metadata() {
        let mut kind = RecordKind::new("event");
        kind.fields.push(
            normalize(ParameterDefinition {
                name: "Custom Metric".into(),
                wire_key: "cm<number>".into(),
                value_kind: "integer".into(),
                default_value: "None".into(),
                max_length: "None".into(),
                examples: "Example value: 47".into(),
                applicable_kinds: vec!["event".into()],
                ..Default::default()
            })
            .unwrap(),
        );
        kind.index_fields.insert("Number".into());

        let out = JsonRenderer.render(&kind).unwrap();
        let v: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v["display_name"], "Event");
        assert_eq!(v["fields"][0]["value_kind"], "integer");
        assert_eq!(v["fields"][0]["examples"], "Example value: 47");
        assert_eq!(v["fields"][0]["wire_key"]["segments"][1]["kind"], "index");
        assert_eq!(v["index_fields"][0], "Number");
        assert!(v.get("member_kind_names").is_none());
    }
}
