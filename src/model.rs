//! Format-agnostic data model for extracted parameters and record kinds.

use serde::Serialize;
use std::collections::BTreeSet;

/// Raw name of the catch-all kind holding every common field.
pub const CATCH_ALL: &str = "client";

/// Applicable-kinds entry meaning "belongs to the catch-all kind".
pub const ALL_SENTINEL: &str = "all";

/// Label of the row whose documentation enumerates every kind name.
pub const KIND_LIST_LABEL: &str = "Hit type";

/// Identifier reserved for the synthesized kind-selector member.
pub const KIND_SELECTOR: &str = "HitType";

/// One row of the parameter reference, trimmed but otherwise untouched.
#[derive(Debug, Clone, Default)]
pub struct ParameterDefinition {
    pub name: String,
    pub required: bool,
    pub documentation: String,
    pub wire_key: String,
    pub value_kind: String,
    pub default_value: String,
    pub max_length: String,
    /// Kind names, in document order. May contain [`ALL_SENTINEL`].
    pub applicable_kinds: Vec<String>,
    pub examples: String,
}

/// Everything the extractor pulls out of one document.
#[derive(Debug, Default)]
pub struct Extraction {
    pub parameters: Vec<ParameterDefinition>,
    /// Documentation cell of the [`KIND_LIST_LABEL`] row.
    pub kind_list: String,
}

/// Closed value-kind vocabulary of the parameter reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Text,
    Integer,
    Boolean,
    Currency,
}

/// Piece of a wire key: literal text or a reference to an index member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum KeySegment {
    Literal(String),
    Index(String),
}

/// Wire key rewritten into an assembly expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WireKey {
    pub raw: String,
    pub segments: Vec<KeySegment>,
}

impl WireKey {
    /// Index member names referenced by this key, in key order.
    pub fn indices(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            KeySegment::Index(name) => Some(name.as_str()),
            KeySegment::Literal(_) => None,
        })
    }

    pub fn is_parameterized(&self) -> bool {
        self.indices().next().is_some()
    }
}

/// A normalized parameter, as carried by a record kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    /// Human-readable label, used in validation messages.
    pub label: String,
    /// PascalCase identifier (or the demoted selector identifier).
    pub ident: String,
    /// Set only on the field colliding with [`KIND_SELECTOR`].
    pub demoted: bool,
    pub required: bool,
    /// Documentation re-wrapped into comment lines.
    pub docs: Vec<String>,
    pub value_kind: ValueKind,
    pub wire_key: WireKey,
    pub default_value: String,
    pub max_length: String,
    pub examples: String,
    pub applicable_kinds: Vec<String>,
}

/// One generated record type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordKind {
    pub name: String,
    pub display_name: String,
    /// Extraction order.
    pub fields: Vec<Field>,
    pub index_fields: BTreeSet<String>,
    pub has_required_field: bool,
    /// Sorted raw names of every concrete kind; catch-all only.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub member_kind_names: Vec<String>,
}

impl RecordKind {
    pub fn new(name: &str) -> Self {
        RecordKind {
            name: name.to_string(),
            display_name: crate::parser::normalize::export_name(name),
            fields: Vec::new(),
            index_fields: BTreeSet::new(),
            has_required_field: false,
            member_kind_names: Vec::new(),
        }
    }

    pub fn is_catch_all(&self) -> bool {
        self.name == CATCH_ALL
    }
}
