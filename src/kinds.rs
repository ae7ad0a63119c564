//! Kind model builder: group normalized fields into record kinds.
//!
//! Kinds are seeded from the quoted names in the `Hit type` documentation
//! plus the catch-all kind, which collects every field tagged `all`.

use crate::error::{GenError, Result};
use crate::model::*;
use crate::parser::normalize::{grep_once, member_name};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

static RE_KIND_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"'([a-z]+)'").unwrap());

/// Member synthesized on the catch-all kind ahead of its declared fields.
pub const TRANSPORT_MEMBER: &str = "use_tls";

/// Every record kind, keyed by raw name. Immutable once built.
#[derive(Debug)]
pub struct KindModel {
    kinds: BTreeMap<String, RecordKind>,
}

impl KindModel {
    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<&RecordKind> {
        self.kinds.get(name)
    }

    /// Kinds in raw-name order.
    pub fn iter(&self) -> impl Iterator<Item = &RecordKind> {
        self.kinds.values()
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }
}

/// Split the kind-list documentation into raw kind names.
///
/// `"Must be one of 'pageview', 'event'."` → `["pageview", "event"]`
pub fn kind_names(kind_list: &str) -> Result<Vec<String>> {
    kind_list
        .split(',')
        .map(|chunk| grep_once(&RE_KIND_NAME, chunk))
        .collect()
}

/// Group fields into kinds and derive index fields, required flags and
/// the catch-all's member kind list.
pub fn build(kind_list: &str, fields: Vec<Field>) -> Result<KindModel> {
    let mut kinds: BTreeMap<String, RecordKind> = BTreeMap::new();
    kinds.insert(CATCH_ALL.to_string(), RecordKind::new(CATCH_ALL));
    for name in kind_names(kind_list)? {
        kinds
            .entry(name.clone())
            .or_insert_with(|| RecordKind::new(&name));
    }

    for field in &fields {
        let tagged_all = field.applicable_kinds.iter().any(|k| k == ALL_SENTINEL);
        if tagged_all && field.applicable_kinds.len() > 1 {
            log::warn!(
                "'{}' is tagged 'all' and also {:?}; it becomes a member of each",
                field.label,
                field.applicable_kinds
            );
        }

        for kind_name in &field.applicable_kinds {
            let key = if kind_name == ALL_SENTINEL {
                CATCH_ALL
            } else {
                kind_name.as_str()
            };
            let kind = kinds
                .get_mut(key)
                .ok_or_else(|| GenError::UnknownKind(kind_name.clone()))?;
            kind.fields.push(field.clone());
        }
    }

    let mut concrete: Vec<String> = kinds
        .keys()
        .filter(|name| name.as_str() != CATCH_ALL)
        .cloned()
        .collect();
    concrete.sort();

    for kind in kinds.values_mut() {
        finalize(kind);
        if kind.is_catch_all() {
            kind.member_kind_names = concrete.clone();
        }
        check_members(kind)?;
    }

    log::debug!("built {} record kinds", kinds.len());
    Ok(KindModel { kinds })
}

fn finalize(kind: &mut RecordKind) {
    let catch_all = kind.is_catch_all();
    for field in kind.fields.iter_mut() {
        // Event.EventAction reads as Event.Action
        if !catch_all {
            if let Some(rest) = field.ident.strip_prefix(kind.display_name.as_str()) {
                if !rest.is_empty() {
                    field.ident = rest.to_string();
                }
            }
        }
        kind.index_fields.extend(field.wire_key.indices().map(str::to_string));
        kind.has_required_field |= field.required;
    }
}

/// Reject kinds whose generated members would collide.
fn check_members(kind: &RecordKind) -> Result<()> {
    let mut seen: BTreeSet<String> = BTreeSet::new();
    if kind.is_catch_all() {
        seen.insert(TRANSPORT_MEMBER.to_string());
    }
    let names = kind
        .fields
        .iter()
        .map(|f| f.ident.as_str())
        .chain(kind.index_fields.iter().map(String::as_str));
    for ident in names {
        let member = member_name(ident);
        if !seen.insert(member.clone()) {
            return Err(GenError::DuplicateMember {
                kind: kind.name.clone(),
                member,
            });
        }
    }
    Ok(())
}
