//! Name and type normalization, as pure functions over single parameters.

use crate::error::{GenError, Result};
use crate::model::*;
use convert_case::{Case, Casing};
use regex::Regex;
use std::sync::LazyLock;

/// Soft wrap threshold for documentation comment lines.
const DOC_WIDTH: usize = 55;

static RE_PRESLASH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([^/]+)").unwrap());

static RE_NON_ALPHA: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z]").unwrap());

static RE_INDEX_VAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<([A-Za-z]+)>").unwrap());

/// Return the single capture group of `re` in `input`, failing unless the
/// pattern matches exactly once.
pub fn grep_once(re: &Regex, input: &str) -> Result<String> {
    let mut matches = re.captures_iter(input);
    let first = matches.next();
    let found = usize::from(first.is_some()) + matches.count();
    match first {
        Some(caps) if found == 1 => match caps.get(1) {
            Some(group) => Ok(group.as_str().to_string()),
            None => Err(GenError::PatternMismatch {
                pattern: re.as_str().to_string(),
                input: input.to_string(),
                found: 0,
            }),
        },
        _ => Err(GenError::PatternMismatch {
            pattern: re.as_str().to_string(),
            input: input.to_string(),
            found,
        }),
    }
}

fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Capitalize each space-separated word and concatenate.
///
/// `"custom dimension"` → `"CustomDimension"`
pub fn export_name(s: &str) -> String {
    s.split(' ').map(upper_first).collect()
}

/// Derive a type-safe identifier from a parameter label.
///
/// Drops everything from the first `/`, capitalizes words and strips
/// non-alphabetic characters. Idempotent on its own output.
pub fn identifier(name: &str) -> Result<String> {
    let head = grep_once(&RE_PRESLASH, name)?;
    let ident = RE_NON_ALPHA.replace_all(&export_name(&head), "").into_owned();
    if ident.is_empty() {
        return Err(GenError::Shape(format!(
            "parameter '{}' has no alphabetic characters",
            name
        )));
    }
    Ok(ident)
}

/// Identifier for a member, with the kind selector demoted to lowercase.
///
/// Returns the identifier and whether it was demoted.
pub fn member_ident(name: &str) -> Result<(String, bool)> {
    let ident = identifier(name)?;
    if ident == KIND_SELECTOR {
        return Ok((lower_first(&ident), true));
    }
    Ok((ident, false))
}

/// Snake-case member name for an identifier: `DocumentHostName` → `document_host_name`.
pub fn member_name(ident: &str) -> String {
    ident.to_case(Case::Snake)
}

/// Map a value-kind label from the document onto the closed vocabulary.
pub fn value_kind(label: &str) -> Result<ValueKind> {
    match label {
        "text" => Ok(ValueKind::Text),
        "integer" => Ok(ValueKind::Integer),
        "boolean" => Ok(ValueKind::Boolean),
        "currency" => Ok(ValueKind::Currency),
        _ => Err(GenError::UnknownValueKind(label.to_string())),
    }
}

/// Split a wire key on its `<ident>` placeholders.
///
/// `"cd<number>"` → `[Literal("cd"), Index("Number")]`
pub fn wire_key(raw: &str) -> WireKey {
    let mut segments = Vec::new();
    let mut last = 0;
    for caps in RE_INDEX_VAR.captures_iter(raw) {
        let whole = caps.get(0).map_or(0..0, |m| m.range());
        if whole.start > last {
            segments.push(KeySegment::Literal(raw[last..whole.start].to_string()));
        }
        segments.push(KeySegment::Index(upper_first(&caps[1])));
        last = whole.end;
    }
    if last < raw.len() || segments.is_empty() {
        segments.push(KeySegment::Literal(raw[last..].to_string()));
    }
    WireKey {
        raw: raw.to_string(),
        segments,
    }
}

/// Re-flow documentation into comment lines of roughly [`DOC_WIDTH`] chars.
pub fn wrap_docs(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut width = 0;
    for word in text.split_whitespace() {
        if width > DOC_WIDTH {
            lines.push(std::mem::take(&mut line));
            width = 0;
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
        width += word.len() + 1;
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Normalize one extracted parameter into a [`Field`].
pub fn normalize(p: ParameterDefinition) -> Result<Field> {
    let (ident, demoted) = member_ident(&p.name)?;
    Ok(Field {
        ident,
        demoted,
        value_kind: value_kind(&p.value_kind)?,
        wire_key: wire_key(&p.wire_key),
        docs: wrap_docs(p.documentation.trim()),
        label: p.name,
        required: p.required,
        default_value: p.default_value,
        max_length: p.max_length,
        examples: p.examples,
        applicable_kinds: p.applicable_kinds,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_name_capitalizes_words() {
        assert_eq!(export_name("custom dimension"), "CustomDimension");
        assert_eq!(export_name("pageview"), "Pageview");
    }

    #[test]
    fn identifier_strips_after_slash_and_symbols() {
        assert_eq!(identifier("Document Host Name").unwrap(), "DocumentHostName");
        assert_eq!(identifier("User Timing Label / Name").unwrap(), "UserTimingLabel");
        assert_eq!(identifier("Product SKU 2").unwrap(), "ProductSKU");
    }

    #[test]
    fn identifier_is_idempotent() {
        for name in ["custom dimension", "Hit type", "Queue Time / ms", "IP Override"] {
            let once = identifier(name).unwrap();
            assert_eq!(identifier(&once).unwrap(), once);
        }
    }

    #[test]
    fn identifier_rejects_leading_slash() {
        assert!(matches!(
            identifier("/odd"),
            Err(GenError::PatternMismatch { .. })
        ));
    }

    #[test]
    fn identifier_needs_letters() {
        assert!(matches!(identifier("42"), Err(GenError::Shape(_))));
    }

    #[test]
    fn member_names_are_snake_case() {
        assert_eq!(member_name("DocumentHostName"), "document_host_name");
        assert_eq!(member_name("hitType"), "hit_type");
        assert_eq!(member_name("Number"), "number");
    }

    #[test]
    fn kind_selector_is_demoted() {
        assert_eq!(member_ident("Hit type").unwrap(), ("hitType".to_string(), true));
        assert_eq!(member_ident("Hit Type").unwrap(), ("hitType".to_string(), true));
        assert_eq!(
            member_ident("Hit Types Count").unwrap(),
            ("HitTypesCount".to_string(), false)
        );
    }

    #[test]
    fn lowercase_start_is_not_demotion() {
        let field = normalize(ParameterDefinition {
            name: "3rd Party ID".into(),
            wire_key: "tp".into(),
            value_kind: "text".into(),
            applicable_kinds: vec!["all".into()],
            ..Default::default()
        })
        .unwrap();
        assert_eq!(field.ident, "rdPartyID");
        assert!(!field.demoted);
    }

    #[test]
    fn value_kinds_map_to_vocabulary() {
        assert_eq!(value_kind("text").unwrap(), ValueKind::Text);
        assert_eq!(value_kind("integer").unwrap(), ValueKind::Integer);
        assert_eq!(value_kind("boolean").unwrap(), ValueKind::Boolean);
        assert_eq!(value_kind("currency").unwrap(), ValueKind::Currency);
    }

    #[test]
    fn unknown_value_kind_is_fatal() {
        let err = value_kind("float").unwrap_err();
        assert_eq!(err.to_string(), "unknown value kind: 'float'");
    }

    #[test]
    fn plain_wire_key_has_no_substitutions() {
        let key = wire_key("v");
        assert_eq!(key.segments, vec![KeySegment::Literal("v".into())]);
        assert!(!key.is_parameterized());
    }

    #[test]
    fn wire_key_placeholders_become_index_segments() {
        let key = wire_key("il<listIndex>pi<productIndex>id");
        assert_eq!(
            key.segments,
            vec![
                KeySegment::Literal("il".into()),
                KeySegment::Index("ListIndex".into()),
                KeySegment::Literal("pi".into()),
                KeySegment::Index("ProductIndex".into()),
                KeySegment::Literal("id".into()),
            ]
        );
        assert_eq!(key.indices().count(), 2);
        assert!(key.segments.iter().all(|s| match s {
            KeySegment::Literal(text) => !text.contains('<'),
            KeySegment::Index(_) => true,
        }));
    }

    #[test]
    fn trailing_placeholder() {
        let key = wire_key("cd<number>");
        assert_eq!(
            key.segments,
            vec![
                KeySegment::Literal("cd".into()),
                KeySegment::Index("Number".into()),
            ]
        );
    }

    #[test]
    fn grep_once_counts_matches() {
        let re = Regex::new(r"'([a-z]+)'").unwrap();
        assert_eq!(grep_once(&re, " 'event'").unwrap(), "event");
        match grep_once(&re, "'a', 'b'") {
            Err(GenError::PatternMismatch { found, .. }) => assert_eq!(found, 2),
            other => panic!("expected mismatch, got {:?}", other),
        }
        assert!(grep_once(&re, "none").is_err());
    }

    #[test]
    fn wrap_breaks_after_threshold() {
        let text = "word ".repeat(30);
        let lines = wrap_docs(&text);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.len() <= DOC_WIDTH + 10));
        assert_eq!(lines.join(" "), text.trim());
    }

    #[test]
    fn wrap_empty_docs() {
        assert!(wrap_docs("").is_empty());
        assert_eq!(wrap_docs("  short  text "), vec!["short text"]);
    }

    #[test]
    fn normalize_keeps_label_and_metadata() {
        let field = normalize(ParameterDefinition {
            name: "Custom Dimension".into(),
            required: false,
            documentation: "Each custom dimension has an associated index.".into(),
            wire_key: "cd<number>".into(),
            value_kind: "text".into(),
            default_value: "None".into(),
            max_length: "150 Bytes".into(),
            applicable_kinds: vec!["event".into()],
            examples: "Sports".into(),
        })
        .unwrap();
        assert_eq!(field.label, "Custom Dimension");
        assert_eq!(field.ident, "CustomDimension");
        assert_eq!(field.max_length, "150 Bytes");
        assert_eq!(field.wire_key.indices().collect::<Vec<_>>(), vec!["Number"]);
    }
}
