//! Rust renderer. One module per record kind plus a shared `mod.rs`.
//!
//! Units are assembled as token streams from small fragments (dispatch, base
//! members, declared members, index members, encode body), then parsed with
//! `syn` and pretty-printed, so a malformed fragment fails the whole run.

use crate::error::{GenError, Result};
use crate::kinds::{KindModel, TRANSPORT_MEMBER};
use crate::model::*;
use crate::parser::normalize::{export_name, member_name};
use crate::render::{unit_name, Renderer};
use proc_macro2::{Ident, Span, TokenStream};
use quote::{format_ident, quote};

const HEADER: &str = "// Code generated by hitgen. DO NOT EDIT.\n\n";

const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized",
    "use", "virtual", "where", "while", "yield",
];

/// Keywords that cannot be raw identifiers either.
const PATH_KEYWORDS: &[&str] = &["crate", "self", "super"];

pub struct RustRenderer;

impl Renderer for RustRenderer {
    fn render(&self, kind: &RecordKind) -> Result<String> {
        format_unit(&kind.name, unit(kind))
    }

    fn render_index(&self, model: &KindModel) -> Result<Option<(String, String)>> {
        let text = format_unit("mod", support_module(model))?;
        Ok(Some(("mod.rs".to_string(), text)))
    }

    fn file_extension(&self) -> &str {
        "rs"
    }
}

fn format_unit(name: &str, tokens: TokenStream) -> Result<String> {
    let file = syn::parse_file(&tokens.to_string()).map_err(|source| GenError::Template {
        kind: name.to_string(),
        source,
    })?;
    Ok(format!("{}{}", HEADER, prettyplease::unparse(&file)))
}

/// Struct member identifier for a field or index identifier.
pub fn member(ident: &str) -> Ident {
    let name = member_name(ident);
    if PATH_KEYWORDS.contains(&name.as_str()) {
        format_ident!("{}_", name)
    } else if KEYWORDS.contains(&name.as_str()) {
        Ident::new_raw(&name, Span::call_site())
    } else {
        format_ident!("{}", name)
    }
}

fn type_ident(kind: &RecordKind) -> Ident {
    format_ident!("{}", kind.display_name)
}

fn variant_ident(raw_kind: &str) -> Ident {
    format_ident!("{}", export_name(raw_kind))
}

fn member_type(value_kind: ValueKind) -> TokenStream {
    match value_kind {
        ValueKind::Text => quote!(String),
        ValueKind::Integer => quote!(Option<i64>),
        ValueKind::Boolean => quote!(Option<bool>),
        ValueKind::Currency => quote!(Option<f64>),
    }
}

fn doc_attrs(lines: &[String]) -> TokenStream {
    let lines = lines.iter().map(|l| format!(" {}", l));
    quote!(#(#[doc = #lines])*)
}

/// The complete unit for one kind.
pub fn unit(kind: &RecordKind) -> TokenStream {
    let ty = type_ident(kind);
    let imports = imports(kind);
    let dispatch = if kind.is_catch_all() {
        dispatch(kind)
    } else {
        TokenStream::new()
    };
    let (kind_const, hit_impl) = if kind.is_catch_all() {
        (TokenStream::new(), TokenStream::new())
    } else {
        let variant = variant_ident(&kind.name);
        let kind_const = quote! {
            /// Kind discriminant sent as the hit type.
            pub const KIND: HitKind = HitKind::#variant;
        };
        let hit_impl = quote! {
            impl super::Hit for #ty {
                fn kind(&self) -> HitKind {
                    Self::KIND
                }

                fn add_fields(&self, v: &mut Params) -> super::Result<()> {
                    #ty::add_fields(self, v)
                }
            }
        };
        (kind_const, hit_impl)
    };
    let doc = format!(" {} hit type", kind.display_name);
    let base = base_members(kind);
    let declared = declared_members(kind);
    let index = index_members(kind);
    let encode = encode_body(kind);
    // Nothing is pushed for a kind without fields.
    let sink = if kind.fields.is_empty() {
        format_ident!("_v")
    } else {
        format_ident!("v")
    };

    quote! {
        #imports
        #dispatch

        #[doc = #doc]
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct #ty {
            #base
            #declared
            #index
        }

        impl #ty {
            #kind_const

            /// Append every non-empty member to `v` under its wire key.
            pub fn add_fields(&self, #sink: &mut Params) -> super::Result<()> {
                #encode
                Ok(())
            }
        }

        #hit_impl
    }
}

/// `use` declarations; the error type only when something can be missing.
pub fn imports(kind: &RecordKind) -> TokenStream {
    let missing = if kind.has_required_field {
        quote!(use super::MissingField;)
    } else {
        TokenStream::new()
    };
    let selector = if kind.is_catch_all() {
        TokenStream::new()
    } else {
        quote!(use super::HitKind;)
    };
    quote! {
        use super::Params;
        #missing
        #selector
    }
}

/// Kind discriminant enum and the selector setter taking any concrete
/// record. Catch-all only.
pub fn dispatch(kind: &RecordKind) -> TokenStream {
    let variants: Vec<Ident> = kind
        .member_kind_names
        .iter()
        .map(|name| variant_ident(name))
        .collect();
    let ids = &kind.member_kind_names;
    let ty = type_ident(kind);

    let selector = kind
        .fields
        .iter()
        .find(|f| f.demoted && f.value_kind == ValueKind::Text);
    let setter = match selector {
        Some(field) => {
            let m = member(&field.ident);
            quote! {
                impl #ty {
                    /// Tag the payload with the kind of `hit`.
                    pub fn set_type(&mut self, hit: &impl super::Hit) {
                        self.#m = hit.kind().as_str().to_string();
                    }
                }
            }
        }
        None => TokenStream::new(),
    };

    quote! {
        /// Every concrete hit kind.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum HitKind {
            #(#variants,)*
        }

        impl HitKind {
            /// Wire identifier of the kind.
            pub fn as_str(self) -> &'static str {
                match self {
                    #(HitKind::#variants => #ids,)*
                }
            }
        }

        #setter
    }
}

/// Members every kind of this shape carries before its declared fields.
pub fn base_members(kind: &RecordKind) -> TokenStream {
    if !kind.is_catch_all() {
        return TokenStream::new();
    }
    let m = format_ident!("{}", TRANSPORT_MEMBER);
    quote! {
        /// Use TLS when sending.
        pub #m: bool,
    }
}

/// One member per field, in declaration order.
pub fn declared_members(kind: &RecordKind) -> TokenStream {
    let members = kind.fields.iter().map(|field| {
        let docs = doc_attrs(&field.docs);
        let m = member(&field.ident);
        let ty = member_type(field.value_kind);
        let vis = if field.demoted {
            quote!(pub(crate))
        } else {
            quote!(pub)
        };
        quote! {
            #docs
            #vis #m: #ty,
        }
    });
    quote!(#(#members)*)
}

/// One string member per index field, sorted.
pub fn index_members(kind: &RecordKind) -> TokenStream {
    let members = kind.index_fields.iter().map(|index| {
        let doc = format!(" {} is required by other properties", index);
        let m = member(index);
        quote! {
            #[doc = #doc]
            pub #m: String,
        }
    });
    quote!(#(#members)*)
}

/// Expression building the wire key of a field.
pub fn key_expr(key: &WireKey) -> TokenStream {
    if !key.is_parameterized() {
        let raw = &key.raw;
        return quote!(#raw.to_string());
    }
    let mut fmt = String::new();
    let mut args = Vec::new();
    for segment in &key.segments {
        match segment {
            KeySegment::Literal(text) => fmt.push_str(&text.replace('{', "{{").replace('}', "}}")),
            KeySegment::Index(name) => {
                fmt.push_str("{}");
                args.push(member(name));
            }
        }
    }
    quote!(format!(#fmt, #(self.#args),*))
}

/// Body of `add_fields`: one conditional push per field.
pub fn encode_body(kind: &RecordKind) -> TokenStream {
    let pushes = kind.fields.iter().map(|field| {
        let key = key_expr(&field.wire_key);
        let m = member(&field.ident);
        let label = &field.label;
        let missing = if field.required {
            quote! {
                else {
                    return Err(MissingField(#label));
                }
            }
        } else {
            TokenStream::new()
        };
        match field.value_kind {
            ValueKind::Text => quote! {
                if !self.#m.is_empty() {
                    v.push((#key, self.#m.clone()));
                } #missing
            },
            ValueKind::Boolean => quote! {
                if let Some(value) = self.#m {
                    v.push((#key, u8::from(value).to_string()));
                } #missing
            },
            ValueKind::Integer | ValueKind::Currency => quote! {
                if let Some(value) = self.#m {
                    v.push((#key, value.to_string()));
                } #missing
            },
        }
    });
    quote!(#(#pushes)*)
}

/// Shared `mod.rs`: module declarations and the types every unit uses.
pub fn support_module(model: &KindModel) -> TokenStream {
    let modules: Vec<Ident> = model
        .iter()
        .map(|kind| format_ident!("{}", unit_name(kind)))
        .collect();
    quote! {
        #(mod #modules;)*

        #(pub use #modules::*;)*

        /// Wire-format key/value pairs, in encoding order.
        pub type Params = Vec<(String, String)>;

        /// A required field was left empty; carries its label.
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct MissingField(pub &'static str);

        impl std::fmt::Display for MissingField {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "required field '{}' is missing", self.0)
            }
        }

        impl std::error::Error for MissingField {}

        pub type Result<T> = std::result::Result<T, MissingField>;

        /// Implemented by every concrete hit kind.
        pub trait Hit {
            fn kind(&self) -> HitKind;

            fn add_fields(&self, v: &mut Params) -> Result<()>;
        }
    }
}
