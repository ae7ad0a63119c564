//! Generation errors.
//!
//! Every variant is fatal: the document changed shape or the generator's
//! assumptions went stale, and the run is repeated from scratch once fixed.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum GenError {
    /// Expected node or structural pattern is absent.
    #[error("document shape mismatch: {0}")]
    Shape(String),

    #[error("'{pattern}' should match '{input}' exactly once (found {found})")]
    PatternMismatch {
        pattern: String,
        input: String,
        found: usize,
    },

    #[error("unknown value kind: '{0}'")]
    UnknownValueKind(String),

    #[error("unknown record kind: '{0}'")]
    UnknownKind(String),

    #[error("duplicate member '{member}' in record kind '{kind}'")]
    DuplicateMember { kind: String, member: String },

    #[error("cannot write output {}", path.display())]
    Sink {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("generated code for '{kind}' does not parse: {source}")]
    Template {
        kind: String,
        #[source]
        source: syn::Error,
    },

    #[error("failed to serialize record kind '{kind}': {source}")]
    Dump {
        kind: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, GenError>;
