//! Output backends.
//!
//! Each backend takes a [`Model`](crate::ir::Model) and produces source
//! files. All backends implement [`Emitter`](crate::traits::Emitter).

mod runtime;
pub mod typescript;

pub use typescript::{TYPESCRIPT_EMITTER, TypeScriptEmitter};

/// One generated output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Path relative to the output root, `/`-separated.
    pub path: String,
    pub content: String,
}
