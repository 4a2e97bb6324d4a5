//! Protobuf schema to TypeScript Twirp client compiler.
//!
//! `protots-typegen` turns a set of protobuf file descriptors into TypeScript:
//! per schema file, interfaces and classes for every enum and message, plus a
//! Twirp client for every service; per package, an `index.ts`.
//!
//! # Architecture
//!
//! ```text
//! Input                  Core                         Output
//! ─────────────      ──────────────────────      ───────────────
//! protoc request ─┐   descriptor ─> builder  ─┐
//!                 ├─> SchemaSet     │ mapper  ├─> Model ─> TypeScript files
//! descriptor JSON ┘                 └ registry┘   (ir.rs)  + index.ts + twirp.ts
//! ```
//!
//! # Example
//!
//! ```
//! use protots_typegen::descriptor::{FieldDescriptor, MessageDescriptor, SchemaFile, SchemaSet, WireType};
//! use protots_typegen::{Options, generate};
//!
//! let set = SchemaSet::new(vec![SchemaFile::new("shop/v1/item.proto", "shop.v1").with_message(
//!     MessageDescriptor::new("Item").with_field(FieldDescriptor::scalar("name", 1, WireType::String)),
//! )]);
//!
//! let generated = generate(&set, &Options::default()).unwrap();
//! let item = generated.files.iter().find(|f| f.path == "shop/v1/item.ts").unwrap();
//! assert!(item.content.contains("export interface IItem"));
//! ```

pub mod builder;
pub mod descriptor;
pub mod error;
pub mod input;
pub mod ir;
pub mod mapper;
pub mod naming;
pub mod options;
pub mod output;
pub mod registry;
pub mod traits;

pub use descriptor::SchemaSet;
pub use error::Error;
pub use input::{
    decode_descriptor_set, decode_plugin_request, encode_plugin_response,
    parse_descriptor_set_json,
};
pub use ir::{Diagnostic, Model};
pub use options::Options;
pub use output::{GeneratedFile, TYPESCRIPT_EMITTER, TypeScriptEmitter};
pub use traits::Emitter;

/// Result of a generation run.
#[derive(Debug, Clone)]
pub struct Generated {
    /// Output files in emission order.
    pub files: Vec<GeneratedFile>,
    /// Recoverable problems; generation still produced every file.
    pub diagnostics: Vec<Diagnostic>,
}

/// Build the model for `set` and render it with `emitter`.
pub fn generate_with(
    set: &SchemaSet,
    options: &Options,
    emitter: &dyn Emitter,
) -> Result<Generated, Error> {
    let model = builder::build(set, emitter.extension())?;
    let files = emitter.emit(&model, options)?;
    tracing::debug!(
        emitter = emitter.name(),
        files = files.len(),
        diagnostics = model.diagnostics.len(),
        "generation finished"
    );
    Ok(Generated {
        files,
        diagnostics: model.diagnostics,
    })
}

/// Generate TypeScript for `set`.
pub fn generate(set: &SchemaSet, options: &Options) -> Result<Generated, Error> {
    generate_with(set, options, &TYPESCRIPT_EMITTER)
}
