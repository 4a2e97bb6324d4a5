//! Traits for output backends.

use crate::error::Error;
use crate::ir::Model;
use crate::options::Options;
use crate::output::GeneratedFile;

/// A code generation backend.
///
/// Emitters render a finished [`Model`]; every name in it is already
/// resolved, so rendering never consults the registry.
pub trait Emitter: Send + Sync {
    /// Backend identifier (e.g. "typescript").
    fn name(&self) -> &'static str;

    /// File extension for generated files (e.g. "ts").
    fn extension(&self) -> &'static str;

    /// Render every file of the model, plus any aggregate files.
    fn emit(&self, model: &Model, options: &Options) -> Result<Vec<GeneratedFile>, Error>;
}
