//! JSON descriptor sets (`buf build --as-file-descriptor-set -o set.json`).

use crate::descriptor::SchemaSet;
use crate::error::Error;

/// Parse the protojson rendering of a `FileDescriptorSet`.
pub fn parse_descriptor_set_json(text: &str) -> Result<SchemaSet, Error> {
    let set: SchemaSet = serde_json::from_str(text)?;
    tracing::debug!(files = set.files.len(), "parsed JSON descriptor set");
    Ok(set)
}
