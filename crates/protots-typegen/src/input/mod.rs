//! Input front-ends.
//!
//! Each front-end decodes one encoding of the protobuf descriptor model into a
//! [`SchemaSet`](crate::descriptor::SchemaSet).

mod json;
mod proto;

pub use json::parse_descriptor_set_json;
pub use proto::{decode_descriptor_set, decode_plugin_request, encode_plugin_response};
