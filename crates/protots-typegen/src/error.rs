//! Error types for schema compilation.

/// Fatal errors. Recoverable conditions are reported as
/// [`Diagnostic`](crate::ir::Diagnostic)s instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("duplicate declaration of {name} (first in {first}, again in {second})")]
    DuplicateDeclaration {
        name: String,
        first: String,
        second: String,
    },

    #[error("{first} and {second} both emit identifier {identifier} in package {package:?}")]
    DuplicateIdentifier {
        identifier: String,
        package: String,
        first: String,
        second: String,
    },

    #[error("{first} and {second} both generate {path}")]
    DuplicateOutputPath {
        path: String,
        first: String,
        second: String,
    },

    #[error("invalid plugin parameter: {0}")]
    InvalidParameter(String),

    #[error("failed to decode input: {0}")]
    Decode(String),

    #[error("failed to render {path}")]
    Render {
        path: String,
        #[source]
        source: std::fmt::Error,
    },
}

impl From<prost::DecodeError> for Error {
    fn from(e: prost::DecodeError) -> Self {
        Error::Decode(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Decode(e.to_string())
    }
}
