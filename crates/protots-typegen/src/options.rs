//! Generator options and protoc plugin parameter parsing.

use crate::error::Error;

/// Options controlling emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Route prefix for Twirp requests (`/twirp`).
    pub path_prefix: String,
    /// Base name of the runtime module at the output root (`twirp` → `twirp.ts`).
    pub runtime_module: String,
    /// Emit the runtime module.
    pub emit_runtime: bool,
    /// Emit an `index` file per package directory.
    pub emit_index: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            path_prefix: "/twirp".to_string(),
            runtime_module: "twirp".to_string(),
            emit_runtime: true,
            emit_index: true,
        }
    }
}

impl Options {
    /// Parse a protoc plugin parameter (`--twirp_ts_opt=path_prefix=/rpc,emit_index=false`).
    ///
    /// Unset keys keep their defaults. Unknown keys and malformed values are
    /// rejected rather than ignored.
    pub fn from_parameter(parameter: &str) -> Result<Self, Error> {
        let mut options = Self::default();
        for part in parameter.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| Error::InvalidParameter(format!("expected key=value, got {part:?}")))?;
            let value = value.trim();
            match key.trim() {
                "path_prefix" => options.path_prefix = value.trim_end_matches('/').to_string(),
                "runtime_module" => {
                    if value.is_empty() {
                        return Err(Error::InvalidParameter(
                            "runtime_module must not be empty".into(),
                        ));
                    }
                    options.runtime_module = value.to_string();
                }
                "emit_runtime" => options.emit_runtime = parse_bool(key, value)?,
                "emit_index" => options.emit_index = parse_bool(key, value)?,
                other => {
                    return Err(Error::InvalidParameter(format!("unknown option {other:?}")));
                }
            }
        }
        Ok(options)
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, Error> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(Error::InvalidParameter(format!(
            "{key} expects true or false, got {value:?}"
        ))),
    }
}
