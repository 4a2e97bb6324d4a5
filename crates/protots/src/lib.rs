//! Command-line front-end for `protots-typegen`.
//!
//! Two entry points share this library: the `protots` CLI and the
//! `protoc-gen-twirp_ts` protoc plugin.

pub mod commands;

/// Install the stderr log subscriber. `RUST_LOG` overrides the default `warn`.
///
/// Logs never go to stdout: in plugin mode stdout carries the response.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();
}
