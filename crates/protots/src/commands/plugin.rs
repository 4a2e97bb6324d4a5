//! protoc plugin mode.

use anyhow::Context;
use protots_typegen::{
    Error, GeneratedFile, Options, decode_plugin_request, encode_plugin_response, generate,
};
use std::io::{Read, Write};

/// Read a `CodeGeneratorRequest` from stdin and write the response to stdout.
///
/// Generation failures travel in the response; only I/O failures are errors here.
pub fn run_stdio() -> anyhow::Result<()> {
    let mut request = Vec::new();
    std::io::stdin()
        .read_to_end(&mut request)
        .context("failed to read CodeGeneratorRequest from stdin")?;

    let response = respond(&request);

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(&response)
        .context("failed to write CodeGeneratorResponse to stdout")?;
    stdout.flush()?;
    Ok(())
}

/// Encoded response for an encoded request.
pub fn respond(request: &[u8]) -> Vec<u8> {
    match generate_files(request) {
        Ok(files) => {
            tracing::info!(files = files.len(), "generated");
            encode_plugin_response(&files, None)
        }
        Err(e) => encode_plugin_response(&[], Some(&e.to_string())),
    }
}

fn generate_files(request: &[u8]) -> Result<Vec<GeneratedFile>, Error> {
    let (set, parameter) = decode_plugin_request(request)?;
    let options = Options::from_parameter(&parameter)?;
    Ok(generate(&set, &options)?.files)
}
