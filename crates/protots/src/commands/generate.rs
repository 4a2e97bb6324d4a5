//! Generate command - TypeScript from a descriptor set file.

use anyhow::{Context, bail};
use clap::{Args, ValueEnum};
use protots_typegen::{Options, SchemaSet, decode_descriptor_set, generate, parse_descriptor_set_json};
use std::path::{Path, PathBuf};

/// Generate command arguments
#[derive(Args)]
pub struct GenerateArgs {
    /// Descriptor set (`buf build -o set.json`, `protoc --descriptor_set_out`), use - for stdin
    pub input: PathBuf,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// Input encoding
    #[arg(short, long, value_enum, default_value = "auto")]
    pub format: InputFormat,

    /// Twirp route prefix
    #[arg(long)]
    pub path_prefix: Option<String>,

    /// Base name of the runtime module
    #[arg(long)]
    pub runtime_module: Option<String>,

    /// Do not emit the runtime module
    #[arg(long)]
    pub no_runtime: bool,

    /// Do not emit per-package index files
    #[arg(long)]
    pub no_index: bool,

    /// Fail, writing nothing, if any warning was reported
    #[arg(long)]
    pub warnings_as_errors: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    /// Detect from the first byte
    Auto,
    /// protojson `FileDescriptorSet`
    Json,
    /// Binary `FileDescriptorSet`
    Binary,
}

impl GenerateArgs {
    fn options(&self) -> anyhow::Result<Options> {
        let mut options = Options::default();
        if let Some(prefix) = &self.path_prefix {
            options.path_prefix = prefix.trim_end_matches('/').to_string();
        }
        if let Some(module) = &self.runtime_module {
            if module.is_empty() {
                bail!("--runtime-module must not be empty");
            }
            options.runtime_module = module.clone();
        }
        options.emit_runtime = !self.no_runtime;
        options.emit_index = !self.no_index;
        Ok(options)
    }
}

/// Run the generate command
pub fn run(args: GenerateArgs) -> anyhow::Result<i32> {
    let options = args.options()?;
    let bytes = read_input(&args.input)?;
    let set = decode(&bytes, args.format)
        .with_context(|| format!("failed to decode {}", args.input.display()))?;

    let generated = generate(&set, &options)?;

    if args.warnings_as_errors && !generated.diagnostics.is_empty() {
        eprintln!(
            "{} warning(s) reported, nothing written (--warnings-as-errors)",
            generated.diagnostics.len()
        );
        return Ok(1);
    }

    for file in &generated.files {
        let path = args.output.join(&file.path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        std::fs::write(&path, &file.content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), "wrote file");
    }

    eprintln!(
        "Generated {} file(s) in {}",
        generated.files.len(),
        args.output.display()
    );
    Ok(0)
}

fn read_input(input: &Path) -> anyhow::Result<Vec<u8>> {
    if input.as_os_str() == "-" {
        use std::io::Read;
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .context("failed to read stdin")?;
        Ok(buf)
    } else {
        std::fs::read(input).with_context(|| format!("failed to read {}", input.display()))
    }
}

fn decode(bytes: &[u8], format: InputFormat) -> anyhow::Result<SchemaSet> {
    let set = match detect_format(bytes, format) {
        InputFormat::Json | InputFormat::Auto => {
            let text = std::str::from_utf8(bytes).context("JSON input is not UTF-8")?;
            parse_descriptor_set_json(text)?
        }
        InputFormat::Binary => decode_descriptor_set(bytes)?,
    };
    Ok(set)
}

/// JSON starts with `{`; a binary set starts with a field tag.
fn detect_format(bytes: &[u8], format: InputFormat) -> InputFormat {
    match format {
        InputFormat::Auto => match bytes.iter().find(|b| !b.is_ascii_whitespace()) {
            Some(b'{') => InputFormat::Json,
            _ => InputFormat::Binary,
        },
        f => f,
    }
}
