//! TypeScript backend.
//!
//! Per schema file: enums, then for each message a public interface, a JSON
//! interface and a class converting between the two, then for each service an
//! interface and a Twirp client class. Per package directory: an `index.ts`
//! re-exporting every file in it.

use super::GeneratedFile;
use super::runtime::TWIRP_RUNTIME;
use crate::error::Error;
use crate::ir::{
    EnumModel, FieldModel, FieldShape, FieldType, FileModel, MessageModel, Model, ServiceModel,
    ShapeBase,
};
use crate::mapper::{Scalar, WellKnown};
use crate::naming;
use crate::options::Options;
use crate::traits::Emitter;
use std::fmt::{self, Write};

const EXTENSION: &str = "ts";
const INDENT: &str = "  ";

/// Static instance for callers that want a `&'static dyn Emitter`.
pub static TYPESCRIPT_EMITTER: TypeScriptEmitter = TypeScriptEmitter;

/// TypeScript emitter implementing the [`Emitter`] trait.
pub struct TypeScriptEmitter;

impl Emitter for TypeScriptEmitter {
    fn name(&self) -> &'static str {
        "typescript"
    }

    fn extension(&self) -> &'static str {
        EXTENSION
    }

    fn emit(&self, model: &Model, options: &Options) -> Result<Vec<GeneratedFile>, Error> {
        emit_model(model, options)
    }
}

/// Render the runtime module, every file, and one index per package directory.
///
/// Order: runtime first, then for each directory (in order of first
/// appearance) its files in input order followed by its index.
pub fn emit_model(model: &Model, options: &Options) -> Result<Vec<GeneratedFile>, Error> {
    let mut out = Vec::new();

    if options.emit_runtime {
        out.push(GeneratedFile {
            path: format!("{}.{EXTENSION}", options.runtime_module),
            content: TWIRP_RUNTIME.to_string(),
        });
    }

    for (dir, files) in group_by_dir(&model.files) {
        for file in &files {
            out.push(GeneratedFile {
                path: file.output_path.clone(),
                content: render_file(file, options)?,
            });
        }
        if options.emit_index {
            out.push(render_index(dir, &files)?);
        }
    }

    Ok(out)
}

/// Render one file model to TypeScript source.
pub fn render_file(file: &FileModel, options: &Options) -> Result<String, Error> {
    let mut writer = TypeScriptWriter::new(options);
    writer
        .write_file(file)
        .map_err(|source| Error::Render {
            path: file.output_path.clone(),
            source,
        })?;
    Ok(writer.output)
}

/// Render the index re-exporting `files`, all living in `dir`.
pub fn render_index(dir: &str, files: &[&FileModel]) -> Result<GeneratedFile, Error> {
    let path = if dir.is_empty() {
        format!("index.{EXTENSION}")
    } else {
        format!("{dir}/index.{EXTENSION}")
    };

    let mut content = String::new();
    write_index(&mut content, files).map_err(|source| Error::Render {
        path: path.clone(),
        source,
    })?;

    Ok(GeneratedFile { path, content })
}

fn write_index(out: &mut String, files: &[&FileModel]) -> fmt::Result {
    writeln!(out, "// Code generated by protots. DO NOT EDIT.")?;
    writeln!(out)?;
    for file in files {
        writeln!(out, "export * from './{}'", naming::file_stem(&file.output_path))?;
    }
    Ok(())
}

fn group_by_dir(files: &[FileModel]) -> Vec<(&str, Vec<&FileModel>)> {
    let mut groups: Vec<(&str, Vec<&FileModel>)> = Vec::new();
    for file in files {
        let dir = file
            .output_path
            .rsplit_once('/')
            .map_or("", |(dir, _)| dir);
        match groups.iter().position(|(d, _)| *d == dir) {
            Some(i) => groups[i].1.push(file),
            None => groups.push((dir, vec![file])),
        }
    }
    groups
}

// ============================================================================
// Type rendering
// ============================================================================

fn scalar_type(s: Scalar) -> &'static str {
    match s {
        Scalar::Number => "number",
        Scalar::String => "string",
        Scalar::Boolean => "boolean",
    }
}

fn scalar_constructor(s: Scalar) -> &'static str {
    match s {
        Scalar::Number => "Number",
        Scalar::String => "String",
        Scalar::Boolean => "Boolean",
    }
}

/// TypeScript type for a field shape (`string`, `Money`, `Date[]`).
pub fn shape_type(shape: &FieldShape) -> String {
    let base = match &shape.base {
        ShapeBase::Scalar(s) => scalar_type(*s).to_string(),
        ShapeBase::Named(name) => name.clone(),
        ShapeBase::Date => "Date".to_string(),
    };
    if shape.repeated {
        format!("{base}[]")
    } else {
        base
    }
}

/// Converts one JSON value to its public form; `None` when used as-is.
fn from_json_value(ty: &FieldType, value: &str) -> Option<String> {
    match ty {
        FieldType::Scalar(_) | FieldType::Enum(_) => None,
        FieldType::Message(r) => Some(format!("{}.fromJSON({value})", r.name)),
        FieldType::WellKnown(WellKnown::Timestamp) => Some(format!("new Date({value})")),
    }
}

/// Converts one public value to its JSON form; `None` when used as-is.
fn to_json_value(ty: &FieldType, value: &str) -> Option<String> {
    match ty {
        FieldType::Scalar(_) | FieldType::Enum(_) => None,
        FieldType::Message(_) => Some(format!("{value}.toJSON()")),
        FieldType::WellKnown(WellKnown::Timestamp) => Some(format!("{value}.toISOString()")),
    }
}

/// Expression reading `field` out of the JSON object `m`.
fn from_json_expr(field: &FieldModel) -> String {
    let key = format!("m['{}']", field.wire_name);
    if field.repeated {
        let element = match &field.ty {
            FieldType::Scalar(s) => Some(format!("{}(v)", scalar_constructor(*s))),
            other => from_json_value(other, "v"),
        };
        match element {
            Some(element) => format!("{key} === undefined ? undefined : {key}.map((v) => {element})"),
            None => key,
        }
    } else {
        match from_json_value(&field.ty, &key) {
            Some(expr) => format!("{key} === undefined ? undefined : {expr}"),
            None => key,
        }
    }
}

/// Expression producing the JSON value of `field` from the class's storage.
fn to_json_expr(field: &FieldModel) -> String {
    let store = format!("this._{}", field.accessor);
    let value = if field.repeated { "v" } else { store.as_str() };
    match to_json_value(&field.ty, value) {
        Some(expr) if field.repeated => {
            format!("{store} === undefined ? undefined : {store}.map((v) => {expr})")
        }
        Some(expr) => format!("{store} === undefined ? undefined : {expr}"),
        None => store,
    }
}

// ============================================================================
// Writer
// ============================================================================

macro_rules! emit {
    ($w:expr) => {
        $w.blank()
    };
    ($w:expr, $($arg:tt)*) => {
        $w.line(format_args!($($arg)*))
    };
}

struct TypeScriptWriter<'o> {
    output: String,
    indent: usize,
    options: &'o Options,
}

impl<'o> TypeScriptWriter<'o> {
    fn new(options: &'o Options) -> Self {
        Self {
            output: String::new(),
            indent: 0,
            options,
        }
    }

    fn line(&mut self, args: fmt::Arguments<'_>) -> fmt::Result {
        for _ in 0..self.indent {
            self.output.write_str(INDENT)?;
        }
        self.output.write_fmt(args)?;
        self.output.write_char('\n')
    }

    fn blank(&mut self) -> fmt::Result {
        self.output.write_char('\n')
    }

    /// Write `header {` and indent.
    fn open(&mut self, args: fmt::Arguments<'_>) -> fmt::Result {
        self.line(format_args!("{args} {{"))?;
        self.indent += 1;
        Ok(())
    }

    /// Dedent and write `}` followed by `suffix`.
    fn close(&mut self, suffix: &str) -> fmt::Result {
        self.indent = self.indent.saturating_sub(1);
        self.line(format_args!("}}{suffix}"))
    }

    fn write_file(&mut self, file: &FileModel) -> fmt::Result {
        let options = self.options;
        emit!(self, "/* tslint:disable */")?;
        emit!(self, "/* eslint-disable */")?;
        emit!(self)?;
        emit!(self, "// Code generated by protots from {}. DO NOT EDIT.", file.source)?;

        if !file.imports.is_empty() {
            emit!(self)?;
            for (path, names) in file.imports.iter() {
                let names: Vec<&str> = names.iter().map(String::as_str).collect();
                emit!(
                    self,
                    "import {{ {} }} from '{}'",
                    names.join(", "),
                    naming::relative_module(&file.output_path, path)
                )?;
            }
        }

        if !file.services.is_empty() {
            emit!(self)?;
            emit!(
                self,
                "import {{ createTwirpRequest, Fetch, throwTwirpError }} from '{}{}'",
                file.relative_import_base,
                options.runtime_module
            )?;
        }

        for e in &file.enums {
            emit!(self)?;
            self.write_enum(e)?;
        }

        for message in &file.messages {
            emit!(self)?;
            self.write_message(message)?;
        }

        for service in &file.services {
            emit!(self)?;
            self.write_service(service)?;
        }

        Ok(())
    }

    fn write_enum(&mut self, e: &EnumModel) -> fmt::Result {
        self.open(format_args!("export enum {}", e.name))?;
        for value in &e.values {
            emit!(self, "{} = {},", value.name, value.number)?;
        }
        self.close("")
    }

    fn write_message(&mut self, message: &MessageModel) -> fmt::Result {
        for e in &message.nested_enums {
            self.write_enum(e)?;
            emit!(self)?;
        }

        self.open(format_args!("export interface {}", message.interface))?;
        for field in &message.fields {
            emit!(
                self,
                "{}?: {}",
                field.accessor,
                shape_type(&field.public_shape())
            )?;
        }
        emit!(self, "toJSON?(): object")?;
        self.close("")?;
        emit!(self)?;

        self.open(format_args!("export interface {}", message.json_interface))?;
        for field in &message.fields {
            emit!(
                self,
                "{}?: {}",
                field.wire_name,
                shape_type(&field.json_shape())
            )?;
        }
        self.close("")?;
        emit!(self)?;

        self.write_message_class(message)
    }

    fn write_message_class(&mut self, message: &MessageModel) -> fmt::Result {
        let name = &message.name;
        self.open(format_args!(
            "export class {name} implements {}",
            message.interface
        ))?;

        for field in &message.fields {
            emit!(
                self,
                "private _{}?: {}",
                field.accessor,
                shape_type(&field.public_shape())
            )?;
        }
        if !message.fields.is_empty() {
            emit!(self)?;
        }

        self.open(format_args!("constructor(m?: {})", message.interface))?;
        if !message.fields.is_empty() {
            self.open(format_args!("if (m)"))?;
            for field in &message.fields {
                emit!(self, "this._{0} = m.{0}", field.accessor)?;
            }
            self.close("")?;
        }
        self.close("")?;

        for field in &message.fields {
            let ty = shape_type(&field.public_shape());
            emit!(self)?;
            emit!(self, "// {} ({})", field.accessor, field.wire_name)?;
            self.open(format_args!(
                "public get {}(): {ty} | undefined",
                field.accessor
            ))?;
            emit!(self, "return this._{}", field.accessor)?;
            self.close("")?;
            self.open(format_args!(
                "public set {}(value: {ty} | undefined)",
                field.accessor
            ))?;
            emit!(self, "this._{} = value", field.accessor)?;
            self.close("")?;
        }

        emit!(self)?;
        self.open(format_args!(
            "static fromJSON(m: {}): {name}",
            message.json_interface
        ))?;
        if message.fields.is_empty() {
            emit!(self, "return new {name}({{}})")?;
        } else {
            emit!(self, "return new {name}({{")?;
            self.indent += 1;
            let last = message.fields.len() - 1;
            for (i, field) in message.fields.iter().enumerate() {
                let sep = if i == last { "" } else { "," };
                emit!(self, "{}: {}{sep}", field.accessor, from_json_expr(field))?;
            }
            self.close(")")?;
        }
        self.close("")?;

        emit!(self)?;
        self.open(format_args!("public toJSON(): {}", message.json_interface))?;
        if message.fields.is_empty() {
            emit!(self, "return {{}}")?;
        } else {
            // The object must start on the `return` line.
            self.open(format_args!("return"))?;
            let last = message.fields.len() - 1;
            for (i, field) in message.fields.iter().enumerate() {
                let sep = if i == last { "" } else { "," };
                emit!(self, "'{}': {}{sep}", field.wire_name, to_json_expr(field))?;
            }
            self.close("")?;
        }
        self.close("")?;

        self.close("")
    }

    fn write_service(&mut self, service: &ServiceModel) -> fmt::Result {
        let options = self.options;
        let name = &service.name;

        self.open(format_args!("export interface {}", service.interface))?;
        for method in &service.methods {
            emit!(
                self,
                "{}: (params: {}, headers?: object) => Promise<{}>",
                method.client_name,
                method.input_type,
                method.output_type
            )?;
        }
        self.close("")?;
        emit!(self)?;

        let route = if service.package.is_empty() {
            name.clone()
        } else {
            format!("{}.{name}", service.package)
        };

        self.open(format_args!(
            "export class {name} implements {}",
            service.interface
        ))?;
        emit!(self, "private hostname: string")?;
        emit!(self, "private fetch: Fetch")?;
        emit!(
            self,
            "private path = '{}/{route}/'",
            options.path_prefix
        )?;
        emit!(self)?;
        self.open(format_args!("constructor(hostname: string, fetch: Fetch)"))?;
        emit!(self, "this.hostname = hostname")?;
        emit!(self, "this.fetch = fetch")?;
        self.close("")?;
        emit!(self)?;
        self.open(format_args!("private url(name: string): string"))?;
        emit!(self, "return this.hostname + this.path + name")?;
        self.close("")?;

        for method in &service.methods {
            emit!(self)?;
            self.open(format_args!(
                "public {}(params: {}, headers: object = {{}}): Promise<{}>",
                method.client_name, method.input_type, method.output_type
            ))?;
            emit!(self, "return this.fetch(")?;
            self.indent += 1;
            emit!(self, "this.url('{}'),", method.name)?;
            emit!(self, "createTwirpRequest(params, headers)")?;
            self.indent -= 1;
            self.open(format_args!(").then((res) =>"))?;
            self.open(format_args!("if (!res.ok)"))?;
            emit!(self, "return throwTwirpError(res)")?;
            self.close("")?;
            self.open(format_args!("return res.json().then((m) =>"))?;
            emit!(self, "return {}.fromJSON(m)", method.output_type)?;
            self.close(")")?;
            self.close(")")?;
            self.close("")?;
        }

        self.close("")
    }
}
