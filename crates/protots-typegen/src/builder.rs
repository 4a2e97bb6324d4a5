//! Model builder.
//!
//! Walks the schema files once, in input order. Each file first declares all
//! of its identifiers in the [`Registry`], then its enums, messages and
//! services are modeled with every type reference resolved against what has
//! been declared so far. References into other files are recorded as imports.

use crate::descriptor::{EnumDescriptor, FieldDescriptor, MessageDescriptor, SchemaFile, SchemaSet};
use crate::error::Error;
use crate::ir::{
    Diagnostic, EnumModel, EnumValueModel, FieldModel, FieldType, FileModel, Imports,
    MessageModel, MethodModel, Model, ServiceModel, TypeRef,
};
use crate::mapper::{self, Mapped, Scalar};
use crate::naming;
use crate::registry::{DeclKind, FileRef, Registry};
use std::collections::{BTreeMap, BTreeSet};

/// Build the model for `set` with a fresh registry.
pub fn build(set: &SchemaSet, extension: &str) -> Result<Model, Error> {
    let mut registry = Registry::new();
    build_with_registry(set, extension, &mut registry)
}

/// Build the model for `set`, declaring into `registry`.
///
/// `extension` is the output file extension (`ts`); it only affects output
/// paths.
pub fn build_with_registry(
    set: &SchemaSet,
    extension: &str,
    registry: &mut Registry,
) -> Result<Model, Error> {
    let mut builder = Builder {
        registry,
        skipped_nested: BTreeSet::new(),
        diagnostics: Vec::new(),
    };

    let mut files = Vec::with_capacity(set.files.len());
    let mut output_paths: BTreeMap<String, &str> = BTreeMap::new();
    for (index, file) in set.files.iter().enumerate() {
        let file_ref = FileRef {
            index,
            name: file.name.clone(),
            package: file.package.clone(),
            output_path: naming::output_path(&file.package, &file.name, extension),
        };
        if let Some(first) = output_paths.insert(file_ref.output_path.clone(), &file.name) {
            return Err(Error::DuplicateOutputPath {
                path: file_ref.output_path,
                first: first.to_string(),
                second: file.name.clone(),
            });
        }
        tracing::debug!(file = %file.name, output = %file_ref.output_path, "building file model");

        builder.declare_file(&file_ref, file)?;
        files.push(builder.model_file(&file_ref, file));
    }

    Ok(Model {
        files,
        diagnostics: builder.diagnostics,
    })
}

struct Builder<'r> {
    registry: &'r mut Registry,
    /// Fully-qualified names of every nested message seen so far. They are
    /// never declared, and fields typed by them are dropped wherever they are.
    skipped_nested: BTreeSet<String>,
    diagnostics: Vec<Diagnostic>,
}

/// Per-file state while modeling.
struct FileScope<'f> {
    file: &'f FileRef,
    imports: Imports,
}

/// Nested messages of one message that are being skipped, by fully-qualified name.
type SkippedNested<'m> = BTreeMap<String, &'m MessageDescriptor>;

impl Builder<'_> {
    fn report(&mut self, diagnostic: Diagnostic) {
        tracing::warn!("{diagnostic}");
        self.diagnostics.push(diagnostic);
    }

    // ------------------------------------------------------------------------
    // Declaration
    // ------------------------------------------------------------------------

    fn declare_file(&mut self, file_ref: &FileRef, file: &SchemaFile) -> Result<(), Error> {
        for e in &file.enums {
            self.registry.declare(file_ref, &e.name, DeclKind::Enum)?;
        }

        for message in &file.messages {
            let name = &message.name;
            self.registry.declare(file_ref, name, DeclKind::Message)?;
            self.registry
                .declare(file_ref, &naming::interface_name(name), DeclKind::Interface)?;
            self.registry.declare(
                file_ref,
                &naming::json_interface_name(name),
                DeclKind::JsonInterface,
            )?;
            for e in &message.nested_enums {
                self.registry
                    .declare(file_ref, &format!("{name}.{}", e.name), DeclKind::Enum)?;
            }
            for nested in &message.nested_messages {
                self.skipped_nested.insert(naming::qualify(
                    &file_ref.package,
                    &format!("{name}.{}", nested.name),
                ));
            }
        }

        for service in &file.services {
            self.registry
                .declare(file_ref, &service.name, DeclKind::Service)?;
            self.registry.declare(
                file_ref,
                &naming::interface_name(&service.name),
                DeclKind::Interface,
            )?;
        }

        Ok(())
    }

    // ------------------------------------------------------------------------
    // Modeling
    // ------------------------------------------------------------------------

    fn model_file(&mut self, file_ref: &FileRef, file: &SchemaFile) -> FileModel {
        let mut scope = FileScope {
            file: file_ref,
            imports: Imports::default(),
        };

        let enums = file
            .enums
            .iter()
            .map(|e| enum_model(e.name.clone(), e))
            .collect();

        let messages = file
            .messages
            .iter()
            .map(|m| self.model_message(&mut scope, m))
            .collect();

        let services = file
            .services
            .iter()
            .map(|service| ServiceModel {
                package: file.package.clone(),
                name: service.name.clone(),
                interface: naming::interface_name(&service.name),
                methods: service
                    .methods
                    .iter()
                    .map(|method| {
                        let context = format!("{}.{}", service.name, method.name);
                        let input_type = self.method_type(&mut scope, &method.input_type, &context);
                        let output_type =
                            self.method_type(&mut scope, &method.output_type, &context);
                        MethodModel {
                            name: method.name.clone(),
                            client_name: naming::method_name(&method.name),
                            input_type,
                            output_type,
                        }
                    })
                    .collect(),
            })
            .collect();

        FileModel {
            source: file.name.clone(),
            package: file.package.clone(),
            output_path: file_ref.output_path.clone(),
            relative_import_base: naming::relative_import_base(&file.package),
            imports: scope.imports,
            enums,
            messages,
            services,
        }
    }

    fn model_message(&mut self, scope: &mut FileScope<'_>, message: &MessageDescriptor) -> MessageModel {
        let name = &message.name;
        let skipped = self.skip_nested_messages(scope, message);

        let nested_enums = message
            .nested_enums
            .iter()
            .map(|e| enum_model(naming::flatten_local(&format!("{name}.{}", e.name)), e))
            .collect();

        let mut fields: Vec<FieldModel> = Vec::with_capacity(message.fields.len());
        for f in &message.fields {
            if let Some(type_name) = f.type_name.as_deref() {
                if self.skipped_nested.contains(type_name) {
                    // Users inside the declaring message were already reported.
                    if !skipped.contains_key(type_name) {
                        self.report(Diagnostic::SkippedField {
                            file: scope.file.name.clone(),
                            field: format!("{name}.{}", f.name),
                            type_name: type_name.to_string(),
                        });
                    }
                    continue;
                }
            }

            let accessor = naming::camel_case(&f.name);
            if fields.iter().any(|existing| existing.accessor == accessor) {
                self.report(Diagnostic::AccessorCollision {
                    file: scope.file.name.clone(),
                    message: name.clone(),
                    field: f.name.clone(),
                    accessor,
                });
                continue;
            }

            fields.push(FieldModel {
                wire_name: f.name.clone(),
                accessor,
                ty: self.field_type(scope, name, f),
                repeated: f.is_repeated(),
            });
        }

        MessageModel {
            name: name.clone(),
            interface: naming::interface_name(name),
            json_interface: naming::json_interface_name(name),
            fields,
            nested_enums,
        }
    }

    /// Report every message nested in `message` and return them, so the
    /// fields that use them can be left out.
    fn skip_nested_messages<'m>(
        &mut self,
        scope: &FileScope<'_>,
        message: &'m MessageDescriptor,
    ) -> SkippedNested<'m> {
        let mut skipped = SkippedNested::new();
        for nested in &message.nested_messages {
            let fq_name = naming::qualify(
                &scope.file.package,
                &format!("{}.{}", message.name, nested.name),
            );
            let users: Vec<String> = message
                .fields
                .iter()
                .filter(|f| f.type_name.as_deref() == Some(fq_name.as_str()))
                .map(|f| f.name.clone())
                .collect();

            if nested.is_map_entry() {
                for field in users {
                    self.report(Diagnostic::MapField {
                        file: scope.file.name.clone(),
                        message: message.name.clone(),
                        field,
                    });
                }
            } else {
                self.report(Diagnostic::NestedMessage {
                    file: scope.file.name.clone(),
                    message: message.name.clone(),
                    nested: nested.name.clone(),
                    skipped_fields: users,
                });
            }
            skipped.insert(fq_name, nested);
        }
        skipped
    }

    fn field_type(&mut self, scope: &mut FileScope<'_>, message: &str, field: &FieldDescriptor) -> FieldType {
        let context = format!("{message}.{}", field.name);
        match mapper::map_singular(field.wire_type, field.type_name.as_deref()) {
            Mapped::Scalar(s) => FieldType::Scalar(s),
            Mapped::WellKnown(w) => FieldType::WellKnown(w),
            Mapped::Enum(fq_name) => {
                let r = self.reference(scope, fq_name, &context, DeclKind::Enum);
                if r.resolved {
                    self.import(scope, fq_name, [r.name.clone()]);
                }
                FieldType::Enum(r)
            }
            Mapped::Message(fq_name) => {
                let r = self.reference(scope, fq_name, &context, DeclKind::Message);
                if r.resolved {
                    self.import(
                        scope,
                        fq_name,
                        [r.name.clone(), naming::json_interface_name(&r.name)],
                    );
                }
                FieldType::Message(r)
            }
            Mapped::Fallback(wire_type) => {
                self.report(Diagnostic::UnknownFieldType {
                    file: scope.file.name.clone(),
                    field: context,
                    wire_type: format!("{wire_type:?}"),
                });
                FieldType::Scalar(Scalar::String)
            }
        }
    }

    fn method_type(&mut self, scope: &mut FileScope<'_>, fq_name: &str, context: &str) -> String {
        let r = self.reference(scope, fq_name, context, DeclKind::Message);
        if r.resolved {
            self.import(scope, fq_name, [r.name.clone()]);
        }
        r.name
    }

    /// Resolve a referenced type's output name, reporting it if unknown or
    /// not of the `expected` kind.
    fn reference(
        &mut self,
        scope: &FileScope<'_>,
        fq_name: &str,
        context: &str,
        expected: DeclKind,
    ) -> TypeRef {
        let name = self.registry.output_type_name(fq_name);
        let found = self.registry.resolve(fq_name).map(|entry| entry.kind);
        let diagnostic = match found {
            Some(kind) if kind == expected => None,
            Some(kind) => Some(Diagnostic::KindMismatch {
                file: scope.file.name.clone(),
                context: context.to_string(),
                type_name: fq_name.to_string(),
                expected,
                found: kind,
            }),
            None => Some(Diagnostic::UnresolvedType {
                file: scope.file.name.clone(),
                context: context.to_string(),
                type_name: fq_name.to_string(),
            }),
        };
        let resolved = diagnostic.is_none();
        if let Some(diagnostic) = diagnostic {
            self.report(diagnostic);
        }
        TypeRef { name, resolved }
    }

    /// Record `names` as imported from the file declaring `fq_name`, unless
    /// that is the current file.
    fn import<const N: usize>(&self, scope: &mut FileScope<'_>, fq_name: &str, names: [String; N]) {
        let Some(entry) = self.registry.resolve(fq_name) else {
            return;
        };
        if entry.file.index == scope.file.index {
            return;
        }
        for name in names {
            scope.imports.add(&entry.file.output_path, name);
        }
    }
}

fn enum_model(name: String, e: &EnumDescriptor) -> EnumModel {
    EnumModel {
        name,
        values: e
            .values
            .iter()
            .map(|v| EnumValueModel {
                name: v.name.clone(),
                number: v.number,
            })
            .collect(),
    }
}
