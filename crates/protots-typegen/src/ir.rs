//! Intermediate representation of the generated output.
//!
//! The [`builder`](crate::builder) produces one [`FileModel`] per schema file
//! with every name already resolved; emitters only render it.

use crate::mapper::{Scalar, WellKnown};
use crate::naming;
use crate::registry::DeclKind;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// The whole compiled schema.
#[derive(Debug, Clone, Default)]
pub struct Model {
    /// One entry per schema file, in input order.
    pub files: Vec<FileModel>,
    /// Recoverable problems found while building, in discovery order.
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Default)]
pub struct FileModel {
    /// Schema file name (`shop/v1/item.proto`).
    pub source: String,
    pub package: String,
    /// Output path (`shop/v1/item.ts`).
    pub output_path: String,
    /// Prefix reaching the output root from this file (`../../`).
    pub relative_import_base: String,
    pub imports: Imports,
    pub enums: Vec<EnumModel>,
    pub messages: Vec<MessageModel>,
    pub services: Vec<ServiceModel>,
}

/// Identifiers a file needs from other output files, keyed by their output
/// path. Both levels iterate in lexicographic order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Imports(BTreeMap<String, BTreeSet<String>>);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumModel {
    /// Output name (`Color`, or `Order_Status` when nested).
    pub name: String,
    pub values: Vec<EnumValueModel>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValueModel {
    pub name: String,
    pub number: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageModel {
    pub name: String,
    /// Public interface (`IItem`).
    pub interface: String,
    /// JSON-shape interface (`IItemJSON`).
    pub json_interface: String,
    pub fields: Vec<FieldModel>,
    pub nested_enums: Vec<EnumModel>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldModel {
    /// Name as declared, used as the JSON key.
    pub wire_name: String,
    /// Camel-cased accessor name.
    pub accessor: String,
    pub ty: FieldType,
    pub repeated: bool,
}

/// Resolved singular type of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Scalar(Scalar),
    Enum(TypeRef),
    Message(TypeRef),
    WellKnown(WellKnown),
}

/// A resolved reference to a declared enum or message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    /// Output identifier (`Item`, `Order_Status`).
    pub name: String,
    /// False when the name was not found among the declared types.
    pub resolved: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceModel {
    pub package: String,
    pub name: String,
    pub interface: String,
    pub methods: Vec<MethodModel>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodModel {
    /// RPC name as declared, used in the request path.
    pub name: String,
    /// Client method name (`getItem`).
    pub client_name: String,
    pub input_type: String,
    pub output_type: String,
}

/// A recoverable problem. The affected construct is degraded or skipped and
/// the run continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A field type with no mapping; rendered as a string.
    UnknownFieldType {
        file: String,
        field: String,
        wire_type: String,
    },
    /// A reference to a type not declared anywhere in the request.
    UnresolvedType {
        file: String,
        context: String,
        type_name: String,
    },
    /// A message declared inside a message; skipped along with the fields using it.
    NestedMessage {
        file: String,
        message: String,
        nested: String,
        skipped_fields: Vec<String>,
    },
    /// A `map<K, V>` field; skipped.
    MapField {
        file: String,
        message: String,
        field: String,
    },
    /// A field typed by a message nested in another message; skipped.
    SkippedField {
        file: String,
        field: String,
        type_name: String,
    },
    /// A field whose accessor name is already taken in its message; skipped.
    AccessorCollision {
        file: String,
        message: String,
        field: String,
        accessor: String,
    },
    /// A reference to a declaration of the wrong kind (a service where a
    /// message is expected); treated as unresolved.
    KindMismatch {
        file: String,
        context: String,
        type_name: String,
        expected: DeclKind,
        found: DeclKind,
    },
}

// ============================================================================
// Field shapes
// ============================================================================

/// How a field is typed in one of the two generated interfaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldShape {
    pub base: ShapeBase,
    pub repeated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeBase {
    Scalar(Scalar),
    /// A generated enum, class, or interface.
    Named(String),
    /// A native date/time value.
    Date,
}

impl FieldModel {
    /// Shape in the public interface and accessors.
    pub fn public_shape(&self) -> FieldShape {
        let base = match &self.ty {
            FieldType::Scalar(s) => ShapeBase::Scalar(*s),
            FieldType::Enum(r) | FieldType::Message(r) => ShapeBase::Named(r.name.clone()),
            FieldType::WellKnown(WellKnown::Timestamp) => ShapeBase::Date,
        };
        FieldShape {
            base,
            repeated: self.repeated,
        }
    }

    /// Shape in the JSON interface: what actually travels on the wire.
    pub fn json_shape(&self) -> FieldShape {
        let base = match &self.ty {
            FieldType::Scalar(s) => ShapeBase::Scalar(*s),
            FieldType::Enum(r) => ShapeBase::Named(r.name.clone()),
            FieldType::Message(r) => ShapeBase::Named(naming::json_interface_name(&r.name)),
            FieldType::WellKnown(WellKnown::Timestamp) => ShapeBase::Scalar(Scalar::String),
        };
        FieldShape {
            base,
            repeated: self.repeated,
        }
    }
}

// ============================================================================
// Imports
// ============================================================================

impl Imports {
    pub fn add(&mut self, output_path: &str, name: impl Into<String>) {
        self.0
            .entry(output_path.to_string())
            .or_default()
            .insert(name.into());
    }

    pub fn get(&self, output_path: &str) -> Option<&BTreeSet<String>> {
        self.0.get(output_path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of distinct files imported from.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ============================================================================
// Lookups
// ============================================================================

impl Model {
    pub fn file(&self, output_path: &str) -> Option<&FileModel> {
        self.files.iter().find(|f| f.output_path == output_path)
    }
}

impl FileModel {
    pub fn message(&self, name: &str) -> Option<&MessageModel> {
        self.messages.iter().find(|m| m.name == name)
    }
}

impl MessageModel {
    pub fn field(&self, wire_name: &str) -> Option<&FieldModel> {
        self.fields.iter().find(|f| f.wire_name == wire_name)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnknownFieldType {
                file,
                field,
                wire_type,
            } => write!(
                f,
                "{file}: field {field} has unsupported type {wire_type}, using string"
            ),
            Diagnostic::UnresolvedType {
                file,
                context,
                type_name,
            } => write!(
                f,
                "{file}: {context} references unknown type {type_name}, nothing imported"
            ),
            Diagnostic::NestedMessage {
                file,
                message,
                nested,
                skipped_fields,
            } => {
                write!(
                    f,
                    "{file}: nested message {message}.{nested} is not supported, skipped"
                )?;
                if !skipped_fields.is_empty() {
                    write!(f, " (with fields {})", skipped_fields.join(", "))?;
                }
                Ok(())
            }
            Diagnostic::MapField {
                file,
                message,
                field,
            } => write!(
                f,
                "{file}: map field {message}.{field} is not supported, skipped"
            ),
            Diagnostic::SkippedField {
                file,
                field,
                type_name,
            } => write!(
                f,
                "{file}: field {field} uses nested message {type_name}, which is not supported, skipped"
            ),
            Diagnostic::AccessorCollision {
                file,
                message,
                field,
                accessor,
            } => write!(
                f,
                "{file}: field {message}.{field} has accessor {accessor}, already used by another field, skipped"
            ),
            Diagnostic::KindMismatch {
                file,
                context,
                type_name,
                expected,
                found,
            } => write!(
                f,
                "{file}: {context} expects {expected:?} but {type_name} is {found:?}, nothing imported"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(ty: FieldType, repeated: bool) -> FieldModel {
        FieldModel {
            wire_name: "f".into(),
            accessor: "f".into(),
            ty,
            repeated,
        }
    }

    #[test]
    fn timestamp_degrades_in_json_only() {
        for repeated in [false, true] {
            let f = field(FieldType::WellKnown(WellKnown::Timestamp), repeated);
            assert_eq!(
                f.public_shape(),
                FieldShape {
                    base: ShapeBase::Date,
                    repeated
                }
            );
            assert_eq!(
                f.json_shape(),
                FieldShape {
                    base: ShapeBase::Scalar(Scalar::String),
                    repeated
                }
            );
        }
    }

    #[test]
    fn message_refs_use_json_interface_on_the_wire() {
        let f = field(
            FieldType::Message(TypeRef {
                name: "Money".into(),
                resolved: true,
            }),
            false,
        );
        assert_eq!(f.public_shape().base, ShapeBase::Named("Money".into()));
        assert_eq!(f.json_shape().base, ShapeBase::Named("IMoneyJSON".into()));
    }

    #[test]
    fn imports_collapse_per_file() {
        let mut imports = Imports::default();
        imports.add("common/money.ts", "Money");
        imports.add("common/money.ts", "IMoneyJSON");
        imports.add("common/money.ts", "Money");
        imports.add("a/first.ts", "First");

        assert_eq!(imports.len(), 2);
        let paths: Vec<&str> = imports.iter().map(|(p, _)| p).collect();
        assert_eq!(paths, ["a/first.ts", "common/money.ts"]);
        let names: Vec<&String> = imports.get("common/money.ts").unwrap().iter().collect();
        assert_eq!(names, ["IMoneyJSON", "Money"]);
    }
}
