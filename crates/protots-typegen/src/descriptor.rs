//! Decoded schema input.
//!
//! A trimmed mirror of the protobuf descriptor model: just the parts the
//! compiler reads. Deserializes from the JSON rendering of a
//! `FileDescriptorSet` (camelCase keys, `TYPE_*` / `LABEL_*` enum names), and
//! is built from `prost-types` descriptors by [`crate::input`].

use serde::{Deserialize, Deserializer};

/// An ordered set of schema files, in the order the schema source gave them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemaSet {
    #[serde(default, rename = "file")]
    pub files: Vec<SchemaFile>,
}

/// One `.proto` file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemaFile {
    /// File path as given to protoc (e.g. `shop/v1/item.proto`).
    #[serde(default)]
    pub name: String,
    /// Dot-separated package, empty when the file declares none.
    #[serde(default)]
    pub package: String,
    #[serde(default, rename = "enumType")]
    pub enums: Vec<EnumDescriptor>,
    #[serde(default, rename = "messageType")]
    pub messages: Vec<MessageDescriptor>,
    #[serde(default, rename = "service")]
    pub services: Vec<ServiceDescriptor>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnumDescriptor {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "value")]
    pub values: Vec<EnumValueDescriptor>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnumValueDescriptor {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub number: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageDescriptor {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "field")]
    pub fields: Vec<FieldDescriptor>,
    #[serde(default, rename = "nestedType")]
    pub nested_messages: Vec<MessageDescriptor>,
    #[serde(default, rename = "enumType")]
    pub nested_enums: Vec<EnumDescriptor>,
    #[serde(default)]
    pub options: MessageOptions,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageOptions {
    /// Set by protoc on the synthetic `FooEntry` message behind a `map<K, V> foo` field.
    #[serde(default)]
    pub map_entry: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub number: i32,
    #[serde(default)]
    pub label: FieldLabel,
    #[serde(rename = "type")]
    pub wire_type: WireType,
    /// Fully-qualified referenced type (`.pkg.Name`) for enum and message fields.
    #[serde(default)]
    pub type_name: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FieldLabel {
    #[default]
    Optional,
    Required,
    Repeated,
}

/// Declared protobuf field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireType {
    Double,
    Float,
    Int64,
    Uint64,
    Int32,
    Fixed64,
    Fixed32,
    Bool,
    String,
    Group,
    Message,
    Bytes,
    Uint32,
    Enum,
    Sfixed32,
    Sfixed64,
    Sint32,
    Sint64,
    /// A code or name this compiler does not know.
    Unknown(i32),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceDescriptor {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "method")]
    pub methods: Vec<MethodDescriptor>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodDescriptor {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub input_type: String,
    #[serde(default)]
    pub output_type: String,
}

// ============================================================================
// Wire type / label codes
// ============================================================================

impl WireType {
    /// From the numeric `FieldDescriptorProto.Type` code.
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => Self::Double,
            2 => Self::Float,
            3 => Self::Int64,
            4 => Self::Uint64,
            5 => Self::Int32,
            6 => Self::Fixed64,
            7 => Self::Fixed32,
            8 => Self::Bool,
            9 => Self::String,
            10 => Self::Group,
            11 => Self::Message,
            12 => Self::Bytes,
            13 => Self::Uint32,
            14 => Self::Enum,
            15 => Self::Sfixed32,
            16 => Self::Sfixed64,
            17 => Self::Sint32,
            18 => Self::Sint64,
            other => Self::Unknown(other),
        }
    }

    /// From the JSON enum name (`TYPE_INT32`).
    pub fn from_name(name: &str) -> Self {
        match name {
            "TYPE_DOUBLE" => Self::Double,
            "TYPE_FLOAT" => Self::Float,
            "TYPE_INT64" => Self::Int64,
            "TYPE_UINT64" => Self::Uint64,
            "TYPE_INT32" => Self::Int32,
            "TYPE_FIXED64" => Self::Fixed64,
            "TYPE_FIXED32" => Self::Fixed32,
            "TYPE_BOOL" => Self::Bool,
            "TYPE_STRING" => Self::String,
            "TYPE_GROUP" => Self::Group,
            "TYPE_MESSAGE" => Self::Message,
            "TYPE_BYTES" => Self::Bytes,
            "TYPE_UINT32" => Self::Uint32,
            "TYPE_ENUM" => Self::Enum,
            "TYPE_SFIXED32" => Self::Sfixed32,
            "TYPE_SFIXED64" => Self::Sfixed64,
            "TYPE_SINT32" => Self::Sint32,
            "TYPE_SINT64" => Self::Sint64,
            _ => Self::Unknown(0),
        }
    }
}

impl FieldLabel {
    pub fn from_code(code: i32) -> Self {
        match code {
            2 => Self::Required,
            3 => Self::Repeated,
            _ => Self::Optional,
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name {
            "LABEL_REQUIRED" => Self::Required,
            "LABEL_REPEATED" => Self::Repeated,
            _ => Self::Optional,
        }
    }
}

/// protojson writes enums by name, but numeric codes are accepted too.
#[derive(Deserialize)]
#[serde(untagged)]
enum EnumRepr {
    Name(String),
    Code(i32),
}

impl<'de> Deserialize<'de> for WireType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match EnumRepr::deserialize(deserializer)? {
            EnumRepr::Name(name) => Self::from_name(&name),
            EnumRepr::Code(code) => Self::from_code(code),
        })
    }
}

impl<'de> Deserialize<'de> for FieldLabel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match EnumRepr::deserialize(deserializer)? {
            EnumRepr::Name(name) => Self::from_name(&name),
            EnumRepr::Code(code) => Self::from_code(code),
        })
    }
}

// ============================================================================
// Programmatic construction
// ============================================================================

impl SchemaSet {
    pub fn new(files: Vec<SchemaFile>) -> Self {
        Self { files }
    }
}

impl SchemaFile {
    pub fn new(name: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            package: package.into(),
            ..Default::default()
        }
    }

    pub fn with_enum(mut self, e: EnumDescriptor) -> Self {
        self.enums.push(e);
        self
    }

    pub fn with_message(mut self, m: MessageDescriptor) -> Self {
        self.messages.push(m);
        self
    }

    pub fn with_service(mut self, s: ServiceDescriptor) -> Self {
        self.services.push(s);
        self
    }
}

impl EnumDescriptor {
    pub fn new(name: impl Into<String>, values: &[(&str, i32)]) -> Self {
        Self {
            name: name.into(),
            values: values
                .iter()
                .map(|(name, number)| EnumValueDescriptor {
                    name: (*name).to_string(),
                    number: *number,
                })
                .collect(),
        }
    }
}

impl MessageDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_field(mut self, f: FieldDescriptor) -> Self {
        self.fields.push(f);
        self
    }

    pub fn with_nested_enum(mut self, e: EnumDescriptor) -> Self {
        self.nested_enums.push(e);
        self
    }

    pub fn with_nested_message(mut self, m: MessageDescriptor) -> Self {
        self.nested_messages.push(m);
        self
    }

    pub fn is_map_entry(&self) -> bool {
        self.options.map_entry
    }
}

impl FieldDescriptor {
    /// A singular field of a scalar type.
    pub fn scalar(name: impl Into<String>, number: i32, wire_type: WireType) -> Self {
        Self {
            name: name.into(),
            number,
            label: FieldLabel::Optional,
            wire_type,
            type_name: None,
        }
    }

    /// A singular field referencing `type_name` (`.pkg.Name`).
    pub fn reference(
        name: impl Into<String>,
        number: i32,
        wire_type: WireType,
        type_name: impl Into<String>,
    ) -> Self {
        Self {
            type_name: Some(type_name.into()),
            ..Self::scalar(name, number, wire_type)
        }
    }

    pub fn repeated(mut self) -> Self {
        self.label = FieldLabel::Repeated;
        self
    }

    pub fn is_repeated(&self) -> bool {
        self.label == FieldLabel::Repeated
    }
}

impl ServiceDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: Vec::new(),
        }
    }

    pub fn with_method(
        mut self,
        name: impl Into<String>,
        input_type: impl Into<String>,
        output_type: impl Into<String>,
    ) -> Self {
        self.methods.push(MethodDescriptor {
            name: name.into(),
            input_type: input_type.into(),
            output_type: output_type.into(),
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserialize_protojson_field() {
        let field: FieldDescriptor = serde_json::from_value(json!({
            "name": "created_at",
            "number": 3,
            "label": "LABEL_REPEATED",
            "type": "TYPE_MESSAGE",
            "typeName": ".google.protobuf.Timestamp",
            "jsonName": "createdAt"
        }))
        .unwrap();

        assert_eq!(field.wire_type, WireType::Message);
        assert!(field.is_repeated());
        assert_eq!(field.type_name.as_deref(), Some(".google.protobuf.Timestamp"));
    }

    #[test]
    fn numeric_and_unknown_type_codes() {
        let field: FieldDescriptor =
            serde_json::from_value(json!({ "name": "a", "type": 17, "label": 1 })).unwrap();
        assert_eq!(field.wire_type, WireType::Sint32);
        assert_eq!(field.label, FieldLabel::Optional);

        assert_eq!(WireType::from_code(42), WireType::Unknown(42));
        assert_eq!(WireType::from_name("TYPE_WHATEVER"), WireType::Unknown(0));
    }

    #[test]
    fn map_entry_option() {
        let msg: MessageDescriptor = serde_json::from_value(json!({
            "name": "LabelsEntry",
            "options": { "mapEntry": true }
        }))
        .unwrap();
        assert!(msg.is_map_entry());
    }
}
