//! Field type mapping.
//!
//! Maps a declared protobuf field type onto its singular semantic output
//! type. Whether the field is repeated, and how the type degrades in the JSON
//! shape, is layered on by the [`ir`](crate::ir) types.

use crate::descriptor::WireType;

/// Fully-qualified name of the only well-known type given special treatment.
pub const TIMESTAMP_TYPE_NAME: &str = ".google.protobuf.Timestamp";

/// Primitive output types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scalar {
    Number,
    String,
    Boolean,
}

/// Well-known types with a language-native representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WellKnown {
    /// `google.protobuf.Timestamp`: a `Date`, RFC 3339 text on the wire.
    Timestamp,
}

/// Singular mapping of one field, before name resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mapped<'a> {
    Scalar(Scalar),
    /// Enum reference by fully-qualified schema name.
    Enum(&'a str),
    /// Message reference by fully-qualified schema name.
    Message(&'a str),
    WellKnown(WellKnown),
    /// Unrecognized; rendered as a string. Callers must report it.
    Fallback(WireType),
}

/// Map a field's wire type (and referenced type name, for enums and
/// messages) to its singular output type.
pub fn map_singular(wire_type: WireType, type_name: Option<&str>) -> Mapped<'_> {
    match wire_type {
        WireType::Double
        | WireType::Float
        | WireType::Int32
        | WireType::Int64
        | WireType::Uint32
        | WireType::Uint64
        | WireType::Sint32
        | WireType::Sint64
        | WireType::Fixed32
        | WireType::Fixed64
        | WireType::Sfixed32
        | WireType::Sfixed64 => Mapped::Scalar(Scalar::Number),
        WireType::String => Mapped::Scalar(Scalar::String),
        WireType::Bool => Mapped::Scalar(Scalar::Boolean),
        WireType::Enum => match type_name {
            Some(name) => Mapped::Enum(name),
            None => Mapped::Fallback(wire_type),
        },
        WireType::Message => match type_name {
            Some(TIMESTAMP_TYPE_NAME) => Mapped::WellKnown(WellKnown::Timestamp),
            Some(name) => Mapped::Message(name),
            None => Mapped::Fallback(wire_type),
        },
        WireType::Group | WireType::Bytes | WireType::Unknown(_) => Mapped::Fallback(wire_type),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_wire_types() {
        for wire in [
            WireType::Double,
            WireType::Float,
            WireType::Int32,
            WireType::Int64,
            WireType::Uint32,
            WireType::Uint64,
            WireType::Sint32,
            WireType::Sint64,
            WireType::Fixed32,
            WireType::Fixed64,
            WireType::Sfixed32,
            WireType::Sfixed64,
        ] {
            assert_eq!(map_singular(wire, None), Mapped::Scalar(Scalar::Number), "{wire:?}");
        }
    }

    #[test]
    fn string_and_bool() {
        assert_eq!(
            map_singular(WireType::String, None),
            Mapped::Scalar(Scalar::String)
        );
        assert_eq!(
            map_singular(WireType::Bool, None),
            Mapped::Scalar(Scalar::Boolean)
        );
    }

    #[test]
    fn references_keep_qualified_name() {
        assert_eq!(
            map_singular(WireType::Enum, Some(".shop.v1.Color")),
            Mapped::Enum(".shop.v1.Color")
        );
        assert_eq!(
            map_singular(WireType::Message, Some(".shop.v1.Item")),
            Mapped::Message(".shop.v1.Item")
        );
    }

    #[test]
    fn timestamp_is_well_known() {
        assert_eq!(
            map_singular(WireType::Message, Some(".google.protobuf.Timestamp")),
            Mapped::WellKnown(WellKnown::Timestamp)
        );
        // Only the exact name is special.
        assert_eq!(
            map_singular(WireType::Message, Some(".other.Timestamp")),
            Mapped::Message(".other.Timestamp")
        );
    }

    #[test]
    fn unrecognized_falls_back() {
        assert_eq!(
            map_singular(WireType::Bytes, None),
            Mapped::Fallback(WireType::Bytes)
        );
        assert_eq!(
            map_singular(WireType::Group, Some(".a.B")),
            Mapped::Fallback(WireType::Group)
        );
        assert_eq!(
            map_singular(WireType::Unknown(99), None),
            Mapped::Fallback(WireType::Unknown(99))
        );
        assert_eq!(
            map_singular(WireType::Message, None),
            Mapped::Fallback(WireType::Message)
        );
    }
}
