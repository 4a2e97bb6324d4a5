//! Binary descriptors: protoc plugin requests and `FileDescriptorSet`s.

use crate::descriptor::{
    EnumDescriptor, EnumValueDescriptor, FieldDescriptor, FieldLabel, MessageDescriptor,
    MessageOptions, MethodDescriptor, SchemaFile, SchemaSet, ServiceDescriptor, WireType,
};
use crate::error::Error;
use crate::output::GeneratedFile;
use prost::Message;
use prost_types::compiler::{CodeGeneratorRequest, CodeGeneratorResponse, code_generator_response};
use prost_types::{
    DescriptorProto, EnumDescriptorProto, FieldDescriptorProto, FileDescriptorProto,
    FileDescriptorSet, ServiceDescriptorProto,
};

/// `CodeGeneratorResponse.Feature.FEATURE_PROTO3_OPTIONAL`.
const FEATURE_PROTO3_OPTIONAL: u64 = 1;

/// Decode a protoc `CodeGeneratorRequest`.
///
/// Returns every file in the request (dependencies first, as protoc orders
/// them) and the raw plugin parameter, empty when none was given.
pub fn decode_plugin_request(bytes: &[u8]) -> Result<(SchemaSet, String), Error> {
    let request = CodeGeneratorRequest::decode(bytes)?;
    tracing::debug!(
        files = request.proto_file.len(),
        to_generate = request.file_to_generate.len(),
        "decoded plugin request"
    );
    let set = SchemaSet::new(request.proto_file.iter().map(convert_file).collect());
    Ok((set, request.parameter.unwrap_or_default()))
}

/// Decode a binary `FileDescriptorSet` (`protoc --descriptor_set_out`).
pub fn decode_descriptor_set(bytes: &[u8]) -> Result<SchemaSet, Error> {
    let set = FileDescriptorSet::decode(bytes)?;
    Ok(SchemaSet::new(set.file.iter().map(convert_file).collect()))
}

/// Encode a `CodeGeneratorResponse`.
///
/// With `error` set, protoc reports it and fails; `files` is then ignored.
pub fn encode_plugin_response(files: &[GeneratedFile], error: Option<&str>) -> Vec<u8> {
    let response = match error {
        Some(message) => CodeGeneratorResponse {
            error: Some(message.to_string()),
            supported_features: Some(FEATURE_PROTO3_OPTIONAL),
            ..Default::default()
        },
        None => CodeGeneratorResponse {
            supported_features: Some(FEATURE_PROTO3_OPTIONAL),
            file: files
                .iter()
                .map(|f| code_generator_response::File {
                    name: Some(f.path.clone()),
                    content: Some(f.content.clone()),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        },
    };
    response.encode_to_vec()
}

// ============================================================================
// prost-types → descriptor
// ============================================================================

fn convert_file(file: &FileDescriptorProto) -> SchemaFile {
    SchemaFile {
        name: file.name().to_string(),
        package: file.package().to_string(),
        enums: file.enum_type.iter().map(convert_enum).collect(),
        messages: file.message_type.iter().map(convert_message).collect(),
        services: file.service.iter().map(convert_service).collect(),
    }
}

fn convert_enum(e: &EnumDescriptorProto) -> EnumDescriptor {
    EnumDescriptor {
        name: e.name().to_string(),
        values: e
            .value
            .iter()
            .map(|v| EnumValueDescriptor {
                name: v.name().to_string(),
                number: v.number(),
            })
            .collect(),
    }
}

fn convert_message(message: &DescriptorProto) -> MessageDescriptor {
    MessageDescriptor {
        name: message.name().to_string(),
        fields: message.field.iter().map(convert_field).collect(),
        nested_messages: message.nested_type.iter().map(convert_message).collect(),
        nested_enums: message.enum_type.iter().map(convert_enum).collect(),
        options: MessageOptions {
            map_entry: message
                .options
                .as_ref()
                .is_some_and(|o| o.map_entry()),
        },
    }
}

fn convert_field(field: &FieldDescriptorProto) -> FieldDescriptor {
    // The raw codes, not the typed accessors: those map unknown values to the default.
    FieldDescriptor {
        name: field.name().to_string(),
        number: field.number(),
        label: field.label.map_or(FieldLabel::Optional, FieldLabel::from_code),
        wire_type: field.r#type.map_or(WireType::Unknown(0), WireType::from_code),
        type_name: field.type_name.clone().filter(|t| !t.is_empty()),
    }
}

fn convert_service(service: &ServiceDescriptorProto) -> ServiceDescriptor {
    ServiceDescriptor {
        name: service.name().to_string(),
        methods: service
            .method
            .iter()
            .map(|m| MethodDescriptor {
                name: m.name().to_string(),
                input_type: m.input_type().to_string(),
                output_type: m.output_type().to_string(),
            })
            .collect(),
    }
}
