//! Descriptor views
//!
//! Read-only views over `prost_types` descriptors. Building the views resolves
//! everything that depends on where an entity sits in its file: source comments,
//! package-relative ("long") and fully-qualified names, the owning package and
//! syntax, and the values of custom options. The documentation builder only
//! ever reads these views.

mod comments;
mod options;
mod reflect;


use std::collections::BTreeMap;

use log::warn;
use prost::Message;
use prost_reflect::DescriptorPool;
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{
    DescriptorProto, EnumDescriptorProto, EnumOptions, EnumValueOptions, FieldDescriptorProto,
    FieldOptions, FileDescriptorProto, FileDescriptorSet, FileOptions, MessageOptions,
    MethodDescriptorProto, MethodOptions, ServiceDescriptorProto, ServiceOptions,
    UninterpretedOption,
};

pub use comments::Comments;
pub use options::uninterpreted_extensions;

use crate::Error;
use comments::CommentIndex;
use reflect::ExtensionResolver;

/// Option name to option value
pub type OptionMap = BTreeMap<String, serde_json::Value>;

// Field numbers used in `SourceCodeInfo` paths.
const FILE_MESSAGE: i32 = 4;
const FILE_ENUM: i32 = 5;
const FILE_SERVICE: i32 = 6;
const FILE_EXTENSION: i32 = 7;
const FILE_SYNTAX: i32 = 12;
const MESSAGE_FIELD: i32 = 2;
const MESSAGE_NESTED: i32 = 3;
const MESSAGE_ENUM: i32 = 4;
const MESSAGE_EXTENSION: i32 = 6;
const ENUM_VALUE: i32 = 2;
const SERVICE_METHOD: i32 = 2;

#[derive(Debug, Clone)]
pub struct FileDescriptor {
    pub name: String,
    pub package: String,
    pub proto3: bool,
    /// Comments attached to the `syntax` statement, used as the file description
    pub syntax_comments: Comments,
    pub options: Option<FileOptions>,
    pub option_extensions: OptionMap,
    pub enums: Vec<EnumDescriptor>,
    pub extensions: Vec<FieldDescriptor>,
    pub messages: Vec<MessageDescriptor>,
    pub services: Vec<ServiceDescriptor>,
}

#[derive(Debug, Clone)]
pub struct MessageDescriptor {
    pub name: String,
    pub long_name: String,
    pub full_name: String,
    pub comments: Comments,
    pub options: Option<MessageOptions>,
    pub option_extensions: OptionMap,
    pub fields: Vec<FieldDescriptor>,
    pub extensions: Vec<FieldDescriptor>,
    pub oneof_decls: Vec<String>,
    pub messages: Vec<MessageDescriptor>,
    pub enums: Vec<EnumDescriptor>,
}

/// A message field or an extension field.
///
/// Extensions have a non-empty `extendee`; extensions declared inside a message
/// body also carry the `scope` they were declared in.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub name: String,
    pub long_name: String,
    pub full_name: String,
    pub comments: Comments,
    pub package: String,
    pub proto3: bool,
    pub number: i32,
    pub label: Label,
    pub field_type: Type,
    pub type_name: String,
    pub default_value: String,
    pub oneof_index: Option<i32>,
    pub proto3_optional: bool,
    pub extendee: String,
    pub scope: Option<Scope>,
    pub options: Option<FieldOptions>,
    pub option_extensions: OptionMap,
}

/// Naming triple of the message an extension is declared in
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    pub name: String,
    pub long_name: String,
    pub full_name: String,
}

#[derive(Debug, Clone)]
pub struct EnumDescriptor {
    pub name: String,
    pub long_name: String,
    pub full_name: String,
    pub comments: Comments,
    pub options: Option<EnumOptions>,
    pub option_extensions: OptionMap,
    pub values: Vec<EnumValueDescriptor>,
}

#[derive(Debug, Clone)]
pub struct EnumValueDescriptor {
    pub name: String,
    pub number: i32,
    pub comments: Comments,
    pub options: Option<EnumValueOptions>,
    pub option_extensions: OptionMap,
}

#[derive(Debug, Clone)]
pub struct ServiceDescriptor {
    pub name: String,
    pub long_name: String,
    pub full_name: String,
    pub comments: Comments,
    pub options: Option<ServiceOptions>,
    pub option_extensions: OptionMap,
    pub methods: Vec<MethodDescriptor>,
}

#[derive(Debug, Clone)]
pub struct MethodDescriptor {
    pub name: String,
    pub package: String,
    pub comments: Comments,
    pub input_type: String,
    pub output_type: String,
    pub client_streaming: bool,
    pub server_streaming: bool,
    pub options: Option<MethodOptions>,
    pub option_extensions: OptionMap,
}

/// Decode a serialized `FileDescriptorSet`, as written by `protoc --descriptor_set_out`
pub fn decode_descriptor_set(bytes: &[u8]) -> Result<FileDescriptorSet, Error> {
    Ok(FileDescriptorSet::decode(bytes)?)
}

/// Build views for every file in the set, keeping the set's order
pub fn load_files(set: &FileDescriptorSet) -> Vec<FileDescriptor> {
    set.file.iter().map(FileDescriptor::from_proto).collect()
}

/// Decode a serialized `FileDescriptorSet` and build views whose
/// `option_extensions` include the custom options protoc resolved into
/// extension fields.
///
/// `prost_types` drops those fields while decoding, so the bytes are decoded a
/// second time into a `prost_reflect::DescriptorPool`. When the set cannot be
/// linked into a pool (for example, an import is missing), only options left
/// in `uninterpreted_option` are reported.
pub fn load_files_from_bytes(bytes: &[u8]) -> Result<Vec<FileDescriptor>, Error> {
    let set = decode_descriptor_set(bytes)?;
    let mut files = load_files(&set);

    match DescriptorPool::decode(bytes) {
        Ok(pool) => {
            let resolver = ExtensionResolver::new(&pool);
            for file in &mut files {
                resolver.resolve_file(file);
            }
        }
        Err(e) => warn!("Custom options left unresolved: {}", e),
    }

    Ok(files)
}

impl FileDescriptor {
    pub fn from_proto(file: &FileDescriptorProto) -> Self {
        let package = file.package().to_string();
        let builder = ViewBuilder {
            package: &package,
            proto3: file.syntax() == "proto3",
            comments: CommentIndex::new(file.source_code_info.as_ref()),
        };

        let messages = file
            .message_type
            .iter()
            .enumerate()
            .map(|(i, m)| builder.message(m, None, &child_path(&[], FILE_MESSAGE, i)))
            .collect();
        let enums = file
            .enum_type
            .iter()
            .enumerate()
            .map(|(i, e)| builder.enumeration(e, None, &child_path(&[], FILE_ENUM, i)))
            .collect();
        let extensions = file
            .extension
            .iter()
            .enumerate()
            .map(|(i, f)| builder.field(f, None, None, &child_path(&[], FILE_EXTENSION, i)))
            .collect();
        let services = file
            .service
            .iter()
            .enumerate()
            .map(|(i, s)| builder.service(s, &child_path(&[], FILE_SERVICE, i)))
            .collect();

        FileDescriptor {
            name: file.name().to_string(),
            package: package.clone(),
            proto3: builder.proto3,
            syntax_comments: builder.comments.get(&[FILE_SYNTAX]),
            options: file.options.clone(),
            option_extensions: extensions_of(
                file.options.as_ref().map(|o| o.uninterpreted_option.as_slice()),
            ),
            enums,
            extensions,
            messages,
            services,
        }
    }
}

struct ViewBuilder<'a> {
    package: &'a str,
    proto3: bool,
    comments: CommentIndex,
}

impl<'a> ViewBuilder<'a> {
    fn full_name(&self, long_name: &str) -> String {
        if self.package.is_empty() {
            long_name.to_string()
        } else {
            format!("{}.{}", self.package, long_name)
        }
    }

    fn message(
        &self,
        message: &DescriptorProto,
        parent: Option<&str>,
        path: &[i32],
    ) -> MessageDescriptor {
        let name = message.name().to_string();
        let long_name = qualify(parent, &name);
        let full_name = self.full_name(&long_name);
        let scope = Scope {
            name: name.clone(),
            long_name: long_name.clone(),
            full_name: full_name.clone(),
        };

        let fields = message
            .field
            .iter()
            .enumerate()
            .map(|(i, f)| {
                let path = child_path(path, MESSAGE_FIELD, i);
                self.field(f, Some(&long_name), None, &path)
            })
            .collect();
        let extensions = message
            .extension
            .iter()
            .enumerate()
            .map(|(i, f)| {
                let path = child_path(path, MESSAGE_EXTENSION, i);
                self.field(f, Some(&long_name), Some(scope.clone()), &path)
            })
            .collect();
        let messages = message
            .nested_type
            .iter()
            .enumerate()
            .map(|(i, m)| self.message(m, Some(&long_name), &child_path(path, MESSAGE_NESTED, i)))
            .collect();
        let enums = message
            .enum_type
            .iter()
            .enumerate()
            .map(|(i, e)| self.enumeration(e, Some(&long_name), &child_path(path, MESSAGE_ENUM, i)))
            .collect();

        MessageDescriptor {
            comments: self.comments.get(path),
            options: message.options.clone(),
            option_extensions: extensions_of(
                message.options.as_ref().map(|o| o.uninterpreted_option.as_slice()),
            ),
            oneof_decls: message.oneof_decl.iter().map(|o| o.name().to_string()).collect(),
            fields,
            extensions,
            messages,
            enums,
            name,
            long_name,
            full_name,
        }
    }

    fn field(
        &self,
        field: &FieldDescriptorProto,
        parent: Option<&str>,
        scope: Option<Scope>,
        path: &[i32],
    ) -> FieldDescriptor {
        let name = field.name().to_string();
        let long_name = qualify(parent, &name);

        FieldDescriptor {
            full_name: self.full_name(&long_name),
            comments: self.comments.get(path),
            package: self.package.to_string(),
            proto3: self.proto3,
            number: field.number(),
            label: field.label(),
            field_type: field.r#type(),
            type_name: field.type_name().to_string(),
            default_value: field.default_value().to_string(),
            oneof_index: field.oneof_index,
            proto3_optional: field.proto3_optional(),
            extendee: field.extendee().to_string(),
            scope,
            options: field.options.clone(),
            option_extensions: extensions_of(
                field.options.as_ref().map(|o| o.uninterpreted_option.as_slice()),
            ),
            name,
            long_name,
        }
    }

    fn enumeration(
        &self,
        enumeration: &EnumDescriptorProto,
        parent: Option<&str>,
        path: &[i32],
    ) -> EnumDescriptor {
        let name = enumeration.name().to_string();
        let long_name = qualify(parent, &name);

        let values = enumeration
            .value
            .iter()
            .enumerate()
            .map(|(i, v)| EnumValueDescriptor {
                name: v.name().to_string(),
                number: v.number(),
                comments: self.comments.get(&child_path(path, ENUM_VALUE, i)),
                options: v.options.clone(),
                option_extensions: extensions_of(
                    v.options.as_ref().map(|o| o.uninterpreted_option.as_slice()),
                ),
            })
            .collect();

        EnumDescriptor {
            full_name: self.full_name(&long_name),
            comments: self.comments.get(path),
            options: enumeration.options.clone(),
            option_extensions: extensions_of(
                enumeration.options.as_ref().map(|o| o.uninterpreted_option.as_slice()),
            ),
            values,
            name,
            long_name,
        }
    }

    fn service(&self, service: &ServiceDescriptorProto, path: &[i32]) -> ServiceDescriptor {
        let name = service.name().to_string();

        let methods = service
            .method
            .iter()
            .enumerate()
            .map(|(i, m)| self.method(m, &child_path(path, SERVICE_METHOD, i)))
            .collect();

        ServiceDescriptor {
            long_name: name.clone(),
            full_name: self.full_name(&name),
            comments: self.comments.get(path),
            options: service.options.clone(),
            option_extensions: extensions_of(
                service.options.as_ref().map(|o| o.uninterpreted_option.as_slice()),
            ),
            methods,
            name,
        }
    }

    fn method(&self, method: &MethodDescriptorProto, path: &[i32]) -> MethodDescriptor {
        MethodDescriptor {
            name: method.name().to_string(),
            package: self.package.to_string(),
            comments: self.comments.get(path),
            input_type: method.input_type().to_string(),
            output_type: method.output_type().to_string(),
            client_streaming: method.client_streaming(),
            server_streaming: method.server_streaming(),
            options: method.options.clone(),
            option_extensions: extensions_of(
                method.options.as_ref().map(|o| o.uninterpreted_option.as_slice()),
            ),
        }
    }
}

fn qualify(parent: Option<&str>, name: &str) -> String {
    match parent {
        Some(parent) => format!("{}.{}", parent, name),
        None => name.to_string(),
    }
}

fn child_path(base: &[i32], field_number: i32, index: usize) -> Vec<i32> {
    let mut path = base.to_vec();
    path.push(field_number);
    path.push(index as i32);
    path
}

fn extensions_of(options: Option<&[UninterpretedOption]>) -> OptionMap {
    options.map(uninterpreted_extensions).unwrap_or_default()
}
