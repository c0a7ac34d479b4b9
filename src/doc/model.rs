use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::doc::options::OptionMap;
use crate::doc::scalars::ScalarValue;

/// Everything a documentation template renders: the parsed files and the
/// scalar type reference table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub files: Vec<File>,
    /// `None` when the scalar table could not be loaded
    #[serde(rename = "scalarValueTypes")]
    pub scalars: Option<Vec<ScalarValue>>,
}

/// One parsed proto file.
///
/// The top-level enums, extensions, messages and services are sorted by long
/// name, nested types included. Enum values, fields and methods keep their
/// declaration order. For proto3 files `has_extensions` is false and
/// `extensions` is empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct File {
    pub name: String,
    pub description: String,
    pub package: String,

    pub has_enums: bool,
    pub has_extensions: bool,
    pub has_messages: bool,
    pub has_services: bool,

    pub enums: Vec<Enum>,
    pub extensions: Vec<FileExtension>,
    pub messages: Vec<Message>,
    pub services: Vec<Service>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<OptionMap>,
}

/// An extension declared at file level (proto2)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileExtension {
    pub name: String,
    pub long_name: String,
    pub full_name: String,
    pub description: String,
    pub label: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub long_type: String,
    pub full_type: String,
    pub number: i32,
    pub default_value: String,
    pub containing_type: String,
    pub containing_long_type: String,
    pub containing_full_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<OptionMap>,
}

/// An extension declared inside a message body (proto2)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageExtension {
    #[serde(flatten)]
    pub extension: FileExtension,

    pub scope_type: String,
    pub scope_long_type: String,
    pub scope_full_type: String,
}

/// A message. Nested messages and enums are not children of this record; they
/// appear in the file's collections under their dotted long names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub name: String,
    pub long_name: String,
    pub full_name: String,
    pub description: String,

    pub has_extensions: bool,
    pub has_fields: bool,
    pub has_oneofs: bool,

    pub extensions: Vec<MessageExtension>,
    pub fields: Vec<MessageField>,

    pub exclude: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<OptionMap>,
}

/// A message field.
///
/// In proto3 files `default_value` is always empty and `label` is empty unless
/// the field is repeated or explicitly optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageField {
    pub name: String,
    pub description: String,
    pub label: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub long_type: String,
    pub full_type: String,
    #[serde(rename = "ismap")]
    pub is_map: bool,
    #[serde(rename = "isoneof")]
    pub is_oneof: bool,
    #[serde(rename = "oneofdecl")]
    pub oneof_decl: String,
    pub default_value: String,
    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<OptionMap>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enum {
    pub name: String,
    pub long_name: String,
    pub full_name: String,
    pub description: String,
    pub values: Vec<EnumValue>,
    pub exclude: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<OptionMap>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumValue {
    pub name: String,
    pub number: String,
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<OptionMap>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub name: String,
    pub long_name: String,
    pub full_name: String,
    pub description: String,
    pub methods: Vec<ServiceMethod>,
    pub title: String,
    pub exclude: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<OptionMap>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceMethod {
    pub name: String,
    pub description: String,
    pub request_type: String,
    pub request_long_type: String,
    pub request_full_type: String,
    pub request_streaming: bool,
    pub response_type: String,
    pub response_long_type: String,
    pub response_full_type: String,
    pub response_streaming: bool,
    pub title: String,
    pub action: String,
    pub version: String,
    pub exclude: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<OptionMap>,
}

/// Option lookup shared by every documented entity
pub trait HasOptions {
    fn options(&self) -> Option<&OptionMap>;

    /// The named option, if set
    fn option(&self, name: &str) -> Option<&Value> {
        self.options().and_then(|options| options.get(name))
    }
}

macro_rules! impl_has_options {
    ($($record:ty),* $(,)?) => {
        $(
            impl HasOptions for $record {
                fn options(&self) -> Option<&OptionMap> {
                    self.options.as_ref()
                }
            }
        )*
    };
}

impl_has_options!(
    File,
    FileExtension,
    Message,
    MessageField,
    Enum,
    EnumValue,
    Service,
    ServiceMethod,
);

impl HasOptions for MessageExtension {
    fn options(&self) -> Option<&OptionMap> {
        self.extension.options.as_ref()
    }
}

// Sorted, distinct option names set on any of `items`.
fn option_names<T: HasOptions>(items: &[T]) -> Vec<String> {
    items
        .iter()
        .filter_map(HasOptions::options)
        .flat_map(|options| options.keys().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn with_option<'a, T: HasOptions>(items: &'a [T], name: &str) -> Vec<&'a T> {
    items
        .iter()
        .filter(|item| item.option(name).is_some())
        .collect()
}

impl Message {
    /// Every option name set on at least one field
    pub fn field_options(&self) -> Vec<String> {
        option_names(&self.fields)
    }

    pub fn fields_with_option(&self, name: &str) -> Vec<&MessageField> {
        with_option(&self.fields, name)
    }
}

impl Enum {
    /// Every option name set on at least one value
    pub fn value_options(&self) -> Vec<String> {
        option_names(&self.values)
    }

    pub fn values_with_option(&self, name: &str) -> Vec<&EnumValue> {
        with_option(&self.values, name)
    }
}

impl Service {
    /// Every option name set on at least one method
    pub fn method_options(&self) -> Vec<String> {
        option_names(&self.methods)
    }

    pub fn methods_with_option(&self, name: &str) -> Vec<&ServiceMethod> {
        with_option(&self.methods, name)
    }
}

impl Template {
    /// Serialize for a template engine
    pub fn to_json(&self, pretty: bool) -> Result<String, crate::Error> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}
