use prost_types::field_descriptor_proto::{Label, Type};

use crate::descriptor::FieldDescriptor;

const MAP_ENTRY_SUFFIX: &str = "Entry";
const REPEATED: &str = "repeated";

/// Anything declared with a protobuf type: message fields and extensions
pub trait TypedEntity {
    fn type_name(&self) -> &str;
    fn field_type(&self) -> Type;
    fn package(&self) -> &str;
}

impl TypedEntity for FieldDescriptor {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn field_type(&self) -> Type {
        self.field_type
    }

    fn package(&self) -> &str {
        &self.package
    }
}

/// The short, package-relative and fully-qualified spelling of a type
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeNames {
    pub name: String,
    pub long_name: String,
    pub full_name: String,
}

impl TypeNames {
    /// Names for a type reference such as `.com.example.Booking`
    pub fn qualified(reference: &str, package: &str) -> Self {
        let full_name = reference.strip_prefix('.').unwrap_or(reference);
        TypeNames {
            name: base_name(full_name).to_string(),
            long_name: strip_package(full_name, package).to_string(),
            full_name: full_name.to_string(),
        }
    }

    fn scalar(name: &str) -> Self {
        TypeNames {
            name: name.to_string(),
            long_name: name.to_string(),
            full_name: name.to_string(),
        }
    }
}

/// Resolve the type names of a field or extension.
///
/// Message and enum references are resolved from the type name; everything else
/// is named after its scalar type (`int32`, `string`, ...).
pub fn resolve_type<T: TypedEntity + ?Sized>(entity: &T) -> TypeNames {
    let reference = entity.type_name();
    if reference.starts_with('.') {
        TypeNames::qualified(reference, entity.package())
    } else {
        TypeNames::scalar(scalar_name(entity.field_type()))
    }
}

/// Last dot-separated segment of a name
pub fn base_name(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) => &name[idx + 1..],
        None => name,
    }
}

fn strip_package<'a>(full_name: &'a str, package: &str) -> &'a str {
    if package.is_empty() {
        return full_name;
    }
    full_name
        .strip_prefix(package)
        .and_then(|rest| rest.strip_prefix('.'))
        .unwrap_or(full_name)
}

pub fn scalar_name(ty: Type) -> &'static str {
    match ty {
        Type::Double => "double",
        Type::Float => "float",
        Type::Int64 => "int64",
        Type::Uint64 => "uint64",
        Type::Int32 => "int32",
        Type::Fixed64 => "fixed64",
        Type::Fixed32 => "fixed32",
        Type::Bool => "bool",
        Type::String => "string",
        Type::Group => "group",
        Type::Message => "message",
        Type::Bytes => "bytes",
        Type::Uint32 => "uint32",
        Type::Enum => "enum",
        Type::Sfixed32 => "sfixed32",
        Type::Sfixed64 => "sfixed64",
        Type::Sint32 => "sint32",
        Type::Sint64 => "sint64",
    }
}

/// Label as shown in the documentation.
///
/// proto3 fields without an explicit `optional` have no label unless repeated.
pub fn label_name(label: Label, proto3: bool, proto3_optional: bool) -> &'static str {
    if proto3 && !proto3_optional && label != Label::Repeated {
        return "";
    }
    match label {
        Label::Optional => "optional",
        Label::Required => "required",
        Label::Repeated => REPEATED,
    }
}

/// Whether a field is a `map<K, V>` field.
///
/// protoc declares map fields as repeated fields of a nested `...Entry` message.
/// Any repeated field of a nested message named `*Entry` matches as well.
pub fn is_map_entry(label: &str, types: &TypeNames) -> bool {
    label == REPEATED
        && types.long_name.contains('.')
        && types.name.ends_with(MAP_ENTRY_SUFFIX)
        && types.long_name.ends_with(MAP_ENTRY_SUFFIX)
        && types.full_name.ends_with(MAP_ENTRY_SUFFIX)
}
