use std::collections::HashMap;

use log::debug;
use prost_reflect::{
    DescriptorPool, DynamicMessage, ExtensionDescriptor, Kind, MapKey, ReflectMessage, Value as ReflectValue,
};
use serde_json::{Number, Value};

use super::{
    EnumDescriptor, FieldDescriptor, FileDescriptor, MessageDescriptor, OptionMap,
    ServiceDescriptor,
};

/// Fills `option_extensions` with the custom options protoc resolved into
/// extension fields of each `*Options` message.
///
/// Resolved values take precedence; values read from `uninterpreted_option`
/// only fill names the resolved options do not set.
pub(crate) struct ExtensionResolver<'a> {
    pool: &'a DescriptorPool,
    // Extensions keyed by the full name of the message they extend
    extensions: HashMap<String, Vec<ExtensionDescriptor>>,
}

impl<'a> ExtensionResolver<'a> {
    pub(crate) fn new(pool: &'a DescriptorPool) -> Self {
        let mut extensions: HashMap<String, Vec<ExtensionDescriptor>> = HashMap::new();
        for ext in pool.all_extensions() {
            extensions
                .entry(ext.containing_message().full_name().to_string())
                .or_default()
                .push(ext);
        }
        ExtensionResolver { pool, extensions }
    }

    pub(crate) fn resolve_file(&self, file: &mut FileDescriptor) {
        if let Some(desc) = self.pool.get_file_by_name(&file.name) {
            self.merge(&file.name, &desc.options(), &mut file.option_extensions);
        }
        for message in &mut file.messages {
            self.resolve_message(message);
        }
        for enumeration in &mut file.enums {
            self.resolve_enum(enumeration);
        }
        for ext in &mut file.extensions {
            self.resolve_extension(ext);
        }
        for service in &mut file.services {
            self.resolve_service(service);
        }
    }

    fn resolve_message(&self, message: &mut MessageDescriptor) {
        let desc = match self.pool.get_message_by_name(&message.full_name) {
            Some(desc) => desc,
            None => return,
        };
        self.merge(&message.full_name, &desc.options(), &mut message.option_extensions);

        for field in &mut message.fields {
            if let Some(field_desc) = desc.get_field_by_name(&field.name) {
                self.merge(&field.full_name, &field_desc.options(), &mut field.option_extensions);
            }
        }
        for ext in &mut message.extensions {
            self.resolve_extension(ext);
        }
        for nested in &mut message.messages {
            self.resolve_message(nested);
        }
        for enumeration in &mut message.enums {
            self.resolve_enum(enumeration);
        }
    }

    fn resolve_extension(&self, ext: &mut FieldDescriptor) {
        if let Some(desc) = self.pool.get_extension_by_name(&ext.full_name) {
            self.merge(&ext.full_name, &desc.options(), &mut ext.option_extensions);
        }
    }

    fn resolve_enum(&self, enumeration: &mut EnumDescriptor) {
        let desc = match self.pool.get_enum_by_name(&enumeration.full_name) {
            Some(desc) => desc,
            None => return,
        };
        self.merge(
            &enumeration.full_name,
            &desc.options(),
            &mut enumeration.option_extensions,
        );

        for value in &mut enumeration.values {
            if let Some(value_desc) = desc.get_value_by_name(&value.name) {
                self.merge(&value.name, &value_desc.options(), &mut value.option_extensions);
            }
        }
    }

    fn resolve_service(&self, service: &mut ServiceDescriptor) {
        let desc = match self.pool.get_service_by_name(&service.full_name) {
            Some(desc) => desc,
            None => return,
        };
        self.merge(&service.full_name, &desc.options(), &mut service.option_extensions);

        for method in &mut service.methods {
            if let Some(method_desc) = desc.methods().find(|m| m.name() == method.name) {
                self.merge(&method.name, &method_desc.options(), &mut method.option_extensions);
            }
        }
    }

    fn merge(&self, entity: &str, options: &DynamicMessage, target: &mut OptionMap) {
        let resolved = self.extension_values(options);
        if resolved.is_empty() {
            return;
        }
        debug!("Resolved {} custom options on {}", resolved.len(), entity);

        let fallback = std::mem::replace(target, resolved);
        for (name, value) in fallback {
            target.entry(name).or_insert(value);
        }
    }

    fn extension_values(&self, options: &DynamicMessage) -> OptionMap {
        let mut out = OptionMap::new();
        let candidates = match self.extensions.get(options.descriptor().full_name()) {
            Some(candidates) => candidates,
            None => return out,
        };

        for ext in candidates {
            if !options.has_extension(ext) {
                continue;
            }
            let value = options.get_extension(ext);
            if let Some(json) = to_json(&value, &ext.kind()) {
                out.insert(ext.full_name().to_string(), json);
            }
        }
        out
    }
}

/// JSON form of a reflected option value.
///
/// Enum numbers become their value name when the enum declares one; bytes are
/// read as lossy UTF-8 like uninterpreted string options.
fn to_json(value: &ReflectValue, kind: &Kind) -> Option<Value> {
    let json = match value {
        ReflectValue::Bool(b) => Value::Bool(*b),
        ReflectValue::I32(n) => Value::from(*n),
        ReflectValue::I64(n) => Value::from(*n),
        ReflectValue::U32(n) => Value::from(*n),
        ReflectValue::U64(n) => Value::from(*n),
        ReflectValue::F32(n) => float(f64::from(*n)),
        ReflectValue::F64(n) => float(*n),
        ReflectValue::String(s) => Value::String(s.clone()),
        ReflectValue::Bytes(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        ReflectValue::EnumNumber(number) => match kind {
            Kind::Enum(desc) => match desc.get_value(*number) {
                Some(value) => Value::String(value.name().to_string()),
                None => Value::from(*number),
            },
            _ => Value::from(*number),
        },
        ReflectValue::Message(message) => serde_json::to_value(message).ok()?,
        ReflectValue::List(items) => Value::Array(
            items
                .iter()
                .filter_map(|item| to_json(item, kind))
                .collect(),
        ),
        ReflectValue::Map(entries) => Value::Object(
            entries
                .iter()
                .filter_map(|(key, item)| Some((map_key(key), to_json(item, kind)?)))
                .collect(),
        ),
    };
    Some(json)
}

// NaN and infinities have no JSON number form
fn float(n: f64) -> Value {
    Number::from_f64(n)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(n.to_string()))
}

fn map_key(key: &MapKey) -> String {
    match key {
        MapKey::Bool(b) => b.to_string(),
        MapKey::I32(n) => n.to_string(),
        MapKey::I64(n) => n.to_string(),
        MapKey::U32(n) => n.to_string(),
        MapKey::U64(n) => n.to_string(),
        MapKey::String(s) => s.clone(),
    }
}
