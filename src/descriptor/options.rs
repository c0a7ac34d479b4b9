use prost_types::UninterpretedOption;
use serde_json::{Number, Value};

use super::OptionMap;

/// Collect the custom (extension) options that survived as uninterpreted options.
///
/// Only options whose name contains an extension part are kept, so
/// `option deprecated = true` is ignored while `option (acme.owner) = "billing"`
/// becomes `{"acme.owner": "billing"}`. Nested parts are dot-joined:
/// `(acme.rules).max_len` becomes `acme.rules.max_len`. The first declaration of
/// a name wins.
pub fn uninterpreted_extensions(options: &[UninterpretedOption]) -> OptionMap {
    let mut out = OptionMap::new();
    for option in options {
        if !option.name.iter().any(|part| part.is_extension) {
            continue;
        }

        let key = option
            .name
            .iter()
            .map(|part| part.name_part.trim_start_matches('.'))
            .collect::<Vec<_>>()
            .join(".");

        if let Some(value) = option_value(option) {
            out.entry(key).or_insert(value);
        }
    }
    out
}

fn option_value(option: &UninterpretedOption) -> Option<Value> {
    if let Some(ref identifier) = option.identifier_value {
        return Some(match identifier.as_str() {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            other => Value::String(other.to_string()),
        });
    }
    if let Some(v) = option.positive_int_value {
        return Some(Value::from(v));
    }
    if let Some(v) = option.negative_int_value {
        return Some(Value::from(v));
    }
    if let Some(v) = option.double_value {
        // NaN and infinities have no JSON number form
        return Some(
            Number::from_f64(v)
                .map(Value::Number)
                .unwrap_or_else(|| Value::String(v.to_string())),
        );
    }
    if let Some(ref bytes) = option.string_value {
        return Some(Value::String(String::from_utf8_lossy(bytes).into_owned()));
    }
    option.aggregate_value.clone().map(Value::String)
}
