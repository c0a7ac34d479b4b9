use std::collections::HashMap;
use std::fmt;

use prost_types::method_options::IdempotencyLevel;
use prost_types::{
    EnumOptions, EnumValueOptions, FieldOptions, FileOptions, MessageOptions, MethodOptions,
    ServiceOptions,
};
use serde_json::Value;

pub use crate::descriptor::OptionMap;

const DEPRECATED: &str = "deprecated";
const IDEMPOTENCY_LEVEL: &str = "idempotency_level";

/// The standard descriptor options that end up in the documentation
pub trait CommonOptions {
    fn is_deprecated(&self) -> bool;

    /// Only meaningful for method options
    fn idempotency(&self) -> Option<String> {
        None
    }
}

macro_rules! impl_common_options {
    ($($options:ty),* $(,)?) => {
        $(
            impl CommonOptions for $options {
                fn is_deprecated(&self) -> bool {
                    self.deprecated.unwrap_or(false)
                }
            }
        )*
    };
}

impl_common_options!(
    FileOptions,
    MessageOptions,
    FieldOptions,
    EnumOptions,
    EnumValueOptions,
    ServiceOptions,
);

impl CommonOptions for MethodOptions {
    fn is_deprecated(&self) -> bool {
        self.deprecated.unwrap_or(false)
    }

    fn idempotency(&self) -> Option<String> {
        self.idempotency_level.map(|level| {
            match IdempotencyLevel::from_i32(level) {
                Some(IdempotencyLevel::IdempotencyUnknown) => "IDEMPOTENCY_UNKNOWN".to_string(),
                Some(IdempotencyLevel::NoSideEffects) => "NO_SIDE_EFFECTS".to_string(),
                Some(IdempotencyLevel::Idempotent) => "IDEMPOTENT".to_string(),
                None => level.to_string(),
            }
        })
    }
}

/// Options declared with the standard descriptor fields.
///
/// Recognizes `deprecated = true` and, for methods, `idempotency_level`.
pub fn extract_options<O: CommonOptions>(options: Option<&O>) -> OptionMap {
    let mut out = OptionMap::new();
    if let Some(options) = options {
        if options.is_deprecated() {
            out.insert(DEPRECATED.to_string(), Value::Bool(true));
        }
        if let Some(level) = options.idempotency() {
            out.insert(IDEMPOTENCY_LEVEL.to_string(), Value::String(level));
        }
    }
    out
}

/// Merge option sources in priority order; the first source to set a key wins.
///
/// Returns `None` rather than an empty map when no source sets anything.
pub fn merge_options<I>(sources: I) -> Option<OptionMap>
where
    I: IntoIterator<Item = OptionMap>,
{
    let mut out = OptionMap::new();
    for source in sources {
        for (key, value) in source {
            out.entry(key).or_insert(value);
        }
    }
    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}

/// Converts the raw custom option values of an entity into documented options
pub trait OptionTransform {
    fn transform(&self, raw: &OptionMap) -> OptionMap;
}

impl<F> OptionTransform for F
where
    F: Fn(&OptionMap) -> OptionMap,
{
    fn transform(&self, raw: &OptionMap) -> OptionMap {
        self(raw)
    }
}

type Transformer = Box<dyn Fn(&Value) -> Value + Send + Sync>;

/// Named transformers for custom options.
///
/// Custom options without a registered transformer are left out of the
/// documentation.
#[derive(Default)]
pub struct ExtensionRegistry {
    transformers: HashMap<String, Transformer>,
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        ExtensionRegistry::default()
    }

    /// A registry that copies the named options through unchanged
    pub fn passthrough<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut registry = ExtensionRegistry::new();
        for name in names {
            registry.register(name, Value::clone);
        }
        registry
    }

    pub fn register<S, F>(&mut self, name: S, transformer: F)
    where
        S: Into<String>,
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.transformers.insert(name.into(), Box::new(transformer));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.transformers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.transformers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transformers.is_empty()
    }
}

impl OptionTransform for ExtensionRegistry {
    fn transform(&self, raw: &OptionMap) -> OptionMap {
        raw.iter()
            .filter_map(|(name, payload)| {
                self.transformers
                    .get(name)
                    .map(|transform| (name.clone(), transform(payload)))
            })
            .collect()
    }
}

impl fmt::Debug for ExtensionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.transformers.keys().collect();
        names.sort();
        f.debug_struct("ExtensionRegistry")
            .field("transformers", &names)
            .finish()
    }
}

/// Declared options first, then transformed custom options
pub(crate) fn entity_options<O: CommonOptions>(
    declared: Option<&O>,
    extensions: &OptionMap,
    transform: &dyn OptionTransform,
) -> Option<OptionMap> {
    merge_options([extract_options(declared), transform.transform(extensions)])
}
