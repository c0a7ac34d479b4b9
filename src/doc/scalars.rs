use std::fs;
use std::path::Path;

use log::{debug, error};
use serde::{Deserialize, Serialize};

use crate::Error;

const BUILTIN_SCALARS: &str = include_str!("../../resources/scalars.json");

/// How a protobuf scalar type is represented in each supported language.
///
/// For example `int64` is `long` in C# and `Bignum` in Ruby.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScalarValue {
    pub proto_type: String,
    pub notes: String,
    pub cpp_type: String,
    #[serde(rename = "csType")]
    pub csharp: String,
    pub go_type: String,
    pub java_type: String,
    pub php_type: String,
    pub python_type: String,
    pub ruby_type: String,
}

/// Parse a scalar table from its JSON form
pub fn parse_scalars(json: &str) -> Result<Vec<ScalarValue>, Error> {
    Ok(serde_json::from_str(json)?)
}

/// The table compiled into the crate
pub fn builtin_scalars() -> Result<Vec<ScalarValue>, Error> {
    parse_scalars(BUILTIN_SCALARS)
}

pub fn scalars_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<ScalarValue>, Error> {
    let content = fs::read_to_string(path)?;
    parse_scalars(&content)
}

/// Load the scalar table from `path`, or the builtin table when no path is given.
///
/// A missing or malformed table is logged and yields `None`; documentation is
/// still produced without it.
pub fn load_scalars(path: Option<&Path>) -> Option<Vec<ScalarValue>> {
    let loaded = match path {
        Some(path) => {
            debug!("Loading scalar table from {}", path.display());
            scalars_from_path(path)
        }
        None => builtin_scalars(),
    };

    match loaded {
        Ok(scalars) => Some(scalars),
        Err(err) => {
            error!("Failed to load scalar value types: {}", err);
            None
        }
    }
}
