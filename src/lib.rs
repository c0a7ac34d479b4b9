//! Protobuf Documentation Model
//!
//! This library turns compiled protobuf descriptors into a documentation model
//! that templates can render directly. Comments are cleaned of documentation
//! directives, type references are resolved to short, package-relative and
//! fully-qualified names, nested types are flattened into sorted per-file
//! collections, and standard and custom options are merged into one map per
//! entity.

use std::io;

use prost_types::FileDescriptorSet;

pub mod descriptor;
pub mod doc;

#[cfg(test)]
mod fixtures;

pub use descriptor::{decode_descriptor_set, load_files, load_files_from_bytes, FileDescriptor};
pub use doc::{
    Config, ConfigError, Enum, EnumValue, ExtensionRegistry, File, FileExtension, HasOptions,
    Message, MessageExtension, MessageField, OptionMap, OptionTransform, ScalarValue, Service,
    ServiceMethod, Template,
};

/// Errors that can occur while building or writing the documentation model
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to decode descriptor set: {0}")]
    Decode(#[from] prost::DecodeError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Build the documentation model for every file in `set`.
///
/// Custom options named in `config.passthrough_extensions` are copied into the
/// option maps, all other custom options are dropped. A scalar table that fails
/// to load is logged and leaves `Template::scalars` empty.
///
/// A decoded `FileDescriptorSet` only carries custom options that protoc left
/// uninterpreted; use [`generate_from_bytes`] to also see resolved ones.
pub fn generate(set: &FileDescriptorSet, config: &Config) -> Template {
    build(&load_files(set), config)
}

/// Decode a serialized `FileDescriptorSet` and build its documentation model.
///
/// Custom options are read from the extension fields protoc resolved them
/// into, falling back to `uninterpreted_option`.
pub fn generate_from_bytes(bytes: &[u8], config: &Config) -> Result<Template> {
    let files = load_files_from_bytes(bytes)?;
    Ok(build(&files, config))
}

fn build(files: &[FileDescriptor], config: &Config) -> Template {
    let registry = config.extension_registry();
    let scalars = doc::load_scalars(config.scalars.as_deref());

    Template::new(files, scalars, &registry)
}
