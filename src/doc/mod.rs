//! Documentation model
//!
//! Turns descriptor views into the records a documentation template renders:
//! one `File` per proto file with flat, sorted collections of enums, extensions,
//! messages and services, plus the scalar type reference table.

pub mod comment;
pub mod config;
pub mod directive;
pub mod model;
pub mod options;
pub mod parser;
pub mod scalars;
pub mod types;


use log::{debug, info};

use crate::descriptor::FileDescriptor;

pub use config::{Config, ConfigError};
pub use directive::Directives;
pub use model::{
    Enum, EnumValue, File, FileExtension, HasOptions, Message, MessageExtension, MessageField,
    Service, ServiceMethod, Template,
};
pub use options::{ExtensionRegistry, OptionMap, OptionTransform};
pub use parser::EntityParser;
pub use scalars::{load_scalars, ScalarValue};

impl Template {
    /// Build the documentation model for `files`.
    ///
    /// `scalars` is attached as-is; custom options of every entity go through
    /// `transform`.
    pub fn new(
        files: &[FileDescriptor],
        scalars: Option<Vec<ScalarValue>>,
        transform: &dyn OptionTransform,
    ) -> Self {
        let parser = EntityParser::new(transform);
        let files = files.iter().map(|f| assemble_file(f, &parser)).collect();

        Template { files, scalars }
    }
}

fn assemble_file(f: &FileDescriptor, parser: &EntityParser<'_>) -> File {
    debug!("Assembling documentation for {}", f.name);

    let mut file = File {
        name: f.name.clone(),
        description: comment::description(&f.syntax_comments.to_string()),
        package: f.package.clone(),
        has_enums: !f.enums.is_empty(),
        has_extensions: !f.extensions.is_empty(),
        has_messages: !f.messages.is_empty(),
        has_services: !f.services.is_empty(),
        enums: Vec::with_capacity(f.enums.len()),
        extensions: Vec::with_capacity(f.extensions.len()),
        messages: Vec::with_capacity(f.messages.len()),
        services: Vec::with_capacity(f.services.len()),
        options: parser.parse_file_options(f),
    };

    for pe in &f.enums {
        file.enums.push(parser.parse_enum(pe));
    }
    for pe in &f.extensions {
        file.extensions.push(parser.parse_file_extension(pe));
    }
    for pm in &f.messages {
        parser.walk_message(pm, &mut file);
    }
    for ps in &f.services {
        file.services.push(parser.parse_service(ps));
    }

    // sort_by is stable, so equal long names keep their discovery order
    file.enums.sort_by(|a, b| a.long_name.cmp(&b.long_name));
    file.extensions.sort_by(|a, b| a.long_name.cmp(&b.long_name));
    file.messages.sort_by(|a, b| a.long_name.cmp(&b.long_name));
    file.services.sort_by(|a, b| a.long_name.cmp(&b.long_name));

    info!(
        "Documented {}: {} messages, {} enums, {} extensions, {} services",
        file.name,
        file.messages.len(),
        file.enums.len(),
        file.extensions.len(),
        file.services.len()
    );

    file
}
