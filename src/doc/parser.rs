use log::{debug, warn};

use crate::descriptor::{
    EnumDescriptor, FieldDescriptor, FileDescriptor, MessageDescriptor, MethodDescriptor,
    ServiceDescriptor,
};
use crate::doc::comment::description;
use crate::doc::directive::{strip_required, Directives};
use crate::doc::model::{
    Enum, EnumValue, File, FileExtension, Message, MessageExtension, MessageField, Service,
    ServiceMethod,
};
use crate::doc::options::{entity_options, OptionMap, OptionTransform};
use crate::doc::types::{is_map_entry, label_name, resolve_type, TypeNames};

/// Builds documentation records from descriptor views.
///
/// Custom option values are run through `transform` before being merged with
/// the standard options of each entity.
pub struct EntityParser<'a> {
    transform: &'a dyn OptionTransform,
}

impl<'a> EntityParser<'a> {
    pub fn new(transform: &'a dyn OptionTransform) -> Self {
        EntityParser { transform }
    }

    pub fn parse_file_options(&self, pf: &FileDescriptor) -> Option<OptionMap> {
        entity_options(pf.options.as_ref(), &pf.option_extensions, self.transform)
    }

    pub fn parse_enum(&self, pe: &EnumDescriptor) -> Enum {
        let directives = Directives::parse(&description(&pe.comments.to_string()));

        let values = pe
            .values
            .iter()
            .map(|value| EnumValue {
                name: value.name.clone(),
                number: value.number.to_string(),
                description: description(&value.comments.to_string()),
                options: entity_options(
                    value.options.as_ref(),
                    &value.option_extensions,
                    self.transform,
                ),
            })
            .collect();

        Enum {
            name: pe.name.clone(),
            long_name: pe.long_name.clone(),
            full_name: pe.full_name.clone(),
            description: directives.description,
            values,
            exclude: directives.exclude,
            options: entity_options(pe.options.as_ref(), &pe.option_extensions, self.transform),
        }
    }

    pub fn parse_file_extension(&self, pe: &FieldDescriptor) -> FileExtension {
        let types = resolve_type(pe);
        let containing = TypeNames::qualified(&pe.extendee, &pe.package);

        FileExtension {
            name: pe.name.clone(),
            long_name: pe.long_name.clone(),
            full_name: pe.full_name.clone(),
            description: description(&pe.comments.to_string()),
            label: label_name(pe.label, pe.proto3, pe.proto3_optional).to_string(),
            type_name: types.name,
            long_type: types.long_name,
            full_type: types.full_name,
            number: pe.number,
            default_value: pe.default_value.clone(),
            containing_type: containing.name,
            containing_long_type: containing.long_name,
            containing_full_type: containing.full_name,
            options: entity_options(pe.options.as_ref(), &pe.option_extensions, self.transform),
        }
    }

    pub fn parse_message_extension(&self, pe: &FieldDescriptor) -> MessageExtension {
        let scope = pe.scope.clone().unwrap_or_default();

        MessageExtension {
            extension: self.parse_file_extension(pe),
            scope_type: scope.name,
            scope_long_type: scope.long_name,
            scope_full_type: scope.full_name,
        }
    }

    pub fn parse_message(&self, pm: &MessageDescriptor) -> Message {
        let directives = Directives::parse(&description(&pm.comments.to_string()));

        Message {
            name: pm.name.clone(),
            long_name: pm.long_name.clone(),
            full_name: pm.full_name.clone(),
            description: directives.description,
            has_extensions: !pm.extensions.is_empty(),
            has_fields: !pm.fields.is_empty(),
            has_oneofs: !pm.oneof_decls.is_empty(),
            extensions: pm
                .extensions
                .iter()
                .map(|ext| self.parse_message_extension(ext))
                .collect(),
            fields: pm
                .fields
                .iter()
                .map(|field| self.parse_message_field(field, &pm.oneof_decls))
                .collect(),
            exclude: directives.exclude,
            options: entity_options(pm.options.as_ref(), &pm.option_extensions, self.transform),
        }
    }

    pub fn parse_message_field(
        &self,
        pf: &FieldDescriptor,
        oneof_decls: &[String],
    ) -> MessageField {
        let types = resolve_type(pf);
        let label = label_name(pf.label, pf.proto3, pf.proto3_optional);

        let mut desc = description(&pf.comments.to_string());
        let required = strip_required(&mut desc);

        // An out-of-range index leaves the field in an unnamed oneof.
        let oneof_decl = pf
            .oneof_index
            .and_then(|idx| usize::try_from(idx).ok())
            .and_then(|idx| oneof_decls.get(idx))
            .cloned()
            .unwrap_or_default();
        if pf.oneof_index.is_some() && oneof_decl.is_empty() {
            warn!("Field {} points past its message's oneofs", pf.long_name);
        }

        MessageField {
            name: pf.name.clone(),
            description: desc,
            label: label.to_string(),
            is_map: is_map_entry(label, &types),
            is_oneof: pf.oneof_index.is_some(),
            oneof_decl,
            type_name: types.name,
            long_type: types.long_name,
            full_type: types.full_name,
            default_value: if pf.proto3 {
                String::new()
            } else {
                pf.default_value.clone()
            },
            required,
            options: entity_options(pf.options.as_ref(), &pf.option_extensions, self.transform),
        }
    }

    pub fn parse_service(&self, ps: &ServiceDescriptor) -> Service {
        let directives = Directives::parse(&description(&ps.comments.to_string()));

        Service {
            name: ps.name.clone(),
            long_name: ps.long_name.clone(),
            full_name: ps.full_name.clone(),
            description: directives.description,
            methods: ps
                .methods
                .iter()
                .map(|method| self.parse_service_method(method))
                .collect(),
            title: directives.title,
            exclude: directives.exclude,
            options: entity_options(ps.options.as_ref(), &ps.option_extensions, self.transform),
        }
    }

    pub fn parse_service_method(&self, pm: &MethodDescriptor) -> ServiceMethod {
        let directives = Directives::parse(&description(&pm.comments.to_string()));
        let request = TypeNames::qualified(&pm.input_type, &pm.package);
        let response = TypeNames::qualified(&pm.output_type, &pm.package);

        ServiceMethod {
            name: pm.name.clone(),
            description: directives.description,
            request_type: request.name,
            request_long_type: request.long_name,
            request_full_type: request.full_name,
            request_streaming: pm.client_streaming,
            response_type: response.name,
            response_long_type: response.long_name,
            response_full_type: response.full_name,
            response_streaming: pm.server_streaming,
            title: directives.title,
            action: directives.action,
            version: directives.version,
            exclude: directives.exclude,
            options: entity_options(pm.options.as_ref(), &pm.option_extensions, self.transform),
        }
    }

    /// Add a message and everything nested in it to the file's flat collections.
    ///
    /// Depth first: the message itself, then its enums, then each nested message
    /// with its own subtree.
    pub fn walk_message(&self, pm: &MessageDescriptor, file: &mut File) {
        debug!("Parsing message {}", pm.full_name);
        file.messages.push(self.parse_message(pm));

        for pe in &pm.enums {
            file.enums.push(self.parse_enum(pe));
        }
        for nested in &pm.messages {
            self.walk_message(nested, file);
        }
    }
}
