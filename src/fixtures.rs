//! Descriptor fixtures shared by the unit tests.
//!
//! `booking()` mirrors this proto3 file:
//!
//! ```proto
//! // Booking related messages.
//! syntax = "proto3";
//! package com.example;
//!
//! // Represents a booking.
//! message Booking {
//!   int32 vehicle_id = 1;                 // ID of booked vehicle.
//!   BookingStatus status = 2;
//!   // @required
//!   // Whether payment was received.
//!   bool payment_received = 3;
//!   oneof preference { string color = 4; }
//!   map<string, string> labels = 5;
//!   optional string note = 6;
//!   repeated string tags = 7 [deprecated = true];
//!
//!   message LabelsEntry { ... }           // synthesized map entry
//!   message Tracking {
//!     message Point { double lat = 1; }
//!     enum Kind { KIND_UNSPECIFIED = 0; }
//!   }
//! }
//!
//! // @exclude
//! // Internal status.
//! message BookingStatus { int32 id = 1; }
//!
//! message Account { string email = 1; }
//!
//! enum StatusCode { OK = 0; FAILED = 1 [deprecated = true]; }
//!
//! service TrackingService {
//!   rpc Track (Booking) returns (Booking.Tracking);
//! }
//!
//! // Service for handling vehicle bookings.
//! // @title Booking API
//! service BookingService {
//!   // Used to book a vehicle.
//!   // @action create
//!   // @version v2
//!   rpc BookVehicle (Booking) returns (BookingStatus);
//!   rpc WatchBookings (Account) returns (stream Booking) {
//!     option idempotency_level = NO_SIDE_EFFECTS;
//!   }
//! }
//! ```

use prost_types::descriptor_proto::ExtensionRange;
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::method_options::IdempotencyLevel;
use prost_types::source_code_info::Location;
use prost_types::uninterpreted_option::NamePart;
use prost_types::{
    DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, EnumValueOptions,
    FieldDescriptorProto, FieldOptions, FileDescriptorProto, FileDescriptorSet, MessageOptions,
    MethodDescriptorProto, MethodOptions, OneofDescriptorProto, ServiceDescriptorProto,
    SourceCodeInfo, UninterpretedOption,
};

pub(crate) fn field(name: &str, number: i32, label: Label, ty: Type) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_string()),
        number: Some(number),
        label: Some(label as i32),
        r#type: Some(ty as i32),
        ..Default::default()
    }
}

pub(crate) fn typed_field(
    name: &str,
    number: i32,
    label: Label,
    ty: Type,
    type_name: &str,
) -> FieldDescriptorProto {
    FieldDescriptorProto {
        type_name: Some(type_name.to_string()),
        ..field(name, number, label, ty)
    }
}

pub(crate) fn message(name: &str, fields: Vec<FieldDescriptorProto>) -> DescriptorProto {
    DescriptorProto {
        name: Some(name.to_string()),
        field: fields,
        ..Default::default()
    }
}

pub(crate) fn enum_value(name: &str, number: i32) -> EnumValueDescriptorProto {
    EnumValueDescriptorProto {
        name: Some(name.to_string()),
        number: Some(number),
        ..Default::default()
    }
}

pub(crate) fn location(path: &[i32], leading: &str) -> Location {
    Location {
        path: path.to_vec(),
        leading_comments: Some(leading.to_string()),
        ..Default::default()
    }
}

pub(crate) fn custom_option(name: &str, value: &str) -> UninterpretedOption {
    UninterpretedOption {
        name: vec![NamePart {
            name_part: name.to_string(),
            is_extension: true,
        }],
        string_value: Some(value.as_bytes().to_vec()),
        ..Default::default()
    }
}

fn deprecated_field_options() -> Option<FieldOptions> {
    Some(FieldOptions {
        deprecated: Some(true),
        ..Default::default()
    })
}

pub(crate) fn booking() -> FileDescriptorProto {
    let mut labels_entry = message(
        "LabelsEntry",
        vec![
            field("key", 1, Label::Optional, Type::String),
            field("value", 2, Label::Optional, Type::String),
        ],
    );
    labels_entry.options = Some(MessageOptions {
        map_entry: Some(true),
        ..Default::default()
    });

    let mut tracking = message("Tracking", Vec::new());
    tracking.nested_type = vec![message(
        "Point",
        vec![field("lat", 1, Label::Optional, Type::Double)],
    )];
    tracking.enum_type = vec![EnumDescriptorProto {
        name: Some("Kind".to_string()),
        value: vec![enum_value("KIND_UNSPECIFIED", 0)],
        ..Default::default()
    }];

    let mut color = field("color", 4, Label::Optional, Type::String);
    color.oneof_index = Some(0);

    let mut note = field("note", 6, Label::Optional, Type::String);
    note.proto3_optional = Some(true);

    let mut tags = field("tags", 7, Label::Repeated, Type::String);
    tags.options = deprecated_field_options();

    let mut booking = message(
        "Booking",
        vec![
            field("vehicle_id", 1, Label::Optional, Type::Int32),
            typed_field(
                "status",
                2,
                Label::Optional,
                Type::Message,
                ".com.example.BookingStatus",
            ),
            field("payment_received", 3, Label::Optional, Type::Bool),
            color,
            typed_field(
                "labels",
                5,
                Label::Repeated,
                Type::Message,
                ".com.example.Booking.LabelsEntry",
            ),
            note,
            tags,
        ],
    );
    booking.nested_type = vec![labels_entry, tracking];
    booking.oneof_decl = vec![OneofDescriptorProto {
        name: Some("preference".to_string()),
        ..Default::default()
    }];
    booking.options = Some(MessageOptions {
        uninterpreted_option: vec![custom_option("acme.owner", "bookings-team")],
        ..Default::default()
    });

    let status_code = EnumDescriptorProto {
        name: Some("StatusCode".to_string()),
        value: vec![
            enum_value("OK", 0),
            EnumValueDescriptorProto {
                options: Some(EnumValueOptions {
                    deprecated: Some(true),
                    ..Default::default()
                }),
                ..enum_value("FAILED", 1)
            },
        ],
        ..Default::default()
    };

    let tracking_service = ServiceDescriptorProto {
        name: Some("TrackingService".to_string()),
        method: vec![MethodDescriptorProto {
            name: Some("Track".to_string()),
            input_type: Some(".com.example.Booking".to_string()),
            output_type: Some(".com.example.Booking.Tracking".to_string()),
            ..Default::default()
        }],
        ..Default::default()
    };

    let service = ServiceDescriptorProto {
        name: Some("BookingService".to_string()),
        method: vec![
            MethodDescriptorProto {
                name: Some("BookVehicle".to_string()),
                input_type: Some(".com.example.Booking".to_string()),
                output_type: Some(".com.example.BookingStatus".to_string()),
                ..Default::default()
            },
            MethodDescriptorProto {
                name: Some("WatchBookings".to_string()),
                input_type: Some(".com.example.Account".to_string()),
                output_type: Some(".com.example.Booking".to_string()),
                server_streaming: Some(true),
                options: Some(MethodOptions {
                    idempotency_level: Some(IdempotencyLevel::NoSideEffects as i32),
                    ..Default::default()
                }),
                ..Default::default()
            },
        ],
        ..Default::default()
    };

    FileDescriptorProto {
        name: Some("Booking.proto".to_string()),
        package: Some("com.example".to_string()),
        syntax: Some("proto3".to_string()),
        message_type: vec![
            booking,
            message("BookingStatus", vec![field("id", 1, Label::Optional, Type::Int32)]),
            message("Account", vec![field("email", 1, Label::Optional, Type::String)]),
        ],
        enum_type: vec![status_code],
        service: vec![tracking_service, service],
        source_code_info: Some(SourceCodeInfo {
            location: vec![
                location(&[12], " Booking related messages.\n"),
                location(&[4, 0], " Represents a booking.\n"),
                location(&[4, 0, 2, 0], " ID of booked vehicle.\n"),
                location(&[4, 0, 2, 2], " @required\n Whether payment was received.\n"),
                location(&[4, 1], " @exclude\n Internal status.\n"),
                location(&[5, 0, 2, 1], " Something went wrong.\n"),
                location(
                    &[6, 1],
                    " Service for handling vehicle bookings.\n @title Booking API\n",
                ),
                location(
                    &[6, 1, 2, 0],
                    " Used to book a vehicle.\n @action create\n @version v2\n",
                ),
            ],
        }),
        ..Default::default()
    }
}

/// A proto2 file with defaults, required fields and both kinds of extensions.
///
/// ```proto
/// syntax = "proto2";
/// package com.example.fleet;
///
/// message Vehicle {
///   required int32 id = 1;
///   optional string model = 2 [default = "Civic"];
///   repeated string tags = 3;
///   extensions 100 to 200;
/// }
///
/// extend Vehicle {
///   optional string warranty = 102;
///   // Mileage in kilometres.
///   optional int32 mileage = 100;
/// }
///
/// message Fleet {
///   extend Vehicle { optional Fleet fleet = 101; }
/// }
/// ```
pub(crate) fn vehicle() -> FileDescriptorProto {
    let mut model = field("model", 2, Label::Optional, Type::String);
    model.default_value = Some("Civic".to_string());

    let mut mileage = field("mileage", 100, Label::Optional, Type::Int32);
    mileage.extendee = Some(".com.example.fleet.Vehicle".to_string());

    let mut warranty = field("warranty", 102, Label::Optional, Type::String);
    warranty.extendee = Some(".com.example.fleet.Vehicle".to_string());

    let mut fleet_ext = typed_field(
        "fleet",
        101,
        Label::Optional,
        Type::Message,
        ".com.example.fleet.Fleet",
    );
    fleet_ext.extendee = Some(".com.example.fleet.Vehicle".to_string());

    let mut fleet = message("Fleet", Vec::new());
    fleet.extension = vec![fleet_ext];

    let mut vehicle = message(
        "Vehicle",
        vec![
            field("id", 1, Label::Required, Type::Int32),
            model,
            field("tags", 3, Label::Repeated, Type::String),
        ],
    );
    vehicle.extension_range = vec![ExtensionRange {
        start: Some(100),
        end: Some(201),
        options: None,
    }];

    FileDescriptorProto {
        name: Some("Vehicle.proto".to_string()),
        package: Some("com.example.fleet".to_string()),
        syntax: Some("proto2".to_string()),
        message_type: vec![vehicle, fleet],
        extension: vec![warranty, mileage],
        source_code_info: Some(SourceCodeInfo {
            location: vec![location(&[7, 1], " Mileage in kilometres.\n")],
        }),
        ..Default::default()
    }
}

pub(crate) fn descriptor_set() -> FileDescriptorSet {
    FileDescriptorSet {
        file: vec![booking(), vehicle()],
    }
}

/// A descriptor set whose custom options were resolved by protoc, encoded the
/// way `protoc --descriptor_set_out` writes it:
///
/// ```proto
/// // acme/options.proto
/// package acme;
/// import "google/protobuf/descriptor.proto";
/// enum Tier { TIER_UNSPECIFIED = 0; GOLD = 1; }
/// extend google.protobuf.MessageOptions { optional string owner = 50001; }
/// extend google.protobuf.FieldOptions { optional Tier tier = 50002; }
///
/// // acme/ledger.proto
/// syntax = "proto3";
/// package acme.ledger;
/// import "acme/options.proto";
/// message Entry {
///   option (acme.owner) = "ledger-team";
///   string id = 1 [(acme.tier) = GOLD];
/// }
/// ```
///
/// The resolved options only exist as extension fields inside the encoded
/// `*Options` messages. `Entry` also carries two uninterpreted options,
/// `(acme.owner) = "stale"` and `(acme.audit) = "weekly"`.
pub(crate) fn custom_option_set_bytes() -> Vec<u8> {
    use prost::encoding::{encode_key, encode_varint, WireType};
    use prost::Message as _;

    fn length_delimited(tag: u32, payload: &[u8], buf: &mut Vec<u8>) {
        encode_key(tag, WireType::LengthDelimited, buf);
        encode_varint(payload.len() as u64, buf);
        buf.extend_from_slice(payload);
    }

    let mut tier_option = Vec::new();
    encode_key(50002, WireType::Varint, &mut tier_option);
    encode_varint(1, &mut tier_option);

    let mut id = field("id", 1, Label::Optional, Type::String).encode_to_vec();
    length_delimited(8, &tier_option, &mut id);

    let mut entry_options = MessageOptions {
        uninterpreted_option: vec![
            custom_option("acme.owner", "stale"),
            custom_option("acme.audit", "weekly"),
        ],
        ..Default::default()
    }
    .encode_to_vec();
    length_delimited(50001, b"ledger-team", &mut entry_options);

    let mut entry = message("Entry", Vec::new()).encode_to_vec();
    length_delimited(2, &id, &mut entry);
    length_delimited(7, &entry_options, &mut entry);

    let mut ledger = FileDescriptorProto {
        name: Some("acme/ledger.proto".to_string()),
        package: Some("acme.ledger".to_string()),
        dependency: vec!["acme/options.proto".to_string()],
        syntax: Some("proto3".to_string()),
        ..Default::default()
    }
    .encode_to_vec();
    length_delimited(4, &entry, &mut ledger);

    let mut set = FileDescriptorSet {
        file: vec![descriptor_proto(), acme_options()],
    }
    .encode_to_vec();
    length_delimited(1, &ledger, &mut set);
    set
}

// The parts of google/protobuf/descriptor.proto the custom options extend.
fn descriptor_proto() -> FileDescriptorProto {
    let extendable = |name: &str| DescriptorProto {
        extension_range: vec![ExtensionRange {
            start: Some(1000),
            end: Some(536_870_912),
            options: None,
        }],
        ..message(name, Vec::new())
    };

    FileDescriptorProto {
        name: Some("google/protobuf/descriptor.proto".to_string()),
        package: Some("google.protobuf".to_string()),
        message_type: vec![extendable("MessageOptions"), extendable("FieldOptions")],
        ..Default::default()
    }
}

fn acme_options() -> FileDescriptorProto {
    let mut owner = field("owner", 50001, Label::Optional, Type::String);
    owner.extendee = Some(".google.protobuf.MessageOptions".to_string());

    let mut tier = typed_field("tier", 50002, Label::Optional, Type::Enum, ".acme.Tier");
    tier.extendee = Some(".google.protobuf.FieldOptions".to_string());

    FileDescriptorProto {
        name: Some("acme/options.proto".to_string()),
        package: Some("acme".to_string()),
        dependency: vec!["google/protobuf/descriptor.proto".to_string()],
        enum_type: vec![EnumDescriptorProto {
            name: Some("Tier".to_string()),
            value: vec![enum_value("TIER_UNSPECIFIED", 0), enum_value("GOLD", 1)],
            ..Default::default()
        }],
        extension: vec![owner, tier],
        ..Default::default()
    }
}
