//! Well-known simple type families.
//!
//! Type names arrive either qualified (`java.lang.Long`) or simple (`Long`);
//! every predicate here matches on the simple name so both forms classify
//! the same way.

use serde::{Deserialize, Serialize};

const PRIMITIVES: &[&str] = &[
    "int", "long", "short", "byte", "double", "float", "boolean", "char",
];

const WRAPPERS: &[&str] = &[
    "Integer",
    "Long",
    "Short",
    "Byte",
    "Double",
    "Float",
    "Boolean",
    "Character",
    "BigDecimal",
    "BigInteger",
];

const TEXT: &[&str] = &["String", "CharSequence"];

const TEMPORAL: &[&str] = &[
    "LocalDate",
    "LocalDateTime",
    "LocalTime",
    "Instant",
    "ZonedDateTime",
    "OffsetDateTime",
    "OffsetTime",
    "Date",
    "Calendar",
    "Timestamp",
];

const LARGE_OBJECTS: &[&str] = &["byte[]", "Byte[]", "char[]", "Character[]", "Blob", "Clob", "NClob"];

const INTEGRAL: &[&str] = &[
    "int",
    "long",
    "short",
    "byte",
    "Integer",
    "Long",
    "Short",
    "Byte",
    "BigInteger",
];

const UUID: &str = "UUID";

/// Types that need an explicit attribute converter to be stored.
const CONVERTER_CANDIDATES: &[&str] = &["Optional", "Duration", "Period", UUID];

const PAGINATION_MARKERS: &[&str] = &["Pageable", "PageRequest"];
const SORT_MARKERS: &[&str] = &["Sort"];

/// Strip package qualification and generic arguments: `java.util.List<X>` → `List`.
pub fn simple_name(type_name: &str) -> &str {
    let base = type_name.split('<').next().unwrap_or(type_name).trim();
    base.rsplit('.').next().unwrap_or(base)
}

fn is_one_of(type_name: &str, set: &[&str]) -> bool {
    set.contains(&simple_name(type_name))
}

pub fn is_primitive(type_name: &str) -> bool {
    is_one_of(type_name, PRIMITIVES)
}

pub fn is_wrapper(type_name: &str) -> bool {
    is_one_of(type_name, WRAPPERS)
}

pub fn is_text(type_name: &str) -> bool {
    is_one_of(type_name, TEXT)
}

pub fn is_temporal(type_name: &str) -> bool {
    is_one_of(type_name, TEMPORAL)
}

pub fn is_uuid(type_name: &str) -> bool {
    simple_name(type_name) == UUID
}

pub fn is_large_object(type_name: &str) -> bool {
    is_one_of(type_name, LARGE_OBJECTS)
}

/// Integer-like primitives and wrappers, the family database-generated keys need.
pub fn is_integral(type_name: &str) -> bool {
    is_one_of(type_name, INTEGRAL)
}

pub fn is_converter_candidate(type_name: &str) -> bool {
    is_one_of(type_name, CONVERTER_CANDIDATES)
}

pub fn is_pagination_marker(type_name: &str) -> bool {
    is_one_of(type_name, PAGINATION_MARKERS)
}

pub fn is_sort_marker(type_name: &str) -> bool {
    is_one_of(type_name, SORT_MARKERS)
}

/// Primitive, wrapper, text or date/time: storable as a plain column or element collection.
pub fn is_simple(type_name: &str) -> bool {
    is_primitive(type_name) || is_wrapper(type_name) || is_text(type_name) || is_temporal(type_name)
}

/// Names that are never value-object identifiers, even when they end in `Id`.
pub fn is_well_known(type_name: &str) -> bool {
    is_simple(type_name) || is_uuid(type_name) || simple_name(type_name) == "Object"
}

/// Coarse family of a simple type, used for reporting and heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeFamily {
    Integral,
    Decimal,
    Boolean,
    Character,
    Text,
    Temporal,
    Uuid,
    LargeObject,
    Other,
}

impl TypeFamily {
    pub fn of(type_name: &str) -> Self {
        match simple_name(type_name) {
            _ if is_integral(type_name) => Self::Integral,
            "double" | "float" | "Double" | "Float" | "BigDecimal" => Self::Decimal,
            "boolean" | "Boolean" => Self::Boolean,
            "char" | "Character" => Self::Character,
            _ if is_text(type_name) => Self::Text,
            _ if is_temporal(type_name) => Self::Temporal,
            _ if is_uuid(type_name) => Self::Uuid,
            _ if is_large_object(type_name) => Self::LargeObject,
            _ => Self::Other,
        }
    }
}
