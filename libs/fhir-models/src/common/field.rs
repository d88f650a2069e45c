//! Raw records and static field declarations
//!
//! A [`RawRecord`] is the uncoerced input of a record constructor: wire
//! aliases mapped to [`FieldValue`]s in insertion order. [`FieldDeclaration`]
//! tables describe, per record type, how those aliases are bound.

use super::error::{Error, Result};
use super::extension::FhirPrimitiveExtension;
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// A value supplied for one alias, before coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    /// Any JSON value: primitive, array, generic map or nested record
    Json(Value),
    /// An undecoded payload, e.g. a JSON document read from a file
    Bytes(Vec<u8>),
    /// A value already typed as a primitive extension
    PrimitiveExtension(FhirPrimitiveExtension),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null | Self::Json(Value::Null))
    }

    /// Generic untyped map, if this value is one.
    pub fn as_map(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Json(Value::Object(map)) => Some(map),
            _ => None,
        }
    }

    pub fn shape(&self) -> &'static str {
        match self {
            Self::Null | Self::Json(Value::Null) => "null",
            Self::Json(Value::Bool(_)) => "boolean",
            Self::Json(Value::Number(_)) => "number",
            Self::Json(Value::String(_)) => "string",
            Self::Json(Value::Array(_)) => "array",
            Self::Json(Value::Object(_)) => "object",
            Self::Bytes(_) => "bytes",
            Self::PrimitiveExtension(_) => FhirPrimitiveExtension::TYPE_NAME,
        }
    }

    /// JSON form handed to serde coercion.
    pub fn to_json(&self) -> Result<Value> {
        Ok(match self {
            Self::Null => Value::Null,
            Self::Json(value) => value.clone(),
            Self::Bytes(bytes) => serde_json::from_slice(bytes)?,
            Self::PrimitiveExtension(ext) => serde_json::to_value(ext)?,
        })
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            other => Self::Json(other),
        }
    }
}

impl From<FhirPrimitiveExtension> for FieldValue {
    fn from(value: FhirPrimitiveExtension) -> Self {
        Self::PrimitiveExtension(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Json(Value::String(value.to_string()))
    }
}

/// Result of reading an alias: absent and explicitly null stay distinct.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Presence<'a> {
    Absent,
    Null,
    Value(&'a FieldValue),
}

impl<'a> Presence<'a> {
    pub fn is_present_non_null(&self) -> bool {
        matches!(self, Self::Value(_))
    }
}

/// Ordered mapping from wire alias to raw value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    fields: IndexMap<String, FieldValue>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON object. Any other JSON shape is rejected.
    pub fn from_json(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self::from_map(map)),
            other => Err(Error::InvalidResource(format!(
                "expected a JSON object, found {}",
                FieldValue::from(other).shape()
            ))),
        }
    }

    pub fn from_map(map: Map<String, Value>) -> Self {
        Self {
            fields: map.into_iter().map(|(k, v)| (k, v.into())).collect(),
        }
    }

    pub fn insert(&mut self, alias: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(alias.into(), value.into());
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, alias: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(alias, value);
        self
    }

    pub fn get(&self, alias: &str) -> Presence<'_> {
        match self.fields.get(alias) {
            None => Presence::Absent,
            Some(value) if value.is_null() => Presence::Null,
            Some(value) => Presence::Value(value),
        }
    }

    /// Resource type carried under `resourceType`, if it is a string.
    pub fn resource_type(&self) -> Option<&str> {
        match self.fields.get("resourceType") {
            Some(FieldValue::Json(Value::String(s))) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Result<Value> {
        let mut map = Map::with_capacity(self.fields.len());
        for (alias, value) in &self.fields {
            map.insert(alias.clone(), value.to_json()?);
        }
        Ok(Value::Object(map))
    }
}

impl FromIterator<(String, FieldValue)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// How a declared field is typed in the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// FHIR primitive (code, string, url, ...) with a `_field` companion
    Primitive,
    /// Complex datatype (CodeableConcept, Reference, ...)
    Complex,
    /// Inline backbone element
    Backbone,
}

/// Static metadata for one field of a record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDeclaration {
    /// Logical (Rust) name
    pub name: &'static str,
    /// Wire alias
    pub alias: &'static str,
    pub title: &'static str,
    /// FHIR type code, e.g. `code` or `CodeableConcept`
    pub type_code: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub is_list: bool,
    /// Alias of the companion `_field` for primitives
    pub extension_alias: Option<&'static str>,
    /// Allowed codes, empty when unconstrained
    pub enum_values: &'static [&'static str],
    /// Codes outside `enum_values` may also occur (a `+` in the value set)
    pub codes_extensible: bool,
    /// Allowed reference target types, empty when not a reference
    pub reference_types: &'static [&'static str],
}

impl FieldDeclaration {
    /// A primitive field with its `_alias` companion.
    pub const fn primitive(
        name: &'static str,
        alias: &'static str,
        extension_alias: &'static str,
        type_code: &'static str,
        title: &'static str,
    ) -> Self {
        Self {
            name,
            alias,
            title,
            type_code,
            kind: FieldKind::Primitive,
            required: false,
            is_list: false,
            extension_alias: Some(extension_alias),
            enum_values: &[],
            codes_extensible: false,
            reference_types: &[],
        }
    }

    pub const fn complex(
        name: &'static str,
        alias: &'static str,
        type_code: &'static str,
        title: &'static str,
    ) -> Self {
        Self {
            name,
            alias,
            title,
            type_code,
            kind: FieldKind::Complex,
            required: false,
            is_list: false,
            extension_alias: None,
            enum_values: &[],
            codes_extensible: false,
            reference_types: &[],
        }
    }

    pub const fn backbone(
        name: &'static str,
        alias: &'static str,
        type_code: &'static str,
        title: &'static str,
    ) -> Self {
        let mut decl = Self::complex(name, alias, type_code, title);
        decl.kind = FieldKind::Backbone;
        decl
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn list(mut self) -> Self {
        self.is_list = true;
        self
    }

    pub const fn codes(mut self, values: &'static [&'static str]) -> Self {
        self.enum_values = values;
        self
    }

    /// Like [`codes`](Self::codes), for a value set that is not closed.
    pub const fn extensible_codes(mut self, values: &'static [&'static str]) -> Self {
        self.enum_values = values;
        self.codes_extensible = true;
        self
    }

    pub const fn references(mut self, types: &'static [&'static str]) -> Self {
        self.reference_types = types;
        self
    }

    /// The `(primary, extension)` pair checked before coercion, for
    /// required primitives only.
    pub fn required_pair(&self) -> Option<RequiredPair> {
        match (self.required, self.kind, self.extension_alias) {
            (true, FieldKind::Primitive, Some(extension)) => Some(RequiredPair {
                primary: self.alias,
                extension,
            }),
            _ => None,
        }
    }
}

/// A required primitive alias and the alias of its extension companion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredPair {
    pub primary: &'static str,
    pub extension: &'static str,
}

impl RequiredPair {
    pub const fn new(primary: &'static str, extension: &'static str) -> Self {
        Self { primary, extension }
    }
}
