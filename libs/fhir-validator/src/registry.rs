//! Record types known to a validator, keyed by `resourceType`

use crate::FhirVersion;
use ferrum_models::{r5, stu3, FhirRecord, FieldDeclaration, RawRecord};
use std::collections::HashMap;

/// Type-erased view of one [`FhirRecord`] implementation.
#[derive(Debug, Clone, Copy)]
pub struct RecordDescriptor {
    pub record_type: &'static str,
    pub is_resource: bool,
    pub fields: &'static [FieldDeclaration],
    pub elements: &'static [&'static str],
    construct: fn(RawRecord) -> ferrum_models::Result<()>,
}

fn construct_record<R: FhirRecord>(raw: RawRecord) -> ferrum_models::Result<()> {
    R::from_raw(raw).map(|_| ())
}

impl RecordDescriptor {
    pub fn of<R: FhirRecord>() -> Self {
        Self {
            record_type: R::RESOURCE_TYPE,
            is_resource: R::IS_RESOURCE,
            fields: R::field_declarations(),
            elements: R::elements_sequence(),
            construct: construct_record::<R>,
        }
    }

    /// Run the record constructor, discarding the typed value.
    pub fn construct(&self, raw: RawRecord) -> ferrum_models::Result<()> {
        (self.construct)(raw)
    }
}

#[derive(Debug, Clone)]
pub struct RecordRegistry {
    version: FhirVersion,
    records: HashMap<&'static str, RecordDescriptor>,
}

impl RecordRegistry {
    /// An empty registry.
    pub fn new(version: FhirVersion) -> Self {
        Self {
            version,
            records: HashMap::new(),
        }
    }

    /// All models shipped for `version`.
    pub fn for_version(version: FhirVersion) -> Self {
        let mut registry = Self::new(version);
        match version {
            FhirVersion::R5 => {
                registry.register::<r5::Endpoint>();
                registry.register::<r5::EndpointPayload>();
            }
            FhirVersion::Stu3 => {
                registry.register::<stu3::DetectedIssue>();
                registry.register::<stu3::DetectedIssueMitigation>();
            }
        }
        registry
    }

    pub fn register<R: FhirRecord>(&mut self) {
        self.records
            .insert(R::RESOURCE_TYPE, RecordDescriptor::of::<R>());
    }

    pub fn version(&self) -> FhirVersion {
        self.version
    }

    pub fn get(&self, record_type: &str) -> Option<&RecordDescriptor> {
        self.records.get(record_type)
    }

    /// Resource (not backbone) type names, sorted.
    pub fn resource_types(&self) -> Vec<&'static str> {
        let mut types: Vec<_> = self
            .records
            .values()
            .filter(|d| d.is_resource)
            .map(|d| d.record_type)
            .collect();
        types.sort_unstable();
        types
    }
}
