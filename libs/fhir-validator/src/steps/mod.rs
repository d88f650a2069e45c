pub mod codes;
pub mod references;
pub mod required;

use crate::{RecordDescriptor, RecordRegistry};
use ferrum_models::{FieldDeclaration, FieldKind};
use serde_json::Value;

/// Visit every non-null declared value under `value`, list items one by one.
///
/// Backbone elements are entered when their type is registered; `visit`
/// receives the declaration, the item and its FHIRPath-style location.
pub(crate) fn walk_fields<F>(
    value: &Value,
    descriptor: &RecordDescriptor,
    registry: &RecordRegistry,
    path: &str,
    visit: &mut F,
) where
    F: FnMut(&FieldDeclaration, &Value, &str),
{
    let Some(object) = value.as_object() else {
        return;
    };

    for decl in descriptor.fields {
        let Some(field_value) = object.get(decl.alias) else {
            continue;
        };

        match field_value {
            Value::Null => {}
            Value::Array(items) if decl.is_list => {
                for (index, item) in items.iter().enumerate() {
                    let location = format!("{path}.{}[{index}]", decl.alias);
                    visit_item(decl, item, registry, &location, visit);
                }
            }
            item => {
                let location = format!("{path}.{}", decl.alias);
                visit_item(decl, item, registry, &location, visit);
            }
        }
    }
}

fn visit_item<F>(
    decl: &FieldDeclaration,
    item: &Value,
    registry: &RecordRegistry,
    location: &str,
    visit: &mut F,
) where
    F: FnMut(&FieldDeclaration, &Value, &str),
{
    if item.is_null() {
        return;
    }

    visit(decl, item, location);

    if decl.kind == FieldKind::Backbone {
        if let Some(backbone) = registry.get(decl.type_code) {
            walk_fields(item, backbone, registry, location, visit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FhirVersion;
    use serde_json::json;

    #[test]
    fn test_walk_enters_backbone_lists() {
        let registry = RecordRegistry::for_version(FhirVersion::R5);
        let descriptor = registry.get("Endpoint").unwrap();
        let resource = json!({
            "resourceType": "Endpoint",
            "status": "active",
            "header": ["a", null, "b"],
            "payload": [{"mimeType": ["application/fhir+json"]}],
            "name": null
        });

        let mut seen = Vec::new();
        walk_fields(&resource, descriptor, &registry, "Endpoint", &mut |_, _, loc| {
            seen.push(loc.to_string())
        });

        assert_eq!(
            seen,
            vec![
                "Endpoint.header[0]",
                "Endpoint.header[2]",
                "Endpoint.payload[0]",
                "Endpoint.payload[0].mimeType[0]",
                "Endpoint.status",
            ]
        );
    }
}
