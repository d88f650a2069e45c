use ferrum_models::common::{Error, FhirRecord, FieldErrorKind};
use ferrum_models::r5::Endpoint;
use ferrum_models::stu3::DetectedIssue;
use serde_json::Value;
use std::{fs::File, path::PathBuf};

fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_fixture(relative: &str) -> Value {
    let path = fixtures_root().join(relative);
    assert!(path.exists(), "fixture missing at {:?}", path);

    let file = File::open(&path).expect("failed to open fixture");
    serde_json::from_reader(file).expect("failed to parse fixture")
}

#[test]
fn parse_r5_endpoint_example() {
    let endpoint = Endpoint::from_value(load_fixture("endpoint-example.json"))
        .expect("example should construct");

    assert_eq!(endpoint.id.as_deref(), Some("example"));
    assert!(endpoint.is_active());
    assert_eq!(endpoint.connection_type.len(), 1);
    assert_eq!(
        endpoint.address.as_deref(),
        Some("http://fhir3.healthintersections.com.au/open/CarePlan")
    );

    let payload = endpoint.payload.as_ref().expect("payload should be present");
    assert_eq!(payload.len(), 1);
    assert_eq!(
        payload[0].mime_type,
        Some(vec![Some("application/fhir+xml".to_string())])
    );
}

#[test]
fn parse_r5_endpoint_with_absent_address() {
    let endpoint = Endpoint::from_value(load_fixture("endpoint-address-absent.json"))
        .expect("data-absent-reason should satisfy address");

    assert!(endpoint.address.is_none());
    let ext = endpoint.address_ext.expect("_address should be kept");
    assert_eq!(ext.extensions()[0].value["valueCode"], "masked");
}

#[test]
fn reject_r5_endpoint_missing_required() {
    let err = Endpoint::from_value(load_fixture("endpoint-missing-required.json")).unwrap_err();

    let Error::RequiredElements(err) = err else {
        panic!("expected required element failure");
    };
    assert_eq!(err.record_type, "Endpoint");

    let reported: Vec<_> = err
        .errors
        .iter()
        .map(|e| (e.alias.as_str(), e.kind.code()))
        .collect();
    assert_eq!(
        reported,
        vec![
            ("address", "value_error.missing"),
            ("status", "type_error.none.not_allowed"),
        ]
    );
}

#[test]
fn parse_stu3_detected_issue_example() {
    let issue = DetectedIssue::from_value(load_fixture("detectedissue-example.json"))
        .expect("example should construct");

    assert_eq!(issue.status.as_deref(), Some("final"));
    assert_eq!(issue.severity.as_deref(), Some("high"));
    assert_eq!(issue.implicated.as_ref().map(Vec::len), Some(2));
    assert_eq!(
        issue.author.as_ref().and_then(|a| a.target_type()),
        Some("Device")
    );

    let mitigation = &issue.mitigation.as_ref().expect("mitigation")[0];
    assert_eq!(
        mitigation.author.as_ref().and_then(|a| a.reference.as_deref()),
        Some("Practitioner/example")
    );
}

#[test]
fn round_trip_keeps_wire_aliases() {
    let input = load_fixture("endpoint-address-absent.json");
    let endpoint = Endpoint::from_value(input.clone()).unwrap();
    let output = endpoint.to_value().unwrap();

    assert_eq!(output["_address"], input["_address"]);
    assert_eq!(output["connectionType"], input["connectionType"]);
    assert!(output.get("address").is_none());
}

#[test]
fn stripping_status_reports_missing_value() {
    let mut input = load_fixture("detectedissue-example.json");
    input.as_object_mut().unwrap().remove("status");

    match DetectedIssue::from_value(input) {
        Err(Error::RequiredElements(err)) => {
            assert_eq!(err.errors.len(), 1);
            assert!(matches!(err.errors[0].kind, FieldErrorKind::MissingValue));
        }
        other => panic!("expected required element failure, got {other:?}"),
    }
}
