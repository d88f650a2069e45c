//! Property-based tests using QuickCheck

use ferrum_models::common::{
    validate_required_primitive_elements, FieldErrorKind, FieldValue, RawRecord, RequiredPair,
};
use quickcheck::{quickcheck, Arbitrary, Gen, TestResult};
use serde_json::{json, Value};

const STATUS: &[RequiredPair] = &[RequiredPair::new("status", "_status")];

/// A non-null JSON scalar usable as a primitive value.
#[derive(Debug, Clone)]
struct Primitive(Value);

impl Arbitrary for Primitive {
    fn arbitrary(g: &mut Gen) -> Self {
        let value = match u8::arbitrary(g) % 3 {
            0 => json!(String::arbitrary(g)),
            1 => json!(i64::arbitrary(g)),
            _ => json!(bool::arbitrary(g)),
        };
        Primitive(value)
    }
}

/// Any value a caller might put under the extension alias.
#[derive(Debug, Clone)]
enum ExtensionInput {
    Absent,
    Null,
    Scalar(Value),
    Map(Vec<String>),
    Bytes(Vec<u8>),
}

impl Arbitrary for ExtensionInput {
    fn arbitrary(g: &mut Gen) -> Self {
        match u8::arbitrary(g) % 5 {
            0 => Self::Absent,
            1 => Self::Null,
            2 => Self::Scalar(Primitive::arbitrary(g).0),
            3 => Self::Map(Vec::<String>::arbitrary(g)),
            _ => Self::Bytes(Vec::<u8>::arbitrary(g)),
        }
    }
}

impl ExtensionInput {
    fn apply(&self, record: &mut RawRecord) {
        match self {
            Self::Absent => {}
            Self::Null => record.insert("_status", Value::Null),
            Self::Scalar(value) => record.insert("_status", value.clone()),
            Self::Map(urls) => {
                let extension: Vec<_> = urls.iter().map(|u| json!({ "url": u })).collect();
                record.insert("_status", json!({ "extension": extension }));
            }
            Self::Bytes(bytes) => record.insert("_status", FieldValue::Bytes(bytes.clone())),
        }
    }
}

quickcheck! {
    fn present_primary_passes_regardless_of_extension(value: Primitive, ext: ExtensionInput) -> bool {
        let mut record = RawRecord::new().with("status", value.0);
        ext.apply(&mut record);

        match validate_required_primitive_elements("DetectedIssue", record.clone(), STATUS) {
            Ok(out) => out == record,
            Err(_) => false,
        }
    }

    fn generic_map_passes_iff_extension_list_non_empty(urls: Vec<String>, null_primary: bool) -> bool {
        let mut record = RawRecord::new();
        if null_primary {
            record.insert("status", Value::Null);
        }
        let extension: Vec<_> = urls.iter().map(|u| json!({ "url": u })).collect();
        record.insert("_status", json!({ "extension": extension }));

        let result = validate_required_primitive_elements("DetectedIssue", record, STATUS);
        result.is_ok() == !urls.is_empty()
    }

    fn unexplained_primary_reports_kind_by_presence(null_primary: bool) -> bool {
        let mut record = RawRecord::new();
        if null_primary {
            record.insert("status", Value::Null);
        }

        let err = match validate_required_primitive_elements("DetectedIssue", record, STATUS) {
            Ok(_) => return false,
            Err(err) => err,
        };
        err.errors.len() == 1
            && err.errors[0].alias == "status"
            && match err.errors[0].kind {
                FieldErrorKind::MissingValue => !null_primary,
                FieldErrorKind::NullNotAllowed => null_primary,
                FieldErrorKind::ExtensionCoercionFailed(_) => false,
            }
    }

    fn coercion_failure_is_never_doubled(ext: ExtensionInput) -> TestResult {
        let mut record = RawRecord::new();
        ext.apply(&mut record);

        let err = match validate_required_primitive_elements("DetectedIssue", record, STATUS) {
            Ok(_) => return TestResult::discard(),
            Err(err) => err,
        };
        let coercion = err
            .errors
            .iter()
            .any(|e| matches!(e.kind, FieldErrorKind::ExtensionCoercionFailed(_)));
        if !coercion {
            return TestResult::discard();
        }
        TestResult::from_bool(err.errors.len() == 1 && err.errors[0].alias == "_status")
    }
}

#[test]
fn every_missing_pair_is_reported() {
    let pairs: Vec<_> = ["a", "b", "c", "d"]
        .into_iter()
        .zip(["_a", "_b", "_c", "_d"])
        .map(|(p, e)| RequiredPair::new(p, e))
        .collect();

    let record = RawRecord::new().with("b", "present").with("c", Value::Null);
    let err = validate_required_primitive_elements("Test", record, &pairs).unwrap_err();

    let aliases: Vec<_> = err.aliases().collect();
    assert_eq!(aliases, vec!["a", "c", "d"]);
}
