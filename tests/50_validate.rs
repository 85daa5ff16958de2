use pdv_admin::{is_valid_uuid, sanitize_uuid, sanitize_uuid_opt};
use serde_json::{json, Value};

#[test]
fn documented_scenarios() {
    let cases: Vec<(Value, Option<&str>)> = vec![
        (json!("a1b2c3d4-e5f6-7890-abcd-ef1234567890"), Some("a1b2c3d4-e5f6-7890-abcd-ef1234567890")),
        (json!("A1B2C3D4-E5F6-7890-ABCD-EF1234567890"), Some("A1B2C3D4-E5F6-7890-ABCD-EF1234567890")),
        (json!(""), None),
        (json!("not-a-uuid"), None),
        (json!(12345), None),
        (Value::Null, None),
        (json!("a1b2c3d4-e5f6-7890-abcd-ef123456789"), None),
    ];

    for (input, expected) in cases {
        assert_eq!(is_valid_uuid(&input), expected.is_some(), "format check of {}", input);
        assert_eq!(sanitize_uuid(&input).as_deref(), expected, "sanitize of {}", input);
    }
}

#[test]
fn missing_field_sanitizes_to_none() {
    assert_eq!(sanitize_uuid_opt(None), None);
    assert_eq!(
        sanitize_uuid_opt(Some(&json!("0f8fad5b-d9cb-469f-a165-70867728950e"))).as_deref(),
        Some("0f8fad5b-d9cb-469f-a165-70867728950e")
    );
}

#[test]
fn sanitize_is_stable_on_its_own_output() {
    let first = sanitize_uuid(&json!("7C9E6679-7425-40DE-944B-E07FC1F90AE7"));
    let second = first.as_ref().and_then(|id| sanitize_uuid(&json!(id)));
    assert_eq!(first, second);
}
