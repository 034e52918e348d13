use fnol_harness::fixtures::model::{ClaimCreationData, ClaimantDetailsData, LoginData, PolicySearchData};
use fnol_harness::fixtures::reader::{FixtureError, FixtureReader};
use fnol_harness::pages::PolicySearch;

mod common;

fn shipped() -> FixtureReader {
    FixtureReader::new("test-assets/test-data")
}

// ============================================================================
// 1. Shipped fixtures deserialize into their models
// ============================================================================

#[test]
fn login_data_parses() {
    let data: LoginData = shipped().ui().read_as("loginData.json").unwrap();
    assert!(!data.valid_user.username.is_empty());
    assert!(data.invalid_user.expected_error.is_some());
    assert!(data.empty_user.username.is_empty());
    assert!(data.empty_user.password.is_empty());
}

#[test]
fn claim_creation_data_builds_insured_search() {
    let data: ClaimCreationData = shipped().ui().read_as("claimCreationData.json").unwrap();
    match data.valid_policy_search.to_search() {
        PolicySearch::ByInsured {
            policy_number,
            loss_type,
            ..
        } => {
            assert_eq!(policy_number, "CHO075170006");
            assert_eq!(loss_type, "Auto");
        }
        other => panic!("expected ByInsured, got {:?}", other),
    }
}

#[test]
fn claimant_fixtures_build_loss_detail_search() {
    let reader = shipped().ui();
    for name in ["claimClaimantDetailsData.json", "claimCreationClaimantDetailsData.json"] {
        let data: ClaimantDetailsData = reader.read_as(name).unwrap();
        let case = data.valid_claim_with_claimant_details;
        assert!(matches!(case.to_search(), PolicySearch::ByLossDetails { .. }));
        assert_eq!(case.to_claimant().claimant_name, case.claimant_name);
        assert!(case.to_claimant().basic_info.is_none());
    }

    let data: PolicySearchData = reader.read_as("claimCreationPolicySearchData.json").unwrap();
    let details = data.valid_claim_with_policy_search.to_claimant_with_basic_info();
    let basic = details.basic_info.unwrap();
    assert_eq!(basic.relation_to_insured.as_deref(), Some("Self"));
    assert_eq!(basic.preferred_contact.as_deref(), Some("Phone"));
}

#[test]
fn api_payloads_are_json_objects() {
    let api = shipped().api();
    let valid = api.read_map("loginPayload.json").unwrap();
    assert!(valid.contains_key("username"));
    assert!(valid.contains_key("password"));

    let incomplete = api.read_map("incompleteLoginPayload.json").unwrap();
    assert!(!incomplete.contains_key("password"));

    assert!(api.read_string("invalidLoginPayload.json").is_ok());
}

// ============================================================================
// 2. Dotted lookups
// ============================================================================

#[test]
fn value_at_walks_dotted_path() {
    let dir = tempfile::tempdir().unwrap();
    common::write_file(
        dir.path(),
        "ui/sample.json",
        r#"{"validUser": {"username": "su", "attempts": 3, "roles": ["adjuster"]}, "note": null}"#,
    );
    let reader = FixtureReader::new(dir.path()).ui();
    assert_eq!(reader.value_at("sample.json", "validUser.username").unwrap(), "su");
    assert_eq!(reader.value_at("sample.json", "validUser.attempts").unwrap(), "3");
    assert_eq!(reader.value_at("sample.json", "validUser.roles.0").unwrap(), "adjuster");
    assert_eq!(reader.value_at("sample.json", "note").unwrap(), "");
}

#[test]
fn missing_key_names_segment() {
    let dir = tempfile::tempdir().unwrap();
    common::write_file(dir.path(), "data.json", r#"{"validUser": {"username": "su"}}"#);
    let reader = FixtureReader::new(dir.path());
    match reader.node_at("data.json", "validUser.password") {
        Err(FixtureError::KeyNotFound { key, path, .. }) => {
            assert_eq!(key, "password");
            assert_eq!(path, "validUser.password");
        }
        other => panic!("expected KeyNotFound, got {:?}", other),
    }
}

// ============================================================================
// 3. Failure modes
// ============================================================================

#[test]
fn missing_file_is_not_found() {
    let reader = FixtureReader::new("no/such/dir");
    let err = reader.read_json("nothing.json").unwrap_err();
    assert!(matches!(err, FixtureError::NotFound { .. }));
    assert!(err.to_string().contains("nothing.json"));
}

#[test]
fn unreadable_fixture_is_io_error_not_missing() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("claims.json")).unwrap();
    std::fs::write(dir.path().join("latin1.json"), [0x7b, 0x22, 0xe9, 0x22, 0x7d]).unwrap();
    let reader = FixtureReader::new(dir.path());

    let err = reader.read_json("claims.json").unwrap_err();
    assert!(matches!(err, FixtureError::Io { .. }), "{:?}", err);
    assert!(err.to_string().starts_with("failed to read fixture"));

    let err = reader.read_string("latin1.json").unwrap_err();
    assert!(matches!(err, FixtureError::Io { .. }), "{:?}", err);
}

#[test]
fn invalid_json_and_wrong_shape_are_distinct() {
    let dir = tempfile::tempdir().unwrap();
    common::write_file(dir.path(), "broken.json", "{ not json");
    common::write_file(dir.path(), "list.json", "[1, 2, 3]");
    let reader = FixtureReader::new(dir.path());

    assert!(matches!(reader.read_json("broken.json"), Err(FixtureError::Parse { .. })));
    assert!(matches!(
        reader.read_as::<LoginData>("list.json"),
        Err(FixtureError::Shape { .. })
    ));
    assert!(matches!(reader.read_map("list.json"), Err(FixtureError::NotAnObject { .. })));
}
