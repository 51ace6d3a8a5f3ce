use std::sync::Arc;

use http::Method;
use tollgate::loader;
use tollgate::schema::SchemaMismatch;
use tollgate::validation::{
    InvalidSecurity, OperationAddress, RequestValidator, ValidationFailed,
};

fn validator() -> RequestValidator {
    let spec = loader::load_spec("tests/fixtures/api.yaml").unwrap();
    RequestValidator::new(Arc::new(spec))
}

fn get(uri: &str) -> http::request::Builder {
    http::Request::builder().method(Method::GET).uri(uri)
}

#[test]
fn test_or_groups_accept_basic_auth() {
    let addr = OperationAddress::new("/secure/either", Method::GET);
    let request = get("/secure/either")
        .header("Authorization", "Basic dXNlcjpwYXNz")
        .body(Vec::new())
        .unwrap();

    validator().validate(&addr, &request).unwrap();
}

#[test]
fn test_or_groups_accept_api_key_alone() {
    let addr = OperationAddress::new("/secure/either", Method::GET);
    let request = get("/secure/either")
        .header("Cookie", "api_key=secret")
        .body(Vec::new())
        .unwrap();

    validator().validate(&addr, &request).unwrap();
}

#[test]
fn test_no_group_matching_is_aggregated() {
    let addr = OperationAddress::new("/secure/either", Method::GET);
    let request = get("/secure/either").body(Vec::new()).unwrap();

    let err = validator().validate(&addr, &request).unwrap_err();
    assert!(matches!(
        err,
        ValidationFailed::Security(InvalidSecurity::NoSchemeMatched { .. })
    ));
    assert_eq!(
        err.to_string(),
        "No security scheme matched for Request [get /secure/either]"
    );
}

#[test]
fn test_and_group_requires_all_schemes() {
    let addr = OperationAddress::new("/secure/both", Method::GET);

    // Only one of the two credentials present: the single AND-group fails
    let request = get("/secure/both")
        .header("Authorization", "Basic dXNlcjpwYXNz")
        .body(Vec::new())
        .unwrap();
    assert!(validator().validate(&addr, &request).is_err());

    // Both present simultaneously: the group passes
    let request = get("/secure/both")
        .header("Authorization", "Basic dXNlcjpwYXNz")
        .header("Cookie", "api_key=secret")
        .body(Vec::new())
        .unwrap();
    validator().validate(&addr, &request).unwrap();
}

#[test]
fn test_auth_prefix_is_case_sensitive() {
    let addr = OperationAddress::new("/secure/bearer", Method::GET);

    let request = get("/secure/bearer")
        .header("Authorization", "Bearer token123")
        .body(Vec::new())
        .unwrap();
    validator().validate(&addr, &request).unwrap();

    let request = get("/secure/bearer")
        .header("Authorization", "bearer token123")
        .body(Vec::new())
        .unwrap();
    assert!(validator().validate(&addr, &request).is_err());

    // Basic credentials do not satisfy a bearer scheme
    let request = get("/secure/bearer")
        .header("Authorization", "Basic dXNlcjpwYXNz")
        .body(Vec::new())
        .unwrap();
    assert!(validator().validate(&addr, &request).is_err());
}

#[test]
fn test_unknown_scheme_is_a_contract_error() {
    let addr = OperationAddress::new("/secure/unknown", Method::GET);
    let request = get("/secure/unknown").body(Vec::new()).unwrap();

    let err = validator().validate(&addr, &request).unwrap_err();
    assert!(matches!(
        err,
        ValidationFailed::Schema(SchemaMismatch::Schema(_))
    ));
    assert!(err.to_string().contains("ghost"));
}

#[test]
fn test_operations_without_security_pass() {
    let addr = OperationAddress::new("/search", Method::GET);
    let request = get("/search?ids=1").body(Vec::new()).unwrap();

    validator().validate(&addr, &request).unwrap();
}
