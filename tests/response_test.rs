use std::sync::Arc;

use http::Method;
use tollgate::loader;
use tollgate::validation::{
    InvalidBody, InvalidHeaders, ResponseAddress, ResponseValidator, ValidationFailed,
};

fn validator() -> ResponseValidator {
    let spec = loader::load_spec("tests/fixtures/api.yaml").unwrap();
    ResponseValidator::new(Arc::new(spec))
}

fn response() -> http::response::Builder {
    http::Response::builder().status(200)
}

#[test]
fn test_response_green() {
    let addr = ResponseAddress::new("/cookies", Method::POST, 200);
    let response = response()
        .header("Set-Cookie", "session_id=abc")
        .header("Content-Type", "application/json")
        .body(br#"{"result": "ok", "count": 2}"#.to_vec())
        .unwrap();

    validator().validate(&addr, &response).unwrap();
}

#[test]
fn test_response_missing_set_cookie_header() {
    let addr = ResponseAddress::new("/cookies", Method::POST, 200);
    let response = response()
        .header("Content-Type", "application/json")
        .body(br#"{"result": "ok"}"#.to_vec())
        .unwrap();

    let err = validator().validate(&addr, &response).unwrap_err();
    assert!(matches!(
        err,
        ValidationFailed::Headers(InvalidHeaders::MissingHeader { .. })
    ));
    assert_eq!(
        err.to_string(),
        "Missing required header \"Set-Cookie\" for Response [post /cookies 200]"
    );
}

#[test]
fn test_response_body_is_validated_strictly() {
    let addr = ResponseAddress::new("/cookies", Method::POST, 200);
    // "2" would cast to an integer, but response bodies carry native types
    let response = response()
        .header("Set-Cookie", "session_id=abc")
        .header("Content-Type", "application/json")
        .body(br#"{"result": "ok", "count": "2"}"#.to_vec())
        .unwrap();

    let err = validator().validate(&addr, &response).unwrap_err();
    assert!(matches!(
        err,
        ValidationFailed::Body(InvalidBody::DoesNotMatchSchema { .. })
    ));
    assert_eq!(
        err.to_string(),
        "Body does not match schema for content-type \"application/json\" for Response [post /cookies 200]"
    );
}

#[test]
fn test_response_with_declared_content_requires_a_body() {
    let addr = ResponseAddress::new("/cookies", Method::POST, 200);
    let response = response()
        .header("Set-Cookie", "session_id=abc")
        .body(Vec::new())
        .unwrap();

    let err = validator().validate(&addr, &response).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Required body is missing for Response [post /cookies 200]"
    );
}

#[test]
fn test_unknown_status_code_is_a_contract_error() {
    let addr = ResponseAddress::new("/cookies", Method::POST, 500);
    let response = response()
        .header("Set-Cookie", "session_id=abc")
        .body(Vec::new())
        .unwrap();

    let err = validator().validate(&addr, &response).unwrap_err();
    assert!(matches!(err, ValidationFailed::NoOperation(_)));
    assert_eq!(
        err.to_string(),
        "Specification contains no operation for Response [post /cookies 500]"
    );
}
