use std::sync::Arc;

use http::Method;
use indexmap::IndexMap;
use serde_json::json;
use tollgate::loader;
use tollgate::validation::{
    Address, CallbackAddress, InvalidCookies, InvalidHeaders, InvalidPath, InvalidQueryArgs,
    OperationAddress, QueryArgumentsValidator, RequestValidator, ValidationFailed,
};

fn validator() -> RequestValidator {
    let spec = loader::load_spec("tests/fixtures/api.yaml").unwrap();
    RequestValidator::new(Arc::new(spec))
}

fn request(method: Method, uri: &str) -> http::request::Builder {
    http::Request::builder().method(method).uri(uri)
}

#[test]
fn test_request_with_cookies_green() {
    let addr = OperationAddress::new("/cookies", Method::POST);
    let request = request(Method::POST, "/cookies")
        .header("Cookie", "session_id=goodvalue; debug=10")
        .body(Vec::new())
        .unwrap();

    validator().validate(&addr, &request).unwrap();
}

#[test]
fn test_request_with_missing_cookie_red() {
    let addr = OperationAddress::new("/cookies", Method::POST);
    let request = request(Method::POST, "/cookies").body(Vec::new()).unwrap();

    let err = validator().validate(&addr, &request).unwrap_err();
    assert!(matches!(
        err,
        ValidationFailed::Cookies(InvalidCookies::MissingCookie { .. })
    ));
    assert_eq!(
        err.to_string(),
        "Missing required cookie \"session_id\" for Request [post /cookies]"
    );
}

#[test]
fn test_request_with_invalid_cookie_value_red() {
    let addr = OperationAddress::new("/cookies", Method::POST);
    let request = request(Method::POST, "/cookies")
        .header("Cookie", "session_id=goodvalue; debug=bad value")
        .body(Vec::new())
        .unwrap();

    let err = validator().validate(&addr, &request).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Value \"bad value\" for cookie \"debug\" is invalid for Request [post /cookies]"
    );
}

#[test]
fn test_request_with_extra_cookies_green() {
    let addr = OperationAddress::new("/cookies", Method::POST);
    let request = request(Method::POST, "/cookies")
        .header("Cookie", "session_id=goodvalue; debug=10; extra=any value")
        .body(Vec::new())
        .unwrap();

    validator().validate(&addr, &request).unwrap();
}

#[test]
fn test_unexploded_query_array_green() {
    let addr = OperationAddress::new("/search", Method::GET);
    let request = request(Method::GET, "/search?ids=1,2,3")
        .body(Vec::new())
        .unwrap();

    validator().validate(&addr, &request).unwrap();
}

#[test]
fn test_unexploded_query_array_red() {
    let addr = OperationAddress::new("/search", Method::GET);
    let request = request(Method::GET, "/search?ids=string1")
        .body(Vec::new())
        .unwrap();

    let err = validator().validate(&addr, &request).unwrap_err();
    assert!(matches!(
        err,
        ValidationFailed::QueryArgs(InvalidQueryArgs::InvalidArgument { .. })
    ));
    assert_eq!(
        err.to_string(),
        "Value \"string1\" for argument \"ids\" is invalid for Request [get /search]"
    );
}

#[test]
fn test_preparsed_query_array_renders_as_json() {
    let validator = validator();
    let finder = validator.finder();
    let addr = Address::Operation(OperationAddress::new("/search", Method::GET));

    let mut arguments = IndexMap::new();
    arguments.insert("ids".to_string(), json!(["string_array"]));

    let err = QueryArgumentsValidator::new(finder)
        .validate_parsed(&addr, &arguments)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Value \"[\"string_array\"]\" for argument \"ids\" is invalid for Request [get /search]"
    );

    // A well-typed pre-parsed array passes
    let mut arguments = IndexMap::new();
    arguments.insert("ids".to_string(), json!([5]));
    QueryArgumentsValidator::new(finder)
        .validate_parsed(&addr, &arguments)
        .unwrap();
}

#[test]
fn test_missing_required_query_argument() {
    let addr = OperationAddress::new("/search", Method::GET);
    let request = request(Method::GET, "/search?limit=10")
        .body(Vec::new())
        .unwrap();

    let err = validator().validate(&addr, &request).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Missing required argument \"ids\" for Request [get /search]"
    );
}

#[test]
fn test_undeclared_query_arguments_are_ignored() {
    let addr = OperationAddress::new("/search", Method::GET);
    let request = request(Method::GET, "/search?ids=1&unknown=whatever")
        .body(Vec::new())
        .unwrap();

    validator().validate(&addr, &request).unwrap();
}

#[test]
fn test_path_parameter_cast_and_red() {
    let addr = OperationAddress::new("/pets/{petId}", Method::GET);

    let ok = request(Method::GET, "/pets/42")
        .header("X-Request-Id", "deadbeef-1")
        .body(Vec::new())
        .unwrap();
    validator().validate(&addr, &ok).unwrap();

    let bad = request(Method::GET, "/pets/rex")
        .header("X-Request-Id", "deadbeef-1")
        .body(Vec::new())
        .unwrap();
    let err = validator().validate(&addr, &bad).unwrap_err();
    assert!(matches!(
        err,
        ValidationFailed::Path(InvalidPath::InvalidParameter { .. })
    ));
    assert_eq!(
        err.to_string(),
        "Value \"rex\" for parameter \"petId\" is invalid for Request [get /pets/{petId}]"
    );
}

#[test]
fn test_path_not_matching_template() {
    let addr = OperationAddress::new("/pets/{petId}", Method::GET);
    let request = request(Method::GET, "/pets/1/toys")
        .header("X-Request-Id", "deadbeef-1")
        .body(Vec::new())
        .unwrap();

    let err = validator().validate(&addr, &request).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Unable to parse \"/pets/1/toys\" against the pattern \"/pets/{petId}\" for Request [get /pets/{petId}]"
    );
}

#[test]
fn test_missing_required_header() {
    let addr = OperationAddress::new("/pets/{petId}", Method::GET);
    let request = request(Method::GET, "/pets/42").body(Vec::new()).unwrap();

    let err = validator().validate(&addr, &request).unwrap_err();
    assert!(matches!(
        err,
        ValidationFailed::Headers(InvalidHeaders::MissingHeader { .. })
    ));
    assert_eq!(
        err.to_string(),
        "Missing required header \"X-Request-Id\" for Request [get /pets/{petId}]"
    );
}

#[test]
fn test_invalid_header_value() {
    let addr = OperationAddress::new("/pets/{petId}", Method::GET);
    let request = request(Method::GET, "/pets/42")
        .header("X-Request-Id", "NOT VALID")
        .body(Vec::new())
        .unwrap();

    let err = validator().validate(&addr, &request).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Value \"NOT VALID\" for header \"X-Request-Id\" is invalid for Request [get /pets/{petId}]"
    );
}

#[test]
fn test_callback_request_green() {
    let addr = CallbackAddress::new("/subscribe", Method::POST, "onEvent", Method::POST);
    let request = http::Request::builder()
        .method(Method::POST)
        .uri("https://client.example/hook")
        .header("Content-Type", "application/json")
        .body(br#"{"event": "created"}"#.to_vec())
        .unwrap();

    validator().validate_callback(&addr, &request).unwrap();
}

#[test]
fn test_callback_request_red() {
    let addr = CallbackAddress::new("/subscribe", Method::POST, "onEvent", Method::POST);
    let request = http::Request::builder()
        .method(Method::POST)
        .uri("https://client.example/hook")
        .header("Content-Type", "application/json")
        .body(br#"{"unrelated": true}"#.to_vec())
        .unwrap();

    let err = validator().validate_callback(&addr, &request).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Body does not match schema for content-type \"application/json\" for Callback [post /subscribe onEvent post]"
    );
}

#[test]
fn test_unknown_operation_is_a_contract_error() {
    let addr = OperationAddress::new("/missing", Method::GET);
    let request = request(Method::GET, "/missing").body(Vec::new()).unwrap();

    let err = validator().validate(&addr, &request).unwrap_err();
    assert!(matches!(err, ValidationFailed::NoOperation(_)));
    assert_eq!(
        err.to_string(),
        "Specification contains no operation for Request [get /missing]"
    );
}
