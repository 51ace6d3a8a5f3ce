//! Helpers for reading values out of `http` messages: query and cookie
//! parsing, header access, content-type negotiation.

use http::HeaderMap;
use http::header::{CONTENT_TYPE, COOKIE};
use indexmap::IndexMap;
use serde_json::Value;

/// Parse a raw query string (or urlencoded body) into a parameter map.
/// Repeated keys aggregate into arrays; all values start as strings.
pub(crate) fn parse_urlencoded(raw: &[u8]) -> IndexMap<String, Value> {
    let mut params = IndexMap::new();
    for (name, value) in url::form_urlencoded::parse(raw) {
        insert_multi(&mut params, name.into_owned(), Value::from(value.into_owned()));
    }
    params
}

/// Query parameters of a request, parsed from its URI
pub(crate) fn query_params<B>(request: &http::Request<B>) -> IndexMap<String, Value> {
    let raw = request.uri().query().unwrap_or("");
    parse_urlencoded(raw.as_bytes())
}

/// Cookies of a request, parsed from its `Cookie` header(s)
pub(crate) fn cookie_params<B>(request: &http::Request<B>) -> IndexMap<String, Value> {
    let mut cookies = IndexMap::new();
    for header in request.headers().get_all(COOKIE) {
        let Ok(header) = header.to_str() else {
            continue;
        };
        for pair in header.split(';') {
            if let Some((name, value)) = pair.trim().split_once('=') {
                cookies.insert(name.to_string(), Value::from(value.to_string()));
            }
        }
    }
    cookies
}

/// All values of a header, as strings; non-UTF-8 values are skipped
pub(crate) fn header_values(headers: &HeaderMap, name: &str) -> Vec<String> {
    headers
        .get_all(name)
        .iter()
        .filter_map(|value| value.to_str().ok().map(str::to_string))
        .collect()
}

/// The parsed content type of a message, when present and well-formed
pub(crate) fn content_type(headers: &HeaderMap) -> Option<mime::Mime> {
    headers
        .get(CONTENT_TYPE)?
        .to_str()
        .ok()?
        .parse::<mime::Mime>()
        .ok()
}

/// Render a value for an error message: strings verbatim, everything else
/// (arrays in particular) JSON-encoded for readability
pub(crate) fn render_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

pub(crate) fn insert_multi(params: &mut IndexMap<String, Value>, name: String, value: Value) {
    match params.get_mut(&name) {
        Some(Value::Array(values)) => values.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            params.insert(name, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_urlencoded() {
        let params = parse_urlencoded(b"limit=10&q=a%20b");
        assert_eq!(params["limit"], json!("10"));
        assert_eq!(params["q"], json!("a b"));
    }

    #[test]
    fn test_repeated_keys_aggregate() {
        let params = parse_urlencoded(b"id=1&id=2&id=3");
        assert_eq!(params["id"], json!(["1", "2", "3"]));
    }

    #[test]
    fn test_cookie_params() {
        let request = http::Request::builder()
            .uri("/")
            .header("Cookie", "session_id=abc; debug=10")
            .body(Vec::<u8>::new())
            .unwrap();

        let cookies = cookie_params(&request);
        assert_eq!(cookies["session_id"], json!("abc"));
        assert_eq!(cookies["debug"], json!("10"));
    }

    #[test]
    fn test_content_type() {
        let request = http::Request::builder()
            .uri("/")
            .header("Content-Type", "application/json; charset=utf-8")
            .body(Vec::<u8>::new())
            .unwrap();

        let mime = content_type(request.headers()).unwrap();
        assert_eq!(mime.essence_str(), "application/json");
    }
}
