use serde_json::Value;

use crate::models::{SchemaNode, SchemaType};

/// Whether string inputs may be coerced to the schema's declared scalar type
/// before structural validation.
///
/// Selected by the calling context: `Cast` for string-only HTTP locations
/// (path, query, header, cookie, urlencoded and multipart bodies), `Strict`
/// for JSON request bodies and all response bodies, which already carry
/// native types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationStrategy {
    Cast,
    Strict,
}

/// Attempt a deterministic parse of a string toward the declared scalar
/// type. `None` means the value is left untouched: parse failure is not an
/// error here — structural validation will report the mismatch against the
/// original string.
pub(crate) fn cast(value: &Value, schema: &SchemaNode) -> Option<Value> {
    let raw = value.as_str()?;

    match schema.schema_type? {
        SchemaType::Integer => raw.parse::<i64>().ok().map(Value::from),
        SchemaType::Number => raw
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number),
        SchemaType::Boolean => match raw {
            "true" => Some(Value::Bool(true)),
            "false" => Some(Value::Bool(false)),
            _ => None,
        },
        _ => None,
    }
}

/// Split an unexploded string parameter into its comma-separated elements
/// when the declared schema expects an array. Elements stay strings; the
/// recursive `items` check casts them individually.
pub(crate) fn split_unexploded(
    explode: bool,
    schema: Option<&SchemaNode>,
    value: &Value,
) -> Option<Value> {
    if explode || schema?.schema_type != Some(SchemaType::Array) {
        return None;
    }
    let raw = value.as_str()?;

    Some(Value::Array(
        raw.split(',').map(Value::from).collect(),
    ))
}
