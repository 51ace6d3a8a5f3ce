use indexmap::IndexMap;
use serde_json::Value;

use super::super::address::Address;
use super::super::error::{InvalidBody, ValidationFailed};
use super::super::finder::SpecFinder;
use super::super::message;
use super::form_urlencoded::declared_type_name;
use super::is_json;
use crate::models::{MediaType, SchemaType};
use crate::schema::{Breadcrumb, TypeMismatch, ValidationStrategy};

/// Validates "multipart/form-data" bodies: each named part becomes one
/// property of the declared object schema, honoring a per-part content
/// type where the spec or the part itself declares one.
pub(crate) struct MultipartValidator<'a> {
    finder: &'a SpecFinder,
    media: &'a MediaType,
    content_type: &'a str,
    boundary: Option<String>,
}

impl<'a> MultipartValidator<'a> {
    pub(crate) fn new(
        finder: &'a SpecFinder,
        media: &'a MediaType,
        content_type: &'a str,
        boundary: Option<String>,
    ) -> Self {
        Self {
            finder,
            media,
            content_type,
            boundary,
        }
    }

    pub(crate) fn validate(&self, address: &Address, body: &[u8]) -> Result<(), ValidationFailed> {
        let Some(schema) = &self.media.schema else {
            return Ok(());
        };

        // A multipart body must be described as a set of object properties;
        // checked before any parsing of the body bytes
        if schema.schema_type != Some(SchemaType::Object) {
            return Err(ValidationFailed::Schema(
                TypeMismatch::new(
                    SchemaType::Object,
                    declared_type_name(schema.schema_type),
                    &Breadcrumb::root(),
                )
                .into(),
            ));
        }

        let not_valid = |error: String| InvalidBody::NotValidMultipart {
            error,
            address: address.clone(),
        };

        let boundary = self
            .boundary
            .as_deref()
            .ok_or_else(|| not_valid("missing boundary parameter".to_string()))?;
        let parts = parse_multipart(body, boundary).map_err(not_valid)?;

        let mut properties: IndexMap<String, Value> = IndexMap::new();
        for part in parts {
            let declared = self
                .media
                .encoding
                .get(&part.name)
                .and_then(|encoding| encoding.content_type.as_deref());
            let part_content_type = declared.or(part.content_type.as_deref());

            let value = if part_content_type.is_some_and(|ct| {
                ct.parse::<mime::Mime>()
                    .map(|mime| is_json(mime.essence_str()))
                    .unwrap_or(false)
            }) {
                serde_json::from_slice(&part.data).map_err(|error| InvalidBody::NotValidJson {
                    error: error.to_string(),
                    address: address.clone(),
                })?
            } else {
                Value::from(String::from_utf8_lossy(&part.data).into_owned())
            };

            // Repeated part names aggregate into an array property
            message::insert_multi(&mut properties, part.name, value);
        }

        let decoded = Value::Object(properties.into_iter().collect());

        self.finder
            .schema_validator(ValidationStrategy::Cast)
            .validate(&decoded, schema)
            .map_err(|source| {
                InvalidBody::DoesNotMatchSchema {
                    content_type: self.content_type.to_string(),
                    address: address.clone(),
                    source,
                }
                .into()
            })
    }
}

struct Part {
    name: String,
    content_type: Option<String>,
    data: Vec<u8>,
}

/// Split a multipart payload into its named parts. The engine runs over
/// fully materialized bytes, so a plain boundary scan suffices.
fn parse_multipart(body: &[u8], boundary: &str) -> Result<Vec<Part>, String> {
    let delimiter = format!("--{boundary}");
    let delimiter = delimiter.as_bytes();

    let mut parts = Vec::new();
    let mut offset = find(body, delimiter).ok_or_else(|| "boundary not found".to_string())?
        + delimiter.len();

    loop {
        let rest = &body[offset..];
        if rest.starts_with(b"--") {
            // Closing delimiter
            break;
        }
        let rest = rest
            .strip_prefix(b"\r\n")
            .ok_or_else(|| "malformed boundary line".to_string())?;

        let end = find(rest, delimiter).ok_or_else(|| "unterminated part".to_string())?;
        let segment = rest[..end]
            .strip_suffix(b"\r\n")
            .ok_or_else(|| "malformed part ending".to_string())?;
        offset += 2 + end + delimiter.len();

        let header_end =
            find(segment, b"\r\n\r\n").ok_or_else(|| "part has no header block".to_string())?;
        let headers = String::from_utf8_lossy(&segment[..header_end]);
        let data = segment[header_end + 4..].to_vec();

        let mut name = None;
        let mut content_type = None;
        for line in headers.split("\r\n") {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            match key.trim().to_ascii_lowercase().as_str() {
                "content-disposition" => {
                    name = value
                        .split(';')
                        .filter_map(|attribute| attribute.trim().strip_prefix("name="))
                        .map(|name| name.trim_matches('"').to_string())
                        .next();
                }
                "content-type" => content_type = Some(value.trim().to_string()),
                _ => {}
            }
        }

        parts.push(Part {
            name: name.ok_or_else(|| "part has no name".to_string())?,
            content_type,
            data,
        });
    }

    Ok(parts)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_multipart() {
        let body = concat!(
            "--XYZ\r\n",
            "Content-Disposition: form-data; name=\"age\"\r\n",
            "\r\n",
            "27\r\n",
            "--XYZ\r\n",
            "Content-Disposition: form-data; name=\"profile\"\r\n",
            "Content-Type: application/json\r\n",
            "\r\n",
            "{\"nickname\":\"rex\"}\r\n",
            "--XYZ--\r\n"
        );

        let parts = parse_multipart(body.as_bytes(), "XYZ").unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].name, "age");
        assert_eq!(parts[0].data, b"27");
        assert_eq!(parts[1].name, "profile");
        assert_eq!(parts[1].content_type.as_deref(), Some("application/json"));
    }

    #[test]
    fn test_parse_multipart_rejects_unterminated() {
        let body = "--XYZ\r\nContent-Disposition: form-data; name=\"a\"\r\n\r\nvalue";
        assert!(parse_multipart(body.as_bytes(), "XYZ").is_err());
    }

    #[test]
    fn test_parse_multipart_requires_part_names() {
        let body = "--XYZ\r\nContent-Type: text/plain\r\n\r\nvalue\r\n--XYZ--\r\n";
        assert!(parse_multipart(body.as_bytes(), "XYZ").is_err());
    }
}
