use serde_json::Value;

use super::super::address::Address;
use super::super::error::{InvalidBody, ValidationFailed};
use super::super::finder::SpecFinder;
use crate::models::MediaType;
use crate::schema::ValidationStrategy;

/// Validates JSON bodies. Parsed values carry native types, so validation
/// is strict: no string coercion may mask a genuine mismatch.
pub(crate) struct JsonBodyValidator<'a> {
    finder: &'a SpecFinder,
    media: &'a MediaType,
    content_type: &'a str,
}

impl<'a> JsonBodyValidator<'a> {
    pub(crate) fn new(finder: &'a SpecFinder, media: &'a MediaType, content_type: &'a str) -> Self {
        Self {
            finder,
            media,
            content_type,
        }
    }

    pub(crate) fn validate(&self, address: &Address, body: &[u8]) -> Result<(), ValidationFailed> {
        let value: Value = serde_json::from_slice(body).map_err(|error| InvalidBody::NotValidJson {
            error: error.to_string(),
            address: address.clone(),
        })?;

        let Some(schema) = &self.media.schema else {
            return Ok(());
        };

        self.finder
            .schema_validator(ValidationStrategy::Strict)
            .validate(&value, schema)
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
