use serde_json::Value;

use super::super::address::Address;
use super::super::error::{InvalidBody, ValidationFailed};
use super::super::finder::SpecFinder;
use super::super::message;
use crate::models::{MediaType, SchemaType};
use crate::schema::{Breadcrumb, TypeMismatch, ValidationStrategy};

/// Validates "application/x-www-form-urlencoded" bodies.
///
/// The decoded pairs are all strings, so validation casts them toward the
/// declared property types.
pub(crate) struct FormUrlencodedValidator<'a> {
    finder: &'a SpecFinder,
    media: &'a MediaType,
    content_type: &'a str,
}

impl<'a> FormUrlencodedValidator<'a> {
    pub(crate) fn new(finder: &'a SpecFinder, media: &'a MediaType, content_type: &'a str) -> Self {
        Self {
            finder,
            media,
            content_type,
        }
    }

    pub(crate) fn validate(&self, address: &Address, body: &[u8]) -> Result<(), ValidationFailed> {
        let Some(schema) = &self.media.schema else {
            return Ok(());
        };

        // An urlencoded body must be described as a set of object
        // properties; checked before any parsing of the body bytes
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

        let pairs = message::parse_urlencoded(body);
        let decoded = Value::Object(pairs.into_iter().collect());

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

pub(super) fn declared_type_name(declared: Option<SchemaType>) -> String {
    declared
        .map(|schema_type| schema_type.to_string())
        .unwrap_or_else(|| "unspecified".to_string())
}
