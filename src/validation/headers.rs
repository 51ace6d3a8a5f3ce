use serde_json::Value;

use super::address::{Address, ResponseAddress};
use super::error::{InvalidHeaders, ValidationFailed};
use super::finder::SpecFinder;
use super::message;
use crate::models::SchemaNode;
use crate::schema::{Breadcrumb, ValidationStrategy, split_unexploded};

/// Validates message headers: request headers against the operation's
/// `in: header` parameters, response headers against the response spec's
/// header map. Header names compare case-insensitively, as HTTP requires.
pub struct HeadersValidator<'f> {
    finder: &'f SpecFinder,
}

impl<'f> HeadersValidator<'f> {
    pub fn new(finder: &'f SpecFinder) -> Self {
        Self { finder }
    }

    pub fn validate_request<B>(
        &self,
        address: &Address,
        request: &http::Request<B>,
    ) -> Result<(), ValidationFailed> {
        let specs = self.finder.find_header_specs(address)?;

        for (name, spec) in &specs {
            self.check_header(
                address,
                request.headers(),
                name,
                spec.is_required(),
                spec.effective_explode(),
                spec.schema.as_ref(),
            )?;
        }
        Ok(())
    }

    pub fn validate_response<B>(
        &self,
        address: &ResponseAddress,
        response: &http::Response<B>,
    ) -> Result<(), ValidationFailed> {
        let response_spec = self.finder.find_response_spec(address)?;
        let address = Address::Response(address.clone());

        for (name, header) in &response_spec.headers {
            self.check_header(
                &address,
                response.headers(),
                name,
                header.required.unwrap_or(false),
                // Headers serialize in simple style: explode defaults to off
                header.explode.unwrap_or(false),
                header.schema.as_ref(),
            )?;
        }
        Ok(())
    }

    fn check_header(
        &self,
        address: &Address,
        headers: &http::HeaderMap,
        name: &str,
        required: bool,
        explode: bool,
        schema: Option<&SchemaNode>,
    ) -> Result<(), ValidationFailed> {
        let values = message::header_values(headers, name);

        if values.is_empty() {
            if required {
                return Err(InvalidHeaders::MissingHeader {
                    header: name.to_string(),
                    address: address.clone(),
                }
                .into());
            }
            return Ok(());
        }

        let Some(schema) = schema else {
            return Ok(());
        };

        for raw in values {
            let original = Value::from(raw);
            let split;
            let value = match split_unexploded(explode, Some(schema), &original) {
                Some(elements) => {
                    split = elements;
                    &split
                }
                None => &original,
            };

            let validator = self.finder.schema_validator(ValidationStrategy::Cast);
            if let Err(source) = validator.validate_at(value, schema, &Breadcrumb::property(name)) {
                return Err(InvalidHeaders::InvalidHeaderValue {
                    header: name.to_string(),
                    value: message::render_value(&original),
                    address: address.clone(),
                    source,
                }
                .into());
            }
        }
        Ok(())
    }
}
