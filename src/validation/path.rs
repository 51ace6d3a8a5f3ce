use serde_json::Value;

use super::address::Address;
use super::error::{InvalidPath, ValidationFailed};
use super::finder::SpecFinder;
use super::message;
use crate::schema::{Breadcrumb, ValidationStrategy, split_unexploded};

/// Validates the path parameters captured from the concrete URL against the
/// operation's `in: path` parameter schemas.
pub struct PathValidator<'f> {
    finder: &'f SpecFinder,
}

impl<'f> PathValidator<'f> {
    pub fn new(finder: &'f SpecFinder) -> Self {
        Self { finder }
    }

    pub fn validate<B>(
        &self,
        address: &Address,
        request: &http::Request<B>,
    ) -> Result<(), ValidationFailed> {
        // Callback addresses carry no usable template; only operation
        // addresses are matched against the request path
        let Address::Operation(operation_address) = address else {
            return Ok(());
        };

        let specs = self.finder.find_path_specs(address)?;
        let concrete = request.uri().path();

        let Some(captured) = operation_address.capture_path_params(concrete) else {
            return Err(InvalidPath::PathDoesNotMatchPattern {
                path: concrete.to_string(),
                pattern: operation_address.path().to_string(),
                address: address.clone(),
            }
            .into());
        };

        for (name, spec) in &specs {
            let Some(raw) = captured.get(name) else {
                continue;
            };
            let Some(schema) = &spec.schema else {
                continue;
            };

            let original = Value::from(raw.clone());
            let split;
            let value = match split_unexploded(spec.effective_explode(), Some(schema), &original) {
                Some(elements) => {
                    split = elements;
                    &split
                }
                None => &original,
            };

            let validator = self.finder.schema_validator(ValidationStrategy::Cast);
            if let Err(source) =
                validator.validate_at(value, schema, &Breadcrumb::property(name.clone()))
            {
                return Err(InvalidPath::InvalidParameter {
                    parameter: name.clone(),
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
