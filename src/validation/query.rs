use indexmap::IndexMap;
use serde_json::Value;

use super::address::Address;
use super::error::{InvalidQueryArgs, ValidationFailed};
use super::finder::SpecFinder;
use super::message;
use crate::models::Parameter;
use crate::schema::{Breadcrumb, ValidationStrategy, split_unexploded};

/// Validates a request's query arguments against the parameters the spec
/// declares for the operation.
///
/// By default OpenAPI treats request parameters as optional, and parameters
/// absent from the spec are additive — they never cause failure.
pub struct QueryArgumentsValidator<'f> {
    finder: &'f SpecFinder,
}

impl<'f> QueryArgumentsValidator<'f> {
    pub fn new(finder: &'f SpecFinder) -> Self {
        Self { finder }
    }

    pub fn validate<B>(
        &self,
        address: &Address,
        request: &http::Request<B>,
    ) -> Result<(), ValidationFailed> {
        self.validate_parsed(address, &message::query_params(request))
    }

    /// Entry point for callers that already hold framework-parsed query
    /// parameters
    pub fn validate_parsed(
        &self,
        address: &Address,
        arguments: &IndexMap<String, Value>,
    ) -> Result<(), ValidationFailed> {
        let specs = self.finder.find_query_specs(address)?;
        self.check_missing_arguments(address, arguments, &specs)?;
        self.validate_against_schema(address, arguments, &specs)
    }

    fn check_missing_arguments(
        &self,
        address: &Address,
        arguments: &IndexMap<String, Value>,
        specs: &IndexMap<String, &Parameter>,
    ) -> Result<(), ValidationFailed> {
        for (name, spec) in specs {
            if spec.is_required() && !arguments.contains_key(name) {
                return Err(InvalidQueryArgs::MissingArgument {
                    name: name.clone(),
                    address: address.clone(),
                }
                .into());
            }
        }
        Ok(())
    }

    fn validate_against_schema(
        &self,
        address: &Address,
        arguments: &IndexMap<String, Value>,
        specs: &IndexMap<String, &Parameter>,
    ) -> Result<(), ValidationFailed> {
        for (name, argument) in arguments {
            // Arguments with no declared schema are ignored
            let Some(spec) = specs.get(name) else {
                continue;
            };
            let Some(schema) = &spec.schema else {
                continue;
            };

            let split;
            let value = match split_unexploded(spec.effective_explode(), Some(schema), argument) {
                Some(elements) => {
                    split = elements;
                    &split
                }
                None => argument,
            };

            let validator = self.finder.schema_validator(ValidationStrategy::Cast);
            if let Err(source) =
                validator.validate_at(value, schema, &Breadcrumb::property(name.clone()))
            {
                // The message renders the original, unsplit value
                return Err(InvalidQueryArgs::InvalidArgument {
                    name: name.clone(),
                    value: message::render_value(argument),
                    address: address.clone(),
                    source,
                }
                .into());
            }
        }
        Ok(())
    }
}
