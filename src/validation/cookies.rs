use indexmap::IndexMap;
use serde_json::Value;

use super::address::Address;
use super::error::{InvalidCookies, ValidationFailed};
use super::finder::SpecFinder;
use super::message;
use crate::schema::{Breadcrumb, ValidationStrategy, split_unexploded};

/// Validates a request's cookies against the `in: cookie` parameters the
/// spec declares. Cookies the spec does not mention never cause failure.
pub struct CookiesValidator<'f> {
    finder: &'f SpecFinder,
}

impl<'f> CookiesValidator<'f> {
    pub fn new(finder: &'f SpecFinder) -> Self {
        Self { finder }
    }

    pub fn validate<B>(
        &self,
        address: &Address,
        request: &http::Request<B>,
    ) -> Result<(), ValidationFailed> {
        self.validate_parsed(address, &message::cookie_params(request))
    }

    /// Entry point for callers that already hold framework-parsed cookies
    pub fn validate_parsed(
        &self,
        address: &Address,
        cookies: &IndexMap<String, Value>,
    ) -> Result<(), ValidationFailed> {
        let specs = self.finder.find_cookie_specs(address)?;

        for (name, spec) in &specs {
            if spec.is_required() && !cookies.contains_key(name) {
                return Err(InvalidCookies::MissingCookie {
                    cookie: name.clone(),
                    address: address.clone(),
                }
                .into());
            }
        }

        for (name, cookie) in cookies {
            let Some(spec) = specs.get(name) else {
                continue;
            };
            let Some(schema) = &spec.schema else {
                continue;
            };

            let split;
            let value = match split_unexploded(spec.effective_explode(), Some(schema), cookie) {
                Some(elements) => {
                    split = elements;
                    &split
                }
                None => cookie,
            };

            let validator = self.finder.schema_validator(ValidationStrategy::Cast);
            if let Err(source) =
                validator.validate_at(value, schema, &Breadcrumb::property(name.clone()))
            {
                return Err(InvalidCookies::InvalidCookieValue {
                    cookie: name.clone(),
                    value: message::render_value(cookie),
                    address: address.clone(),
                    source,
                }
                .into());
            }
        }

        Ok(())
    }
}
