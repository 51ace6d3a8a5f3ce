use std::sync::Arc;

use super::address::{Address, CallbackAddress, OperationAddress, ResponseAddress};
use super::body::BodyValidator;
use super::cookies::CookiesValidator;
use super::error::ValidationFailed;
use super::finder::SpecFinder;
use super::headers::HeadersValidator;
use super::path::PathValidator;
use super::query::QueryArgumentsValidator;
use super::security::SecurityValidator;
use crate::models::OpenApiSpec;

/// Validates HTTP requests against the operations of a specification.
///
/// Runs the location validators in a fixed order — path, security,
/// cookies, headers, query arguments, body — and stops at the first
/// failure.
#[derive(Debug, Clone)]
pub struct RequestValidator {
    finder: SpecFinder,
}

impl RequestValidator {
    pub fn new(spec: Arc<OpenApiSpec>) -> Self {
        Self {
            finder: SpecFinder::new(spec),
        }
    }

    pub fn from_finder(finder: SpecFinder) -> Self {
        Self { finder }
    }

    pub fn finder(&self) -> &SpecFinder {
        &self.finder
    }

    pub fn validate<B: AsRef<[u8]>>(
        &self,
        address: &OperationAddress,
        request: &http::Request<B>,
    ) -> Result<(), ValidationFailed> {
        let address = Address::Operation(address.clone());
        PathValidator::new(&self.finder).validate(&address, request)?;
        self.validate_at(&address, request)
    }

    /// Validate an out-of-band callback request against the callback
    /// operation the address names
    pub fn validate_callback<B: AsRef<[u8]>>(
        &self,
        address: &CallbackAddress,
        request: &http::Request<B>,
    ) -> Result<(), ValidationFailed> {
        // Callback URLs are runtime expressions, so there is no path
        // template to match the request against
        self.validate_at(&Address::Callback(address.clone()), request)
    }

    fn validate_at<B: AsRef<[u8]>>(
        &self,
        address: &Address,
        request: &http::Request<B>,
    ) -> Result<(), ValidationFailed> {
        SecurityValidator::new(&self.finder).validate(address, request)?;
        CookiesValidator::new(&self.finder).validate(address, request)?;
        HeadersValidator::new(&self.finder).validate_request(address, request)?;
        QueryArgumentsValidator::new(&self.finder).validate(address, request)?;
        BodyValidator::new(&self.finder).validate_request(address, request)?;
        Ok(())
    }
}

/// Validates HTTP responses against the response specs of an operation:
/// headers first, then the body.
#[derive(Debug, Clone)]
pub struct ResponseValidator {
    finder: SpecFinder,
}

impl ResponseValidator {
    pub fn new(spec: Arc<OpenApiSpec>) -> Self {
        Self {
            finder: SpecFinder::new(spec),
        }
    }

    pub fn from_finder(finder: SpecFinder) -> Self {
        Self { finder }
    }

    pub fn finder(&self) -> &SpecFinder {
        &self.finder
    }

    pub fn validate<B: AsRef<[u8]>>(
        &self,
        address: &ResponseAddress,
        response: &http::Response<B>,
    ) -> Result<(), ValidationFailed> {
        HeadersValidator::new(&self.finder).validate_response(address, response)?;
        BodyValidator::new(&self.finder).validate_response(address, response)?;
        Ok(())
    }
}
