use http::header::AUTHORIZATION;
use indexmap::IndexMap;
use serde_json::Value;

use super::address::Address;
use super::error::{InvalidSecurity, ValidationFailed};
use super::finder::SpecFinder;
use super::message;
use crate::models::{ParameterLocation, SecurityRequirement, SecurityScheme, SecuritySchemeType};
use crate::schema::InvalidSchema;

/// The outcome of evaluating one AND-group of a security requirement
enum GroupOutcome {
    AllPassed,
    FirstFailure { scheme: String, reason: String },
}

/// Validates a request's credentials against the operation's security
/// requirements.
///
/// Requirements form an OR-list of AND-groups: each group's schemes must
/// all be satisfied simultaneously, and any one passing group authorizes
/// the request. Evaluation stops at the first fully-passing group; if none
/// passes, only the aggregate outcome is reported.
pub struct SecurityValidator<'f> {
    finder: &'f SpecFinder,
}

impl<'f> SecurityValidator<'f> {
    pub fn new(finder: &'f SpecFinder) -> Self {
        Self { finder }
    }

    pub fn validate<B>(
        &self,
        address: &Address,
        request: &http::Request<B>,
    ) -> Result<(), ValidationFailed> {
        let requirements = self.finder.find_security_specs(address)?;
        if requirements.is_empty() {
            // Unauthenticated operation
            return Ok(());
        }

        let query = message::query_params(request);
        let cookies = message::cookie_params(request);

        for requirement in requirements {
            match self.check_group(request, &query, &cookies, requirement)? {
                GroupOutcome::AllPassed => return Ok(()),
                GroupOutcome::FirstFailure { scheme, reason } => {
                    tracing::debug!(%scheme, %reason, "security group did not match");
                }
            }
        }

        Err(InvalidSecurity::NoSchemeMatched {
            address: address.clone(),
        }
        .into())
    }

    /// Evaluate one AND-group. A scheme name missing from the registry is a
    /// contract error and propagates immediately — it is not a non-match.
    fn check_group<B>(
        &self,
        request: &http::Request<B>,
        query: &IndexMap<String, Value>,
        cookies: &IndexMap<String, Value>,
        requirement: &SecurityRequirement,
    ) -> Result<GroupOutcome, ValidationFailed> {
        let schemes = self.finder.find_security_schemes();

        // Scopes are accepted but not semantically checked
        for (name, _scopes) in requirement {
            let scheme = schemes
                .and_then(|registry| registry.get(name))
                .ok_or_else(|| {
                    ValidationFailed::Schema(InvalidSchema::unknown_security_scheme(name).into())
                })?;

            if let Err(reason) = check_scheme(request, query, cookies, scheme) {
                return Ok(GroupOutcome::FirstFailure {
                    scheme: name.clone(),
                    reason,
                });
            }
        }

        Ok(GroupOutcome::AllPassed)
    }
}

fn check_scheme<B>(
    request: &http::Request<B>,
    query: &IndexMap<String, Value>,
    cookies: &IndexMap<String, Value>,
    scheme: &SecurityScheme,
) -> Result<(), String> {
    match scheme.scheme_type {
        SecuritySchemeType::Http => {
            let Some(authorization) = request
                .headers()
                .get(AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
            else {
                return Err("missing Authorization header".to_string());
            };

            // The prefix match is case-sensitive
            match scheme.scheme.as_deref() {
                Some("basic") if !authorization.starts_with("Basic ") => {
                    Err("Authorization header does not carry Basic credentials".to_string())
                }
                Some("bearer") if !authorization.starts_with("Bearer ") => {
                    Err("Authorization header does not carry a Bearer token".to_string())
                }
                _ => Ok(()),
            }
        }
        SecuritySchemeType::ApiKey => {
            let name = scheme.name.as_deref().unwrap_or_default();
            // Presence only; the key's value shape is not checked
            let present = match scheme.location {
                Some(ParameterLocation::Query) => query.contains_key(name),
                Some(ParameterLocation::Header) => request.headers().contains_key(name),
                Some(ParameterLocation::Cookie) => cookies.contains_key(name),
                _ => false,
            };
            if present {
                Ok(())
            } else {
                Err(format!("missing API key \"{name}\""))
            }
        }
        // Token introspection for these schemes is out of scope; nothing to
        // check at the message level
        SecuritySchemeType::OAuth2
        | SecuritySchemeType::OpenIdConnect
        | SecuritySchemeType::MutualTls => Ok(()),
    }
}
