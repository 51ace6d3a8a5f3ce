mod form_urlencoded;
mod json;
mod multipart;

use indexmap::IndexMap;

use super::address::{Address, ResponseAddress};
use super::error::{InvalidBody, ValidationFailed};
use super::finder::SpecFinder;
use super::message;
use crate::models::MediaType;
use form_urlencoded::FormUrlencodedValidator;
use json::JsonBodyValidator;
use multipart::MultipartValidator;

/// Validates a message body: selects the media-type spec matching the
/// message's content type and dispatches to the decoder for that family.
///
/// Content types with no decoder here (e.g. text/plain, binary uploads)
/// are accepted without structural validation.
pub struct BodyValidator<'f> {
    finder: &'f SpecFinder,
}

impl<'f> BodyValidator<'f> {
    pub fn new(finder: &'f SpecFinder) -> Self {
        Self { finder }
    }

    pub fn validate_request<B: AsRef<[u8]>>(
        &self,
        address: &Address,
        request: &http::Request<B>,
    ) -> Result<(), ValidationFailed> {
        let Some(request_body) = self.finder.find_body_spec(address)? else {
            return Ok(());
        };

        let body = request.body().as_ref();
        if body.is_empty() {
            if request_body.required {
                return Err(InvalidBody::RequiredBodyMissing {
                    address: address.clone(),
                }
                .into());
            }
            return Ok(());
        }

        self.validate_content(address, request.headers(), &request_body.content, body)
    }

    pub fn validate_response<B: AsRef<[u8]>>(
        &self,
        address: &ResponseAddress,
        response: &http::Response<B>,
    ) -> Result<(), ValidationFailed> {
        let response_spec = self.finder.find_response_spec(address)?;
        if response_spec.content.is_empty() {
            return Ok(());
        }
        let address = Address::Response(address.clone());

        let body = response.body().as_ref();
        if body.is_empty() {
            // A response with declared content must carry a body
            return Err(InvalidBody::RequiredBodyMissing { address }.into());
        }

        self.validate_content(&address, response.headers(), &response_spec.content, body)
    }

    fn validate_content(
        &self,
        address: &Address,
        headers: &http::HeaderMap,
        content: &IndexMap<String, MediaType>,
        body: &[u8],
    ) -> Result<(), ValidationFailed> {
        let parsed = message::content_type(headers);
        let essence = parsed
            .as_ref()
            .map(|mime| mime.essence_str().to_string())
            .unwrap_or_default();

        let Some((declared, media)) = match_media_type(content, &essence) else {
            return Err(InvalidBody::ContentTypeNotExpected {
                content_type: essence,
                address: address.clone(),
            }
            .into());
        };

        if !media.encoding.is_empty() {
            // Per-property encoding/style overrides are accepted but their
            // serialization rules are not enforced
            tracing::debug!(
                content_type = %declared,
                "encoding overrides declared on media type are not enforced"
            );
        }

        if is_json(&essence) {
            JsonBodyValidator::new(self.finder, media, &essence).validate(address, body)
        } else if essence == "application/x-www-form-urlencoded" {
            FormUrlencodedValidator::new(self.finder, media, &essence).validate(address, body)
        } else if essence.starts_with("multipart/") {
            let boundary = parsed
                .as_ref()
                .and_then(|mime| mime.get_param(mime::BOUNDARY))
                .map(|boundary| boundary.as_str().to_string());
            MultipartValidator::new(self.finder, media, &essence, boundary).validate(address, body)
        } else {
            tracing::debug!(
                content_type = %essence,
                "no decoder for content type, body accepted without validation"
            );
            Ok(())
        }
    }
}

/// Select the media-type spec for a concrete content type: exact match
/// first, then a declared subtype wildcard ("image/*"), then "*/*"
fn match_media_type<'c>(
    content: &'c IndexMap<String, MediaType>,
    essence: &str,
) -> Option<(&'c str, &'c MediaType)> {
    if let Some((declared, media)) = content.get_key_value(essence) {
        return Some((declared.as_str(), media));
    }

    let type_wildcard = essence
        .split_once('/')
        .map(|(main_type, _)| format!("{main_type}/*"));
    if let Some(wildcard) = type_wildcard
        && let Some((declared, media)) = content.get_key_value(wildcard.as_str())
    {
        return Some((declared.as_str(), media));
    }

    content
        .get_key_value("*/*")
        .map(|(declared, media)| (declared.as_str(), media))
}

pub(crate) fn is_json(essence: &str) -> bool {
    essence == "application/json" || essence.ends_with("+json")
}
