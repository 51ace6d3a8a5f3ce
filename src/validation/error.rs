use thiserror::Error;

use super::address::Address;
use crate::schema::SchemaMismatch;

/// A message failed validation against the contract.
///
/// One variant per HTTP location, each naming the offending key and the
/// address it was found under, wrapping the structural cause where there is
/// one. `NoOperation` and `Schema` are contract errors — a broken or
/// unresolvable specification rather than a bad message.
#[derive(Debug, Error)]
pub enum ValidationFailed {
    #[error(transparent)]
    Path(#[from] InvalidPath),

    #[error(transparent)]
    QueryArgs(#[from] InvalidQueryArgs),

    #[error(transparent)]
    Headers(#[from] InvalidHeaders),

    #[error(transparent)]
    Cookies(#[from] InvalidCookies),

    #[error(transparent)]
    Body(#[from] InvalidBody),

    #[error(transparent)]
    Security(#[from] InvalidSecurity),

    #[error("Specification contains no operation for {0}")]
    NoOperation(Address),

    #[error(transparent)]
    Schema(#[from] SchemaMismatch),
}

#[derive(Debug, Error)]
pub enum InvalidPath {
    #[error("Unable to parse \"{path}\" against the pattern \"{pattern}\" for {address}")]
    PathDoesNotMatchPattern {
        path: String,
        pattern: String,
        address: Address,
    },

    #[error("Value \"{value}\" for parameter \"{parameter}\" is invalid for {address}")]
    InvalidParameter {
        parameter: String,
        value: String,
        address: Address,
        #[source]
        source: SchemaMismatch,
    },
}

#[derive(Debug, Error)]
pub enum InvalidQueryArgs {
    #[error("Missing required argument \"{name}\" for {address}")]
    MissingArgument { name: String, address: Address },

    #[error("Value \"{value}\" for argument \"{name}\" is invalid for {address}")]
    InvalidArgument {
        name: String,
        value: String,
        address: Address,
        #[source]
        source: SchemaMismatch,
    },
}

#[derive(Debug, Error)]
pub enum InvalidHeaders {
    #[error("Missing required header \"{header}\" for {address}")]
    MissingHeader { header: String, address: Address },

    #[error("Value \"{value}\" for header \"{header}\" is invalid for {address}")]
    InvalidHeaderValue {
        header: String,
        value: String,
        address: Address,
        #[source]
        source: SchemaMismatch,
    },
}

#[derive(Debug, Error)]
pub enum InvalidCookies {
    #[error("Missing required cookie \"{cookie}\" for {address}")]
    MissingCookie { cookie: String, address: Address },

    #[error("Value \"{value}\" for cookie \"{cookie}\" is invalid for {address}")]
    InvalidCookieValue {
        cookie: String,
        value: String,
        address: Address,
        #[source]
        source: SchemaMismatch,
    },
}

#[derive(Debug, Error)]
pub enum InvalidBody {
    #[error("Content-Type \"{content_type}\" is not expected for {address}")]
    ContentTypeNotExpected {
        content_type: String,
        address: Address,
    },

    #[error("Required body is missing for {address}")]
    RequiredBodyMissing { address: Address },

    #[error("JSON parsing failed with \"{error}\" for {address}")]
    NotValidJson { error: String, address: Address },

    #[error("Multipart parsing failed with \"{error}\" for {address}")]
    NotValidMultipart { error: String, address: Address },

    #[error("Body does not match schema for content-type \"{content_type}\" for {address}")]
    DoesNotMatchSchema {
        content_type: String,
        address: Address,
        #[source]
        source: SchemaMismatch,
    },
}

#[derive(Debug, Error)]
pub enum InvalidSecurity {
    /// Individual group failures are deliberately not reported, only the
    /// aggregate outcome
    #[error("No security scheme matched for {address}")]
    NoSchemeMatched { address: Address },
}
