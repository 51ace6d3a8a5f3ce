use thiserror::Error;

use super::breadcrumb::Breadcrumb;
use crate::models::SchemaType;

/// Why a value disagreed with a schema.
///
/// Every mismatch is traceable to exactly one breadcrumb and, for keyword
/// failures, one keyword name; tests assert against both.
#[derive(Debug, Clone, Error)]
pub enum SchemaMismatch {
    #[error(transparent)]
    Keyword(#[from] KeywordMismatch),

    #[error(transparent)]
    Type(#[from] TypeMismatch),

    #[error(transparent)]
    Schema(#[from] InvalidSchema),
}

impl SchemaMismatch {
    /// The failing keyword name, when a keyword failed
    pub fn keyword(&self) -> Option<&str> {
        match self {
            SchemaMismatch::Keyword(mismatch) => Some(mismatch.keyword),
            _ => None,
        }
    }

    /// Where inside the value the mismatch occurred
    pub fn breadcrumb(&self) -> Option<&Breadcrumb> {
        match self {
            SchemaMismatch::Keyword(mismatch) => Some(&mismatch.breadcrumb),
            SchemaMismatch::Type(mismatch) => Some(&mismatch.breadcrumb),
            SchemaMismatch::Schema(_) => None,
        }
    }
}

/// A specific keyword constraint failed
#[derive(Debug, Clone, Error)]
#[error("Keyword validation failed: {message}")]
pub struct KeywordMismatch {
    /// The keyword that failed (e.g. "pattern", "oneOf")
    pub keyword: &'static str,

    /// Where inside the value the keyword failed
    pub breadcrumb: Breadcrumb,

    pub message: String,

    /// The underlying mismatch, for composition keywords that wrap a
    /// sub-schema failure
    #[source]
    pub cause: Option<Box<SchemaMismatch>>,
}

impl KeywordMismatch {
    pub fn new(keyword: &'static str, breadcrumb: &Breadcrumb, message: impl Into<String>) -> Self {
        Self {
            keyword,
            breadcrumb: breadcrumb.clone(),
            message: message.into(),
            cause: None,
        }
    }

    pub fn with_cause(
        keyword: &'static str,
        breadcrumb: &Breadcrumb,
        message: impl Into<String>,
        cause: SchemaMismatch,
    ) -> Self {
        Self {
            keyword,
            breadcrumb: breadcrumb.clone(),
            message: message.into(),
            cause: Some(Box::new(cause)),
        }
    }
}

/// The value's runtime shape does not match the schema's declared type
#[derive(Debug, Clone, Error)]
#[error("Value expected to be of type \"{expected}\", but \"{actual}\" given")]
pub struct TypeMismatch {
    /// The type the schema declared
    pub expected: SchemaType,

    /// The shape the value (or, for eager checks, the schema) actually had
    pub actual: String,

    pub breadcrumb: Breadcrumb,
}

impl TypeMismatch {
    pub fn new(expected: SchemaType, actual: impl Into<String>, breadcrumb: &Breadcrumb) -> Self {
        Self {
            expected,
            actual: actual.into(),
            breadcrumb: breadcrumb.clone(),
        }
    }
}

/// The schema itself is inconsistent: a broken specification, not a bad
/// message
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct InvalidSchema {
    pub message: String,
}

impl InvalidSchema {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn unknown_reference(reference: &str) -> Self {
        Self::new(format!("Unresolvable schema reference \"{reference}\""))
    }

    pub fn unknown_security_scheme(name: &str) -> Self {
        Self::new(format!(
            "Mentioned security scheme \"{name}\" not found in the given spec"
        ))
    }
}
