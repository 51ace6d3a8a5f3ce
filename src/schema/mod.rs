mod breadcrumb;
mod coerce;
mod error;
mod keywords;
mod validator;

pub use breadcrumb::{Breadcrumb, Segment};
pub use coerce::ValidationStrategy;
pub use error::{InvalidSchema, KeywordMismatch, SchemaMismatch, TypeMismatch};
pub use validator::SchemaValidator;

pub(crate) use coerce::split_unexploded;
