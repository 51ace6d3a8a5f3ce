mod address;
mod body;
mod cookies;
mod error;
mod finder;
mod headers;
mod message;
mod path;
mod query;
mod security;
mod validator;

pub use address::{Address, CallbackAddress, OperationAddress, ResponseAddress};
pub use body::BodyValidator;
pub use cookies::CookiesValidator;
pub use error::{
    InvalidBody, InvalidCookies, InvalidHeaders, InvalidPath, InvalidQueryArgs, InvalidSecurity,
    ValidationFailed,
};
pub use finder::SpecFinder;
pub use headers::HeadersValidator;
pub use path::PathValidator;
pub use query::QueryArgumentsValidator;
pub use security::SecurityValidator;
pub use validator::{RequestValidator, ResponseValidator};
