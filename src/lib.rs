pub mod error;
pub mod loader;
pub mod models;
pub mod schema;
pub mod validation;

pub use error::{Result, TollgateError};
