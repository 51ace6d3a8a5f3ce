use std::fmt;

use http::Method;
use indexmap::IndexMap;

/// One (path template, method) pair of the contract.
///
/// Constructed once per validation call from the resolved route; used both
/// as a lookup key into the spec and as the subject of every error message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OperationAddress {
    path: String,
    method: Method,
}

impl OperationAddress {
    pub fn new(path: impl Into<String>, method: Method) -> Self {
        Self {
            path: path.into(),
            method,
        }
    }

    /// The path template, e.g. "/users/{id}"
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Capture the template's parameter values from a concrete URL path.
    /// Returns `None` when the path does not fit the template.
    pub fn capture_path_params(&self, concrete: &str) -> Option<IndexMap<String, String>> {
        let concrete = concrete.split('?').next().unwrap_or(concrete);
        let template_segments: Vec<&str> = self.path.trim_matches('/').split('/').collect();
        let concrete_segments: Vec<&str> = concrete.trim_matches('/').split('/').collect();

        if template_segments.len() != concrete_segments.len() {
            return None;
        }

        let mut captured = IndexMap::new();
        for (template, actual) in template_segments.iter().zip(&concrete_segments) {
            if let Some(name) = template
                .strip_prefix('{')
                .and_then(|rest| rest.strip_suffix('}'))
            {
                captured.insert(name.to_string(), (*actual).to_string());
            } else if template != actual {
                return None;
            }
        }

        Some(captured)
    }
}

impl fmt::Display for OperationAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Request [{} {}]",
            self.method.as_str().to_lowercase(),
            self.path
        )
    }
}

/// An operation address narrowed to one of its responses
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResponseAddress {
    path: String,
    method: Method,
    status_code: u16,
}

impl ResponseAddress {
    pub fn new(path: impl Into<String>, method: Method, status_code: u16) -> Self {
        Self {
            path: path.into(),
            method,
            status_code,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }
}

impl fmt::Display for ResponseAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Response [{} {} {}]",
            self.method.as_str().to_lowercase(),
            self.path,
            self.status_code
        )
    }
}

/// An operation address narrowed to one of its out-of-band callbacks
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallbackAddress {
    path: String,
    method: Method,
    callback_name: String,
    callback_method: Method,
}

impl CallbackAddress {
    pub fn new(
        path: impl Into<String>,
        method: Method,
        callback_name: impl Into<String>,
        callback_method: Method,
    ) -> Self {
        Self {
            path: path.into(),
            method,
            callback_name: callback_name.into(),
            callback_method,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn callback_name(&self) -> &str {
        &self.callback_name
    }

    pub fn callback_method(&self) -> &Method {
        &self.callback_method
    }
}

impl fmt::Display for CallbackAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Callback [{} {} {} {}]",
            self.method.as_str().to_lowercase(),
            self.path,
            self.callback_name,
            self.callback_method.as_str().to_lowercase()
        )
    }
}

/// Any of the three address kinds, for error reporting and spec lookup
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Address {
    Operation(OperationAddress),
    Response(ResponseAddress),
    Callback(CallbackAddress),
}

impl Address {
    /// The path template the address lives under
    pub fn path(&self) -> &str {
        match self {
            Address::Operation(addr) => addr.path(),
            Address::Response(addr) => addr.path(),
            Address::Callback(addr) => addr.path(),
        }
    }
}

impl From<OperationAddress> for Address {
    fn from(addr: OperationAddress) -> Self {
        Address::Operation(addr)
    }
}

impl From<ResponseAddress> for Address {
    fn from(addr: ResponseAddress) -> Self {
        Address::Response(addr)
    }
}

impl From<CallbackAddress> for Address {
    fn from(addr: CallbackAddress) -> Self {
        Address::Callback(addr)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Operation(addr) => addr.fmt(f),
            Address::Response(addr) => addr.fmt(f),
            Address::Callback(addr) => addr.fmt(f),
        }
    }
}
