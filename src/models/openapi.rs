use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// OpenAPI specification root object (the 3.0.x subset the validators consume)
/// https://spec.openapis.org/oas/v3.0.3
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenApiSpec {
    /// The version of the OpenAPI Specification (e.g., "3.0.0")
    pub openapi: String,

    /// Metadata about the API
    pub info: Info,

    /// Server connectivity information
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<Server>,

    /// The available paths and operations for the API
    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,

    /// Reusable components (schemas, security schemes)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<Components>,

    /// Global security requirements, applied to every operation that does
    /// not declare its own
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security: Option<Vec<SecurityRequirement>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Info {
    /// The title of the API
    pub title: String,

    /// A description of the API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// The version of the API document
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    /// A URL to the target host
    pub url: String,

    /// An optional description of the host
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Reusable objects referenced from the rest of the document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Components {
    /// Named schemas, addressable as `#/components/schemas/{name}`
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub schemas: IndexMap<String, SchemaNode>,

    /// Named security schemes referenced by security requirements
    #[serde(
        default,
        skip_serializing_if = "IndexMap::is_empty",
        rename = "securitySchemes"
    )]
    pub security_schemes: IndexMap<String, SecurityScheme>,
}

/// The operations available on a single path
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Operation>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<Operation>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace: Option<Operation>,

    /// Parameters applicable to every operation under this path; an
    /// operation-level parameter with the same name and location wins
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
}

impl PathItem {
    /// The operation declared for the given HTTP method, if any
    pub fn operation(&self, method: &http::Method) -> Option<&Operation> {
        match method.as_str() {
            "GET" => self.get.as_ref(),
            "PUT" => self.put.as_ref(),
            "POST" => self.post.as_ref(),
            "DELETE" => self.delete.as_ref(),
            "OPTIONS" => self.options.as_ref(),
            "HEAD" => self.head.as_ref(),
            "PATCH" => self.patch.as_ref(),
            "TRACE" => self.trace.as_ref(),
            _ => None,
        }
    }
}

/// A single API operation on a path
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Operation {
    /// Unique identifier for the operation
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "operationId")]
    pub operation_id: Option<String>,

    /// A short summary of the operation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// Parameters declared directly on this operation
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,

    /// The request body expected by this operation
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "requestBody")]
    pub request_body: Option<RequestBody>,

    /// Possible responses, keyed by status code, status range (e.g. "2XX"),
    /// or "default"
    #[serde(default)]
    pub responses: IndexMap<String, Response>,

    /// Out-of-band callbacks related to this operation, keyed by callback
    /// name, then by runtime expression
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub callbacks: IndexMap<String, Callback>,

    /// Security requirements overriding the global list; an empty list
    /// removes the global requirement for this operation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security: Option<Vec<SecurityRequirement>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,
}

/// A callback maps runtime expressions to the path item describing the
/// expected out-of-band request
pub type Callback = IndexMap<String, PathItem>;

/// One AND-group of a security requirement: every named scheme must be
/// satisfied simultaneously; scopes are listed but not checked
pub type SecurityRequirement = IndexMap<String, Vec<String>>;

/// A parameter in one of the four HTTP locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    /// The name of the parameter
    pub name: String,

    /// The location of the parameter
    #[serde(rename = "in")]
    pub location: ParameterLocation,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Whether the parameter must be present; path parameters are always
    /// required
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    /// Serialization style (form, simple, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,

    /// Whether array values generate separate parameters per element; when
    /// absent, the location's default applies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explode: Option<bool>,

    /// The schema defining the parameter's type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaNode>,

    /// Alternative to `schema` for complex serializations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<IndexMap<String, MediaType>>,
}

impl Parameter {
    /// Whether this parameter must be present in the message
    pub fn is_required(&self) -> bool {
        self.location == ParameterLocation::Path || self.required.unwrap_or(false)
    }

    /// The effective explode flag, falling back to the location default
    /// (form style for query and cookie, simple style for path and header)
    pub fn effective_explode(&self) -> bool {
        self.explode.unwrap_or(match self.location {
            ParameterLocation::Query | ParameterLocation::Cookie => true,
            ParameterLocation::Path | ParameterLocation::Header => false,
        })
    }
}

/// The location of a parameter or API key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Query,
    Header,
    Path,
    Cookie,
}

impl std::fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParameterLocation::Query => write!(f, "query"),
            ParameterLocation::Header => write!(f, "header"),
            ParameterLocation::Path => write!(f, "path"),
            ParameterLocation::Cookie => write!(f, "cookie"),
        }
    }
}

/// The request body expected by an operation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Body content, keyed by media type (e.g. "application/json");
    /// wildcard keys such as "text/*" are allowed
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,

    /// Whether the body must be present in the request
    #[serde(default)]
    pub required: bool,
}

/// Schema and encoding for one media type of a body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaType {
    /// The schema describing the decoded body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaNode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,

    /// Per-property serialization overrides for urlencoded and multipart
    /// bodies; accepted but their serialization rules are not enforced
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub encoding: IndexMap<String, Encoding>,
}

/// Serialization override for one property of an urlencoded or multipart body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Encoding {
    /// Content type for the property; for multipart bodies this selects how
    /// the part's content is decoded
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "contentType")]
    pub content_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explode: Option<bool>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub headers: IndexMap<String, Header>,
}

/// A single response of an operation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Response {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Headers expected on the response, keyed by header name
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub headers: IndexMap<String, Header>,

    /// Body content, keyed by media type
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub content: IndexMap<String, MediaType>,
}

/// A response header declaration (a parameter without name and location)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Header {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explode: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaNode>,
}

/// A named authentication scheme
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityScheme {
    /// The type of the scheme
    #[serde(rename = "type")]
    pub scheme_type: SecuritySchemeType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// The name of the header, query or cookie parameter (apiKey)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// The location of the API key (apiKey)
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "in")]
    pub location: Option<ParameterLocation>,

    /// The HTTP authorization scheme (http): "basic", "bearer", ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none", rename = "bearerFormat")]
    pub bearer_format: Option<String>,

    /// OAuth2 flow configuration; carried but not interpreted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flows: Option<Value>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        rename = "openIdConnectUrl"
    )]
    pub open_id_connect_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SecuritySchemeType {
    #[serde(rename = "http")]
    Http,
    #[serde(rename = "apiKey")]
    ApiKey,
    #[serde(rename = "oauth2")]
    OAuth2,
    #[serde(rename = "openIdConnect")]
    OpenIdConnect,
    #[serde(rename = "mutualTLS")]
    MutualTls,
}

/// A schema node: the keywords the structural validator evaluates, plus
/// annotations carried for completeness
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaNode {
    /// Symbolic reference to a component schema
    /// (`#/components/schemas/{name}`); when present, all other keywords on
    /// this node are ignored
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "$ref")]
    pub reference: Option<String>,

    /// The declared type; when absent the schema is type-agnostic
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "type")]
    pub schema_type: Option<SchemaType>,

    /// Format hint (e.g. "date-time", "int64"); not semantically enforced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Whether null is an acceptable value (OpenAPI 3.0 form)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,

    /// Regular expression a string value must match (unanchored)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none", rename = "minLength")]
    pub min_length: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none", rename = "maxLength")]
    pub max_length: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,

    /// Whether `minimum` is an exclusive bound (OpenAPI 3.0 boolean form)
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        rename = "exclusiveMinimum"
    )]
    pub exclusive_minimum: Option<bool>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        rename = "exclusiveMaximum"
    )]
    pub exclusive_maximum: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none", rename = "multipleOf")]
    pub multiple_of: Option<f64>,

    /// Closed list of acceptable values, compared by deep equality
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "enum")]
    pub enum_values: Option<Vec<Value>>,

    /// Property names that must be present in an object value
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    /// Declared object properties
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, SchemaNode>,

    /// Policy for object keys not listed in `properties`
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        rename = "additionalProperties"
    )]
    pub additional_properties: Option<AdditionalProperties>,

    /// Schema every array element must satisfy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaNode>>,

    #[serde(default, skip_serializing_if = "Option::is_none", rename = "minItems")]
    pub min_items: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none", rename = "maxItems")]
    pub max_items: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none", rename = "uniqueItems")]
    pub unique_items: Option<bool>,

    /// The value must satisfy every listed schema
    #[serde(default, skip_serializing_if = "Vec::is_empty", rename = "allOf")]
    pub all_of: Vec<SchemaNode>,

    /// The value must satisfy exactly one listed schema
    #[serde(default, skip_serializing_if = "Vec::is_empty", rename = "oneOf")]
    pub one_of: Vec<SchemaNode>,

    /// The value must satisfy at least one listed schema
    #[serde(default, skip_serializing_if = "Vec::is_empty", rename = "anyOf")]
    pub any_of: Vec<SchemaNode>,

    /// The value must not satisfy this schema
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not: Option<Box<SchemaNode>>,

    /// Selects the oneOf branch by a named property instead of exhaustive
    /// search
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<Discriminator>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none", rename = "readOnly")]
    pub read_only: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none", rename = "writeOnly")]
    pub write_only: Option<bool>,
}

/// Policy for object keys not declared in `properties`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    /// `true` accepts any extra key, `false` rejects all of them
    Allowed(bool),

    /// Extra keys are accepted when their values satisfy this schema
    Schema(Box<SchemaNode>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Discriminator {
    /// The property whose value names the target schema
    #[serde(rename = "propertyName")]
    pub property_name: String,

    /// Maps property values to schema names or references; an unmapped
    /// value is treated as a component schema name
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub mapping: IndexMap<String, String>,
}

/// The declared type of a schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
    Null,
}

impl std::fmt::Display for SchemaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaType::String => write!(f, "string"),
            SchemaType::Number => write!(f, "number"),
            SchemaType::Integer => write!(f, "integer"),
            SchemaType::Boolean => write!(f, "boolean"),
            SchemaType::Array => write!(f, "array"),
            SchemaType::Object => write!(f, "object"),
            SchemaType::Null => write!(f, "null"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_schema_node() {
        let yaml = r#"
type: object
required: [id]
properties:
  id:
    type: integer
    minimum: 1
  tags:
    type: array
    items:
      type: string
      pattern: "^[a-z]+$"
additionalProperties: false
"#;

        let schema: SchemaNode = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(schema.schema_type, Some(SchemaType::Object));
        assert_eq!(schema.required, vec!["id".to_string()]);
        assert_eq!(
            schema.properties["id"].schema_type,
            Some(SchemaType::Integer)
        );
        assert_eq!(schema.properties["id"].minimum, Some(1.0));
        assert!(matches!(
            schema.additional_properties,
            Some(AdditionalProperties::Allowed(false))
        ));
    }

    #[test]
    fn test_parse_parameter_defaults() {
        let yaml = r#"
name: ids
in: query
required: true
explode: false
schema:
  type: array
  items:
    type: integer
"#;

        let param: Parameter = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(param.location, ParameterLocation::Query);
        assert!(param.is_required());
        assert!(!param.effective_explode());

        // The location default applies when explode is absent
        let yaml = "name: limit\nin: query\nschema:\n  type: integer\n";
        let param: Parameter = serde_yaml::from_str(yaml).unwrap();
        assert!(param.effective_explode());
        assert!(!param.is_required());
    }

    #[test]
    fn test_parse_security_scheme() {
        let yaml = "type: apiKey\nname: api_key\nin: cookie\n";
        let scheme: SecurityScheme = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(scheme.scheme_type, SecuritySchemeType::ApiKey);
        assert_eq!(scheme.location, Some(ParameterLocation::Cookie));

        let yaml = "type: http\nscheme: basic\n";
        let scheme: SecurityScheme = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(scheme.scheme_type, SecuritySchemeType::Http);
        assert_eq!(scheme.scheme.as_deref(), Some("basic"));
    }

    #[test]
    fn test_path_item_operation_lookup() {
        let yaml = r#"
get:
  operationId: listPets
post:
  operationId: createPet
"#;

        let item: PathItem = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            item.operation(&http::Method::GET)
                .and_then(|op| op.operation_id.as_deref()),
            Some("listPets")
        );
        assert!(item.operation(&http::Method::DELETE).is_none());
    }
}
