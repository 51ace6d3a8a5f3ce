pub mod openapi;

pub use openapi::{
    AdditionalProperties, Callback, Components, Discriminator, Encoding, Header, Info, MediaType,
    OpenApiSpec, Operation, Parameter, ParameterLocation, PathItem, RequestBody, Response,
    SchemaNode, SchemaType, SecurityRequirement, SecurityScheme, SecuritySchemeType, Server,
};
