use std::sync::Arc;

use indexmap::IndexMap;

use super::address::{Address, ResponseAddress};
use super::error::ValidationFailed;
use crate::models::{
    OpenApiSpec, Operation, Parameter, ParameterLocation, PathItem, RequestBody, Response,
    SchemaNode, SecurityRequirement, SecurityScheme,
};
use crate::schema::{SchemaValidator, ValidationStrategy};

/// Resolves addresses to the schema fragments the location validators need.
///
/// Holds the parsed specification as a shared read-only snapshot; an
/// address that does not resolve yields `ValidationFailed::NoOperation`,
/// which signals a caller/configuration problem rather than a bad message.
#[derive(Debug, Clone)]
pub struct SpecFinder {
    spec: Arc<OpenApiSpec>,
}

impl SpecFinder {
    pub fn new(spec: Arc<OpenApiSpec>) -> Self {
        Self { spec }
    }

    pub fn spec(&self) -> &OpenApiSpec {
        &self.spec
    }

    /// The component schema registry, for `$ref` and discriminator
    /// resolution
    pub fn schemas(&self) -> Option<&IndexMap<String, SchemaNode>> {
        self.spec.components.as_ref().map(|c| &c.schemas)
    }

    /// The path item and operation an address resolves to
    fn find_route(&self, address: &Address) -> Result<(&PathItem, &Operation), ValidationFailed> {
        let not_found = || ValidationFailed::NoOperation(address.clone());

        let path_item = self.spec.paths.get(address.path()).ok_or_else(not_found)?;

        match address {
            Address::Operation(addr) => {
                let operation = path_item.operation(addr.method()).ok_or_else(not_found)?;
                Ok((path_item, operation))
            }
            Address::Response(addr) => {
                let operation = path_item.operation(addr.method()).ok_or_else(not_found)?;
                Ok((path_item, operation))
            }
            Address::Callback(addr) => {
                let operation = path_item.operation(addr.method()).ok_or_else(not_found)?;
                // The address carries no runtime expression, so the
                // callback's first declared expression entry is used
                let callback_item = operation
                    .callbacks
                    .get(addr.callback_name())
                    .and_then(|callback| callback.values().next())
                    .ok_or_else(not_found)?;
                let callback_operation = callback_item
                    .operation(addr.callback_method())
                    .ok_or_else(not_found)?;
                Ok((callback_item, callback_operation))
            }
        }
    }

    pub fn find_operation(&self, address: &Address) -> Result<&Operation, ValidationFailed> {
        self.find_route(address).map(|(_, operation)| operation)
    }

    /// Path-item and operation parameters, merged: an operation-level
    /// parameter overrides a path-level one with the same name and location
    pub fn find_parameters(
        &self,
        address: &Address,
    ) -> Result<IndexMap<(String, ParameterLocation), &Parameter>, ValidationFailed> {
        let (path_item, operation) = self.find_route(address)?;

        let mut merged = IndexMap::new();
        for parameter in path_item.parameters.iter().chain(&operation.parameters) {
            merged.insert((parameter.name.clone(), parameter.location), parameter);
        }
        Ok(merged)
    }

    fn find_location_specs(
        &self,
        address: &Address,
        location: ParameterLocation,
    ) -> Result<IndexMap<String, &Parameter>, ValidationFailed> {
        Ok(self
            .find_parameters(address)?
            .into_iter()
            .filter(|((_, loc), _)| *loc == location)
            .map(|((name, _), parameter)| (name, parameter))
            .collect())
    }

    pub fn find_query_specs(
        &self,
        address: &Address,
    ) -> Result<IndexMap<String, &Parameter>, ValidationFailed> {
        self.find_location_specs(address, ParameterLocation::Query)
    }

    pub fn find_header_specs(
        &self,
        address: &Address,
    ) -> Result<IndexMap<String, &Parameter>, ValidationFailed> {
        self.find_location_specs(address, ParameterLocation::Header)
    }

    pub fn find_cookie_specs(
        &self,
        address: &Address,
    ) -> Result<IndexMap<String, &Parameter>, ValidationFailed> {
        self.find_location_specs(address, ParameterLocation::Cookie)
    }

    pub fn find_path_specs(
        &self,
        address: &Address,
    ) -> Result<IndexMap<String, &Parameter>, ValidationFailed> {
        self.find_location_specs(address, ParameterLocation::Path)
    }

    /// The request body declaration of the operation, when it has one
    pub fn find_body_spec(
        &self,
        address: &Address,
    ) -> Result<Option<&RequestBody>, ValidationFailed> {
        Ok(self.find_operation(address)?.request_body.as_ref())
    }

    /// The response spec for a status code: exact match first, then a
    /// range key such as "2XX", then "default"
    pub fn find_response_spec(
        &self,
        address: &ResponseAddress,
    ) -> Result<&Response, ValidationFailed> {
        let operation = self.find_operation(&Address::Response(address.clone()))?;

        let status = address.status_code();
        let range = format!("{}XX", status / 100);

        operation
            .responses
            .get(&status.to_string())
            .or_else(|| operation.responses.get(&range))
            .or_else(|| operation.responses.get("default"))
            .ok_or_else(|| ValidationFailed::NoOperation(Address::Response(address.clone())))
    }

    /// The security requirements in effect for an address: the operation's
    /// own list when declared (an empty list removes authentication),
    /// otherwise the global list
    pub fn find_security_specs(
        &self,
        address: &Address,
    ) -> Result<&[SecurityRequirement], ValidationFailed> {
        let operation = self.find_operation(address)?;
        Ok(operation
            .security
            .as_deref()
            .or(self.spec.security.as_deref())
            .unwrap_or(&[]))
    }

    /// A structural validator wired to this spec's component registry
    pub fn schema_validator(&self, strategy: ValidationStrategy) -> SchemaValidator<'_> {
        match self.schemas() {
            Some(schemas) => SchemaValidator::with_schemas(strategy, schemas),
            None => SchemaValidator::new(strategy),
        }
    }

    /// The global security scheme registry
    pub fn find_security_schemes(&self) -> Option<&IndexMap<String, SecurityScheme>> {
        self.spec
            .components
            .as_ref()
            .map(|components| &components.security_schemes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::address::OperationAddress;
    use http::Method;

    fn finder(yaml: &str) -> SpecFinder {
        SpecFinder::new(Arc::new(serde_yaml::from_str(yaml).unwrap()))
    }

    const SPEC: &str = r#"
openapi: 3.0.0
info:
  title: Test API
  version: '1.0'
security:
  - global_key: []
paths:
  /pets/{petId}:
    parameters:
      - name: petId
        in: path
        required: true
        schema:
          type: integer
      - name: verbose
        in: query
        schema:
          type: boolean
    get:
      parameters:
        - name: verbose
          in: query
          schema:
            type: string
      security: []
      responses:
        '200':
          description: OK
        '4XX':
          description: client error
        default:
          description: fallback
"#;

    #[test]
    fn test_merges_path_and_operation_parameters() {
        let finder = finder(SPEC);
        let address = Address::from(OperationAddress::new("/pets/{petId}", Method::GET));

        let query = finder.find_query_specs(&address).unwrap();
        // The operation-level declaration wins over the path-level one
        assert_eq!(
            query["verbose"].schema.as_ref().unwrap().schema_type,
            Some(crate::models::SchemaType::String)
        );

        let path = finder.find_path_specs(&address).unwrap();
        assert!(path.contains_key("petId"));
    }

    #[test]
    fn test_unknown_address_is_a_contract_error() {
        let finder = finder(SPEC);
        let address = Address::from(OperationAddress::new("/nope", Method::GET));

        assert!(matches!(
            finder.find_query_specs(&address).unwrap_err(),
            ValidationFailed::NoOperation(_)
        ));
    }

    #[test]
    fn test_response_spec_fallbacks() {
        let finder = finder(SPEC);

        let exact = ResponseAddress::new("/pets/{petId}", Method::GET, 200);
        assert_eq!(
            finder.find_response_spec(&exact).unwrap().description.as_deref(),
            Some("OK")
        );

        let range = ResponseAddress::new("/pets/{petId}", Method::GET, 404);
        assert_eq!(
            finder.find_response_spec(&range).unwrap().description.as_deref(),
            Some("client error")
        );

        let fallback = ResponseAddress::new("/pets/{petId}", Method::GET, 500);
        assert_eq!(
            finder
                .find_response_spec(&fallback)
                .unwrap()
                .description
                .as_deref(),
            Some("fallback")
        );
    }

    #[test]
    fn test_operation_security_overrides_global() {
        let finder = finder(SPEC);
        let address = Address::from(OperationAddress::new("/pets/{petId}", Method::GET));

        // The operation declares an empty list, removing the global
        // requirement
        assert!(finder.find_security_specs(&address).unwrap().is_empty());
    }
}
