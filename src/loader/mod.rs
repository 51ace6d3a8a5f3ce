use std::fs;
use std::path::Path;

use crate::error::{Result, TollgateError};
use crate::models::OpenApiSpec;

/// Load an OpenAPI specification from a YAML or JSON file
pub fn load_spec<P: AsRef<Path>>(path: P) -> Result<OpenApiSpec> {
    let path = path.as_ref();

    let content = fs::read_to_string(path).map_err(|e| {
        TollgateError::SpecLoadError(format!("Failed to read file {}: {}", path.display(), e))
    })?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        from_json(&content)
    } else {
        from_yaml(&content)
    }
}

/// Parse an OpenAPI specification from YAML text
pub fn from_yaml(content: &str) -> Result<OpenApiSpec> {
    let spec: OpenApiSpec = serde_yaml::from_str(content).map_err(|e| {
        TollgateError::SpecLoadError(format!("Failed to parse OpenAPI YAML: {}", e))
    })?;

    validate_spec(&spec)?;

    Ok(spec)
}

/// Parse an OpenAPI specification from JSON text
pub fn from_json(content: &str) -> Result<OpenApiSpec> {
    let spec: OpenApiSpec = serde_json::from_str(content).map_err(|e| {
        TollgateError::SpecLoadError(format!("Failed to parse OpenAPI JSON: {}", e))
    })?;

    validate_spec(&spec)?;

    Ok(spec)
}

/// Validate the OpenAPI specification
fn validate_spec(spec: &OpenApiSpec) -> Result<()> {
    // Check version
    if !spec.openapi.starts_with("3.0") && !spec.openapi.starts_with("3.1") {
        return Err(TollgateError::ValidationError(format!(
            "Unsupported OpenAPI version: {}. Only 3.0.x and 3.1.x are supported.",
            spec.openapi
        )));
    }

    // Check that there are paths defined
    if spec.paths.is_empty() {
        return Err(TollgateError::ValidationError(
            "OpenAPI spec must have at least one path".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_valid_spec() {
        let yaml = r#"
openapi: 3.0.0
info:
  title: Test API
  version: 1.0.0
paths:
  /test:
    get:
      operationId: getTest
      responses:
        '200':
          description: OK
"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        let result = load_spec(file.path());
        assert!(result.is_ok());

        let spec = result.unwrap();
        assert_eq!(spec.info.title, "Test API");
        assert_eq!(spec.openapi, "3.0.0");
    }

    #[test]
    fn test_load_invalid_version() {
        let yaml = r#"
openapi: 2.0.0
info:
  title: Test API
  version: 1.0.0
paths:
  /test:
    get:
      responses:
        '200':
          description: OK
"#;

        assert!(from_yaml(yaml).is_err());
    }

    #[test]
    fn test_load_no_paths() {
        let yaml = r#"
openapi: 3.0.0
info:
  title: Test API
  version: 1.0.0
paths: {}
"#;

        assert!(from_yaml(yaml).is_err());
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = load_spec("/nonexistent/file.yaml");
        assert!(result.is_err());
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
  "openapi": "3.0.0",
  "info": {"title": "Test API", "version": "1.0.0"},
  "paths": {"/test": {"get": {"responses": {"200": {"description": "OK"}}}}}
}"#;

        let spec = from_json(json).unwrap();
        assert!(spec.paths.contains_key("/test"));
    }
}
