use indexmap::IndexMap;
use serde_json::Value;

use super::breadcrumb::Breadcrumb;
use super::coerce::{self, ValidationStrategy};
use super::error::{InvalidSchema, KeywordMismatch, SchemaMismatch, TypeMismatch};
use super::keywords::{self, Keyword};
use crate::models::{AdditionalProperties, Discriminator, SchemaNode, SchemaType};

/// Checks a decoded value against a schema node, recursively, tracking the
/// exact location of any mismatch.
///
/// Purely evaluative: no state survives a call, so one validator can be
/// shared across concurrent validations of the same spec snapshot.
pub struct SchemaValidator<'s> {
    strategy: ValidationStrategy,
    schemas: Option<&'s IndexMap<String, SchemaNode>>,
}

impl<'s> SchemaValidator<'s> {
    pub fn new(strategy: ValidationStrategy) -> Self {
        Self {
            strategy,
            schemas: None,
        }
    }

    /// A validator that can resolve `#/components/schemas/{name}`
    /// references and discriminator mappings against a component registry
    pub fn with_schemas(
        strategy: ValidationStrategy,
        schemas: &'s IndexMap<String, SchemaNode>,
    ) -> Self {
        Self {
            strategy,
            schemas: Some(schemas),
        }
    }

    pub fn validate(&self, value: &Value, schema: &SchemaNode) -> Result<(), SchemaMismatch> {
        self.validate_at(value, schema, &Breadcrumb::root())
    }

    pub fn validate_at(
        &self,
        value: &Value,
        schema: &SchemaNode,
        breadcrumb: &Breadcrumb,
    ) -> Result<(), SchemaMismatch> {
        if let Some(reference) = &schema.reference {
            let target = self.resolve_reference(reference)?;
            return self.validate_at(value, target, breadcrumb);
        }

        // Coercion only ever helps a string reach its declared scalar type;
        // a failed parse leaves the original value to fail the type check.
        let coerced;
        let value = match self.strategy {
            ValidationStrategy::Cast => match coerce::cast(value, schema) {
                Some(cast) => {
                    coerced = cast;
                    &coerced
                }
                None => value,
            },
            ValidationStrategy::Strict => value,
        };

        if value.is_null() && is_nullable(schema) {
            return Ok(());
        }

        if let Some(declared) = schema.schema_type {
            if !type_matches(value, declared) {
                return Err(TypeMismatch::new(declared, shape_name(value), breadcrumb).into());
            }
        }

        for keyword in keywords::collect(schema) {
            self.check_keyword(keyword, value, breadcrumb)?;
        }

        Ok(())
    }

    /// The single ordered dispatcher over the keyword union. Each keyword
    /// applies only when the value has a compatible shape; on incompatible
    /// shapes the keyword is skipped (the type check has already handled
    /// declared types).
    fn check_keyword(
        &self,
        keyword: Keyword<'_>,
        value: &Value,
        breadcrumb: &Breadcrumb,
    ) -> Result<(), SchemaMismatch> {
        match keyword {
            Keyword::Pattern(pattern) => {
                let Some(text) = value.as_str() else {
                    return Ok(());
                };
                let regex = regex::Regex::new(pattern).map_err(|e| {
                    InvalidSchema::new(format!("Invalid pattern \"{pattern}\": {e}"))
                })?;
                if !regex.is_match(text) {
                    return Err(KeywordMismatch::new(
                        "pattern",
                        breadcrumb,
                        format!("Value does not match pattern \"{pattern}\""),
                    )
                    .into());
                }
            }
            Keyword::MinLength(min) => {
                if let Some(text) = value.as_str()
                    && (text.chars().count() as u64) < min
                {
                    return Err(KeywordMismatch::new(
                        "minLength",
                        breadcrumb,
                        format!("Value must be at least {min} characters long"),
                    )
                    .into());
                }
            }
            Keyword::MaxLength(max) => {
                if let Some(text) = value.as_str()
                    && (text.chars().count() as u64) > max
                {
                    return Err(KeywordMismatch::new(
                        "maxLength",
                        breadcrumb,
                        format!("Value must be at most {max} characters long"),
                    )
                    .into());
                }
            }
            Keyword::Minimum { limit, exclusive } => {
                if let Some(number) = value.as_f64() {
                    let failed = if exclusive {
                        number <= limit
                    } else {
                        number < limit
                    };
                    if failed {
                        return Err(KeywordMismatch::new(
                            "minimum",
                            breadcrumb,
                            format!(
                                "Value must be greater than {}{limit}",
                                if exclusive { "" } else { "or equal to " }
                            ),
                        )
                        .into());
                    }
                }
            }
            Keyword::Maximum { limit, exclusive } => {
                if let Some(number) = value.as_f64() {
                    let failed = if exclusive {
                        number >= limit
                    } else {
                        number > limit
                    };
                    if failed {
                        return Err(KeywordMismatch::new(
                            "maximum",
                            breadcrumb,
                            format!(
                                "Value must be less than {}{limit}",
                                if exclusive { "" } else { "or equal to " }
                            ),
                        )
                        .into());
                    }
                }
            }
            Keyword::MultipleOf(divisor) => {
                if let Some(number) = value.as_f64() {
                    if divisor == 0.0 {
                        return Err(
                            InvalidSchema::new("multipleOf divisor must be non-zero").into()
                        );
                    }
                    let quotient = number / divisor;
                    if (quotient - quotient.round()).abs() > 1e-9 {
                        return Err(KeywordMismatch::new(
                            "multipleOf",
                            breadcrumb,
                            format!("Value must be a multiple of {divisor}"),
                        )
                        .into());
                    }
                }
            }
            Keyword::Enum(members) => {
                if !members.contains(value) {
                    return Err(KeywordMismatch::new(
                        "enum",
                        breadcrumb,
                        "Value must be one of the enumerated values",
                    )
                    .into());
                }
            }
            Keyword::Required(names) => {
                if let Some(object) = value.as_object() {
                    for name in names {
                        if !object.contains_key(name) {
                            return Err(KeywordMismatch::new(
                                "required",
                                breadcrumb,
                                format!("Required property \"{name}\" must be present"),
                            )
                            .into());
                        }
                    }
                }
            }
            Keyword::Properties(schema) => {
                if let Some(object) = value.as_object() {
                    for (name, property_schema) in &schema.properties {
                        if let Some(property_value) = object.get(name) {
                            self.validate_at(
                                property_value,
                                property_schema,
                                &breadcrumb.key(name),
                            )?;
                        }
                    }
                }
            }
            Keyword::AdditionalProperties { policy, declared } => {
                if let Some(object) = value.as_object() {
                    for (name, extra_value) in object {
                        if declared.properties.contains_key(name) {
                            continue;
                        }
                        match policy {
                            AdditionalProperties::Allowed(true) => {}
                            AdditionalProperties::Allowed(false) => {
                                return Err(KeywordMismatch::new(
                                    "additionalProperties",
                                    breadcrumb,
                                    format!("Property \"{name}\" is not allowed"),
                                )
                                .into());
                            }
                            AdditionalProperties::Schema(schema) => {
                                self.validate_at(extra_value, schema, &breadcrumb.key(name))?;
                            }
                        }
                    }
                }
            }
            Keyword::Items(items) => {
                if let Some(elements) = value.as_array() {
                    for (index, element) in elements.iter().enumerate() {
                        self.validate_at(element, items, &breadcrumb.index(index))?;
                    }
                }
            }
            Keyword::MinItems(min) => {
                if let Some(elements) = value.as_array()
                    && (elements.len() as u64) < min
                {
                    return Err(KeywordMismatch::new(
                        "minItems",
                        breadcrumb,
                        format!("Array must have at least {min} items"),
                    )
                    .into());
                }
            }
            Keyword::MaxItems(max) => {
                if let Some(elements) = value.as_array()
                    && (elements.len() as u64) > max
                {
                    return Err(KeywordMismatch::new(
                        "maxItems",
                        breadcrumb,
                        format!("Array must have at most {max} items"),
                    )
                    .into());
                }
            }
            Keyword::UniqueItems => {
                if let Some(elements) = value.as_array() {
                    for (i, left) in elements.iter().enumerate() {
                        if elements[i + 1..].contains(left) {
                            return Err(KeywordMismatch::new(
                                "uniqueItems",
                                breadcrumb,
                                "Array items must be unique",
                            )
                            .into());
                        }
                    }
                }
            }
            Keyword::AllOf(schemas) => {
                for schema in schemas {
                    self.validate_at(value, schema, breadcrumb)?;
                }
            }
            Keyword::AnyOf(schemas) => {
                let mut last_failure = None;
                for schema in schemas {
                    match self.validate_at(value, schema, breadcrumb) {
                        Ok(()) => return Ok(()),
                        Err(failure) => last_failure = Some(failure),
                    }
                }
                let message = "Value does not match any of the anyOf schemas";
                return Err(match last_failure {
                    Some(failure) => {
                        KeywordMismatch::with_cause("anyOf", breadcrumb, message, failure)
                    }
                    None => KeywordMismatch::new("anyOf", breadcrumb, message),
                }
                .into());
            }
            Keyword::OneOf {
                schemas,
                discriminator,
            } => {
                if let Some(discriminator) = discriminator {
                    return self.check_discriminator(discriminator, value, breadcrumb);
                }

                let mut matched = 0usize;
                let mut last_failure = None;
                for schema in schemas {
                    match self.validate_at(value, schema, breadcrumb) {
                        Ok(()) => matched += 1,
                        Err(failure) => last_failure = Some(failure),
                    }
                }
                if matched != 1 {
                    let message =
                        format!("Value must match exactly one schema, but matched {matched}");
                    return Err(match last_failure {
                        Some(failure) if matched == 0 => {
                            KeywordMismatch::with_cause("oneOf", breadcrumb, message, failure)
                        }
                        _ => KeywordMismatch::new("oneOf", breadcrumb, message),
                    }
                    .into());
                }
            }
            Keyword::Not(schema) => {
                if self.validate_at(value, schema, breadcrumb).is_ok() {
                    return Err(KeywordMismatch::new(
                        "not",
                        breadcrumb,
                        "Value must not match the schema",
                    )
                    .into());
                }
            }
        }

        Ok(())
    }

    /// The discriminator-named property selects the exact schema to
    /// validate against, bypassing the exhaustive oneOf search.
    fn check_discriminator(
        &self,
        discriminator: &Discriminator,
        value: &Value,
        breadcrumb: &Breadcrumb,
    ) -> Result<(), SchemaMismatch> {
        let property = &discriminator.property_name;
        let Some(tag) = value.get(property).and_then(Value::as_str) else {
            return Err(KeywordMismatch::new(
                "discriminator",
                breadcrumb,
                format!("Discriminator property \"{property}\" must be present and a string"),
            )
            .into());
        };

        let target = discriminator.mapping.get(tag).map(String::as_str).unwrap_or(tag);
        let schema = if target.starts_with("#/") {
            self.resolve_reference(target)?
        } else {
            self.schemas.and_then(|schemas| schemas.get(target)).ok_or_else(|| {
                InvalidSchema::new(format!(
                    "Discriminator value \"{tag}\" does not resolve to a known schema"
                ))
            })?
        };

        self.validate_at(value, schema, breadcrumb)
    }

    fn resolve_reference(&self, reference: &str) -> Result<&'s SchemaNode, SchemaMismatch> {
        let name = reference
            .strip_prefix("#/components/schemas/")
            .ok_or_else(|| InvalidSchema::unknown_reference(reference))?;

        self.schemas
            .and_then(|schemas| schemas.get(name))
            .ok_or_else(|| InvalidSchema::unknown_reference(reference).into())
    }
}

fn is_nullable(schema: &SchemaNode) -> bool {
    schema.nullable.unwrap_or(false) || schema.schema_type == Some(SchemaType::Null)
}

/// Map a declared type to the value's runtime shape
fn type_matches(value: &Value, declared: SchemaType) -> bool {
    match declared {
        SchemaType::Object => value.is_object(),
        SchemaType::Array => value.is_array(),
        SchemaType::String => value.is_string(),
        SchemaType::Boolean => value.is_boolean(),
        SchemaType::Null => value.is_null(),
        SchemaType::Number => value.is_number(),
        SchemaType::Integer => match value {
            Value::Number(number) => {
                number.is_i64()
                    || number.is_u64()
                    || number.as_f64().is_some_and(|f| f.fract() == 0.0)
            }
            _ => false,
        },
    }
}

/// The runtime shape of a value, for error messages
fn shape_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
