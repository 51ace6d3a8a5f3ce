use serde_json::Value;

use crate::models::{AdditionalProperties, Discriminator, SchemaNode};

/// One schema keyword, carried with its constraint data.
///
/// A closed union evaluated by a single ordered dispatcher in the
/// validator: adding a keyword means adding a variant, and the compiler
/// enforces that every variant is handled.
#[derive(Debug)]
pub(crate) enum Keyword<'s> {
    Pattern(&'s str),
    MinLength(u64),
    MaxLength(u64),
    Minimum { limit: f64, exclusive: bool },
    Maximum { limit: f64, exclusive: bool },
    MultipleOf(f64),
    Enum(&'s [Value]),
    Required(&'s [String]),
    Properties(&'s SchemaNode),
    AdditionalProperties {
        policy: &'s AdditionalProperties,
        declared: &'s SchemaNode,
    },
    Items(&'s SchemaNode),
    MinItems(u64),
    MaxItems(u64),
    UniqueItems,
    AllOf(&'s [SchemaNode]),
    AnyOf(&'s [SchemaNode]),
    OneOf {
        schemas: &'s [SchemaNode],
        discriminator: Option<&'s Discriminator>,
    },
    Not(&'s SchemaNode),
}

/// Collect the keywords present on a schema node, in evaluation order:
/// value constraints first, composition operators last.
pub(crate) fn collect(schema: &SchemaNode) -> Vec<Keyword<'_>> {
    let mut keywords = Vec::new();

    if let Some(pattern) = &schema.pattern {
        keywords.push(Keyword::Pattern(pattern));
    }
    if let Some(min) = schema.min_length {
        keywords.push(Keyword::MinLength(min));
    }
    if let Some(max) = schema.max_length {
        keywords.push(Keyword::MaxLength(max));
    }
    if let Some(limit) = schema.minimum {
        keywords.push(Keyword::Minimum {
            limit,
            exclusive: schema.exclusive_minimum.unwrap_or(false),
        });
    }
    if let Some(limit) = schema.maximum {
        keywords.push(Keyword::Maximum {
            limit,
            exclusive: schema.exclusive_maximum.unwrap_or(false),
        });
    }
    if let Some(divisor) = schema.multiple_of {
        keywords.push(Keyword::MultipleOf(divisor));
    }
    if let Some(members) = &schema.enum_values {
        keywords.push(Keyword::Enum(members));
    }
    if !schema.required.is_empty() {
        keywords.push(Keyword::Required(&schema.required));
    }
    if !schema.properties.is_empty() {
        keywords.push(Keyword::Properties(schema));
    }
    if let Some(policy) = &schema.additional_properties {
        keywords.push(Keyword::AdditionalProperties {
            policy,
            declared: schema,
        });
    }
    if let Some(items) = &schema.items {
        keywords.push(Keyword::Items(items));
    }
    if let Some(min) = schema.min_items {
        keywords.push(Keyword::MinItems(min));
    }
    if let Some(max) = schema.max_items {
        keywords.push(Keyword::MaxItems(max));
    }
    if schema.unique_items == Some(true) {
        keywords.push(Keyword::UniqueItems);
    }
    if !schema.all_of.is_empty() {
        keywords.push(Keyword::AllOf(&schema.all_of));
    }
    if !schema.any_of.is_empty() {
        keywords.push(Keyword::AnyOf(&schema.any_of));
    }
    if !schema.one_of.is_empty() {
        keywords.push(Keyword::OneOf {
            schemas: &schema.one_of,
            discriminator: schema.discriminator.as_ref(),
        });
    }
    if let Some(not) = &schema.not {
        keywords.push(Keyword::Not(not));
    }

    keywords
}
