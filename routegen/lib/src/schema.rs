//! Schema intermediate representation.
//!
//! Introspection data describes operation inputs and outputs with
//! JSON-Schema-shaped objects. [`SchemaNode::from_json`] classifies each raw
//! object into exactly one [`SchemaNode`] variant, so the compiler in
//! [`crate::codegen::schema`] only ever matches on a closed set of shapes.
//!
//! ## Classification Order
//!
//! Raw schemas frequently carry several shape keywords at once. The first
//! matching rule wins:
//!
//! 1. `$ref` (all sibling keywords are ignored)
//! 2. `type` (a string, or an array of type names which becomes `anyOf`)
//! 3. untyped `properties` / `additionalProperties` (object)
//! 4. untyped `enum` / `const` (enumeration)
//! 5. `anyOf`, `oneOf`, `allOf`
//! 6. `nullable: true`
//! 7. anything else is [`SchemaNode::Unknown`]
//!
//! Because `type` is checked before `nullable`, a schema such as
//! `{"type": "string", "nullable": true}` is a plain string node. The flag
//! only matters when nothing typed matched.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde_json::{Map, Number, Value};

/// One node of a JSON-Schema-like description.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    /// A `$ref` to a schema that is compiled elsewhere.
    Reference { target: String },
    String(StringSchema),
    /// A closed set of literal values (`enum` or `const`).
    Enumeration { values: Vec<Value> },
    Number(NumberSchema),
    Boolean,
    Null,
    Array(ArraySchema),
    Object(ObjectSchema),
    Combinator {
        kind: CombinatorKind,
        members: Vec<SchemaNode>,
    },
    /// `nullable: true` without any recognized type.
    Nullable,
    /// Shape the generator does not understand; compiles to a permissive
    /// validator.
    Unknown,
}

/// Constraints attached to a `string` schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StringSchema {
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub pattern: Option<String>,
    pub format: Option<StringFormat>,
}

/// Named string formats with a dedicated validator refinement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StringFormat {
    Email,
    Url,
    Uuid,
    DateTime,
    /// Any other format name; carried for completeness but not enforced.
    Other(String),
}

impl StringFormat {
    fn parse(name: &str) -> Self {
        match name {
            "email" => Self::Email,
            "uri" | "url" => Self::Url,
            "uuid" => Self::Uuid,
            "date-time" => Self::DateTime,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Constraints attached to a `number` or `integer` schema.
///
/// Bounds keep their original JSON number so they are emitted exactly as they
/// were written (`10` stays `10`, `0.5` stays `0.5`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumberSchema {
    pub integer: bool,
    pub minimum: Option<Number>,
    pub maximum: Option<Number>,
    pub exclusive_minimum: Option<Number>,
    pub exclusive_maximum: Option<Number>,
    pub multiple_of: Option<Number>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArraySchema {
    /// Item schema; `None` when the array is untyped.
    pub items: Option<Box<SchemaNode>>,
    pub min_items: Option<u64>,
    pub max_items: Option<u64>,
    pub unique_items: bool,
}

/// An object schema.
///
/// Properties keep their declaration order so generated code is stable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectSchema {
    pub properties: IndexMap<String, SchemaNode>,
    pub required: BTreeSet<String>,
    pub additional: AdditionalProperties,
}

/// The `additionalProperties` keyword of an object schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum AdditionalProperties {
    /// Keyword not present.
    #[default]
    Absent,
    /// `additionalProperties: true` or `false`.
    Allowed(bool),
    /// `additionalProperties: { ...schema }`.
    Schema(Box<SchemaNode>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombinatorKind {
    AnyOf,
    OneOf,
    AllOf,
}

impl CombinatorKind {
    /// Suffix used when deriving name hints for combinator members.
    pub fn hint_suffix(self) -> &'static str {
        match self {
            Self::AnyOf => "AnyOf",
            Self::OneOf => "OneOf",
            Self::AllOf => "AllOf",
        }
    }
}

impl SchemaNode {
    /// Classifies a raw JSON schema.
    ///
    /// This never fails: anything unrecognized becomes [`SchemaNode::Unknown`].
    ///
    /// ## Examples
    ///
    /// ```
    /// use routegen_lib::schema::SchemaNode;
    /// use serde_json::json;
    ///
    /// let node = SchemaNode::from_json(&json!({ "$ref": "#/defs/User", "type": "string" }));
    /// assert_eq!(node, SchemaNode::Reference { target: "#/defs/User".to_string() });
    ///
    /// let node = SchemaNode::from_json(&json!({ "x-custom": 1 }));
    /// assert_eq!(node, SchemaNode::Unknown);
    /// ```
    pub fn from_json(value: &Value) -> SchemaNode {
        let Value::Object(map) = value else {
            return SchemaNode::Unknown;
        };

        if let Some(target) = map.get("$ref").and_then(Value::as_str) {
            return SchemaNode::Reference {
                target: target.to_string(),
            };
        }

        match map.get("type") {
            Some(Value::String(ty)) => {
                if let Some(node) = from_type_name(ty, map) {
                    return node;
                }
            }
            Some(Value::Array(types)) => {
                let mut members: Vec<SchemaNode> = types
                    .iter()
                    .filter_map(Value::as_str)
                    .filter_map(|ty| from_type_name(ty, map))
                    .collect();
                match members.len() {
                    0 => {}
                    1 => return members.remove(0),
                    _ => {
                        return SchemaNode::Combinator {
                            kind: CombinatorKind::AnyOf,
                            members,
                        };
                    }
                }
            }
            _ => {}
        }

        if map.contains_key("properties") || map.contains_key("additionalProperties") {
            return SchemaNode::Object(ObjectSchema::from_map(map));
        }

        if let Some(node) = enumeration(map) {
            return node;
        }

        for (keyword, kind) in [
            ("anyOf", CombinatorKind::AnyOf),
            ("oneOf", CombinatorKind::OneOf),
            ("allOf", CombinatorKind::AllOf),
        ] {
            if let Some(Value::Array(members)) = map.get(keyword) {
                return SchemaNode::Combinator {
                    kind,
                    members: members.iter().map(SchemaNode::from_json).collect(),
                };
            }
        }

        if map.get("nullable") == Some(&Value::Bool(true)) {
            return SchemaNode::Nullable;
        }

        SchemaNode::Unknown
    }

    /// Returns the object schema if this node is an object.
    pub fn as_object(&self) -> Option<&ObjectSchema> {
        match self {
            SchemaNode::Object(object) => Some(object),
            _ => None,
        }
    }
}

fn from_type_name(ty: &str, map: &Map<String, Value>) -> Option<SchemaNode> {
    let node = match ty {
        "string" => enumeration(map).unwrap_or_else(|| SchemaNode::String(StringSchema::from_map(map))),
        "number" => SchemaNode::Number(NumberSchema::from_map(map, false)),
        "integer" => SchemaNode::Number(NumberSchema::from_map(map, true)),
        "boolean" => SchemaNode::Boolean,
        "null" => SchemaNode::Null,
        "array" => SchemaNode::Array(ArraySchema::from_map(map)),
        "object" => SchemaNode::Object(ObjectSchema::from_map(map)),
        _ => return None,
    };
    Some(node)
}

fn enumeration(map: &Map<String, Value>) -> Option<SchemaNode> {
    if let Some(Value::Array(values)) = map.get("enum")
        && !values.is_empty()
    {
        return Some(SchemaNode::Enumeration {
            values: values.clone(),
        });
    }
    map.get("const").map(|value| SchemaNode::Enumeration {
        values: vec![value.clone()],
    })
}

fn count(map: &Map<String, Value>, key: &str) -> Option<u64> {
    map.get(key).and_then(Value::as_u64)
}

fn number(map: &Map<String, Value>, key: &str) -> Option<Number> {
    match map.get(key) {
        Some(Value::Number(n)) => Some(n.clone()),
        _ => None,
    }
}

impl StringSchema {
    fn from_map(map: &Map<String, Value>) -> Self {
        Self {
            min_length: count(map, "minLength"),
            max_length: count(map, "maxLength"),
            pattern: map.get("pattern").and_then(Value::as_str).map(str::to_string),
            format: map.get("format").and_then(Value::as_str).map(StringFormat::parse),
        }
    }
}

impl NumberSchema {
    fn from_map(map: &Map<String, Value>, integer: bool) -> Self {
        let mut minimum = number(map, "minimum");
        let mut maximum = number(map, "maximum");

        // Draft 2019+ uses numeric exclusive bounds; OpenAPI 3.0 uses boolean
        // flags that turn `minimum`/`maximum` exclusive.
        let exclusive_minimum = match map.get("exclusiveMinimum") {
            Some(Value::Number(n)) => Some(n.clone()),
            Some(Value::Bool(true)) => minimum.take(),
            _ => None,
        };
        let exclusive_maximum = match map.get("exclusiveMaximum") {
            Some(Value::Number(n)) => Some(n.clone()),
            Some(Value::Bool(true)) => maximum.take(),
            _ => None,
        };

        Self {
            integer,
            minimum,
            maximum,
            exclusive_minimum,
            exclusive_maximum,
            multiple_of: number(map, "multipleOf"),
        }
    }
}

impl ArraySchema {
    fn from_map(map: &Map<String, Value>) -> Self {
        Self {
            items: map
                .get("items")
                .map(|items| Box::new(SchemaNode::from_json(items))),
            min_items: count(map, "minItems"),
            max_items: count(map, "maxItems"),
            unique_items: map.get("uniqueItems") == Some(&Value::Bool(true)),
        }
    }
}

impl ObjectSchema {
    fn from_map(map: &Map<String, Value>) -> Self {
        let properties = match map.get("properties") {
            Some(Value::Object(props)) => props
                .iter()
                .map(|(name, schema)| (name.clone(), SchemaNode::from_json(schema)))
                .collect(),
            _ => IndexMap::new(),
        };

        let required = match map.get("required") {
            Some(Value::Array(names)) => names
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            _ => BTreeSet::new(),
        };

        let additional = match map.get("additionalProperties") {
            Some(Value::Bool(allowed)) => AdditionalProperties::Allowed(*allowed),
            Some(schema @ Value::Object(_)) => {
                AdditionalProperties::Schema(Box::new(SchemaNode::from_json(schema)))
            }
            _ => AdditionalProperties::Absent,
        };

        Self {
            properties,
            required,
            additional,
        }
    }

    /// Whether `name` is listed in `required`.
    pub fn is_required(&self, name: &str) -> bool {
        self.required.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reference_ignores_siblings() {
        let node = SchemaNode::from_json(&json!({
            "$ref": "#/components/schemas/User",
            "type": "object",
            "properties": { "id": { "type": "string" } }
        }));
        assert_eq!(
            node,
            SchemaNode::Reference {
                target: "#/components/schemas/User".to_string()
            }
        );
    }

    #[test]
    fn string_with_enum_becomes_enumeration() {
        let node = SchemaNode::from_json(&json!({ "type": "string", "enum": ["a", "b"] }));
        assert_eq!(
            node,
            SchemaNode::Enumeration {
                values: vec![json!("a"), json!("b")]
            }
        );
    }

    #[test]
    fn const_becomes_single_value_enumeration() {
        let node = SchemaNode::from_json(&json!({ "const": 3 }));
        assert_eq!(node, SchemaNode::Enumeration { values: vec![json!(3)] });
    }

    #[test]
    fn string_constraints_are_collected() {
        let node = SchemaNode::from_json(&json!({
            "type": "string",
            "minLength": 1,
            "maxLength": 10,
            "pattern": "^a",
            "format": "email"
        }));
        assert_eq!(
            node,
            SchemaNode::String(StringSchema {
                min_length: Some(1),
                max_length: Some(10),
                pattern: Some("^a".to_string()),
                format: Some(StringFormat::Email),
            })
        );
    }

    #[test]
    fn boolean_exclusive_flags_move_bounds() {
        let node = SchemaNode::from_json(&json!({
            "type": "number",
            "minimum": 0,
            "exclusiveMinimum": true,
            "maximum": 5
        }));
        let SchemaNode::Number(num) = node else {
            panic!("expected number node");
        };
        assert_eq!(num.minimum, None);
        assert_eq!(num.exclusive_minimum, Some(Number::from(0)));
        assert_eq!(num.maximum, Some(Number::from(5)));
        assert!(!num.integer);
    }

    #[test]
    fn untyped_properties_make_an_object() {
        let node = SchemaNode::from_json(&json!({
            "required": ["id"],
            "properties": { "id": { "type": "string" }, "age": { "type": "integer" } }
        }));
        let object = node.as_object().expect("object node");
        let names: Vec<&str> = object.properties.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["id", "age"]);
        assert!(object.is_required("id"));
        assert!(!object.is_required("age"));
        assert_eq!(object.additional, AdditionalProperties::Absent);
    }

    #[test]
    fn property_order_follows_declaration() {
        let node = SchemaNode::from_json(&json!({
            "type": "object",
            "properties": { "zeta": {}, "alpha": {}, "mid": {} }
        }));
        let object = node.as_object().expect("object node");
        let names: Vec<&str> = object.properties.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn additional_properties_variants() {
        let open = SchemaNode::from_json(&json!({ "additionalProperties": true }));
        assert_eq!(
            open.as_object().map(|o| o.additional.clone()),
            Some(AdditionalProperties::Allowed(true))
        );

        let typed = SchemaNode::from_json(&json!({
            "type": "object",
            "additionalProperties": { "type": "number" }
        }));
        assert!(matches!(
            typed.as_object().map(|o| &o.additional),
            Some(AdditionalProperties::Schema(_))
        ));
    }

    #[test]
    fn type_array_becomes_any_of() {
        let node = SchemaNode::from_json(&json!({ "type": ["string", "null"] }));
        assert_eq!(
            node,
            SchemaNode::Combinator {
                kind: CombinatorKind::AnyOf,
                members: vec![SchemaNode::String(StringSchema::default()), SchemaNode::Null],
            }
        );
    }

    #[test]
    fn typed_node_ignores_nullable_flag() {
        let node = SchemaNode::from_json(&json!({ "type": "string", "nullable": true }));
        assert_eq!(node, SchemaNode::String(StringSchema::default()));

        let bare = SchemaNode::from_json(&json!({ "nullable": true }));
        assert_eq!(bare, SchemaNode::Nullable);
    }

    #[test]
    fn combinators_keep_member_order() {
        let node = SchemaNode::from_json(&json!({
            "oneOf": [{ "type": "string" }, { "type": "boolean" }]
        }));
        assert_eq!(
            node,
            SchemaNode::Combinator {
                kind: CombinatorKind::OneOf,
                members: vec![SchemaNode::String(StringSchema::default()), SchemaNode::Boolean],
            }
        );
    }

    #[test]
    fn unknown_shapes_fall_back() {
        assert_eq!(SchemaNode::from_json(&json!({ "type": "tuple" })), SchemaNode::Unknown);
        assert_eq!(SchemaNode::from_json(&json!(true)), SchemaNode::Unknown);
        assert_eq!(SchemaNode::from_json(&json!({})), SchemaNode::Unknown);
    }
}
