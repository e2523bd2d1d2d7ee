//! Schema compilation to zod validators and TypeScript types.
//!
//! [`compile`] walks a [`SchemaNode`] tree and produces two pieces of source
//! text at once: a zod expression that validates values at runtime and the
//! TypeScript type those values have.
//!
//! The function is total. Shapes without a dedicated rule compile to
//! `z.unknown()` / `unknown`, so a schema vocabulary the generator has never
//! seen still yields a usable (if permissive) client.
//!
//! ## Examples
//!
//! ```
//! use routegen_lib::codegen::schema::compile;
//! use routegen_lib::schema::SchemaNode;
//! use serde_json::json;
//!
//! let node = SchemaNode::from_json(&json!({
//!     "type": "object",
//!     "required": ["id"],
//!     "properties": {
//!         "id": { "type": "string", "format": "uuid" },
//!         "tags": { "type": "array", "items": { "type": "string" } }
//!     }
//! }));
//!
//! let compiled = compile(&node, "User");
//! assert_eq!(
//!     compiled.validator,
//!     "z.object({ id: z.string().uuid(), tags: z.array(z.string()).optional() })"
//! );
//! assert_eq!(compiled.ty, "{ id: string; tags?: Array<string> }");
//! ```

use serde_json::Value;
use tracing::{debug, trace};

use crate::naming::{is_js_identifier, pascal};
use crate::parser::js_string;
use crate::schema::{
    AdditionalProperties, ArraySchema, CombinatorKind, NumberSchema, ObjectSchema, SchemaNode,
    StringFormat, StringSchema,
};

/// A compiled schema: runtime validator plus static type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledSchema {
    /// zod expression, e.g. `z.string().min(1)`.
    pub validator: String,
    /// TypeScript type expression, e.g. `string`.
    pub ty: String,
}

impl CompiledSchema {
    fn new(validator: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            validator: validator.into(),
            ty: ty.into(),
        }
    }

    fn unknown() -> Self {
        Self::new("z.unknown()", "unknown")
    }

    fn generic_record() -> Self {
        Self::new("z.record(z.string(), z.unknown())", "Record<string, unknown>")
    }
}

/// Compiles a schema node.
///
/// `name_hint` identifies the node's position (`UpdateProfileArgsAddress`,
/// `GetUserResultAnyOf1`, ...). Nested properties and combinator members
/// extend it so diagnostics point at a stable location.
pub fn compile(node: &SchemaNode, name_hint: &str) -> CompiledSchema {
    match node {
        SchemaNode::Reference { target } => compile_reference(target),
        SchemaNode::String(string) => compile_string(string),
        SchemaNode::Enumeration { values } => compile_enumeration(values, name_hint),
        SchemaNode::Number(number) => compile_number(number),
        SchemaNode::Boolean => CompiledSchema::new("z.boolean()", "boolean"),
        SchemaNode::Null => CompiledSchema::new("z.null()", "null"),
        SchemaNode::Array(array) => compile_array(array, name_hint),
        SchemaNode::Object(object) => compile_object(object, name_hint),
        SchemaNode::Combinator {
            kind: CombinatorKind::AllOf,
            members,
        } => compile_all_of(members, name_hint),
        SchemaNode::Combinator { kind, members } => compile_union(*kind, members, name_hint),
        SchemaNode::Nullable => CompiledSchema::new("z.unknown().nullable()", "unknown | null"),
        SchemaNode::Unknown => {
            trace!(hint = name_hint, "unsupported schema shape, using z.unknown()");
            CompiledSchema::unknown()
        }
    }
}

/// Identifier for a referenced schema: the PascalCase last segment of the
/// reference target (`#/components/schemas/user-profile` → `UserProfile`).
pub fn reference_name(target: &str) -> String {
    let last = target
        .rsplit(['/', '#'])
        .find(|segment| !segment.is_empty())
        .unwrap_or("Ref");
    pascal(last)
}

fn compile_reference(target: &str) -> CompiledSchema {
    let name = reference_name(target);
    // Lazy so references resolve regardless of declaration order.
    CompiledSchema::new(format!("z.lazy(() => {name}Schema)"), name)
}

fn compile_string(string: &StringSchema) -> CompiledSchema {
    let mut validator = String::from("z.string()");
    if let Some(min) = string.min_length {
        validator.push_str(&format!(".min({min})"));
    }
    if let Some(max) = string.max_length {
        validator.push_str(&format!(".max({max})"));
    }
    if let Some(pattern) = &string.pattern {
        // Constructor form: an empty pattern would otherwise render as `//`.
        validator.push_str(&format!(".regex(new RegExp({}))", js_string(pattern)));
    }
    match &string.format {
        Some(StringFormat::Email) => validator.push_str(".email()"),
        Some(StringFormat::Url) => validator.push_str(".url()"),
        Some(StringFormat::Uuid) => validator.push_str(".uuid()"),
        Some(StringFormat::DateTime) => validator.push_str(".datetime({ offset: true })"),
        Some(StringFormat::Other(_)) | None => {}
    }
    CompiledSchema::new(validator, "string")
}

fn compile_enumeration(values: &[Value], name_hint: &str) -> CompiledSchema {
    if values.is_empty() {
        debug!(hint = name_hint, "empty enumeration, using z.unknown()");
        return CompiledSchema::unknown();
    }

    let literals: Vec<String> = values.iter().map(Value::to_string).collect();
    let ty = literals.join(" | ");

    let validator = if let [single] = literals.as_slice() {
        format!("z.literal({single})")
    } else if values.iter().all(Value::is_string) {
        format!("z.enum([{}])", literals.join(", "))
    } else {
        let members: Vec<String> = literals
            .iter()
            .map(|literal| format!("z.literal({literal})"))
            .collect();
        format!("z.union([{}])", members.join(", "))
    };

    CompiledSchema::new(validator, ty)
}

fn compile_number(number: &NumberSchema) -> CompiledSchema {
    let mut validator = String::from("z.number()");
    if number.integer {
        validator.push_str(".int()");
    }
    if let Some(min) = &number.minimum {
        validator.push_str(&format!(".gte({min})"));
    }
    if let Some(max) = &number.maximum {
        validator.push_str(&format!(".lte({max})"));
    }
    if let Some(min) = &number.exclusive_minimum {
        validator.push_str(&format!(".gt({min})"));
    }
    if let Some(max) = &number.exclusive_maximum {
        validator.push_str(&format!(".lt({max})"));
    }
    if let Some(step) = &number.multiple_of {
        validator.push_str(&format!(".multipleOf({step})"));
    }
    CompiledSchema::new(validator, "number")
}

fn compile_array(array: &ArraySchema, name_hint: &str) -> CompiledSchema {
    let item_hint = format!("{name_hint}Item");
    let item = match &array.items {
        Some(items) => compile(items, &item_hint),
        None => CompiledSchema::unknown(),
    };

    let mut validator = format!("z.array({})", item.validator);
    if let Some(min) = array.min_items {
        validator.push_str(&format!(".min({min})"));
    }
    if let Some(max) = array.max_items {
        validator.push_str(&format!(".max({max})"));
    }
    if array.unique_items {
        validator.push_str(
            ".refine((items) => new Set(items.map((item) => JSON.stringify(item))).size === items.length, { message: \"Array items must be unique\" })",
        );
    }

    CompiledSchema::new(validator, format!("Array<{}>", item.ty))
}

fn compile_object(object: &ObjectSchema, name_hint: &str) -> CompiledSchema {
    if object.properties.is_empty() {
        return match &object.additional {
            AdditionalProperties::Schema(schema) => {
                let value = compile(schema, &format!("{name_hint}Value"));
                CompiledSchema::new(
                    format!("z.record(z.string(), {})", value.validator),
                    format!("Record<string, {}>", value.ty),
                )
            }
            // An empty z.object() would strip every key; accept any record.
            _ => CompiledSchema::generic_record(),
        };
    }

    let mut shape = Vec::with_capacity(object.properties.len());
    let mut fields = Vec::with_capacity(object.properties.len() + 1);

    for (name, property) in &object.properties {
        let compiled = compile(property, &format!("{name_hint}{}", pascal(name)));
        let key = object_key(name);
        if object.is_required(name) {
            shape.push(format!("{key}: {}", compiled.validator));
            fields.push(format!("{key}: {}", compiled.ty));
        } else {
            shape.push(format!("{key}: {}.optional()", compiled.validator));
            fields.push(format!("{key}?: {}", compiled.ty));
        }
    }

    let mut validator = format!("z.object({{ {} }})", shape.join(", "));
    match &object.additional {
        AdditionalProperties::Allowed(true) => {
            validator.push_str(".catchall(z.unknown())");
            fields.push("[key: string]: unknown".to_string());
        }
        AdditionalProperties::Schema(schema) => {
            let value = compile(schema, &format!("{name_hint}Value"));
            validator.push_str(&format!(".catchall({})", value.validator));
            fields.push(format!("[key: string]: {}", value.ty));
        }
        AdditionalProperties::Allowed(false) | AdditionalProperties::Absent => {}
    }

    CompiledSchema::new(validator, format!("{{ {} }}", fields.join("; ")))
}

fn object_key(name: &str) -> String {
    if is_js_identifier(name) {
        name.to_string()
    } else {
        js_string(name)
    }
}

fn compile_union(kind: CombinatorKind, members: &[SchemaNode], name_hint: &str) -> CompiledSchema {
    let compiled: Vec<CompiledSchema> = members
        .iter()
        .enumerate()
        .map(|(index, member)| {
            compile(member, &format!("{name_hint}{}{index}", kind.hint_suffix()))
        })
        .collect();

    match compiled.len() {
        0 => {
            debug!(hint = name_hint, "empty {:?} combinator, using z.unknown()", kind);
            CompiledSchema::unknown()
        }
        1 => compiled.into_iter().next().unwrap_or_else(CompiledSchema::unknown),
        _ => {
            let validators: Vec<&str> = compiled.iter().map(|c| c.validator.as_str()).collect();
            let types: Vec<&str> = compiled.iter().map(|c| c.ty.as_str()).collect();
            CompiledSchema::new(
                format!("z.union([{}])", validators.join(", ")),
                types.join(" | "),
            )
        }
    }
}

/// Merges the object members of an `allOf` into a single object schema.
///
/// Later members override earlier ones on property collisions, `required`
/// sets are unioned, and the last explicit `additionalProperties` wins.
/// Members that are not objects are skipped.
pub fn merge_all_of(members: &[SchemaNode], name_hint: &str) -> Option<ObjectSchema> {
    let mut merged: Option<ObjectSchema> = None;

    for (index, member) in members.iter().enumerate() {
        let Some(object) = member.as_object() else {
            debug!(
                hint = name_hint,
                index, "skipping non-object allOf member"
            );
            continue;
        };

        let target = merged.get_or_insert_with(ObjectSchema::default);
        for (name, property) in &object.properties {
            target.properties.insert(name.clone(), property.clone());
        }
        target.required.extend(object.required.iter().cloned());
        if object.additional != AdditionalProperties::Absent {
            target.additional = object.additional.clone();
        }
    }

    merged
}

fn compile_all_of(members: &[SchemaNode], name_hint: &str) -> CompiledSchema {
    let hint = format!("{name_hint}AllOf");
    match merge_all_of(members, name_hint) {
        Some(merged) => compile_object(&merged, &hint),
        None => {
            debug!(hint = name_hint, "allOf without object members, using z.unknown()");
            CompiledSchema::unknown()
        }
    }
}
