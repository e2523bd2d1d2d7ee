//! Operation descriptions and introspection payload validation.
//!
//! An introspection payload is a JSON array with one element per remote
//! operation. Before anything is compiled, the whole array is checked for the
//! required fields; a single malformed element rejects the entire payload.

use serde_json::{Map, Value};
use strum::{Display, EnumIter, EnumString};

use crate::errors::{GeneratorError, Result};
use crate::schema::SchemaNode;

/// HTTP verb of a remote operation.
///
/// Parsing is case-insensitive since different producers send `get` or `GET`.
///
/// ## Examples
///
/// ```
/// use routegen_lib::operation::HttpVerb;
///
/// assert_eq!("get".parse::<HttpVerb>().unwrap(), HttpVerb::Get);
/// assert_eq!(HttpVerb::Patch.to_string(), "PATCH");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum HttpVerb {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl HttpVerb {
    /// Whether requests with this verb carry a JSON body.
    ///
    /// `GET` and `HEAD` never do; every other verb sends the full validated
    /// input.
    pub fn sends_body(self) -> bool {
        !matches!(self, HttpVerb::Get | HttpVerb::Head)
    }
}

/// One remote operation as described by the introspection payload.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationDescription {
    /// Operation name; seeds every generated identifier.
    pub name: String,
    /// Path template; `:name` tokens are path parameters.
    pub path: String,
    pub verb: HttpVerb,
    pub input: SchemaNode,
    pub output: SchemaNode,
}

/// Validates an introspection payload and converts it to operations.
///
/// The payload must be an array whose elements each carry a non-empty string
/// `name`, a string `path`, a recognized `verb`, and object-valued `input`
/// and `output` schemas. Element order is preserved.
///
/// ## Errors
///
/// Returns [`GeneratorError::Shape`] naming the first offending element and
/// field. Nothing is returned for the valid elements of a malformed payload.
pub fn parse_operations(payload: &Value) -> Result<Vec<OperationDescription>> {
    let Value::Array(elements) = payload else {
        return Err(GeneratorError::Shape(format!(
            "expected an array of operations, found {}",
            json_kind(payload)
        )));
    };

    elements
        .iter()
        .enumerate()
        .map(|(index, element)| parse_operation(index, element))
        .collect()
}

fn parse_operation(index: usize, element: &Value) -> Result<OperationDescription> {
    let Value::Object(fields) = element else {
        return Err(shape_error(
            index,
            format!("expected an object, found {}", json_kind(element)),
        ));
    };

    let name = string_field(index, fields, "name")?;
    if name.is_empty() {
        return Err(shape_error(index, "field 'name' must not be empty".to_string()));
    }
    let path = string_field(index, fields, "path")?;
    let verb_raw = string_field(index, fields, "verb")?;
    let verb = verb_raw.parse::<HttpVerb>().map_err(|_| {
        shape_error(index, format!("unsupported verb '{verb_raw}'"))
    })?;

    Ok(OperationDescription {
        name: name.to_string(),
        path: path.to_string(),
        verb,
        input: schema_field(index, fields, "input")?,
        output: schema_field(index, fields, "output")?,
    })
}

fn string_field<'a>(index: usize, fields: &'a Map<String, Value>, field: &str) -> Result<&'a str> {
    match fields.get(field) {
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(other) => Err(shape_error(
            index,
            format!("field '{field}' must be a string, found {}", json_kind(other)),
        )),
        None => Err(shape_error(index, format!("missing field '{field}'"))),
    }
}

fn schema_field(index: usize, fields: &Map<String, Value>, field: &str) -> Result<SchemaNode> {
    match fields.get(field) {
        Some(schema @ Value::Object(_)) => Ok(SchemaNode::from_json(schema)),
        Some(other) => Err(shape_error(
            index,
            format!("field '{field}' must be an object, found {}", json_kind(other)),
        )),
        None => Err(shape_error(index, format!("missing field '{field}'"))),
    }
}

fn shape_error(index: usize, detail: String) -> GeneratorError {
    GeneratorError::Shape(format!("operation #{index}: {detail}"))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
