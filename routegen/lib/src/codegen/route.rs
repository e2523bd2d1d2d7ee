//! Per-operation assembly: validators, URL builder and the client function.

use tracing::{debug, warn};

use crate::codegen::schema::{compile, CompiledSchema};
use crate::naming::{camel, pascal};
use crate::operation::{HttpVerb, OperationDescription};
use crate::parser::{extract_path_params, url_template};

/// Everything the emitter needs to know about one operation.
///
/// Derived entirely from an [`OperationDescription`]; created fresh per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledOperation {
    /// PascalCase identifier, the prefix of every generated schema and type.
    pub pascal: String,
    /// camelCase identifier of the generated client function.
    pub camel: String,
    pub verb: HttpVerb,
    pub input: CompiledSchema,
    pub output: CompiledSchema,
    /// Template literal (backticks included) that builds the request URL.
    pub url: String,
    /// Path parameter names, in path order.
    pub path_params: Vec<String>,
    /// Whether the request carries the validated input as a JSON body.
    pub includes_body: bool,
}

impl CompiledOperation {
    pub fn args_schema(&self) -> String {
        format!("{}ArgsSchema", self.pascal)
    }

    pub fn args_type(&self) -> String {
        format!("{}Args", self.pascal)
    }

    pub fn result_schema(&self) -> String {
        format!("{}ResultSchema", self.pascal)
    }

    pub fn result_type(&self) -> String {
        format!("{}Result", self.pascal)
    }
}

/// Compiles one operation description.
///
/// Path parameters that the input schema does not declare as required are
/// reported with a warning; the generated code still reads them from the
/// validated input.
///
/// ## Examples
///
/// ```
/// use routegen_lib::codegen::route::compile_operation;
/// use routegen_lib::operation::parse_operations;
/// use serde_json::json;
///
/// let ops = parse_operations(&json!([{
///     "name": "delete-post",
///     "path": "/posts/:id",
///     "verb": "DELETE",
///     "input": { "type": "object", "required": ["id"], "properties": { "id": { "type": "string" } } },
///     "output": { "type": "object" }
/// }])).unwrap();
///
/// let compiled = compile_operation(&ops[0]);
/// assert_eq!(compiled.pascal, "DeletePost");
/// assert_eq!(compiled.camel, "deletePost");
/// assert!(compiled.includes_body);
/// ```
pub fn compile_operation(op: &OperationDescription) -> CompiledOperation {
    let pascal = pascal(&op.name);
    let camel = camel(&op.name);

    let input = compile(&op.input, &format!("{pascal}Args"));
    let output = compile(&op.output, &format!("{pascal}Result"));

    let params = extract_path_params(&op.path);
    for param in &params {
        let declared = op
            .input
            .as_object()
            .is_some_and(|object| object.is_required(param));
        if !declared {
            warn!(
                operation = %op.name,
                path = %op.path,
                param = %param,
                "path parameter is not a required input field"
            );
        }
    }

    let url = format!("`${{config.baseUrl}}{}`", url_template(&op.path, "input"));
    let includes_body = op.verb.sends_body();

    debug!(
        operation = %op.name,
        verb = %op.verb,
        path = %op.path,
        params = params.len(),
        includes_body,
        "compiled operation"
    );

    CompiledOperation {
        pascal,
        camel,
        verb: op.verb,
        input,
        output,
        url,
        path_params: params.into_iter().map(str::to_string).collect(),
        includes_body,
    }
}

/// Renders the async client function for a compiled operation.
///
/// The function validates its arguments, issues the request with the
/// configuration passed in (the module default otherwise), rejects non-2xx
/// responses with `HttpError`, and validates the decoded response body,
/// throwing `ResponseValidationError` when it does not conform.
pub fn render_function(op: &CompiledOperation) -> String {
    let body = if op.includes_body {
        "    body: JSON.stringify(input),\n"
    } else {
        ""
    };

    format!(
        r#"export async function {camel}(args: {args_type}, config: ClientConfig = clientConfig): Promise<{result_type}> {{
  const input = {args_schema}.parse(args);
  const response = await fetch({url}, {{
    method: "{verb}",
    headers: {{
      "Content-Type": "application/json",
      ...(await resolveHeaders(config.headers)),
    }},
{body}  }});
  if (!response.ok) {{
    throw new HttpError(response.status, await response.text());
  }}
  const parsed = {result_schema}.safeParse(await response.json());
  if (!parsed.success) {{
    throw new ResponseValidationError("{camel}", parsed.error);
  }}
  return parsed.data;
}}
"#,
        camel = op.camel,
        args_type = op.args_type(),
        result_type = op.result_type(),
        args_schema = op.args_schema(),
        result_schema = op.result_schema(),
        url = op.url,
        verb = op.verb,
        body = body,
    )
}
