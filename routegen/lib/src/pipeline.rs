//! One full generator run: load operations, compile, emit, write.

use std::path::PathBuf;

use tracing::info;

use crate::codegen::{compile_operation, emit, EmitConfig};
use crate::config::GeneratorConfig;
use crate::errors::{GeneratorError, Result};
use crate::introspection::{load_file, IntrospectionClient};
use crate::operation::OperationDescription;
use crate::output::write_if_changed;

/// Outcome of [`generate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    pub path: PathBuf,
    pub operations: usize,
    /// `false` when the file on disk already matched.
    pub written: bool,
}

/// Compiles operations and emits the client module text.
///
/// ## Examples
///
/// ```
/// use routegen_lib::codegen::EmitConfig;
/// use routegen_lib::operation::parse_operations;
/// use routegen_lib::pipeline::render;
/// use serde_json::json;
///
/// let ops = parse_operations(&json!([{
///     "name": "GetUser",
///     "path": "/api/user",
///     "verb": "get",
///     "input": { "type": "object", "properties": {} },
///     "output": { "type": "object", "properties": {} }
/// }])).unwrap();
///
/// let module = render(&ops, &EmitConfig::default());
/// assert!(module.contains("export async function getUser("));
/// ```
pub fn render(ops: &[OperationDescription], config: &EmitConfig) -> String {
    let compiled: Vec<_> = ops.iter().map(compile_operation).collect();
    emit(&compiled, config)
}

/// Loads operations from the configured file, or fetches them.
pub async fn load_operations(
    config: &GeneratorConfig,
    client: &IntrospectionClient,
) -> Result<Vec<OperationDescription>> {
    if let Some(path) = &config.introspection_file {
        return load_file(path);
    }
    match &config.introspection_url {
        Some(url) => client.fetch(url).await,
        None => Err(GeneratorError::ConfigError(
            "either 'introspectionUrl' or 'introspectionFile' must be set".to_string(),
        )),
    }
}

/// Runs the generator once and writes the module if it changed.
pub async fn generate(
    config: &GeneratorConfig,
    client: &IntrospectionClient,
) -> Result<GenerationReport> {
    let ops = load_operations(config, client).await?;
    let emit_config = EmitConfig {
        base_url: config.base_url.clone(),
    };
    let module = render(&ops, &emit_config);

    let path = config.output_path();
    let written = write_if_changed(&path, &module)?;
    if written {
        info!(path = %path.display(), operations = ops.len(), "wrote client module");
    }

    Ok(GenerationReport {
        path,
        operations: ops.len(),
        written,
    })
}
