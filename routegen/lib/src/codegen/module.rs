//! Assembly of the final TypeScript module.
//!
//! The module is laid out in a fixed order so that two runs over the same
//! operations produce identical text, apart from the `Generated at` line:
//!
//! 1. header comment and the `zod` import
//! 2. one schema/type block per operation, in input order
//! 3. configuration types, default configuration and `configure`
//! 4. runtime scaffolding (error classes, header resolution)
//! 5. one async client function per operation, in input order
//! 6. the `schemas` map and the default export

use std::collections::HashSet;

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{info, warn};

use crate::codegen::route::{render_function, CompiledOperation};
use crate::codegen::scaffold;
use crate::naming::is_reserved_word;

const TIMESTAMP_PREFIX: &str = "// Generated at: ";

/// Emission settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmitConfig {
    /// Default base URL baked into `clientConfig`; empty when `None`.
    pub base_url: Option<String>,
}

/// Emits the client module stamped with the current time.
pub fn emit(ops: &[CompiledOperation], config: &EmitConfig) -> String {
    emit_at(ops, config, Utc::now())
}

/// Emits the client module with an explicit generation timestamp.
///
/// When two operations map to the same identifier, the later one wins and
/// the earlier is dropped with a warning.
pub fn emit_at(
    ops: &[CompiledOperation],
    config: &EmitConfig,
    generated_at: DateTime<Utc>,
) -> String {
    let ops = dedupe(ops);
    let mut out = String::with_capacity(4096 + ops.len() * 1024);

    out.push_str("// This file was generated by routegen. Do not edit it by hand.\n");
    out.push_str(TIMESTAMP_PREFIX);
    out.push_str(&generated_at.to_rfc3339_opts(SecondsFormat::Secs, true));
    out.push_str("\n\nimport { z } from \"zod\";\n");

    for op in &ops {
        out.push('\n');
        out.push_str(&format!(
            "export const {} = {};\n",
            op.args_schema(),
            op.input.validator
        ));
        out.push_str(&format!("export type {} = {};\n", op.args_type(), op.input.ty));
        out.push_str(&format!(
            "export const {} = {};\n",
            op.result_schema(),
            op.output.validator
        ));
        out.push_str(&format!(
            "export type {} = {};\n",
            op.result_type(),
            op.output.ty
        ));
    }

    out.push('\n');
    out.push_str(scaffold::CONFIG_TYPES);
    out.push('\n');
    out.push_str(&scaffold::client_config(config.base_url.as_deref()));
    out.push('\n');
    out.push_str(scaffold::CONFIGURE);
    out.push('\n');
    out.push_str(scaffold::RUNTIME);

    for op in &ops {
        out.push('\n');
        out.push_str(&render_function(op));
    }

    out.push_str("\nexport const schemas = {\n");
    for op in &ops {
        out.push_str(&format!("  {},\n", op.args_schema()));
        out.push_str(&format!("  {},\n", op.result_schema()));
    }
    out.push_str("};\n");

    out.push_str("\nexport default {\n  configure,\n  schemas,\n");
    for op in &ops {
        out.push_str(&format!("  {},\n", op.camel));
    }
    out.push_str("};\n");

    info!(operations = ops.len(), bytes = out.len(), "emitted client module");
    out
}

/// Keeps the last operation for every identifier, preserving order otherwise.
///
/// Operations whose function name is a runtime name or a reserved word are
/// dropped.
fn dedupe(ops: &[CompiledOperation]) -> Vec<&CompiledOperation> {
    let mut seen_pascal = HashSet::new();
    let mut seen_camel = HashSet::new();
    let mut kept: Vec<&CompiledOperation> = Vec::with_capacity(ops.len());

    for op in ops.iter().rev() {
        if scaffold::RUNTIME_NAMES.contains(&op.camel.as_str()) || is_reserved_word(&op.camel) {
            warn!(
                identifier = %op.camel,
                "operation name is reserved in the generated module, skipping it"
            );
            continue;
        }
        let fresh_pascal = seen_pascal.insert(op.pascal.as_str());
        let fresh_camel = seen_camel.insert(op.camel.as_str());
        if fresh_pascal && fresh_camel {
            kept.push(op);
        } else {
            warn!(
                identifier = %op.pascal,
                "duplicate operation identifier, keeping the later definition"
            );
        }
    }

    kept.reverse();
    kept
}

/// Removes the `Generated at` line so outputs can be compared across runs.
pub fn strip_timestamp(text: &str) -> String {
    text.split_inclusive('\n')
        .filter(|line| !line.starts_with(TIMESTAMP_PREFIX))
        .collect()
}

/// Whether two emitted modules are identical apart from their timestamps.
pub fn same_content(a: &str, b: &str) -> bool {
    strip_timestamp(a) == strip_timestamp(b)
}
