//! routegen code generator library.
//!
//! Turns the operation list published by an RPC-style HTTP service into a
//! TypeScript client module built on `zod`. The generated module contains:
//!
//! - A `zod` schema and a TypeScript type for every operation's input and output
//! - One async function per operation that validates its arguments, builds the
//!   URL from the path template, sends the request and validates the response
//! - A `configure()` function for the base URL and request headers
//! - A `schemas` map and a default export aggregating everything
//!
//! ## Modules
//!
//! - [`operation`] - Operation descriptions and payload validation
//! - [`schema`] - The schema tree compiled by [`codegen`]
//! - [`codegen`] - Schema, route and module code generation
//! - [`naming`] - PascalCase / camelCase identifier synthesis
//! - [`parser`] - Path parameter extraction and URL templates
//! - [`introspection`] - Fetching (with retries) or loading the payload
//! - [`config`] - Generator configuration files
//! - [`output`] - Atomic file writing
//! - [`pipeline`] - A full load, compile, emit and write run
//! - [`errors`] - Error types for the generator
//!
//! ## Example Usage
//!
//! ```
//! use routegen_lib::codegen::EmitConfig;
//! use routegen_lib::operation::parse_operations;
//! use routegen_lib::pipeline::render;
//! use serde_json::json;
//!
//! let ops = parse_operations(&json!([{
//!     "name": "UpdateProfile",
//!     "path": "/api/profile/:id",
//!     "verb": "PUT",
//!     "input": {
//!         "type": "object",
//!         "required": ["id", "name"],
//!         "properties": { "id": { "type": "string" }, "name": { "type": "string" } }
//!     },
//!     "output": { "type": "object", "properties": {} }
//! }])).unwrap();
//!
//! let module = render(&ops, &EmitConfig::default());
//! assert!(module.contains("export const UpdateProfileArgsSchema = "));
//! assert!(module.contains("body: JSON.stringify(input)"));
//! ```
//!
//! ## Generated Code Structure
//!
//! ```text
//! import { z } from "zod";
//!
//! export const UpdateProfileArgsSchema = z.object({ id: z.string(), name: z.string() });
//! export type UpdateProfileArgs = { id: string; name: string };
//! export const UpdateProfileResultSchema = ...;
//! export type UpdateProfileResult = ...;
//!
//! export type ClientConfig = { baseUrl: string; headers: HeaderProvider };
//! export const clientConfig: ClientConfig = { ... };
//! export function configure(options: Partial<ClientConfig>): ClientConfig;
//!
//! export async function updateProfile(args, config = clientConfig): Promise<UpdateProfileResult>;
//!
//! export const schemas = { UpdateProfileArgsSchema, UpdateProfileResultSchema };
//! export default { configure, schemas, updateProfile };
//! ```

pub mod codegen;
pub mod config;
pub mod errors;
pub mod introspection;
pub mod naming;
pub mod operation;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod schema;

pub use config::GeneratorConfig;
pub use errors::{GeneratorError, Result};
pub use introspection::{IntrospectionClient, RetryPolicy};
pub use operation::{HttpVerb, OperationDescription};
pub use pipeline::{generate, GenerationReport};
