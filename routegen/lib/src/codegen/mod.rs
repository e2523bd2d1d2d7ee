//! Code generation for TypeScript clients.
//!
//! ## Submodules
//!
//! - [`schema`] - Compiles schema nodes to zod validators and TypeScript types
//! - [`route`] - Assembles one operation: validators, URL builder, client function
//! - [`scaffold`] - Fixed runtime shared by every client (config, errors, headers)
//! - [`module`] - Orders everything into the final module text
//!
//! ## Code Generation Flow
//!
//! 1. Every [`OperationDescription`](crate::operation::OperationDescription)
//!    goes through [`compile_operation`], which calls [`compile`] for its
//!    input and output schemas
//! 2. [`emit`] concatenates the compiled operations with the scaffolding
//!
//! All generators return plain `String`s; nothing here touches the network or
//! the filesystem. See [`crate::output`] for writing the result.

pub mod module;
pub mod route;
pub mod scaffold;
pub mod schema;

pub use module::{emit, emit_at, same_content, strip_timestamp, EmitConfig};
pub use route::{compile_operation, render_function, CompiledOperation};
pub use schema::{compile, CompiledSchema};
