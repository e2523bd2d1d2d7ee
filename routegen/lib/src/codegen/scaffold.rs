//! Fixed TypeScript runtime shared by every generated client.

use crate::parser::js_string;

/// Value-level names the scaffolding declares or the client functions call.
///
/// A client function with one of these names would redeclare or shadow it.
pub const RUNTIME_NAMES: &[&str] = &[
    "z",
    "configure",
    "schemas",
    "clientConfig",
    "resolveHeaders",
    "fetch",
    "encodeURIComponent",
];

/// Configuration types of the generated client.
pub const CONFIG_TYPES: &str = r#"export type HeaderProvider =
  | Record<string, string>
  | (() => Record<string, string> | Promise<Record<string, string>>);

export type ClientConfig = {
  baseUrl: string;
  headers: HeaderProvider;
};
"#;

/// `configure`, a partial update of the default configuration object.
pub const CONFIGURE: &str = r#"export function configure(options: Partial<ClientConfig>): ClientConfig {
  if (options.baseUrl !== undefined) {
    clientConfig.baseUrl = options.baseUrl;
  }
  if (options.headers !== undefined) {
    clientConfig.headers = options.headers;
  }
  return clientConfig;
}
"#;

/// Error classes and header resolution used by the client functions.
pub const RUNTIME: &str = r#"export class HttpError extends Error {
  constructor(
    public readonly status: number,
    public readonly body: string,
  ) {
    super(`Request failed with status ${status}`);
    this.name = "HttpError";
  }
}

export class ResponseValidationError extends Error {
  constructor(
    public readonly operation: string,
    public readonly issues: z.ZodError,
  ) {
    super(`Response of ${operation} failed validation: ${issues.message}`);
    this.name = "ResponseValidationError";
  }
}

async function resolveHeaders(headers: HeaderProvider): Promise<Record<string, string>> {
  return typeof headers === "function" ? await headers() : headers;
}
"#;

/// Default configuration object; `baseUrl` falls back to the empty string.
pub fn client_config(base_url: Option<&str>) -> String {
    format!(
        "export const clientConfig: ClientConfig = {{\n  baseUrl: {},\n  headers: {{}},\n}};\n",
        js_string(base_url.unwrap_or_default())
    )
}
