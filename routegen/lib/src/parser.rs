//! Path parameter extraction from operation paths.
//!
//! Operation paths mark parameters with a leading colon (`/users/:id`). The
//! generated client substitutes validated input fields into those slots.

use lazy_static::lazy_static;
use regex::Regex;

use crate::naming::is_js_identifier;

lazy_static! {
    static ref PATH_PARAM: Regex = Regex::new(r":(\w+)").unwrap();
}

/// Extracts parameter names from a path template, left to right.
///
/// Duplicates are kept in the order they occur.
///
/// ## Examples
///
/// ```
/// use routegen_lib::parser::extract_path_params;
///
/// assert_eq!(extract_path_params("/api/user"), Vec::<&str>::new());
/// assert_eq!(extract_path_params("/api/profile/:id"), vec!["id"]);
/// assert_eq!(
///     extract_path_params("/threads/:thread_id/messages/:message_id"),
///     vec!["thread_id", "message_id"]
/// );
/// ```
pub fn extract_path_params(path: &str) -> Vec<&str> {
    PATH_PARAM
        .captures_iter(path)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect()
}

/// Builds the body of a TypeScript template literal for `path`.
///
/// Each `:param` becomes an interpolation of the matching field on
/// `input_var`, passed through `encodeURIComponent`. Characters that are
/// special inside template literals are escaped in the literal segments.
///
/// ## Examples
///
/// ```
/// use routegen_lib::parser::url_template;
///
/// assert_eq!(
///     url_template("/api/profile/:id", "input"),
///     "/api/profile/${encodeURIComponent(String(input.id))}"
/// );
/// ```
pub fn url_template(path: &str, input_var: &str) -> String {
    let mut out = String::with_capacity(path.len() + 32);
    let mut last = 0;

    for caps in PATH_PARAM.captures_iter(path) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        out.push_str(&escape_template_literal(&path[last..whole.start()]));
        out.push_str(&interpolation(name.as_str(), input_var));
        last = whole.end();
    }
    out.push_str(&escape_template_literal(&path[last..]));
    out
}

fn interpolation(name: &str, input_var: &str) -> String {
    format!(
        "${{encodeURIComponent(String({}))}}",
        field_access(input_var, name)
    )
}

/// Renders a property access on `object`, quoting names that are not valid
/// identifiers (`input.id`, `input["2fa"]`).
pub fn field_access(object: &str, name: &str) -> String {
    if is_js_identifier(name) {
        format!("{object}.{name}")
    } else {
        format!("{object}[{}]", js_string(name))
    }
}

/// Renders `value` as a double-quoted JavaScript string literal.
///
/// Line and paragraph separators are escaped too; pre-ES2019 parsers treat
/// them as line terminators inside string literals.
pub fn js_string(value: &str) -> String {
    serde_json::Value::from(value)
        .to_string()
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029")
}

fn escape_template_literal(segment: &str) -> String {
    segment
        .replace('\\', "\\\\")
        .replace('`', "\\`")
        .replace("${", "\\${")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_no_params() {
        assert_eq!(extract_path_params("/models"), Vec::<&str>::new());
        assert_eq!(extract_path_params("/"), Vec::<&str>::new());
        assert_eq!(extract_path_params(""), Vec::<&str>::new());
    }

    #[test]
    fn extract_single_param() {
        assert_eq!(extract_path_params("/api/profile/:id"), vec!["id"]);
        assert_eq!(extract_path_params("/:id"), vec!["id"]);
        assert_eq!(extract_path_params("/users/:user_id/posts"), vec!["user_id"]);
    }

    #[test]
    fn extract_multiple_params_in_order() {
        assert_eq!(
            extract_path_params("/orgs/:org/repos/:repo/issues/:issue"),
            vec!["org", "repo", "issue"]
        );
    }

    #[test]
    fn extract_keeps_duplicates() {
        assert_eq!(extract_path_params("/:id/copy/:id"), vec!["id", "id"]);
    }

    #[test]
    fn lone_colon_is_not_a_param() {
        assert_eq!(extract_path_params("/time/12:/x"), Vec::<&str>::new());
    }

    #[test]
    fn template_without_params_is_literal() {
        assert_eq!(url_template("/api/user", "input"), "/api/user");
    }

    #[test]
    fn template_substitutes_every_param() {
        assert_eq!(
            url_template("/a/:x/b/:y", "input"),
            "/a/${encodeURIComponent(String(input.x))}/b/${encodeURIComponent(String(input.y))}"
        );
    }

    #[test]
    fn template_does_not_confuse_prefixed_names() {
        assert_eq!(
            url_template("/:id/:idx", "input"),
            "/${encodeURIComponent(String(input.id))}/${encodeURIComponent(String(input.idx))}"
        );
    }

    #[test]
    fn template_escapes_literal_segments() {
        assert_eq!(url_template("/a`b/${c}", "input"), "/a\\`b/\\${c}");
    }

    #[test]
    fn js_string_escapes_quotes_and_separators() {
        assert_eq!(js_string(r#"a"b"#), r#""a\"b""#);
        assert_eq!(js_string("x\u{2028}y\u{2029}"), r#""x\u2028y\u2029""#);
        assert_eq!(js_string(""), r#""""#);
    }

    #[test]
    fn numeric_param_names_use_bracket_access() {
        assert_eq!(
            url_template("/v/:0", "input"),
            "/v/${encodeURIComponent(String(input[\"0\"]))}"
        );
    }
}
