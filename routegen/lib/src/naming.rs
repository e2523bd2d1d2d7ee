//! Identifier synthesis for generated symbols.
//!
//! Operation names arrive in whatever casing the producing service uses
//! (`get-profile`, `user/update`, `GetProfile`). Generated TypeScript needs
//! PascalCase for schemas and types and camelCase for functions.
//!
//! ## Examples
//!
//! ```
//! use routegen_lib::naming::{camel, pascal};
//!
//! assert_eq!(pascal("get-profile"), "GetProfile");
//! assert_eq!(pascal("GetProfile"), "GetProfile");
//! assert_eq!(camel("GetProfile"), "getProfile");
//! ```

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Already-canonical PascalCase: leading uppercase, alphanumeric only.
    static ref CANONICAL_PASCAL: Regex = Regex::new(r"^[A-Z][A-Za-z0-9]*$").unwrap();

    /// Runs of separator characters between name pieces.
    static ref SEPARATORS: Regex = Regex::new(r"[-_/:]+").unwrap();
}

/// Converts a name to PascalCase.
///
/// Canonical input is returned unchanged. Otherwise the name is split on runs
/// of `-`, `_`, `/` and `:` and every piece gets an uppercase first letter.
/// The remaining letters of each piece are left as they are, so
/// `getUser_byId` becomes `GetUserById`.
pub fn pascal(name: &str) -> String {
    if CANONICAL_PASCAL.is_match(name) {
        return name.to_string();
    }

    SEPARATORS
        .split(name)
        .filter(|piece| !piece.is_empty())
        .map(capitalize)
        .collect()
}

/// Converts a name to camelCase (PascalCase with a lowercase first letter).
pub fn camel(name: &str) -> String {
    let pascal = pascal(name);
    let mut chars = pascal.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn capitalize(piece: &str) -> String {
    let mut chars = piece.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Returns true when `name` can be used as a bare JavaScript identifier.
///
/// Used to decide between `input.name` and `input["name"]`, and between bare
/// and quoted object keys.
pub fn is_js_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    }
}

const RESERVED_WORDS: &[&str] = &[
    "arguments", "await", "break", "case", "catch", "class", "const", "continue", "debugger",
    "default", "delete", "do", "else", "enum", "eval", "export", "extends", "false", "finally",
    "for", "function", "if", "implements", "import", "in", "instanceof", "interface", "let",
    "new", "null", "package", "private", "protected", "public", "return", "static", "super",
    "switch", "this", "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield",
];

/// Returns true for JavaScript/TypeScript reserved words, which cannot name
/// a function declaration.
pub fn is_reserved_word(name: &str) -> bool {
    RESERVED_WORDS.contains(&name)
}
