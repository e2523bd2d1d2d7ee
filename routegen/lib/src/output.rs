//! Writing generated modules to disk.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::codegen::same_content;
use crate::errors::GeneratorError;

/// Replaces `path` with `content` in one rename.
///
/// The module is staged in a hidden sibling (`.client.ts.routegen-tmp`),
/// flushed, and renamed over the target, so readers see either the previous
/// module or the new one. Missing parent directories are created. The staged
/// file is removed again when the write or the rename fails.
///
/// ## Errors
///
/// Returns `GeneratorError::WriteError` naming the path that could not be
/// created, written or renamed.
pub fn write_atomic(path: &Path, content: &str) -> Result<(), GeneratorError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| write_error(dir, e))?;

    let staged = staging_path(path);
    let result = stage(&staged, content).and_then(|()| {
        fs::rename(&staged, path).map_err(|e| write_error(path, e))
    });
    if result.is_err() {
        let _ = fs::remove_file(&staged);
    }
    result
}

fn stage(staged: &Path, content: &str) -> Result<(), GeneratorError> {
    let mut file = File::create(staged).map_err(|e| write_error(staged, e))?;
    file.write_all(content.as_bytes())
        .and_then(|()| file.sync_all())
        .map_err(|e| write_error(staged, e))
}

fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.routegen-tmp"))
}

fn write_error(path: &Path, source: std::io::Error) -> GeneratorError {
    GeneratorError::WriteError {
        path: path.display().to_string(),
        source,
    }
}

/// Writes `content` unless the file already holds the same module.
///
/// Modules are compared ignoring their `Generated at` line, so an unchanged
/// API does not rewrite the file just to bump the timestamp.
///
/// ## Returns
///
/// `true` when the file was written.
pub fn write_if_changed(path: &Path, content: &str) -> Result<bool, GeneratorError> {
    if let Ok(existing) = fs::read_to_string(path)
        && same_content(&existing, content)
    {
        debug!(path = %path.display(), "output unchanged, skipping write");
        return Ok(false);
    }

    write_atomic(path, content)?;
    Ok(true)
}
