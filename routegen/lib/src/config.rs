//! Generator configuration.
//!
//! Configuration lives in `routegen.config.json` or `routegen.toml` next to
//! where the generator runs, or at an explicit path. Keys are camelCase;
//! snake_case spellings are accepted as aliases.
//!
//! ```json
//! {
//!   "introspectionUrl": "http://localhost:3000/__introspect",
//!   "baseUrl": "https://api.example.com",
//!   "outputDir": "src/generated",
//!   "outputFile": "client.ts",
//!   "headers": { "Authorization": "Bearer dev-token" }
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{GeneratorError, Result};

/// Config file names probed, in order, when no explicit path is given.
pub const CONFIG_FILE_NAMES: [&str; 2] = ["routegen.config.json", "routegen.toml"];

/// Settings for one generator run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorConfig {
    /// Endpoint serving the introspection array.
    #[serde(default, alias = "introspection_url")]
    pub introspection_url: Option<String>,

    /// Default base URL baked into the generated client.
    #[serde(default, alias = "base_url")]
    pub base_url: Option<String>,

    #[serde(alias = "output_dir")]
    pub output_dir: PathBuf,

    #[serde(alias = "output_file")]
    pub output_file: String,

    /// Local introspection payload, used instead of fetching when set.
    #[serde(default, alias = "introspection_file")]
    pub introspection_file: Option<PathBuf>,

    /// Headers sent with the introspection request.
    #[serde(default)]
    pub headers: IndexMap<String, String>,
}

impl GeneratorConfig {
    /// Full path of the generated module.
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.output_file)
    }

    /// Checks the settings that serde cannot express.
    ///
    /// ## Errors
    ///
    /// Returns [`GeneratorError::ConfigError`] when neither an introspection
    /// URL nor file is configured, or when the output file name is empty.
    pub fn validate(&self) -> Result<()> {
        if self.introspection_url.is_none() && self.introspection_file.is_none() {
            return Err(GeneratorError::ConfigError(
                "either 'introspectionUrl' or 'introspectionFile' must be set".to_string(),
            ));
        }
        if self.output_file.trim().is_empty() {
            return Err(GeneratorError::ConfigError(
                "'outputFile' must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Parses configuration text; `toml` selects TOML, anything else JSON.
    pub fn parse(content: &str, toml: bool) -> Result<Self> {
        let config: Self = if toml {
            toml::from_str(content).map_err(|e| GeneratorError::ConfigError(e.to_string()))?
        } else {
            serde_json::from_str(content)
                .map_err(|e| GeneratorError::ConfigError(e.to_string()))?
        };
        config.validate()?;
        Ok(config)
    }

    /// Loads a config file.
    ///
    /// Relative `outputDir` and `introspectionFile` paths are resolved
    /// against the directory containing the config file.
    ///
    /// ## Errors
    ///
    /// - [`GeneratorError::ReadError`] if the file cannot be read
    /// - [`GeneratorError::ConfigError`] if it does not parse or validate
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| GeneratorError::ReadError {
            path: path.display().to_string(),
            source: e,
        })?;

        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        let mut config = Self::parse(&content, is_toml).map_err(|e| match e {
            GeneratorError::ConfigError(message) => {
                GeneratorError::ConfigError(format!("{}: {message}", path.display()))
            }
            other => other,
        })?;

        if let Some(base) = path.parent() {
            config.resolve_relative_to(base);
        }
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    fn resolve_relative_to(&mut self, base: &Path) {
        if self.output_dir.is_relative() {
            self.output_dir = base.join(&self.output_dir);
        }
        if let Some(file) = &self.introspection_file
            && file.is_relative()
        {
            self.introspection_file = Some(base.join(file));
        }
    }
}

/// Finds the config file to use.
///
/// An explicit path is returned as-is (it need not exist yet; loading it
/// reports the error). Otherwise the first of [`CONFIG_FILE_NAMES`] present
/// in `dir` wins.
///
/// ## Errors
///
/// Returns [`GeneratorError::ConfigError`] when nothing is found.
pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| {
            GeneratorError::ConfigError(format!(
                "no configuration found in '{}' (looked for {})",
                dir.display(),
                CONFIG_FILE_NAMES.join(", ")
            ))
        })
}
