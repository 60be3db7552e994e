//! Resolved run configuration.
//!
//! Settings are layered with figment, lowest precedence first:
//!
//! 1. Built-in defaults
//! 2. TOML config file (`--config`, else `<config dir>/dirdupes/config.toml` if present)
//! 3. Environment variables prefixed `DIRDUPES_` (e.g. `DIRDUPES_CHECK_SIZE=true`)
//! 4. Command-line flags
//!
//! # Example config file
//!
//! ```toml
//! folders = ["/home/me/Photos", "/mnt/backup/Photos"]
//! exclude_folder_names = [".git", "node_modules"]
//! extensions = ["jpg", "jpeg", "png"]
//! check_size = true
//! minimum_size = 10000
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::actions::DEFAULT_LOG_PATH;
use crate::catalog::CatalogConfig;
use crate::cli::Cli;
use crate::output::DEFAULT_REPORT_PATH;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "DIRDUPES_";

/// Errors resolving the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No folder was given on the command line, in the config file or the environment.
    #[error("no folders to search; pass --folders or set `folders` in the config file")]
    NoFolders,

    /// An explicitly requested config file does not exist.
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    /// A configuration layer could not be parsed.
    #[error("invalid configuration: {0}")]
    Invalid(#[source] Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        Self::Invalid(Box::new(e))
    }
}

/// The complete set of settings for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Folders to search
    pub folders: Vec<PathBuf>,
    /// Absolute folder prefixes to skip
    pub exclude_folders: Vec<PathBuf>,
    /// File name patterns to skip
    pub exclude_filenames: Vec<String>,
    /// Folder basenames to skip anywhere
    pub exclude_folder_names: Vec<String>,
    /// Extension allow-list, normalized to lower case without the dot
    pub extensions: Vec<String>,
    /// Match on name and size instead of name only
    pub check_size: bool,
    /// Skip files smaller than this many bytes
    pub minimum_size: Option<u64>,
    /// Report location
    pub output_path: PathBuf,
    /// Deletion audit log location
    pub deletion_log_path: PathBuf,
    /// Run the interactive review after the report
    pub interactive_delete: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            folders: Vec::new(),
            exclude_folders: Vec::new(),
            exclude_filenames: Vec::new(),
            exclude_folder_names: Vec::new(),
            extensions: Vec::new(),
            check_size: false,
            minimum_size: None,
            output_path: PathBuf::from(DEFAULT_REPORT_PATH),
            deletion_log_path: PathBuf::from(DEFAULT_LOG_PATH),
            interactive_delete: false,
        }
    }
}

/// Command-line values that override lower layers. Unset flags are omitted
/// so they do not mask the config file or environment.
#[derive(Debug, Default, Serialize)]
pub struct CliOverrides {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    folders: Vec<PathBuf>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    exclude_folders: Vec<PathBuf>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    exclude_filenames: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    exclude_folder_names: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    extensions: Vec<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    check_size: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    minimum_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    output_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    deletion_log_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    interactive_delete: bool,
}

impl From<&Cli> for CliOverrides {
    fn from(cli: &Cli) -> Self {
        Self {
            folders: cli.folders.clone(),
            exclude_folders: cli.exclude_folders.clone(),
            exclude_filenames: cli.exclude_filenames.clone(),
            exclude_folder_names: cli.exclude_folder_names.clone(),
            extensions: cli.extensions.clone(),
            check_size: cli.check_size,
            minimum_size: cli.minimum_size,
            output_path: cli.output_path.clone(),
            deletion_log_path: cli.deletion_log_path.clone(),
            interactive_delete: cli.interactive_delete,
        }
    }
}

impl RunConfig {
    /// Default config file location for this platform.
    #[must_use]
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "dirdupes").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Defaults plus the config file layer.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if `config_file` is given but missing.
    pub fn file_figment(config_file: Option<&Path>) -> Result<Figment, ConfigError> {
        let figment = Figment::from(Serialized::defaults(Self::default()));

        match config_file {
            Some(path) if !path.is_file() => Err(ConfigError::NotFound(path.to_path_buf())),
            Some(path) => Ok(figment.merge(Toml::file(path))),
            None => match Self::default_config_path() {
                Some(path) if path.is_file() => {
                    log::debug!("Using config file {}", path.display());
                    Ok(figment.merge(Toml::file(path)))
                }
                _ => Ok(figment),
            },
        }
    }

    /// Resolve every layer for a command line.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if a layer is missing or malformed, or if no
    /// folders remain after layering.
    pub fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let figment = Self::file_figment(cli.config.as_deref())?
            .merge(Env::prefixed(ENV_PREFIX))
            .merge(Serialized::defaults(CliOverrides::from(cli)));
        Self::from_figment(&figment)
    }

    /// Extract, normalize and validate.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` for malformed values and
    /// `ConfigError::NoFolders` if `folders` is empty.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let mut config: Self = figment.extract()?;
        config.normalize();
        if config.folders.is_empty() {
            return Err(ConfigError::NoFolders);
        }
        Ok(config)
    }

    fn normalize(&mut self) {
        let mut extensions: Vec<String> = self
            .extensions
            .iter()
            .map(|e| e.trim().trim_start_matches('.').to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        extensions.sort();
        extensions.dedup();
        self.extensions = extensions;
    }
}

impl From<&RunConfig> for CatalogConfig {
    fn from(config: &RunConfig) -> Self {
        Self {
            exclude_folders: config.exclude_folders.clone(),
            exclude_filenames: config.exclude_filenames.clone(),
            exclude_folder_names: config.exclude_folder_names.clone(),
            extensions: config.extensions.clone(),
            check_size: config.check_size,
            minimum_size: config.minimum_size,
        }
    }
}
