//! Configuration management for `sprintdeck`.
//!
//! Configuration sources and precedence (highest wins):
//! 1. CLI overrides
//! 2. Environment variables (`SPRINTDECK_*`)
//! 3. Project config (.sprintdeck/config.toml)
//! 4. Defaults
//!
//! The API key is never written to the config file; it comes from the
//! environment only.

use crate::error::{Result, SprintError};
use crate::store::{HttpStore, LocalStore, RecordStore};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Workspace directory name, discovered by walking up from the CWD.
pub const SPRINTDECK_DIR: &str = ".sprintdeck";
/// Config filename inside the workspace directory.
pub const CONFIG_FILENAME: &str = "config.toml";
/// Local store filename inside the workspace directory.
pub const STORE_FILENAME: &str = "store.json";

const ENV_DIR: &str = "SPRINTDECK_DIR";
const ENV_ACTOR: &str = "SPRINTDECK_ACTOR";
const ENV_BACKEND: &str = "SPRINTDECK_BACKEND";
const ENV_ENDPOINT: &str = "SPRINTDECK_ENDPOINT";
const ENV_API_KEY: &str = "SPRINTDECK_API_KEY";

/// Which record store backs the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    #[default]
    Local,
    Http,
}

impl Backend {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Http => "http",
        }
    }
}

impl std::str::FromStr for Backend {
    type Err = SprintError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "http" => Ok(Self::Http),
            other => Err(SprintError::Config(format!("unknown backend '{other}'"))),
        }
    }
}

/// Default all-clients view mode for `sd status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    Single,
    Matrix,
}

impl ViewMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Matrix => "matrix",
        }
    }
}

impl std::str::FromStr for ViewMode {
    type Err = SprintError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "single" => Ok(Self::Single),
            "matrix" => Ok(Self::Matrix),
            other => Err(SprintError::Config(format!("unknown view mode '{other}'"))),
        }
    }
}

/// The persisted project config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub backend: Backend,

    /// Hosted store base URL (http backend only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Default actor identity stamped on completions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,

    #[serde(default)]
    pub view_mode: ViewMode,
}

impl ConfigFile {
    /// Load the config file from the workspace directory, defaulting every
    /// field when the file is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(sprintdeck_dir: &Path) -> Result<Self> {
        let path = sprintdeck_dir.join(CONFIG_FILENAME);
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(&path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Write the config file back to the workspace directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be serialized or written.
    pub fn save(&self, sprintdeck_dir: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| SprintError::Config(format!("cannot serialize config: {e}")))?;
        fs::write(sprintdeck_dir.join(CONFIG_FILENAME), contents)?;
        Ok(())
    }
}

/// CLI-level overrides, highest precedence.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub dir: Option<PathBuf>,
    pub actor: Option<String>,
    pub json: Option<bool>,
}

/// Fully resolved configuration for one invocation.
#[derive(Debug, Clone)]
pub struct Config {
    pub sprintdeck_dir: PathBuf,
    pub backend: Backend,
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub actor: Option<String>,
    pub view_mode: ViewMode,
}

impl Config {
    /// Resolve the layered configuration for the discovered workspace.
    ///
    /// # Errors
    ///
    /// Returns `NotInitialized` if no workspace directory is found, or a
    /// config error if the file cannot be parsed.
    pub fn resolve(overrides: &CliOverrides) -> Result<Self> {
        let sprintdeck_dir = discover_dir(overrides.dir.as_deref())?;
        Self::resolve_in(&sprintdeck_dir, overrides)
    }

    /// Resolve configuration against an explicit workspace directory.
    ///
    /// # Errors
    ///
    /// Returns a config error if the file cannot be parsed.
    pub fn resolve_in(sprintdeck_dir: &Path, overrides: &CliOverrides) -> Result<Self> {
        let file = ConfigFile::load(sprintdeck_dir)?;

        let backend = match non_empty_env(ENV_BACKEND) {
            Some(value) => value.parse()?,
            None => file.backend,
        };
        let endpoint = non_empty_env(ENV_ENDPOINT).or(file.endpoint);
        let actor = overrides
            .actor
            .clone()
            .filter(|a| !a.trim().is_empty())
            .or_else(|| non_empty_env(ENV_ACTOR))
            .or(file.actor);

        Ok(Self {
            sprintdeck_dir: sprintdeck_dir.to_path_buf(),
            backend,
            endpoint,
            api_key: non_empty_env(ENV_API_KEY),
            actor,
            view_mode: file.view_mode,
        })
    }

    /// Path of the local store file.
    #[must_use]
    pub fn store_path(&self) -> PathBuf {
        self.sprintdeck_dir.join(STORE_FILENAME)
    }

    /// Open the configured record store backend.
    ///
    /// # Errors
    ///
    /// `NotInitialized` if the local store file is missing; a config error
    /// if the http backend lacks an endpoint or API key.
    pub fn open_store(&self) -> Result<Box<dyn RecordStore>> {
        match self.backend {
            Backend::Local => Ok(Box::new(LocalStore::open(&self.store_path())?)),
            Backend::Http => {
                let endpoint = self.endpoint.as_deref().ok_or_else(|| {
                    SprintError::Config(format!(
                        "http backend needs an endpoint (set {ENV_ENDPOINT} or config.toml)"
                    ))
                })?;
                let api_key = self.api_key.as_deref().ok_or_else(|| {
                    SprintError::Config(format!("http backend needs {ENV_API_KEY}"))
                })?;
                Ok(Box::new(HttpStore::new(endpoint, api_key)?))
            }
        }
    }

    /// The actor identity, required for completion mutations.
    ///
    /// # Errors
    ///
    /// Returns `MissingActor` if no actor is configured anywhere.
    pub fn require_actor(&self) -> Result<&str> {
        self.actor
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .ok_or(SprintError::MissingActor)
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Discover the active `.sprintdeck` directory.
///
/// Honors an explicit override, then `SPRINTDECK_DIR`, then walks up from
/// the current directory.
///
/// # Errors
///
/// Returns `NotInitialized` if no workspace directory is found.
pub fn discover_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if path.is_dir() {
            return Ok(path.to_path_buf());
        }
        return Err(SprintError::NotInitialized);
    }

    if let Some(value) = non_empty_env(ENV_DIR) {
        let path = PathBuf::from(value);
        if path.is_dir() {
            return Ok(path);
        }
    }

    let mut current = env::current_dir()?;
    loop {
        let candidate = current.join(SPRINTDECK_DIR);
        if candidate.is_dir() {
            return Ok(candidate);
        }
        if !current.pop() {
            break;
        }
    }

    Err(SprintError::NotInitialized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_config_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let file = ConfigFile::load(temp.path()).unwrap();
        assert_eq!(file.backend, Backend::Local);
        assert!(file.actor.is_none());
        assert_eq!(file.view_mode, ViewMode::Single);
    }

    #[test]
    fn config_file_roundtrip() {
        let temp = TempDir::new().unwrap();
        let file = ConfigFile {
            backend: Backend::Http,
            endpoint: Some("https://store.example.com/v0/base1".to_string()),
            actor: Some("Jordan".to_string()),
            view_mode: ViewMode::Matrix,
        };
        file.save(temp.path()).unwrap();
        assert_eq!(ConfigFile::load(temp.path()).unwrap(), file);
    }

    #[test]
    fn cli_actor_beats_config_file() {
        let temp = TempDir::new().unwrap();
        ConfigFile {
            actor: Some("Casey".to_string()),
            ..Default::default()
        }
        .save(temp.path())
        .unwrap();

        let overrides = CliOverrides {
            actor: Some("Jordan".to_string()),
            ..Default::default()
        };
        let config = Config::resolve_in(temp.path(), &overrides).unwrap();
        assert_eq!(config.actor.as_deref(), Some("Jordan"));
    }

    #[test]
    fn require_actor_rejects_blank() {
        let temp = TempDir::new().unwrap();
        let config = Config::resolve_in(temp.path(), &CliOverrides::default()).unwrap();
        assert!(matches!(
            config.require_actor(),
            Err(SprintError::MissingActor)
        ));
    }

    #[test]
    fn discover_rejects_missing_explicit_dir() {
        let temp = TempDir::new().unwrap();
        let result = discover_dir(Some(&temp.path().join("nope")));
        assert!(matches!(result, Err(SprintError::NotInitialized)));
    }

    #[test]
    fn backend_parse() {
        assert_eq!("http".parse::<Backend>().unwrap(), Backend::Http);
        assert!("sqlite".parse::<Backend>().is_err());
    }
}
