//! # Console Configuration
//!
//! Where the database lives and which lending limit applies.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command line (highest priority)                                    │
//! │     biblio --db ./library.db ...                                       │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     BIBLIO_DB_PATH=/srv/library/biblio.db                              │
//! │     BIBLIO_MAX_LOANS=3                                                 │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     --config <path>, or                                                │
//! │     ~/.config/biblio/biblio.toml (Linux)                               │
//! │     ~/Library/Application Support/cat.biblio.biblio/biblio.toml (macOS)│
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! │     <data dir>/biblio.db, 3 loans per member                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # biblio.toml
//! [database]
//! path = "/srv/library/biblio.db"
//!
//! [lending]
//! max_loans_per_member = 3
//! ```

use biblio_core::MAX_LOANS_PER_MEMBER;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable overriding the database path.
pub const ENV_DB_PATH: &str = "BIBLIO_DB_PATH";

/// Environment variable overriding the borrowing limit.
pub const ENV_MAX_LOANS: &str = "BIBLIO_MAX_LOANS";

const CONFIG_FILE_NAME: &str = "biblio.toml";
const DATABASE_FILE_NAME: &str = "biblio.db";

// =============================================================================
// Errors
// =============================================================================

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for this schema.
    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A setting has an unusable value.
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },

    /// No platform data directory and no explicit database path.
    #[error("Could not determine a data directory; set {ENV_DB_PATH} or pass --db")]
    NoDataDirectory,
}

// =============================================================================
// File Schema
// =============================================================================

/// Contents of `biblio.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub database: DatabaseSection,

    #[serde(default)]
    pub lending: LendingSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseSection {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LendingSection {
    pub max_loans_per_member: Option<u32>,
}

impl FileConfig {
    /// Parses a config file body.
    pub fn from_toml_str(body: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(body).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reads a config file. A missing file yields the empty config.
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(body) => {
                debug!(path = %path.display(), "Read config file");
                Self::from_toml_str(&body, path)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No config file, using defaults");
                Ok(FileConfig::default())
            }
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

// =============================================================================
// Resolved Configuration
// =============================================================================

/// Settings after all sources are merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub max_loans_per_member: u32,
}

impl AppConfig {
    /// Loads configuration from every source, in priority order.
    ///
    /// ## Arguments
    /// * `cli_db` - `--db` value, if given
    /// * `config_path` - `--config` value, if given
    pub fn load(cli_db: Option<PathBuf>, config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let dirs = project_dirs();

        let file = match config_path {
            Some(path) => FileConfig::read(path)?,
            None => match &dirs {
                Some(dirs) => FileConfig::read(&dirs.config_dir().join(CONFIG_FILE_NAME))?,
                None => FileConfig::default(),
            },
        };

        let default_db = dirs.map(|d| d.data_dir().join(DATABASE_FILE_NAME));

        let config = Self::resolve(cli_db, |key| std::env::var(key).ok(), file, default_db)?;

        info!(
            path = %config.database_path.display(),
            max_loans = config.max_loans_per_member,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Merges the sources. Pure, so the priority rules are testable.
    pub fn resolve(
        cli_db: Option<PathBuf>,
        env: impl Fn(&str) -> Option<String>,
        file: FileConfig,
        default_db: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let database_path = cli_db
            .or_else(|| env(ENV_DB_PATH).filter(|v| !v.trim().is_empty()).map(PathBuf::from))
            .or(file.database.path)
            .or(default_db)
            .ok_or(ConfigError::NoDataDirectory)?;

        let max_loans_per_member = match env(ENV_MAX_LOANS) {
            Some(raw) => raw
                .trim()
                .parse()
                .ok()
                .and_then(positive_limit)
                .ok_or_else(|| ConfigError::InvalidValue {
                    key: ENV_MAX_LOANS.to_string(),
                    value: raw.clone(),
                })?,
            None => match file.lending.max_loans_per_member {
                Some(n) => positive_limit(n).ok_or_else(|| ConfigError::InvalidValue {
                    key: "lending.max_loans_per_member".to_string(),
                    value: n.to_string(),
                })?,
                None => MAX_LOANS_PER_MEMBER,
            },
        };

        Ok(AppConfig {
            database_path,
            max_loans_per_member,
        })
    }
}

/// A limit of zero would refuse every loan.
fn positive_limit(n: u32) -> Option<u32> {
    (n > 0).then_some(n)
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("cat", "biblio", "biblio")
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn file_with(path: Option<&str>, max: Option<u32>) -> FileConfig {
        FileConfig {
            database: DatabaseSection {
                path: path.map(PathBuf::from),
            },
            lending: LendingSection {
                max_loans_per_member: max,
            },
        }
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::resolve(
            None,
            env_from(&[]),
            FileConfig::default(),
            Some(PathBuf::from("/data/biblio.db")),
        )
        .unwrap();

        assert_eq!(config.database_path, PathBuf::from("/data/biblio.db"));
        assert_eq!(config.max_loans_per_member, 3);
    }

    #[test]
    fn test_priority_order() {
        let file = file_with(Some("/file.db"), Some(5));
        let default_db = Some(PathBuf::from("/default.db"));

        let config = AppConfig::resolve(
            Some(PathBuf::from("/cli.db")),
            env_from(&[(ENV_DB_PATH, "/env.db"), (ENV_MAX_LOANS, "4")]),
            file.clone(),
            default_db.clone(),
        )
        .unwrap();
        assert_eq!(config.database_path, PathBuf::from("/cli.db"));
        assert_eq!(config.max_loans_per_member, 4);

        let config = AppConfig::resolve(
            None,
            env_from(&[(ENV_DB_PATH, "/env.db")]),
            file.clone(),
            default_db.clone(),
        )
        .unwrap();
        assert_eq!(config.database_path, PathBuf::from("/env.db"));
        assert_eq!(config.max_loans_per_member, 5);

        let config = AppConfig::resolve(None, env_from(&[]), file, default_db).unwrap();
        assert_eq!(config.database_path, PathBuf::from("/file.db"));
    }

    #[test]
    fn test_blank_env_path_is_ignored() {
        let config = AppConfig::resolve(
            None,
            env_from(&[(ENV_DB_PATH, "  ")]),
            FileConfig::default(),
            Some(PathBuf::from("/default.db")),
        )
        .unwrap();
        assert_eq!(config.database_path, PathBuf::from("/default.db"));
    }

    #[test]
    fn test_invalid_max_loans() {
        let err = AppConfig::resolve(
            Some(PathBuf::from("/cli.db")),
            env_from(&[(ENV_MAX_LOANS, "three")]),
            FileConfig::default(),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_zero_max_loans_is_rejected() {
        let err = AppConfig::resolve(
            Some(PathBuf::from("/cli.db")),
            env_from(&[(ENV_MAX_LOANS, " 0 ")]),
            FileConfig::default(),
            None,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { ref key, .. } if key == ENV_MAX_LOANS
        ));

        let err = AppConfig::resolve(
            Some(PathBuf::from("/cli.db")),
            env_from(&[]),
            file_with(None, Some(0)),
            None,
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid value for lending.max_loans_per_member: '0'"
        );
    }

    #[test]
    fn test_no_path_anywhere() {
        let err =
            AppConfig::resolve(None, env_from(&[]), FileConfig::default(), None).unwrap_err();
        assert!(matches!(err, ConfigError::NoDataDirectory));
    }

    #[test]
    fn test_parse_file() {
        let body = r#"
            [database]
            path = "/srv/library/biblio.db"

            [lending]
            max_loans_per_member = 2
        "#;
        let file = FileConfig::from_toml_str(body, Path::new("biblio.toml")).unwrap();
        assert_eq!(file, file_with(Some("/srv/library/biblio.db"), Some(2)));

        let empty = FileConfig::from_toml_str("", Path::new("biblio.toml")).unwrap();
        assert_eq!(empty, FileConfig::default());

        let err = FileConfig::from_toml_str("[lending]\nmax = 2\n", Path::new("biblio.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_missing_file_is_empty_config() {
        let file = FileConfig::read(Path::new("/definitely/not/here/biblio.toml")).unwrap();
        assert_eq!(file, FileConfig::default());
    }
}
