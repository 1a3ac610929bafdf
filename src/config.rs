use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const CONFIG_DIR_PREFIX: &str = "sheets-roster";
const CONFIG_FILE_NAME: &str = "config.toml";

const DEFAULT_CREDENTIALS_PATH: &str = "credentials.json";
// Delete the token file after changing scopes so a new grant is requested.
const DEFAULT_TOKEN_PATH: &str = "token.json";
// https://docs.google.com/spreadsheets/d/1BxiMVs0XRA5nFMdKvBdBZjgmUUqptlbs74OgvE2upms/edit
const DEFAULT_SPREADSHEET_ID: &str = "1BxiMVs0XRA5nFMdKvBdBZjgmUUqptlbs74OgvE2upms";
const DEFAULT_RANGE: &str = "Class Data!A2:E";
const READONLY_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets.readonly";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub credentials_path: PathBuf,
    pub token_path: PathBuf,
    pub scopes: Vec<String>,
    pub spreadsheet_id: String,
    pub range: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            credentials_path: PathBuf::from(DEFAULT_CREDENTIALS_PATH),
            token_path: PathBuf::from(DEFAULT_TOKEN_PATH),
            scopes: vec![READONLY_SCOPE.to_string()],
            spreadsheet_id: DEFAULT_SPREADSHEET_ID.to_string(),
            range: DEFAULT_RANGE.to_string(),
        }
    }
}

/// Values given on the command line, applied on top of the config file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub credentials_path: Option<PathBuf>,
    pub token_path: Option<PathBuf>,
    pub spreadsheet_id: Option<String>,
    pub range: Option<String>,
}

impl Config {
    /// Load the config from `path`, or from the XDG config file if one exists,
    /// falling back to the built-in defaults.
    pub fn load(path: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        let config = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(AppError::Config(format!(
                        "Config file not found at {:?}",
                        path
                    )));
                }
                Self::from_file(path)?
            }
            None => match Self::xdg_dirs().find_config_file(CONFIG_FILE_NAME) {
                Some(found) => Self::from_file(&found)?,
                None => {
                    debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };

        let config = config.with_overrides(overrides);
        config.validate()?;

        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        debug!(?path, "Reading config file");
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {}", e)))
    }

    fn with_overrides(mut self, overrides: &Overrides) -> Self {
        if let Some(path) = &overrides.credentials_path {
            self.credentials_path = path.clone();
        }
        if let Some(path) = &overrides.token_path {
            self.token_path = path.clone();
        }
        if let Some(id) = &overrides.spreadsheet_id {
            self.spreadsheet_id = id.clone();
        }
        if let Some(range) = &overrides.range {
            self.range = range.clone();
        }
        self
    }

    fn validate(&self) -> Result<()> {
        if self.scopes.is_empty() {
            return Err(AppError::Config(
                "At least one OAuth scope must be configured".to_string(),
            ));
        }

        if self.spreadsheet_id.is_empty() || self.range.is_empty() {
            return Err(AppError::Config(
                "spreadsheet_id and range must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    fn xdg_dirs() -> xdg::BaseDirectories {
        xdg::BaseDirectories::with_prefix(CONFIG_DIR_PREFIX)
    }

    /// Get the path the config file is looked up at
    pub fn config_file() -> Result<PathBuf> {
        let xdg = Self::xdg_dirs();
        xdg.get_config_home()
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .ok_or_else(|| AppError::Config("Failed to determine config directory".to_string()))
    }
}
