use std::{fmt::Display, fs, io::ErrorKind, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Login settings. Read once per invocation and handed to the `login` action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

impl Config {
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::load_optional(path)?.ok_or_else(|| ConfigError::NotFound {
            path: path.to_path_buf(),
        })
    }

    /// Like [`Config::load_from`], but a missing file is `Ok(None)`.
    pub fn load_optional(path: &Path) -> Result<Option<Self>, ConfigError> {
        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::ReadFailed {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let config = Self::parse(&data)?;
        Ok(Some(config))
    }

    pub fn parse(data: &str) -> Result<Self, ConfigError> {
        toml::from_str(data).map_err(|source| ConfigError::InvalidFormat { source })
    }

    /// Template written by `config --init`.
    pub fn template() -> Self {
        Self {
            username: "your_username".to_string(),
            email: "your_email@example.com".to_string(),
            password: "your_password".to_string(),
            language: default_language(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("username", &self.username),
            ("email", &self.email),
            ("password", &self.password),
            ("language", &self.language),
        ];

        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingField {
                    field: field.to_string(),
                });
            }
        }

        Ok(())
    }
}

impl Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Username: {}\nEmail: {}\nPassword: {}\nLanguage: {}",
            self.username,
            self.email,
            "*".repeat(self.password.chars().count().min(8)),
            self.language
        )
    }
}
