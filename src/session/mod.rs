//! The saved login session.
//!
//! A [`CookieBundle`] is written once by `login` and read back by every other
//! command. The dispatcher never looks inside it; only the client layer turns
//! it into request cookies.

use std::{
    collections::BTreeMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{error::SessionError, utils};

pub const DEFAULT_COOKIES_FILE: &str = "cookies.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CookieBundle {
    cookies: BTreeMap<String, String>,
}

impl CookieBundle {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.cookies.insert(name.into(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cookies.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// Parses a `Cookie` header value (`a=1; b=2`).
    pub fn from_header(header: &str) -> Self {
        let cookies = header
            .split(';')
            .filter_map(|pair| {
                let (name, value) = pair.trim().split_once('=')?;
                let name = name.trim();
                if name.is_empty() {
                    return None;
                }
                Some((name.to_string(), value.trim().to_string()))
            })
            .collect();

        Self { cookies }
    }

    /// Reads the bundle at `path`. A missing file is [`SessionError::Missing`].
    pub fn load(path: &Path) -> Result<Self, SessionError> {
        let data = fs::read_to_string(path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => SessionError::Missing {
                path: path.to_path_buf(),
            },
            _ => SessionError::ReadFailed {
                path: path.to_path_buf(),
                source,
            },
        })?;

        let bundle = serde_json::from_str(&data).map_err(|source| SessionError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("loaded session from {}", path.display());

        Ok(bundle)
    }

    /// Overwrites `path` with this bundle, owner-readable only.
    pub fn save(&self, path: &Path) -> Result<(), SessionError> {
        let write_failed = |source| SessionError::WriteFailed {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_failed)?;
        }

        let data = serde_json::to_string_pretty(self).map_err(|err| write_failed(err.into()))?;
        utils::write_private(path, data.as_bytes()).map_err(write_failed)?;
        debug!("saved {} cookies to {}", self.len(), path.display());

        Ok(())
    }
}

/// Where the bundle lives for this invocation.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<CookieBundle, SessionError> {
        CookieBundle::load(&self.path)
    }

    pub fn save(&self, bundle: &CookieBundle) -> Result<(), SessionError> {
        bundle.save(&self.path)
    }
}
