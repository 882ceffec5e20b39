//! Configuration management for Doxify
//!
//! Configuration is stored in RON format. Every section has defaults, so an
//! empty `Config()` (or no file at all) yields a working server backed by a
//! SQLite database under `data/`.

pub mod loader;

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::page::registry::MAX_LIST_LIMIT;

/// Top-level configuration for Doxify
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub server: Server,

    #[serde(default)]
    pub storage: Storage,

    #[serde(default)]
    pub pages: Pages,
}

impl Config {
    /// Validate the configuration, clamping recoverable values in place
    pub fn validate(&mut self) -> Result<(), String> {
        self.server.socket_addr()?;

        let clamped = self.pages.list_limit.clamp(1, MAX_LIST_LIMIT);
        if clamped != self.pages.list_limit {
            tracing::warn!(
                "pages.list_limit {} out of range, using {}",
                self.pages.list_limit,
                clamped
            );
            self.pages.list_limit = clamped;
        }

        match &self.storage {
            Storage::Sqlite { path } if path.as_os_str().is_empty() => {
                Err("storage path cannot be empty".to_string())
            }
            Storage::Files { dir } if dir.as_os_str().is_empty() => {
                Err("pages directory cannot be empty".to_string())
            }
            _ => Ok(()),
        }
    }
}

/// HTTP listener settings
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Server {
    /// Address to bind, e.g. "0.0.0.0:3000"
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Server {
    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        self.bind
            .parse()
            .map_err(|e| format!("invalid bind address '{}': {}", self.bind, e))
    }
}

impl Default for Server {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// Page storage backend
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub enum Storage {
    /// Single `pages` table in a SQLite database file
    Sqlite { path: PathBuf },

    /// One JSON file per page under `dir`
    Files { dir: PathBuf },
}

impl Default for Storage {
    fn default() -> Self {
        Storage::Sqlite {
            path: PathBuf::from("data/doxify.db"),
        }
    }
}

/// Listing settings
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Pages {
    /// Maximum number of pages returned by a listing
    #[serde(default = "default_list_limit")]
    pub list_limit: usize,
}

impl Default for Pages {
    fn default() -> Self {
        Self {
            list_limit: default_list_limit(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_list_limit() -> usize {
    MAX_LIST_LIMIT
}
