//! Run configuration: which passes run and how their output is dressed.
//!
//! Everything has a default, so an empty JSON object (or no file at all)
//! gives the stock five-pass pipeline.

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::Deserialize;
use thiserror::Error;

/// One conversion pass. Declaration order is pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Pass {
    Define,
    Null,
    Array,
    String,
    Printf,
}

impl Pass {
    pub const ALL: [Pass; 5] = [
        Pass::Define,
        Pass::Null,
        Pass::Array,
        Pass::String,
        Pass::Printf,
    ];
}

/// When a pass adds the C++ header it needs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum HeaderPolicy {
    /// Always add it, even if the pass rewrote nothing.
    #[default]
    Always,
    /// Only when the pass rewrote at least one line.
    WhenUsed,
}

impl HeaderPolicy {
    pub fn wants_header(self, changed: bool) -> bool {
        match self {
            HeaderPolicy::Always => true,
            HeaderPolicy::WhenUsed => changed,
        }
    }
}

/// Knobs every converter reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    pub headers: HeaderPolicy,
    /// Append `// converted from …` notes to rewritten lines.
    pub provenance: bool,
}

impl Default for Style {
    fn default() -> Self {
        Config::default().style()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    pub passes: Vec<Pass>,
    pub headers: HeaderPolicy,
    pub provenance: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            passes: Pass::ALL.to_vec(),
            headers: HeaderPolicy::default(),
            provenance: true,
        }
    }
}

impl Config {
    pub fn style(&self) -> Style {
        Style {
            headers: self.headers,
            provenance: self.provenance,
        }
    }

    pub fn enabled(&self, pass: Pass) -> bool {
        self.passes.contains(&pass)
    }

    /// Drops `skip` from the enabled passes.
    pub fn without(mut self, skip: &[Pass]) -> Self {
        self.passes.retain(|p| !skip.contains(p));
        self
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Parses a config from JSON text.
pub fn from_json(json: &str) -> Result<Config, serde_json::Error> {
    serde_json::from_str(json)
}

/// Loads a JSON config file.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    from_json(&json).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
