//! TOML configuration for diamonds and deployment manifests.
//!
//! ```toml
//! max_call_depth = 256
//! protected_signatures = ["transferOwnership(address)", "0x8da5cb5b"]
//!
//! [log]
//! level = "debug"
//! timestamps = false
//! ```

use crate::core::cut::{CutAction, diamond_cut_selector};
use crate::types::selector::Selector;
use crate::utils::log::{self, Level};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;
use thiserror::Error;

/// Default bound on nested invocations.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 256;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid signature or selector `{0}`")]
    InvalidSignature(String),
    #[error("max_call_depth must be at least 1")]
    ZeroCallDepth,
}

/// Logging section.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    pub level: Level,
    pub timestamps: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::Info,
            timestamps: true,
        }
    }
}

impl LogConfig {
    /// Installs this configuration into the global logger.
    pub fn apply(&self) {
        log::set_max_level(self.level);
        log::SHOW_TIMESTAMP.store(self.timestamps, Ordering::Relaxed);
    }
}

/// Per-diamond settings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiamondConfig {
    /// Maximum nesting of delegated and re-entrant calls.
    pub max_call_depth: usize,
    /// Extra functions to protect at construction, as signatures or
    /// `0x`-prefixed selectors. The cut function is always protected.
    pub protected_signatures: Vec<String>,
    pub log: LogConfig,
}

impl Default for DiamondConfig {
    fn default() -> Self {
        Self {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            protected_signatures: Vec::new(),
            log: LogConfig::default(),
        }
    }
}

impl DiamondConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_str(&read(path.as_ref())?)
    }

    /// Selectors protected at construction, cut selector first, deduplicated.
    pub fn protected_selectors(&self) -> Result<Vec<Selector>, ConfigError> {
        let mut out = vec![diamond_cut_selector()];
        for entry in &self.protected_signatures {
            let selector = parse_selector(entry)?;
            if !out.contains(&selector) {
                out.push(selector);
            }
        }
        Ok(out)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_call_depth == 0 {
            return Err(ConfigError::ZeroCallDepth);
        }
        self.protected_selectors()?;
        Ok(())
    }
}

/// Accepts either a canonical signature (`owner()`) or a hex selector
/// (`0x8da5cb5b`).
pub fn parse_selector(entry: &str) -> Result<Selector, ConfigError> {
    let entry = entry.trim();
    if entry.starts_with("0x") {
        return Selector::from_hex(entry).ok_or_else(|| ConfigError::InvalidSignature(entry.into()));
    }
    let well_formed = entry
        .find('(')
        .is_some_and(|open| open > 0 && entry.ends_with(')'))
        && !entry.contains(char::is_whitespace);
    if !well_formed {
        return Err(ConfigError::InvalidSignature(entry.into()));
    }
    Ok(Selector::from_signature(entry))
}

/// One `[[cut]]` table of a deployment manifest.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestCut {
    /// Name of a deployed module; ignored for `remove`.
    #[serde(default)]
    pub module: Option<String>,
    pub action: ManifestAction,
    pub signatures: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManifestAction {
    Add,
    Replace,
    Remove,
}

impl From<ManifestAction> for CutAction {
    fn from(action: ManifestAction) -> Self {
        match action {
            ManifestAction::Add => CutAction::Add,
            ManifestAction::Replace => CutAction::Replace,
            ManifestAction::Remove => CutAction::Remove,
        }
    }
}

/// Deployment manifest consumed by the `diamond` binary.
///
/// ```toml
/// owner = "deployer"
/// init_interfaces = true
///
/// [[cut]]
/// module = "loupe"
/// action = "add"
/// signatures = ["facets()", "facetAddress(bytes4)"]
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Label the owner address is derived from.
    #[serde(default = "default_owner")]
    pub owner: String,
    /// Run the standard init module to declare the standard interfaces.
    #[serde(default)]
    pub init_interfaces: bool,
    #[serde(default, rename = "cut")]
    pub cuts: Vec<ManifestCut>,
}

fn default_owner() -> String {
    "owner".into()
}

impl Manifest {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let manifest: Self = toml::from_str(source)?;
        for cut in &manifest.cuts {
            for signature in &cut.signatures {
                parse_selector(signature)?;
            }
        }
        Ok(manifest)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_str(&read(path.as_ref())?)
    }
}

fn read(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}
