//! Conversion settings
//!
//! Defaults for a device can be stored in ~/.config/rockport/config.json so
//! they don't have to be repeated on every run. Command-line flags are merged
//! on top to form the immutable [`RunConfig`].

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::index::SUPPORTED_EXTENSIONS;
use crate::error::ConvertError;
use crate::utils::Normalizer;

/// Persistent conversion defaults
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Volume prefix for libraries on secondary storage (e.g. `<microSD1>`)
    pub rockbox_root: Option<String>,
    pub case_sensitive: bool,
    pub ignore_extensions: bool,
    pub ignore_missing: bool,
    /// Audio formats to index in addition to the built-in list
    pub extra_extensions: Vec<String>,
}

impl Settings {
    /// Load settings from `path`, or from the default location
    ///
    /// A missing file yields the defaults; a malformed one is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::config_path() {
                Some(p) => p,
                None => {
                    debug!("No config directory available, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        if !path.exists() {
            debug!("No settings found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        let settings: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings in {}", path.display()))?;

        debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Default settings file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("rockport").join("config.json"))
    }

    /// Built-in extensions followed by any configured extras
    pub fn extensions(&self) -> Vec<String> {
        let mut extensions: Vec<String> =
            SUPPORTED_EXTENSIONS.iter().map(|e| e.to_string()).collect();

        for extra in &self.extra_extensions {
            let extra = extra.trim_start_matches('.').to_ascii_lowercase();
            if !extra.is_empty() && !extensions.contains(&extra) {
                extensions.push(extra);
            }
        }
        extensions
    }
}

/// Options given on the command line for a single run
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub device_root: PathBuf,
    pub library: Option<PathBuf>,
    pub rockbox_root: Option<String>,
    pub case_sensitive: bool,
    pub ignore_extensions: bool,
    pub ignore_missing: bool,
}

/// Everything a conversion run needs, fixed before indexing starts
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Directory that is indexed
    pub search_root: PathBuf,
    /// Mount point of the device
    pub device_root: PathBuf,
    pub device_path_prefix: Option<String>,
    pub normalizer: Normalizer,
    pub ignore_missing: bool,
    pub extensions: Vec<String>,
}

impl RunConfig {
    /// Merge command-line options over stored settings
    ///
    /// Both roots are canonicalized, and the library must lie inside the
    /// device so every indexed file has a device-relative path.
    pub fn resolve(options: RunOptions, settings: &Settings) -> Result<Self, ConvertError> {
        let device_root = canonical(&options.device_root)?;
        let search_root = match &options.library {
            Some(library) => canonical(library)?,
            None => device_root.clone(),
        };

        if !search_root.starts_with(&device_root) {
            return Err(ConvertError::OutsideDevice {
                library: search_root,
                device: device_root,
            });
        }

        Ok(Self {
            search_root,
            device_root,
            device_path_prefix: options.rockbox_root.or_else(|| settings.rockbox_root.clone()),
            normalizer: Normalizer::new(
                options.case_sensitive || settings.case_sensitive,
                options.ignore_extensions || settings.ignore_extensions,
            ),
            ignore_missing: options.ignore_missing || settings.ignore_missing,
            extensions: settings.extensions(),
        })
    }
}

fn canonical(path: &Path) -> Result<PathBuf, ConvertError> {
    path.canonicalize().map_err(|source| ConvertError::Filesystem {
        path: path.to_path_buf(),
        source,
    })
}
