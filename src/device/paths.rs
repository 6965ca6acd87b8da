//! Rockbox path notation for files on the device

use std::path::{Path, PathBuf};

use crate::error::ConvertError;

/// Converts host paths of files on the device into playlist lines
#[derive(Debug, Clone)]
pub struct DevicePaths {
    device_root: PathBuf,
    prefix: Option<String>,
}

impl DevicePaths {
    /// `prefix` names the volume the library lives on, e.g. `<microSD1>`
    pub fn new(device_root: PathBuf, prefix: Option<&str>) -> Self {
        let prefix = prefix
            .map(|p| p.trim_matches(['/', '\\']))
            .filter(|p| !p.is_empty())
            .map(str::to_string);

        Self {
            device_root,
            prefix,
        }
    }

    /// Render one output line
    ///
    /// `None` stands for a missing track and yields a blank line. Otherwise
    /// the path is made relative to the device root and rejoined with `/`
    /// under a single leading `/`.
    pub fn rewrite(&self, resolved: Option<&Path>) -> Result<String, ConvertError> {
        let Some(path) = resolved else {
            return Ok(String::new());
        };

        let relative = path
            .strip_prefix(&self.device_root)
            .map_err(|_| ConvertError::NotOnDevice {
                path: path.to_path_buf(),
                device: self.device_root.clone(),
            })?;
        let relative = relative.to_string_lossy();

        let segments: Vec<&str> = self
            .prefix
            .as_deref()
            .into_iter()
            .chain(relative.split(['/', '\\']))
            .filter(|s| !s.is_empty())
            .collect();

        Ok(format!("/{}", segments.join("/")))
    }
}
