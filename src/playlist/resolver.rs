//! Playlist resolution against a library index

use std::path::PathBuf;

use tracing::warn;

use crate::device::LibraryIndex;
use crate::utils::basename;

/// A playlist entry with no match in the library
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingEntry {
    /// 1-indexed position among the entries that were looked up
    pub position: usize,
    /// Filename as it appeared in the source playlist
    pub name: String,
}

/// Outcome of resolving a whole playlist
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// Output items in playlist order; `None` marks a blank placeholder
    pub lines: Vec<Option<PathBuf>>,
    pub missing: Vec<MissingEntry>,
}

impl Resolution {
    /// Number of entries that were found in the library
    pub fn resolved_count(&self) -> usize {
        self.lines.iter().filter(|l| l.is_some()).count()
    }
}

/// Resolve playlist lines to library paths
///
/// Lines starting with `#` and blank lines are skipped without counting.
/// Every other line is looked up by its basename; a miss is recorded and,
/// unless `ignore_missing` is set, leaves a blank placeholder in its place.
pub fn resolve<'a, I>(lines: I, index: &LibraryIndex, ignore_missing: bool) -> Resolution
where
    I: IntoIterator<Item = &'a str>,
{
    let mut resolution = Resolution::default();
    let mut position = 0;

    for line in lines {
        if line.starts_with('#') {
            continue;
        }

        let entry = line.trim();
        if entry.is_empty() {
            continue;
        }
        position += 1;

        match index.lookup(entry) {
            Some(path) => resolution.lines.push(Some(path.to_path_buf())),
            None => {
                let name = basename(entry).to_string();
                warn!("File {} (position {}) not found in library", name, position);
                resolution.missing.push(MissingEntry { position, name });
                if !ignore_missing {
                    resolution.lines.push(None);
                }
            }
        }
    }

    resolution
}
