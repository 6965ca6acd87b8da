//! Filename normalization shared by the indexer and the resolver

/// Rules used to turn a filename into a lookup key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Normalizer {
    /// Keep the filename's case as found
    pub case_sensitive: bool,
    /// Drop the final `.ext` segment so `Song.m4a` and `Song.mp3` collide
    pub ignore_extensions: bool,
}

impl Normalizer {
    pub fn new(case_sensitive: bool, ignore_extensions: bool) -> Self {
        Self {
            case_sensitive,
            ignore_extensions,
        }
    }

    /// Compute the lookup key for a bare filename
    ///
    /// Case folding happens first, then only the last extension segment is
    /// removed: `Live.At.Wembley.MP3` becomes `live.at.wembley`.
    pub fn normalize(&self, name: &str) -> String {
        let key = if self.case_sensitive {
            name.to_string()
        } else {
            name.to_lowercase()
        };

        if self.ignore_extensions {
            strip_extension(&key).to_string()
        } else {
            key
        }
    }
}

/// Text after the last `.` of a filename, if there is one
pub fn extension(name: &str) -> Option<&str> {
    name.rsplit_once('.').map(|(_, ext)| ext)
}

/// Everything before the last `.`; names without a dot are returned as is
pub fn strip_extension(name: &str) -> &str {
    name.rsplit_once('.').map_or(name, |(stem, _)| stem)
}

/// Final path segment, splitting on both `/` and `\`
///
/// Playlists exported on Windows use backslashes even when read elsewhere,
/// so the host separator is never consulted.
pub fn basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}
