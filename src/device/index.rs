//! Library index over the music files on a device

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::{Path, PathBuf};

use tracing::{debug, trace, warn};
use walkdir::WalkDir;

use crate::error::ConvertError;
use crate::utils::{Normalizer, basename, extension};

/// Audio formats the firmware plays that are looked up by default
pub const SUPPORTED_EXTENSIONS: &[&str] = &["mp3", "m4a", "wav", "aif", "aiff"];

/// Immutable lookup from normalized filename to absolute path
///
/// When two files share a key, the one inserted first is kept.
#[derive(Debug)]
pub struct LibraryIndex {
    normalizer: Normalizer,
    entries: HashMap<String, PathBuf>,
}

impl LibraryIndex {
    /// Build an index from paths in the order given
    ///
    /// Paths whose extension is not in `extensions` (compared without regard
    /// to case) are skipped.
    pub fn from_paths<I, S>(paths: I, normalizer: Normalizer, extensions: &[S]) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
        S: AsRef<str>,
    {
        let mut entries = HashMap::new();

        for path in paths {
            let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
                continue;
            };

            if !is_supported(&name, extensions) {
                trace!("Skipping unsupported file {}", path.display());
                continue;
            }

            match entries.entry(normalizer.normalize(&name)) {
                Entry::Vacant(slot) => {
                    slot.insert(path);
                }
                Entry::Occupied(existing) => {
                    debug!(
                        "Duplicate {} ignored, keeping {}",
                        path.display(),
                        existing.get().display()
                    );
                }
            }
        }

        Self {
            normalizer,
            entries,
        }
    }

    /// Look up a playlist entry by its path or bare filename
    pub fn lookup(&self, entry: &str) -> Option<&Path> {
        self.entries
            .get(&self.normalizer.normalize(basename(entry)))
            .map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Walk `search_root` and index every supported audio file below it
///
/// Inside each directory, files are visited before subdirectories and both
/// are taken in name order, so the copy highest in the tree wins a
/// collision.
pub fn build_index<S: AsRef<str>>(
    search_root: &Path,
    normalizer: Normalizer,
    extensions: &[S],
) -> Result<LibraryIndex, ConvertError> {
    let metadata = std::fs::metadata(search_root).map_err(|source| ConvertError::Filesystem {
        path: search_root.to_path_buf(),
        source,
    })?;
    if !metadata.is_dir() {
        return Err(ConvertError::Filesystem {
            path: search_root.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotADirectory, "not a directory"),
        });
    }

    let files = scan_files(search_root)?;
    debug!("Found {} files under {}", files.len(), search_root.display());

    Ok(LibraryIndex::from_paths(files, normalizer, extensions))
}

/// Collect every regular file under `root` in traversal order
///
/// Symlinks to files are kept under the link's own path. Symlinked
/// directories are not descended into.
fn scan_files(root: &Path) -> Result<Vec<PathBuf>, ConvertError> {
    let walker = WalkDir::new(root).sort_by(|a, b| {
        a.file_type()
            .is_dir()
            .cmp(&b.file_type().is_dir())
            .then_with(|| a.file_name().cmp(b.file_name()))
    });

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let depth = err.depth();
                skip_unreadable(depth, ConvertError::from_walk(root, err))?;
                continue;
            }
        };

        let is_file = entry.file_type().is_file()
            || (entry.path_is_symlink() && entry.path().is_file());
        if is_file {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Walk errors on the root are fatal; anything deeper is logged and skipped
fn skip_unreadable(depth: usize, err: ConvertError) -> Result<(), ConvertError> {
    if depth == 0 {
        return Err(err);
    }
    warn!("Skipping unreadable entry: {}", err);
    Ok(())
}

fn is_supported<S: AsRef<str>>(name: &str, extensions: &[S]) -> bool {
    extension(name).is_some_and(|ext| {
        extensions
            .iter()
            .any(|allowed| allowed.as_ref().eq_ignore_ascii_case(ext))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn paths(list: &[&str]) -> Vec<PathBuf> {
        list.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_first_seen_wins() {
        let index = LibraryIndex::from_paths(
            paths(&["/dev/a/Track.mp3", "/dev/b/Track.mp3"]),
            Normalizer::default(),
            SUPPORTED_EXTENSIONS,
        );
        assert_eq!(index.len(), 1);
        assert_eq!(index.lookup("Track.mp3"), Some(Path::new("/dev/a/Track.mp3")));

        let reversed = LibraryIndex::from_paths(
            paths(&["/dev/b/Track.mp3", "/dev/a/Track.mp3"]),
            Normalizer::default(),
            SUPPORTED_EXTENSIONS,
        );
        assert_eq!(reversed.lookup("Track.mp3"), Some(Path::new("/dev/b/Track.mp3")));
    }

    #[test]
    fn test_first_seen_wins_across_normalized_names() {
        let index = LibraryIndex::from_paths(
            paths(&["/dev/TRACK.MP3", "/dev/track.mp3", "/dev/Track.m4a"]),
            Normalizer::new(false, true),
            SUPPORTED_EXTENSIONS,
        );
        assert_eq!(index.len(), 1);
        assert_eq!(index.lookup("track.wav"), Some(Path::new("/dev/TRACK.MP3")));
    }

    #[test]
    fn test_unsupported_extensions_skipped() {
        let index = LibraryIndex::from_paths(
            paths(&["/dev/cover.jpg", "/dev/notes", "/dev/song.flac", "/dev/song.AIFF"]),
            Normalizer::default(),
            SUPPORTED_EXTENSIONS,
        );
        assert_eq!(index.len(), 1);
        assert!(index.lookup("cover.jpg").is_none());
        assert_eq!(index.lookup("song.aiff"), Some(Path::new("/dev/song.AIFF")));
    }

    #[test]
    fn test_extra_extensions() {
        let mut extensions: Vec<String> =
            SUPPORTED_EXTENSIONS.iter().map(|e| e.to_string()).collect();
        extensions.push("flac".to_string());

        let index = LibraryIndex::from_paths(
            paths(&["/dev/song.flac"]),
            Normalizer::default(),
            &extensions,
        );
        assert_eq!(index.lookup("song.flac"), Some(Path::new("/dev/song.flac")));
    }

    #[test]
    fn test_case_sensitivity() {
        let library = paths(&["/dev/Track.mp3"]);

        let insensitive =
            LibraryIndex::from_paths(library.clone(), Normalizer::new(false, false), SUPPORTED_EXTENSIONS);
        assert!(insensitive.lookup("track.mp3").is_some());

        let sensitive =
            LibraryIndex::from_paths(library, Normalizer::new(true, false), SUPPORTED_EXTENSIONS);
        assert!(sensitive.lookup("track.mp3").is_none());
        assert!(sensitive.lookup("Track.mp3").is_some());
    }

    #[test]
    fn test_extension_agnostic_matching() {
        let library = paths(&["/dev/Song.m4a"]);

        let strict =
            LibraryIndex::from_paths(library.clone(), Normalizer::new(false, false), SUPPORTED_EXTENSIONS);
        assert!(strict.lookup("Song.mp3").is_none());

        let agnostic =
            LibraryIndex::from_paths(library, Normalizer::new(false, true), SUPPORTED_EXTENSIONS);
        assert_eq!(agnostic.lookup("Song.mp3"), Some(Path::new("/dev/Song.m4a")));
    }

    #[test]
    fn test_lookup_uses_basename() {
        let index = LibraryIndex::from_paths(
            paths(&["/dev/Music/Track.mp3"]),
            Normalizer::default(),
            SUPPORTED_EXTENSIONS,
        );
        assert!(index.lookup(r"C:\Users\me\iTunes\Artist\Track.mp3").is_some());
        assert!(index.lookup("../Artist/Track.mp3").is_some());
    }

    #[test]
    fn test_build_index_walks_tree() {
        let tmp = TempDir::new().unwrap();
        let album = tmp.path().join("Music").join("Artist").join("Album");
        fs::create_dir_all(&album).unwrap();
        fs::write(album.join("01 - One.mp3"), b"FAKE").unwrap();
        fs::write(album.join("02 - Two.m4a"), b"FAKE").unwrap();
        fs::write(album.join("cover.jpg"), b"FAKE").unwrap();

        let index = build_index(tmp.path(), Normalizer::default(), SUPPORTED_EXTENSIONS).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.lookup("01 - one.mp3"), Some(album.join("01 - One.mp3").as_path()));
    }

    #[test]
    fn test_build_index_prefers_highest_in_tree() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("a").join("deeper");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("Track.mp3"), b"FAKE").unwrap();
        fs::write(tmp.path().join("z-Track.mp3"), b"FAKE").unwrap();
        fs::write(tmp.path().join("Track.mp3"), b"FAKE").unwrap();

        let index = build_index(tmp.path(), Normalizer::default(), SUPPORTED_EXTENSIONS).unwrap();
        assert_eq!(index.lookup("Track.mp3"), Some(tmp.path().join("Track.mp3").as_path()));
    }

    #[test]
    fn test_build_index_missing_root() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope");

        let err = build_index(&missing, Normalizer::default(), SUPPORTED_EXTENSIONS).unwrap_err();
        assert!(matches!(err, ConvertError::Filesystem { ref path, .. } if path == &missing));
    }

    #[cfg(unix)]
    #[test]
    fn test_build_index_follows_file_symlinks() {
        let tmp = TempDir::new().unwrap();
        let store = tmp.path().join("store");
        let music = tmp.path().join("Music");
        fs::create_dir_all(&store).unwrap();
        fs::create_dir_all(&music).unwrap();
        fs::write(store.join("Real.mp3"), b"FAKE").unwrap();
        std::os::unix::fs::symlink(store.join("Real.mp3"), music.join("Linked.mp3")).unwrap();
        std::os::unix::fs::symlink(&store, music.join("store-link")).unwrap();

        let index = build_index(&music, Normalizer::default(), SUPPORTED_EXTENSIONS).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.lookup("Linked.mp3"), Some(music.join("Linked.mp3").as_path()));
        assert!(index.lookup("Real.mp3").is_none());
    }

    #[test]
    fn test_unreadable_entries_below_root_are_skipped() {
        let err = || ConvertError::Filesystem {
            path: PathBuf::from("/dev/lost+found"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };

        assert!(matches!(skip_unreadable(0, err()), Err(ConvertError::Filesystem { .. })));
        assert!(skip_unreadable(1, err()).is_ok());
        assert!(skip_unreadable(3, err()).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_build_index_skips_unreadable_subdirectory() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let locked = tmp.path().join("lost+found");
        fs::create_dir_all(&locked).unwrap();
        fs::write(tmp.path().join("Track.mp3"), b"FAKE").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        let result = build_index(tmp.path(), Normalizer::default(), SUPPORTED_EXTENSIONS);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        let index = result.unwrap();
        assert_eq!(index.len(), 1);
        assert!(index.lookup("Track.mp3").is_some());
    }

    #[test]
    fn test_build_index_root_is_file() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("Track.mp3");
        fs::write(&file, b"FAKE").unwrap();

        assert!(build_index(&file, Normalizer::default(), SUPPORTED_EXTENSIONS).is_err());
    }
}
