//! Device library indexing and path notation

pub mod config;
pub mod index;
pub mod paths;

pub use config::{RunConfig, RunOptions, Settings};
pub use index::{LibraryIndex, SUPPORTED_EXTENSIONS, build_index};
pub use paths::DevicePaths;
