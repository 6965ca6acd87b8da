//! Playlist reading, resolution and rendering

mod m3u;
pub mod resolver;

pub use m3u::{read_entries, render_playlist};
pub use resolver::{MissingEntry, Resolution, resolve};
