//! CLI module for rockport

use clap::Parser;
use std::path::PathBuf;

pub mod commands;

#[derive(Parser, Debug)]
#[command(
    name = "rockport",
    about = "Convert exported m3u playlists into Rockbox-compatible playlists"
)]
#[command(version, author)]
#[command(after_help = "Examples:
  rockport -l E:\\Music best_of.m3u best_of_rockbox.m3u E:\\
      Search only E:\\Music for music files
  rockport -m best_of.m3u best_of_rockbox.m3u /media/rockbox/
      Search the whole device, without blank lines for missing files")]
pub struct Cli {
    /// Playlist exported from the music manager
    #[arg(value_name = "IN_FILE", required_unless_present = "completions")]
    pub in_file: Option<PathBuf>,

    /// Destination playlist
    #[arg(value_name = "OUT_FILE", required_unless_present = "completions")]
    pub out_file: Option<PathBuf>,

    /// Rockbox device path (mount point)
    #[arg(value_name = "ROCKBOX_DEVICE", required_unless_present = "completions")]
    pub rockbox_device: Option<PathBuf>,

    /// Only search this directory of the device for music
    #[arg(short = 'l', long)]
    pub rockbox_library: Option<PathBuf>,

    /// Volume prefix for libraries on an SD card (e.g. Clip+ microSD is <microSD1>)
    #[arg(short = 'r', long)]
    pub rockbox_root: Option<String>,

    /// Enforce case sensitivity in filenames
    #[arg(short, long)]
    pub case_sensitive: bool,

    /// Ignore file extensions when searching for target files
    #[arg(short = 'e', long)]
    pub ignore_extensions: bool,

    /// Do not leave blank lines for missing files
    #[arg(short = 'm', long)]
    pub ignore_missing: bool,

    /// Print the converted playlist instead of writing OUT_FILE
    #[arg(long)]
    pub dry_run: bool,

    /// Settings file (defaults to ~/.config/rockport/config.json)
    #[arg(long, env = "ROCKPORT_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Generate shell completions and exit
    #[arg(long, value_name = "SHELL", exclusive = true)]
    pub completions: Option<clap_complete::Shell>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
