//! CLI command handlers

use anyhow::{Context, Result};
use clap::CommandFactory;
use clap_complete::generate;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tokio::fs;
use tracing::{debug, info, warn};

use crate::device::{self, DevicePaths, RunConfig, RunOptions, Settings};
use crate::error::ConvertError;
use crate::playlist::{self, Resolution};

/// Arguments for the `convert` handler
#[derive(Debug, Clone)]
pub struct ConvertArgs {
    pub in_file: PathBuf,
    pub out_file: PathBuf,
    pub options: RunOptions,
    pub dry_run: bool,
    pub config: Option<PathBuf>,
}

/// Summary of a finished conversion
#[derive(Debug)]
pub struct ConvertReport {
    pub indexed: usize,
    pub resolution: Resolution,
    /// Rendered playlist text
    pub output: String,
}

/// Handle a conversion run
pub async fn convert(args: ConvertArgs) -> Result<()> {
    let dry_run = args.dry_run;
    let out_file = args.out_file.clone();
    let report = run_convert(args).await?;

    if dry_run {
        print!("{}", report.output);
        return Ok(());
    }

    let resolved = report.resolution.resolved_count();
    let missing = report.resolution.missing.len();

    println!();
    println!("{}", "Conversion complete!".green().bold());
    println!("  Library files indexed: {}", report.indexed);
    println!("  Tracks resolved: {}", resolved);
    if missing > 0 {
        println!("  {}", format!("Tracks missing: {}", missing).yellow());
        for entry in &report.resolution.missing {
            println!("    - #{} {}", entry.position, entry.name);
        }
    }
    println!("Playlist written to {}", out_file.display().to_string().cyan());

    Ok(())
}

/// Index the device, resolve the playlist and write the result
///
/// Nothing is written when `dry_run` is set.
pub async fn run_convert(args: ConvertArgs) -> Result<ConvertReport> {
    let settings = Settings::load(args.config.as_deref())?;
    let config = RunConfig::resolve(args.options, &settings)?;
    debug!("Run configuration: {:?}", config);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("Indexing {}...", config.search_root.display()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let search_root = config.search_root.clone();
    let normalizer = config.normalizer;
    let extensions = config.extensions.clone();
    let index = tokio::task::spawn_blocking(move || {
        device::build_index(&search_root, normalizer, &extensions)
    })
    .await
    .context("Indexing task panicked")?;

    let index = match index {
        Ok(index) => {
            spinner.finish_with_message(format!("Indexed {} tracks", index.len()));
            if index.is_empty() {
                warn!("No music files found under {}", config.search_root.display());
            }
            index
        }
        Err(e) => {
            spinner.finish_and_clear();
            return Err(e.into());
        }
    };

    info!("Processing {}", args.in_file.display());
    if !config.ignore_missing {
        info!("A blank line will mark any missing track. Pass -m to suppress.");
    }

    let text = fs::read_to_string(&args.in_file)
        .await
        .map_err(|source| ConvertError::ReadPlaylist {
            path: args.in_file.clone(),
            source,
        })?;

    let resolution = playlist::resolve(
        playlist::read_entries(&text),
        &index,
        config.ignore_missing,
    );

    let paths = DevicePaths::new(config.device_root.clone(), config.device_path_prefix.as_deref());
    let lines = resolution
        .lines
        .iter()
        .map(|line| paths.rewrite(line.as_deref()))
        .collect::<Result<Vec<_>, _>>()?;
    let output = playlist::render_playlist(&lines);

    if !args.dry_run {
        fs::write(&args.out_file, &output)
            .await
            .map_err(|source| ConvertError::WritePlaylist {
                path: args.out_file.clone(),
                source,
            })?;
        info!("Wrote {} ({} lines)", args.out_file.display(), lines.len());
    }

    Ok(ConvertReport {
        indexed: index.len(),
        resolution,
        output,
    })
}

/// Handle the `--completions` option
pub fn completion(shell: clap_complete::Shell) {
    let mut cmd = super::Cli::command();
    generate(shell, &mut cmd, "rockport", &mut io::stdout());
}
