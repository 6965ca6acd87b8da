//! rockport - Convert exported playlists into Rockbox playlists

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod device;
mod error;
mod playlist;
mod utils;

use cli::Cli;
use cli::commands::ConvertArgs;
use device::RunOptions;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        cli::commands::completion(shell);
        return Ok(());
    }

    // Initialize logging
    let filter = if cli.verbose {
        "rockport=debug"
    } else {
        "rockport=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let args = ConvertArgs {
        in_file: cli.in_file.context("IN_FILE is required")?,
        out_file: cli.out_file.context("OUT_FILE is required")?,
        options: RunOptions {
            device_root: cli.rockbox_device.context("ROCKBOX_DEVICE is required")?,
            library: cli.rockbox_library,
            rockbox_root: cli.rockbox_root,
            case_sensitive: cli.case_sensitive,
            ignore_extensions: cli.ignore_extensions,
            ignore_missing: cli.ignore_missing,
        },
        dry_run: cli.dry_run,
        config: cli.config,
    };

    cli::commands::convert(args).await?;

    Ok(())
}
