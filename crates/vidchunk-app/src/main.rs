//! vidchunk: download videos and cut random fixed-length chunks from each.

mod config;
mod scheduler;

use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use config::Settings;

#[derive(Parser, Debug)]
#[command(name = "vidchunk", version, about)]
struct Args {
    /// Path to the JSON config file
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// Path to the line-delimited video list, used when the config has no
    /// "videos" key
    #[arg(long, default_value = "videos.txt")]
    videos: PathBuf,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    init_tracing();

    info!("Starting vidchunk");

    let settings = match Settings::load(&args.config, &args.videos) {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to load settings: {:#}", e);
            std::process::exit(1);
        }
    };

    // Fail before the first batch if the external tools are missing.
    for check in [vidchunk_media::check_ytdlp, vidchunk_media::check_ffmpeg] {
        if let Err(e) = check() {
            error!("{}", e);
            std::process::exit(1);
        }
    }

    if let Err(e) = std::fs::create_dir_all(&settings.output_directory) {
        error!(
            "Failed to create output directory {}: {}",
            settings.output_directory.display(),
            e
        );
        std::process::exit(1);
    }

    info!(
        videos = settings.videos().len(),
        quantity = settings.quantity,
        quality = %settings.quality,
        output = %settings.output_directory.display(),
        "Loaded settings"
    );

    if let Err(e) = scheduler::run(&settings).await {
        error!("{:#}", e);
        std::process::exit(1);
    }

    info!("All videos processed");
}

fn init_tracing() {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }
}
