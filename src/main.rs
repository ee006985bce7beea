use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use nocturne::{SceneConfig, Viewer};

#[derive(Parser)]
#[command(name = "nocturne")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Columns, smoke and orbiting light trails", long_about = None)]
struct Cli {
    /// Scene configuration file (JSON). Missing fields use the defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for column and smoke placement
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of columns to attempt
    #[arg(long)]
    columns: Option<usize>,

    /// Window width in logical pixels
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Window height in logical pixels
    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Start directly with the scene
    #[arg(long)]
    skip_intro: bool,

    /// Intro sound file (needs the `audio` feature to be heard)
    #[arg(long, conflicts_with = "mute")]
    audio: Option<PathBuf>,

    /// Run the intro without sound
    #[arg(long)]
    mute: bool,
}

fn load_config(cli: &Cli) -> Result<SceneConfig, nocturne::ConfigError> {
    let mut config = match &cli.config {
        Some(path) => {
            info!("Loading config from {}", path.display());
            SceneConfig::from_json_file(path)?
        }
        None => SceneConfig::default(),
    };

    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    if let Some(columns) = cli.columns {
        config = config.with_column_count(columns);
    }
    if cli.skip_intro {
        config = config.with_intro(false);
    }
    if cli.mute {
        config = config.with_intro_audio(None);
    } else if let Some(audio) = &cli.audio {
        config = config.with_intro_audio(Some(audio.clone()));
    }
    Ok(config)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    match Viewer::new(config).with_window_size(cli.width, cli.height).run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
