//! Application entry point — Creative Studio CLI.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Parse the command line.
//! 3. Load [`AppConfig`] from disk (returns default on first run) and resolve
//!    the API key (`GEMINI_API_KEY` wins over `settings.toml`).
//! 4. Create the [`tokio`] runtime (multi-thread, 2 workers).
//! 5. Build [`GeminiService`], the [`CredentialGate`] and the [`Studio`].
//! 6. Run the requested workflow; Ctrl-C cancels a running video job.
//! 7. Save the artifact under its fixed file name.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use creative_studio::{
    config::{AppConfig, API_KEY_ENV},
    credential::{ConfigKeySelector, CredentialGate},
    service::{
        ApiKey, AspectRatio, GeminiService, InlineImage, TtsVoice, VideoAspectRatio,
        VideoRequest, VideoResolution,
    },
    studio::{Artifact, Studio},
};

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

/// Edit and generate images, videos and speech from the terminal.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory the result is saved to (defaults to `output.directory`, then
    /// the platform download directory)
    #[arg(short, long, global = true)]
    out: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Edit an image with a text prompt
    EditImage {
        /// Image to edit (jpg, png, webp, gif)
        #[arg(short, long)]
        image: PathBuf,

        /// Description of the change
        prompt: String,
    },

    /// Generate an image from a text prompt
    GenerateImage {
        /// 1:1, 16:9, 9:16, 4:3 or 3:4
        #[arg(short, long, default_value = "1:1")]
        aspect_ratio: AspectRatio,

        prompt: String,
    },

    /// Generate a video from a prompt and/or a starting image
    GenerateVideo {
        /// Optional starting frame
        #[arg(short, long)]
        image: Option<PathBuf>,

        /// 16:9 or 9:16
        #[arg(short, long, default_value = "16:9")]
        aspect_ratio: VideoAspectRatio,

        /// 720p or 1080p
        #[arg(short, long, default_value = "1080p")]
        resolution: VideoResolution,

        #[arg(default_value = "")]
        prompt: String,
    },

    /// Turn text into speech (WAV)
    GenerateAudio {
        /// Kore, Puck, Zephyr, Charon or Fenrir
        #[arg(short, long, default_value = "Kore")]
        voice: TtsVoice,

        text: String,
    },
}

// ---------------------------------------------------------------------------
// Workflows
// ---------------------------------------------------------------------------

async fn run(cli: Cli, config: AppConfig, key: ApiKey) -> Result<()> {
    let out_dir = cli.out.clone().unwrap_or_else(|| config.output.resolve());

    let service = Arc::new(GeminiService::new(&config.service, key.clone()));
    let gate = Arc::new(CredentialGate::new(Arc::new(ConfigKeySelector::new(Some(
        key,
    )))));
    let mut studio = Studio::new(service, Arc::clone(&gate), config);

    let result = match cli.command {
        Command::EditImage { image, prompt } => {
            let image = InlineImage::from_path(&image)
                .with_context(|| format!("failed to read {}", image.display()))?;
            studio.edit_image(&prompt, Some(&image)).await.cloned()
        }

        Command::GenerateImage {
            aspect_ratio,
            prompt,
        } => studio.generate_image(&prompt, aspect_ratio).await.cloned(),

        Command::GenerateVideo {
            image,
            aspect_ratio,
            resolution,
            prompt,
        } => {
            let image = image
                .map(|path| {
                    InlineImage::from_path(&path)
                        .with_context(|| format!("failed to read {}", path.display()))
                })
                .transpose()?;
            let request = VideoRequest {
                prompt,
                image,
                aspect_ratio,
                resolution,
            };

            let canceller = studio.video_canceller();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    log::warn!("Ctrl-C received; cancelling video generation");
                    canceller.cancel();
                }
            });

            let mut status = studio.video().subscribe_status();
            tokio::spawn(async move {
                while status.changed().await.is_ok() {
                    let message = *status.borrow_and_update();
                    log::info!("{message}");
                }
            });

            studio.generate_video(&request).await.cloned()
        }

        Command::GenerateAudio { voice, text } => {
            studio.generate_audio(&text, voice).await.cloned()
        }
    };

    match result {
        Ok(artifact) => save(&artifact, &out_dir),
        Err(e) => {
            if e.needs_key_selection() {
                gate.select().await;
            }
            bail!("{e}")
        }
    }
}

fn save(artifact: &Artifact, dir: &std::path::Path) -> Result<()> {
    let path = artifact
        .save(dir)
        .with_context(|| format!("failed to save into {}", dir.display()))?;
    println!(
        "{} ({}, {} bytes)",
        path.display(),
        artifact.kind.mime_type(),
        artifact.len()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    log::info!("Creative Studio starting up");

    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    let Some(key) = config.service.api_key.clone().and_then(ApiKey::new) else {
        bail!("no API key configured; set {API_KEY_ENV} or `service.api_key` in settings.toml");
    };

    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    rt.block_on(run(cli, config, key))
}
