mod job;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use transcoder_core::{
    load_config, load_config_from_env, validate_config, FfmpegTranscoder, Transcoder,
    TranscoderError,
};

use job::load_job;

#[derive(Parser, Debug)]
#[command(name = "transcoder", version, about = "Run ffmpeg jobs described in TOML")]
struct Cli {
    /// Configuration file (binary paths, timeout).
    #[arg(long, env = "TRANSCODER_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Log everything ffmpeg prints.
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the compiled ffmpeg arguments of a job as JSON.
    Args(JobArgs),
    /// Run a job.
    Run {
        #[command(flatten)]
        job: JobArgs,

        /// Print progress while ffmpeg runs.
        #[arg(long)]
        progress: bool,
    },
    /// Probe a media file and print its metadata as JSON.
    Probe {
        /// File path or URL.
        input: String,
    },
    /// Check that ffmpeg and ffprobe can be launched.
    Check,
}

#[derive(clap::Args, Debug)]
struct JobArgs {
    /// Job file.
    job: PathBuf,

    /// Override the job's output destination.
    #[arg(long, short)]
    output: Option<String>,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        if let Some(output) = e
            .downcast_ref::<TranscoderError>()
            .and_then(TranscoderError::output)
        {
            eprintln!("{}", String::from_utf8_lossy(output));
        }
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                if cli.verbose {
                    "debug".into()
                } else {
                    "info".into()
                }
            }),
        )
        .with(
            cli.log_json
                .then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)),
        )
        .with(
            (!cli.log_json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
        )
        .init();

    let mut config = match &cli.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            load_config(path).with_context(|| format!("Failed to load config from {:?}", path))?
        }
        None => load_config_from_env().context("Failed to read TRANSCODER_* overrides")?,
    };
    config.verbose |= cli.verbose;

    validate_config(&config).context("Configuration validation failed")?;

    let transcoder = FfmpegTranscoder::new(config);

    match cli.cmd {
        Command::Args(args) => {
            let request = load_job(&args.job, args.output.as_deref())?;
            request.validate()?;
            println!("{}", serde_json::to_string(&request.to_args())?);
        }
        Command::Run { job, progress } => {
            let request = load_job(&job.job, job.output.as_deref())?;

            let result = if progress {
                let (tx, mut rx) = mpsc::channel::<transcoder_core::Progress>(16);
                let printer = tokio::spawn(async move {
                    while let Some(update) = rx.recv().await {
                        eprint!(
                            "\r{:5.1}% time={} speed={}",
                            update.percent(),
                            update.current_time,
                            update.speed
                        );
                    }
                    eprintln!();
                });
                let result = transcoder.start_with_progress(&request, tx).await;
                let _ = printer.await;
                result?
            } else {
                transcoder.start(&request).await?
            };

            info!("Wrote {} in {} ms", request.output, result.duration_ms);
        }
        Command::Probe { input } => {
            let metadata = transcoder.probe(&input).await?;
            println!("{}", serde_json::to_string_pretty(&metadata)?);
        }
        Command::Check => {
            transcoder.validate().await?;
            info!(
                "Found {} and {}",
                transcoder.config().ffmpeg_path.display(),
                transcoder.config().ffprobe_path.display()
            );
        }
    }

    Ok(())
}
