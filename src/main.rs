//! imagebatch - bounded-concurrency batch image pipeline
//!
//! Describes, generates, normalizes and persists images for every input file

#![allow(missing_docs)]

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use imagebatch::config::{FileStorageConfig, LogFormat, ProviderConfig};
use imagebatch::utils::logging::init_tracing;
use imagebatch::utils::{format_bytes, format_duration};
use imagebatch::{BatchRunner, BatchStatus, Config, TracingSink, build_info, collect_images};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Configuration file used when `--config` is not given
const DEFAULT_CONFIG_PATH: &str = "config/imagebatch.yaml";

/// Exit code when some items failed
const EXIT_FAILURES: u8 = 2;
/// Exit code after an interrupt
const EXIT_STOPPED: u8 = 130;

#[derive(Debug, Parser)]
#[command(name = "imagebatch", version, about = "Batch image generation with bounded concurrency")]
struct Cli {
    /// Configuration file (YAML). Falls back to config/imagebatch.yaml, then IMAGEBATCH_* variables.
    #[arg(short, long, global = true, env = "IMAGEBATCH_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Process input images
    Run(RunArgs),
    /// Validate the configuration and print the effective YAML
    CheckConfig,
    /// Print build information
    Version,
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Image files or directories (read one level deep)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output directory for generated images
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Maximum number of images processed at once
    #[arg(short = 'j', long)]
    concurrency: Option<i64>,

    /// Prompt template; repeat to rotate through several
    #[arg(short, long = "prompt")]
    prompts: Vec<String>,

    /// Describe each input image before generating
    #[arg(long)]
    describe: bool,

    /// Re-run failed items this many times
    #[arg(long)]
    retries: Option<u32>,

    /// Use the offline mock provider and keep artifacts in memory
    #[arg(long)]
    dry_run: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    match run_cli(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run_cli(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.command {
        Command::Version => {
            let info = build_info();
            println!("imagebatch {}", info.version);
            println!("git:   {}", info.git_hash);
            println!("rustc: {}", info.rust_version);
            println!("built: {}", info.build_time);
            Ok(ExitCode::SUCCESS)
        }
        Command::CheckConfig => {
            let (config, _) = load_config(cli.config.as_deref()).await?;
            print!("{}", config.to_yaml()?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Run(args) => {
            let (mut config, source) = load_config(cli.config.as_deref()).await?;
            apply_overrides(&mut config, &args);
            init_tracing(&config.logging)?;
            info!("Configuration loaded from {}", source);
            config.validate().context("invalid configuration after CLI overrides")?;
            run_batch(config, &args).await
        }
    }
}

/// Where the configuration came from, logged once tracing is up
#[derive(Debug, Clone, PartialEq, Eq)]
enum ConfigSource {
    File(PathBuf),
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "{}", path.display()),
            ConfigSource::Environment => write!(f, "{}* environment variables", imagebatch::config::ENV_PREFIX),
        }
    }
}

/// Runs before the subscriber is installed, so it must not rely on logging
async fn load_config(path: Option<&Path>) -> anyhow::Result<(Config, ConfigSource)> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => PathBuf::from(DEFAULT_CONFIG_PATH),
        None => return Ok((Config::from_env()?, ConfigSource::Environment)),
    };
    let config = Config::from_file(&path)
        .await
        .with_context(|| format!("failed to load {}", path.display()))?;
    Ok((config, ConfigSource::File(path)))
}

fn apply_overrides(config: &mut Config, args: &RunArgs) {
    if let Some(output) = &args.output {
        config.storage.local_path = Some(output.display().to_string());
    }
    if let Some(concurrency) = args.concurrency {
        config.batch.concurrency = concurrency;
    }
    if !args.prompts.is_empty() {
        config.batch.prompts = args.prompts.clone();
    }
    if args.describe {
        config.batch.describe = true;
    }
    if let Some(retries) = args.retries {
        config.batch.retries = retries;
    }
    if args.json_logs {
        config.logging.format = LogFormat::Json;
    }
    if args.dry_run {
        config.providers = vec![ProviderConfig::new("dry-run", "mock")];
        if config.batch.describe {
            config.describer = Some(ProviderConfig::new("dry-run-describer", "mock"));
        }
        config.storage = FileStorageConfig {
            storage_type: "memory".to_string(),
            local_path: None,
        };
    }
}

async fn run_batch(config: Config, args: &RunArgs) -> anyhow::Result<ExitCode> {
    let items = collect_images(&args.inputs).await?;
    if items.is_empty() {
        warn!("No images found in the given inputs");
        return Ok(ExitCode::SUCCESS);
    }

    let runner = BatchRunner::new(config).await?;
    runner.health_check().await.context("output storage is not usable")?;
    info!("Found {} image(s)", items.len());

    let shutdown = CancellationToken::new();
    let on_signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping; in-flight images are abandoned");
            on_signal.cancel();
        }
    });

    let report = runner.run(items, &TracingSink, &shutdown).await?;

    let elapsed: Duration = report.attempts.iter().map(|s| s.duration).sum();
    if let Some(message) = report.first_message() {
        println!("{}", message);
    }
    for artifact in report.artifacts() {
        println!("  {} ({})", artifact.location, format_bytes(artifact.size));
    }
    for id in &report.unresolved {
        println!("  failed: {}", id);
    }
    println!(
        "{} attempt(s) in {}",
        report.attempts.len(),
        format_duration(elapsed)
    );

    Ok(match report.status() {
        BatchStatus::Succeeded => ExitCode::SUCCESS,
        BatchStatus::CompletedWithFailures => ExitCode::from(EXIT_FAILURES),
        BatchStatus::Stopped => ExitCode::from(EXIT_STOPPED),
    })
}
