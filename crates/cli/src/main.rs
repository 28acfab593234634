use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use bookshelf_app::modules::books;
use bookshelf_kernel::settings::Settings;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "bookshelf", version, about = "Bookshelf service tooling")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP service until interrupted
    Serve,
    /// Apply pending database migrations and exit
    Migrate,
    /// Check a JSON payload against the book schema
    Validate {
        /// Path to a `{"book": {...}}` document
        file: PathBuf,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let settings = Settings::load().with_context(|| "failed to load bookshelf settings")?;

    match cli.command {
        Command::Serve => {
            bookshelf_telemetry::init(&settings.telemetry)?;
            runtime()?.block_on(bookshelf_app::run(settings))?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Migrate => {
            bookshelf_telemetry::init(&settings.telemetry)?;
            let applied = runtime()?.block_on(bookshelf_app::migrate(&settings))?;
            println!("applied {} migrations", applied);
            Ok(ExitCode::SUCCESS)
        }
        Command::Validate { file } => validate(&settings, &file),
    }
}

fn runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")
}

fn validate(settings: &Settings, file: &Path) -> anyhow::Result<ExitCode> {
    let validator = books::load_schema(&settings.schema).context("failed to load book schema")?;

    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let payload: serde_json::Value = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not valid JSON", file.display()))?;

    match validator.validate(&payload) {
        Ok(()) => {
            println!("{}: valid", file.display());
            Ok(ExitCode::SUCCESS)
        }
        Err(errors) => {
            for error in &errors {
                println!("{}", error);
            }
            tracing::debug!(count = errors.len(), "payload rejected");
            Ok(ExitCode::FAILURE)
        }
    }
}
