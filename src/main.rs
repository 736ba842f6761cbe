//! pycture binary entry point.
//!
//! Parses the command line, stages input files, runs one generation
//! request through the pipeline, and writes the resulting script.
//! All logs go to stderr; stdout carries only the result summary.
//!
//! Coverage is excluded because the main function cannot be unit tested
//! as it drives the process environment and real network clients.

// Enable the coverage attribute when running with nightly for llvm-cov exclusions
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use std::path::PathBuf;

use clap::Parser;

use pycture::config::Config;
use pycture::error::{AppError, FileError};
use pycture::files::{extract_all, validate, StagedFile};
use pycture::pipeline::{GenerationRequest, Pipeline, Session};
use pycture::provider::{ClientConfig, Provider, ProviderClient};
use pycture::script::{GeneratedScript, SCRIPT_FILE_NAME};

/// Convert an Alteryx workflow description into a Python pandas script.
#[derive(Debug, Parser)]
#[command(name = "pycture", version, about)]
struct Cli {
    /// Natural-language description of the Alteryx workflow.
    requirement: String,

    /// Input data file to stage (repeatable).
    #[arg(short, long)]
    file: Vec<PathBuf>,

    /// Provider to use, overriding PYCTURE_PROVIDER (anthropic or openai).
    #[arg(long)]
    provider: Option<Provider>,

    /// Model identifier, overriding the provider default.
    #[arg(long)]
    model: Option<String>,

    /// Where to write the generated script.
    #[arg(short, long, default_value = SCRIPT_FILE_NAME)]
    output: PathBuf,
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logs go to stderr only; stdout is for the result summary
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("LOG_LEVEL")
                .unwrap_or_else(|_| "info".to_string())
                .parse()
                .unwrap_or_else(|_| tracing_subscriber::filter::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    tracing::info!("pycture starting...");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration error: {e}");
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let provider = cli.provider.unwrap_or(config.provider);
    tracing::info!(
        "Configuration loaded: provider={}, timeout={}ms",
        provider,
        config.request_timeout_ms
    );

    match run(&cli, &config, provider).await {
        Ok(generated) => print_summary(&cli.output, &generated),
        Err(e) => {
            report(&e);
            std::process::exit(1);
        }
    }
}

/// Stage files, run the pipeline once, and write the script.
async fn run(cli: &Cli, config: &Config, provider: Provider) -> Result<GeneratedScript, AppError> {
    let mut staged = Vec::with_capacity(cli.file.len());
    for path in &cli.file {
        let file = StagedFile::from_path(path).await?;
        validate(&file.name, file.size_bytes)?;
        staged.push(file);
    }
    let metadata = extract_all(&staged).await?;

    let client_config = ClientConfig::for_provider(provider)
        .with_base_url(config.base_url_for(provider))
        .with_model(cli.model.as_deref().unwrap_or_else(|| config.model_for(provider)))
        .with_timeout_ms(config.request_timeout_ms);
    let client = ProviderClient::new(provider, config.api_key.clone(), client_config)?;
    let pipeline = Pipeline::new(client)?;

    let request = GenerationRequest {
        api_key: config.api_key.clone(),
        provider,
        requirement: cli.requirement.clone(),
        files: metadata,
    };
    let mut session = Session::new();
    let generated = pipeline.generate(&mut session, request).await?;

    tokio::fs::write(&cli.output, &generated.script)
        .await
        .map_err(|e| FileError::WriteFailed {
            file: cli.output.display().to_string(),
            message: e.to_string(),
        })?;

    Ok(generated)
}

/// Print the step breakdown and file lists to stdout.
fn print_summary(output: &std::path::Path, generated: &GeneratedScript) {
    println!("Wrote {}", output.display());
    if !generated.steps.is_empty() {
        println!("\nSteps:");
        for (i, step) in generated.steps.iter().enumerate() {
            println!("  {}. {}", i + 1, step.description);
        }
    }
    if !generated.input_files.is_empty() {
        println!("\nReads:  {}", generated.input_files.join(", "));
    }
    if !generated.output_files.is_empty() {
        println!("Writes: {}", generated.output_files.join(", "));
    }
}

/// Surface an error with the taxonomy's user-facing message.
///
/// Gate and file rejections display as-is. Provider and script failures
/// keep their raw detail in the logs and show only the fixed message.
fn report(error: &AppError) {
    match error {
        AppError::Provider(e) => {
            tracing::error!("Provider call failed: {e}");
            eprintln!("Error: {}", e.user_message());
        }
        AppError::Script(e) => {
            tracing::error!("Response validation failed: {e}");
            eprintln!("Error: {}", e.user_message());
        }
        other => eprintln!("Error: {other}"),
    }
}
