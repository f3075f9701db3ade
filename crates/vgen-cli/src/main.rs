//! Batch video generation binary.
//!
//! Usage: `vgen <prompt-file> [reference-file]`
//!
//! The two files carry the raw prompt and reference fields (plain text or
//! the JSON batch shapes the parser understands). Configuration comes
//! from the environment: `VGEN_API_URL`, `VGEN_ASPECT_RATIO`, `VGEN_SIZE`
//! and the `VGEN_*` timing overrides. Ctrl-C requests cooperative
//! cancellation; the success-only export is printed on stdout.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vgen_batch::{export_json, parse_input, BatchConfig, BatchRunner, ParsedInput};
use vgen_client::JobApiClient;
use vgen_models::{AspectRatio, BatchStatus, GenerationOptions, VideoSize};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("vgen=info".parse().expect("static directive"));

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
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    if let Err(e) = run().await {
        error!("{e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let Some(prompt_path) = args.next() else {
        bail!("usage: vgen <prompt-file> [reference-file]");
    };
    let reference_path = args.next();

    let prompt_field = std::fs::read_to_string(&prompt_path)
        .with_context(|| format!("reading prompt file {prompt_path}"))?;
    let reference_field = match &reference_path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading reference file {path}"))?,
        None => String::new(),
    };

    let options = options_from_env()?;
    let client = JobApiClient::from_env().context("creating job API client")?;
    let runner = Arc::new(BatchRunner::new(client, BatchConfig::from_env()));

    // Ctrl-C requests cooperative cancellation of the active run
    tokio::spawn({
        let runner = Arc::clone(&runner);
        async move {
            tokio::signal::ctrl_c().await.ok();
            info!("Received shutdown signal, stopping after the current call");
            runner.stop();
        }
    });

    match parse_input(&prompt_field, &reference_field)? {
        ParsedInput::Single(item) => {
            info!("Submitting single generation task");
            let outcome = runner.run_single(&item, options).await;
            match outcome.status {
                BatchStatus::Succeeded => {
                    info!(
                        job_id = outcome.job_id.as_deref().unwrap_or(""),
                        "generation succeeded"
                    );
                    if let Some(result_ref) = outcome.result_ref {
                        println!("{result_ref}");
                    }
                }
                _ => {
                    bail!(
                        "generation failed: {}",
                        outcome.error.as_deref().unwrap_or("unknown error")
                    );
                }
            }
        }
        ParsedInput::Batch { items } => {
            info!(total = items.len(), "Starting batch run");
            runner.start(items, options).await;

            let entries = runner.entries();
            let succeeded = entries
                .iter()
                .filter(|e| e.status == BatchStatus::Succeeded)
                .count();
            for (index, entry) in entries.iter().enumerate() {
                match entry.status {
                    BatchStatus::Succeeded => info!(
                        index,
                        result = entry.result_ref.as_deref().unwrap_or(""),
                        "entry succeeded"
                    ),
                    _ => warn!(
                        index,
                        error = entry.error_message.as_deref().unwrap_or(""),
                        "entry failed"
                    ),
                }
            }
            info!(succeeded, total = entries.len(), "Batch run finished");

            println!("{}", export_json(&entries));
        }
    }

    Ok(())
}

fn options_from_env() -> Result<GenerationOptions> {
    let aspect_ratio = match std::env::var("VGEN_ASPECT_RATIO") {
        Ok(raw) => raw
            .parse::<AspectRatio>()
            .with_context(|| format!("VGEN_ASPECT_RATIO={raw}"))?,
        Err(_) => AspectRatio::default(),
    };
    let size = match std::env::var("VGEN_SIZE") {
        Ok(raw) => raw
            .parse::<VideoSize>()
            .with_context(|| format!("VGEN_SIZE={raw}"))?,
        Err(_) => VideoSize::default(),
    };
    Ok(GenerationOptions::new(aspect_ratio, size))
}
