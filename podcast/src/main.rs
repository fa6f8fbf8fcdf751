mod config;
mod error;
mod producer;
mod run_dir;
mod tools;
mod tts;
mod wav;

use clap::Parser;
use error::Result;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = config::Cli::parse();
    init_tracing(&cli.config.log_level);
    cli.config.validate()?;

    let config = Arc::new(cli.config);
    let llm = |model: &str| agent::llm::OpenAI::compatible(model.to_string(), &config.api_base, &config.api_key);

    let models = producer::Models {
        coordinator: llm(&config.model_researcher),
        researcher: llm(&config.model_researcher),
        scriptwriter: llm(&config.model_scriptwriter),
    };
    let speech = Arc::new(tts::GeminiSpeech::new(config.api_key.clone()));

    let mut producer = producer::Producer::new(config.clone(), models, speech)?;
    let production = producer.produce(&cli.topic).await?;

    if let Some(summary) = production.summary() {
        println!("{}", summary);
    }
    for outcome in production.artifacts() {
        if outcome.is_success() {
            println!("{}", outcome.message());
        } else {
            tracing::warn!("{}", outcome.message());
        }
    }
    match (production.run_id(), production.run_dir()) {
        (Some(run_id), Some(run_dir)) => tracing::info!(run_id, run_dir, "production finished"),
        _ => tracing::warn!("production finished without saving any artifact"),
    }

    Ok(())
}
