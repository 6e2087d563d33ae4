//! CardForge - Main entry point.
//!
//! Reads one game concept line from stdin and writes `rules.pdf` and
//! `cards.pdf` into the configured output directory.

use std::io::BufRead;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cardforge_engine::{App, AppConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root, falling back to the working directory.
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cardforge_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env().context("loading configuration")?;
    let app = App::from_config(&config);

    eprint!("Enter your card game concept: ");
    let mut concept = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut concept)
        .context("reading concept from stdin")?;
    let concept = concept.trim();
    if concept.is_empty() {
        anyhow::bail!("no game concept given");
    }

    let report = app.generate(concept).await?;

    tracing::info!(
        title = %report.specification.title,
        cards = report.batch.len(),
        abandoned = report.abandoned.len(),
        fallback_illustrations = report.fallback_illustrations,
        rules = %report.rules.path.display(),
        rules_pages = report.rules.pages,
        cards_pdf = %report.cards.path.display(),
        cards_pages = report.cards.pages,
        "Done"
    );
    for unit in &report.abandoned {
        tracing::warn!(
            unit = unit.index + 1,
            card_type = %unit.card_type,
            attempts = unit.attempts,
            error = %unit.last_error,
            "Card left out of the sheet"
        );
    }

    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
    let _ = dotenvy::dotenv();
}
