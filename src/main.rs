//! Locale check binary - shows which locale each label negotiates to
//!
//! Usage:
//!   cargo run -- cy-GB                 # Every module and label
//!   cargo run -- cy-GB SHOP            # Every label of one module
//!   cargo run -- cy-GB SHOP BASKET     # A single label
//!   cargo run -- --validate            # Report incomplete locale packs
//!
//! Optional environment variables:
//! - LOCALE_PACK_FILE (JSON file of locale packs to load)
//! - LOCALE_DEFAULT (defaults to en)

use anyhow::{bail, Context, Result};
use locale_negotiator::config::Config;
use locale_negotiator::i18n::{CheckOptions, LocaleStore, PackValidator};
use tracing::{info, warn};

fn main() -> Result<()> {
    // Load .env file (ignored when absent)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("locale_negotiator=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    let store = LocaleStore::with_locale(&config.default_locale);

    if let Some(path) = &config.pack_file {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read locale pack file {}", path.display()))?;
        for warning in PackValidator::validate_json(&json)?.warnings {
            warn!("{}", warning);
        }
        store.load_file(path)?;
    } else {
        info!("LOCALE_PACK_FILE not set, using built-in English pack only");
    }

    let args: Vec<String> = std::env::args().skip(1).collect();

    let output = match args.as_slice() {
        [flag] if flag == "--validate" => {
            serde_json::to_string_pretty(&PackValidator::validate(&store))?
        }
        [tag] => serde_json::to_string_pretty(&store.check_locale(tag, &CheckOptions::default()))?,
        [tag, module] => {
            serde_json::to_string_pretty(&store.check_locale(tag, &CheckOptions::module(module)))?
        }
        [tag, module, label] => serde_json::to_string_pretty(
            &store.check_locale(tag, &CheckOptions::label(module, label)),
        )?,
        _ => bail!("Usage: locale-check TAG [MODULE [LABEL]] | --validate"),
    };

    println!("{}", output);

    let metrics = store.metrics().report();
    info!(
        "Negotiations: {}, exact: {}, fallbacks: {}, failures: {}",
        metrics.negotiations,
        metrics.exact_hits,
        metrics.fallbacks + metrics.default_fallbacks,
        metrics.failures
    );

    Ok(())
}
