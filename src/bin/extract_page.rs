//! Extract the products of one saved listing page and print them as JSON
//!
//! Configuration is read from `--config` (or `CATALOG_EXTRACTOR_CONFIG`)
//! when given, otherwise from defaults overridden by `CATALOG_EXTRACTOR_*`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use catalog_extractor::ListingPageCollector;
use catalog_extractor::infrastructure::config::ExtractorConfig;
use catalog_extractor::infrastructure::logging::init_logging_with_config;

#[derive(Parser, Debug)]
#[command(name = "extract_page")]
#[command(about = "Extract product records from a saved listing page")]
#[command(version)]
struct Args {
    /// Saved listing page HTML
    path: PathBuf,

    /// Page number reported in the output
    #[arg(default_value_t = 0)]
    page_number: u32,

    /// Config file (toml, yaml or json)
    #[arg(long, env = "CATALOG_EXTRACTOR_CONFIG")]
    config: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(config_path) => ExtractorConfig::from_file(config_path)
            .with_context(|| format!("Failed to load config from {config_path}"))?,
        None => ExtractorConfig::from_env().context("Failed to load config from environment")?,
    };

    let _guard = init_logging_with_config(&config.logging)?;

    let html = std::fs::read_to_string(&args.path)
        .with_context(|| format!("Failed to read {}", args.path.display()))?;
    info!("📄 Extracting products from {} ({} bytes)", args.path.display(), html.len());

    let collector = ListingPageCollector::new(&config)?;
    let page = collector.collect_page(&html, args.page_number);
    info!(
        "✅ Page {} yielded {} products",
        page.page_number,
        page.product_count()
    );

    println!("{}", serde_json::to_string_pretty(&page)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_number_defaults_to_zero() {
        let args = Args::try_parse_from(["extract_page", "page.html"]).unwrap();
        assert_eq!(args.path, PathBuf::from("page.html"));
        assert_eq!(args.page_number, 0);
    }

    #[test]
    fn test_page_number_and_config() {
        let args =
            Args::try_parse_from(["extract_page", "page.html", "3", "--config", "extractor.toml"])
                .unwrap();
        assert_eq!(args.page_number, 3);
        assert_eq!(args.config.as_deref(), Some("extractor.toml"));
    }

    #[test]
    fn test_invalid_page_number_rejected() {
        assert!(Args::try_parse_from(["extract_page", "page.html", "abc"]).is_err());
        assert!(Args::try_parse_from(["extract_page"]).is_err());
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
