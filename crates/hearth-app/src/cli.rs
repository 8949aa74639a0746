//! CLI argument definitions for the Hearth application.
//!
//! Uses `clap` with derive macros for ergonomic argument parsing.
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use hearth_core::filters::{Filters, TransactionType};

/// Hearth — conversational real-estate search from the terminal.
#[derive(Parser, Debug)]
#[command(name = "hearth", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the property search backend.
    #[arg(long = "api-url", global = true)]
    pub api_url: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Interactive conversational search with a persisted conversation.
    Chat,
    /// One-shot paginated listing with optional structured filters.
    Properties(ListingArgs),
    /// Show a single property by id or slug.
    Property {
        /// Property id or slug.
        id: String,
    },
}

/// Filter and pagination flags for the `properties` subcommand.
#[derive(Args, Debug)]
pub struct ListingArgs {
    /// Page number (1-based).
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Results per page (defaults to the configured page size).
    #[arg(long)]
    pub limit: Option<u32>,

    /// Free-text search term.
    #[arg(long)]
    pub search: Option<String>,

    /// Minimum price.
    #[arg(long = "min-price")]
    pub price_min: Option<u64>,

    /// Maximum price.
    #[arg(long = "max-price")]
    pub price_max: Option<u64>,

    /// Minimum bedroom count.
    #[arg(long)]
    pub bedrooms: Option<u32>,

    /// Minimum bathroom count.
    #[arg(long)]
    pub bathrooms: Option<u32>,

    /// Location (city, neighborhood, ...).
    #[arg(long)]
    pub location: Option<String>,

    /// Property type (house, apartment, condo, ...).
    #[arg(long = "type")]
    pub property_type: Option<String>,

    /// Transaction type: buy or rent.
    #[arg(long)]
    pub transaction: Option<TransactionType>,
}

impl ListingArgs {
    /// Collect the flag values into a filter set.
    pub fn to_filters(&self) -> Filters {
        Filters {
            price_min: self.price_min,
            price_max: self.price_max,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            location: self.location.clone(),
            property_type: self.property_type.clone(),
            transaction_type: self.transaction,
            search: self.search.clone(),
        }
    }
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > HEARTH_CONFIG env var > ~/.hearth/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("HEARTH_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the log level.
    ///
    /// Priority: --log-level flag > config file value.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config_level.to_string())
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".hearth").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".hearth").join("config.toml");
    }
    PathBuf::from("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_args_to_filters() {
        let args = ListingArgs {
            page: 2,
            limit: None,
            search: Some("garden".to_string()),
            price_min: None,
            price_max: Some(900_000),
            bedrooms: Some(3),
            bathrooms: None,
            location: Some("Brooklyn".to_string()),
            property_type: None,
            transaction: Some(TransactionType::Rent),
        };
        let filters = args.to_filters();
        assert_eq!(filters.search.as_deref(), Some("garden"));
        assert_eq!(filters.price_max, Some(900_000));
        assert_eq!(filters.bedrooms, Some(3));
        assert_eq!(filters.transaction_type, Some(TransactionType::Rent));
        assert_eq!(filters.price_min, None);
    }

    #[test]
    fn test_parses_properties_flags() {
        let args = CliArgs::parse_from([
            "hearth",
            "properties",
            "--page",
            "3",
            "--bedrooms",
            "2",
            "--transaction",
            "rent",
        ]);
        match args.command {
            Command::Properties(listing) => {
                assert_eq!(listing.page, 3);
                assert_eq!(listing.bedrooms, Some(2));
                assert_eq!(listing.transaction, Some(TransactionType::Rent));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_log_level_flag_wins_over_config() {
        let args = CliArgs::parse_from(["hearth", "--log-level", "debug", "chat"]);
        assert_eq!(args.resolve_log_level("info"), "debug");

        let args = CliArgs::parse_from(["hearth", "chat"]);
        assert_eq!(args.resolve_log_level("warn"), "warn");
    }
}
