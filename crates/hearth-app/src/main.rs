//! Hearth application binary - composition root.
//!
//! Ties the Hearth crates into a single executable:
//! 1. Load configuration from TOML
//! 2. Build the backend API client
//! 3. Run the selected subcommand: the interactive chat loop, a one-shot
//!    property listing, or a single-property lookup

mod cli;

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::io::AsyncBufReadExt;

use hearth_chat::{
    ConversationStore, ListingController, SearchOrchestrator, SendOutcome, TracingSink,
};
use hearth_client::ApiClient;
use hearth_core::config::HearthConfig;
use hearth_core::filters::TransactionType;
use hearth_core::types::{Message, Property};
use hearth_store::FileCache;

use cli::{CliArgs, Command, ListingArgs};

/// Expand ~ to home directory in a path string.
fn resolve_data_dir(data_dir: &str) -> PathBuf {
    if data_dir.starts_with("~/") || data_dir.starts_with("~\\") {
        #[cfg(target_os = "windows")]
        let home = std::env::var("USERPROFILE").unwrap_or_else(|_| ".".to_string());
        #[cfg(not(target_os = "windows"))]
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(&data_dir[2..])
    } else {
        PathBuf::from(data_dir)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let mut config = HearthConfig::load_or_default(&config_file);

    // Tracing. RUST_LOG wins over --log-level, which wins over the config.
    let level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .init();

    tracing::info!("Starting Hearth v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    if let Some(url) = args.api_url.as_deref() {
        config.api.base_url = url.to_string();
    }
    let client = ApiClient::from_config(&config)?;
    tracing::info!(base_url = %client.base_url(), "Backend client ready");

    match args.command {
        Command::Chat => run_chat(client, &config).await,
        Command::Properties(listing) => run_properties(client, &config, listing).await,
        Command::Property { id } => run_property(client, &id).await,
    }
}

/// Interactive conversational search over stdin/stdout.
async fn run_chat(
    client: ApiClient,
    config: &HearthConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let data_dir = resolve_data_dir(&config.general.data_dir);
    std::fs::create_dir_all(&data_dir)?;

    let store = ConversationStore::new(FileCache::new(&data_dir));
    let orchestrator = SearchOrchestrator::new(client, store, Arc::new(TracingSink));
    orchestrator.restore();

    for message in orchestrator.messages() {
        print_message(&message);
    }
    println!("Commands: /buy /rent /filters /clear-filters /clear /quit");

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    prompt()?;
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        match input {
            "" => {}
            "/quit" | "/exit" => break,
            "/clear" => {
                orchestrator.clear_conversation()?;
                println!("Conversation cleared.");
            }
            "/clear-filters" => {
                orchestrator.clear_filters()?;
                println!("Filters cleared.");
            }
            "/filters" => {
                let filters = orchestrator.filters();
                if filters.is_empty() {
                    println!("No active filters.");
                } else {
                    println!("{} active filter(s):", filters.active_count());
                    print_filters(&filters);
                }
            }
            "/buy" => {
                orchestrator.set_transaction_type(TransactionType::Buy)?;
                println!("Searching properties for sale.");
            }
            "/rent" => {
                orchestrator.set_transaction_type(TransactionType::Rent)?;
                println!("Searching properties for rent.");
            }
            utterance => match orchestrator.send(utterance, None).await? {
                SendOutcome::Completed | SendOutcome::Failed => {
                    if let Some(reply) = orchestrator.messages().last() {
                        print_message(reply);
                    }
                }
                SendOutcome::Skipped => println!("A search is already running."),
                SendOutcome::Stale => {}
            },
        }
        prompt()?;
    }

    Ok(())
}

/// One-shot property listing with CLI-provided filters.
async fn run_properties(
    client: ApiClient,
    config: &HearthConfig,
    args: ListingArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut listing_config = config.listing.clone();
    if let Some(limit) = args.limit {
        listing_config.page_size = limit;
    }

    let controller = Arc::new(ListingController::new(
        client,
        Arc::new(TracingSink),
        &listing_config,
    ));
    // One-shot: set the filters without the debounced fetch so exactly
    // one request goes out, then fetch the requested page.
    controller.replace_filters(args.to_filters());
    controller.set_page(args.page).await;

    let info = controller.page_info();
    let properties = controller.properties();
    if properties.is_empty() {
        println!("No properties found.");
        return Ok(());
    }

    println!(
        "Page {} of {} ({} total)",
        info.page, info.total_pages, info.total
    );
    for property in &properties {
        print_property(property);
    }
    Ok(())
}

/// Single-property lookup by id or slug.
async fn run_property(client: ApiClient, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    match client.get_property(id).await? {
        Some(property) => print_property(&property),
        None => println!("Property '{}' not found.", id),
    }
    Ok(())
}

fn prompt() -> std::io::Result<()> {
    print!("> ");
    std::io::stdout().flush()
}

fn print_message(message: &Message) {
    if message.is_user {
        println!("[{}] You: {}", message.timestamp, message.content);
    } else {
        println!("[{}] Hearth: {}", message.timestamp, message.content);
    }
    if let Some(properties) = &message.properties {
        for property in properties {
            print_property(property);
        }
    }
}

fn print_property(property: &Property) {
    println!("  - {}", property.name);
    if let Some(address) = property.address() {
        println!("      {}", address);
    }
    if let Some(price) = &property.sales_price {
        println!("      {}", price);
    }
    let mut facts = Vec::new();
    if let Some(beds) = property.bedroom_count {
        facts.push(format!("{} bd", beds));
    }
    if let Some(baths) = property.bath_count {
        facts.push(format!("{} ba", baths));
    }
    if let Some(sqft) = property.square_feet {
        facts.push(format!("{} sqft", sqft));
    }
    if !facts.is_empty() {
        println!("      {}", facts.join(" | "));
    }
    if let Some(url) = property.display_image() {
        println!("      {}", url);
    }
}

fn print_filters(filters: &hearth_core::filters::Filters) {
    if let Some(tx) = filters.transaction_type {
        println!("  transaction: {}", tx);
    }
    if let Some(min) = filters.price_min {
        println!("  min price:   {}", min);
    }
    if let Some(max) = filters.price_max {
        println!("  max price:   {}", max);
    }
    if let Some(beds) = filters.bedrooms {
        println!("  bedrooms:    {}", beds);
    }
    if let Some(baths) = filters.bathrooms {
        println!("  bathrooms:   {}", baths);
    }
    if let Some(location) = filters.location.as_deref().filter(|s| !s.is_empty()) {
        println!("  location:    {}", location);
    }
    if let Some(kind) = filters.property_type.as_deref().filter(|s| !s.is_empty()) {
        println!("  type:        {}", kind);
    }
    if let Some(search) = filters.search.as_deref().filter(|s| !s.is_empty()) {
        println!("  search:      {}", search);
    }
}
