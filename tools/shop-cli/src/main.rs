//! ShopSmart CLI - a terminal front end for the demo shopping assistant.
//!
//! Commands:
//! - `shop chat` - Talk to the assistant
//! - `shop browse` - Filter, sort, and page through the catalog
//! - `shop categories` - List catalog categories
//! - `shop product` - Show a product and record the view
//! - `shop favorites` - Manage and compare favorites
//! - `shop viewed` - Recently viewed products
//! - `shop auth` - Demo login screens
//! - `shop config` - Manage configuration
//! - `shop reset` - Clear saved state

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{
    AuthArgs, BrowseArgs, ChatArgs, ConfigArgs, FavoritesArgs, ProductArgs, ResetArgs, ViewedArgs,
};

/// ShopSmart - browse products and chat with a shopping assistant
#[derive(Parser)]
#[command(name = "shop")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the shopping assistant
    Chat(ChatArgs),

    /// Browse the product catalog
    Browse(BrowseArgs),

    /// List product categories
    Categories,

    /// Show product details
    Product(ProductArgs),

    /// Manage favorite products
    Favorites(FavoritesArgs),

    /// Recently viewed products
    Viewed(ViewedArgs),

    /// Sign in (demo mode)
    Auth(AuthArgs),

    /// Manage configuration
    Config(ConfigArgs),

    /// Clear saved favorites, history, and chats
    Reset(ResetArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let config_path = cli.config.as_deref();
    let ctx = context::Context::load(config_path, output)?;

    init_tracing(&ctx.config.logging.filter, cli.verbose);
    if let Some(path) = &ctx.config_path {
        ctx.output.debug(&format!("Using config: {}", path.display()));
    }

    // Execute command
    let result = match cli.command {
        Commands::Chat(args) => commands::chat::run(args, &ctx).await,
        Commands::Browse(args) => commands::browse::run(args, &ctx).await,
        Commands::Categories => commands::browse::categories(&ctx).await,
        Commands::Product(args) => commands::product::run(args, &ctx).await,
        Commands::Favorites(args) => commands::favorites::run(args, &ctx).await,
        Commands::Viewed(args) => commands::viewed::run(args, &ctx).await,
        Commands::Auth(args) => commands::auth::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
        Commands::Reset(args) => commands::reset::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

/// Log to stderr. `RUST_LOG` wins over the configured filter.
fn init_tracing(configured: &str, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(configured))
            .unwrap_or_else(|_| EnvFilter::new(config::DEFAULT_LOG_FILTER))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
