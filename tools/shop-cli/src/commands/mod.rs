//! CLI command implementations.

pub mod auth;
pub mod browse;
pub mod chat;
pub mod config;
pub mod favorites;
pub mod product;
pub mod reset;
pub mod viewed;

use clap::{Args, Subcommand};
use serde::Serialize;
use shop_commerce::Product;

use crate::context::Context;
use crate::output::{product_line, score_badge};

/// Arguments for the chat command.
#[derive(Args)]
pub struct ChatArgs {
    #[command(subcommand)]
    pub command: ChatCommand,
}

#[derive(Subcommand)]
pub enum ChatCommand {
    /// Start a new chat.
    New {
        /// First message; omit for an empty chat.
        text: Vec<String>,
    },
    /// Send a message and wait for the reply.
    Send {
        /// Chat ID (default: most recent chat).
        #[arg(long)]
        chat: Option<String>,

        /// Message text.
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// List chats, newest first.
    List,
    /// Show a chat transcript.
    Show {
        /// Chat ID.
        id: String,
    },
}

/// Arguments for the browse command.
#[derive(Args)]
pub struct BrowseArgs {
    /// Category ("all" for every category).
    #[arg(short, long)]
    pub category: Option<String>,

    /// Sort order: score, price, price-desc, rating, title.
    #[arg(short, long, default_value = "score")]
    pub sort: String,

    /// Minimum rating (0-5).
    #[arg(long)]
    pub min_rating: Option<f64>,

    /// Minimum recommendation score (0-100).
    #[arg(long)]
    pub min_score: Option<u8>,

    /// Minimum price.
    #[arg(long)]
    pub min_price: Option<f64>,

    /// Maximum price.
    #[arg(long)]
    pub max_price: Option<f64>,

    /// Marketplace name.
    #[arg(short, long)]
    pub marketplace: Option<String>,

    /// Text to find in titles and summaries.
    #[arg(short, long)]
    pub query: Option<String>,

    /// Page number.
    #[arg(short, long, default_value = "1")]
    pub page: usize,

    /// Products per page (default from config).
    #[arg(long)]
    pub per_page: Option<usize>,
}

/// Arguments for the product command.
#[derive(Args)]
pub struct ProductArgs {
    /// Product ID.
    pub id: String,

    /// Open the purchase link.
    #[arg(long)]
    pub buy: bool,
}

/// Arguments for the favorites command.
#[derive(Args)]
pub struct FavoritesArgs {
    #[command(subcommand)]
    pub command: Option<FavoritesCommand>,
}

#[derive(Subcommand)]
pub enum FavoritesCommand {
    /// List favorite products.
    List,
    /// Add or remove a favorite.
    Toggle {
        /// Product ID.
        id: String,
    },
    /// Remove every favorite.
    Clear,
    /// Compare 2 to 4 products side by side.
    Compare {
        /// Product IDs.
        #[arg(required = true, num_args = 2..=4)]
        ids: Vec<String>,
    },
}

/// Arguments for the viewed command.
#[derive(Args)]
pub struct ViewedArgs {
    #[command(subcommand)]
    pub command: Option<ViewedCommand>,
}

#[derive(Subcommand)]
pub enum ViewedCommand {
    /// List recently viewed products.
    List,
    /// Clear the history.
    Clear,
}

/// Arguments for the auth command.
#[derive(Args)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommand,
}

#[derive(Subcommand)]
pub enum AuthCommand {
    /// Log in with email and password.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account.
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Log in with a social provider (google, x, facebook).
    Social {
        provider: String,
    },
    /// Show the signed-in user.
    Whoami,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}

/// Arguments for the reset command.
#[derive(Args)]
pub struct ResetArgs {
    /// Skip confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,
}

/// Product fields printed in `--json` mode.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub price: String,
    pub rating: f64,
    pub score: u8,
    pub category: &'a str,
    pub marketplace: &'a str,
    pub buy_url: &'a str,
}

impl<'a> From<&'a Product> for ProductSummary<'a> {
    fn from(product: &'a Product) -> Self {
        Self {
            id: product.id.as_str(),
            title: &product.title,
            price: product.price.display(),
            rating: product.rating,
            score: product.score,
            category: &product.category,
            marketplace: &product.marketplace,
            buy_url: &product.buy_url,
        }
    }
}

/// Print products as a list, or as JSON.
pub fn print_products(ctx: &Context, products: &[&Product]) {
    if ctx.output.is_json() {
        let summaries: Vec<ProductSummary<'_>> =
            products.iter().map(|p| ProductSummary::from(*p)).collect();
        ctx.output.json(&summaries);
        return;
    }

    for product in products {
        ctx.output
            .list_item(&format!("{} {}", product_line(product), score_badge(product.score)));
    }
}
