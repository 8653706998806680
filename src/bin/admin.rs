//! CLI administration tool for linkhop.
//!
//! Manages short links and checks the database directly, without going
//! through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # List all links, newest first
//! cargo run --bin admin -- links list
//!
//! # Show one link with its visit counter
//! cargo run --bin admin -- links show abc123
//!
//! # Create a link, optionally with a custom code
//! cargo run --bin admin -- links create https://example.com --code promo24
//!
//! # Delete a link
//! cargo run --bin admin -- links delete promo24
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL`, or `DB_HOST`/`DB_PORT`/`DB_USER`/`DB_PASSWORD`/`DB_NAME`,
//!   resolved the same way as for the server
//! - `DB_MAX_CONNECTIONS` and the other pool settings

use linkhop::application::services::LinkService;
use linkhop::config::{self, Config, StorageBackend};
use linkhop::domain::entities::Link;
use linkhop::infrastructure::persistence::PgLinkRepository;
use linkhop::server::connect_pool;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing linkhop.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage short links
    Links {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Link management subcommands.
#[derive(Subcommand)]
enum LinkAction {
    /// List all links
    List,

    /// Show a single link
    Show {
        /// Short code
        code: String,
    },

    /// Create a new link
    Create {
        /// Destination URL (http or https)
        url: String,

        /// Custom short code (6-8 alphanumeric characters)
        #[arg(short, long)]
        code: Option<String>,
    },

    /// Delete a link
    Delete {
        /// Short code
        code: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = load_config()?;
    let pool = connect_pool(&config).await?;

    match cli.command {
        Commands::Links { action } => handle_link_action(action, &pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Loads the server configuration, always targeting PostgreSQL.
fn load_config() -> Result<Config> {
    let config = config::load_from_env().context("Failed to load configuration")?;

    if config.storage_backend != StorageBackend::Postgres {
        anyhow::bail!("admin manages the PostgreSQL store; unset STORAGE_BACKEND=memory");
    }

    Ok(config)
}

/// Dispatches link management commands through [`LinkService`], so the CLI
/// applies the same validation and code allocation as the HTTP API.
async fn handle_link_action(action: LinkAction, pool: &PgPool) -> Result<()> {
    let repository = Arc::new(PgLinkRepository::new(Arc::new(pool.clone())));
    let service = LinkService::new(repository);

    match action {
        LinkAction::List => list_links(&service).await,
        LinkAction::Show { code } => show_link(&service, &code).await,
        LinkAction::Create { url, code } => create_link(&service, &url, code.as_deref()).await,
        LinkAction::Delete { code, yes } => delete_link(&service, &code, yes).await,
    }
}

/// Lists all links in a table.
///
/// # Output Format
///
/// ```text
/// 🔗 Links
///
///   Code      Clicks  Created           URL
///   ─────────────────────────────────────────────────────────────
///   promo24   12      2025-01-15 10:30  https://example.com/spring
/// ```
async fn list_links(service: &LinkService) -> Result<()> {
    println!("{}", "🔗 Links".bright_blue().bold());
    println!();

    let links = service
        .list_links()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list links: {}", e))?;

    if links.is_empty() {
        println!("{}", "  No links found".yellow());
        println!();
        println!(
            "  Create one with: {} admin links create <url>",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<9} {:<7} {:<17} {}",
        "Code".bright_white().bold(),
        "Clicks".bright_white().bold(),
        "Created".bright_white().bold(),
        "URL".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for link in &links {
        println!(
            "  {:<9} {:<7} {:<17} {}",
            link.short_code.cyan(),
            link.clicks.to_string().bright_green(),
            link.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            link.original_url
        );
    }

    println!();
    println!(
        "  Total: {}",
        links.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

async fn show_link(service: &LinkService, code: &str) -> Result<()> {
    let link = service
        .get_link(code)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    print_link(&link);
    Ok(())
}

async fn create_link(service: &LinkService, url: &str, code: Option<&str>) -> Result<()> {
    println!("{}", "✨ Create Link".bright_blue().bold());
    println!();

    let link = service
        .create_link(url, code)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create link: {}", e))?;

    println!("{}", "✅ Link created successfully!".green().bold());
    println!();
    print_link(&link);

    Ok(())
}

/// Deletes a link after confirmation (default: No) unless `--yes` is given.
async fn delete_link(service: &LinkService, code: &str, skip_confirm: bool) -> Result<()> {
    println!("{}", "🗑  Delete Link".bright_blue().bold());
    println!();

    let link = service
        .get_link(code)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    print_link(&link);

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this link?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    service
        .delete_link(code)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete link: {}", e))?;

    println!("{}", "✅ Link deleted".green().bold());
    println!();

    Ok(())
}

fn print_link(link: &Link) {
    let last_visit = match link.last_clicked_at {
        Some(t) if link.was_visited() => t.format("%Y-%m-%d %H:%M:%S").to_string(),
        _ => "never".to_string(),
    };

    println!("  Code:       {}", link.short_code.cyan().bold());
    println!("  URL:        {}", link.original_url);
    println!("  Clicks:     {}", link.clicks.to_string().bright_green());
    println!("  Last visit: {}", last_visit.bright_black());
    println!(
        "  Created:    {}",
        link.created_at
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
            .bright_black()
    );
    println!();
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            let links_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links")
                .fetch_one(pool)
                .await
                .context("Connected, but the links table is missing; start the server once to migrate")?;

            println!("{}", "✅ Database connection OK".green().bold());
            println!(
                "  Links: {}",
                links_count.to_string().bright_green().bold()
            );
        }
    }

    Ok(())
}
