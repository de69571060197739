//! CLI administration tool for linkhub.
//!
//! Provides commands for creating short links, viewing analytics,
//! and performing database operations without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Create a short link
//! cargo run --bin admin -- link create https://example.com --alias docs --tags dev,docs
//!
//! # View analytics for the last week
//! cargo run --bin admin -- stats --days 7 --limit 5
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string
//! - `PUBLIC_BASE_URL` (optional): used to print full short URLs

use linkhub::application::services::{AnalyticsService, CreateShortLink, LinkService};
use linkhub::domain::clock::{Clock, SystemClock};
use linkhub::infrastructure::persistence::{PgAnalyticsRepository, PgLinkRepository};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing linkhub.
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
    Link {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Show click analytics
    Stats {
        /// Length of the daily series, in days (1-365)
        #[arg(short, long, default_value_t = 30)]
        days: u32,

        /// Leaderboard size (1-100)
        #[arg(short, long, default_value_t = 10)]
        limit: u32,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum LinkAction {
    /// Create a new short link
    Create {
        /// Destination URL (prompted if omitted)
        url: Option<String>,

        /// Custom alias instead of a generated code
        #[arg(short, long)]
        alias: Option<String>,

        /// Comma-separated tags, e.g. `dev,github`
        #[arg(short, long, value_delimiter = ',')]
        tags: Vec<String>,

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

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Link { action } => handle_link_action(action, pool).await?,
        Commands::Stats { days, limit } => handle_stats(pool, days, limit).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

async fn handle_link_action(action: LinkAction, pool: PgPool) -> Result<()> {
    match action {
        LinkAction::Create {
            url,
            alias,
            tags,
            yes,
        } => create_link(pool, url, alias, tags, yes).await,
    }
}

/// Creates a short link with interactive prompts.
///
/// Goes through [`LinkService`], so the same validation, alias rules, and
/// code generation apply as for the HTTP API.
async fn create_link(
    pool: PgPool,
    url: Option<String>,
    alias: Option<String>,
    tags: Vec<String>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🔗 Create Short Link".bright_blue().bold());
    println!();

    let target_url = match url {
        Some(u) => u,
        None => Input::new()
            .with_prompt("Target URL")
            .with_initial_text("https://")
            .interact_text()?,
    };

    println!("{}", "Link details:".bright_white().bold());
    println!("  Target: {}", target_url.cyan());
    match &alias {
        Some(a) => println!("  Alias:  {}", a.cyan()),
        None => println!("  Alias:  {}", "(generated code)".bright_black()),
    }
    if !tags.is_empty() {
        println!("  Tags:   {}", tags.join(", ").cyan());
    }
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this link?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let repo = Arc::new(PgLinkRepository::new(Arc::new(pool)));
    let service = LinkService::new(repo, clock);

    let link = service
        .create_short_link(CreateShortLink {
            target_url,
            alias,
            tags,
            ..Default::default()
        })
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create link: {}", e))?;

    let base_url = std::env::var("PUBLIC_BASE_URL")
        .unwrap_or_else(|_| "http://localhost:3000".to_string());

    println!();
    println!("{}", "✅ Link created successfully!".green().bold());
    println!("  ID:        {}", link.id.to_string().bright_black());
    println!("  Code:      {}", link.code.bright_yellow());
    println!(
        "  Short URL: {}/{}",
        base_url.trim_end_matches('/'),
        link.display_name().bright_yellow().bold()
    );
    println!();

    Ok(())
}

/// Displays click analytics.
///
/// Shows:
/// - Summary totals
/// - Clicks per UTC day over the window (zero days included)
/// - Most-clicked short links and list items
async fn handle_stats(pool: PgPool, days: u32, limit: u32) -> Result<()> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let repo = Arc::new(PgAnalyticsRepository::new(Arc::new(pool)));
    let service = AnalyticsService::new(repo, clock);

    let report = service
        .report(days, limit)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load analytics: {}", e))?;

    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let o = &report.overview;
    let rows = [
        ("Short links", o.total_short_links),
        ("Active links", o.active_short_links),
        ("Link clicks", o.total_short_link_clicks),
        ("List pages", o.total_list_pages),
        ("List items", o.total_list_items),
        ("Item clicks", o.total_list_clicks),
        ("Total clicks", o.total_clicks),
    ];
    for (label, value) in rows {
        println!(
            "  {:<14} {}",
            format!("{label}:"),
            value.to_string().bright_green().bold()
        );
    }
    println!();

    println!(
        "{}",
        format!("📅 Clicks over the last {} days", report.days)
            .bright_blue()
            .bold()
    );
    println!();
    let peak = report
        .clicks_over_time
        .iter()
        .map(|d| d.count)
        .max()
        .unwrap_or(0)
        .max(1);
    for day in &report.clicks_over_time {
        let width = (day.count * 40 / peak) as usize;
        println!(
            "  {}  {:>6}  {}",
            day.date.format("%Y-%m-%d").to_string().bright_black(),
            day.count,
            "█".repeat(width).cyan()
        );
    }
    println!();

    println!("{}", "🏆 Top short links".bright_blue().bold());
    println!();
    if report.top_short_links.is_empty() {
        println!("{}", "  No links yet".yellow());
    }
    for (rank, link) in report.top_short_links.iter().enumerate() {
        println!(
            "  {:>3}. {:<20} {:>8}  {}",
            rank + 1,
            link.alias.as_deref().unwrap_or(&link.code).cyan(),
            link.click_count.to_string().bright_green(),
            link.target_url.bright_black()
        );
    }
    println!();

    println!("{}", "🏆 Top list items".bright_blue().bold());
    println!();
    if report.top_list_items.is_empty() {
        println!("{}", "  No list items yet".yellow());
    }
    for (rank, item) in report.top_list_items.iter().enumerate() {
        println!(
            "  {:>3}. {:<20} {:>8}  {}",
            rank + 1,
            item.title.cyan(),
            item.click_count.to_string().bright_green(),
            item.list_title.bright_black()
        );
    }
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let events: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM click_events")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL:   {}", version.bright_white());
            println!("  Click events: {}", events.to_string().bright_white());
            println!();
        }
    }

    Ok(())
}
