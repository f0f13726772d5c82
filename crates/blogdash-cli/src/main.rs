//! blogdash - command-line admin console for a blog platform.
//!
//! Log in once, then manage posts, categories, images, short links, admin
//! accounts and system settings. Article drafts are autosaved locally and
//! offered for recovery the next time `compose` runs.

mod app;
mod commands;
mod navigator;
mod prompt;

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use blogdash_core::Config;

use app::App;
use commands::{
    admins::AdminsCommand, categories::CategoriesCommand, compose::ComposeArgs,
    images::ImagesCommand, links::LinksCommand, logs::LogsCommand, posts::PostsCommand,
    profile::ProfileCommand, settings::SettingsCommand,
};

#[derive(Parser)]
#[command(name = "blogdash")]
#[command(about = "Admin console for a blog platform", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// API base URL (overrides config and BLOGDASH_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Session profile to use
    #[arg(long, global = true)]
    profile: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in, prompting for a verification code if the account needs one
    Login {
        /// Username (defaults to the last one used)
        #[arg(short, long)]
        username: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show who is logged in and when the session expires
    Status,
    /// Overview of posts, categories, images and links
    Dashboard,
    /// Write and publish a new article
    Compose(ComposeArgs),
    /// Manage articles
    #[command(subcommand)]
    Posts(PostsCommand),
    /// Manage categories
    #[command(subcommand)]
    Categories(CategoriesCommand),
    /// Manage uploaded images
    #[command(subcommand)]
    Images(ImagesCommand),
    /// Manage short links
    #[command(subcommand)]
    Links(LinksCommand),
    /// Manage admin accounts
    #[command(subcommand)]
    Admins(AdminsCommand),
    /// Your own account
    #[command(subcommand)]
    Profile(ProfileCommand),
    /// System name and mail settings
    #[command(subcommand)]
    Settings(SettingsCommand),
    /// Security logs and analysis
    #[command(subcommand)]
    Logs(LogsCommand),
}

/// Stderr logging filtered by `RUST_LOG`, plus a daily log file when
/// `log_dir` is configured. The guard must live until exit.
fn init_tracing(verbose: bool, log_dir: Option<&PathBuf>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "blogdash.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(url) = cli.api_url {
        config.api_base_url = url;
    }
    if let Some(profile) = cli.profile {
        config.profile = profile;
    }

    let _log_guard = init_tracing(cli.verbose, config.log_dir.as_ref());
    info!(api = %config.api_base_url, profile = %config.profile, "blogdash starting");

    let mut app = App::new(config)?;

    match cli.command {
        Commands::Login { username } => commands::session::login(&mut app, username).await,
        Commands::Logout => commands::session::logout(&app),
        Commands::Status => commands::session::status(&app),
        Commands::Dashboard => commands::dashboard::run(&app).await,
        Commands::Compose(args) => commands::compose::run(&app, args).await,
        Commands::Posts(cmd) => commands::posts::run(&app, cmd).await,
        Commands::Categories(cmd) => commands::categories::run(&app, cmd).await,
        Commands::Images(cmd) => commands::images::run(&app, cmd).await,
        Commands::Links(cmd) => commands::links::run(&app, cmd).await,
        Commands::Admins(cmd) => commands::admins::run(&app, cmd).await,
        Commands::Profile(cmd) => commands::profile::run(&app, cmd).await,
        Commands::Settings(cmd) => commands::settings::run(&app, cmd).await,
        Commands::Logs(cmd) => commands::logs::run(&app, cmd).await,
    }
}
