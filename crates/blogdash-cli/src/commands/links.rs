use anyhow::Result;
use clap::Subcommand;

use blogdash_core::utils::{format_date, truncate};
use blogdash_core::Route;

use crate::app::App;
use crate::prompt;

#[derive(Subcommand)]
pub enum LinksCommand {
    /// List short links
    List,
    /// Shorten a URL
    Add {
        url: String,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Issue a new code for an existing link
    Regenerate { code: String },
    /// Delete a short link
    Delete {
        code: String,
        #[arg(short, long)]
        yes: bool,
    },
}

pub async fn run(app: &App, cmd: LinksCommand) -> Result<()> {
    app.enter(Route::Links)?;

    match cmd {
        LinksCommand::List => {
            let links = app.call(app.client.list_short_links()).await?;
            println!("{:<10} {:<40} {:>7} {:<16} {}", "CODE", "TARGET", "VISITS", "LAST VISIT", "SHORT URL");
            for link in &links.items {
                println!(
                    "{:<10} {:<40} {:>7} {:<16} {}",
                    link.code,
                    truncate(&link.original_url, 40),
                    link.visits,
                    link.last_visit.as_deref().map(format_date).unwrap_or_else(|| "-".to_string()),
                    link.short_url
                );
            }
        }
        LinksCommand::Add { url, description } => {
            let link = app
                .call(app.client.create_short_link(&url, description.as_deref()))
                .await?;
            println!("{}", link.short_url);
        }
        LinksCommand::Regenerate { code } => {
            let link = app.call(app.client.regenerate_short_link(&code)).await?;
            println!("{} -> {}", code, link.short_url);
        }
        LinksCommand::Delete { code, yes } => {
            if !yes && !prompt::confirm(&format!("Delete short link {}?", code), false).await? {
                return Ok(());
            }
            app.call(app.client.delete_short_link(&code)).await?;
            println!("Deleted short link {}", code);
        }
    }
    Ok(())
}
