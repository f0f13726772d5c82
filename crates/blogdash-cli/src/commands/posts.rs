use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;

use blogdash_core::models::{ArticleStatus, ArticleUpdate};
use blogdash_core::utils::{format_date, strip_tags, truncate};
use blogdash_core::Route;

use crate::app::App;
use crate::prompt;

#[derive(Subcommand)]
pub enum PostsCommand {
    /// List articles
    List,
    /// Show one article
    Show { id: String },
    /// Replace an article's fields
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        /// File holding the new HTML content
        #[arg(long)]
        content_file: Option<PathBuf>,
        #[arg(long)]
        category: Option<String>,
        /// Save as draft instead of published
        #[arg(long)]
        draft: bool,
    },
    /// Delete an article
    Delete {
        id: String,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

pub async fn run(app: &App, cmd: PostsCommand) -> Result<()> {
    app.enter(Route::Posts)?;

    match cmd {
        PostsCommand::List => {
            let articles = app.call(app.client.list_articles()).await?;
            println!("{:<6} {:<40} {:<16} {:<10} {}", "ID", "TITLE", "CATEGORY", "STATUS", "UPDATED");
            for article in &articles.items {
                println!(
                    "{:<6} {:<40} {:<16} {:<10} {}",
                    article.id,
                    truncate(&article.title, 40),
                    truncate(article.category_name.as_deref().unwrap_or("-"), 16),
                    article.status.as_str(),
                    article.updated_at.as_deref().map(format_date).unwrap_or_default(),
                );
            }
            println!("\n{} article(s)", articles.total);
        }
        PostsCommand::Show { id } => {
            let article = app.call(app.client.article(&id)).await?;
            println!("{}", article.title);
            println!("Status:   {}", article.status.as_str());
            if let Some(ref category) = article.category_name {
                println!("Category: {}", category);
            }
            if let Some(ref created) = article.created_at {
                println!("Created:  {}", format_date(created));
            }
            println!();
            println!("{}", strip_tags(&article.content));
        }
        PostsCommand::Edit {
            id,
            title,
            content_file,
            category,
            draft,
        } => {
            let current = app.call(app.client.article(&id)).await?;
            let content = match content_file {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                None => current.content,
            };
            let update = ArticleUpdate {
                title: title.unwrap_or(current.title),
                content,
                category_id: category.or(current.category_id).unwrap_or_default(),
                status: if draft { ArticleStatus::Draft } else { ArticleStatus::Published },
            };
            let saved = app.call(app.client.update_article(&id, &update)).await?;
            println!("Updated article {} ({})", saved.id, saved.status.as_str());
        }
        PostsCommand::Delete { id, yes } => {
            if !yes && !prompt::confirm(&format!("Delete article {}?", id), false).await? {
                return Ok(());
            }
            app.call(app.client.delete_article(&id)).await?;
            println!("Deleted article {}", id);
        }
    }
    Ok(())
}
