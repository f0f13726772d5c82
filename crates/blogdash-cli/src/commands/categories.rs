use anyhow::Result;
use clap::Subcommand;

use blogdash_core::models::CategoryRequest;
use blogdash_core::utils::truncate;
use blogdash_core::Route;

use crate::app::App;
use crate::prompt;

#[derive(Subcommand)]
pub enum CategoriesCommand {
    /// List categories
    List,
    /// Create a category
    Add {
        name: String,
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// Rename or redescribe a category
    Update {
        id: String,
        name: String,
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// Delete a category
    Delete {
        id: String,
        #[arg(short, long)]
        yes: bool,
    },
}

pub async fn run(app: &App, cmd: CategoriesCommand) -> Result<()> {
    app.enter(Route::Categories)?;

    match cmd {
        CategoriesCommand::List => {
            let categories = app.call(app.client.list_categories()).await?;
            println!("{:<6} {:<24} {:<8} {}", "ID", "NAME", "POSTS", "DESCRIPTION");
            for category in &categories.items {
                println!(
                    "{:<6} {:<24} {:<8} {}",
                    category.id,
                    truncate(&category.name, 24),
                    category.article_count,
                    truncate(&category.description, 50)
                );
            }
        }
        CategoriesCommand::Add { name, description } => {
            let created = app
                .call(app.client.create_category(&CategoryRequest { name, description }))
                .await?;
            println!("Created category {} ({})", created.name, created.id);
        }
        CategoriesCommand::Update { id, name, description } => {
            let updated = app
                .call(app.client.update_category(&id, &CategoryRequest { name, description }))
                .await?;
            println!("Updated category {}", updated.name);
        }
        CategoriesCommand::Delete { id, yes } => {
            if !yes && !prompt::confirm(&format!("Delete category {}?", id), false).await? {
                return Ok(());
            }
            app.call(app.client.delete_category(&id)).await?;
            println!("Deleted category {}", id);
        }
    }
    Ok(())
}
