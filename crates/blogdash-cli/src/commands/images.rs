use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;

use blogdash_core::utils::{format_date, truncate};
use blogdash_core::Route;

use crate::app::App;
use crate::prompt;

#[derive(Subcommand)]
pub enum ImagesCommand {
    /// List uploaded images
    List,
    /// Upload an image file
    Upload { path: PathBuf },
    /// Delete an image
    Delete {
        id: i64,
        #[arg(short, long)]
        yes: bool,
    },
}

pub async fn run(app: &App, cmd: ImagesCommand) -> Result<()> {
    app.enter(Route::Images)?;

    match cmd {
        ImagesCommand::List => {
            let images = app.call(app.client.list_images()).await?;
            println!("{:<6} {:<30} {:>10} {:<16} {}", "ID", "NAME", "SIZE", "UPLOADED", "URL");
            for image in &images.items {
                println!(
                    "{:<6} {:<30} {:>10} {:<16} {}",
                    image.image_id,
                    truncate(&image.original_name, 30),
                    image.size_display(),
                    image.created_at.as_deref().map(format_date).unwrap_or_default(),
                    image.url
                );
            }
        }
        ImagesCommand::Upload { path } => {
            let uploaded = app.call(app.client.upload_image(&path)).await?;
            match uploaded.get("url").and_then(|u| u.as_str()) {
                Some(url) => println!("Uploaded: {}", url),
                None => println!("Uploaded: {}", serde_json::to_string_pretty(&uploaded)?),
            }
        }
        ImagesCommand::Delete { id, yes } => {
            if !yes && !prompt::confirm(&format!("Delete image {}?", id), false).await? {
                return Ok(());
            }
            app.call(app.client.delete_image(id)).await?;
            println!("Deleted image {}", id);
        }
    }
    Ok(())
}
