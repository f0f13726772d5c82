//! Interactive article composition with autosave and draft recovery.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tokio::sync::Mutex;
use tracing::warn;

use blogdash_core::draft::{CoverImage, DraftStore};
use blogdash_core::utils::truncate;
use blogdash_core::{Autosave, Composer, Draft, Route};

use crate::app::App;
use crate::prompt;

#[derive(Args)]
pub struct ComposeArgs {
    #[arg(long)]
    pub title: Option<String>,
    /// File holding the HTML content
    #[arg(long)]
    pub content_file: Option<PathBuf>,
    /// Category ID
    #[arg(long)]
    pub category: Option<String>,
    /// Cover image file
    #[arg(long)]
    pub cover: Option<PathBuf>,
    /// Publish without the final confirmation
    #[arg(short, long)]
    pub yes: bool,
}

pub async fn run(app: &App, args: ComposeArgs) -> Result<()> {
    app.enter(Route::ComposePost)?;

    let mut composer = Composer::new(app.config.draft_store()?);
    if let Some(stored) = composer.mount()? {
        println!("An unsent draft was found: \"{}\"", truncate(&stored.title, 60));
        if prompt::confirm("Recover it?", true).await? {
            composer.recover()?;
        } else {
            composer.discard()?;
        }
    }

    let composer = Arc::new(Mutex::new(composer));
    let autosave = Autosave::spawn(composer.clone(), app.config.autosave_interval());

    let result = compose(app, &composer, args).await;
    autosave.stop();

    match result {
        Ok(true) => Ok(()),
        Ok(false) => {
            if leave(&composer).await {
                println!("Not published. The draft is saved and will be offered next time.");
            } else {
                println!("Not published.");
            }
            Ok(())
        }
        Err(e) => {
            if leave(&composer).await {
                eprintln!("Your draft is kept for next time.");
            }
            Err(e)
        }
    }
}

/// Returns whether the article was published.
async fn compose<S>(app: &App, composer: &Mutex<Composer<S>>, args: ComposeArgs) -> Result<bool>
where
    S: DraftStore,
{
    fill_form(composer, args.title, args.content_file, args.category, args.cover).await?;

    let form = composer.lock().await.form().clone();
    print_summary(&form);

    if !args.yes && !prompt::confirm("Publish now?", true).await? {
        return Ok(false);
    }

    app.call(app.client.create_article(&form))
        .await
        .context("Publishing failed")?;

    if let Err(e) = composer.lock().await.submitted() {
        warn!(error = %e, "Failed to clear draft after publishing");
    }
    println!("Article published.");
    Ok(true)
}

/// Apply arguments first, then prompt for whatever is still missing.
/// Every change is saved as it lands.
async fn fill_form<S: DraftStore>(
    composer: &Mutex<Composer<S>>,
    title: Option<String>,
    content_file: Option<PathBuf>,
    category: Option<String>,
    cover: Option<PathBuf>,
) -> Result<()> {
    if let Some(title) = title {
        composer.lock().await.set_title(title)?;
    }
    if let Some(path) = content_file {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        composer.lock().await.set_content(content)?;
    }
    if let Some(category) = category {
        composer.lock().await.set_category(category)?;
    }
    if let Some(path) = cover {
        composer.lock().await.set_cover(CoverImage {
            url: path.display().to_string(),
            file: Some(path),
        })?;
    }

    let form = composer.lock().await.form().clone();
    if form.title.trim().is_empty() {
        let title = prompt::line("Title: ").await?;
        composer.lock().await.set_title(title)?;
    }
    if form.content.trim().is_empty() {
        let content = prompt::block("Content (HTML)").await?;
        composer.lock().await.set_content(content)?;
    }
    if form.category_id.trim().is_empty() {
        let category = prompt::line("Category ID: ").await?;
        composer.lock().await.set_category(category)?;
    }
    Ok(())
}

/// Write the form back before the view closes. Returns whether a draft
/// is now stored.
async fn leave<S: DraftStore>(composer: &Mutex<Composer<S>>) -> bool {
    match composer.lock().await.flush() {
        Ok(saved) => saved,
        Err(e) => {
            warn!(error = %e, "Failed to save draft on exit");
            eprintln!("Warning: the draft could not be saved: {}", e);
            false
        }
    }
}

fn print_summary(form: &Draft) {
    println!();
    println!("Title:    {}", form.title);
    println!("Category: {}", form.category_id);
    println!("Content:  {} characters", form.content.chars().count());
    if let Some(ref file) = form.cover_image.file {
        println!("Cover:    {}", file.display());
    }
    println!();
}
