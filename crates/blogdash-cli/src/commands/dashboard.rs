use anyhow::Result;

use blogdash_core::models::ArticleStatus;
use blogdash_core::utils::{format_date, truncate};
use blogdash_core::Route;

use crate::app::App;

/// Number of recent articles to show.
const RECENT_ARTICLES: usize = 5;

pub async fn run(app: &App) -> Result<()> {
    app.enter(Route::Dashboard)?;

    let client = &app.client;
    // One shell call around the batch, so a 401 redirects once.
    let (articles, categories, images, links) = app
        .call(async {
            futures::try_join!(
                client.list_articles(),
                client.list_categories(),
                client.list_images(),
                client.list_short_links(),
            )
        })
        .await?;

    let published = articles
        .items
        .iter()
        .filter(|a| a.status == ArticleStatus::Published)
        .count();

    if let Some(user) = app.user() {
        println!("Welcome back, {}\n", user.name);
    }
    println!("Articles:    {} ({} published)", articles.total, published);
    println!("Categories:  {}", categories.total);
    println!("Images:      {}", images.total);
    println!("Short links: {} ({} visits)", links.total, links.items.iter().map(|l| l.visits).sum::<u64>());

    if !articles.items.is_empty() {
        println!("\nRecent articles:");
        for article in articles.items.iter().take(RECENT_ARTICLES) {
            println!(
                "  {:<40} {}",
                truncate(&article.title, 40),
                article.created_at.as_deref().map(format_date).unwrap_or_default()
            );
        }
    }
    Ok(())
}
