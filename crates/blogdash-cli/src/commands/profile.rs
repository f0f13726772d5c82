use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;

use blogdash_core::auth;
use blogdash_core::Route;

use super::admins::new_password;
use crate::app::App;
use crate::prompt;

#[derive(Subcommand)]
pub enum ProfileCommand {
    /// Show your account details
    Show,
    /// Change your password (signs you out)
    Password,
    /// Upload a new avatar image (at most 2 MB)
    Avatar { path: PathBuf },
}

pub async fn run(app: &App, cmd: ProfileCommand) -> Result<()> {
    app.enter(Route::Profile)?;

    match cmd {
        ProfileCommand::Show => {
            let profile = app.call(app.client.profile()).await?;
            println!("Name:  {}", profile.name);
            println!("Email: {}", profile.email);
            println!("Role:  {}", profile.role);
            println!("ID:    {}", profile.admin_id);
        }
        ProfileCommand::Password => {
            let current = prompt::password("Current password: ").await?;
            let new = new_password().await?;
            let result = app.call(app.client.change_password(&current, &new)).await?;
            println!("{}", result.message);
            // The old token was issued for the old password.
            auth::logout(&app.store);
            println!("Please log in again with your new password.");
        }
        ProfileCommand::Avatar { path } => {
            let stored = app.call(app.client.upload_avatar(&path)).await?;
            match stored.get("url").and_then(|u| u.as_str()) {
                Some(url) => println!("Avatar updated: {}", url),
                None => println!("Avatar updated."),
            }
        }
    }
    Ok(())
}
