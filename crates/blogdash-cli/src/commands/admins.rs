use anyhow::{bail, Result};
use clap::Subcommand;
use tracing::warn;

use blogdash_core::auth::Role;
use blogdash_core::models::CreateAdminRequest;
use blogdash_core::utils::{format_date, truncate};
use blogdash_core::Route;

use crate::app::App;
use crate::prompt;

#[derive(Subcommand)]
pub enum AdminsCommand {
    /// List admin accounts
    List,
    /// Create an admin account
    Add {
        username: String,
        email: String,
        /// superadmin, admin or author
        #[arg(short, long, default_value = "author")]
        role: String,
        /// Email the initial password to the new account
        #[arg(long)]
        notify: bool,
    },
    /// Re-enable an account
    Enable { id: String },
    /// Disable an account
    Disable { id: String },
    /// Set a new password for an account
    ResetPassword { id: String },
    /// Delete an account
    Delete {
        id: String,
        #[arg(short, long)]
        yes: bool,
    },
}

pub async fn run(app: &App, cmd: AdminsCommand) -> Result<()> {
    app.enter(Route::Users)?;
    app.require_admin_manager()?;

    match cmd {
        AdminsCommand::List => {
            let admins = app.call(app.client.list_admins()).await?;
            println!("{:<6} {:<20} {:<30} {:<12} {:<9} {}", "ID", "NAME", "EMAIL", "ROLE", "STATUS", "CREATED");
            for admin in &admins.items {
                println!(
                    "{:<6} {:<20} {:<30} {:<12} {:<9} {}",
                    admin.admin_id,
                    truncate(&admin.name, 20),
                    truncate(&admin.email, 30),
                    admin.role,
                    admin.status_display(),
                    admin.created_at.as_deref().map(format_date).unwrap_or_default()
                );
            }
        }
        AdminsCommand::Add {
            username,
            email,
            role,
            notify,
        } => {
            let password = new_password().await?;
            let request = CreateAdminRequest {
                username: username.clone(),
                password: password.clone(),
                email: email.clone(),
                role: Role::from(role),
            };
            let created = app.call(app.client.create_admin(&request)).await?;
            println!("{}", created.message);

            if notify {
                // The account exists either way; a failed mail is only reported.
                match app.call(app.client.send_admin_password(&email, &username, &password)).await {
                    Ok(()) => println!("Credentials sent to {}", email),
                    Err(e) => {
                        warn!(error = %e, "Failed to send credentials");
                        eprintln!("Account created, but the credentials email failed: {}", e);
                    }
                }
            }
        }
        AdminsCommand::Enable { id } => {
            let result = app.call(app.client.set_admin_status(&id, true)).await?;
            println!("{}", result.message);
        }
        AdminsCommand::Disable { id } => {
            if app.user().map(|u| u.admin_id.to_string()) == Some(id.clone()) {
                bail!("You cannot disable your own account");
            }
            let result = app.call(app.client.set_admin_status(&id, false)).await?;
            println!("{}", result.message);
        }
        AdminsCommand::ResetPassword { id } => {
            let password = new_password().await?;
            let result = app.call(app.client.reset_admin_password(&id, &password)).await?;
            println!("{}", result.message);
        }
        AdminsCommand::Delete { id, yes } => {
            if app.user().map(|u| u.admin_id.to_string()) == Some(id.clone()) {
                bail!("You cannot delete your own account");
            }
            if !yes && !prompt::confirm(&format!("Delete admin {}?", id), false).await? {
                return Ok(());
            }
            app.call(app.client.delete_admin(&id)).await?;
            println!("Deleted admin {}", id);
        }
    }
    Ok(())
}

/// Prompt twice for a new password.
pub async fn new_password() -> Result<String> {
    let password = prompt::password("New password: ").await?;
    if password.len() < 6 {
        bail!("Password must be at least 6 characters");
    }
    let again = prompt::password("Repeat password: ").await?;
    if password != again {
        bail!("Passwords do not match");
    }
    Ok(password)
}
