//! login, logout, status

use anyhow::Result;
use tracing::warn;

use blogdash_core::auth::{self, guard, GuardDecision, LoginOutcome, LoginRequest};
use blogdash_core::config::ENV_PASSWORD;
use blogdash_core::{ApiError, Route};

use crate::app::App;
use crate::prompt;

/// Maximum verification code attempts before giving up.
const MAX_TOTP_ATTEMPTS: usize = 3;

pub async fn login(app: &mut App, username: Option<String>) -> Result<()> {
    if let GuardDecision::Redirect(target) = guard(Route::Login, &app.store) {
        app.shell.navigate(target);
        return Ok(());
    }

    let username = match username.or_else(|| app.config.last_username.clone()) {
        Some(name) => name,
        None => prompt::line("Username: ").await?,
    };
    let password = match std::env::var(ENV_PASSWORD) {
        Ok(password) if !password.is_empty() => password,
        _ => prompt::password("Password: ").await?,
    };
    if username.is_empty() || password.is_empty() {
        anyhow::bail!("Username and password required");
    }

    println!("\nAuthenticating...");

    let mut request = LoginRequest::new(username.clone(), password);
    let mut attempts = 0;
    let user = loop {
        match auth::login(&app.gateway, &request).await {
            Ok(LoginOutcome::Authenticated(user)) => break user,
            Ok(LoginOutcome::SecondFactorRequired { message }) => {
                attempts += 1;
                if attempts > MAX_TOTP_ATTEMPTS {
                    anyhow::bail!("Too many verification attempts");
                }
                println!("{}", message);
                let code = prompt::line("Verification code: ").await?;
                request = request.with_totp(code);
            }
            Err(e) => anyhow::bail!(login_message(&e)),
        }
    };

    app.config.last_username = Some(username);
    if let Err(e) = app.config.save() {
        warn!(error = %e, "Failed to save config");
    }

    println!("Login successful! Signed in as {} ({})", user.name, user.role);
    Ok(())
}

/// User-facing text for a failed login.
fn login_message(error: &ApiError) -> String {
    match error {
        ApiError::Api { detail, .. } => detail.clone(),
        ApiError::Network(_) => "Unable to connect to server. Check your internet connection.".to_string(),
        ApiError::Timeout(_) => "Connection timed out. Please try again.".to_string(),
        other => format!("Login failed: {}", other),
    }
}

pub fn logout(app: &App) -> Result<()> {
    auth::logout(&app.store);
    println!("Logged out.");
    Ok(())
}

pub fn status(app: &App) -> Result<()> {
    let Some(user) = app.user() else {
        println!("Not logged in.");
        return Ok(());
    };

    println!("User:    {} (id {})", user.name, user.admin_id);
    println!("Role:    {}", user.role);
    println!("Server:  {}", app.config.api_base_url);
    match app.store.expires_in() {
        Some(left) if app.store.is_valid() => {
            println!("Session: valid for {}h {}m", left.num_hours(), left.num_minutes() % 60)
        }
        _ => println!("Session: expired (run `blogdash login`)"),
    }
    Ok(())
}
