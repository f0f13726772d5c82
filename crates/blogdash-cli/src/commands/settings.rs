use anyhow::Result;
use clap::{Args, Subcommand};

use blogdash_core::models::{EmailSettings, SystemSetting};
use blogdash_core::Route;

use crate::app::App;
use crate::prompt;

#[derive(Subcommand)]
pub enum SettingsCommand {
    /// Show all system settings
    Show,
    /// Change the site name
    Name { name: String },
    /// Configure outgoing mail
    Email(EmailArgs),
}

#[derive(Args)]
pub struct EmailArgs {
    #[arg(long)]
    pub server: String,
    #[arg(long, default_value_t = 465)]
    pub port: u16,
    #[arg(long)]
    pub username: String,
    /// Sender address (defaults to the username)
    #[arg(long)]
    pub from: Option<String>,
    /// Use STARTTLS instead of implicit SSL
    #[arg(long)]
    pub starttls: bool,
    /// Accept invalid server certificates
    #[arg(long)]
    pub no_verify: bool,
}

pub async fn run(app: &App, cmd: SettingsCommand) -> Result<()> {
    app.enter(Route::Settings)?;

    match cmd {
        SettingsCommand::Show => {
            let settings = app.call(app.client.system_settings()).await?;
            let (mail, general): (Vec<_>, Vec<_>) = settings.iter().partition(|s| s.is_mail_setting());
            for setting in general {
                println!("{:<24} {}", setting.key, display_value(setting));
            }
            if !mail.is_empty() {
                println!("\nMail:");
                for setting in mail {
                    println!("  {:<22} {}", setting.key, display_value(setting));
                }
            }
        }
        SettingsCommand::Name { name } => {
            app.call(app.client.set_system_name(&name)).await?;
            println!("Site name set to {}", name);
        }
        SettingsCommand::Email(args) => {
            let password = prompt::password("Mail password: ").await?;
            let settings = email_settings(args, password);
            app.call(app.client.set_email_settings(&settings)).await?;
            println!("Mail settings saved.");
        }
    }
    Ok(())
}

fn email_settings(args: EmailArgs, password: String) -> EmailSettings {
    EmailSettings {
        mail_from: args.from.unwrap_or_else(|| args.username.clone()),
        mail_username: args.username,
        mail_password: password,
        mail_server: args.server,
        mail_port: args.port,
        mail_tls: args.starttls,
        mail_ssl: !args.starttls,
        mail_validate_certs: !args.no_verify,
        ..EmailSettings::default()
    }
}

/// Mail passwords are never echoed.
fn display_value(setting: &SystemSetting) -> String {
    match setting.value.as_deref() {
        Some(_) if setting.key.to_lowercase().contains("password") => "********".to_string(),
        Some(value) => value.to_string(),
        None => "-".to_string(),
    }
}
