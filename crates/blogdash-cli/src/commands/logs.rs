use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use clap::Subcommand;

use blogdash_core::models::{AnalysisConfig, AnalysisDepth};
use blogdash_core::utils::{format_date, truncate};
use blogdash_core::Route;

use crate::app::App;

#[derive(Subcommand)]
pub enum LogsCommand {
    /// Recent security events
    List {
        /// Only failed logins and lockouts
        #[arg(long)]
        failures: bool,
    },
    /// Ask the backend for a risk analysis of the security log
    Analyze {
        /// Start of the window, e.g. 2024-01-01T00:00:00 (default: 30 days ago)
        #[arg(long, requires = "until")]
        since: Option<String>,
        /// End of the window
        #[arg(long, requires = "since")]
        until: Option<String>,
        /// Quicker, shallower analysis
        #[arg(long)]
        basic: bool,
    },
}

pub async fn run(app: &App, cmd: LogsCommand) -> Result<()> {
    app.enter(Route::Analytics)?;

    match cmd {
        LogsCommand::List { failures } => {
            let logs = app.call(app.client.security_logs()).await?;
            println!("{:<16} {:<16} {:<16} {}", "TIME", "EVENT", "IP", "DETAILS");
            for log in logs.items.iter().filter(|l| !failures || l.is_failure()) {
                println!(
                    "{:<16} {:<16} {:<16} {}",
                    format_date(&log.created_at),
                    log.event_type,
                    log.ip_address,
                    truncate(&log.details, 60)
                );
            }
        }
        LogsCommand::Analyze { since, until, basic } => {
            let mut config = match (since, until) {
                (Some(since), Some(until)) => AnalysisConfig::between(parse_time(&since)?, parse_time(&until)?),
                _ => AnalysisConfig::recent(),
            };
            if basic {
                config.analysis_type = AnalysisDepth::Basic;
            }

            println!("Analyzing security log...");
            let analysis = app.call(app.client.analyze_logs(&config)).await?;

            println!("\nRisk level: {:?}", analysis.risk_level);
            if !analysis.summary.is_empty() {
                println!("\n{}", analysis.summary);
            }
            if !analysis.patterns.is_empty() {
                println!("\nPatterns:");
                for pattern in &analysis.patterns {
                    println!("  {:<20} x{:<5} {}", pattern.kind, pattern.count, pattern.description);
                }
            }
            if !analysis.recommendations.is_empty() {
                println!("\nRecommendations:");
                for rec in &analysis.recommendations {
                    println!("  - {}", rec);
                }
            }
        }
    }
    Ok(())
}

fn parse_time(value: &str) -> Result<NaiveDateTime> {
    if let Ok(time) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Ok(time);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .with_context(|| format!("Invalid time '{}', expected YYYY-MM-DD[THH:MM:SS]", value))
}
