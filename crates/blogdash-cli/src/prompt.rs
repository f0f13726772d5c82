//! Blocking terminal prompts, run off the async workers.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

fn read_line(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Read lines until a line holding a single `.` (or end of input).
fn read_block(label: &str) -> Result<String> {
    println!("{} (finish with a line containing only '.')", label);
    let mut lines = Vec::new();
    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.trim() == "." {
            break;
        }
        lines.push(line);
    }
    Ok(lines.join("\n"))
}

async fn blocking<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .context("Prompt task failed")?
}

pub async fn line(label: &str) -> Result<String> {
    let label = label.to_string();
    blocking(move || read_line(&label)).await
}

pub async fn block(label: &str) -> Result<String> {
    let label = label.to_string();
    blocking(move || read_block(&label)).await
}

pub async fn password(label: &str) -> Result<String> {
    let label = label.to_string();
    blocking(move || Ok(rpassword::prompt_password(label)?)).await
}

/// Yes/no question; an empty answer takes `default`.
pub async fn confirm(question: &str, default: bool) -> Result<bool> {
    let hint = if default { "[Y/n]" } else { "[y/N]" };
    let answer = line(&format!("{} {} ", question, hint)).await?;
    Ok(parse_answer(&answer, default))
}

fn parse_answer(answer: &str, default: bool) -> bool {
    match answer.trim().to_lowercase().as_str() {
        "" => default,
        "y" | "yes" => true,
        _ => false,
    }
}
