//! History command handlers
//!
//! Handles listing, viewing and deleting past generations.

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use reelsmith_client::ReelsmithClient;
use reelsmith_core::domain::job::{JobStatus, VideoJob};
use reelsmith_core::dto::history::HistoryQuery;

use crate::config::Config;
use crate::id_resolver::resolve_job_id;
use crate::types::IdOrPrefix;

/// History subcommands
#[derive(Subcommand)]
pub enum HistoryCommands {
    /// List past generations, newest first
    List {
        /// Entries per page (1-50)
        #[arg(short, long, default_value = "5")]
        limit: i64,

        /// Page number, starting at 1
        #[arg(short, long, default_value = "1")]
        page: i64,
    },
    /// Get generation details
    Get {
        /// Job ID or unambiguous prefix
        id: String,

        /// Print the raw JSON record
        #[arg(long)]
        json: bool,
    },
    /// Delete a generation and its stored video
    Delete {
        /// Job ID or unambiguous prefix
        id: String,
    },
}

/// Handle history commands
///
/// # Arguments
/// * `command` - The history command to execute
/// * `config` - The CLI configuration
pub async fn handle_history_command(command: HistoryCommands, config: &Config) -> Result<()> {
    let client = ReelsmithClient::new(&config.orchestrator_url);

    match command {
        HistoryCommands::List { limit, page } => list_history(&client, limit, page).await,
        HistoryCommands::Get { id, json } => get_entry(&client, &id, json).await,
        HistoryCommands::Delete { id } => delete_entry(&client, &id).await,
    }
}

/// List one page of history
async fn list_history(client: &ReelsmithClient, limit: i64, page: i64) -> Result<()> {
    let query = HistoryQuery {
        limit: Some(limit),
        page: Some(page),
    };
    let history = client.list_history(&query).await?;

    if history.history.is_empty() {
        println!("{}", "No generations found.".yellow());
        return Ok(());
    }

    let pages = (history.total + query.limit() - 1) / query.limit();
    println!(
        "{}",
        format!(
            "{} generation(s), page {} of {}:",
            history.total,
            query.page(),
            pages.max(1)
        )
        .bold()
    );
    println!();

    for job in &history.history {
        print_job_summary(job);
    }

    Ok(())
}

/// Get and display a single generation
async fn get_entry(client: &ReelsmithClient, id: &str, json: bool) -> Result<()> {
    let uuid = resolve_job_id(client, &IdOrPrefix::parse(id)?).await?;

    let job = client.get_job(uuid).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&job)?);
    } else {
        print_job_details(&job);
    }

    Ok(())
}

/// Delete a generation
async fn delete_entry(client: &ReelsmithClient, id: &str) -> Result<()> {
    let uuid = resolve_job_id(client, &IdOrPrefix::parse(id)?).await?;

    client.delete_job(uuid).await?;

    println!("{}", "✓ Generation deleted".green().bold());
    println!("  ID: {}", uuid.to_string().dimmed());

    Ok(())
}

/// Print a one-entry summary
fn print_job_summary(job: &VideoJob) {
    println!("  {} {}", "▸".cyan(), job.title.bold());
    println!("    ID:      {}", job.id.to_string().dimmed());
    println!("    Status:  {}", colorize_status(job.status));
    println!("    Region:  {}", job.region);
    println!(
        "    Created: {}",
        job.created_at
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
            .dimmed()
    );
    if let Some(url) = &job.video_url {
        println!("    URL:     {}", url);
    }
    println!();
}

/// Print detailed generation information
fn print_job_details(job: &VideoJob) {
    println!("{}", "Generation Details:".bold());
    println!("  ID:           {}", job.id.to_string().cyan());
    println!("  Title:        {}", job.title);
    println!("  Status:       {}", colorize_status(job.status));
    println!("  Region:       {}", job.region);
    println!("  People:       {}", job.people);
    println!(
        "  Created:      {}",
        job.created_at.format("%Y-%m-%d %H:%M:%S")
    );

    if let Some(completed) = job.completed_at {
        println!("  Completed:    {}", completed.format("%Y-%m-%d %H:%M:%S"));
        let seconds = completed
            .signed_duration_since(job.created_at)
            .num_seconds();
        println!("  Duration:     {}s", seconds);
    }

    if let Some(handle) = &job.provider_job_id {
        println!("  Provider job: {}", handle.dimmed());
    }
    if let Some(path) = &job.storage_path {
        println!("  Stored at:    {}", path.dimmed());
    }
    if let Some(url) = &job.video_url {
        println!("  URL:          {}", url.bold());
    }

    println!("\n{}", "Prompt:".bold());
    println!("{}", job.video_prompt);

    if let Some(error) = &job.error_message {
        println!("\n{}", "Error:".bold());
        println!("{}", error.red());
    }
}

/// Colorize job status for display
fn colorize_status(status: JobStatus) -> ColoredString {
    let status_str = status.as_str();
    match status {
        JobStatus::Queued => status_str.yellow(),
        JobStatus::Generating | JobStatus::Uploading => status_str.cyan(),
        JobStatus::Completed => status_str.green(),
        JobStatus::Failed => status_str.red(),
    }
}
