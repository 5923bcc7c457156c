//! Generate command handler

use anyhow::Result;
use clap::Args;
use colored::*;
use reelsmith_client::{ClientError, ReelsmithClient};
use reelsmith_core::domain::render::{ALLOWED_SECONDS, ALLOWED_SIZES};
use reelsmith_core::dto::generation::GenerateVideo;

use super::RecipeArgs;
use super::prompt::compose;
use crate::config::Config;

/// Arguments of the generate command
#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub recipe: RecipeArgs,

    /// Title stored with the generation
    #[arg(long)]
    pub title: Option<String>,

    /// Video prompt; composed from the recipe when omitted
    #[arg(long)]
    pub prompt: Option<String>,

    /// Frame size (e.g., 1280x720); unsupported values use the server default
    #[arg(long)]
    pub size: Option<String>,

    /// Duration in seconds (4, 8 or 12); unsupported values use the server default
    #[arg(long)]
    pub seconds: Option<u32>,
}

/// Handle the generate command
pub async fn handle_generate_command(args: GenerateArgs, config: &Config) -> Result<()> {
    let client = ReelsmithClient::new(&config.orchestrator_url);

    warn_unsupported(&args);

    let video_prompt = match args.prompt.clone() {
        Some(prompt) => prompt,
        None => {
            println!("{}", "Composing video prompt...".dimmed());
            let prompt = compose(&client, &args.recipe).await?;
            println!("{}", prompt.dimmed());
            println!();
            prompt
        }
    };

    let req = GenerateVideo {
        title: args.title.clone(),
        recipe_text: args.recipe.recipe_text()?,
        people: args.recipe.people.clone(),
        region: Some(args.recipe.region),
        video_prompt,
        size: args.size.clone(),
        seconds: args.seconds,
    };

    println!(
        "{}",
        "Generating video, this can take a few minutes...".dimmed()
    );

    match client.generate_video(req).await {
        Ok(video) => {
            println!("{}", "✓ Video generated successfully!".green().bold());
            println!("  ID:           {}", video.db_id.to_string().cyan());
            println!("  Provider job: {}", video.provider_job_id.dimmed());
            println!("  Stored at:    {}", video.storage_path.dimmed());
            println!("  URL:          {}", video.video_url.bold());
            Ok(())
        }
        Err(err) => {
            print_failure(&err);
            Err(err.into())
        }
    }
}

fn warn_unsupported(args: &GenerateArgs) {
    if let Some(size) = args.size.as_deref().filter(|s| !ALLOWED_SIZES.contains(s)) {
        println!(
            "{}",
            format!(
                "⚠ Size {} is not supported ({}); the server default will be used",
                size,
                ALLOWED_SIZES.join(", ")
            )
            .yellow()
        );
    }
    if let Some(seconds) = args.seconds.filter(|s| !ALLOWED_SECONDS.contains(s)) {
        println!(
            "{}",
            format!(
                "⚠ Duration {}s is not supported; the server default will be used",
                seconds
            )
            .yellow()
        );
    }
}

fn print_failure(err: &ClientError) {
    println!("{}", "✗ Video generation failed".red().bold());

    if let Some(details) = err.details() {
        println!("  Details: {}", details.dimmed());
    }

    if let Some(job_id) = err.job_id() {
        println!("  ID:      {}", job_id.to_string().cyan());
        if err.is_pending() {
            println!(
                "{}",
                format!(
                    "  The job may still finish. Check with: reelsmith history get {}",
                    job_id
                )
                .yellow()
            );
        }
    }
}
