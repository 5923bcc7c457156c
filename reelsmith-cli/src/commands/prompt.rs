//! Prompt command handler

use anyhow::Result;
use colored::*;
use reelsmith_client::ReelsmithClient;
use reelsmith_core::dto::prompt::ComposePrompt;

use super::RecipeArgs;
use crate::config::Config;

/// Handle the prompt command
pub async fn handle_prompt_command(args: RecipeArgs, config: &Config) -> Result<()> {
    let client = ReelsmithClient::new(&config.orchestrator_url);

    let video_prompt = compose(&client, &args).await?;

    println!("{}", "Video prompt:".bold());
    println!("{}", video_prompt);

    Ok(())
}

/// Ask the orchestrator to compose a prompt for `args`
pub async fn compose(client: &ReelsmithClient, args: &RecipeArgs) -> Result<String> {
    let composed = client
        .compose_prompt(ComposePrompt {
            recipe_text: args.recipe_text()?,
            people: args.people.clone(),
            region: Some(args.region),
        })
        .await?;

    Ok(composed.video_prompt)
}
