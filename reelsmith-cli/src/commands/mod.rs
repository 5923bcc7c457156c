//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod generate;
mod history;
mod prompt;

pub use generate::GenerateArgs;
pub use history::HistoryCommands;

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};
use reelsmith_core::domain::region::Region;
use std::path::PathBuf;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Compose a video prompt from a recipe
    Prompt(RecipeArgs),
    /// Generate a video, composing the prompt first unless one is given
    Generate(GenerateArgs),
    /// Browse and manage past generations
    History {
        #[command(subcommand)]
        command: HistoryCommands,
    },
}

/// Recipe, audience and region shared by `prompt` and `generate`
#[derive(Args, Debug, Clone)]
pub struct RecipeArgs {
    /// Recipe text
    #[arg(long, conflicts_with = "recipe_file")]
    pub recipe: Option<String>,

    /// Read the recipe text from a file
    #[arg(long)]
    pub recipe_file: Option<PathBuf>,

    /// People to show in the video (e.g., "a family of four")
    #[arg(long)]
    pub people: String,

    /// Target region: US, Europe or Asia
    #[arg(long)]
    pub region: Region,
}

impl RecipeArgs {
    /// Recipe text from the flag or the file
    pub fn recipe_text(&self) -> Result<String> {
        let text = match (&self.recipe, &self.recipe_file) {
            (Some(text), _) => text.clone(),
            (None, Some(path)) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read recipe file: {}", path.display()))?,
            (None, None) => bail!("Provide the recipe with --recipe or --recipe-file"),
        };

        if text.trim().is_empty() {
            bail!("Recipe text is empty");
        }

        Ok(text)
    }
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Prompt(args) => prompt::handle_prompt_command(args, config).await,
        Commands::Generate(args) => generate::handle_generate_command(args, config).await,
        Commands::History { command } => history::handle_history_command(command, config).await,
    }
}
