//! Common types used across CLI modules

use anyhow::{Result, bail};
use uuid::Uuid;

/// Job identifier given on the command line: a full UUID or an unambiguous
/// prefix of one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdOrPrefix {
    Full(Uuid),
    /// Lowercased prefix
    Prefix(String),
}

impl IdOrPrefix {
    /// Parse a full UUID, falling back to a prefix
    ///
    /// Prefixes may only contain hex digits and dashes.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();

        if let Ok(uuid) = Uuid::parse_str(input) {
            return Ok(IdOrPrefix::Full(uuid));
        }

        if input.is_empty() {
            bail!("Job ID cannot be empty");
        }
        if !input.chars().all(|c| c.is_ascii_hexdigit() || c == '-') {
            bail!("'{}' is not a job ID or ID prefix", input);
        }

        Ok(IdOrPrefix::Prefix(input.to_lowercase()))
    }

    /// Whether `id` is the job this identifier names
    pub fn matches(&self, id: &Uuid) -> bool {
        match self {
            IdOrPrefix::Full(uuid) => uuid == id,
            IdOrPrefix::Prefix(prefix) => id.to_string().starts_with(prefix.as_str()),
        }
    }
}

impl std::fmt::Display for IdOrPrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdOrPrefix::Full(uuid) => write!(f, "{}", uuid),
            IdOrPrefix::Prefix(prefix) => write!(f, "{}", prefix),
        }
    }
}
