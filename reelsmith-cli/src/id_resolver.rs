//! ID resolver module
//!
//! Resolves job ID prefixes to full UUIDs by paging through the history,
//! so users can type a short prefix instead of a whole UUID.

use anyhow::{Context, Result, anyhow};
use reelsmith_client::ReelsmithClient;
use reelsmith_core::dto::history::{HistoryQuery, MAX_PAGE_SIZE};
use uuid::Uuid;

use crate::types::IdOrPrefix;

/// Resolve a job ID or prefix to a full UUID
///
/// A full UUID is returned as is, without asking the orchestrator.
///
/// # Errors
/// Returns an error if no job or more than one job matches the prefix, or
/// if listing the history fails.
pub async fn resolve_job_id(client: &ReelsmithClient, id_or_prefix: &IdOrPrefix) -> Result<Uuid> {
    if let IdOrPrefix::Full(uuid) = id_or_prefix {
        return Ok(*uuid);
    }

    let mut ids = Vec::new();
    let mut page = 1;

    loop {
        let query = HistoryQuery {
            limit: Some(MAX_PAGE_SIZE),
            page: Some(page),
        };
        let history = client
            .list_history(&query)
            .await
            .context("Failed to fetch history for ID resolution")?;

        let fetched = history.history.len();
        ids.extend(history.history.iter().map(|job| job.id));

        if fetched == 0 || ids.len() as i64 >= history.total {
            break;
        }
        page += 1;
    }

    pick_match(id_or_prefix, &ids)
}

fn pick_match(id_or_prefix: &IdOrPrefix, ids: &[Uuid]) -> Result<Uuid> {
    let matches: Vec<&Uuid> = ids.iter().filter(|id| id_or_prefix.matches(id)).collect();

    match matches.as_slice() {
        [] => Err(anyhow!("No job found with ID starting with '{}'", id_or_prefix)),
        [id] => Ok(**id),
        _ => {
            let ids: Vec<String> = matches.iter().map(|id| id.to_string()).collect();
            Err(anyhow!(
                "Ambiguous prefix '{}' matches multiple jobs: {}",
                id_or_prefix,
                ids.join(", ")
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> Vec<Uuid> {
        [
            "3fa85f64-5717-4562-b3fc-2c963f66afa6",
            "3fb1c2d3-0000-4000-8000-000000000000",
            "9c0e1d2f-1111-4111-8111-111111111111",
        ]
        .iter()
        .map(|s| Uuid::parse_str(s).unwrap())
        .collect()
    }

    #[test]
    fn test_unique_prefix_resolves() {
        let prefix = IdOrPrefix::parse("9c").unwrap();
        assert_eq!(pick_match(&prefix, &ids()).unwrap(), ids()[2]);
    }

    #[test]
    fn test_ambiguous_prefix_lists_candidates() {
        let prefix = IdOrPrefix::parse("3f").unwrap();
        let err = pick_match(&prefix, &ids()).unwrap_err().to_string();
        assert!(err.contains("Ambiguous prefix '3f'"));
        assert!(err.contains("3fa85f64"));
    }

    #[test]
    fn test_unknown_prefix() {
        let prefix = IdOrPrefix::parse("ab").unwrap();
        assert!(pick_match(&prefix, &ids()).is_err());
    }
}
