//! Repository Module
//!
//! Data access layer for the orchestrator.
//! The status ledger lives in Postgres; the generation provider and object
//! storage are remote HTTP services. Everything the pipeline touches sits
//! behind a trait so it can be replaced in tests.

pub mod job;
mod ledger;
mod provider;
mod storage;

// Re-export for convenience
pub use job as job_repository;

// Re-export traits
pub use ledger::JobLedger;
pub use provider::{GenerationProvider, PromptCompleter};
pub use storage::ObjectStorage;

// Re-export implementations
pub use ledger::PgJobLedger;
pub use provider::HttpVideoProvider;
pub use storage::RestObjectStorage;

// Re-export request/response types
pub use provider::{ChatMessage, ChatRequest, CreatedVideo, ProviderError, VideoRequest};
