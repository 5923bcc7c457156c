//! Service Module
//!
//! Business logic layer for the orchestrator.
//! Services orchestrate between repositories and contain domain logic.

pub mod history;
pub mod pipeline;
pub mod prompt;

// Re-export for convenience
pub use history as history_service;
pub use prompt as prompt_service;
