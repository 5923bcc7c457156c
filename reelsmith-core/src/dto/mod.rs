//! Data Transfer Objects
//!
//! This module contains DTOs used on the orchestrator HTTP API and between the
//! pipeline and the status ledger. DTOs are lightweight representations of
//! domain entities optimized for transfer.

pub mod generation;
pub mod history;
pub mod job;
pub mod lenient;
pub mod prompt;
