//! Core domain types
//!
//! This module contains the core domain structures used across Reelsmith crates.
//! These types represent the fundamental business entities and are shared between
//! the orchestrator (for persistence and generation) and the client/CLI (for display).

pub mod job;
pub mod provider;
pub mod region;
pub mod render;
