//! Reelsmith Core
//!
//! Core types and abstractions for the Reelsmith video generation service.
//!
//! This crate contains:
//! - Domain types: Core business entities (VideoJob, JobStatus, render parameters, etc.)
//! - DTOs: Data transfer objects for the HTTP API and the status ledger

pub mod domain;
pub mod dto;
