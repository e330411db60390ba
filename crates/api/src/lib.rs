//! Vigil Pipeline Orchestrator (C5)
//!
//! Wires every other crate together behind one composition root
//! ([`context::AppContext`]) and implements the nine-step `process` contract
//! as [`orchestrator::Orchestrator`]. The typed request/response DTOs and the
//! boundary error type stand in for the HTTP surface described in the spec's
//! external-interfaces section; [`commands`] exposes the same operations as
//! thin functions for the `vigil` CLI binary.

pub mod commands;
pub mod context;
pub mod dto;
pub mod error;
pub mod orchestrator;

pub use context::AppContext;
pub use error::ApiError;
pub use orchestrator::Orchestrator;
