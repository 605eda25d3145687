//! Application layer: the readiness engine and its collaborators.
//!
//! [`engine::ReadinessEngine`] orchestrates the remote synchronizations and
//! publishes states computed by the pure [`resolver`].

pub mod cache;
pub mod engine;
pub mod resolver;
pub mod selection;
pub mod skip_flags;
