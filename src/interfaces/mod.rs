//! Adapters between external representations and the domain.

pub mod json;
