//! Concrete collaborator implementations.

pub mod in_memory;
