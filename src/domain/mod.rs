//! Pure domain types and the ports to the external collaborators.

pub mod account;
pub mod country;
pub mod plugin;
pub mod ports;
pub mod readiness;
