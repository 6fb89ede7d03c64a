//! Domain crate for the Sanctum spiritual services platform.
//!
//! The business logic lives under [`workflows`], leaves first: the profile
//! store, the priest application workflow and its listing provisioner, the
//! booking store, and the admin user directory. Each workflow exposes its
//! domain types, a storage trait abstracting the backing record store, a
//! service facade, and an axum router so the API service only wires
//! infrastructure.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
