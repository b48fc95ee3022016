//! Shared types for the dayplan backend: domain entities, the identity model
//! and the JSON bodies exchanged over the REST API.

pub mod api;
pub mod models;

pub use models::{Identity, OwnedResource, UserId};
