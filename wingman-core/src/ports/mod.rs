//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. The core domain
//! depends only on these traits, not on concrete implementations.

mod generative;
mod store;

pub use generative::{GenerativeModel, InlineData};
pub use store::{KeyValueStore, KeyValueStoreExt};
