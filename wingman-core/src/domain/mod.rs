//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation logic - no storage or network access.

mod account;
pub mod auth;
mod conversation;
pub mod namespace;
pub mod planned_date;
mod profile;
pub mod result;

pub use account::UserAccount;
pub use auth::{Session, UserAuthRecord, UserRegistry};
pub use conversation::{DateOption, DatingAdviceResponse, Message, OutfitSuggestion, Sender};
pub use namespace::{namespace_for, EntityKind, StorageKey};
pub use planned_date::{DateDraft, PlannedDate};
pub use profile::{PersonProfile, ProfileDraft};
