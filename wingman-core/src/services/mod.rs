//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case or feature area.

mod account;
mod assistant;
pub mod audio;
pub mod logging;
pub mod migration;
mod planner;
pub mod profile;
pub mod prompts;
pub mod settings;
mod tutorial;

pub use account::AccountService;
pub use assistant::{AssistantService, GeneratedImage};
pub use audio::SpeechClip;
pub use logging::{EntryPoint, EventCount, LogEntry, LogEvent, LoggingService};
pub use migration::{MigrationResult, MigrationService};
pub use planner::PlannerService;
pub use profile::ProfileService;
pub use settings::SettingsService;
pub use tutorial::TutorialService;
