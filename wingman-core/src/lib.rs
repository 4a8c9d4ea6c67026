//! Wing Man Core - Business logic for a personal dating assistant
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core entities (accounts, sessions, profiles, planned dates)
//! - **ports**: Trait definitions for external dependencies (KeyValueStore, GenerativeModel)
//! - **services**: Business logic orchestration
//! - **adapters**: Concrete implementations (DuckDB, in-memory, Gemini)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod log_migrations;
pub mod migrations;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use adapters::duckdb::DuckDbStore;
use adapters::gemini::GeminiClient;
use config::Config;
use ports::KeyValueStore;
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::{Error, OperationResult};
pub use domain::{
    DateDraft, DateOption, DatingAdviceResponse, EntityKind, Message, PersonProfile, PlannedDate,
    ProfileDraft, Sender, Session, StorageKey, UserAccount,
};

/// Main context for Wing Man operations
///
/// Holds the store, the configuration and every store-backed service. The
/// assistant is created on demand because it needs an API key.
pub struct WingmanContext {
    pub config: Config,
    pub store: Arc<DuckDbStore>,
    pub account_service: AccountService,
    pub tutorial_service: TutorialService,
    pub profile_service: ProfileService,
    pub planner_service: PlannerService,
    pub settings_service: SettingsService,
}

impl WingmanContext {
    /// Open the Wing Man directory, creating the store on first use
    pub fn new(wingman_dir: &Path) -> Result<Self> {
        let config = Config::load(wingman_dir)?;

        let store = Arc::new(DuckDbStore::new(&wingman_dir.join("wingman.duckdb"))?);
        store.ensure_schema()?;

        Ok(Self::with_store(config, store))
    }

    /// Build the services around an already opened store
    pub fn with_store(config: Config, store: Arc<DuckDbStore>) -> Self {
        let kv: Arc<dyn KeyValueStore> = store.clone();

        Self {
            account_service: AccountService::new(Arc::clone(&kv)).with_delay(config.login_delay),
            tutorial_service: TutorialService::new(Arc::clone(&kv)),
            profile_service: ProfileService::new(Arc::clone(&kv)),
            planner_service: PlannerService::new(Arc::clone(&kv)),
            settings_service: SettingsService::new(kv),
            config,
            store,
        }
    }

    /// The session left by the last login, if any
    pub fn session(&self) -> domain::result::Result<Option<Session>> {
        self.account_service.current_session()
    }

    /// Assistant backed by the configured Gemini models
    pub fn assistant(&self) -> domain::result::Result<AssistantService> {
        let api_key = self.config.require_api_key()?;
        let client = GeminiClient::new(api_key, &self.config.base_url, self.config.models.clone())
            .map_err(|e| Error::Config(format!("{:#}", e)))?;
        Ok(AssistantService::new(Arc::new(client)))
    }
}
