//! Integration tests for wingman-core services
//!
//! These tests run the services against a real DuckDB file. The generative
//! model is scripted at the trait level; no network calls are made.
//!
//! Run with: cargo test --test integration_tests -- --nocapture

use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use wingman_core::adapters::duckdb::DuckDbStore;
use wingman_core::config::Config;
use wingman_core::domain::auth::UserRegistry;
use wingman_core::domain::namespace::{CURRENT_USER_KEY, REGISTRY_KEY};
use wingman_core::domain::planned_date::parse_date_time;
use wingman_core::domain::result::Result as CoreResult;
use wingman_core::ports::{GenerativeModel, InlineData, KeyValueStore, KeyValueStoreExt};
use wingman_core::services::{AccountService, AssistantService, PlannerService};
use wingman_core::{
    EntityKind, Error, Message, ProfileDraft, Sender, Session, StorageKey, UserAccount,
    WingmanContext,
};

// ============================================================================
// Test Helpers
// ============================================================================

/// Open a store in the temp dir with schema initialized
fn create_test_store(temp_dir: &TempDir) -> Arc<DuckDbStore> {
    let store = DuckDbStore::new(&temp_dir.path().join("wingman.duckdb"))
        .expect("Failed to open store");
    store.ensure_schema().expect("Failed to initialize schema");
    Arc::new(store)
}

fn create_test_context(temp_dir: &TempDir) -> WingmanContext {
    WingmanContext::new(temp_dir.path()).expect("Failed to open context")
}

/// Model that replays queued answers in order
#[derive(Default)]
struct ScriptedModel {
    texts: Mutex<Vec<String>>,
    json: Mutex<Vec<serde_json::Value>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    fn with_text(self, text: &str) -> Self {
        self.texts.lock().unwrap().push(text.to_string());
        self
    }

    fn with_json(self, value: serde_json::Value) -> Self {
        self.json.lock().unwrap().push(value);
        self
    }
}

impl GenerativeModel for ScriptedModel {
    fn name(&self) -> &str {
        "scripted"
    }

    fn generate_text(&self, prompt: &str) -> CoreResult<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let mut texts = self.texts.lock().unwrap();
        if texts.is_empty() {
            return Err(Error::generation("script exhausted"));
        }
        Ok(texts.remove(0))
    }

    fn generate_json(
        &self,
        prompt: &str,
        _schema: &serde_json::Value,
    ) -> CoreResult<serde_json::Value> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let mut json = self.json.lock().unwrap();
        if json.is_empty() {
            return Err(Error::generation("script exhausted"));
        }
        Ok(json.remove(0))
    }

    fn generate_image(&self, _prompt: &str) -> CoreResult<InlineData> {
        Err(Error::generation("no images in this script"))
    }

    fn generate_speech(&self, _text: &str) -> CoreResult<InlineData> {
        Err(Error::generation("no speech in this script"))
    }
}

// ============================================================================
// Account Registry Tests
// ============================================================================

/// Register, log out, log in again, then the two failure modes
#[test]
fn test_alice_scenario() {
    let temp_dir = TempDir::new().unwrap();
    let store = create_test_store(&temp_dir);
    let accounts = AccountService::new(store.clone());

    let session = accounts.register("Alice", "secret1").unwrap();
    assert_eq!(session, Session::new_user("alice"));

    accounts.logout(&session).unwrap();
    assert!(accounts.current_session().unwrap().is_none());

    let session = accounts.login("alice", "secret1").unwrap();
    assert_eq!(session, Session::returning("alice"));

    assert!(matches!(
        accounts.login("alice", "wrong"),
        Err(Error::InvalidCredentials)
    ));
    assert!(matches!(
        accounts.login("bob", "secret1"),
        Err(Error::UserNotFound(_))
    ));
}

/// The session pointer and registry survive closing and reopening the store
#[test]
fn test_session_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    {
        let store = create_test_store(&temp_dir);
        AccountService::new(store).register(" Carol ", "pw").unwrap();
    }

    let store = create_test_store(&temp_dir);
    let accounts = AccountService::new(store.clone());
    assert_eq!(
        accounts.current_session().unwrap(),
        Some(Session::returning("carol"))
    );
    assert_eq!(store.get(CURRENT_USER_KEY).unwrap(), Some("\"carol\"".to_string()));
}

/// Stored registry JSON matches the documented shape
#[test]
fn test_registry_layout() {
    let temp_dir = TempDir::new().unwrap();
    let store = create_test_store(&temp_dir);
    AccountService::new(store.clone()).register("dave", "pw").unwrap();

    let raw: serde_json::Value = store.load_json(REGISTRY_KEY).unwrap().unwrap();
    let record = &raw["dave"];
    assert_eq!(record["salt"].as_str().unwrap().len(), 32);
    assert_eq!(record["passwordHash"].as_str().unwrap().len(), 64);

    let registry: UserRegistry = store.load_json(REGISTRY_KEY).unwrap().unwrap();
    assert!(registry.get("dave").unwrap().verify("pw"));
}

/// Deleting an account wipes its records and frees the username
#[test]
fn test_delete_then_reregister() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = create_test_context(&temp_dir);

    let session = ctx.account_service.register("erin", "first").unwrap();
    ctx.profile_service
        .add(Some(&session), ProfileDraft::named("Sam"))
        .unwrap();
    let mut account = UserAccount::default_for("erin");
    account.zip_code = "94110".to_string();
    ctx.settings_service.save(&session, &account).unwrap();

    ctx.account_service.delete_account(&session).unwrap();
    for kind in EntityKind::ALL {
        let key = StorageKey::for_user("erin", kind);
        assert_eq!(ctx.store.get(key.as_str()).unwrap(), None, "{} not removed", key);
    }
    assert!(ctx.session().unwrap().is_none());

    let session = ctx.account_service.register("ERIN", "second").unwrap();
    assert!(ctx.profile_service.list(Some(&session)).unwrap().is_empty());
    assert!(matches!(
        ctx.account_service.login("erin", "first"),
        Err(Error::InvalidCredentials)
    ));
}

/// Two users never see each other's records
#[test]
fn test_users_are_isolated() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = create_test_context(&temp_dir);

    let alice = ctx.account_service.register("alice", "a").unwrap();
    ctx.profile_service
        .add(Some(&alice), ProfileDraft::named("Sam"))
        .unwrap();

    let bob = ctx.account_service.register("bob", "b").unwrap();
    assert!(ctx.profile_service.list(Some(&bob)).unwrap().is_empty());
    assert_eq!(ctx.profile_service.list(Some(&alice)).unwrap().len(), 1);

    // The pointer follows the most recent sign-in
    assert_eq!(ctx.session().unwrap(), Some(Session::returning("bob")));
}

// ============================================================================
// Tutorial Gate Tests
// ============================================================================

#[test]
fn test_tutorial_lifecycle() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = create_test_context(&temp_dir);

    let session = ctx.account_service.register("fay", "pw").unwrap();
    assert!(ctx.tutorial_service.should_show(&session).unwrap());

    ctx.tutorial_service.complete(&session).unwrap();
    ctx.account_service.logout(&session).unwrap();
    let session = ctx.account_service.login("fay", "pw").unwrap();
    assert!(!ctx.tutorial_service.should_show(&session).unwrap());

    ctx.tutorial_service.replay(&session).unwrap();
    assert!(ctx.tutorial_service.should_show(&session).unwrap());
}

// ============================================================================
// Planner + Assistant Tests
// ============================================================================

/// Generated options can be saved straight onto the calendar
#[test]
fn test_plan_and_save_option() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = create_test_context(&temp_dir);
    let session = ctx.account_service.register("gus", "pw").unwrap();
    let sam = ctx
        .profile_service
        .add(Some(&session), ProfileDraft::named("Sam"))
        .unwrap();

    let model = ScriptedModel::default().with_json(serde_json::json!([
        {"title": "Ramen & arcade", "location": "Japantown", "description": "Noodles then games.", "reasoning": "Sam loves ramen."},
        {"title": "Botanical walk", "location": "Golden Gate Park", "description": "Slow stroll.", "reasoning": "Quiet evening."}
    ]));
    let assistant = AssistantService::new(Arc::new(model));

    let options = assistant
        .plan_dates("94110", "2025-02-14T19:30", Some(&sam))
        .unwrap();
    assert_eq!(options.len(), 2);

    let when = parse_date_time("2025-02-14T19:30").unwrap();
    let draft = PlannerService::draft_from_option(&options[0], when, &sam.id);
    let saved = ctx.planner_service.add(Some(&session), draft).unwrap();
    assert_eq!(saved.person_id, sam.id);

    // Removing the profile leaves the date in place
    ctx.profile_service.remove(Some(&session), &sam.id).unwrap();
    let upcoming = ctx
        .planner_service
        .upcoming(Some(&session), parse_date_time("2025-01-01T00:00").unwrap())
        .unwrap();
    assert_eq!(upcoming.len(), 1);
    assert!(upcoming[0].notes.ends_with("Why: Sam loves ramen."));
}

#[test]
fn test_reply_and_generic_failure() {
    let model =
        Arc::new(ScriptedModel::default().with_text("Try: \"Lisbon! Best pastel de nata?\""));
    let assistant = AssistantService::new(model.clone());

    let messages = vec![
        Message::new(1, Sender::Them, "Just got back from Lisbon"),
        Message::new(2, Sender::Me, "No way!"),
    ];
    let reply = assistant.suggest_reply(&messages).unwrap();
    assert!(reply.contains("pastel de nata"));
    assert!(model.prompts.lock().unwrap()[0]
        .contains("Them: Just got back from Lisbon\nMe: No way!"));

    // Script is exhausted now
    let err = assistant.suggest_reply(&messages).unwrap_err();
    assert_eq!(err.to_string(), "Failed to get reply suggestion from AI.");
}

// ============================================================================
// Context + Config Tests
// ============================================================================

#[test]
fn test_context_requires_api_key_for_assistant() {
    let temp_dir = TempDir::new().unwrap();
    let store = create_test_store(&temp_dir);
    let ctx = WingmanContext::with_store(Config::default(), store);

    assert!(matches!(ctx.assistant(), Err(Error::Config(_))));
}

#[test]
fn test_context_builds_assistant_with_key() {
    let temp_dir = TempDir::new().unwrap();
    let store = create_test_store(&temp_dir);
    let mut config = Config::default();
    config.api_key = Some("test-key".to_string());
    let ctx = WingmanContext::with_store(config, store);

    let assistant = ctx.assistant().unwrap();
    assert_eq!(assistant.model_name(), "gemini");
}
