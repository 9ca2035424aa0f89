//! Application state wiring the orchestrator, blob store, and locks.
//!
//! `AppState` pins the generic orchestrator to the concrete OpenAI-
//! compatible backend and holds everything the HTTP handlers and CLI
//! commands share.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use dashmap::DashMap;
use secrecy::ExposeSecret;
use tokio::sync::Mutex;
use uuid::Uuid;

use reflecto_core::chat::ChatOrchestrator;
use reflecto_infra::config::{api_key_from_env, load_config, resolve_data_dir};
use reflecto_infra::llm::OpenAiCompatibleClient;
use reflecto_infra::storage::SessionBlobStore;
use reflecto_types::config::AppConfig;

/// Concrete orchestrator type pinned to the OpenAI-compatible backend.
pub type ConcreteOrchestrator = ChatOrchestrator<OpenAiCompatibleClient>;

/// Shared application state for CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<ConcreteOrchestrator>,
    pub blobs: SessionBlobStore,
    pub config: Arc<AppConfig>,
    pub data_dir: PathBuf,
    /// Per-session locks: a store is exclusively owned by one in-flight
    /// respond at a time, so concurrent requests for the same session
    /// queue here.
    session_locks: Arc<DashMap<Uuid, Arc<Mutex<()>>>>,
}

impl AppState {
    /// Initialize the application state: load config, wire the backend.
    ///
    /// Fails when no API key is configured -- the proxy cannot operate
    /// without one.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_config(&data_dir).await;

        let api_key = api_key_from_env()
            .context("OPENAI_API_KEY is required. Set it in the environment.")?;
        let client = OpenAiCompatibleClient::openai(api_key.expose_secret());
        let orchestrator = ChatOrchestrator::new(client, config.model.clone());

        Ok(Self {
            orchestrator: Arc::new(orchestrator),
            blobs: SessionBlobStore::new(&data_dir),
            config: Arc::new(config),
            data_dir,
            session_locks: Arc::new(DashMap::new()),
        })
    }

    /// The lock guarding a session's load-respond-save cycle.
    pub fn session_lock(&self, id: Uuid) -> Arc<Mutex<()>> {
        self.session_locks
            .entry(id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drop the lock entry for a deleted session.
    pub fn forget_session(&self, id: &Uuid) {
        self.session_locks.remove(id);
    }
}
