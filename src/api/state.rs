// src/api/state.rs

//! # Application State
//!
//! Defines the shared state that will be accessible by all route handlers.

use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    config::AppConfig,
    services::{
        knowledge_store::{KnowledgeError, KnowledgeStore},
        reply_templates::TemplateCatalog,
        responder::Responder,
        token_service::TokenService,
        user_store::UserStore,
    },
};

/// The core application state. Cloned per request; every field is shared.
#[derive(Clone)]
pub struct AppState {
    /// Loaded once at startup and never mutated.
    pub knowledge: Arc<KnowledgeStore>,
    pub responder: Arc<Responder>,
    pub users: UserStore,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    /// Creates a new instance of the application state.
    pub fn new(
        knowledge: KnowledgeStore,
        responder: Responder,
        users: UserStore,
        tokens: TokenService,
    ) -> Self {
        AppState {
            knowledge: Arc::new(knowledge),
            responder: Arc::new(responder),
            users,
            tokens: Arc::new(tokens),
        }
    }

    /// Builds the state described by `config`. A missing or corrupt knowledge
    /// file is returned as an error so startup stops before binding.
    pub async fn from_config(config: &AppConfig) -> Result<Self, KnowledgeError> {
        let knowledge = KnowledgeStore::load(&config.knowledge_path).await?;
        if knowledge.is_empty() {
            warn!("Knowledge store has no conditions; every chat will get the fallback reply");
        }

        let templates = TemplateCatalog::with_overrides(config.templates.clone());
        info!(languages = ?templates.languages(), "Reply templates ready");

        Ok(AppState::new(
            knowledge,
            Responder::new(templates),
            UserStore::new(),
            TokenService::new(&config.auth),
        ))
    }
}
