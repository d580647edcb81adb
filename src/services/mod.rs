// src/services/mod.rs

//! # Services Module
//!
//! Business logic behind the handlers: the knowledge base and its responder,
//! plus user accounts and token issuance.

// Condition knowledge base, loaded once at startup
pub mod knowledge_store;
pub mod reply_templates;
pub mod responder;
pub mod token_service;
pub mod user_store;
