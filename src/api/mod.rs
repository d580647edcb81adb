// src/api/mod.rs

//! # API Handlers
//!
//! Request handlers grouped by concern, plus the shared application state.

pub mod auth;
pub mod chat;
pub mod state;
pub mod system;
