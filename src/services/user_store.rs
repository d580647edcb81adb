// src/services/user_store.rs

//! # User Store
//!
//! In-process registry of registered users. Passwords are stored as Argon2id
//! PHC strings; hashing and verification run on the blocking thread pool.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{DateTime, Utc};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum UserStoreError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("A user with username '{0}' already exists")]
    UsernameTaken(String),

    #[error("No active account found with the given credentials")]
    InvalidCredentials,

    #[error("password hashing failed: {0}")]
    Hashing(String),
}

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub city: String,
    pub password_hash: String,
    pub date_joined: DateTime<Utc>,
}

/// Registration input, before validation.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub email: String,
    pub city: String,
}

#[derive(Debug, Default)]
struct Users {
    by_id: HashMap<Uuid, UserRecord>,
    by_username: HashMap<String, Uuid>,
}

/// Thread-safe user registry shared by all handlers.
#[derive(Debug, Clone, Default)]
pub struct UserStore {
    users: Arc<RwLock<Users>>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and stores a new user.
    #[instrument(skip_all, fields(username = %new_user.username.trim()))]
    pub async fn register(&self, new_user: NewUser) -> Result<UserRecord, UserStoreError> {
        let username = new_user.username.trim().to_string();
        let email = new_user.email.trim().to_lowercase();
        let city = new_user.city.trim().to_string();

        if username.is_empty() {
            return Err(UserStoreError::InvalidInput("Username is required".to_string()));
        }
        if new_user.password.is_empty() {
            return Err(UserStoreError::InvalidInput("Password is required".to_string()));
        }
        if !email.is_empty() && !looks_like_email(&email) {
            return Err(UserStoreError::InvalidInput("Enter a valid email address".to_string()));
        }

        // Fail before paying for the hash when the name is obviously taken.
        if self.users.read().await.by_username.contains_key(&username) {
            return Err(UserStoreError::UsernameTaken(username));
        }

        let password_hash = hash_password(new_user.password).await?;

        let record = UserRecord {
            id: Uuid::new_v4(),
            username: username.clone(),
            email,
            city,
            password_hash,
            date_joined: Utc::now(),
        };

        let mut users = self.users.write().await;
        if users.by_username.contains_key(&username) {
            warn!("Username claimed concurrently during registration");
            return Err(UserStoreError::UsernameTaken(username));
        }
        users.by_username.insert(username, record.id);
        users.by_id.insert(record.id, record.clone());

        info!(user_id = %record.id, "User registered");
        Ok(record)
    }

    /// Checks a username/password pair.
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<UserRecord, UserStoreError> {
        let record = {
            let users = self.users.read().await;
            users
                .by_username
                .get(username.trim())
                .and_then(|id| users.by_id.get(id))
                .cloned()
        };

        let Some(record) = record else {
            return Err(UserStoreError::InvalidCredentials);
        };

        if verify_password(password.to_string(), record.password_hash.clone()).await? {
            Ok(record)
        } else {
            Err(UserStoreError::InvalidCredentials)
        }
    }

    pub async fn get(&self, id: Uuid) -> Option<UserRecord> {
        self.users.read().await.by_id.get(&id).cloned()
    }
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    }
}

async fn hash_password(password: String) -> Result<String, UserStoreError> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| UserStoreError::Hashing(e.to_string()))
    })
    .await
    .map_err(|e| UserStoreError::Hashing(e.to_string()))?
}

async fn verify_password(password: String, stored_hash: String) -> Result<bool, UserStoreError> {
    tokio::task::spawn_blocking(move || {
        let parsed = PasswordHash::new(&stored_hash).map_err(|e| UserStoreError::Hashing(e.to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    })
    .await
    .map_err(|e| UserStoreError::Hashing(e.to_string()))?
}
