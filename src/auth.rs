//! Auth collaborator. The core never inspects token format; it hands the
//! bearer token to this trait and gets back an account id and role.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use crate::models::Role;

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Identity {
    pub account_id: Uuid,
    pub role: Role,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid or expired token")]
    InvalidToken,
    #[error("auth service unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn identity(&self, token: &str) -> Result<Identity, AuthError>;
}

/// Static token table standing in for the external auth service. Tokens
/// are opaque strings mapped straight to identities.
#[derive(Default)]
pub struct StaticTokenAuth {
    tokens: HashMap<String, Identity>,
}

impl StaticTokenAuth {
    pub fn new() -> Self {
        Self::default()
    }

    /// JSON file of `token -> {account_id, role}` entries.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let tokens: HashMap<String, Identity> = serde_json::from_str(&raw)?;
        Ok(Self { tokens })
    }

    pub fn insert(&mut self, token: impl Into<String>, identity: Identity) {
        self.tokens.insert(token.into(), identity);
    }
}

#[async_trait]
impl AuthProvider for StaticTokenAuth {
    async fn identity(&self, token: &str) -> Result<Identity, AuthError> {
        self.tokens
            .get(token)
            .copied()
            .ok_or(AuthError::InvalidToken)
    }
}
