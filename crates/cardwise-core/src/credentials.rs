//! Linked-account credentials
//!
//! An access credential is an opaque provider token. Tokens never appear in
//! logs or `Debug` output; use [`AccessToken::fingerprint`] instead.

use std::sync::RwLock;

use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

/// Opaque provider access token
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Short SHA-256 fingerprint, safe to log
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.0.as_bytes());
        let digest = hex::encode(hasher.finalize());
        digest[..12].to_string()
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AccessToken({})", self.fingerprint())
    }
}

/// Source of the credentials to analyze
pub trait CredentialStore: Send + Sync {
    /// Snapshot of all stored credentials, in insertion order
    fn credentials(&self) -> Result<Vec<AccessToken>>;

    fn add(&self, token: AccessToken) -> Result<()>;
}

/// Append-only in-memory store
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    tokens: RwLock<Vec<AccessToken>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(tokens: impl IntoIterator<Item = AccessToken>) -> Self {
        Self {
            tokens: RwLock::new(tokens.into_iter().collect()),
        }
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn credentials(&self) -> Result<Vec<AccessToken>> {
        let tokens = self
            .tokens
            .read()
            .map_err(|_| Error::InvalidData("Failed to acquire credential store lock".into()))?;
        Ok(tokens.clone())
    }

    fn add(&self, token: AccessToken) -> Result<()> {
        let mut tokens = self
            .tokens
            .write()
            .map_err(|_| Error::InvalidData("Failed to acquire credential store lock".into()))?;
        // Re-linking the same item is a no-op
        if !tokens.contains(&token) {
            tracing::info!(credential = %token.fingerprint(), "Stored new credential");
            tokens.push(token);
        }
        Ok(())
    }
}
