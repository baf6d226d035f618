//! Identity provider seam used by the sign-up handshake. The provider creates
//! an account from email and password and returns an opaque credential; the
//! credential yields a short-lived bearer token for the backend.
//!
//! Nothing here persists credentials or tokens.

pub mod firebase;

pub use self::firebase::{FirebaseAuth, FirebaseConfig, FirebaseCredential};

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use thiserror::Error;

/// Short-lived token proving identity to the backend.
#[derive(Clone)]
pub struct BearerToken(SecretString);

impl BearerToken {
    #[must_use]
    pub fn new(token: SecretString) -> Self {
        Self(token)
    }

    #[must_use]
    pub fn secret(&self) -> &SecretString {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.expose_secret().is_empty()
    }
}

impl From<&str> for BearerToken {
    fn from(token: &str) -> Self {
        Self(SecretString::from(token))
    }
}

impl From<String> for BearerToken {
    fn from(token: String) -> Self {
        Self(SecretString::from(token))
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(***)")
    }
}

#[derive(Debug, Error)]
pub enum IdentityError {
    /// The provider answered and refused the operation.
    #[error("{message} ({code})")]
    Rejected { code: String, message: String },
    /// Non-success answer without a provider error code.
    #[error("identity provider returned {0}")]
    Status(u16),
    #[error("network error: {0}")]
    Transport(reqwest::Error),
    #[error("invalid identity provider response: {0}")]
    InvalidResponse(String),
}

// Request URLs carry the API key as a query parameter.
impl From<reqwest::Error> for IdentityError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.without_url())
    }
}

/// Opaque handle returned by [`IdentityProvider::create_user_with_password`].
#[async_trait]
pub trait AuthCredential: Send + Sync {
    /// Provider-side user id.
    fn uid(&self) -> &str;

    /// Current ID token, refreshed through the provider when it has expired.
    async fn id_token(&mut self) -> Result<BearerToken, IdentityError>;
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    type Credential: AuthCredential;

    async fn create_user_with_password(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<Self::Credential, IdentityError>;
}
