//! Authenticated sign-up: data types, the handshake status machine, and the
//! flow that drives it.

mod flow;
pub mod form;

pub use self::flow::SignUpFlow;
pub use self::form::{FormError, SignUpForm};

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role assigned to every self-service sign-up.
pub const DEFAULT_ROLE: &str = "STAFF";

/// Sign-up input as submitted by the form layer.
#[derive(Debug, Clone)]
pub struct SignUpRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: SecretString,
}

/// Payload of the `CreateUser` mutation.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileInput {
    pub first_name: String,
    pub last_name: String,
    pub role: String,
}

impl From<&SignUpRequest> for UserProfileInput {
    fn from(request: &SignUpRequest) -> Self {
        Self {
            first_name: request.first_name.clone(),
            last_name: request.last_name.clone(),
            role: DEFAULT_ROLE.to_string(),
        }
    }
}

/// User record returned by the backend after sign-up.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreatedUser {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub firebase_id: String,
    pub role: String,
}

/// Which step of the handshake failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignUpPhase {
    IdentityProvider,
    TokenFetch,
    BackendMutation,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignUpError {
    #[error("{0}")]
    IdentityProvider(String),
    #[error("{0}")]
    TokenFetch(String),
    #[error("{0}")]
    BackendMutation(String),
    #[error("a sign-up is already in progress")]
    AlreadyInProgress,
}

impl SignUpError {
    /// Failed step, `None` for a rejected duplicate submission.
    #[must_use]
    pub fn phase(&self) -> Option<SignUpPhase> {
        match self {
            Self::IdentityProvider(_) => Some(SignUpPhase::IdentityProvider),
            Self::TokenFetch(_) => Some(SignUpPhase::TokenFetch),
            Self::BackendMutation(_) => Some(SignUpPhase::BackendMutation),
            Self::AlreadyInProgress => None,
        }
    }
}

/// Network call currently pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignUpStep {
    CreatingCredential,
    FetchingToken,
    CreatingProfile,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HandshakeStatus {
    #[default]
    Idle,
    InProgress(SignUpStep),
    Succeeded(CreatedUser),
    Failed(SignUpError),
}

#[derive(Debug, Clone)]
pub enum HandshakeEvent {
    Submitted,
    CredentialCreated,
    TokenReceived,
    ProfileCreated(CreatedUser),
    StepFailed(SignUpError),
}

impl HandshakeStatus {
    /// Next status for `event`, or `None` when the event is not valid here.
    ///
    /// The machine is linear: only a new submission leaves a terminal state, and
    /// a submission while in progress is refused.
    #[must_use]
    pub fn transition(&self, event: HandshakeEvent) -> Option<Self> {
        use HandshakeEvent as E;
        use SignUpStep as S;

        match (self, event) {
            (Self::Idle | Self::Succeeded(_) | Self::Failed(_), E::Submitted) => {
                Some(Self::InProgress(S::CreatingCredential))
            }
            (Self::InProgress(S::CreatingCredential), E::CredentialCreated) => {
                Some(Self::InProgress(S::FetchingToken))
            }
            (Self::InProgress(S::FetchingToken), E::TokenReceived) => {
                Some(Self::InProgress(S::CreatingProfile))
            }
            (Self::InProgress(S::CreatingProfile), E::ProfileCreated(user)) => {
                Some(Self::Succeeded(user))
            }
            (Self::InProgress(_), E::StepFailed(err)) => Some(Self::Failed(err)),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_in_progress(&self) -> bool {
        matches!(self, Self::InProgress(_))
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded(_) | Self::Failed(_))
    }

    /// Status line for the front-end.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Idle => String::new(),
            Self::InProgress(SignUpStep::CreatingCredential) => "Creating user...".to_string(),
            Self::InProgress(SignUpStep::FetchingToken) => {
                "Identity provider user created. Getting ID token...".to_string()
            }
            Self::InProgress(SignUpStep::CreatingProfile) => {
                "ID token received. Creating user profile in our database...".to_string()
            }
            Self::Succeeded(user) => format!(
                "Success! User profile created in database. User ID: {}",
                user.id
            ),
            Self::Failed(err) => format!("Error: {err}"),
        }
    }
}
