use super::{
    CreatedUser, HandshakeEvent, HandshakeStatus, SignUpError, SignUpRequest, UserProfileInput,
};
use crate::{
    graphql::{mutations::CREATE_USER_MUTATION, GraphQLClientHandle, GraphQLError},
    identity::{AuthCredential, IdentityProvider},
};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::watch;
use tracing::{debug, error, info, instrument, warn};

#[derive(Deserialize)]
struct CreateUserData {
    #[serde(rename = "createUser")]
    create_user: CreatedUser,
}

/// Sign-up state object: runs the handshake and publishes its status.
///
/// Front-ends read [`SignUpFlow::status`] or [`SignUpFlow::subscribe`] to the
/// watch channel, and disable their submit action while
/// [`SignUpFlow::is_submit_enabled`] is false.
pub struct SignUpFlow<P> {
    provider: P,
    client: GraphQLClientHandle,
    status: watch::Sender<HandshakeStatus>,
}

impl<P: IdentityProvider> SignUpFlow<P> {
    #[must_use]
    pub fn new(provider: P, client: GraphQLClientHandle) -> Self {
        let (status, _) = watch::channel(HandshakeStatus::Idle);
        Self {
            provider,
            client,
            status,
        }
    }

    #[must_use]
    pub fn status(&self) -> HandshakeStatus {
        self.status.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<HandshakeStatus> {
        self.status.subscribe()
    }

    #[must_use]
    pub fn is_submit_enabled(&self) -> bool {
        !self.status.borrow().is_in_progress()
    }

    /// Run the sign-up handshake: create the identity account, fetch its ID
    /// token, then create the backend profile with that token.
    ///
    /// Steps run strictly in order and stop at the first failure. Nothing is
    /// retried or rolled back; an identity account whose profile mutation fails
    /// is left in place.
    ///
    /// # Errors
    /// Returns [`SignUpError::AlreadyInProgress`] if another handshake is
    /// running, otherwise the error of the step that failed.
    #[instrument(skip_all)]
    pub async fn sign_up(&self, request: SignUpRequest) -> Result<CreatedUser, SignUpError> {
        if !self.apply(HandshakeEvent::Submitted) {
            warn!("sign-up submitted while another one is in progress");
            return Err(SignUpError::AlreadyInProgress);
        }

        match self.handshake(request).await {
            Ok(user) => {
                info!("user profile created: {}", user.id);
                self.advance(HandshakeEvent::ProfileCreated(user.clone()));
                Ok(user)
            }
            Err(err) => {
                error!("sign-up failed: {err}");
                self.advance(HandshakeEvent::StepFailed(err.clone()));
                Err(err)
            }
        }
    }

    async fn handshake(&self, request: SignUpRequest) -> Result<CreatedUser, SignUpError> {
        let mut credential = self
            .provider
            .create_user_with_password(&request.email, &request.password)
            .await
            .map_err(|err| SignUpError::IdentityProvider(err.to_string()))?;

        debug!("identity account created: {}", credential.uid());
        self.advance(HandshakeEvent::CredentialCreated);

        let token = credential
            .id_token()
            .await
            .map_err(|err| SignUpError::TokenFetch(err.to_string()))?;

        self.advance(HandshakeEvent::TokenReceived);

        let variables = json!({ "input": UserProfileInput::from(&request) });

        let data: CreateUserData = self
            .client
            .mutate(CREATE_USER_MUTATION, Some(variables), Some(&token))
            .await
            .map_err(|err| SignUpError::BackendMutation(backend_message(&err)))?;

        Ok(data.create_user)
    }

    fn apply(&self, event: HandshakeEvent) -> bool {
        self.status
            .send_if_modified(|status| match status.transition(event) {
                Some(next) => {
                    *status = next;
                    true
                }
                None => false,
            })
    }

    fn advance(&self, event: HandshakeEvent) {
        if !self.apply(event) {
            warn!("ignored out-of-order handshake event");
        }
    }
}

/// First structured GraphQL error, otherwise the transport/HTTP error text.
fn backend_message(err: &GraphQLError) -> String {
    err.first_message()
        .map_or_else(|| err.to_string(), str::to_string)
}
