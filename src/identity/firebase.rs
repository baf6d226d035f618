//! Firebase Authentication over its REST API.
//!
//! Sign-up uses the Identity Toolkit `accounts:signUp` endpoint and token
//! refresh uses the Secure Token service, the same calls the Firebase SDKs
//! make. Setting `FIREBASE_AUTH_EMULATOR_HOST` points both at the local Auth
//! emulator.

use super::{AuthCredential, BearerToken, IdentityError, IdentityProvider};
use crate::APP_USER_AGENT;
use async_trait::async_trait;
use reqwest::{header::USER_AGENT, Client, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use tracing::{debug, instrument};

pub const DEFAULT_IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com";
pub const DEFAULT_SECURE_TOKEN_URL: &str = "https://securetoken.googleapis.com";
pub const ENV_AUTH_EMULATOR_HOST: &str = "FIREBASE_AUTH_EMULATOR_HOST";

/// Tokens this close to expiry are refreshed before use.
const TOKEN_EXPIRY_SKEW: Duration = Duration::from_secs(30);
/// Lifetime assumed when the provider omits `expiresIn`.
const DEFAULT_TOKEN_TTL_SECONDS: u64 = 3600;

/// Firebase project configuration, supplied at startup.
#[derive(Clone)]
pub struct FirebaseConfig {
    pub api_key: SecretString,
    pub auth_domain: Option<String>,
    pub project_id: Option<String>,
    pub identity_toolkit_url: String,
    pub secure_token_url: String,
}

impl FirebaseConfig {
    #[must_use]
    pub fn new(api_key: SecretString) -> Self {
        Self {
            api_key,
            auth_domain: None,
            project_id: None,
            identity_toolkit_url: DEFAULT_IDENTITY_TOOLKIT_URL.to_string(),
            secure_token_url: DEFAULT_SECURE_TOKEN_URL.to_string(),
        }
    }

    #[must_use]
    pub fn with_auth_domain(mut self, auth_domain: Option<String>) -> Self {
        self.auth_domain = auth_domain;
        self
    }

    #[must_use]
    pub fn with_project_id(mut self, project_id: Option<String>) -> Self {
        self.project_id = project_id;
        self
    }

    /// Route both services through the Auth emulator at `host` (`host:port`).
    #[must_use]
    pub fn with_emulator_host(mut self, host: &str) -> Self {
        let host = host.trim().trim_end_matches('/');
        let base = if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("http://{host}")
        };
        self.identity_toolkit_url = format!("{base}/identitytoolkit.googleapis.com");
        self.secure_token_url = format!("{base}/securetoken.googleapis.com");
        self
    }

    /// Apply `FIREBASE_AUTH_EMULATOR_HOST` when it is set.
    #[must_use]
    pub fn with_emulator_from_env(self) -> Self {
        match std::env::var(ENV_AUTH_EMULATOR_HOST) {
            Ok(host) if !host.trim().is_empty() => self.with_emulator_host(&host),
            _ => self,
        }
    }

    fn sign_up_url(&self) -> String {
        format!(
            "{}/v1/accounts:signUp",
            self.identity_toolkit_url.trim_end_matches('/')
        )
    }

    fn token_url(&self) -> String {
        format!("{}/v1/token", self.secure_token_url.trim_end_matches('/'))
    }
}

impl std::fmt::Debug for FirebaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirebaseConfig")
            .field("api_key", &"***")
            .field("auth_domain", &self.auth_domain)
            .field("project_id", &self.project_id)
            .field("identity_toolkit_url", &self.identity_toolkit_url)
            .field("secure_token_url", &self.secure_token_url)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct FirebaseAuth {
    http: Client,
    config: FirebaseConfig,
}

impl FirebaseAuth {
    #[must_use]
    pub fn new(config: FirebaseConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &FirebaseConfig {
        &self.config
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignUpResponse {
    id_token: String,
    refresh_token: String,
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    expires_in: Option<String>,
}

#[derive(Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<String>,
}

#[async_trait]
impl IdentityProvider for FirebaseAuth {
    type Credential = FirebaseCredential;

    #[instrument(skip_all)]
    async fn create_user_with_password(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<FirebaseCredential, IdentityError> {
        let payload = json!({
            "email": email,
            "password": password.expose_secret(),
            "returnSecureToken": true,
        });

        let response = self
            .http
            .post(self.config.sign_up_url())
            .query(&[("key", self.config.api_key.expose_secret())])
            .header(USER_AGENT, APP_USER_AGENT)
            .json(&payload)
            .send()
            .await?;

        let body: SignUpResponse = parse_response(response).await?;

        debug!("identity provider user created: {}", body.local_id);

        Ok(FirebaseCredential {
            http: self.http.clone(),
            config: self.config.clone(),
            uid: body.local_id,
            email: body.email.unwrap_or_else(|| email.to_string()),
            id_token: SecretString::from(body.id_token),
            refresh_token: SecretString::from(body.refresh_token),
            expires_at: expiry_from(body.expires_in.as_deref()),
        })
    }
}

/// Credential of a freshly created Firebase user.
pub struct FirebaseCredential {
    http: Client,
    config: FirebaseConfig,
    uid: String,
    email: String,
    id_token: SecretString,
    refresh_token: SecretString,
    expires_at: Instant,
}

impl FirebaseCredential {
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    fn is_fresh(&self) -> bool {
        Instant::now() + TOKEN_EXPIRY_SKEW < self.expires_at
    }

    #[instrument(skip_all, fields(uid = %self.uid))]
    async fn refresh(&mut self) -> Result<(), IdentityError> {
        let response = self
            .http
            .post(self.config.token_url())
            .query(&[("key", self.config.api_key.expose_secret())])
            .header(USER_AGENT, APP_USER_AGENT)
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", self.refresh_token.expose_secret()),
            ])
            .send()
            .await?;

        let body: RefreshResponse = parse_response(response).await?;

        self.id_token = SecretString::from(body.id_token);
        self.refresh_token = SecretString::from(body.refresh_token);
        self.expires_at = expiry_from(body.expires_in.as_deref());

        debug!("ID token refreshed");

        Ok(())
    }
}

impl std::fmt::Debug for FirebaseCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirebaseCredential")
            .field("uid", &self.uid)
            .field("email", &self.email)
            .field("id_token", &"***")
            .field("refresh_token", &"***")
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl AuthCredential for FirebaseCredential {
    fn uid(&self) -> &str {
        &self.uid
    }

    async fn id_token(&mut self) -> Result<BearerToken, IdentityError> {
        if !self.is_fresh() {
            self.refresh().await?;
        }
        Ok(BearerToken::new(self.id_token.clone()))
    }
}

fn expiry_from(expires_in: Option<&str>) -> Instant {
    let seconds = expires_in
        .and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_TOKEN_TTL_SECONDS);
    let now = Instant::now();
    now.checked_add(Duration::from_secs(seconds))
        .unwrap_or_else(|| now + Duration::from_secs(DEFAULT_TOKEN_TTL_SECONDS))
}

async fn parse_response<T: serde::de::DeserializeOwned>(
    response: Response,
) -> Result<T, IdentityError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let json_response: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
        return Err(provider_error_code(&json_response)
            .map_or(IdentityError::Status(status.as_u16()), rejection));
    }

    serde_json::from_str(&body)
        .map_err(|err| IdentityError::InvalidResponse(format!("failed to decode response: {err}")))
}

fn provider_error_code(json_response: &Value) -> Option<&str> {
    json_response
        .get("error")
        .and_then(|v| v.get("message"))
        .and_then(Value::as_str)
}

/// Turn a provider error string (`CODE` or `CODE : detail`) into a rejection.
fn rejection(raw: &str) -> IdentityError {
    let (code, detail) = match raw.split_once(':') {
        Some((code, detail)) => (code.trim(), Some(detail.trim())),
        None => (raw.trim(), None),
    };

    let message = match code {
        "EMAIL_EXISTS" => "email already in use".to_string(),
        "INVALID_EMAIL" => "invalid email".to_string(),
        "MISSING_PASSWORD" => "missing password".to_string(),
        "WEAK_PASSWORD" => detail.map_or_else(|| "weak password".to_string(), str::to_string),
        "OPERATION_NOT_ALLOWED" => "password sign-in is disabled for this project".to_string(),
        "TOO_MANY_ATTEMPTS_TRY_LATER" => "too many attempts, try again later".to_string(),
        "TOKEN_EXPIRED" => "credential is no longer valid, sign in again".to_string(),
        "USER_DISABLED" => "user account has been disabled".to_string(),
        "USER_NOT_FOUND" => "user not found".to_string(),
        "INVALID_REFRESH_TOKEN" => "invalid refresh token".to_string(),
        _ => detail.map_or_else(
            || "identity provider rejected the request".to_string(),
            str::to_string,
        ),
    };

    IdentityError::Rejected {
        code: code.to_string(),
        message,
    }
}
