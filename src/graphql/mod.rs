//! Minimal GraphQL-over-HTTP client. Requests are `POST {query, variables}` with
//! a JSON body; responses are decoded from the standard `{data, errors}`
//! envelope. The client keeps no response cache; each call is one request.
//!
//! Authentication is per request: callers pass an optional [`BearerToken`]
//! which is attached as `Authorization: Bearer <token>` and marked sensitive so
//! it never shows up in debug output.

mod accessor;
pub mod mutations;
pub mod queries;

pub use self::accessor::{ClientAccessor, GraphQLClientHandle};

use crate::{identity::BearerToken, APP_USER_AGENT};
use reqwest::{header::USER_AGENT, Client, StatusCode};
use secrecy::ExposeSecret;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

/// Maximum number of error body characters surfaced to callers.
const MAX_ERROR_CHARS: usize = 200;

/// GraphQL request body.
#[derive(Debug, Serialize)]
pub struct GraphQLRequest<'a, V: Serialize> {
    pub query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<V>,
}

/// GraphQL response envelope.
#[derive(Debug, Deserialize)]
pub struct GraphQLResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Option<Vec<GraphQLErrorEntry>>,
}

/// One entry of the `errors` list.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct GraphQLErrorEntry {
    pub message: String,
    #[serde(default)]
    pub path: Option<Vec<Value>>,
}

#[derive(Debug, Error)]
pub enum GraphQLError {
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The server answered with a structured `errors` list.
    #[error("{}", first_message(.0))]
    Response(Vec<GraphQLErrorEntry>),
    #[error("request failed ({status}): {message}")]
    Http { status: StatusCode, message: String },
    #[error("response error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("no data returned")]
    NoData,
}

impl GraphQLError {
    /// First structured error message, if the server returned any.
    #[must_use]
    pub fn first_message(&self) -> Option<&str> {
        match self {
            Self::Response(errors) => errors.first().map(|entry| entry.message.as_str()),
            _ => None,
        }
    }
}

fn first_message(errors: &[GraphQLErrorEntry]) -> &str {
    errors
        .first()
        .map_or("GraphQL request failed", |entry| entry.message.as_str())
}

/// GraphQL client bound to one endpoint.
#[derive(Debug)]
pub struct GraphQLClient {
    http: Client,
    endpoint: Url,
}

impl GraphQLClient {
    /// Build a client for `endpoint`. No connection is opened until the first request.
    #[must_use]
    pub fn new(endpoint: Url) -> Self {
        Self {
            http: Client::new(),
            endpoint,
        }
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Execute an unauthenticated query.
    ///
    /// # Errors
    /// Returns a [`GraphQLError`] on transport failure, HTTP failure, a structured
    /// GraphQL error list, or an undecodable response.
    pub async fn query<V, R>(&self, query: &str, variables: Option<V>) -> Result<R, GraphQLError>
    where
        V: Serialize + Send,
        R: DeserializeOwned,
    {
        self.execute(query, variables, None).await
    }

    /// Execute a mutation, optionally authenticated with a bearer token.
    ///
    /// # Errors
    /// Same as [`GraphQLClient::query`].
    pub async fn mutate<V, R>(
        &self,
        mutation: &str,
        variables: Option<V>,
        token: Option<&BearerToken>,
    ) -> Result<R, GraphQLError>
    where
        V: Serialize + Send,
        R: DeserializeOwned,
    {
        self.execute(mutation, variables, token).await
    }

    #[instrument(skip_all, fields(endpoint = %self.endpoint, authenticated = token.is_some()))]
    async fn execute<V, R>(
        &self,
        query: &str,
        variables: Option<V>,
        token: Option<&BearerToken>,
    ) -> Result<R, GraphQLError>
    where
        V: Serialize + Send,
        R: DeserializeOwned,
    {
        let request = GraphQLRequest { query, variables };

        let mut builder = self
            .http
            .post(self.endpoint.clone())
            .header(USER_AGENT, APP_USER_AGENT)
            .json(&request);

        if let Some(token) = token {
            builder = builder.bearer_auth(token.secret().expose_secret());
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        debug!("GraphQL response status: {}", status);

        decode_response(status, &body)
    }
}

/// Decode a GraphQL response body.
///
/// A structured `errors` list wins over the HTTP status, so servers that
/// reply 4xx/5xx with a GraphQL envelope still surface their own message.
fn decode_response<R: DeserializeOwned>(status: StatusCode, body: &str) -> Result<R, GraphQLError> {
    let envelope = match serde_json::from_str::<GraphQLResponse<Value>>(body) {
        Ok(envelope) => envelope,
        Err(_) if !status.is_success() => {
            return Err(GraphQLError::Http {
                status,
                message: sanitize_body(body),
            })
        }
        Err(err) => return Err(GraphQLError::Decode(err)),
    };

    if let Some(errors) = envelope.errors.filter(|errors| !errors.is_empty()) {
        return Err(GraphQLError::Response(errors));
    }

    if !status.is_success() {
        return Err(GraphQLError::Http {
            status,
            message: sanitize_body(body),
        });
    }

    // data is decoded only after the error list so a partial payload never hides it
    match envelope.data {
        Some(data) if !data.is_null() => Ok(serde_json::from_value(data)?),
        _ => Err(GraphQLError::NoData),
    }
}

/// Trim and truncate error bodies before surfacing them.
fn sanitize_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Request failed.".to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}
