//! Endpoint configuration for the GraphQL backend. The endpoint is resolved once
//! at startup from the command line or `BUDSAFE_GRAPHQL_ENDPOINT`; resolution
//! never fails and falls back to the local development server.
//! Configuration values are public; do not store secrets here.

use tracing::warn;
use url::Url;

/// Endpoint used when nothing (or nothing usable) is configured.
pub const DEFAULT_GRAPHQL_ENDPOINT: &str = "http://localhost:8080/query";

/// Environment variable holding the GraphQL endpoint.
pub const ENV_GRAPHQL_ENDPOINT: &str = "BUDSAFE_GRAPHQL_ENDPOINT";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub graphql_endpoint: Url,
}

impl AppConfig {
    /// Resolves the endpoint from an optional raw value.
    /// Empty or unparsable values fall back to [`DEFAULT_GRAPHQL_ENDPOINT`].
    #[must_use]
    pub fn resolve(raw_endpoint: Option<&str>) -> Self {
        let graphql_endpoint = raw_endpoint
            .and_then(normalize_value)
            .and_then(|value| match Url::parse(&value) {
                Ok(url) if matches!(url.scheme(), "http" | "https") => Some(url),
                Ok(url) => {
                    warn!(
                        "unsupported GraphQL endpoint scheme {}, using {}",
                        url.scheme(),
                        DEFAULT_GRAPHQL_ENDPOINT
                    );
                    None
                }
                Err(err) => {
                    warn!(
                        "invalid GraphQL endpoint {value:?} ({err}), using {}",
                        DEFAULT_GRAPHQL_ENDPOINT
                    );
                    None
                }
            })
            .unwrap_or_else(default_endpoint);

        Self { graphql_endpoint }
    }

    /// Resolves the endpoint from `BUDSAFE_GRAPHQL_ENDPOINT`.
    #[must_use]
    pub fn from_env() -> Self {
        let raw = std::env::var(ENV_GRAPHQL_ENDPOINT).ok();
        Self::resolve(raw.as_deref())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            graphql_endpoint: default_endpoint(),
        }
    }
}

fn default_endpoint() -> Url {
    Url::parse(DEFAULT_GRAPHQL_ENDPOINT).unwrap_or_else(|_| unreachable!("default endpoint is a valid URL"))
}

fn normalize_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
