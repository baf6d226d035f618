use super::GraphQLClient;
use crate::config::AppConfig;
use std::sync::{Arc, OnceLock};
use tracing::debug;
use url::Url;

/// Shared handle to the one GraphQL client of the process.
pub type GraphQLClientHandle = Arc<GraphQLClient>;

/// Builds the GraphQL client on first use and hands out the same instance afterwards.
///
/// Build one accessor at startup and pass it (or an `Arc` of it) to every
/// consumer. Share it behind an `Arc`; it is not `Clone`.
#[derive(Debug)]
pub struct ClientAccessor {
    endpoint: Url,
    client: OnceLock<GraphQLClientHandle>,
}

impl ClientAccessor {
    #[must_use]
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            client: OnceLock::new(),
        }
    }

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.graphql_endpoint.clone())
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Return the memoized client, constructing it on the first call.
    #[must_use]
    pub fn get_client(&self) -> GraphQLClientHandle {
        Arc::clone(self.client.get_or_init(|| {
            debug!("creating GraphQL client for {}", self.endpoint);
            Arc::new(GraphQLClient::new(self.endpoint.clone()))
        }))
    }
}
