use crate::{config::AppConfig, graphql::ClientAccessor};
use std::sync::Arc;

/// Process-wide state built once at startup and handed to every action.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub config: AppConfig,
    pub graphql: Arc<ClientAccessor>,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        let graphql = Arc::new(ClientAccessor::from_config(&config));
        Self { config, graphql }
    }
}
