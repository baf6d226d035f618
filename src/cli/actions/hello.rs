use crate::{cli::globals::GlobalArgs, config::AppConfig, graphql::queries};
use anyhow::{Context, Result};
use tracing::debug;

#[derive(Debug)]
pub struct Args {
    pub config: AppConfig,
}

/// Query `hello` and print the backend's answer.
/// # Errors
/// Returns an error if the backend can't be reached or answers with an error.
pub async fn execute(args: Args) -> Result<()> {
    let globals = GlobalArgs::new(args.config);
    debug!("graphql endpoint: {}", globals.config.graphql_endpoint);

    let message = queries::hello(&globals.graphql.get_client())
        .await
        .context("Error connecting to backend")?;

    println!("Message from backend: {message}");

    Ok(())
}
