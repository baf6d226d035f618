use crate::cli::actions::{hello, sign_up, users, Action};
use anyhow::Result;

/// Execute the provided action.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    match action {
        Action::Hello(args) => hello::execute(args).await,
        Action::Users(args) => users::execute(args).await,
        Action::SignUp(args) => sign_up::execute(args).await,
    }
}
