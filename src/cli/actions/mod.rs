pub mod hello;
pub mod sign_up;
pub mod users;

// Single match over `Action`, kept apart from the variant definitions.
mod run;

#[derive(Debug)]
pub enum Action {
    Hello(hello::Args),
    Users(users::Args),
    SignUp(sign_up::Args),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}
