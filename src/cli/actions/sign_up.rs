use crate::{
    cli::globals::GlobalArgs,
    config::AppConfig,
    identity::{FirebaseAuth, FirebaseConfig},
    signup::{HandshakeStatus, SignUpFlow, SignUpForm},
};
use anyhow::{Context, Result};
use tokio::sync::watch;
use tracing::debug;

#[derive(Debug)]
pub struct Args {
    pub config: AppConfig,
    pub firebase: FirebaseConfig,
    pub form: SignUpForm,
}

/// Run the sign-up handshake, printing each status line as it changes.
/// # Errors
/// Returns an error if the form is invalid or any handshake step fails.
pub async fn execute(args: Args) -> Result<()> {
    let request = args.form.validate().context("Invalid sign-up form")?;

    let globals = GlobalArgs::new(args.config);
    debug!("firebase config: {:?}", args.firebase);

    let flow = SignUpFlow::new(FirebaseAuth::new(args.firebase), globals.graphql.get_client());
    let progress = tokio::spawn(print_progress(flow.subscribe()));

    let result = flow.sign_up(request).await;

    // closing the channel ends the printer
    drop(flow);
    if let Err(err) = progress.await {
        debug!("progress printer stopped: {err}");
    }

    let user = result.context("Sign-up failed")?;
    debug!("created user {} with role {}", user.id, user.role);

    Ok(())
}

async fn print_progress(mut status: watch::Receiver<HandshakeStatus>) {
    while status.changed().await.is_ok() {
        let current = status.borrow_and_update().clone();
        match current {
            HandshakeStatus::Idle => {}
            // returned to the caller as the action's error
            HandshakeStatus::Failed(_) => break,
            HandshakeStatus::InProgress(_) => println!("{}", current.message()),
            HandshakeStatus::Succeeded(_) => {
                println!("{}", current.message());
                break;
            }
        }
    }
}
