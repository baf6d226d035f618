use crate::identity::FirebaseConfig;
use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;

pub const ARG_FIREBASE_API_KEY: &str = "firebase-api-key";
pub const ARG_FIREBASE_AUTH_DOMAIN: &str = "firebase-auth-domain";
pub const ARG_FIREBASE_PROJECT_ID: &str = "firebase-project-id";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_FIREBASE_API_KEY)
                .long(ARG_FIREBASE_API_KEY)
                .help("Firebase web API key")
                .env("BUDSAFE_FIREBASE_API_KEY")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_FIREBASE_AUTH_DOMAIN)
                .long(ARG_FIREBASE_AUTH_DOMAIN)
                .help("Firebase auth domain, example: budsafe.firebaseapp.com")
                .env("BUDSAFE_FIREBASE_AUTH_DOMAIN"),
        )
        .arg(
            Arg::new(ARG_FIREBASE_PROJECT_ID)
                .long(ARG_FIREBASE_PROJECT_ID)
                .help("Firebase project id")
                .env("BUDSAFE_FIREBASE_PROJECT_ID"),
        )
}

/// Build the Firebase configuration from parsed arguments.
/// `FIREBASE_AUTH_EMULATOR_HOST` redirects requests to the Auth emulator.
///
/// # Errors
/// Returns an error if the API key is missing.
pub fn parse(matches: &ArgMatches) -> Result<FirebaseConfig> {
    let api_key = matches
        .get_one::<String>(ARG_FIREBASE_API_KEY)
        .cloned()
        .context("missing required argument: --firebase-api-key")?;

    Ok(FirebaseConfig::new(SecretString::from(api_key))
        .with_auth_domain(matches.get_one::<String>(ARG_FIREBASE_AUTH_DOMAIN).cloned())
        .with_project_id(matches.get_one::<String>(ARG_FIREBASE_PROJECT_ID).cloned())
        .with_emulator_from_env())
}
