use crate::{
    cli::{
        actions::{hello, sign_up, users, Action},
        commands::{self, firebase},
    },
    config::AppConfig,
    signup::SignUpForm,
};
use anyhow::{anyhow, Context, Result};
use clap::ArgMatches;
use secrecy::SecretString;

fn config(matches: &ArgMatches) -> AppConfig {
    AppConfig::resolve(
        matches
            .get_one::<String>(commands::ARG_GRAPHQL_ENDPOINT)
            .map(String::as_str),
    )
}

fn required(matches: &ArgMatches, name: &str) -> Result<String> {
    matches
        .get_one::<String>(name)
        .cloned()
        .with_context(|| format!("missing required argument: --{name}"))
}

fn sign_up_args(matches: &ArgMatches) -> Result<sign_up::Args> {
    let form = SignUpForm {
        first_name: required(matches, commands::ARG_FIRST_NAME)?,
        last_name: required(matches, commands::ARG_LAST_NAME)?,
        email: required(matches, commands::ARG_EMAIL)?,
        password: SecretString::from(required(matches, commands::ARG_PASSWORD)?),
    };

    Ok(sign_up::Args {
        config: config(matches),
        firebase: firebase::parse(matches)?,
        form,
    })
}

/// # Errors
/// Returns an error if the subcommand is unknown or required arguments are missing.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    match matches.subcommand() {
        Some((commands::CMD_HELLO, sub)) => Ok(Action::Hello(hello::Args {
            config: config(sub),
        })),
        Some((commands::CMD_USERS, sub)) => Ok(Action::Users(users::Args {
            config: config(sub),
        })),
        Some((commands::CMD_SIGN_UP, sub)) => Ok(Action::SignUp(sign_up_args(sub)?)),
        Some((name, _)) => Err(anyhow!("unknown subcommand: {name}")),
        None => Err(anyhow!("no subcommand given")),
    }
}
