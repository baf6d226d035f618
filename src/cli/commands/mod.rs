pub mod firebase;
pub mod logging;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ColorChoice, Command,
};

pub const ARG_GRAPHQL_ENDPOINT: &str = "graphql-endpoint";

pub const CMD_HELLO: &str = "hello";
pub const CMD_USERS: &str = "users";
pub const CMD_SIGN_UP: &str = "sign-up";

pub const ARG_FIRST_NAME: &str = "first-name";
pub const ARG_LAST_NAME: &str = "last-name";
pub const ARG_EMAIL: &str = "email";
pub const ARG_PASSWORD: &str = "password";

fn sign_up_command() -> Command {
    let command = Command::new(CMD_SIGN_UP)
        .about("Create an account with the identity provider and a STAFF profile in the backend")
        .arg(
            Arg::new(ARG_FIRST_NAME)
                .long(ARG_FIRST_NAME)
                .help("First name")
                .required(true),
        )
        .arg(
            Arg::new(ARG_LAST_NAME)
                .long(ARG_LAST_NAME)
                .help("Last name")
                .required(true),
        )
        .arg(
            Arg::new(ARG_EMAIL)
                .short('e')
                .long(ARG_EMAIL)
                .help("Email address")
                .required(true),
        )
        .arg(
            Arg::new(ARG_PASSWORD)
                .long(ARG_PASSWORD)
                .help("Password")
                .env("BUDSAFE_SIGNUP_PASSWORD")
                .hide_env_values(true)
                .required(true),
        );

    firebase::with_args(command)
}

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let command = Command::new("budsafe")
        .about("BudSafe dashboard client")
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new(ARG_GRAPHQL_ENDPOINT)
                .short('g')
                .long(ARG_GRAPHQL_ENDPOINT)
                .help("GraphQL endpoint (default: http://localhost:8080/query)")
                .env("BUDSAFE_GRAPHQL_ENDPOINT")
                .global(true),
        )
        .subcommand(Command::new(CMD_HELLO).about("Check the backend connection"))
        .subcommand(Command::new(CMD_USERS).about("List users"))
        .subcommand(sign_up_command());

    logging::with_args(command)
}
