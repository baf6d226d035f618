//! # BudSafe dashboard client
//!
//! Client-side access to the BudSafe backend: a memoized GraphQL client for the
//! read-side dashboard queries and the authenticated sign-up handshake.
//!
//! ## Sign-up handshake
//!
//! 1. **Credential:** create the user with the identity provider (Firebase) using
//!    email and password.
//! 2. **Token:** obtain a short-lived ID token from the returned credential.
//! 3. **Profile:** send the `CreateUser` mutation with `Authorization: Bearer <token>`
//!    so the backend links the new profile to the identity account.
//!
//! The steps run strictly in order; a failure at any step ends the handshake and
//! later steps are never attempted. Progress is published through
//! [`signup::SignUpFlow::subscribe`] so any front-end can render it.
//!
//! Tokens and passwords are kept in `secrecy` wrappers and must never be logged.

pub mod cli;
pub mod config;
pub mod graphql;
pub mod identity;
pub mod signup;

/// User agent sent with every outbound request.
pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
