//! Front-end form constraints for sign-up. The handshake itself does no
//! validation; these checks stand in for the `required` / `type="email"`
//! attributes of an HTML form.

use super::SignUpRequest;
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("email address looks invalid")]
    InvalidEmail,
}

/// Raw form input, before validation.
#[derive(Debug, Clone, Default)]
pub struct SignUpForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: SecretString,
}

impl SignUpForm {
    /// Check the form and produce the request handed to the handshake.
    ///
    /// # Errors
    /// Returns a [`FormError`] for the first empty field or a malformed email.
    pub fn validate(self) -> Result<SignUpRequest, FormError> {
        let first_name = required("first name", &self.first_name)?;
        let last_name = required("last name", &self.last_name)?;
        let email = required("email", &self.email)?;

        if self.password.expose_secret().is_empty() {
            return Err(FormError::Missing("password"));
        }

        if !valid_email(&email) {
            return Err(FormError::InvalidEmail);
        }

        Ok(SignUpRequest {
            first_name,
            last_name,
            email,
            password: self.password,
        })
    }
}

fn required(field: &'static str, value: &str) -> Result<String, FormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(FormError::Missing(field))
    } else {
        Ok(trimmed.to_string())
    }
}

#[must_use]
pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form() -> SignUpForm {
        SignUpForm {
            first_name: " Ann ".to_string(),
            last_name: "Lee".to_string(),
            email: "a@x.com".to_string(),
            password: SecretString::from("secret123"),
        }
    }

    #[test]
    fn valid_form_becomes_request() {
        let request = form().validate().unwrap();
        assert_eq!(request.first_name, "Ann");
        assert_eq!(request.email, "a@x.com");
        assert_eq!(request.password.expose_secret(), "secret123");
    }

    #[test]
    fn empty_fields_are_rejected() {
        let mut missing = form();
        missing.last_name = "   ".to_string();
        assert_eq!(missing.validate().unwrap_err(), FormError::Missing("last name"));

        let mut missing = form();
        missing.password = SecretString::default();
        assert_eq!(missing.validate().unwrap_err(), FormError::Missing("password"));
    }

    #[test]
    fn password_is_not_trimmed() {
        let mut spaced = form();
        spaced.password = SecretString::from(" secret ");
        let request = spaced.validate().unwrap();
        assert_eq!(request.password.expose_secret(), " secret ");
    }

    #[test]
    fn email_shape() {
        assert!(valid_email("a@x.com"));
        assert!(!valid_email("a@x"));
        assert!(!valid_email("a x@x.com"));
        assert!(!valid_email("@x.com"));

        let mut bad = form();
        bad.email = "not-an-email".to_string();
        assert_eq!(bad.validate().unwrap_err(), FormError::InvalidEmail);
    }
}
