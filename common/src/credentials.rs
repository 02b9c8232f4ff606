//! # Credential Resolution
//!
//! Decides which username and password are used to log into devices.
//!
//! Precedence, per value:
//! 1. the `NETRUN_USERNAME` / `NETRUN_PASSWORD` environment variables,
//! 2. the inventory defaults,
//! 3. an interactive [`CredentialPrompt`].
//!
//! The prompt is only touched when something is still missing, so tests and
//! automation can supply everything up front and never need a terminal.

use std::fmt;

use tracing::debug;

use crate::error::CredentialError;
use crate::inventory::Defaults;

pub const USERNAME_ENV: &str = "NETRUN_USERNAME";
pub const PASSWORD_ENV: &str = "NETRUN_PASSWORD";

/// A password that refuses to show up in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(********)")
    }
}

impl From<String> for Password {
    fn from(secret: String) -> Self {
        Self(secret)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: Password,
}

/// Values picked up from the process environment.
#[derive(Debug, Clone, Default)]
pub struct EnvCredentials {
    pub username: Option<String>,
    pub password: Option<Password>,
}

impl EnvCredentials {
    pub fn from_env() -> Self {
        let read = |key: &str| std::env::var(key).ok().filter(|v| !v.is_empty());
        Self {
            username: read(USERNAME_ENV),
            password: read(PASSWORD_ENV).map(Password::from),
        }
    }
}

/// Interactive source for whatever credentials are still missing.
pub trait CredentialPrompt {
    /// Called once before the first question.
    fn announce(&mut self) {}

    /// Plain text input.
    fn username(&mut self) -> Result<String, CredentialError>;

    /// Masked input.
    fn password(&mut self) -> Result<Password, CredentialError>;
}

pub fn resolve(
    defaults: &Defaults,
    env: &EnvCredentials,
    prompt: &mut dyn CredentialPrompt,
) -> Result<Credentials, CredentialError> {
    let username: Option<String> = env.username.clone().or_else(|| defaults.username.clone());
    let password: Option<Password> = env.password.clone().or_else(|| defaults.password.clone());

    if username.is_none() || password.is_none() {
        prompt.announce();
    }

    let username: String = match username {
        Some(username) => username,
        None => prompt.username()?,
    };

    let password: Password = match password {
        Some(password) => password,
        None => prompt.password()?,
    };

    debug!("Using credentials for user '{username}'");

    Ok(Credentials { username, password })
}
