use std::fmt;

use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Login failed: {0}")]
    Login(#[from] LoginError),

    #[error("Not authenticated. Please login first.")]
    NotAuthenticated,

    #[error("Query must be ASCII to be encoded, got: {0:?}")]
    NonAsciiQuery(String),

    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Io Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Couldn't parse JSON response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Reqwest Error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Why the login handshake stopped.
#[derive(Debug, Error)]
pub enum LoginError {
    #[error("{step} returned unexpected status {status}")]
    UnexpectedStatus { step: LoginStep, status: StatusCode },

    #[error("cookie `{0}` not found")]
    MissingCookie(&'static str),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginStep {
    UserInfo,
    Index,
    Login,
}

impl fmt::Display for LoginStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LoginStep::UserInfo => "user info request",
            LoginStep::Index => "index request",
            LoginStep::Login => "login request",
        };
        f.write_str(s)
    }
}
