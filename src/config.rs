use crate::{Error, Result, DEFAULT_BASE_URL, DEFAULT_ENCODE_X, DEFAULT_PAGE_LIMIT, DEFAULT_PAGE_SIZE};

pub const BASE_URL_VAR: &str = "ZOOMEYE_BASE_URL";
pub const PASSWORD_VAR: &str = "ZOOMEYE_PASSWORD";
pub const TOKEN_VAR: &str = "ZOOMEYE_TOKEN";

/// Knobs of a [`crate::ZoomEyeClient`].
///
/// Defaults talk to the public service with 50 results per page and
/// stop after page 5.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Scheme and host, no trailing slash.
    pub base_url: String,
    pub page_size: u64,
    /// Highest page number that will be requested.
    pub page_limit: u64,
    /// Sent as the `encode-X` header on the login POST.
    pub encode_x: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            page_limit: DEFAULT_PAGE_LIMIT,
            encode_x: DEFAULT_ENCODE_X.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// A page size of 0 is bumped to 1.
    pub fn with_page_size(mut self, page_size: u64) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_page_limit(mut self, page_limit: u64) -> Self {
        self.page_limit = page_limit;
        self
    }

    pub fn with_encode_x(mut self, encode_x: impl Into<String>) -> Self {
        self.encode_x = encode_x.into();
        self
    }

    /// Default config, pointed at `ZOOMEYE_BASE_URL` when it is set.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        match lookup(BASE_URL_VAR).filter(|v| !v.trim().is_empty()) {
            Some(base_url) => Self::default().with_base_url(base_url),
            None => Self::default(),
        }
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// What the caller brings to a run. Never written anywhere.
#[derive(Clone)]
pub struct Credentials {
    /// Pre-encrypted password, passed through untouched (quotes included).
    pub password: String,
    /// Value of the `Cube-Authorization` header on search requests.
    pub token: String,
}

impl Credentials {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let password = lookup(PASSWORD_VAR)
            .filter(|v| !v.is_empty())
            .ok_or(Error::MissingEnv(PASSWORD_VAR))?;
        let token = lookup(TOKEN_VAR)
            .filter(|v| !v.is_empty())
            .ok_or(Error::MissingEnv(TOKEN_VAR))?;
        Ok(Self { password, token })
    }
}
