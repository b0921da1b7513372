//! Cookie bag carried across the requests of one client.
//!
//! `reqwest`'s own cookie store can't be read back by name, so the
//! session keeps cookies itself and replays them on every request.

use std::collections::BTreeMap;
use std::time::{Duration, SystemTime};

use reqwest::Response;

pub const CSRF_COOKIE: &str = "_csrf";
pub const SSO_CSRF_COOKIE: &str = "ssoCsrfToken";
pub const REPLACE_SSO_CSRF_COOKIE: &str = "replaceSsoCsrfToken";
pub const SESSION_COOKIE: &str = "sessionid";

#[derive(Debug, Default, Clone)]
pub struct SessionState {
    cookies: BTreeMap<String, String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records every `Set-Cookie` of the response. Later values win,
    /// cookies the server expires are dropped.
    pub fn absorb(&mut self, response: &Response) {
        for cookie in response.cookies() {
            if is_expired(cookie.max_age(), cookie.expires()) {
                self.cookies.remove(cookie.name());
            } else {
                self.set(cookie.name(), cookie.value());
            }
        }
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.cookies.insert(name.into(), value.into());
    }

    /// Empty values count as missing.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Renders the bag as a `Cookie` header value, `None` when there is nothing to send.
    pub fn cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        let header = self
            .cookies
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("; ");
        Some(header)
    }

    pub fn is_authenticated(&self) -> bool {
        self.get(SESSION_COOKIE).is_some()
    }

    pub fn clear(&mut self) {
        self.cookies.clear();
    }
}

/// `Max-Age` wins over `Expires` when both are present.
fn is_expired(max_age: Option<Duration>, expires: Option<SystemTime>) -> bool {
    match max_age {
        Some(age) => age.is_zero(),
        None => expires.is_some_and(|at| at <= SystemTime::now()),
    }
}
