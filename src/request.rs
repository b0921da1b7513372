use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, COOKIE, USER_AGENT};
use reqwest::{Client, RequestBuilder, Response, StatusCode};

use crate::session::{
    SessionState, CSRF_COOKIE, REPLACE_SSO_CSRF_COOKIE, SESSION_COOKIE, SSO_CSRF_COOKIE,
};
use crate::{info_time, warn_time, ClientConfig, LoginError, LoginStep, Result};

const BROWSER_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub(crate) const USER_INFO_PATH: &str = "/cas/api/user/userInfo";
pub(crate) const INDEX_PATH: &str = "/cas/api/index";
pub(crate) const LOGIN_PATH: &str = "/cas/api/cas/login";

/// A logged-in (or not yet logged-in) ZoomEye web session.
///
/// Owns its HTTP client and cookie bag; nothing is shared between instances.
pub struct ZoomEyeClient {
    pub(crate) client: Client,
    pub(crate) config: ClientConfig,
    pub(crate) session: SessionState,
}

impl ZoomEyeClient {
    /// Builds the client with browser-like default headers.
    /// Certificate verification is turned off, the service is reached as-is.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_UA));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/json, text/plain, */*"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let client = Client::builder()
            .default_headers(headers)
            .danger_accept_invalid_certs(true)
            .build()?;

        Ok(Self {
            client,
            config,
            session: SessionState::new(),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Runs the three step CAS handshake.
    ///
    /// `credential` is the already encrypted password and is posted verbatim.
    /// The server currently wants it wrapped in double quotes, e.g. `"\"...\""`.
    /// Every failure is logged and returned as a [`LoginError`].
    /// Cookies of any earlier session are dropped first, and again on failure,
    /// so only a fully completed handshake leaves the client authenticated.
    pub async fn login(&mut self, credential: &str) -> Result<()> {
        self.session.clear();
        match self.handshake(credential).await {
            Ok(()) => Ok(()),
            Err(e) => {
                self.session.clear();
                warn_time!("Error during login: {}", e);
                Err(e.into())
            }
        }
    }

    async fn handshake(&mut self, credential: &str) -> core::result::Result<(), LoginError> {
        info_time!("Step 1: Getting initial CSRF token...");
        let req = self.client.get(self.config.url(USER_INFO_PATH));
        let res = self.send(req).await?;
        expect_ok_or_not_modified(LoginStep::UserInfo, res.status())?;
        let csrf = self.require_cookie(CSRF_COOKIE)?;
        info_time!("Got CSRF token: {}", csrf);

        info_time!("Step 2: Getting SSO CSRF tokens...");
        let req = self.client.get(self.config.url(INDEX_PATH));
        let res = self.send(req).await?;
        expect_ok_or_not_modified(LoginStep::Index, res.status())?;
        let sso = self.require_cookie(SSO_CSRF_COOKIE)?;
        let replace_sso = self.require_cookie(REPLACE_SSO_CSRF_COOKIE)?;
        info_time!("Got SSO tokens: {}, {}", sso, replace_sso);

        info_time!("Step 3: Attempting login...");
        let req = self
            .client
            .post(self.config.url(LOGIN_PATH))
            .header("encode-X", self.config.encode_x.as_str())
            .body(credential.to_owned());
        let res = self.send(req).await?;
        let status = res.status();
        if status != StatusCode::CREATED {
            let body = res.text().await.unwrap_or_default();
            warn_time!("Login failed. Status: {}\nResponse: {}", status, body);
            return Err(LoginError::UnexpectedStatus {
                step: LoginStep::Login,
                status,
            });
        }
        info_time!("Login successful!");

        self.require_cookie(SESSION_COOKIE)?;
        info_time!("Session established");
        Ok(())
    }

    /// Attaches the session cookies, sends, and keeps whatever cookies come back.
    pub(crate) async fn send(&mut self, req: RequestBuilder) -> reqwest::Result<Response> {
        let req = match self.session.cookie_header() {
            Some(cookies) => req.header(COOKIE, cookies),
            None => req,
        };
        let res = req.send().await?;
        self.session.absorb(&res);
        Ok(res)
    }

    fn require_cookie(&self, name: &'static str) -> core::result::Result<String, LoginError> {
        self.session
            .get(name)
            .map(str::to_owned)
            .ok_or(LoginError::MissingCookie(name))
    }
}

fn expect_ok_or_not_modified(
    step: LoginStep,
    status: StatusCode,
) -> core::result::Result<(), LoginError> {
    if status == StatusCode::OK || status == StatusCode::NOT_MODIFIED {
        Ok(())
    } else {
        Err(LoginError::UnexpectedStatus { step, status })
    }
}
