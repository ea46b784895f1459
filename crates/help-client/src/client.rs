//! Package removal client.
//!
//! Async HTTP client using `reqwest` with the session cookies attached once
//! as a default header.

use std::future::Future;
use std::pin::Pin;

use dustman_prune::{PackageRemover, RemovalError};
use dustman_steam::{AppId, PackageId};
use reqwest::header::{CONTENT_TYPE, COOKIE, HeaderMap, HeaderValue};
use tracing::debug;

use crate::types::{Credentials, RemovalResponse, SuccessFlag};

pub const DEFAULT_ENDPOINT: &str = "https://help.steampowered.com/en/wizard/AjaxDoPackageRemove";

const JSON_MEDIA_TYPE: &str = "application/json";

/// Errors building the client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("credentials contain characters not allowed in a cookie")]
    InvalidCredentials,
}

/// Help-site client bound to one login session.
pub struct Client {
    http: reqwest::Client,
    endpoint: String,
    session_id: String,
}

impl Client {
    /// Creates a client that sends `credentials` as cookies on every request.
    pub fn new(credentials: &Credentials) -> Result<Self, ClientError> {
        let cookie = format!(
            "sessionid={}; steamLogin={}; steamLoginSecure={}",
            credentials.session_id, credentials.steam_login, credentials.steam_login_secure
        );
        let mut cookie = HeaderValue::from_str(&cookie).map_err(|_| ClientError::InvalidCredentials)?;
        cookie.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, cookie);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!("dustman/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            session_id: credentials.session_id.clone(),
        })
    }

    /// Sends requests to `url` instead of the help site.
    pub fn with_endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint = url.into();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Asks the endpoint to remove `package`, reached through `app`.
    ///
    /// Succeeds only on a 2xx reply with a JSON content type whose body has
    /// `"success": true`. Issues exactly one request and never retries.
    pub async fn remove_package(
        &self,
        app: &AppId,
        package: &PackageId,
    ) -> Result<(), RemovalError> {
        let form = [
            ("appid", app.as_str()),
            ("packageid", package.as_str()),
            ("sessionid", self.session_id.as_str()),
        ];
        let resp = self
            .http
            .post(&self.endpoint)
            .form(&form)
            .send()
            .await
            .map_err(|e| RemovalError::Http(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(RemovalError::Status {
                status: status.as_u16(),
            });
        }

        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        if !is_json(content_type.as_deref()) {
            return Err(RemovalError::NotJson { content_type });
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| RemovalError::Http(e.to_string()))?;
        let parsed: RemovalResponse =
            serde_json::from_slice(&body).map_err(|e| RemovalError::Body(e.to_string()))?;

        match parsed.success {
            Some(SuccessFlag::True) => {
                debug!(%app, %package, "package removed");
                Ok(())
            }
            Some(flag) => Err(RemovalError::Rejected(flag.to_string())),
            None => Err(RemovalError::Body("response has no success field".into())),
        }
    }
}

impl PackageRemover for Client {
    fn remove<'a>(
        &'a self,
        app: &'a AppId,
        package: &'a PackageId,
    ) -> Pin<Box<dyn Future<Output = Result<(), RemovalError>> + Send + 'a>> {
        Box::pin(self.remove_package(app, package))
    }
}

/// True for `application/json`, with or without parameters.
fn is_json(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|ct| ct.split(';').next())
        .is_some_and(|media| media.trim().eq_ignore_ascii_case(JSON_MEDIA_TYPE))
}
