use std::{env, fmt, time::Duration};

use anyhow::Context as _;
use reqwest::{Method, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use crate::profile::{AltProfile, body_reports_quota, mentions_quota};

pub const DEFAULT_API_BASE: &str = "https://trigen.io";
pub const DEFAULT_API_ENDPOINT: &str = "/api/alt/generate";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);
const USER_AGENT: &str = concat!("slice-bot/", env!("CARGO_PKG_VERSION"));

#[derive(Debug)]
pub enum AltError {
    /// The provider reports that the account balance or rate quota is spent.
    QuotaExhausted,
    /// The provider answered without a usable username.
    EmptyProfile,
    Status(StatusCode),
    Request(reqwest::Error),
}

impl fmt::Display for AltError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QuotaExhausted => f.write_str("alt provider quota exhausted"),
            Self::EmptyProfile => f.write_str("alt provider returned no profile"),
            Self::Status(status) => write!(f, "alt provider answered {status}"),
            Self::Request(source) => write!(f, "alt provider request failed: {source}"),
        }
    }
}

impl std::error::Error for AltError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Request(source) => Some(source),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for AltError {
    fn from(source: reqwest::Error) -> Self {
        Self::Request(source)
    }
}

impl AltError {
    /// Reply shown to the invoker.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::QuotaExhausted => {
                "The alt provider is out of credits right now. Ask an admin to top it up."
            }
            Self::EmptyProfile => "Couldn't fetch an alt right now.",
            Self::Status(_) | Self::Request(_) => {
                "Couldn't fetch an alt right now, try again later."
            }
        }
    }
}

/// Classify a non-success status before the body is decoded.
fn classify_status(status: StatusCode, body: &str) -> Option<AltError> {
    match status {
        StatusCode::PAYMENT_REQUIRED | StatusCode::TOO_MANY_REQUESTS => {
            Some(AltError::QuotaExhausted)
        }
        StatusCode::FORBIDDEN if mentions_quota(body) => Some(AltError::QuotaExhausted),
        status if !status.is_success() => Some(AltError::Status(status)),
        _ => None,
    }
}

fn fallback_method(method: &Method) -> Method {
    if *method == Method::POST {
        Method::GET
    } else {
        Method::POST
    }
}

fn parse_method(raw: &str) -> Method {
    match raw.trim().to_ascii_uppercase().as_str() {
        "GET" => Method::GET,
        _ => Method::POST,
    }
}

#[derive(Clone)]
pub struct AltService {
    client: reqwest::Client,
    api_key: String,
    url: String,
    method: Method,
}

impl fmt::Debug for AltService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AltService")
            .field("url", &self.url)
            .field("method", &self.method)
            .finish_non_exhaustive()
    }
}

impl AltService {
    pub fn from_env_optional() -> anyhow::Result<Option<Self>> {
        let has_key = env::var("ALT_API_KEY")
            .ok()
            .is_some_and(|value| !value.trim().is_empty());

        if !has_key {
            return Ok(None);
        }

        Ok(Some(Self::from_env()?))
    }

    pub fn from_env() -> anyhow::Result<Self> {
        let api_key = env::var("ALT_API_KEY")
            .context("ALT_API_KEY is not set")?
            .trim()
            .to_owned();
        let base = env_or("ALT_API_BASE", DEFAULT_API_BASE);
        let endpoint = env_or("ALT_API_ENDPOINT", DEFAULT_API_ENDPOINT);
        let method = parse_method(&env_or("ALT_API_METHOD", "POST"));

        Self::new(api_key, &base, &endpoint, method)
    }

    pub fn new(
        api_key: String,
        base: &str,
        endpoint: &str,
        method: Method,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .context("failed to build alt provider http client")?;

        Ok(Self {
            client,
            api_key,
            url: join_url(base, endpoint),
            method,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn fetch_profile(&self) -> Result<AltProfile, AltError> {
        let mut response = self.send(self.method.clone()).await?;

        if matches!(
            response.status(),
            StatusCode::NOT_FOUND | StatusCode::METHOD_NOT_ALLOWED
        ) {
            let fallback = fallback_method(&self.method);
            debug!(status = %response.status(), %fallback, "retrying alt request with fallback method");
            response = self.send(fallback).await?;
        }

        let status = response.status();
        let body = response.text().await?;

        if let Some(error) = classify_status(status, &body) {
            warn!(%status, "alt provider rejected request");
            return Err(error);
        }

        let value: Value = serde_json::from_str(&body).map_err(|source| {
            warn!(?source, "alt provider returned invalid json");
            AltError::EmptyProfile
        })?;

        if body_reports_quota(&value) {
            return Err(AltError::QuotaExhausted);
        }

        AltProfile::from_value(&value).ok_or(AltError::EmptyProfile)
    }

    async fn send(&self, method: Method) -> Result<reqwest::Response, AltError> {
        let response = self
            .client
            .request(method, &self.url)
            .header("x-api-key", &self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        Ok(response)
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_owned())
}

fn join_url(base: &str, endpoint: &str) -> String {
    let base = base.trim_end_matches('/');
    if endpoint.starts_with('/') {
        format!("{base}{endpoint}")
    } else {
        format!("{base}/{endpoint}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_and_rate_limits_are_quota() {
        assert!(matches!(
            classify_status(StatusCode::PAYMENT_REQUIRED, ""),
            Some(AltError::QuotaExhausted)
        ));
        assert!(matches!(
            classify_status(StatusCode::TOO_MANY_REQUESTS, ""),
            Some(AltError::QuotaExhausted)
        ));
    }

    #[test]
    fn forbidden_depends_on_body() {
        assert!(matches!(
            classify_status(StatusCode::FORBIDDEN, "{\"error\":\"Token balance exceeded\"}"),
            Some(AltError::QuotaExhausted)
        ));
        assert!(matches!(
            classify_status(StatusCode::FORBIDDEN, "{\"error\":\"bad key\"}"),
            Some(AltError::Status(StatusCode::FORBIDDEN))
        ));
    }

    #[test]
    fn success_is_not_classified() {
        assert!(classify_status(StatusCode::OK, "quota").is_none());
    }

    #[test]
    fn method_fallback_flips() {
        assert_eq!(fallback_method(&Method::POST), Method::GET);
        assert_eq!(fallback_method(&Method::GET), Method::POST);
        assert_eq!(parse_method(" get "), Method::GET);
        assert_eq!(parse_method("patch"), Method::POST);
    }

    #[test]
    fn urls_join_cleanly() {
        assert_eq!(
            join_url("https://trigen.io/", "/api/alt/generate"),
            "https://trigen.io/api/alt/generate"
        );
        assert_eq!(join_url("https://x.test", "gen"), "https://x.test/gen");
    }

    #[test]
    fn service_debug_hides_key() {
        let service = AltService::new(
            "super-secret".to_owned(),
            DEFAULT_API_BASE,
            DEFAULT_API_ENDPOINT,
            Method::POST,
        )
        .unwrap();

        assert_eq!(service.url(), "https://trigen.io/api/alt/generate");
        assert!(!format!("{service:?}").contains("super-secret"));
    }
}
