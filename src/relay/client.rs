use crate::error::RelayError;
use crate::relay::config::SiteConfig;
use crate::relay::puzzle::{Part, PuzzleKey};
use anyhow::{Context, Result};
use reqwest::blocking::{Client, Response};
use reqwest::header::{COOKIE, HeaderMap, HeaderValue, USER_AGENT};
use std::time::Duration;

/// Network side of the relay. Everything the site is asked for goes
/// through here so tests can stand in for it.
pub trait Transport {
    fn fetch_input(&self, key: &PuzzleKey) -> Result<Vec<u8>>;
    fn post_answer(&self, key: &PuzzleKey, part: Part, answer: &str) -> Result<String>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn fetch_input(&self, key: &PuzzleKey) -> Result<Vec<u8>> {
        (**self).fetch_input(key)
    }

    fn post_answer(&self, key: &PuzzleKey, part: Part, answer: &str) -> Result<String> {
        (**self).post_answer(key, part, answer)
    }
}

/// Authenticated blocking client for the puzzle site.
pub struct SiteClient {
    client: Client,
    base_url: String,
}

impl SiteClient {
    pub fn new(site: &SiteConfig, session_token: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let cookie = HeaderValue::from_str(&format!("session={session_token}"))
            .map_err(|_| RelayError::Configuration("session token has invalid characters".into()))?;
        headers.insert(COOKIE, cookie);
        let agent = HeaderValue::from_str(&site.user_agent)
            .map_err(|_| RelayError::Configuration("user agent has invalid characters".into()))?;
        headers.insert(USER_AGENT, agent);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(site.request_timeout_secs))
            .build()
            .context("failed to build http client")?;

        Ok(Self {
            client,
            base_url: site.base_url.trim_end_matches('/').to_string(),
        })
    }
}

fn ensure_success(url: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if !status.is_success() {
        return Err(RelayError::RequestFailed {
            url: url.to_string(),
            status: status.as_u16(),
        }
        .into());
    }
    Ok(response)
}

impl Transport for SiteClient {
    fn fetch_input(&self, key: &PuzzleKey) -> Result<Vec<u8>> {
        let url = key.input_url(&self.base_url);
        tracing::debug!(%url, "requesting puzzle input");
        let response = self
            .client
            .get(&url)
            .send()
            .with_context(|| format!("GET {url} failed"))?;
        let response = ensure_success(&url, response)?;
        let bytes = response
            .bytes()
            .with_context(|| format!("failed to read body of {url}"))?;
        Ok(bytes.to_vec())
    }

    fn post_answer(&self, key: &PuzzleKey, part: Part, answer: &str) -> Result<String> {
        let url = key.answer_url(&self.base_url);
        let level = part.level().to_string();
        tracing::debug!(%url, part = %part, "posting answer");
        let response = self
            .client
            .post(&url)
            .form(&[("level", level.as_str()), ("answer", answer)])
            .send()
            .with_context(|| format!("POST {url} failed"))?;
        let response = ensure_success(&url, response)?;
        response
            .text()
            .with_context(|| format!("failed to read body of {url}"))
    }
}
