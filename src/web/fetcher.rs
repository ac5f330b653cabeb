use std::time::Duration;
use tracing::debug;
use url::Url;
use crate::core::config::Config;

/// Source of raw page markup for the crawler.
pub trait Fetcher: Send + Sync {
    /// Returns the page body, or `None` when the page could not be fetched
    /// or is not HTML.
    fn fetch(&self, url: &Url) -> Option<String>;
}

/// Blocking HTTP(S) fetcher following a bounded number of redirects.
pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl HttpFetcher {
    pub fn new(redirects: u32, timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .max_redirects(redirects)
            .http_status_as_error(false)
            .build();
        HttpFetcher {
            agent: ureq::Agent::new_with_config(config),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.fetch_redirects, config.fetch_timeout())
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &Url) -> Option<String> {
        let mut response = match self.agent.get(url.as_str()).call() {
            Ok(response) => response,
            Err(e) => {
                debug!(%url, "request failed: {}", e);
                return None;
            }
        };

        let status = response.status();
        if status.as_u16() != 200 {
            debug!(%url, status = status.as_u16(), "unexpected status");
            return None;
        }

        let is_html = response
            .headers()
            .get("content-type")
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.to_ascii_lowercase().starts_with("text/html"));
        if !is_html {
            debug!(%url, "not an HTML page");
            return None;
        }

        match response.body_mut().read_to_string() {
            Ok(body) => Some(body),
            Err(e) => {
                debug!(%url, "failed to read body: {}", e);
                None
            }
        }
    }
}
