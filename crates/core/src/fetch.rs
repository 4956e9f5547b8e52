//! Page retrieval.
//!
//! [`PageSource`] is the seam between the change detector and the network. The production
//! implementation is a blocking `reqwest` client that asks every cache on the way to
//! revalidate.

use crate::constants::USER_AGENT;
use crate::{FetchError, FetchResult};
use reqwest::blocking::{Client, ClientBuilder};
use reqwest::header::{HeaderMap, HeaderValue, CACHE_CONTROL, PRAGMA};

/// Anything that can return the current body of a page.
pub trait PageSource {
    fn fetch(&self, url: &str) -> FetchResult<String>;
}

/// Blocking HTTP page source with caching disabled.
///
/// Uses the transport's default timeouts. Non-2xx responses are errors.
#[derive(Clone, Debug)]
pub struct HttpPageSource {
    client: Client,
}

impl HttpPageSource {
    pub fn new() -> FetchResult<Self> {
        let client = client_builder().build().map_err(FetchError::Client)?;
        Ok(Self { client })
    }
}

fn client_builder() -> ClientBuilder {
    Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(no_cache_headers())
}

impl PageSource for HttpPageSource {
    fn fetch(&self, url: &str) -> FetchResult<String> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response.text().map_err(|source| FetchError::Body {
            url: url.to_string(),
            source,
        })?;
        tracing::debug!(%status, bytes = body.len(), "fetched page");
        Ok(body)
    }
}

fn no_cache_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    headers
}
