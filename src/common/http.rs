//! Outbound HTTP capability.
//!
//! Handlers reach the network only through [`HttpClient`], so tests can swap
//! in a canned client while production uses [`ReqwestClient`].

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::Result;

/// Raw response of a GET request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    /// http status code
    pub status: u16,
    /// response body, undecoded
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Issue a GET request to `url` with the given query parameters.
    ///
    /// Any status code is a successful response; only transport failures
    /// surface as errors.
    async fn get(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<HttpResponse>;
}

/// [`HttpClient`] backed by reqwest with its default timeouts.
#[derive(Debug, Clone, Default)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
        }
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn get(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<HttpResponse> {
        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static("accept"), HeaderValue::from_static("application/json"));

        let res = self.client.get(url).headers(headers).query(query).send().await?;
        let status = res.status().as_u16();
        let body = res.bytes().await?.to_vec();

        Ok(HttpResponse {
            status,
            body,
        })
    }
}
