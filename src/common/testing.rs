//! Canned HTTP clients for tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::{
    FlowError, Result,
    common::{HttpClient, HttpResponse},
};

/// A GET request as seen by [`StubHttpClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub url: String,
    pub query: Vec<(String, String)>,
}

impl RecordedRequest {
    pub fn param(
        &self,
        key: &str,
    ) -> Option<&str> {
        self.query.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }
}

/// Replays one response for every request and records what it was asked.
pub struct StubHttpClient {
    response: Result<HttpResponse>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl StubHttpClient {
    pub fn respond(
        status: u16,
        body: &str,
    ) -> Self {
        Self {
            response: Ok(HttpResponse {
                status,
                body: body.as_bytes().to_vec(),
            }),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn unreachable(message: &str) -> Self {
        Self {
            response: Err(FlowError::Http(message.to_string())),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpClient for StubHttpClient {
    async fn get(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push(RecordedRequest {
            url: url.to_string(),
            query: query.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        });
        self.response.clone()
    }
}
