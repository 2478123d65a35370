//! Scripted fetcher for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use hashbrown::HashMap;
use hexfolio_net::{Fetcher, NetError, Request, Response};
use http::{HeaderMap, HeaderValue, StatusCode};

enum Route {
    Ok { content_type: String, body: Bytes },
    Status(u16),
    Fail,
}

/// Fetcher that replays scripted per-URL behavior and records every call.
/// Unrouted URLs fail, simulating an unreachable network.
#[derive(Default)]
pub(crate) struct MockFetcher {
    routes: Mutex<HashMap<String, Route>>,
    calls: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a 200 response for a URL.
    pub fn respond_ok(&self, url: &str, content_type: &str, body: Vec<u8>) {
        self.routes.lock().unwrap().insert(
            url.to_string(),
            Route::Ok {
                content_type: content_type.to_string(),
                body: Bytes::from(body),
            },
        );
    }

    /// Script a non-2xx status for a URL.
    pub fn respond_status(&self, url: &str, status: u16) {
        self.routes
            .lock()
            .unwrap()
            .insert(url.to_string(), Route::Status(status));
    }

    /// Script a network failure for a URL.
    pub fn fail(&self, url: &str) {
        self.routes
            .lock()
            .unwrap()
            .insert(url.to_string(), Route::Fail);
    }

    /// How many times a URL was fetched.
    pub fn calls_for(&self, url: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == url).count()
    }

    /// Total fetch calls across all URLs.
    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, request: &Request) -> Result<Response, NetError> {
        let key = request.url.to_string();
        self.calls.lock().unwrap().push(key.clone());

        match self.routes.lock().unwrap().get(&key) {
            Some(Route::Ok { content_type, body }) => {
                let mut headers = HeaderMap::new();
                if let Ok(value) = HeaderValue::from_str(content_type) {
                    headers.insert(http::header::CONTENT_TYPE, value);
                }
                Ok(Response {
                    url: request.url.clone(),
                    status: StatusCode::OK,
                    headers,
                    body: body.clone(),
                })
            }
            Some(Route::Status(status)) => Ok(Response {
                url: request.url.clone(),
                status: StatusCode::from_u16(*status)
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                headers: HeaderMap::new(),
                body: Bytes::new(),
            }),
            Some(Route::Fail) | None => {
                Err(NetError::RequestFailed(format!("connection refused: {key}")))
            }
        }
    }
}
