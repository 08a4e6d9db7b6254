//! Recording [`HttpClient`] that serves canned bodies by url.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::header::HeaderMap;

use super::HttpClient;

#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub url: String,
    pub headers: HeaderMap,
}

/// Answers known urls with 200 and their body, anything else with 404.
/// Clones share the request log.
#[derive(Clone)]
pub struct Recorder {
    bodies: Arc<HashMap<String, String>>,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

impl Recorder {
    pub fn new(bodies: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            bodies: Arc::new(bodies.into_iter().collect()),
            seen: Arc::default(),
        }
    }

    pub fn seen(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }

    pub fn urls(&self) -> Vec<String> {
        self.seen().into_iter().map(|r| r.url).collect()
    }
}

#[async_trait]
impl HttpClient for Recorder {
    async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        let url = req.url().to_string();
        self.seen.lock().unwrap().push(SeenRequest {
            url: url.clone(),
            headers: req.headers().clone(),
        });
        let resp = match self.bodies.get(&url) {
            Some(body) => http::Response::builder().status(200).body(body.clone()),
            None => http::Response::builder().status(404).body(String::new()),
        }
        .unwrap();
        Ok(reqwest::Response::from(resp))
    }
}
