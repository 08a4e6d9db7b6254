use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, COOKIE, HeaderName, HeaderValue, InvalidHeaderValue};

use crate::fetch::client::HttpClient;

/// An [`HttpClient`] wrapper that attaches a credential header to every request.
///
/// The header value is validated once at construction and marked sensitive so
/// it stays out of debug output.
pub struct HeaderAuth<C> {
    inner: C,
    header_name: HeaderName,
    value: HeaderValue,
}

impl<C> HeaderAuth<C> {
    pub fn new(inner: C, header_name: HeaderName, value: &str) -> Result<Self, InvalidHeaderValue> {
        let mut value = HeaderValue::from_str(value)?;
        value.set_sensitive(true);
        Ok(Self {
            inner,
            header_name,
            value,
        })
    }

    /// Sends the browser session cookie copied from a logged-in FPL session.
    pub fn cookie(inner: C, cookie: &str) -> Result<Self, InvalidHeaderValue> {
        Self::new(inner, COOKIE, cookie)
    }

    /// Uses `Authorization: Bearer <token>`.
    pub fn bearer(inner: C, token: &str) -> Result<Self, InvalidHeaderValue> {
        Self::new(inner, AUTHORIZATION, &format!("Bearer {token}"))
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for HeaderAuth<C> {
    async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        req.headers_mut()
            .insert(self.header_name.clone(), self.value.clone());
        self.inner.execute(req).await
    }
}
