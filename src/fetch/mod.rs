mod client;
mod basic;
pub mod auth;
#[cfg(test)]
pub(crate) mod testing;

pub use client::HttpClient;
pub use basic::BasicClient;

use crate::error::FetchError;

/// GETs `url` and returns the body of a successful response.
pub async fn fetch_bytes<C: HttpClient + ?Sized>(client: &C, url: &str) -> Result<Vec<u8>, FetchError> {
    let parsed = reqwest::Url::parse(url).map_err(|e| FetchError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    let req = reqwest::Request::new(reqwest::Method::GET, parsed);

    let transport = |source| FetchError::Transport {
        url: url.to_string(),
        source,
    };
    let resp = client.execute(req).await.map_err(transport)?;

    let status = resp.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    Ok(resp.bytes().await.map_err(transport)?.to_vec())
}
