use async_trait::async_trait;
use reqwest::{Request, Response};

/// Sends one prepared request. Wrappers such as [`crate::fetch::auth::HeaderAuth`]
/// decorate a client by implementing this trait around an inner one.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
