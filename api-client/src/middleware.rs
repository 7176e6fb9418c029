use std::time::Instant;

use http::Extensions;
use reqwest::{Request, Response};
use reqwest_middleware::{Middleware, Next};
use tracing::debug;

/// Logs every request with its outcome and latency
pub struct LoggingMiddleware;

#[async_trait::async_trait]
impl Middleware for LoggingMiddleware {
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> reqwest_middleware::Result<Response> {
        let method = req.method().clone();
        let path = req.url().path().to_string();
        let started = Instant::now();

        let res = next.run(req, extensions).await;

        let elapsed = started.elapsed();
        match &res {
            Ok(res) => debug!(%method, path, status = %res.status(), ?elapsed, "request completed"),
            Err(error) => debug!(%method, path, %error, ?elapsed, "request failed"),
        }
        res
    }
}
