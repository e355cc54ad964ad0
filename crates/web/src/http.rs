use answer_chart_core::{DataSource, Error, FetchResponse, Result};
use gloo_net::http::Request;

/// `fetch()` through gloo-net
pub struct GlooSource;

impl DataSource for GlooSource {
    async fn fetch(&self, url: &str) -> Result<FetchResponse> {
        let response = Request::get(url)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let status = response.status();
        let body = if response.ok() {
            response
                .text()
                .await
                .map_err(|e| Error::Network(e.to_string()))?
        } else {
            // the body only decorates the status message
            response.text().await.unwrap_or_default()
        };

        Ok(FetchResponse { status, body })
    }
}
