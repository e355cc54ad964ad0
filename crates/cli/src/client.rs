//! Blocking client for the answer data endpoint

use answer_chart_core::{FetchResponse, LoaderConfig, SeriesPayload};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use url::Url;

use crate::error::Result;

pub struct AnswerClient {
    client: reqwest::blocking::Client,
    base_url: Url,
    config: LoaderConfig,
}

impl AnswerClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("answer-chart"));

        let client = reqwest::blocking::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: Url::parse(base_url)?,
            config: LoaderConfig::default(),
        })
    }

    pub fn url_for(&self, answer_id: &str) -> Result<Url> {
        Ok(self.base_url.join(&self.config.url_for(answer_id))?)
    }

    /// GET the series, with the same status and parse rules as the browser.
    pub fn fetch(&self, answer_id: &str) -> Result<SeriesPayload> {
        let url = self.url_for(answer_id)?;
        let response = self.client.get(url).send()?;

        let status = response.status().as_u16();
        let body = response.text().unwrap_or_default();

        Ok(parse_response(FetchResponse { status, body })?)
    }
}

fn parse_response(response: FetchResponse) -> answer_chart_core::Result<SeriesPayload> {
    if !response.is_success() {
        return Err(answer_chart_core::Error::HttpStatus {
            status: response.status,
            body: response.body,
        });
    }
    SeriesPayload::from_json(&response.body)
}

/// Human-readable summary printed by `answer-chart fetch`
pub fn summarize(answer_id: &str, payload: &SeriesPayload) -> String {
    let labels = payload.labels();
    let mut out = format!("answer {}: {} points", answer_id, payload.len());

    if let (Some(first), Some(last)) = (labels.first(), labels.last()) {
        out.push_str(&format!("\n  x: {} .. {}", first, last));
    }
    match payload.value_range() {
        Some((min, max)) => out.push_str(&format!("\n  y: {:.3} .. {:.3}", min, max)),
        None => out.push_str("\n  y: (no values)"),
    }
    let gaps = payload.y.iter().filter(|v| v.is_none()).count();
    if gaps > 0 {
        out.push_str(&format!("\n  gaps: {}", gaps));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_url_for_replaces_path() {
        let client = AnswerClient::new("http://127.0.0.1:5000/app/").unwrap();
        assert_eq!(
            client.url_for("7").unwrap().as_str(),
            "http://127.0.0.1:5000/api/answer-data/7"
        );
    }

    #[test]
    fn test_parse_response_rules() {
        let err = parse_response(FetchResponse {
            status: 404,
            body: r#"{"error": "no data for this answer"}"#.to_string(),
        })
        .unwrap_err();
        assert_eq!(
            err.notice().text,
            r#"Impossible de charger le graphique (status 404) {"error": "no data for this answer"}"#
        );

        let payload = parse_response(FetchResponse {
            status: 200,
            body: r#"{"x": [1, 2], "y": [3, 4]}"#.to_string(),
        })
        .unwrap();
        assert_eq!(payload.len(), 2);
    }

    #[test]
    fn test_summarize() {
        let payload = SeriesPayload::from_json(r#"{"x": [1, 2, 3], "y": [10, null, 15]}"#).unwrap();
        assert_eq!(
            summarize("7", &payload),
            "answer 7: 3 points\n  x: 1 .. 3\n  y: 10.000 .. 15.000\n  gaps: 1"
        );
    }
}
