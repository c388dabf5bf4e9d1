//! Thin client for the external accrual provider.

use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AccrualResponse {
    #[allow(dead_code)]
    pub order: String,
    pub status: String,
    #[serde(default)]
    pub accrual: Option<Decimal>,
}

#[derive(Debug)]
pub enum PollOutcome {
    Retry429 { retry_after: Option<String> },
    NoContent,
    Decoded(AccrualResponse),
    DecodeError,
    OtherStatus(StatusCode),
}

pub async fn fetch_order(
    client: &Client,
    base_url: &str,
    number: &str,
) -> Result<PollOutcome, reqwest::Error> {
    let url = format!("{}/api/orders/{}", base_url.trim_end_matches('/'), number);
    let response = client.get(url).send().await?;

    match response.status() {
        StatusCode::NO_CONTENT => Ok(PollOutcome::NoContent),
        StatusCode::TOO_MANY_REQUESTS => {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned);
            Ok(PollOutcome::Retry429 { retry_after })
        }
        StatusCode::OK => match response.json::<AccrualResponse>().await {
            Ok(body) => Ok(PollOutcome::Decoded(body)),
            Err(_) => Ok(PollOutcome::DecodeError),
        },
        other => Ok(PollOutcome::OtherStatus(other)),
    }
}
