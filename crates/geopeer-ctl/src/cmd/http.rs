//! Shared HTTP request helpers for CLI commands.

use anyhow::{Context, Result, bail};
use reqwest::{Method, Response};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
struct MessageBody {
    message: String,
}

pub fn api_url(base: &str, path: &str) -> String {
    format!("{}/api{}", base.trim_end_matches('/'), path)
}

pub async fn get_json<T: for<'de> Deserialize<'de>>(url: &str) -> Result<T> {
    let resp = reqwest::get(url)
        .await
        .with_context(|| format!("failed to connect to geopeerd at {}; is it running?", url))?;
    decode(resp).await
}

/// Send a JSON body with any method. The lookup endpoint takes its query as
/// a body on GET, so this is not limited to POST.
pub async fn send_json_body<T, R>(method: Method, url: &str, body: &T) -> Result<R>
where
    T: Serialize,
    R: for<'de> Deserialize<'de>,
{
    let resp = reqwest::Client::new()
        .request(method, url)
        .json(body)
        .send()
        .await
        .with_context(|| format!("failed to connect to geopeerd at {}; is it running?", url))?;
    decode(resp).await
}

/// Non-2xx responses carry `{"message": ...}`; surface it as the error.
async fn decode<R: for<'de> Deserialize<'de>>(resp: Response) -> Result<R> {
    let status = resp.status();
    if !status.is_success() {
        let message = resp
            .json::<MessageBody>()
            .await
            .map(|b| b.message)
            .unwrap_or_else(|_| "no details".to_string());
        bail!("geopeerd returned {}: {}", status, message);
    }
    resp.json::<R>().await.context("failed to parse response")
}
