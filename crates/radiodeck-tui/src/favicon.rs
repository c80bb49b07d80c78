//! Favicon probe: the terminal stand-in for an `<img>` load.
//!
//! A card's favicon is fetched once, when the card is first highlighted. A
//! failed fetch is the image's load error and makes the card fall back to the
//! bundled image.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::debug;

pub fn probe_client(user_agent: &str) -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(10))
        .build()
}

/// Fetch `url` and check it looks like an image.
pub async fn probe(client: &Client, url: &str) -> anyhow::Result<()> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        anyhow::bail!("favicon {} returned {}", url, status);
    }
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_ascii_lowercase();
    // some servers omit the header; accept those
    if !content_type.is_empty() && !content_type.starts_with("image/") {
        anyhow::bail!("favicon {} is {}", url, content_type);
    }
    let body = response.bytes().await?;
    if body.is_empty() {
        anyhow::bail!("favicon {} is empty", url);
    }
    debug!("favicon ok: {} ({} bytes)", url, body.len());
    Ok(())
}
