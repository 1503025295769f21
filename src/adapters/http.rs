use crate::utils::error::{FlightsError, Result};
use reqwest::{Client, RequestBuilder};

/// 送出請求並讀取完整回應內容；非 2xx 狀態視為傳輸錯誤
pub async fn fetch_text(request: RequestBuilder) -> Result<String> {
    let response = request.send().await?;
    let status = response.status();
    let url = response.url().to_string();

    tracing::debug!("Response from {}: {}", url, status);

    if !status.is_success() {
        return Err(FlightsError::HttpStatus {
            url,
            status: status.as_u16(),
        });
    }

    let body = response.text().await?;
    tracing::debug!("Read {} bytes", body.len());
    Ok(body)
}

pub async fn get_text(client: &Client, url: &str) -> Result<String> {
    tracing::debug!("Making API request to: {}", url);
    fetch_text(client.get(url)).await
}
