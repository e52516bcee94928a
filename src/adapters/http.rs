use crate::domain::ports::ImageSource;
use crate::utils::error::{Result, SiteError};
use reqwest::Client;
use std::time::Duration;
use url::Url;

pub fn build_client(timeout_seconds: u64) -> Result<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .build()?;
    Ok(client)
}

/// GET a published sheet and return its body.
pub async fn fetch_text(client: &Client, url: &str) -> Result<String> {
    tracing::debug!("Fetching {}", url);
    let response = client.get(url).send().await?;
    let status = response.status();
    tracing::debug!("Response status: {}", status);

    if !status.is_success() {
        return Err(SiteError::HttpStatusError {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(response.text().await?)
}

/// Checks images with HEAD requests against the deployed site.
#[derive(Debug, Clone)]
pub struct HttpImageSource {
    client: Client,
    base_url: Url,
}

impl HttpImageSource {
    pub fn new(client: Client, base_url: &str) -> Result<Self> {
        let mut base_url = Url::parse(base_url).map_err(|e| SiteError::InvalidConfigValueError {
            field: "images.base_url".to_string(),
            value: base_url.to_string(),
            reason: e.to_string(),
        })?;
        // 確保 join 時保留最後一段路徑
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { client, base_url })
    }
}

impl ImageSource for HttpImageSource {
    async fn exists(&self, path: &str) -> bool {
        let Ok(url) = self.base_url.join(path) else {
            return false;
        };
        match self.client.head(url.clone()).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!("HEAD {} failed: {}", url, e);
                false
            }
        }
    }
}
