use crate::domain::model::{RenderedSite, SheetData};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::future::Future;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(&self, path: &str, data: &[u8]) -> impl Future<Output = Result<()>> + Send;
}

/// 圖片是否存在；任何錯誤都視為不存在
pub trait ImageSource: Send + Sync {
    fn exists(&self, path: &str) -> impl Future<Output = bool> + Send;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum ProbeStrategy {
    /// Stop at the first index with no image.
    #[default]
    Contiguous,
    /// Check every index up to the ceiling, keeping gaps out of the result.
    Exhaustive,
}

pub trait ConfigProvider: Send + Sync {
    fn site_title(&self) -> &str;
    fn sheet_url(&self) -> &str;
    fn photo_sheet_url(&self) -> Option<&str>;
    fn request_timeout_seconds(&self) -> u64;
    fn output_path(&self) -> &str;
    /// 以 HEAD 檢查圖片的網站根網址；未設定時改查本機目錄
    fn image_base_url(&self) -> Option<&str>;
    fn image_dir(&self) -> &str;
    fn image_extensions(&self) -> &[String];
    fn max_images(&self) -> usize;
    fn probe_strategy(&self) -> ProbeStrategy;
    fn placeholder_image(&self) -> &str;
    fn concurrent_requests(&self) -> usize;
    fn page_size(&self) -> usize;
    fn archive(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<SheetData>;
    async fn transform(&self, data: SheetData) -> Result<RenderedSite>;
    async fn load(&self, site: RenderedSite) -> Result<String>;
}
