#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

pub use toml_config::SiteConfig;

use crate::core::probe::{DEFAULT_EXTENSIONS, DEFAULT_MAX_IMAGES, DEFAULT_PLACEHOLDER};
use crate::domain::carousel::DEFAULT_PAGE_SIZE;
use crate::domain::ports::{ConfigProvider, ProbeStrategy};
use crate::utils::error::{Result, SiteError};
use crate::utils::validation::{
    validate_extensions, validate_path, validate_positive_number, validate_range,
    validate_required_field, validate_url, Validate,
};
use serde::Serialize;

pub const DEFAULT_TITLE: &str = "Mineral Collection";
pub const DEFAULT_OUTPUT_PATH: &str = "./site";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_CONCURRENT_REQUESTS: usize = 5;

/// Fully resolved settings handed to the pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct SiteSettings {
    pub title: String,
    pub sheet_url: String,
    pub photo_sheet_url: Option<String>,
    pub request_timeout_seconds: u64,
    pub image_base_url: Option<String>,
    pub image_dir: String,
    pub extensions: Vec<String>,
    pub max_images: usize,
    pub probe: ProbeStrategy,
    pub placeholder: String,
    pub concurrent_requests: usize,
    pub page_size: usize,
    pub output_path: String,
    pub archive: bool,
}

impl SiteSettings {
    /// 補上預設值；`source.sheet_url` 為必填
    pub fn from_config(config: SiteConfig) -> Result<Self> {
        let sheet_url = validate_required_field("source.sheet_url", &config.source.sheet_url)?.clone();
        let output_path = config
            .output
            .path
            .unwrap_or_else(|| DEFAULT_OUTPUT_PATH.to_string());
        // 沒有指定圖片來源時，到輸出目錄找 images/
        let image_dir = config.images.dir.unwrap_or_else(|| output_path.clone());

        let settings = Self {
            title: config.site.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            sheet_url,
            photo_sheet_url: config.source.photo_sheet_url,
            request_timeout_seconds: config
                .source
                .request_timeout_seconds
                .unwrap_or(DEFAULT_TIMEOUT_SECONDS),
            image_base_url: config.images.base_url,
            image_dir,
            extensions: config
                .images
                .extensions
                .unwrap_or_else(|| DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect()),
            max_images: config.images.max_images.unwrap_or(DEFAULT_MAX_IMAGES),
            probe: config.images.probe.unwrap_or_default(),
            placeholder: config
                .images
                .placeholder
                .unwrap_or_else(|| DEFAULT_PLACEHOLDER.to_string()),
            concurrent_requests: config
                .images
                .concurrent_requests
                .unwrap_or(DEFAULT_CONCURRENT_REQUESTS),
            page_size: config.carousel.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            output_path,
            archive: config.output.archive.unwrap_or(false),
        };
        settings.validate()?;
        Ok(settings)
    }
}

impl Validate for SiteSettings {
    fn validate(&self) -> Result<()> {
        validate_url("source.sheet_url", &self.sheet_url)?;
        if let Some(url) = &self.photo_sheet_url {
            validate_url("source.photo_sheet_url", url)?;
        }
        if let Some(url) = &self.image_base_url {
            validate_url("images.base_url", url)?;
        }
        validate_path("output.path", &self.output_path)?;
        validate_extensions("images.extensions", &self.extensions)?;
        validate_positive_number("images.max_images", self.max_images, 1)?;
        validate_range("images.concurrent_requests", self.concurrent_requests, 1, 50)?;
        validate_positive_number("carousel.page_size", self.page_size, 1)?;
        validate_range("source.request_timeout_seconds", self.request_timeout_seconds, 1, 600)?;

        if self.placeholder.trim().is_empty() {
            return Err(SiteError::ConfigValidationError {
                field: "images.placeholder".to_string(),
                message: "Placeholder image path cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}

impl ConfigProvider for SiteSettings {
    fn site_title(&self) -> &str {
        &self.title
    }

    fn sheet_url(&self) -> &str {
        &self.sheet_url
    }

    fn photo_sheet_url(&self) -> Option<&str> {
        self.photo_sheet_url.as_deref()
    }

    fn request_timeout_seconds(&self) -> u64 {
        self.request_timeout_seconds
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn image_base_url(&self) -> Option<&str> {
        self.image_base_url.as_deref()
    }

    fn image_dir(&self) -> &str {
        &self.image_dir
    }

    fn image_extensions(&self) -> &[String] {
        &self.extensions
    }

    fn max_images(&self) -> usize {
        self.max_images
    }

    fn probe_strategy(&self) -> ProbeStrategy {
        self.probe
    }

    fn placeholder_image(&self) -> &str {
        &self.placeholder
    }

    fn concurrent_requests(&self) -> usize {
        self.concurrent_requests
    }

    fn page_size(&self) -> usize {
        self.page_size
    }

    fn archive(&self) -> bool {
        self.archive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_sheet() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.source.sheet_url = Some("https://sheets.example.com/export.csv".to_string());
        config
    }

    #[test]
    fn test_defaults_applied() {
        let settings = SiteSettings::from_config(config_with_sheet()).unwrap();

        assert_eq!(settings.site_title(), DEFAULT_TITLE);
        assert_eq!(settings.output_path(), DEFAULT_OUTPUT_PATH);
        assert_eq!(settings.image_dir(), DEFAULT_OUTPUT_PATH);
        assert_eq!(settings.image_extensions().len(), 5);
        assert_eq!(settings.max_images(), 5);
        assert_eq!(settings.probe_strategy(), ProbeStrategy::Contiguous);
        assert_eq!(settings.placeholder_image(), "images/test.jpg");
        assert_eq!(settings.page_size(), 2);
        assert!(!settings.archive());
        assert!(settings.image_base_url().is_none());
    }

    #[test]
    fn test_missing_sheet_url() {
        let err = SiteSettings::from_config(SiteConfig::default()).unwrap_err();
        assert!(matches!(err, SiteError::MissingConfigError { field } if field == "source.sheet_url"));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = config_with_sheet();
        config.images.concurrent_requests = Some(0);
        assert!(SiteSettings::from_config(config).is_err());

        let mut config = config_with_sheet();
        config.images.base_url = Some("ftp://images.example.com".to_string());
        assert!(SiteSettings::from_config(config).is_err());

        let mut config = config_with_sheet();
        config.output.path = Some("".to_string());
        assert!(SiteSettings::from_config(config).is_err());
    }

    #[test]
    fn test_explicit_image_dir_kept() {
        let mut config = config_with_sheet();
        config.images.dir = Some("./photos".to_string());
        config.output.path = Some("./public".to_string());

        let settings = SiteSettings::from_config(config).unwrap();
        assert_eq!(settings.image_dir(), "./photos");
        assert_eq!(settings.output_path(), "./public");
    }
}
