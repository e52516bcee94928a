use crate::domain::ports::ProbeStrategy;
use crate::utils::error::{Result, SiteError};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default)]
    pub site: SiteSection,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub images: ImagesConfig,
    #[serde(default)]
    pub carousel: CarouselConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteSection {
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    pub sheet_url: Option<String>,
    pub photo_sheet_url: Option<String>,
    pub request_timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImagesConfig {
    pub base_url: Option<String>,
    pub dir: Option<String>,
    pub extensions: Option<Vec<String>>,
    pub max_images: Option<usize>,
    pub probe: Option<ProbeStrategy>,
    pub placeholder: Option<String>,
    pub concurrent_requests: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CarouselConfig {
    pub page_size: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: Option<String>,
    pub archive: Option<bool>,
}

impl SiteConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SiteError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| SiteError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SHEET_URL})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::OnceLock;

        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = ENV_VAR.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var regex"));

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }
}

impl Validate for SiteConfig {
    /// 只檢查有填的欄位；必填檢查在合併命令列參數之後
    fn validate(&self) -> Result<()> {
        use crate::utils::validation::{validate_extensions, validate_positive_number, validate_url};

        if let Some(url) = &self.source.sheet_url {
            validate_url("source.sheet_url", url)?;
        }
        if let Some(url) = &self.source.photo_sheet_url {
            validate_url("source.photo_sheet_url", url)?;
        }
        if let Some(url) = &self.images.base_url {
            validate_url("images.base_url", url)?;
        }
        if let Some(extensions) = &self.images.extensions {
            validate_extensions("images.extensions", extensions)?;
        }
        if let Some(max) = self.images.max_images {
            validate_positive_number("images.max_images", max, 1)?;
        }
        if let Some(size) = self.carousel.page_size {
            validate_positive_number("carousel.page_size", size, 1)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[site]
title = "Rocks of the West"

[source]
sheet_url = "https://docs.google.com/spreadsheets/d/abc/gviz/tq?tqx=out:csv&sheet=Database"
request_timeout_seconds = 10

[images]
base_url = "https://rocks.example.org/"
extensions = ["jpg", "png"]
max_images = 8
probe = "exhaustive"

[carousel]
page_size = 3

[output]
path = "./public"
archive = true
"#;

        let config = SiteConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.site.title.as_deref(), Some("Rocks of the West"));
        assert_eq!(config.images.probe, Some(ProbeStrategy::Exhaustive));
        assert_eq!(config.images.max_images, Some(8));
        assert_eq!(config.carousel.page_size, Some(3));
        assert_eq!(config.output.archive, Some(true));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = SiteConfig::from_toml_str("").unwrap();
        assert!(config.source.sheet_url.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("MINERAL_CABINET_TEST_SHEET", "https://sheets.example.com/export.csv");

        let config = SiteConfig::from_toml_str(
            r#"
[source]
sheet_url = "${MINERAL_CABINET_TEST_SHEET}"
"#,
        )
        .unwrap();
        assert_eq!(
            config.source.sheet_url.as_deref(),
            Some("https://sheets.example.com/export.csv")
        );

        std::env::remove_var("MINERAL_CABINET_TEST_SHEET");
    }

    #[test]
    fn test_config_validation() {
        let config = SiteConfig::from_toml_str(
            r#"
[source]
sheet_url = "not-a-url"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config = SiteConfig::from_toml_str("[carousel]\npage_size = 0\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_probe_strategy_is_parse_error() {
        let err = SiteConfig::from_toml_str("[images]\nprobe = \"random\"\n").unwrap_err();
        assert!(matches!(err, SiteError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[site]\ntitle = \"File Cabinet\"\n")
            .unwrap();

        let config = SiteConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.site.title.as_deref(), Some("File Cabinet"));
    }
}
