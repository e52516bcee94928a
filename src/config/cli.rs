use crate::config::{SiteConfig, SiteSettings};
use crate::domain::ports::ProbeStrategy;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "mineral-cabinet")]
#[command(about = "Static site generator for a mineral specimen collection")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,

    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch the collection sheet and write the static site
    Build(BuildArgs),
    /// Print the view a URL fragment routes to (e.g. "#42")
    Show {
        fragment: String,
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Print the sidebar entries matching a query
    Search {
        query: String,
        #[command(flatten)]
        source: SourceArgs,
    },
}

/// 命令列可覆寫的來源設定
#[derive(Debug, Clone, Default, Args)]
pub struct SourceArgs {
    #[arg(long, help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Published CSV export of the collection sheet")]
    pub sheet_url: Option<String>,

    #[arg(long, help = "Published CSV export of the photo sheet")]
    pub photo_sheet_url: Option<String>,

    #[arg(long, conflicts_with = "image_dir", help = "Probe images with HEAD requests under this URL")]
    pub image_base_url: Option<String>,

    #[arg(long, help = "Probe images in this local directory")]
    pub image_dir: Option<String>,

    #[arg(long, value_enum)]
    pub probe: Option<ProbeStrategy>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct BuildArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[arg(long, help = "Output directory")]
    pub output: Option<String>,

    #[arg(long, help = "Also write site.zip with every generated file")]
    pub archive: bool,
}

impl SourceArgs {
    fn load_config(&self) -> Result<SiteConfig> {
        let config = match &self.config {
            Some(path) => {
                tracing::info!("📄 Loading configuration from: {}", path.display());
                SiteConfig::from_file(path)?
            }
            None => SiteConfig::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// 命令列參數優先於設定檔
    fn apply(&self, config: &mut SiteConfig) {
        if let Some(url) = &self.sheet_url {
            config.source.sheet_url = Some(url.clone());
        }
        if let Some(url) = &self.photo_sheet_url {
            config.source.photo_sheet_url = Some(url.clone());
        }
        if let Some(url) = &self.image_base_url {
            config.images.base_url = Some(url.clone());
            config.images.dir = None;
        }
        if let Some(dir) = &self.image_dir {
            config.images.dir = Some(dir.clone());
            config.images.base_url = None;
        }
        if let Some(probe) = self.probe {
            config.images.probe = Some(probe);
        }
    }

    pub fn settings(&self) -> Result<SiteSettings> {
        let mut config = self.load_config()?;
        self.apply(&mut config);
        SiteSettings::from_config(config)
    }
}

impl BuildArgs {
    pub fn settings(&self) -> Result<SiteSettings> {
        let mut config = self.source.load_config()?;
        self.source.apply(&mut config);
        if let Some(output) = &self.output {
            config.output.path = Some(output.clone());
        }
        if self.archive {
            config.output.archive = Some(true);
        }
        SiteSettings::from_config(config)
    }
}
