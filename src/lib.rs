pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod render;
pub mod utils;
pub mod views;

#[cfg(feature = "cli")]
pub use config::cli::{BuildArgs, Cli, Command, LogFormat, SourceArgs};
pub use config::{SiteConfig, SiteSettings};

pub use adapters::{HttpImageSource, LocalImageSource, LocalStorage};
pub use crate::core::{engine::SiteEngine, pipeline::SitePipeline, site::Site, site::View};
pub use utils::error::{Result, SiteError};
