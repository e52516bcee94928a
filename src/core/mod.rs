pub mod engine;
pub mod loader;
pub mod pipeline;
pub mod probe;
pub mod site;

pub use crate::domain::model::{Collection, RenderedSite, SheetData};
pub use crate::domain::ports::{ConfigProvider, ImageSource, Pipeline, Storage};
pub use crate::utils::error::Result;
