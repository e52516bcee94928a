// Adapters layer: concrete implementations for external systems (http, filesystem).

pub mod http;
pub mod storage;

pub use http::HttpImageSource;
pub use storage::{LocalImageSource, LocalStorage};
