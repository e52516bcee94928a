// View-models: plain data built from the collection, rendered by `render`.

pub mod detail;
pub mod gallery;
pub mod map;
pub mod sidebar;
pub mod stats;

pub use detail::{DetailView, MapWidget};
pub use gallery::GalleryView;
pub use map::{MapFilter, MapView};
pub use sidebar::SidebarView;
pub use stats::StatsView;
