use crate::domain::carousel::DEFAULT_PAGE_SIZE;
use crate::domain::model::{CatalogId, Collection};
use crate::domain::route::Route;
use crate::views::{DetailView, GalleryView, MapView, MapWidget, SidebarView, StatsView};
use std::collections::BTreeMap;
use std::fmt;

/// What a route renders to.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Home(StatsView),
    Detail(DetailView),
}

/// Application state: written once after loading and probing, read by
/// every view builder.
#[derive(Debug, Clone)]
pub struct Site {
    pub title: String,
    pub collection: Collection,
    pub images: BTreeMap<CatalogId, Vec<String>>,
    pub first_images: BTreeMap<CatalogId, String>,
    pub placeholder: String,
    pub page_size: usize,
}

impl Site {
    pub fn new(title: impl Into<String>, collection: Collection) -> Self {
        Self {
            title: title.into(),
            collection,
            images: BTreeMap::new(),
            first_images: BTreeMap::new(),
            placeholder: crate::core::probe::DEFAULT_PLACEHOLDER.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn images_for(&self, id: CatalogId) -> &[String] {
        self.images.get(&id).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn navigate(&self, route: Route) -> View {
        match route {
            Route::Specimen(id) => match self.detail(id) {
                Some(detail) => View::Detail(detail),
                None => {
                    tracing::debug!("No specimen {}, showing home", id);
                    View::Home(self.stats())
                }
            },
            Route::Home => View::Home(self.stats()),
        }
    }

    pub fn navigate_fragment(&self, fragment: &str) -> View {
        self.navigate(Route::from_fragment(fragment))
    }

    pub fn detail(&self, id: CatalogId) -> Option<DetailView> {
        let spec = self.collection.get(&id)?;
        Some(DetailView::build(spec, self.images_for(id), self.page_size))
    }

    pub fn details(&self) -> Vec<DetailView> {
        self.collection
            .values()
            .map(|spec| DetailView::build(spec, self.images_for(spec.id), self.page_size))
            .collect()
    }

    pub fn sidebar(&self) -> SidebarView {
        SidebarView::build(&self.collection)
    }

    pub fn stats(&self) -> StatsView {
        StatsView::build(&self.collection, &self.first_images)
    }

    pub fn gallery(&self) -> GalleryView {
        GalleryView::build(
            &self.collection,
            &self.first_images,
            &self.images,
            &self.placeholder,
        )
    }

    pub fn map(&self) -> MapView {
        MapView::build(&self.collection, &self.first_images)
    }
}

/// 命令列 `show` 的純文字輸出
impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Home(stats) => {
                writeln!(f, "Total specimens: {}", stats.total_specimens)?;
                writeln!(f, "Unique species: {}", stats.unique_species)?;
                writeln!(f, "Total images: {}", stats.total_images)?;
                write!(f, "Mapped specimens: {}", stats.map.points.len())
            }
            View::Detail(detail) => {
                writeln!(f, "{}", detail.heading)?;
                writeln!(f, "Catalog ID: {}", detail.id)?;
                writeln!(f, "Mindat ID: {}", detail.mindat_id)?;
                let species: Vec<&str> = detail.species.iter().map(|s| s.label.as_str()).collect();
                if !species.is_empty() {
                    writeln!(f, "Species: {}", species.join(", "))?;
                }
                writeln!(f, "Locality: {}", detail.locality.text)?;
                writeln!(f, "Year Acquired: {}", detail.year_acquired)?;
                writeln!(f, "Dimensions: {}", detail.dimensions)?;
                writeln!(f, "Source: {}", detail.source)?;
                writeln!(f, "Notes: {}", detail.notes)?;
                writeln!(f, "Coordinates: {}", detail.coordinates)?;
                match &detail.map {
                    MapWidget::Marker { lat, lng, .. } => writeln!(f, "Map: {}, {}", lat, lng)?,
                    MapWidget::Placeholder { message } => writeln!(f, "Map: {}", message)?,
                }
                write!(f, "Images: {}", detail.images.len())?;
                for image in &detail.images {
                    write!(f, "\n  {}", image)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::loader::parse_collection;

    fn site() -> Site {
        let csv = "\
Catalog ID,Specimen Title,Species 1
17,Smoky Quartz Scepter,Quartz
18,,Azurite
";
        Site::new("Test", parse_collection(csv).unwrap())
    }

    #[test]
    fn test_fragment_renders_specimen_detail() {
        match site().navigate_fragment("#17") {
            View::Detail(detail) => {
                assert_eq!(detail.id, CatalogId(17));
                assert_eq!(detail.heading, "Smoky Quartz Scepter");
            }
            other => panic!("expected detail view, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_or_blank_fragment_renders_home() {
        let site = site();
        assert!(matches!(site.navigate_fragment(""), View::Home(stats) if stats.total_specimens == 2));
        assert!(matches!(site.navigate_fragment("#999"), View::Home(_)));
        assert!(matches!(site.navigate_fragment("#about"), View::Home(_)));
    }

    #[test]
    fn test_view_text_output() {
        let site = site();
        let text = site.navigate_fragment("#17").to_string();
        assert!(text.starts_with("Smoky Quartz Scepter\nCatalog ID: 17"));
        assert!(text.contains("Map: No coordinates available."));
        assert!(text.ends_with("Images: 0"));

        let home = site.navigate_fragment("").to_string();
        assert!(home.contains("Total specimens: 2"));
    }
}
