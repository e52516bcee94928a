use crate::domain::model::{CatalogId, Collection, Specimen};
use serde::Serialize;
use std::collections::BTreeMap;

pub const FALLBACK_CENTER: (f64, f64) = (20.0, 0.0);
pub const OVERVIEW_ZOOM: u8 = 2;
pub const MAX_CLUSTER_RADIUS: u32 = 40;
pub const TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const TILE_ATTRIBUTION: &str = "&copy; OpenStreetMap contributors";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPoint {
    pub id: CatalogId,
    pub lat: f64,
    pub lng: f64,
    pub title: String,
    pub species: String,
    pub source: String,
    pub locality: String,
    pub label: String,
    pub popup_title: String,
    pub coords_text: String,
    pub image_url: String,
    pub search_text: String,
}

impl MapPoint {
    pub fn from_specimen(spec: &Specimen, image_url: Option<&str>) -> Option<Self> {
        let coordinate = spec.coordinates().valid()?;
        let title = spec.title().unwrap_or_default().to_string();
        let species = spec.species_joined();
        let source = spec.source().unwrap_or_default().to_string();
        let label = spec.label_or("Specimen");
        Some(Self {
            id: spec.id,
            lat: coordinate.lat,
            lng: coordinate.lng,
            popup_title: format!("{} (Cat ID: {})", label, spec.id),
            coords_text: format!("{:.4}, {:.4}", coordinate.lat, coordinate.lng),
            image_url: image_url
                .map(str::to_string)
                .unwrap_or_else(|| format!("images/{}.jpg", spec.id)),
            search_text: format!("{} {} {} {}", spec.id, title, species, source).to_lowercase(),
            locality: spec.locality().unwrap_or_default().to_string(),
            title,
            species,
            source,
            label,
        })
    }
}

/// Free-text plus dropdown filter over the cluster layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapFilter {
    pub query: String,
    pub source: String,
    pub species: String,
}

impl MapFilter {
    pub fn matches(&self, point: &MapPoint) -> bool {
        let text_matches = point
            .search_text
            .contains(&self.query.trim().to_lowercase());
        let source_matches =
            self.source.is_empty() || point.source.to_lowercase() == self.source.to_lowercase();
        let species_matches = self.species.is_empty()
            || point
                .species
                .to_lowercase()
                .contains(&self.species.to_lowercase());
        text_matches && source_matches && species_matches
    }

    /// 重新加入圖層的標記
    pub fn apply(&self, points: &[MapPoint]) -> Vec<CatalogId> {
        points
            .iter()
            .filter(|p| self.matches(p))
            .map(|p| p.id)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub center: (f64, f64),
    pub zoom: u8,
    pub max_cluster_radius: u32,
    pub tile_url: &'static str,
    pub attribution: &'static str,
    pub points: Vec<MapPoint>,
    pub sources: Vec<String>,
    pub species: Vec<String>,
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !value.is_empty() && !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}

impl MapView {
    pub fn build(collection: &Collection, first_images: &BTreeMap<CatalogId, String>) -> Self {
        let points: Vec<MapPoint> = collection
            .values()
            .filter_map(|spec| {
                MapPoint::from_specimen(spec, first_images.get(&spec.id).map(String::as_str))
            })
            .collect();

        let center = if points.is_empty() {
            FALLBACK_CENTER
        } else {
            let n = points.len() as f64;
            (
                points.iter().map(|p| p.lat).sum::<f64>() / n,
                points.iter().map(|p| p.lng).sum::<f64>() / n,
            )
        };

        let mut sources = Vec::new();
        let mut species = Vec::new();
        for point in &points {
            push_unique(&mut sources, &point.source);
            for name in point.species.split(',') {
                push_unique(&mut species, name.trim());
            }
        }

        Self {
            center,
            zoom: OVERVIEW_ZOOM,
            max_cluster_radius: MAX_CLUSTER_RADIUS,
            tile_url: TILE_URL,
            attribution: TILE_ATTRIBUTION,
            points,
            sources,
            species,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::loader::parse_collection;

    fn view() -> MapView {
        let csv = "\
Catalog ID,Specimen Title,Species 1,Species 2,Specimen Source,Coordinates
1,Blue Cap,Elbaite,Quartz,Tucson Show,\"10, 20\"
2,,Azurite,,Self collected,\"30,40\"
3,No map,Calcite,,Tucson Show,
4,Bad map,Calcite,,Tucson Show,\"north,south\"
";
        MapView::build(&parse_collection(csv).unwrap(), &BTreeMap::new())
    }

    #[test]
    fn test_only_valid_coordinates_become_points() {
        let view = view();
        let ids: Vec<i64> = view.points.iter().map(|p| p.id.0).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!((view.points[0].lat, view.points[0].lng), (10.0, 20.0));
        assert_eq!(view.center, (20.0, 30.0));
        assert_eq!(view.points[1].popup_title, "Azurite (Cat ID: 2)");
        assert_eq!(view.points[0].coords_text, "10.0000, 20.0000");
        assert_eq!(view.points[0].image_url, "images/1.jpg");
    }

    #[test]
    fn test_dropdown_options() {
        let view = view();
        assert_eq!(view.sources, vec!["Tucson Show", "Self collected"]);
        assert_eq!(view.species, vec!["Elbaite", "Quartz", "Azurite"]);
    }

    #[test]
    fn test_filter_combines_text_and_dropdowns() {
        let view = view();
        let by_source = MapFilter {
            source: "tucson show".to_string(),
            ..Default::default()
        };
        assert_eq!(by_source.apply(&view.points), vec![CatalogId(1)]);

        let by_species = MapFilter {
            species: "Quartz".to_string(),
            ..Default::default()
        };
        assert_eq!(by_species.apply(&view.points), vec![CatalogId(1)]);

        let text_and_source = MapFilter {
            query: "self".to_string(),
            source: "Tucson Show".to_string(),
            ..Default::default()
        };
        assert!(text_and_source.apply(&view.points).is_empty());

        assert_eq!(MapFilter::default().apply(&view.points).len(), 2);
    }

    #[test]
    fn test_empty_collection_uses_fallback_center() {
        let view = MapView::build(&Collection::new(), &BTreeMap::new());
        assert_eq!(view.center, FALLBACK_CENTER);
        assert!(view.points.is_empty());
    }
}
