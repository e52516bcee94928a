use crate::domain::model::{CatalogId, Collection};
use crate::views::map::MapView;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Landing view shown when no specimen is selected.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsView {
    pub total_specimens: usize,
    pub unique_species: usize,
    pub total_images: u64,
    pub map: MapView,
}

impl StatsView {
    pub fn build(collection: &Collection, first_images: &BTreeMap<CatalogId, String>) -> Self {
        let unique_species: HashSet<&str> = collection
            .values()
            .flat_map(|spec| spec.species())
            .collect();

        // 沒有照片數欄位的標本算一張
        let total_images = collection
            .values()
            .map(|spec| u64::from(spec.photo_count().unwrap_or(1)))
            .sum();

        Self {
            total_specimens: collection.len(),
            unique_species: unique_species.len(),
            total_images,
            map: MapView::build(collection, first_images),
        }
    }
}
