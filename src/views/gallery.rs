use crate::domain::model::{CatalogId, Collection};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GalleryCard {
    pub id: CatalogId,
    pub label: String,
    pub caption: String,
    pub href: String,
    pub image_url: String,
    pub alt: String,
    pub search_text: String,
    pub images: Vec<String>,
}

impl GalleryCard {
    pub fn matches(&self, query: &str) -> bool {
        self.search_text.contains(&query.trim().to_lowercase())
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GalleryView {
    pub cards: Vec<GalleryCard>,
}

impl GalleryView {
    pub fn build(
        collection: &Collection,
        first_images: &BTreeMap<CatalogId, String>,
        images: &BTreeMap<CatalogId, Vec<String>>,
        placeholder: &str,
    ) -> Self {
        let cards = collection
            .values()
            .map(|spec| {
                let label = spec.label_or("Specimen");
                GalleryCard {
                    id: spec.id,
                    caption: format!("Catalog ID: {}", spec.id),
                    href: format!("index.html#{}", spec.id),
                    image_url: first_images
                        .get(&spec.id)
                        .cloned()
                        .unwrap_or_else(|| placeholder.to_string()),
                    alt: spec
                        .description()
                        .map(str::to_string)
                        .unwrap_or_else(|| label.clone()),
                    search_text: spec.search_text(),
                    images: images.get(&spec.id).cloned().unwrap_or_default(),
                    label,
                }
            })
            .collect();
        Self { cards }
    }

    pub fn filter(&self, query: &str) -> Vec<CatalogId> {
        self.cards
            .iter()
            .filter(|card| card.matches(query))
            .map(|card| card.id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::loader::parse_collection;

    #[test]
    fn test_cards_and_filter() {
        let csv = "\
Catalog ID,Specimen Title,Species 1,Description
5,,Wulfenite,Orange plates on matrix
6,Fluorite Cube,Fluorite,
";
        let collection = parse_collection(csv).unwrap();
        let mut first = BTreeMap::new();
        first.insert(CatalogId(5), "images/5.png".to_string());

        let view = GalleryView::build(&collection, &first, &BTreeMap::new(), "images/test.jpg");

        assert_eq!(view.cards[0].label, "Wulfenite");
        assert_eq!(view.cards[0].alt, "Orange plates on matrix");
        assert_eq!(view.cards[0].image_url, "images/5.png");
        assert_eq!(view.cards[1].image_url, "images/test.jpg");
        assert_eq!(view.cards[1].alt, "Fluorite Cube");
        assert_eq!(view.cards[1].href, "index.html#6");
        assert_eq!(view.cards[1].caption, "Catalog ID: 6");

        assert_eq!(view.filter("CUBE"), vec![CatalogId(6)]);
        assert_eq!(view.filter("wulf"), vec![CatalogId(5)]);
        assert!(view.filter("orange").is_empty());
    }
}
