use crate::domain::model::{CatalogId, Collection};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SidebarEntry {
    pub id: CatalogId,
    pub label: String,
    pub href: String,
    pub search_text: String,
}

impl SidebarEntry {
    /// Case-insensitive substring match; a blank query matches everything.
    pub fn matches(&self, query: &str) -> bool {
        self.search_text.contains(&query.trim().to_lowercase())
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SidebarView {
    pub entries: Vec<SidebarEntry>,
}

impl SidebarView {
    pub fn build(collection: &Collection) -> Self {
        let entries = collection
            .values()
            .map(|spec| SidebarEntry {
                id: spec.id,
                label: spec.label_or("Unknown"),
                href: format!("#{}", spec.id),
                search_text: spec.search_text(),
            })
            .collect();
        Self { entries }
    }

    pub fn filter(&self, query: &str) -> Vec<CatalogId> {
        self.entries
            .iter()
            .filter(|entry| entry.matches(query))
            .map(|entry| entry.id)
            .collect()
    }
}
