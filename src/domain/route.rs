use crate::domain::model::{parse_int_prefix, CatalogId};

/// What the URL fragment selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Specimen(CatalogId),
}

impl Route {
    /// `"#12"`, `"12"` and `"#12abc"` route to specimen 12; anything without a
    /// leading integer routes home.
    pub fn from_fragment(fragment: &str) -> Self {
        let raw = fragment.strip_prefix('#').unwrap_or(fragment);
        parse_int_prefix(raw)
            .map(|v| Route::Specimen(CatalogId(v)))
            .unwrap_or(Route::Home)
    }

    pub fn fragment(&self) -> String {
        match self {
            Route::Home => String::new(),
            Route::Specimen(id) => format!("#{}", id),
        }
    }
}
