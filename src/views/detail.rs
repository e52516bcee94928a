use crate::domain::carousel::{Carousel, CarouselPage};
use crate::domain::model::{CatalogId, CoordinateStatus, Specimen, PLACEHOLDER};
use serde::Serialize;
use url::Url;

pub const DETAIL_MAP_ZOOM: u8 = 10;
pub const INVALID_COORDINATES: &str = "Invalid coordinates.";
pub const NO_COORDINATES: &str = "No coordinates available.";

/// An outbound link; domain and favicon feed the hover preview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    pub label: String,
    pub href: String,
    pub domain: Option<String>,
    pub favicon: Option<String>,
}

impl Link {
    pub fn new(label: impl Into<String>, href: impl Into<String>) -> Self {
        let href = href.into();
        let domain = Url::parse(&href)
            .ok()
            .and_then(|url| url.host_str().map(str::to_string));
        let favicon = domain
            .as_ref()
            .map(|d| format!("https://www.google.com/s2/favicons?domain={}", d));
        Self {
            label: label.into(),
            href,
            domain,
            favicon,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Locality {
    pub text: String,
    pub link: Option<Link>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MapWidget {
    Marker {
        lat: f64,
        lng: f64,
        zoom: u8,
        popup: String,
    },
    Placeholder {
        message: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarouselSlide {
    pub index: usize,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarouselPageView {
    #[serde(flatten)]
    pub page: CarouselPage,
    pub slides: Vec<CarouselSlide>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailView {
    pub id: CatalogId,
    pub heading: String,
    pub mindat_id: String,
    pub species: Vec<Link>,
    pub locality: Locality,
    pub year_acquired: String,
    pub dimensions: String,
    pub source: String,
    pub notes: String,
    pub coordinates: String,
    pub description: String,
    pub images: Vec<String>,
    pub pages: Vec<CarouselPageView>,
    pub map: MapWidget,
}

/// 物種名稱與資訊連結依序配對，連結不足時用第一個
fn species_links(spec: &Specimen) -> Vec<Link> {
    let names = spec.species();
    let links = spec.species_info_links();
    match (names.is_empty(), links.first()) {
        (_, None) => Vec::new(),
        (false, Some(first)) => names
            .iter()
            .enumerate()
            .map(|(i, name)| Link::new(*name, *links.get(i).unwrap_or(first)))
            .collect(),
        (true, Some(_)) => links.iter().map(|url| Link::new(*url, *url)).collect(),
    }
}

fn map_widget(spec: &Specimen) -> MapWidget {
    match spec.coordinates() {
        CoordinateStatus::Valid(c) => MapWidget::Marker {
            lat: c.lat,
            lng: c.lng,
            zoom: DETAIL_MAP_ZOOM,
            popup: spec
                .locality()
                .map(str::to_string)
                .unwrap_or_else(|| format!("Catalog {}", spec.id)),
        },
        CoordinateStatus::Invalid => MapWidget::Placeholder {
            message: INVALID_COORDINATES,
        },
        CoordinateStatus::Missing => MapWidget::Placeholder {
            message: NO_COORDINATES,
        },
    }
}

impl DetailView {
    pub fn build(spec: &Specimen, images: &[String], page_size: usize) -> Self {
        let pages = Carousel::new(images.len(), page_size)
            .pages()
            .into_iter()
            .map(|page| CarouselPageView {
                slides: (page.start..page.end)
                    .map(|index| CarouselSlide {
                        index,
                        url: images[index].clone(),
                    })
                    .collect(),
                page,
            })
            .collect();

        let locality_text = spec.display("Locality").to_string();
        let locality = Locality {
            link: spec
                .mindat_locality()
                .map(|href| Link::new(locality_text.clone(), href)),
            text: locality_text,
        };

        Self {
            id: spec.id,
            heading: spec.label_or(&format!("Catalog {}", spec.id)),
            mindat_id: spec.display("MinID").to_string(),
            species: species_links(spec),
            locality,
            year_acquired: spec
                .year_acquired()
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
            dimensions: spec.display("Dimensions").to_string(),
            source: spec.display("Specimen Source").to_string(),
            notes: spec.display("Notes").to_string(),
            coordinates: spec.display("Coordinates").to_string(),
            description: spec.description().unwrap_or_default().to_string(),
            images: images.to_vec(),
            pages,
            map: map_widget(spec),
        }
    }

    pub fn marker(&self) -> Option<(f64, f64)> {
        match self.map {
            MapWidget::Marker { lat, lng, .. } => Some((lat, lng)),
            MapWidget::Placeholder { .. } => None,
        }
    }
}
