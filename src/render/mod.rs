//! View-models → static HTML through the bundled minijinja templates.

use crate::core::site::Site;
use crate::domain::lightbox::{MAX_SCALE, MIN_SCALE, ZOOM_STEP};
use crate::domain::model::{RenderedSite, SiteFile};
use crate::utils::error::Result;
use crate::views::map::{
    MapPoint, FALLBACK_CENTER, MAX_CLUSTER_RADIUS, OVERVIEW_ZOOM, TILE_ATTRIBUTION, TILE_URL,
};
use minijinja::{context, Environment, Value};
use serde::Serialize;

const TEMPLATES: [(&str, &str); 4] = [
    ("base.html", include_str!("../../templates/base.html")),
    ("index.html", include_str!("../../templates/index.html")),
    ("gallery.html", include_str!("../../templates/gallery.html")),
    ("map.html", include_str!("../../templates/map.html")),
];

const ASSETS: [(&str, &str); 3] = [
    ("assets/site.css", include_str!("../../assets/site.css")),
    ("assets/viewer.js", include_str!("../../assets/viewer.js")),
    ("assets/map.js", include_str!("../../assets/map.js")),
];

#[derive(Debug, Serialize)]
struct MapConfig {
    tile_url: &'static str,
    attribution: &'static str,
    max_cluster_radius: u32,
    zoom: u8,
    fallback_center: [f64; 2],
}

#[derive(Debug, Serialize)]
struct LightboxConfig {
    min_scale: f64,
    max_scale: f64,
    zoom_step: f64,
}

/// 給外部工具用的資料檔
#[derive(Debug, Serialize)]
struct SpecimenData<'a> {
    generated_at: &'a str,
    points: Vec<MapPoint>,
    images: &'a std::collections::BTreeMap<crate::domain::model::CatalogId, Vec<String>>,
}

pub struct Renderer {
    env: Environment<'static>,
}

impl Renderer {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        for (name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    fn shared(&self, site: &Site, generated_at: &str) -> Value {
        context! {
            site_title => &site.title,
            generated_at => generated_at,
            map_attribution => TILE_ATTRIBUTION,
            map_config => MapConfig {
                tile_url: TILE_URL,
                attribution: TILE_ATTRIBUTION,
                max_cluster_radius: MAX_CLUSTER_RADIUS,
                zoom: OVERVIEW_ZOOM,
                fallback_center: [FALLBACK_CENTER.0, FALLBACK_CENTER.1],
            },
            lightbox => LightboxConfig {
                min_scale: MIN_SCALE,
                max_scale: MAX_SCALE,
                zoom_step: ZOOM_STEP,
            },
        }
    }

    pub fn render_index(&self, site: &Site, generated_at: &str) -> Result<String> {
        let ctx = context! {
            sidebar => site.sidebar(),
            stats => site.stats(),
            details => site.details(),
            ..self.shared(site, generated_at)
        };
        Ok(self.env.get_template("index.html")?.render(ctx)?)
    }

    pub fn render_gallery(&self, site: &Site, generated_at: &str) -> Result<String> {
        let ctx = context! {
            gallery => site.gallery(),
            ..self.shared(site, generated_at)
        };
        Ok(self.env.get_template("gallery.html")?.render(ctx)?)
    }

    pub fn render_map(&self, site: &Site, generated_at: &str) -> Result<String> {
        let ctx = context! {
            map => site.map(),
            ..self.shared(site, generated_at)
        };
        Ok(self.env.get_template("map.html")?.render(ctx)?)
    }

    pub fn render_site(&self, site: &Site, generated_at: &str) -> Result<RenderedSite> {
        let mut files = vec![
            SiteFile::text("index.html", self.render_index(site, generated_at)?),
            SiteFile::text("gallery.html", self.render_gallery(site, generated_at)?),
            SiteFile::text("map.html", self.render_map(site, generated_at)?),
        ];
        files.extend(
            ASSETS
                .iter()
                .map(|(path, contents)| SiteFile::text(*path, *contents)),
        );

        let data = SpecimenData {
            generated_at,
            points: site.map().points,
            images: &site.images,
        };
        files.push(SiteFile::text(
            "data/specimens.json",
            serde_json::to_string_pretty(&data)?,
        ));

        Ok(RenderedSite {
            files,
            specimen_count: site.collection.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::loader::parse_collection;
    use crate::domain::model::CatalogId;

    fn site() -> Site {
        let csv = "\
Catalog ID,Specimen Title,Species 1,Species Info,Locality,Coordinates,Notes
3,Rhodochrosite <Alma>,Rhodochrosite,https://www.mindat.org/min-3406.html,Sweet Home Mine,\"39.28,-106.06\",
4,,Azurite,,,,Needs a label
";
        let mut site = Site::new("Cabinet", parse_collection(csv).unwrap());
        site.images.insert(
            CatalogId(3),
            vec![
                "images/3.jpg".to_string(),
                "images/3-2.jpg".to_string(),
                "images/3-3.jpg".to_string(),
            ],
        );
        site
    }

    #[test]
    fn test_index_contains_sidebar_and_details() {
        let html = Renderer::new().unwrap().render_index(&site(), "2024-01-01").unwrap();

        assert!(html.contains(r##"href="#3""##));
        assert!(html.contains(r#"id="specimen-4""#));
        // titles are escaped
        assert!(html.contains("Rhodochrosite &lt;Alma&gt;"));
        assert!(html.contains(r#"data-lat="39.28""#));
        assert!(html.contains("No coordinates available."));
        assert!(html.contains("Needs a label"));
        // attribute values are entity-escaped, so only check the unescaped tail
        assert!(html.contains("favicons?domain=www.mindat.org"));
    }

    #[test]
    fn test_carousel_pages_rendered_with_disabled_bounds() {
        let html = Renderer::new().unwrap().render_index(&site(), "2024-01-01").unwrap();
        assert_eq!(html.matches(r#"class="carousel-page""#).count(), 2);
        assert!(html.contains(r#"data-step="-1" disabled"#));
        assert!(html.contains(r#"data-step="1" disabled"#));
        assert!(html.contains(r#"data-images='["images/3.jpg","images/3-2.jpg","images/3-3.jpg"]'"#));
    }

    #[test]
    fn test_render_site_outputs_all_files() {
        let rendered = Renderer::new().unwrap().render_site(&site(), "2024-01-01").unwrap();
        for path in [
            "index.html",
            "gallery.html",
            "map.html",
            "assets/site.css",
            "assets/viewer.js",
            "assets/map.js",
            "data/specimens.json",
        ] {
            assert!(rendered.file(path).is_some(), "missing {}", path);
        }
        assert_eq!(rendered.specimen_count, 2);

        let data: serde_json::Value =
            serde_json::from_slice(&rendered.file("data/specimens.json").unwrap().contents).unwrap();
        assert_eq!(data["points"].as_array().unwrap().len(), 1);
        assert_eq!(data["images"]["3"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_map_page_lists_filter_options() {
        let html = Renderer::new().unwrap().render_map(&site(), "2024-01-01").unwrap();
        assert!(html.contains(r#"<option value="Rhodochrosite">Rhodochrosite</option>"#));
        assert!(html.contains("SpecimenMap.initCollectionMap()"));
    }

    #[test]
    fn test_lightbox_limits_rendered_for_viewer() {
        let html = Renderer::new().unwrap().render_index(&site(), "2024-01-01").unwrap();
        assert!(html.contains(&format!(r#"data-zoom-step="{}""#, ZOOM_STEP)));
        assert!(html.contains(r#"data-min-scale="1"#));
        assert!(html.contains(r#"data-max-scale="5"#));
    }
}
