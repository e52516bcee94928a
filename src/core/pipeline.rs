use crate::adapters::http::{build_client, fetch_text, HttpImageSource};
use crate::adapters::storage::LocalImageSource;
use crate::core::loader::{parse_collection, parse_photo_manifest};
use crate::core::probe::ImageResolver;
use crate::core::site::Site;
use crate::core::{ConfigProvider, ImageSource, Pipeline, RenderedSite, SheetData, Storage};
use crate::domain::model::{CatalogId, Collection, PhotoManifest, SiteFile};
use crate::render::Renderer;
use crate::utils::error::{Result, SiteError};
use reqwest::Client;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

pub const ARCHIVE_NAME: &str = "site.zip";

/// Sheet → probed images → rendered pages → output directory.
pub struct SitePipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    client: Client,
}

impl<S: Storage, C: ConfigProvider> SitePipeline<S, C> {
    pub fn new(storage: S, config: C) -> Result<Self> {
        let client = build_client(config.request_timeout_seconds())?;
        Ok(Self {
            storage,
            config,
            client,
        })
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    /// Collection plus resolved images, ready for the view builders.
    pub async fn build_site(&self, data: SheetData) -> Result<Site> {
        let SheetData {
            collection,
            manifest,
        } = data;

        let mut site = Site::new(self.config.site_title(), collection);
        site.placeholder = self.config.placeholder_image().to_string();
        site.page_size = self.config.page_size();

        match self.config.image_base_url() {
            Some(base_url) => {
                let source = HttpImageSource::new(self.client.clone(), base_url)?;
                self.resolve_images(&mut site, &manifest, source).await;
            }
            None => {
                let source = LocalImageSource::new(self.config.image_dir());
                self.resolve_images(&mut site, &manifest, source).await;
            }
        }
        Ok(site)
    }

    async fn fetch_collection(&self) -> Result<Collection> {
        let csv_text = fetch_text(&self.client, self.config.sheet_url()).await?;
        tracing::debug!("Sheet downloaded ({} bytes)", csv_text.len());

        match parse_collection(&csv_text) {
            Ok(collection) => Ok(collection),
            // 找不到表頭時照常產生空網站
            Err(e @ SiteError::HeaderNotFound { .. }) => {
                tracing::error!("❌ {}; rendering an empty collection", e);
                Ok(Collection::new())
            }
            Err(e) => Err(e),
        }
    }

    async fn fetch_manifest(&self) -> PhotoManifest {
        let Some(url) = self.config.photo_sheet_url() else {
            return PhotoManifest::default();
        };

        let manifest = match fetch_text(&self.client, url).await {
            Ok(csv_text) => parse_photo_manifest(&csv_text),
            Err(e) => Err(e),
        };
        manifest.unwrap_or_else(|e| {
            tracing::warn!("⚠️ Photo sheet unavailable, probing images instead: {}", e);
            PhotoManifest::default()
        })
    }

    /// 每個標本的圖片列表與藝廊縮圖
    async fn resolve_images<I: ImageSource>(&self, site: &mut Site, manifest: &PhotoManifest, source: I) {
        let resolver = ImageResolver::new(source)
            .with_extensions(self.config.image_extensions().to_vec())
            .with_max_images(self.config.max_images())
            .with_strategy(self.config.probe_strategy())
            .with_concurrency(self.config.concurrent_requests())
            .with_placeholder(self.config.placeholder_image());

        let ids: Vec<CatalogId> = site.collection.keys().copied().collect();
        let mut total = 0;
        // 標本逐一探測
        for id in ids {
            let (images, first) = match manifest.get(id) {
                Some(_) => {
                    let images = resolver.resolve_with(id, manifest).await;
                    let first = images
                        .first()
                        .cloned()
                        .unwrap_or_else(|| self.config.placeholder_image().to_string());
                    (images, first)
                }
                None => {
                    let images = resolver.resolve(id).await;
                    let first = resolver.gallery_image(id, &images).await;
                    (images, first)
                }
            };
            total += images.len();
            site.first_images.insert(id, first);
            site.images.insert(id, images);
        }
        tracing::info!(
            "🖼️ Resolved {} images for {} specimens",
            total,
            site.collection.len()
        );
    }
}

/// 將所有輸出檔案打包成一個 zip
pub fn build_archive(files: &[SiteFile]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for file in files {
        zip.start_file::<_, ()>(file.path.as_str(), FileOptions::default())?;
        zip.write_all(&file.contents)?;
    }
    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for SitePipeline<S, C> {
    async fn extract(&self) -> Result<SheetData> {
        let collection = self.fetch_collection().await?;
        let manifest = self.fetch_manifest().await;

        tracing::debug!(
            "Loaded {} specimens, {} photo sheet entries",
            collection.len(),
            manifest.entries.len()
        );
        Ok(SheetData {
            collection,
            manifest,
        })
    }

    async fn transform(&self, data: SheetData) -> Result<RenderedSite> {
        let site = self.build_site(data).await?;
        let generated_at = chrono::Utc::now().format("%Y-%m-%d %H:%M UTC").to_string();
        Renderer::new()?.render_site(&site, &generated_at)
    }

    async fn load(&self, site: RenderedSite) -> Result<String> {
        for file in &site.files {
            tracing::debug!("Writing {} ({} bytes)", file.path, file.contents.len());
            self.storage.write_file(&file.path, &file.contents).await?;
        }

        if self.config.archive() {
            let zip_data = build_archive(&site.files)?;
            tracing::debug!("Writing {} ({} bytes)", ARCHIVE_NAME, zip_data.len());
            self.storage.write_file(ARCHIVE_NAME, &zip_data).await?;
        }

        Ok(self.config.output_path().to_string())
    }
}
