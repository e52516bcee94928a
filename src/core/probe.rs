//! Image discovery for a specimen.
//!
//! Images follow `images/{id}.{ext}` for the first and `images/{id}-{n}.{ext}`
//! for the rest. Specimens are probed one after another; checks for a single
//! specimen never exceed the configured concurrency.

use crate::domain::model::{CatalogId, PhotoManifest};
use crate::domain::ports::{ImageSource, ProbeStrategy};
use futures::stream::{self, StreamExt};

pub const DEFAULT_EXTENSIONS: [&str; 5] = ["jpg", "JPG", "jpeg", "png", "webp"];
pub const DEFAULT_MAX_IMAGES: usize = 5;
pub const DEFAULT_PLACEHOLDER: &str = "images/test.jpg";

pub fn candidate_path(id: CatalogId, index: usize, ext: &str) -> String {
    if index <= 1 {
        format!("images/{}.{}", id, ext)
    } else {
        format!("images/{}-{}.{}", id, index, ext)
    }
}

/// Manifest entries: URLs verbatim, filenames under `images/`, bare ids as
/// Google Drive view links.
pub fn manifest_url(entry: &str) -> String {
    if entry.contains("://") {
        entry.to_string()
    } else if entry.contains('.') {
        format!("images/{}", entry.trim_start_matches('/'))
    } else {
        format!("https://drive.google.com/uc?export=view&id={}", entry)
    }
}

pub struct ImageResolver<S: ImageSource> {
    source: S,
    extensions: Vec<String>,
    max_images: usize,
    strategy: ProbeStrategy,
    concurrency: usize,
    placeholder: String,
}

impl<S: ImageSource> ImageResolver<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            max_images: DEFAULT_MAX_IMAGES,
            strategy: ProbeStrategy::default(),
            concurrency: 5,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
        }
    }

    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn with_max_images(mut self, max_images: usize) -> Self {
        self.max_images = max_images;
        self
    }

    pub fn with_strategy(mut self, strategy: ProbeStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// 依副檔名順序逐一檢查，回傳第一個存在的路徑
    async fn find_index(&self, id: CatalogId, index: usize) -> Option<String> {
        for ext in &self.extensions {
            let path = candidate_path(id, index, ext);
            if self.source.exists(&path).await {
                tracing::debug!("🖼️ Found {}", path);
                return Some(path);
            }
        }
        None
    }

    /// Images for a specimen, using the photo manifest when it has an entry.
    pub async fn resolve_with(&self, id: CatalogId, manifest: &PhotoManifest) -> Vec<String> {
        match manifest.get(id) {
            Some(entries) => entries.iter().map(|e| manifest_url(e)).collect(),
            None => self.resolve(id).await,
        }
    }

    pub async fn resolve(&self, id: CatalogId) -> Vec<String> {
        match self.strategy {
            ProbeStrategy::Contiguous => self.resolve_contiguous(id).await,
            ProbeStrategy::Exhaustive => self.resolve_exhaustive(id).await,
        }
    }

    /// Sequential probe that stops for good at the first missing index, so an
    /// image after a gap in the numbering is never found.
    pub async fn resolve_contiguous(&self, id: CatalogId) -> Vec<String> {
        let mut urls = Vec::new();
        for index in 1..=self.max_images {
            match self.find_index(id, index).await {
                Some(path) => urls.push(path),
                None => break,
            }
        }
        urls
    }

    /// Checks every index up to the ceiling concurrently; gaps are skipped.
    pub async fn resolve_exhaustive(&self, id: CatalogId) -> Vec<String> {
        stream::iter(1..=self.max_images)
            .map(|index| self.find_index(id, index))
            .buffered(self.concurrency)
            .filter_map(|found| async move { found })
            .collect()
            .await
    }

    /// First image for a gallery card: the extensions of index 1 are checked
    /// at most `concurrency` at a time, earliest extension wins, placeholder
    /// when none exist.
    pub async fn first_image(&self, id: CatalogId) -> String {
        let checks: Vec<(String, bool)> = stream::iter(self.extensions.iter().cloned())
            .map(|ext| {
                let path = candidate_path(id, 1, &ext);
                async move {
                    let found = self.source.exists(&path).await;
                    (path, found)
                }
            })
            .buffered(self.concurrency)
            .collect()
            .await;
        checks
            .into_iter()
            .find(|(_, found)| *found)
            .map(|(path, _)| path)
            .unwrap_or_else(|| self.placeholder.clone())
    }

    /// Gallery image from an already probed list. Both probes check every
    /// extension of index 1 first, so a list without it means none exists.
    pub async fn gallery_image(&self, id: CatalogId, images: &[String]) -> String {
        if self.max_images == 0 {
            return self.first_image(id).await;
        }
        let first_candidates: Vec<String> =
            self.extensions.iter().map(|ext| candidate_path(id, 1, ext)).collect();
        match images.first() {
            Some(path) if first_candidates.contains(path) => path.clone(),
            _ => self.placeholder.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[derive(Clone, Default)]
    struct MockImages {
        present: Arc<HashSet<String>>,
        checked: Arc<Mutex<Vec<String>>>,
    }

    impl MockImages {
        fn with(paths: &[&str]) -> Self {
            Self {
                present: Arc::new(paths.iter().map(|p| p.to_string()).collect()),
                checked: Arc::default(),
            }
        }

        fn checked(&self) -> Vec<String> {
            self.checked.lock().unwrap().clone()
        }
    }

    impl ImageSource for MockImages {
        async fn exists(&self, path: &str) -> bool {
            self.checked.lock().unwrap().push(path.to_string());
            self.present.contains(path)
        }
    }

    /// 記錄同時進行中的檢查數量
    #[derive(Clone, Default)]
    struct SlowImages {
        in_flight: Arc<AtomicUsize>,
        peak: Arc<AtomicUsize>,
    }

    impl SlowImages {
        fn peak(&self) -> usize {
            self.peak.load(Ordering::SeqCst)
        }
    }

    impl ImageSource for SlowImages {
        async fn exists(&self, _path: &str) -> bool {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(5)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            false
        }
    }

    #[tokio::test]
    async fn test_contiguous_stops_at_first_missing_index() {
        let images = MockImages::with(&["images/4.jpg", "images/4-2.png", "images/4-4.jpg"]);
        let resolver = ImageResolver::new(images.clone()).with_max_images(10);

        let urls = resolver.resolve(CatalogId(4)).await;

        assert_eq!(urls, vec!["images/4.jpg", "images/4-2.png"]);
        // index 3 is tried with every extension, index 4 never
        assert!(images.checked().iter().all(|p| !p.starts_with("images/4-4")));
    }

    #[tokio::test]
    async fn test_contiguous_respects_ceiling() {
        let images = MockImages::with(&["images/1.jpg", "images/1-2.jpg", "images/1-3.jpg"]);
        let resolver = ImageResolver::new(images).with_max_images(2);
        assert_eq!(resolver.resolve(CatalogId(1)).await.len(), 2);
    }

    #[tokio::test]
    async fn test_extension_order_and_single_hit_per_index() {
        let images = MockImages::with(&["images/9.JPG", "images/9.png"]);
        let resolver = ImageResolver::new(images.clone());

        let urls = resolver.resolve(CatalogId(9)).await;

        assert_eq!(urls, vec!["images/9.JPG"]);
        let checked = images.checked();
        assert_eq!(&checked[..2], ["images/9.jpg", "images/9.JPG"]);
        assert!(!checked.contains(&"images/9.png".to_string()));
    }

    #[tokio::test]
    async fn test_exhaustive_keeps_images_after_gap() {
        let images = MockImages::with(&["images/4.jpg", "images/4-3.webp"]);
        let resolver = ImageResolver::new(images)
            .with_strategy(ProbeStrategy::Exhaustive)
            .with_concurrency(3);

        let urls = resolver.resolve(CatalogId(4)).await;
        assert_eq!(urls, vec!["images/4.jpg", "images/4-3.webp"]);
    }

    #[tokio::test]
    async fn test_manifest_overrides_probe() {
        let images = MockImages::with(&["images/2.jpg"]);
        let resolver = ImageResolver::new(images.clone());
        let mut manifest = PhotoManifest::default();
        manifest.entries.insert(
            CatalogId(2),
            vec![
                "2-front.jpg".to_string(),
                "1AbCdEf".to_string(),
                "https://cdn.example.org/2.png".to_string(),
            ],
        );

        let urls = resolver.resolve_with(CatalogId(2), &manifest).await;

        assert_eq!(
            urls,
            vec![
                "images/2-front.jpg",
                "https://drive.google.com/uc?export=view&id=1AbCdEf",
                "https://cdn.example.org/2.png"
            ]
        );
        assert!(images.checked().is_empty());

        let probed = resolver.resolve_with(CatalogId(3), &manifest).await;
        assert!(probed.is_empty());
    }

    #[tokio::test]
    async fn test_first_image_falls_back_to_placeholder() {
        let images = MockImages::with(&["images/5.webp", "images/5.png"]);
        let resolver = ImageResolver::new(images);

        assert_eq!(resolver.first_image(CatalogId(5)).await, "images/5.png");
        assert_eq!(resolver.first_image(CatalogId(6)).await, DEFAULT_PLACEHOLDER);
    }

    #[tokio::test]
    async fn test_first_image_checks_bounded_by_concurrency() {
        let images = SlowImages::default();
        let resolver = ImageResolver::new(images.clone()).with_concurrency(2);

        assert_eq!(resolver.first_image(CatalogId(7)).await, DEFAULT_PLACEHOLDER);
        assert!(images.peak() >= 1);
        assert!(images.peak() <= 2, "peak was {}", images.peak());
    }

    #[tokio::test]
    async fn test_exhaustive_checks_bounded_by_concurrency() {
        let images = SlowImages::default();
        let resolver = ImageResolver::new(images.clone())
            .with_strategy(ProbeStrategy::Exhaustive)
            .with_max_images(10)
            .with_concurrency(3);

        assert!(resolver.resolve(CatalogId(7)).await.is_empty());
        assert!(images.peak() <= 3, "peak was {}", images.peak());
    }

    #[tokio::test]
    async fn test_gallery_image_reuses_first_hit() {
        let images = MockImages::with(&["images/3.png", "images/3-2.jpg"]);
        let resolver = ImageResolver::new(images.clone());

        let urls = resolver.resolve(CatalogId(3)).await;
        let before = images.checked().len();
        assert_eq!(resolver.gallery_image(CatalogId(3), &urls).await, "images/3.png");
        assert_eq!(resolver.gallery_image(CatalogId(8), &[]).await, DEFAULT_PLACEHOLDER);
        // 不再重新檢查
        assert_eq!(images.checked().len(), before);

        let unprobed = ImageResolver::new(images).with_max_images(0);
        assert_eq!(unprobed.gallery_image(CatalogId(3), &[]).await, "images/3.png");
    }
}
