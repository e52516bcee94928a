use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: usize = 2;

/// Paged window over an image list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Carousel {
    len: usize,
    page_size: usize,
    start: usize,
}

/// One pre-rendered page of thumbnails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CarouselPage {
    pub index: usize,
    pub start: usize,
    pub end: usize,
    pub has_prev: bool,
    pub has_next: bool,
}

impl Carousel {
    pub fn new(len: usize, page_size: usize) -> Self {
        Self {
            len,
            page_size: page_size.max(1),
            start: 0,
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        (self.start + self.page_size).min(self.len)
    }

    pub fn has_prev(&self) -> bool {
        self.start > 0
    }

    pub fn has_next(&self) -> bool {
        self.end() < self.len
    }

    pub fn next(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.start += self.page_size;
        true
    }

    pub fn prev(&mut self) -> bool {
        if !self.has_prev() {
            return false;
        }
        self.start = self.start.saturating_sub(self.page_size);
        true
    }

    pub fn current(&self) -> CarouselPage {
        CarouselPage {
            index: self.start / self.page_size,
            start: self.start,
            end: self.end(),
            has_prev: self.has_prev(),
            has_next: self.has_next(),
        }
    }

    /// 所有頁面；沒有圖片時為空
    pub fn pages(&self) -> Vec<CarouselPage> {
        let mut cursor = Carousel::new(self.len, self.page_size);
        let mut pages = Vec::new();
        if self.len == 0 {
            return pages;
        }
        loop {
            pages.push(cursor.current());
            if !cursor.next() {
                break;
            }
        }
        pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_disabled_exactly_at_end() {
        for len in 0..=7 {
            let mut carousel = Carousel::new(len, 2);
            loop {
                assert_eq!(!carousel.has_next(), carousel.end() == len, "len {}", len);
                if !carousel.next() {
                    break;
                }
            }
        }
    }

    #[test]
    fn test_paging_forward_and_back() {
        let mut carousel = Carousel::new(5, 2);
        assert!(!carousel.has_prev());
        assert!(carousel.next());
        assert!(carousel.next());
        assert_eq!((carousel.start(), carousel.end()), (4, 5));
        assert!(!carousel.next());
        assert!(carousel.prev());
        assert_eq!(carousel.start(), 2);
        assert!(carousel.prev());
        assert!(!carousel.prev());
        assert_eq!(carousel.start(), 0);
    }

    #[test]
    fn test_pages_cover_all_images() {
        let pages = Carousel::new(5, 2).pages();
        let bounds: Vec<_> = pages.iter().map(|p| (p.start, p.end)).collect();
        assert_eq!(bounds, vec![(0, 2), (2, 4), (4, 5)]);
        assert!(pages[0].has_next && !pages[0].has_prev);
        assert!(!pages[2].has_next && pages[2].has_prev);
        assert!(Carousel::new(0, 2).pages().is_empty());
    }

    #[test]
    fn test_exact_multiple_has_no_trailing_page() {
        let pages = Carousel::new(4, 2).pages();
        assert_eq!(pages.len(), 2);
        assert!(!pages[1].has_next);
    }
}
