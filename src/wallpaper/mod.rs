//! # Wallpaper Controller
//!
//! Tracks which background image is shown and which one is being fetched.
//!
//! ## Generations
//!
//! Each [`WallpaperController::refresh`] issues a new generation number and a
//! cache-busting URL (`<base><timestamp in ms>`). A loaded image is shown
//! only if its generation is newer than the one on screen, so a slow early
//! download never replaces a faster later one. A failed load keeps the
//! current image.
//!
//! ## Painting
//!
//! The painted cell grid is cached per terminal size, treatment and
//! generation. [`WallpaperController::prepare`] must run before a frame is
//! drawn; rendering then only reads [`WallpaperController::grid`].

pub mod painter;

use std::sync::Arc;

use image::RgbImage;

pub use painter::{paint, CellGrid, HalfBlock, Treatment, WallpaperView};

/// A wallpaper download the shell should run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WallpaperRequest {
    pub generation: u64,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct CacheKey {
    cols: u16,
    rows: u16,
    treatment: Treatment,
    generation: u64,
}

#[derive(Debug)]
pub struct WallpaperController {
    base_url: String,
    requested: u64,
    shown: Option<(u64, Arc<RgbImage>)>,
    cache: Option<(CacheKey, CellGrid)>,
}

impl WallpaperController {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            requested: 0,
            shown: None,
            cache: None,
        }
    }

    /// Start loading a fresh image. `now_millis` is the wall-clock time used
    /// as the cache-busting suffix.
    pub fn refresh(&mut self, now_millis: i64) -> WallpaperRequest {
        self.requested += 1;
        let url = format!("{}{}", self.base_url, now_millis);
        tracing::debug!(generation = self.requested, %url, "wallpaper refresh");
        WallpaperRequest {
            generation: self.requested,
            url,
        }
    }

    /// Show a loaded image unless something newer is already on screen.
    /// Returns true if the image was swapped in.
    pub fn on_loaded(&mut self, generation: u64, image: RgbImage) -> bool {
        if self.shown_generation().is_some_and(|shown| shown >= generation) {
            tracing::trace!(generation, "dropped outdated wallpaper");
            return false;
        }
        tracing::info!(generation, "wallpaper swapped");
        self.shown = Some((generation, Arc::new(image)));
        true
    }

    /// A load failed; the current image stays.
    pub fn on_failed(&mut self, generation: u64, error: &dyn std::fmt::Display) {
        tracing::warn!(generation, "wallpaper load failed: {error}");
    }

    pub fn shown_generation(&self) -> Option<u64> {
        self.shown.as_ref().map(|(generation, _)| *generation)
    }

    /// True while the latest requested image has not arrived.
    pub fn is_loading(&self) -> bool {
        self.shown_generation().unwrap_or(0) < self.requested
    }

    pub fn image(&self) -> Option<&RgbImage> {
        self.shown.as_ref().map(|(_, image)| image.as_ref())
    }

    /// Repaint the cell grid if the size, treatment or image changed.
    pub fn prepare(&mut self, cols: u16, rows: u16, treatment: Treatment) {
        let Some((generation, image)) = &self.shown else {
            return;
        };
        let key = CacheKey {
            cols,
            rows,
            treatment,
            generation: *generation,
        };
        if self.cache.as_ref().is_some_and(|(cached, _)| *cached == key) {
            return;
        }
        let grid = paint(image, cols, rows, treatment);
        self.cache = Some((key, grid));
    }

    /// The most recently prepared grid, if any.
    pub fn grid(&self) -> Option<&CellGrid> {
        self.cache.as_ref().map(|(_, grid)| grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    const BASE: &str = "https://picsum.photos/1920/1080?random=";

    fn solid(v: u8) -> RgbImage {
        RgbImage::from_pixel(8, 8, Rgb([v, v, v]))
    }

    #[test]
    fn test_refresh_builds_cache_busting_url() {
        let mut wallpaper = WallpaperController::new(BASE);
        let request = wallpaper.refresh(1_700_000_000_123);
        assert_eq!(request.url, format!("{BASE}1700000000123"));
        assert_eq!(request.generation, 1);
        assert_eq!(wallpaper.refresh(1_700_000_000_124).generation, 2);
        assert!(wallpaper.is_loading());
    }

    #[test]
    fn test_latest_generation_wins() {
        let mut wallpaper = WallpaperController::new(BASE);
        let first = wallpaper.refresh(1);
        let second = wallpaper.refresh(2);

        assert!(wallpaper.on_loaded(second.generation, solid(2)));
        assert!(!wallpaper.on_loaded(first.generation, solid(1)));
        assert_eq!(wallpaper.shown_generation(), Some(2));
        assert!(!wallpaper.is_loading());
    }

    #[test]
    fn test_in_order_loads_both_apply() {
        let mut wallpaper = WallpaperController::new(BASE);
        let first = wallpaper.refresh(1);
        let second = wallpaper.refresh(2);
        assert!(wallpaper.on_loaded(first.generation, solid(1)));
        assert!(wallpaper.is_loading());
        assert!(wallpaper.on_loaded(second.generation, solid(2)));
    }

    #[test]
    fn test_failure_keeps_previous_image() {
        let mut wallpaper = WallpaperController::new(BASE);
        let first = wallpaper.refresh(1);
        wallpaper.on_loaded(first.generation, solid(7));
        let second = wallpaper.refresh(2);
        wallpaper.on_failed(second.generation, &"timeout");
        assert_eq!(wallpaper.shown_generation(), Some(1));
        assert_eq!(wallpaper.image().map(|i| *i.get_pixel(0, 0)), Some(Rgb([7, 7, 7])));
    }

    #[test]
    fn test_prepare_without_image_is_noop() {
        let mut wallpaper = WallpaperController::new(BASE);
        wallpaper.prepare(10, 5, Treatment::IDLE);
        assert!(wallpaper.grid().is_none());
    }

    #[test]
    fn test_prepare_repaints_on_change() {
        let mut wallpaper = WallpaperController::new(BASE);
        let request = wallpaper.refresh(1);
        wallpaper.on_loaded(request.generation, solid(100));

        wallpaper.prepare(10, 5, Treatment::IDLE);
        let idle = wallpaper.grid().cloned().expect("grid");
        assert_eq!((idle.cols(), idle.rows()), (10, 5));

        wallpaper.prepare(10, 5, Treatment::FOCUS);
        let focus = wallpaper.grid().cloned().expect("grid");
        assert_ne!(idle, focus);

        wallpaper.prepare(20, 6, Treatment::FOCUS);
        assert_eq!(wallpaper.grid().map(CellGrid::cols), Some(20));
    }
}
