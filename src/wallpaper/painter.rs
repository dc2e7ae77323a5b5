//! # Half-block Wallpaper Painter
//!
//! Turns a decoded image into a grid of terminal cells. Each cell shows the
//! upper half block `▀` with the foreground set to the upper pixel and the
//! background set to the lower pixel, so a `cols × rows` area carries a
//! `cols × 2·rows` picture.
//!
//! ## Pipeline
//!
//! 1. Crop the source to the target aspect ("cover"), then zoom into the
//!    centre by the treatment's scale.
//! 2. Resize to `cols × 2·rows` with a triangle filter.
//! 3. Blur, if the treatment asks for it.
//! 4. Multiply by brightness and by the black overlay's transmittance.

use image::{imageops, imageops::FilterType, Rgb, RgbImage};
use ratatui::{buffer::Buffer, layout::Rect, style::Color, widgets::Widget};

/// Visual treatment applied to the wallpaper.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Treatment {
    /// Zoom factor (1.0 shows the full cover crop).
    pub scale: f32,
    /// Gaussian blur sigma in half-block pixels; 0 disables blur.
    pub blur: f32,
    /// Brightness multiplier.
    pub brightness: f32,
    /// Opacity of the black overlay.
    pub overlay: f32,
}

impl Treatment {
    pub const FOCUS: Self = Self {
        scale: 1.10,
        blur: 1.2,
        brightness: 0.75,
        overlay: 0.04,
    };

    pub const IDLE: Self = Self {
        scale: 1.0,
        blur: 0.0,
        brightness: 0.90,
        overlay: 0.01,
    };

    pub fn for_focus(focus_mode: bool) -> Self {
        if focus_mode {
            Self::FOCUS
        } else {
            Self::IDLE
        }
    }

    /// Combined multiplier applied to every channel.
    fn shade(&self) -> f32 {
        (self.brightness * (1.0 - self.overlay)).clamp(0.0, 1.0)
    }
}

/// One terminal cell worth of picture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HalfBlock {
    pub top: Color,
    pub bottom: Color,
}

/// A painted wallpaper, ready to be blitted into a buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellGrid {
    cols: u16,
    rows: u16,
    cells: Vec<HalfBlock>,
}

impl CellGrid {
    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn get(&self, col: u16, row: u16) -> Option<HalfBlock> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.cells
            .get(row as usize * self.cols as usize + col as usize)
            .copied()
    }
}

/// Paint `image` into a `cols × rows` cell grid.
pub fn paint(image: &RgbImage, cols: u16, rows: u16, treatment: Treatment) -> CellGrid {
    let (width, height) = (u32::from(cols), u32::from(rows) * 2);
    if width == 0 || height == 0 || image.width() == 0 || image.height() == 0 {
        return CellGrid {
            cols: 0,
            rows: 0,
            cells: Vec::new(),
        };
    }

    let (x, y, w, h) = cover_crop(
        image.width(),
        image.height(),
        width,
        height,
        treatment.scale,
    );
    let cropped = imageops::crop_imm(image, x, y, w, h).to_image();
    let mut pixels = imageops::resize(&cropped, width, height, FilterType::Triangle);
    if treatment.blur > 0.0 {
        pixels = imageops::blur(&pixels, treatment.blur);
    }

    let shade = treatment.shade();
    let mut cells = Vec::with_capacity(usize::from(cols) * usize::from(rows));
    for row in 0..u32::from(rows) {
        for col in 0..width {
            cells.push(HalfBlock {
                top: to_color(pixels.get_pixel(col, row * 2), shade),
                bottom: to_color(pixels.get_pixel(col, row * 2 + 1), shade),
            });
        }
    }

    CellGrid { cols, rows, cells }
}

/// Source rectangle `(x, y, w, h)` covering a `target_w × target_h` area,
/// centred and zoomed in by `scale`.
fn cover_crop(src_w: u32, src_h: u32, target_w: u32, target_h: u32, scale: f32) -> (u32, u32, u32, u32) {
    let target_aspect = target_w as f32 / target_h as f32;
    let src_aspect = src_w as f32 / src_h as f32;
    let (mut w, mut h) = if src_aspect > target_aspect {
        (src_h as f32 * target_aspect, src_h as f32)
    } else {
        (src_w as f32, src_w as f32 / target_aspect)
    };
    let scale = scale.max(1.0);
    w /= scale;
    h /= scale;

    let w = (w.round() as u32).clamp(1, src_w);
    let h = (h.round() as u32).clamp(1, src_h);
    ((src_w - w) / 2, (src_h - h) / 2, w, h)
}

fn to_color(pixel: &Rgb<u8>, shade: f32) -> Color {
    let [r, g, b] = pixel.0;
    let apply = |c: u8| (f32::from(c) * shade).round().clamp(0.0, 255.0) as u8;
    Color::Rgb(apply(r), apply(g), apply(b))
}

/// Widget that blits a [`CellGrid`] into the frame buffer.
///
/// Cells outside the grid are left untouched, so a stale grid from a
/// different terminal size still draws what it can.
pub struct WallpaperView<'a> {
    grid: &'a CellGrid,
}

impl<'a> WallpaperView<'a> {
    pub fn new(grid: &'a CellGrid) -> Self {
        Self { grid }
    }
}

impl Widget for WallpaperView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for row in 0..area.height {
            for col in 0..area.width {
                let Some(block) = self.grid.get(col, row) else {
                    continue;
                };
                if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                    cell.set_symbol("▀").set_fg(block.top).set_bg(block.bottom);
                }
            }
        }
    }
}
