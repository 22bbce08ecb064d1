//! Cell sampler
//!
//! Averages a small pixel window at the center of every grid cell, where the
//! center is mapped through the crop quad into image pixels.

use crate::color::rgb_to_hex;
use crate::geometry::{blend_quad, cell_center_uv};
use crate::models::constants::DEFAULT_SAMPLE_SIZE;
use crate::models::{GridSpec, Quad, Rgb};

/// Read access to RGBA pixel data
pub trait PixelSource {
    fn width(&self) -> usize;
    fn height(&self) -> usize;

    /// RGBA bytes (4 per pixel, row-major) of the rectangle at `(x, y)` with
    /// size `w × h`. Callers only request rectangles inside the image.
    fn read_region(&self, x: usize, y: usize, w: usize, h: usize) -> Vec<u8>;
}

/// Owned RGBA buffer, e.g. a canvas `ImageData` copied out once per recompute
#[derive(Clone, Debug, PartialEq)]
pub struct RgbaImage {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl RgbaImage {
    /// Wrap raw RGBA bytes. Returns `None` if `data` is not exactly
    /// `width * height * 4` bytes long, or if that size overflows.
    pub fn from_rgba(width: usize, height: usize, data: Vec<u8>) -> Option<Self> {
        let expected = width.checked_mul(height)?.checked_mul(4)?;
        (data.len() == expected).then_some(Self { width, height, data })
    }

    /// Image filled with a single color
    pub fn filled(width: usize, height: usize, rgb: Rgb) -> Self {
        let data = [rgb.r, rgb.g, rgb.b, 255].repeat(width * height);
        Self { width, height, data }
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, rgb: Rgb) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = (y * self.width + x) * 4;
        self.data[i..i + 4].copy_from_slice(&[rgb.r, rgb.g, rgb.b, 255]);
    }
}

impl PixelSource for RgbaImage {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn read_region(&self, x: usize, y: usize, w: usize, h: usize) -> Vec<u8> {
        let mut out = Vec::with_capacity(w * h * 4);
        for row in y..(y + h).min(self.height) {
            let start = (row * self.width + x) * 4;
            let end = (row * self.width + (x + w).min(self.width)) * 4;
            out.extend_from_slice(&self.data[start..end]);
        }
        out
    }
}

/// Average color of a `size × size` window centered on pixel `(x, y)`
///
/// The window start is clamped into the image and the window is clipped at
/// the far edges, so it never reads outside. Channels are summed over all
/// sampled pixels and rounded once. `None` when nothing could be sampled.
pub fn sample_average<P: PixelSource + ?Sized>(source: &P, x: f64, y: f64, size: usize) -> Option<Rgb> {
    let (width, height) = (source.width(), source.height());
    if width == 0 || height == 0 || size == 0 || !x.is_finite() || !y.is_finite() {
        return None;
    }

    // Clamped as floats so far-off coordinates cannot overflow the cast
    let half = (size / 2) as f64;
    let sx = (x.round() - half).clamp(0.0, (width - 1) as f64) as usize;
    let sy = (y.round() - half).clamp(0.0, (height - 1) as f64) as usize;
    let w = size.min(width - sx);
    let h = size.min(height - sy);

    let data = source.read_region(sx, sy, w, h);
    let (mut r, mut g, mut b, mut count) = (0u64, 0u64, 0u64, 0u64);
    for px in data.chunks_exact(4) {
        r += px[0] as u64;
        g += px[1] as u64;
        b += px[2] as u64;
        count += 1;
    }

    if count == 0 {
        return None;
    }

    let avg = |sum: u64| ((sum as f64) / (count as f64)).round() as u8;
    Some(Rgb::new(avg(r), avg(g), avg(b)))
}

/// Sampled hex color of every cell in row-major order
///
/// Cells whose window yields no pixels are `None` ("unknown", never black).
/// An empty grid gives an empty vector.
pub fn extract_cell_colors<P: PixelSource + ?Sized>(
    source: &P,
    quad: &Quad,
    grid: GridSpec,
    sample_size: usize,
) -> Vec<Option<String>> {
    if grid.is_empty() {
        return Vec::new();
    }

    let (width, height) = (source.width() as f64, source.height() as f64);
    let mut colors = Vec::with_capacity(grid.cell_count());

    for row in 0..grid.rows {
        for col in 0..grid.cols {
            let color = cell_center_uv(row, col, grid)
                .map(|(u, v)| blend_quad(u, v, quad).scale(width, height))
                .and_then(|p| sample_average(source, p.x, p.y, sample_size))
                .map(|rgb| rgb_to_hex(rgb.r, rgb.g, rgb.b));
            colors.push(color);
        }
    }

    log::debug!(
        "sampled {} cells ({}x{}) from {}x{} image",
        colors.len(),
        grid.rows,
        grid.cols,
        source.width(),
        source.height()
    );
    colors
}

/// [`extract_cell_colors`] with the default 3×3 window
pub fn extract_cell_colors_default<P: PixelSource + ?Sized>(
    source: &P,
    quad: &Quad,
    grid: GridSpec,
) -> Vec<Option<String>> {
    extract_cell_colors(source, quad, grid, DEFAULT_SAMPLE_SIZE)
}
