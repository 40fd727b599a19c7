use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use glam::Vec2;
use heartfield_platform::{DrawSurface, FillStyle, Result, Rgba, ViewportSize};
use image::RgbaImage;

/// Line segments per flattened cubic.
const CURVE_STEPS: usize = 16;
/// Expanded copies of the path used to fake a blurred shadow.
const GLOW_LAYERS: usize = 4;

/// Software canvas: flattened paths, even-odd scanline fill, source-over blending.
pub struct RasterSurface {
    image: RgbaImage,
    subpaths: Vec<Vec<Vec2>>,
    cursor: Vec2,
}

impl RasterSurface {
    pub fn new(size: ViewportSize) -> Self {
        Self {
            image: RgbaImage::new(size.width, size.height),
            subpaths: Vec::new(),
            cursor: Vec2::ZERO,
        }
    }

    #[cfg(test)]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.image.get_pixel(x, y).0
    }

    pub fn save_png(&self, path: &Path) -> Result<()> {
        self.image.save(path)?;
        Ok(())
    }

    fn fill_polygons(&mut self, polygons: &[Vec<Vec2>], color: Rgba) {
        if color.a <= 0.0 {
            return;
        }
        let (width, height) = self.image.dimensions();
        let points = polygons.iter().flatten();
        let (min_y, max_y) = points.fold((f32::MAX, f32::MIN), |(lo, hi), p| {
            (lo.min(p.y), hi.max(p.y))
        });
        if min_y > max_y {
            return;
        }
        let first_row = min_y.floor().max(0.0) as u32;
        let last_row = (max_y.ceil().max(0.0) as u32).min(height);

        let mut crossings = Vec::new();
        for row in first_row..last_row {
            let scan_y = row as f32 + 0.5;
            crossings.clear();
            for polygon in polygons {
                for (index, start) in polygon.iter().enumerate() {
                    let end = polygon[(index + 1) % polygon.len()];
                    if (start.y <= scan_y) != (end.y <= scan_y) {
                        let t = (scan_y - start.y) / (end.y - start.y);
                        crossings.push(start.x + t * (end.x - start.x));
                    }
                }
            }
            crossings.sort_by(|a, b| a.total_cmp(b));
            for span in crossings.chunks_exact(2) {
                let from = (span[0] - 0.5).ceil().max(0.0) as u32;
                let to = ((span[1] - 0.5).floor() + 1.0).max(0.0) as u32;
                for column in from..to.min(width) {
                    self.blend(column, row, color);
                }
            }
        }
    }

    fn blend(&mut self, x: u32, y: u32, color: Rgba) {
        let pixel = self.image.get_pixel_mut(x, y);
        let [r, g, b, a] = pixel.0;
        let src_a = color.a.clamp(0.0, 1.0);
        let dst_a = a as f32 / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);
        if out_a <= 0.0 {
            return;
        }
        let mix = |src: u8, dst: u8| {
            let value = (src as f32 * src_a + dst as f32 * dst_a * (1.0 - src_a)) / out_a;
            value.round().clamp(0.0, 255.0) as u8
        };
        pixel.0 = [
            mix(color.r, r),
            mix(color.g, g),
            mix(color.b, b),
            (out_a * 255.0).round() as u8,
        ];
    }
}

fn cubic_point(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, t: f32) -> Vec2 {
    let u = 1.0 - t;
    p0 * (u * u * u) + p1 * (3.0 * u * u * t) + p2 * (3.0 * u * t * t) + p3 * (t * t * t)
}

/// Pushes every point away from the polygon's centroid by `spread` pixels
/// at its furthest extent.
fn expand(polygon: &[Vec2], spread: f32) -> Vec<Vec2> {
    if polygon.is_empty() {
        return Vec::new();
    }
    let centroid = polygon.iter().copied().sum::<Vec2>() / polygon.len() as f32;
    let radius = polygon
        .iter()
        .map(|p| p.distance(centroid))
        .fold(0.0f32, f32::max);
    if radius <= f32::EPSILON {
        return polygon.to_vec();
    }
    let scale = 1.0 + spread / radius;
    polygon
        .iter()
        .map(|p| centroid + (*p - centroid) * scale)
        .collect()
}

impl DrawSurface for RasterSurface {
    fn size(&self) -> ViewportSize {
        let (width, height) = self.image.dimensions();
        ViewportSize::new(width, height)
    }

    /// Resizing discards the pixels, like a canvas does.
    fn resize(&mut self, size: ViewportSize) -> Result<()> {
        if size != self.size() {
            self.image = RgbaImage::new(size.width, size.height);
        }
        Ok(())
    }

    fn clear(&mut self) {
        for pixel in self.image.pixels_mut() {
            pixel.0 = [0, 0, 0, 0];
        }
    }

    fn begin_path(&mut self) {
        self.subpaths.clear();
    }

    fn move_to(&mut self, point: Vec2) {
        self.subpaths.push(vec![point]);
        self.cursor = point;
    }

    fn bezier_curve_to(&mut self, control1: Vec2, control2: Vec2, end: Vec2) {
        if self.subpaths.is_empty() {
            self.subpaths.push(vec![self.cursor]);
        }
        let start = self.cursor;
        if let Some(current) = self.subpaths.last_mut() {
            for step in 1..=CURVE_STEPS {
                let t = step as f32 / CURVE_STEPS as f32;
                current.push(cubic_point(start, control1, control2, end, t));
            }
        }
        self.cursor = end;
    }

    fn fill(&mut self, style: &FillStyle) {
        let polygons: Vec<Vec<Vec2>> = self
            .subpaths
            .iter()
            .filter(|subpath| subpath.len() >= 3)
            .cloned()
            .collect();
        if polygons.is_empty() {
            return;
        }
        if let Some(glow) = style.glow.filter(|glow| glow.blur > 0.0) {
            let layer_color = glow.color.with_alpha(glow.color.a / GLOW_LAYERS as f32);
            for layer in (1..=GLOW_LAYERS).rev() {
                let spread = glow.blur * layer as f32 / GLOW_LAYERS as f32;
                let halo: Vec<Vec<Vec2>> = polygons.iter().map(|p| expand(p, spread)).collect();
                self.fill_polygons(&halo, layer_color);
            }
        }
        self.fill_polygons(&polygons, style.color);
    }
}

/// Lets the runner keep reading pixels while the page owns the surface.
#[derive(Clone)]
pub struct SharedRaster {
    inner: Rc<RefCell<RasterSurface>>,
}

impl SharedRaster {
    pub fn new(surface: RasterSurface) -> Self {
        Self {
            inner: Rc::new(RefCell::new(surface)),
        }
    }

    pub fn save_png(&self, path: &Path) -> Result<()> {
        self.inner.borrow().save_png(path)
    }
}

impl DrawSurface for SharedRaster {
    fn size(&self) -> ViewportSize {
        self.inner.borrow().size()
    }

    fn resize(&mut self, size: ViewportSize) -> Result<()> {
        self.inner.borrow_mut().resize(size)
    }

    fn clear(&mut self) {
        self.inner.borrow_mut().clear();
    }

    fn begin_path(&mut self) {
        self.inner.borrow_mut().begin_path();
    }

    fn move_to(&mut self, point: Vec2) {
        self.inner.borrow_mut().move_to(point);
    }

    fn bezier_curve_to(&mut self, control1: Vec2, control2: Vec2, end: Vec2) {
        self.inner
            .borrow_mut()
            .bezier_curve_to(control1, control2, end);
    }

    fn fill(&mut self, style: &FillStyle) {
        self.inner.borrow_mut().fill(style);
    }
}
