use std::path::Path;

use anyhow::{bail, Context};
use art_collage::prelude::*;
use glam::{Vec2, Vec3};
use image::{Rgb as Px, RgbImage};
use rand::RngCore;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Installs a fmt subscriber filtered by `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Output settings for the PNG preview.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Output size in pixels.
    pub image_size: (u32, u32),
    /// Fill behind everything. Defaults to the collage background tint.
    pub background: Option<[u8; 3]>,
    /// Outline drawn around each image, if any.
    pub outline: Option<[u8; 3]>,
}

impl RenderConfig {
    pub fn new(image_size: (u32, u32)) -> Self {
        Self {
            image_size,
            background: None,
            outline: None,
        }
    }

    pub fn with_background(mut self, rgb: [u8; 3]) -> Self {
        self.background = Some(rgb);
        self
    }

    pub fn with_outline(mut self, rgb: [u8; 3]) -> Self {
        self.outline = Some(rgb);
        self
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let (w, h) = self.image_size;
        if w == 0 || h == 0 {
            bail!("image_size must be non-zero, got {}x{}", w, h);
        }
        Ok(())
    }
}

/// Maps world space seen by the collage camera onto output pixels.
struct Projection {
    distance: f32,
    viewport: Viewport,
    pixels: Vec2,
}

impl Projection {
    /// Screen-space scale of something at depth `z`, or `None` behind the camera.
    fn scale(&self, z: f32) -> Option<f32> {
        let depth = self.distance - z;
        (depth > f32::EPSILON).then(|| self.distance / depth)
    }

    /// Pixel bounds `(x0, y0, x1, y1)` of a rectangle centered at `center`.
    fn bounds(&self, center: Vec3, size: Vec2) -> Option<(i64, i64, i64, i64)> {
        let s = self.scale(center.z)?;
        let half = size * s * 0.5;
        let c = Vec2::new(center.x, center.y) * s;
        let to_px = |p: Vec2| {
            Vec2::new(
                (p.x / self.viewport.width + 0.5) * self.pixels.x,
                (0.5 - p.y / self.viewport.height) * self.pixels.y,
            )
        };
        let a = to_px(c - half);
        let b = to_px(c + half);
        Some((
            a.x.min(b.x).round() as i64,
            a.y.min(b.y).round() as i64,
            a.x.max(b.x).round() as i64,
            a.y.max(b.y).round() as i64,
        ))
    }
}

/// Rasterizes the collage: background plane first, then images in ascending depth.
pub fn render_collage<R: RngCore>(collage: &Collage<R>, rc: &RenderConfig) -> RgbImage {
    render_scene(
        collage.background(),
        collage.placed(),
        collage.viewport(),
        collage.config().camera_distance,
        rc,
    )
}

/// Rasterizes an explicit scene.
pub fn render_scene(
    background: &Background,
    placed: &[PlacedImage],
    viewport: Viewport,
    camera_distance: f32,
    rc: &RenderConfig,
) -> RgbImage {
    let (w, h) = rc.image_size;
    let clear = rc.background.unwrap_or([12, 12, 12]);
    let mut img = RgbImage::from_pixel(w, h, Px(clear));

    let proj = Projection {
        distance: camera_distance,
        viewport,
        pixels: Vec2::new(w as f32, h as f32),
    };

    let paper = rc.background.unwrap_or(background.tint.to_array());
    if let Some(b) = proj.bounds(background.position, background.extent) {
        fill_rect(&mut img, b, paper);
    }

    let mut order: Vec<&PlacedImage> = placed.iter().collect();
    order.sort_by(|a, b| a.rect.z().total_cmp(&b.rect.z()));

    for image in order {
        let Some(b) = proj.bounds(image.rect.position, image.rect.size) else {
            continue;
        };
        fill_rect(&mut img, b, image.record.average_color.to_array());
        if let Some(outline) = rc.outline {
            stroke_rect(&mut img, b, outline);
        }
    }

    img
}

/// Renders the collage and writes it as PNG to `out_path`.
pub fn render_collage_to_png<R: RngCore, P: AsRef<Path>>(
    collage: &Collage<R>,
    rc: &RenderConfig,
    out_path: P,
) -> anyhow::Result<()> {
    rc.validate()?;
    let out_path = out_path.as_ref();
    let img = render_collage(collage, rc);
    img.save(out_path)
        .with_context(|| format!("saving {}", out_path.display()))?;
    info!(
        "Wrote {} images to {}.",
        collage.placed().len(),
        out_path.display()
    );
    Ok(())
}

fn clip(img: &RgbImage, (x0, y0, x1, y1): (i64, i64, i64, i64)) -> Option<(u32, u32, u32, u32)> {
    let x0 = x0.max(0);
    let y0 = y0.max(0);
    let x1 = x1.min(img.width() as i64);
    let y1 = y1.min(img.height() as i64);
    if x0 >= x1 || y0 >= y1 {
        return None;
    }
    Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
}

fn fill_rect(img: &mut RgbImage, bounds: (i64, i64, i64, i64), rgb: [u8; 3]) {
    let Some((x0, y0, x1, y1)) = clip(img, bounds) else {
        return;
    };
    for y in y0..y1 {
        for x in x0..x1 {
            img.put_pixel(x, y, Px(rgb));
        }
    }
}

fn stroke_rect(img: &mut RgbImage, (x0, y0, x1, y1): (i64, i64, i64, i64), rgb: [u8; 3]) {
    fill_rect(img, (x0, y0, x1, y0 + 1), rgb);
    fill_rect(img, (x0, y1 - 1, x1, y1), rgb);
    fill_rect(img, (x0, y0, x0 + 1, y1), rgb);
    fill_rect(img, (x1 - 1, y0, x1, y1), rgb);
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn record(name: &str, color: Rgb) -> ImageRecord {
        ImageRecord {
            filename: name.into(),
            path: format!("/images/{name}"),
            width: 100,
            height: 100,
            size: 1,
            average_color: color,
        }
    }

    fn placed(name: &str, color: Rgb, position: Vec3, size: Vec2) -> PlacedImage {
        PlacedImage {
            record: record(name, color),
            rect: PlacedRectangle::new(position, size),
        }
    }

    fn paper(viewport: Viewport) -> Background {
        Background {
            position: Vec3::new(0.0, 0.0, -2.0),
            extent: viewport.extent() * 1.5,
            tint: Rgb::new(0xf2, 0xee, 0xe5),
        }
    }

    #[test]
    fn background_covers_frame() {
        let vp = Viewport::new(10.0, 10.0);
        let img = render_scene(&paper(vp), &[], vp, 15.0, &RenderConfig::new((40, 40)));
        for (x, y) in [(0, 0), (39, 0), (0, 39), (39, 39), (20, 20)] {
            assert_eq!(img.get_pixel(x, y).0, [0xf2, 0xee, 0xe5]);
        }
    }

    #[test]
    fn image_at_origin_fills_center() {
        let vp = Viewport::new(10.0, 10.0);
        let size = Vec2::new(5.0, 5.0);
        let red = placed("r.png", Rgb::new(255, 0, 0), Vec3::ZERO, size);
        let img = render_scene(&paper(vp), &[red], vp, 15.0, &RenderConfig::new((40, 40)));
        assert_eq!(img.get_pixel(20, 20).0, [255, 0, 0]);
        assert_eq!(img.get_pixel(11, 11).0, [255, 0, 0]);
        assert_eq!(img.get_pixel(2, 2).0, [0xf2, 0xee, 0xe5]);
    }

    #[test]
    fn nearer_images_paint_last_and_larger() {
        let vp = Viewport::new(10.0, 10.0);
        let size = Vec2::new(4.0, 4.0);
        let near = placed("n.png", Rgb::new(0, 0, 255), Vec3::Z, size);
        let far = placed("f.png", Rgb::new(0, 255, 0), Vec3::NEG_Z, size);
        let rc = RenderConfig::new((100, 100));
        let img = render_scene(&paper(vp), &[near.clone(), far.clone()], vp, 15.0, &rc);
        assert_eq!(img.get_pixel(50, 50).0, [0, 0, 255]);

        let proj = Projection {
            distance: 15.0,
            viewport: vp,
            pixels: Vec2::new(100.0, 100.0),
        };
        let (a0, _, a1, _) = proj.bounds(near.rect.position, size).expect("near");
        let (b0, _, b1, _) = proj.bounds(far.rect.position, size).expect("far");
        assert!(a1 - a0 > b1 - b0);
    }

    #[test]
    fn positive_y_is_up() {
        let vp = Viewport::new(10.0, 10.0);
        let up = Vec3::new(0.0, 4.0, 0.0);
        let top = placed("t.png", Rgb::new(9, 9, 9), up, Vec2::ONE);
        let img = render_scene(&paper(vp), &[top], vp, 15.0, &RenderConfig::new((100, 100)));
        assert_eq!(img.get_pixel(50, 10).0, [9, 9, 9]);
        assert_ne!(img.get_pixel(50, 90).0, [9, 9, 9]);
    }

    #[test]
    fn renders_collage_to_file() {
        let config = CollageConfig::new(400, 300).with_pacing(Duration::ZERO);
        let rng = StdRng::seed_from_u64(3);
        let mut collage = Collage::try_new(config, rng).expect("collage");
        let records: Vec<ImageRecord> = (0..5)
            .map(|i| record(&format!("{i}.png"), Rgb::new(200, 40 * i as u8, 10)))
            .collect();
        collage
            .load_all(&records, &mut ManifestDimensions, &mut ())
            .expect("load");

        let tmp = tempfile::tempdir().expect("tempdir");
        let out = tmp.path().join("preview.png");
        let rc = RenderConfig::new((200, 150)).with_outline([0, 0, 0]);
        render_collage_to_png(&collage, &rc, &out).expect("render");

        let (w, h) = image::image_dimensions(&out).expect("dimensions");
        assert_eq!((w, h), (200, 150));
    }

    #[test]
    fn rejects_empty_image_size() {
        assert!(RenderConfig::new((0, 10)).validate().is_err());
        assert!(RenderConfig::new((10, 10)).validate().is_ok());
    }
}
