/// Rasterizer: SVG page surfaces to pixel captures via resvg

use std::path::PathBuf;
use std::sync::Arc;

use log::{debug, warn};
use resvg::tiny_skia::{self, Color, Pixmap, Transform};
use resvg::usvg::{self, fontdb};

use crate::rendering::{Capture, PageSurface};
use crate::{Error, Result};

/// Families tried, in order, when mapping the generic `sans-serif` and
/// `monospace` names onto installed fonts.
const SANS_CANDIDATES: &[&str] = &["DejaVu Sans", "Liberation Sans", "Noto Sans", "Arial", "Helvetica"];
const MONO_CANDIDATES: &[&str] = &["DejaVu Sans Mono", "Liberation Mono", "Noto Sans Mono", "Courier New"];

/// Captures SVG surfaces at a fixed scale
pub struct SvgRasterizer {
    scale: f32,
    fontdb: Arc<fontdb::Database>,
}

impl SvgRasterizer {
    /// Load system fonts plus any extra font files.
    pub fn new(scale: f32, extra_fonts: &[PathBuf]) -> Result<Self> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(Error::ConfigError(format!("capture scale must be positive, got {}", scale)));
        }

        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        for path in extra_fonts {
            db.load_font_file(path)?;
        }
        if db.len() == 0 {
            warn!("no fonts found; page text will not appear in captures");
        }

        if let Some(name) = pick_family(&db, SANS_CANDIDATES) {
            db.set_sans_serif_family(name);
        }
        if let Some(name) = pick_family(&db, MONO_CANDIDATES) {
            db.set_monospace_family(name);
        }

        Ok(Self { scale, fontdb: Arc::new(db) })
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Rasterize one surface over a white background.
    pub fn rasterize(&self, surface: &PageSurface) -> Result<Capture> {
        let mut opt = usvg::Options::default();
        opt.fontdb = self.fontdb.clone();

        let tree = usvg::Tree::from_str(&surface.svg, &opt)
            .map_err(|e| Error::RenderError(format!("SVG parse error: {}", e)))?;

        let width = (surface.width as f32 * self.scale).round().max(1.0) as u32;
        let height = (surface.height as f32 * self.scale).round().max(1.0) as u32;
        let mut pixmap = Pixmap::new(width, height)
            .ok_or_else(|| Error::RenderError(format!("pixmap alloc failed for {}x{}", width, height)))?;
        pixmap.fill(Color::WHITE);

        resvg::render(&tree, Transform::from_scale(self.scale, self.scale), &mut pixmap.as_mut());
        debug!("captured {}x{} page at scale {}", width, height, self.scale);

        Ok(capture_from_pixmap(&pixmap))
    }
}

fn pick_family(db: &fontdb::Database, candidates: &[&str]) -> Option<String> {
    let installed: Vec<&str> = db
        .faces()
        .flat_map(|face| face.families.iter().map(|(name, _)| name.as_str()))
        .collect();
    candidates
        .iter()
        .find(|c| installed.contains(c))
        .map(|c| c.to_string())
        .or_else(|| installed.first().map(|s| s.to_string()))
}

fn capture_from_pixmap(pixmap: &tiny_skia::Pixmap) -> Capture {
    let mut rgba = Vec::with_capacity(pixmap.data().len());
    for px in pixmap.pixels() {
        let c = px.demultiply();
        rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    Capture {
        width: pixmap.width(),
        height: pixmap.height(),
        rgba,
    }
}

/// Encode a capture as PNG bytes (deterministic for the same input).
pub fn encode_png(capture: &Capture) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    {
        let mut enc = png::Encoder::new(&mut buf, capture.width, capture.height);
        enc.set_color(png::ColorType::Rgba);
        enc.set_depth(png::BitDepth::Eight);
        let mut writer = enc
            .write_header()
            .map_err(|e| Error::ExportError(format!("PNG header: {}", e)))?;
        writer
            .write_image_data(&capture.rgba)
            .map_err(|e| Error::ExportError(format!("PNG data: {}", e)))?;
    }
    Ok(buf)
}
