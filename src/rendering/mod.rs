//! Rendering module
//!
//! Pages are laid out as a display list of paint commands (`paint`), using
//! the box helpers in `layout`, and serialized to SVG surfaces. With the
//! `export` feature, `raster` turns surfaces into pixel captures.

pub mod layout;
pub mod pages;
pub mod paint;
#[cfg(feature = "export")]
pub mod raster;

pub use pages::{crossword_cells, render_booklet, render_page};

/// Page surface width in SVG user units.
pub const PAGE_WIDTH: u32 = 800;
/// Page surface height; 1 : 1.414 print proportions.
pub const PAGE_HEIGHT: u32 = 1131;

/// A rendered page, ready to be shown or captured.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSurface {
    pub width: u32,
    pub height: u32,
    pub svg: String,
}

impl PageSurface {
    /// Hex SHA-256 of the SVG markup; identical layouts hash identically.
    pub fn digest(&self) -> String {
        use sha2::{Digest, Sha256};
        hex::encode(Sha256::digest(self.svg.as_bytes()))
    }
}

/// A raster capture of one page (straight, non-premultiplied RGBA).
#[derive(Debug, Clone)]
pub struct Capture {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl Capture {
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            rgba: vec![255; (width as usize) * (height as usize) * 4],
        }
    }

    /// RGB bytes with alpha composited over white.
    pub fn to_rgb_over_white(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.rgba.len() / 4 * 3);
        for px in self.rgba.chunks_exact(4) {
            let a = px[3] as u32;
            for &c in &px[..3] {
                out.push(((c as u32 * a + 255 * (255 - a)) / 255) as u8);
            }
        }
        out
    }
}
