//! Export: capture rendered pages and assemble them into one document.
//!
//! The pipeline is split at two seams so it can run without a real
//! rasterizer or PDF writer:
//!
//! - [`Rasterizer`] turns a page surface into a pixel capture
//! - [`DocumentAssembler`] appends one image per page and produces bytes
//!
//! With the `export` feature, `SvgRasterizer` (resvg) and [`PdfAssembler`]
//! (lopdf) provide the real implementations.

use log::{debug, info};

use crate::rendering::{Capture, PageSurface};
use crate::{Error, ExportConfig, Result};

/// Image-rasterization capability
pub trait Rasterizer {
    fn capture(&self, surface: &PageSurface) -> Result<Capture>;
}

/// Where an image lands on its page, in document units from the top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub width: f64,
    pub height: f64,
}

impl Placement {
    /// Full page width, height proportional to the capture.
    pub fn fit_width(capture: &Capture, page_width: f64) -> Result<Self> {
        if capture.width == 0 {
            return Err(Error::ExportError("capture has zero width".into()));
        }
        Ok(Self {
            width: page_width,
            height: capture.height as f64 * page_width / capture.width as f64,
        })
    }
}

/// Paginated-document-assembly capability
pub trait DocumentAssembler {
    /// Append `capture` as a new page. The first call starts the document.
    fn add_image_page(&mut self, capture: &Capture, placement: Placement) -> Result<()>;

    fn page_count(&self) -> usize;

    /// Finish the document and return its bytes.
    fn finish(self) -> Result<Vec<u8>>
    where
        Self: Sized;
}

/// Capture every surface in document order, one at a time, and append each
/// as its own page.
pub fn export_booklet<R, A>(surfaces: &[PageSurface], rasterizer: &R, assembler: &mut A, page_width: f64) -> Result<()>
where
    R: Rasterizer + ?Sized,
    A: DocumentAssembler,
{
    for (i, surface) in surfaces.iter().enumerate() {
        let capture = rasterizer.capture(surface)?;
        let placement = Placement::fit_width(&capture, page_width)?;
        debug!(
            "page {} ({}): {}x{} px placed at {:.2}x{:.2}",
            i,
            &surface.digest()[..12],
            capture.width,
            capture.height,
            placement.width,
            placement.height
        );
        assembler.add_image_page(&capture, placement)?;
    }
    info!("assembled {} pages", assembler.page_count());
    Ok(())
}

#[cfg(feature = "export")]
pub use pdf::{export_booklet_async, export_pdf, write_png_previews, PdfAssembler};

#[cfg(feature = "export")]
mod pdf {
    use std::io::Write;
    use std::path::{Path, PathBuf};

    use flate2::write::ZlibEncoder;
    use flate2::Compression;
    use log::info;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, ObjectId, Stream};

    use super::{export_booklet, DocumentAssembler, Placement, Rasterizer};
    use crate::rendering::raster::{encode_png, SvgRasterizer};
    use crate::rendering::{Capture, PageSurface};
    use crate::{Error, ExportConfig, Result};

    impl Rasterizer for SvgRasterizer {
        fn capture(&self, surface: &PageSurface) -> Result<Capture> {
            self.rasterize(surface)
        }
    }

    fn pdf_err(e: impl std::fmt::Display) -> Error {
        Error::ExportError(e.to_string())
    }

    /// Portrait PDF with one full-width image per page
    pub struct PdfAssembler {
        doc: Document,
        pages_id: ObjectId,
        page_ids: Vec<ObjectId>,
        page_width: f32,
        page_height: f32,
    }

    impl PdfAssembler {
        pub fn new(page_width: f64, page_height: f64) -> Self {
            let mut doc = Document::with_version("1.5");
            let pages_id = doc.new_object_id();
            Self {
                doc,
                pages_id,
                page_ids: Vec::new(),
                page_width: page_width as f32,
                page_height: page_height as f32,
            }
        }
    }

    impl DocumentAssembler for PdfAssembler {
        fn add_image_page(&mut self, capture: &Capture, placement: Placement) -> Result<()> {
            let mut zlib = ZlibEncoder::new(Vec::new(), Compression::default());
            zlib.write_all(&capture.to_rgb_over_white())?;
            let pixels = zlib.finish()?;

            let image = Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => capture.width as i64,
                    "Height" => capture.height as i64,
                    "ColorSpace" => "DeviceRGB",
                    "BitsPerComponent" => 8,
                    "Filter" => "FlateDecode",
                },
                pixels,
            )
            .with_compression(false);
            let image_id = self.doc.add_object(image);

            let name = format!("Im{}", self.page_ids.len() + 1);
            let w = placement.width as f32;
            let h = placement.height as f32;
            // PDF space is bottom-up; pin the image to the top edge.
            let content = Content {
                operations: vec![
                    Operation::new("q", vec![]),
                    Operation::new(
                        "cm",
                        vec![w.into(), 0.into(), 0.into(), h.into(), 0.into(), (self.page_height - h).into()],
                    ),
                    Operation::new("Do", vec![Object::Name(name.as_bytes().to_vec())]),
                    Operation::new("Q", vec![]),
                ],
            };
            let content_id = self
                .doc
                .add_object(Stream::new(dictionary! {}, content.encode().map_err(pdf_err)?));

            let page_id = self.doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => self.pages_id,
                "MediaBox" => vec![0.into(), 0.into(), self.page_width.into(), self.page_height.into()],
                "Contents" => content_id,
                "Resources" => dictionary! {
                    "XObject" => dictionary! { name.as_str() => image_id },
                },
            });
            self.page_ids.push(page_id);
            Ok(())
        }

        fn page_count(&self) -> usize {
            self.page_ids.len()
        }

        fn finish(mut self) -> Result<Vec<u8>> {
            if self.page_ids.is_empty() {
                return Err(Error::ExportError("no pages to export".into()));
            }
            let kids: Vec<Object> = self.page_ids.iter().map(|id| Object::Reference(*id)).collect();
            let pages = dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => self.page_ids.len() as i64,
            };
            self.doc.objects.insert(self.pages_id, Object::Dictionary(pages));
            let catalog_id = self.doc.add_object(dictionary! {
                "Type" => "Catalog",
                "Pages" => self.pages_id,
            });
            self.doc.trailer.set("Root", catalog_id);

            let mut out = Vec::new();
            self.doc.save_to(&mut out).map_err(pdf_err)?;
            Ok(out)
        }
    }

    /// Rasterize and assemble `surfaces` into PDF bytes.
    pub fn export_pdf(surfaces: &[PageSurface], config: &ExportConfig) -> Result<Vec<u8>> {
        let rasterizer = SvgRasterizer::new(config.scale, &config.extra_fonts)?;
        let mut pdf = PdfAssembler::new(config.page_width_pt, config.page_height_pt);
        export_booklet(surfaces, &rasterizer, &mut pdf, config.page_width_pt)?;
        pdf.finish()
    }

    /// Run `export_pdf` on a worker thread so the caller's event loop keeps
    /// running; the result comes back over a oneshot channel.
    pub async fn export_booklet_async(surfaces: Vec<PageSurface>, config: ExportConfig) -> Result<Vec<u8>> {
        let (tx, rx) = tokio::sync::oneshot::channel();
        std::thread::spawn(move || {
            let _ = tx.send(export_pdf(&surfaces, &config));
        });
        rx.await
            .map_err(|e| Error::ExportError(format!("export worker canceled: {}", e)))?
    }

    /// Write one `page-N.png` per surface into `dir`.
    pub fn write_png_previews(surfaces: &[PageSurface], config: &ExportConfig, dir: &Path) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(dir)?;
        let rasterizer = SvgRasterizer::new(config.scale, &config.extra_fonts)?;
        let mut written = Vec::with_capacity(surfaces.len());
        for (i, surface) in surfaces.iter().enumerate() {
            let path = dir.join(format!("page-{}.png", i));
            std::fs::write(&path, encode_png(&rasterizer.rasterize(surface)?)?)?;
            written.push(path);
        }
        info!("wrote {} page previews to {}", written.len(), dir.display());
        Ok(written)
    }
}

/// Target path for the exported document.
pub fn output_path(config: &ExportConfig, explicit: Option<&std::path::Path>) -> std::path::PathBuf {
    explicit
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| std::path::PathBuf::from(&config.file_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Records surface heights in call order; captures at 2x.
    struct FakeRasterizer {
        calls: RefCell<Vec<usize>>,
    }

    impl Rasterizer for FakeRasterizer {
        fn capture(&self, surface: &PageSurface) -> Result<Capture> {
            self.calls.borrow_mut().push(surface.height as usize);
            Ok(Capture::empty(surface.width * 2, surface.height * 2))
        }
    }

    #[derive(Default)]
    struct Recorder {
        pages: Vec<(u32, Placement)>,
    }

    impl DocumentAssembler for Recorder {
        fn add_image_page(&mut self, capture: &Capture, placement: Placement) -> Result<()> {
            self.pages.push((capture.height, placement));
            Ok(())
        }

        fn page_count(&self) -> usize {
            self.pages.len()
        }

        fn finish(self) -> Result<Vec<u8>> {
            Ok(vec![self.pages.len() as u8])
        }
    }

    fn surface(height: u32) -> PageSurface {
        PageSurface { width: 100, height, svg: String::new() }
    }

    #[test]
    fn pages_are_captured_in_order_with_proportional_height() {
        let surfaces = vec![surface(141), surface(200), surface(50), surface(141)];
        let r = FakeRasterizer { calls: RefCell::new(Vec::new()) };
        let mut rec = Recorder::default();
        export_booklet(&surfaces, &r, &mut rec, 500.0).unwrap();

        assert_eq!(*r.calls.borrow(), vec![141, 200, 50, 141]);
        assert_eq!(rec.page_count(), 4);
        let heights: Vec<f64> = rec.pages.iter().map(|(_, p)| p.height).collect();
        assert_eq!(heights, vec![705.0, 1000.0, 250.0, 705.0]);
        assert!(rec.pages.iter().all(|(_, p)| p.width == 500.0));
        assert_eq!(rec.finish().unwrap(), vec![4]);
    }

    #[test]
    fn rasterizer_failure_stops_export() {
        struct Broken;
        impl Rasterizer for Broken {
            fn capture(&self, _surface: &PageSurface) -> Result<Capture> {
                Err(Error::RenderError("boom".into()))
            }
        }
        let mut rec = Recorder::default();
        let err = export_booklet(&[surface(10)], &Broken, &mut rec, 10.0).unwrap_err();
        assert!(matches!(err, Error::RenderError(_)));
        assert_eq!(rec.page_count(), 0);
    }

    #[test]
    fn zero_width_capture_is_an_error() {
        assert!(Placement::fit_width(&Capture::empty(0, 10), 100.0).is_err());
    }

    #[test]
    fn default_output_uses_fixed_name() {
        let cfg = ExportConfig::default();
        assert_eq!(output_path(&cfg, None), std::path::PathBuf::from("activity-booklet.pdf"));
    }

    #[cfg(feature = "export")]
    #[test]
    fn pdf_has_one_page_per_image() {
        let mut pdf = PdfAssembler::new(595.28, 841.89);
        for _ in 0..4 {
            let cap = Capture::empty(4, 6);
            let placement = Placement::fit_width(&cap, 595.28).unwrap();
            pdf.add_image_page(&cap, placement).unwrap();
        }
        let bytes = pdf.finish().unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 4);
    }

    #[cfg(feature = "export")]
    #[test]
    fn empty_pdf_is_rejected() {
        assert!(PdfAssembler::new(595.28, 841.89).finish().is_err());
    }
}
