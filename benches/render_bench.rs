use std::path::Path;

use criterion::{criterion_group, criterion_main, Criterion};

use booklet_studio::rendering::render_booklet;
use booklet_studio::Booklet;

// Run with:
//    cargo bench --bench render_bench

fn fixture() -> Booklet {
    Booklet::load(Path::new("tests/fixtures/dinosaur_crossword.json")).expect("load fixture")
}

/// Bench: layout + SVG serialization of a five-page booklet
fn bench_render_booklet(c: &mut Criterion) {
    let pages = fixture().pages();
    c.bench_function("render_booklet", |b| {
        b.iter(|| {
            let surfaces = render_booklet(&pages);
            assert_eq!(surfaces.len(), pages.len());
        })
    });
}

/// Bench: rasterize and assemble the same booklet into a PDF
#[cfg_attr(not(feature = "export"), allow(unused_variables))]
fn bench_export_pdf(c: &mut Criterion) {
    #[cfg(feature = "export")]
    {
        use booklet_studio::export::export_pdf;
        use booklet_studio::ExportConfig;

        let surfaces = render_booklet(&fixture().pages());
        let cfg = ExportConfig { scale: 1.0, ..Default::default() };
        let mut group = c.benchmark_group("export");
        group.sample_size(10);
        group.bench_function("export_pdf_scale_1", |b| {
            b.iter(|| export_pdf(&surfaces, &cfg).expect("export failed"))
        });
        group.finish();
    }
}

criterion_group!(benches, bench_render_booklet, bench_export_pdf);
criterion_main!(benches);
