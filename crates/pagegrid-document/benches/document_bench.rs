// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the pagegrid-document crate: grid placement and
// PNG encoding of a rendered page.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{Rgb, RgbImage};

use pagegrid_core::config::SizingPolicy;
use pagegrid_document::{DocxWriter, GridLayoutEngine, ImageProcessor, PageImage};

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Lay out 1,000 placements in a three-column table, growing rows as needed.
fn bench_grid_layout(c: &mut Criterion) {
    c.bench_function("grid_layout (1000 placements)", |b| {
        b.iter(|| {
            let mut writer = DocxWriter::new(3);
            let mut engine =
                GridLayoutEngine::for_grid(&writer, SizingPolicy::Legacy).expect("engine");
            for _ in 0..1000 {
                black_box(engine.place(&mut writer));
            }
        });
    });
}

/// Encode a 425x550 page (a Letter page at 50 DPI) to PNG.
///
/// Full 300 DPI pages are ~36x larger; this keeps iterations short while
/// still exercising the same encoder path.
fn bench_png_encode(c: &mut Criterion) {
    let mut pixels = RgbImage::from_pixel(425, 550, Rgb([255, 255, 255]));
    for y in (40..510).step_by(12) {
        for x in 40..385 {
            pixels.put_pixel(x, y, Rgb([20, 20, 20]));
        }
    }

    c.bench_function("png_encode (425x550)", |b| {
        b.iter(|| {
            let page = PageImage::new(0, black_box(pixels.clone()));
            black_box(ImageProcessor::from_page(page).encode().expect("encode"));
        });
    });
}

criterion_group!(benches, bench_grid_layout, bench_png_encode);
criterion_main!(benches);
