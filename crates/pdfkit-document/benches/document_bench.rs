// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the pdfkit-document crate: composing a PDF from
// images and merging the result with itself.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, Rgb, RgbImage};

use pdfkit_document::{DecodedImage, ImagePdfBuilder, PdfMerger};

fn png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 128]));
    DecodedImage::from_dynamic(DynamicImage::ImageRgb8(img))
        .to_png_bytes()
        .expect("encode bench fixture")
}

/// Four 200x300 images into one four-page PDF.
fn bench_images_to_pdf(c: &mut Criterion) {
    let images: Vec<Vec<u8>> = (0..4).map(|_| png(200, 300)).collect();

    c.bench_function("images_to_pdf (4 x 200x300)", |b| {
        b.iter(|| {
            let mut builder =
                ImagePdfBuilder::from_first_image("bench", black_box(&images[0])).unwrap();
            for image in &images[1..] {
                builder.append_image(black_box(image)).unwrap();
            }
            black_box(builder.finish());
        });
    });
}

/// Merge a four-page PDF with itself.
fn bench_merge(c: &mut Criterion) {
    let mut builder = ImagePdfBuilder::from_first_image("bench", &png(100, 100)).unwrap();
    for _ in 0..3 {
        builder.append_image(&png(100, 100)).unwrap();
    }
    let pdf = builder.finish();

    c.bench_function("merge_pdfs (4 + 4 pages)", |b| {
        b.iter(|| {
            let mut merger = PdfMerger::new();
            merger.add(black_box(&pdf)).unwrap();
            merger.add(black_box(&pdf)).unwrap();
            black_box(merger.save_as_buffer().unwrap());
        });
    });
}

criterion_group!(benches, bench_images_to_pdf, bench_merge);
criterion_main!(benches);
