use edgematch::lowlevel::{convolve, normalize_u8};
use edgematch::{KernelBank, Matcher, MemorySource, OwnedImage, PipelineConfig};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

fn make_image(side: usize, seed: usize) -> OwnedImage<u8> {
    let mut data = Vec::with_capacity(side * side);
    for y in 0..side {
        for x in 0..side {
            let value = ((x * 13 + seed) ^ (y * 7) ^ (x * y)) & 0xFF;
            data.push(value as u8);
        }
    }
    OwnedImage::new(data, side, side).unwrap()
}

fn bench_convolution(c: &mut Criterion) {
    let image = make_image(64, 0);
    let norm = normalize_u8(image.view());
    let bank = KernelBank::directional_5x5();
    let kernel = &bank.kernels()[0];

    c.bench_function("convolve_5x5_f32_64", |b| {
        b.iter(|| black_box(convolve(norm.view(), kernel)));
    });
    c.bench_function("convolve_5x5_u8_64", |b| {
        b.iter(|| black_box(convolve(image.view(), kernel)));
    });
}

fn bench_matcher(c: &mut Criterion) {
    let mut source = MemorySource::new();
    let paths: Vec<String> = (0..10).map(|i| format!("face{}.jpg", i + 1)).collect();
    for (i, path) in paths.iter().enumerate() {
        source.insert(path.as_str(), make_image(64, i * 17));
    }
    let query = make_image(64, 7 * 17);

    for (name, cfg) in [
        ("float_magnitude", PipelineConfig::float_magnitude()),
        ("quantized_directional", PipelineConfig::quantized_directional()),
        ("edge_enhance", PipelineConfig::edge_enhance()),
    ] {
        c.bench_function(&format!("gallery_build_{name}"), |b| {
            b.iter(|| black_box(Matcher::from_paths(cfg.clone(), &paths, &source).unwrap()));
        });

        let matcher = Matcher::from_paths(cfg, &paths, &source).unwrap();
        c.bench_function(&format!("match_query_{name}"), |b| {
            b.iter(|| black_box(matcher.match_image(query.view()).unwrap()));
        });
    }
}

criterion_group!(benches, bench_convolution, bench_matcher);
criterion_main!(benches);
