#![cfg(feature = "rayon")]

use edgematch::{Gallery, Matcher, MemorySource, OwnedImage, Pipeline, PipelineConfig};

fn make_image(side: usize, seed: usize) -> OwnedImage<u8> {
    let mut data = Vec::with_capacity(side * side);
    for y in 0..side {
        for x in 0..side {
            let value = ((x * 13 + seed) ^ (y * 7) ^ (x * y * (seed + 1))) & 0xFF;
            data.push(value as u8);
        }
    }
    OwnedImage::new(data, side, side).unwrap()
}

#[test]
fn parallel_gallery_matches_sequential() {
    let side = 32;
    let mut source = MemorySource::new();
    let paths: Vec<String> = (0..12).map(|i| format!("ref{i}.png")).collect();
    for (i, path) in paths.iter().enumerate() {
        source.insert(path.as_str(), make_image(side, i));
    }
    let query = make_image(side, 7);

    for base in [
        PipelineConfig::float_magnitude(),
        PipelineConfig::quantized_directional(),
        PipelineConfig::edge_enhance(),
    ] {
        let seq_cfg = PipelineConfig {
            side,
            parallel: false,
            ..base.clone()
        };
        let par_cfg = PipelineConfig {
            side,
            parallel: true,
            ..base
        };

        let seq = Gallery::build(&paths, &source, &Pipeline::new(seq_cfg.clone()).unwrap()).unwrap();
        let par = Gallery::build(&paths, &source, &Pipeline::new(par_cfg.clone()).unwrap()).unwrap();
        assert_eq!(seq.len(), par.len());
        for (a, b) in seq.entries().iter().zip(par.entries()) {
            assert_eq!(a.label(), b.label());
            assert_eq!(a.descriptor(), b.descriptor());
        }

        let seq_matcher = Matcher::from_paths(seq_cfg, &paths, &source).unwrap();
        let par_matcher = Matcher::from_paths(par_cfg, &paths, &source).unwrap();
        let seq_best = seq_matcher.match_image(query.view()).unwrap().unwrap();
        let par_best = par_matcher.match_image(query.view()).unwrap().unwrap();
        assert_eq!(seq_best, par_best);
        assert_eq!(seq_best.index, 7);
    }
}

#[test]
fn parallel_build_still_aborts_on_missing_image() {
    let side = 16;
    let source = MemorySource::new().with("present.png", make_image(side, 1));
    let cfg = PipelineConfig {
        side,
        parallel: true,
        ..PipelineConfig::default()
    };
    let result = Matcher::from_paths(cfg, &["present.png", "gone.png", "present.png"], &source);
    assert!(result.is_err());
}
