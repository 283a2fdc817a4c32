#![cfg(feature = "tracing")]

use edgematch::{BankKind, Matcher, MemorySource, OwnedImage, PipelineConfig};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn stripes(side: usize) -> OwnedImage<u8> {
    let data = (0..side * side)
        .map(|i| if (i % side) % 3 == 0 { 255u8 } else { 0u8 })
        .collect();
    OwnedImage::new(data, side, side).unwrap()
}

#[test]
fn info_filter_captures_gallery_and_match_events() {
    let buf = SharedBuf::default();
    let writer = buf.clone();
    let _guard = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("").add_directive("edgematch=info".parse().unwrap()))
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_target(false)
        .set_default();

    let side = 8;
    let source = MemorySource::new()
        .with("flat", OwnedImage::new(vec![128u8; side * side], side, side).unwrap())
        .with("stripes", stripes(side));
    let cfg = PipelineConfig {
        side,
        bank: BankKind::Directional3,
        ..PipelineConfig::default()
    };
    let matcher = Matcher::from_paths(cfg, &["flat", "stripes"], &source).unwrap();
    let best = matcher.match_image(stripes(side).view()).unwrap().unwrap();
    assert_eq!(best.ordinal(), 2);

    let captured = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
    assert!(captured.contains("label="), "gallery entries missing: {captured}");
    assert!(captured.contains("ordinal=2"), "best match missing: {captured}");
    assert!(captured.contains("match_query"), "span context missing: {captured}");
}
