//! Reference descriptors a query is compared against.
//!
//! A gallery is built once from an ordered list of image paths and is
//! read-only afterwards. Entry order is the order of the input paths, which
//! keeps best-match tie-breaking deterministic even when descriptors are
//! computed in parallel.

use crate::feature::Descriptor;
use crate::image::ImageSource;
use crate::pipeline::Pipeline;
use crate::trace::{trace_event, trace_span};
use crate::util::{EdgeMatchError, EdgeMatchResult};
use std::path::Path;

/// Labelled descriptor stored in a gallery.
#[derive(Clone, Debug)]
pub struct GalleryEntry {
    label: String,
    descriptor: Descriptor,
}

impl GalleryEntry {
    /// Label the entry was registered under (the source path for built galleries).
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Descriptor of the reference image.
    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }
}

/// Ordered collection of reference descriptors sharing one shape.
#[derive(Clone, Debug, Default)]
pub struct Gallery {
    entries: Vec<GalleryEntry>,
}

impl Gallery {
    /// Creates an empty gallery.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads and describes every path in order.
    ///
    /// The first load or decode failure aborts the build; no partial gallery
    /// is returned. With the `rayon` feature and `parallel` set in the
    /// pipeline config, images are processed concurrently.
    pub fn build<S, P>(paths: &[P], source: &S, pipeline: &Pipeline) -> EdgeMatchResult<Self>
    where
        S: ImageSource + ?Sized,
        P: AsRef<Path> + Sync,
    {
        let _span = trace_span!("gallery_build", entries = paths.len()).entered();

        let describe = |path: &P| -> EdgeMatchResult<GalleryEntry> {
            let path = path.as_ref();
            let descriptor = pipeline.describe_path(source, path)?;
            Ok(GalleryEntry {
                label: path.display().to_string(),
                descriptor,
            })
        };

        #[cfg(feature = "rayon")]
        let entries = if pipeline.config().parallel {
            use rayon::prelude::*;
            paths
                .par_iter()
                .map(describe)
                .collect::<EdgeMatchResult<Vec<_>>>()?
        } else {
            paths
                .iter()
                .map(describe)
                .collect::<EdgeMatchResult<Vec<_>>>()?
        };

        #[cfg(not(feature = "rayon"))]
        let entries = paths
            .iter()
            .map(describe)
            .collect::<EdgeMatchResult<Vec<_>>>()?;

        for entry in &entries {
            trace_event!("gallery_entry", label = entry.label.as_str());
        }
        Ok(Self { entries })
    }

    /// Appends a descriptor; it must match the shape of existing entries.
    pub fn push<L: Into<String>>(&mut self, label: L, descriptor: Descriptor) -> EdgeMatchResult<()> {
        if let Some(first) = self.entries.first() {
            let expected = &first.descriptor;
            if expected.num_channels() != descriptor.num_channels() {
                return Err(EdgeMatchError::ChannelMismatch {
                    expected: expected.num_channels(),
                    got: descriptor.num_channels(),
                });
            }
            if expected.shape() != descriptor.shape() {
                return Err(EdgeMatchError::ShapeMismatch {
                    expected: expected.shape(),
                    got: descriptor.shape(),
                });
            }
        }
        self.entries.push(GalleryEntry {
            label: label.into(),
            descriptor,
        });
        Ok(())
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[GalleryEntry] {
        &self.entries
    }

    /// Entry at a zero-based index.
    pub fn get(&self, index: usize) -> Option<&GalleryEntry> {
        self.entries.get(index)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when the gallery holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Descriptors in gallery order.
    pub fn descriptors(&self) -> impl Iterator<Item = &Descriptor> + '_ {
        self.entries.iter().map(|entry| &entry.descriptor)
    }
}
