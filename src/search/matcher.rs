//! Query matching against a prepared gallery.

use crate::feature::Descriptor;
use crate::gallery::Gallery;
use crate::image::{ImageSource, ImageView};
use crate::pipeline::{Pipeline, PipelineConfig};
use crate::search::{distance, rank, select_best, Match};
use crate::trace::{trace_event, trace_span};
use crate::util::EdgeMatchResult;
use std::path::Path;

/// Pipeline paired with the gallery it produced.
pub struct Matcher {
    pipeline: Pipeline,
    gallery: Gallery,
}

impl Matcher {
    /// Wraps an existing gallery; its descriptors must come from `pipeline`.
    pub fn new(pipeline: Pipeline, gallery: Gallery) -> Self {
        Self { pipeline, gallery }
    }

    /// Builds the pipeline and the gallery from image paths.
    pub fn from_paths<S, P>(cfg: PipelineConfig, paths: &[P], source: &S) -> EdgeMatchResult<Self>
    where
        S: ImageSource + ?Sized,
        P: AsRef<Path> + Sync,
    {
        let pipeline = Pipeline::new(cfg)?;
        let gallery = Gallery::build(paths, source, &pipeline)?;
        Ok(Self::new(pipeline, gallery))
    }

    /// Returns the pipeline.
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Returns the gallery.
    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    /// Distances from `query` to every entry, in gallery order.
    pub fn distances(&self, query: &Descriptor) -> EdgeMatchResult<Vec<f32>> {
        let metric = self.pipeline.config().metric;

        #[cfg(feature = "rayon")]
        {
            if self.pipeline.config().parallel {
                use rayon::prelude::*;
                return self
                    .gallery
                    .entries()
                    .par_iter()
                    .map(|entry| distance(query, entry.descriptor(), metric))
                    .collect();
            }
        }

        self.gallery
            .descriptors()
            .map(|candidate| distance(query, candidate, metric))
            .collect()
    }

    /// Returns the closest entry, or `None` for an empty gallery.
    pub fn match_descriptor(&self, query: &Descriptor) -> EdgeMatchResult<Option<Match>> {
        let _span = trace_span!("match_query", gallery = self.gallery.len()).entered();
        let best = select_best(&self.distances(query)?);
        if let Some(found) = best {
            trace_event!("best_match", ordinal = found.ordinal(), distance = found.distance);
        }
        Ok(best)
    }

    /// Describes a `side x side` grayscale image and matches it.
    pub fn match_image(&self, image: ImageView<'_, u8>) -> EdgeMatchResult<Option<Match>> {
        let query = self.pipeline.describe(image)?;
        self.match_descriptor(&query)
    }

    /// Loads the query through `source` and matches it.
    pub fn match_path<S: ImageSource + ?Sized>(
        &self,
        source: &S,
        path: &Path,
    ) -> EdgeMatchResult<Option<Match>> {
        let query = self.pipeline.describe_path(source, path)?;
        self.match_descriptor(&query)
    }

    /// Returns up to `k` closest entries, nearest first.
    pub fn match_image_topk(&self, image: ImageView<'_, u8>, k: usize) -> EdgeMatchResult<Vec<Match>> {
        let query = self.pipeline.describe(image)?;
        self.rank_descriptor(&query, k)
    }

    /// Ranks the gallery for a precomputed query descriptor, keeping `k` entries.
    pub fn rank_descriptor(&self, query: &Descriptor, k: usize) -> EdgeMatchResult<Vec<Match>> {
        let mut ranked = rank(&self.distances(query)?);
        ranked.truncate(k);
        Ok(ranked)
    }
}
