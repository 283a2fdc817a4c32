//! Building blocks for custom pipelines.
//!
//! These expose the convolution engine, gradient extraction, aggregation and
//! distance helpers directly. Most users should prefer `Pipeline`,
//! `Gallery` and `Matcher`.

pub use crate::feature::{edge_magnitude, extract_gradients};
pub use crate::filter::{convolve, convolve_into, Sample};
pub use crate::image::normalize_u8;
pub use crate::search::{best_match, distance, rank, select_best};
