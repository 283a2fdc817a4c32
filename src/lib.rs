//! EdgeMatch finds the most similar reference image by comparing
//! hand-computed edge descriptors.
//!
//! Every image is brought to a fixed square resolution, convolved with a
//! bank of directional (or single edge-enhancing) kernels, aggregated into a
//! descriptor and compared against a gallery with an L1 or L2 distance. The
//! nearest entry wins, ties going to the lowest gallery index. Gallery
//! construction can run in parallel via the `rayon` feature, and decoding
//! files from disk is available with `image-io`.

pub mod feature;
pub mod filter;
pub mod gallery;
pub mod image;
pub mod kernel;
pub mod lowlevel;
pub mod pipeline;
pub mod search;
pub(crate) mod trace;
pub mod util;

#[cfg(feature = "image-io")]
pub use crate::image::io;

pub use crate::feature::Descriptor;
pub use crate::gallery::{Gallery, GalleryEntry};
pub use crate::image::{ImageSource, ImageView, MemorySource, OwnedImage};
pub use crate::kernel::{BankKind, Kernel, KernelBank};
pub use crate::pipeline::{Aggregation, NumericMode, Pipeline, PipelineConfig, DEFAULT_SIDE};
pub use crate::search::{Match, Matcher, Metric};
pub use crate::util::{EdgeMatchError, EdgeMatchResult};
