//! Pipeline configuration and descriptor extraction.
//!
//! A pipeline fixes the working resolution, the numeric mode of the
//! convolution engine, the kernel bank, how gradients become a descriptor,
//! and the distance metric. The presets reproduce the three known variants:
//! float edge magnitude compared with L1, quantized per-direction gradients
//! compared with averaged L2, and a single quantized edge kernel with L2.

use crate::feature::{edge_magnitude, extract_gradients, widen, Descriptor};
use crate::filter::Sample;
use crate::image::{normalize_u8, ImageSource, ImageView, OwnedImage};
use crate::kernel::{BankKind, KernelBank};
use crate::search::Metric;
use crate::trace::{trace_event, trace_span};
use crate::util::{EdgeMatchError, EdgeMatchResult};
use std::path::Path;

/// Side length of the square working resolution.
pub const DEFAULT_SIDE: usize = 64;

/// Sample representation fed to the convolution engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum NumericMode {
    /// Intensities divided by 255; responses stored unclamped.
    #[default]
    Normalized,
    /// Raw 8-bit intensities; responses clamped to `[0, 255]` and truncated.
    Quantized,
}

/// How gradient buffers turn into descriptor channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Aggregation {
    /// One channel holding the per-pixel Euclidean magnitude.
    #[default]
    Magnitude,
    /// One channel per kernel, compared independently.
    PerDirection,
}

/// Configuration for descriptor extraction and matching.
#[derive(Clone, Debug, PartialEq)]
pub struct PipelineConfig {
    /// Working resolution; every image must be `side x side`.
    pub side: usize,
    /// Numeric mode of the convolution engine.
    pub numeric: NumericMode,
    /// Built-in kernel bank.
    pub bank: BankKind,
    /// Gradient aggregation strategy.
    pub aggregation: Aggregation,
    /// Distance metric.
    pub metric: Metric,
    /// Build the gallery and score candidates in parallel (`rayon` feature).
    pub parallel: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::float_magnitude()
    }
}

impl PipelineConfig {
    /// Normalized input, 5×5 directional bank, edge magnitude, L1.
    pub fn float_magnitude() -> Self {
        Self {
            side: DEFAULT_SIDE,
            numeric: NumericMode::Normalized,
            bank: BankKind::Directional5,
            aggregation: Aggregation::Magnitude,
            metric: Metric::L1,
            parallel: false,
        }
    }

    /// Quantized input, 5×5 directional bank, per-direction channels, L2.
    pub fn quantized_directional() -> Self {
        Self {
            numeric: NumericMode::Quantized,
            aggregation: Aggregation::PerDirection,
            metric: Metric::L2,
            ..Self::float_magnitude()
        }
    }

    /// Quantized input through the single edge kernel, L2.
    pub fn edge_enhance() -> Self {
        Self {
            numeric: NumericMode::Quantized,
            bank: BankKind::Edge5,
            aggregation: Aggregation::Magnitude,
            metric: Metric::L2,
            ..Self::float_magnitude()
        }
    }

    /// Checks that the resolution can host the selected kernels.
    pub fn validate(&self) -> EdgeMatchResult<()> {
        check_fits(self.side, self.bank.side())
    }
}

fn check_fits(side: usize, kernel_side: usize) -> EdgeMatchResult<()> {
    if side == 0 {
        return Err(EdgeMatchError::InvalidConfig("side must be non-zero"));
    }
    if kernel_side > side {
        return Err(EdgeMatchError::InvalidConfig(
            "kernel side exceeds image side",
        ));
    }
    Ok(())
}

/// Turns fixed-size grayscale images into descriptors.
#[derive(Clone, Debug)]
pub struct Pipeline {
    cfg: PipelineConfig,
    bank: KernelBank,
}

impl Pipeline {
    /// Builds a pipeline with the bank named in `cfg`.
    pub fn new(cfg: PipelineConfig) -> EdgeMatchResult<Self> {
        cfg.validate()?;
        let bank = KernelBank::from_kind(cfg.bank);
        Ok(Self { cfg, bank })
    }

    /// Builds a pipeline around a caller-supplied bank; `cfg.bank` is ignored.
    pub fn with_bank(cfg: PipelineConfig, bank: KernelBank) -> EdgeMatchResult<Self> {
        check_fits(cfg.side, bank.side())?;
        Ok(Self { cfg, bank })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.cfg
    }

    /// Returns the kernel bank.
    pub fn bank(&self) -> &KernelBank {
        &self.bank
    }

    /// Extracts the descriptor of a `side x side` grayscale image.
    pub fn describe(&self, image: ImageView<'_, u8>) -> EdgeMatchResult<Descriptor> {
        let side = self.cfg.side;
        if image.shape() != (side, side) {
            return Err(EdgeMatchError::ShapeMismatch {
                expected: (side, side),
                got: image.shape(),
            });
        }
        let _span = trace_span!("describe", side = side, kernels = self.bank.len()).entered();

        let descriptor = match self.cfg.numeric {
            NumericMode::Normalized => {
                let norm = normalize_u8(image);
                self.aggregate(extract_gradients(norm.view(), &self.bank))
            }
            NumericMode::Quantized => self.aggregate(extract_gradients(image, &self.bank)),
        };
        trace_event!("descriptor", channels = descriptor.num_channels());
        Ok(descriptor)
    }

    /// Loads `path` through `source` and extracts its descriptor.
    pub fn describe_path<S: ImageSource + ?Sized>(
        &self,
        source: &S,
        path: &Path,
    ) -> EdgeMatchResult<Descriptor> {
        let image = source.load(path, self.cfg.side)?;
        self.describe(image.view())
    }

    fn aggregate<T: Sample>(&self, gradients: Vec<OwnedImage<T>>) -> Descriptor {
        match self.cfg.aggregation {
            Aggregation::Magnitude => Descriptor::single(edge_magnitude(&gradients)),
            Aggregation::PerDirection => Descriptor::from_channels(gradients.iter().map(widen).collect()),
        }
    }
}
