//! Convolution kernels and the fixed kernel banks.
//!
//! Weights are stored row-major. The directional banks are ordered
//! horizontal, vertical, +45°, −45°; callers that label gradient channels
//! rely on that order.

use crate::util::{EdgeMatchError, EdgeMatchResult};

/// Immutable square kernel with an odd side length.
#[derive(Clone, Debug, PartialEq)]
pub struct Kernel {
    side: usize,
    weights: Vec<f32>,
}

impl Kernel {
    /// Builds a kernel from `side * side` row-major weights.
    pub fn new(side: usize, weights: Vec<f32>) -> EdgeMatchResult<Self> {
        if side == 0 || side % 2 == 0 || weights.len() != side * side {
            return Err(EdgeMatchError::InvalidKernel {
                side,
                len: weights.len(),
            });
        }
        Ok(Self { side, weights })
    }

    fn from_table<const N: usize>(side: usize, table: &[f32; N]) -> Self {
        debug_assert_eq!(side * side, N);
        Self {
            side,
            weights: table.to_vec(),
        }
    }

    /// Side length in pixels.
    pub fn side(&self) -> usize {
        self.side
    }

    /// Number of border pixels left untouched on each edge (`side / 2`).
    pub fn pad(&self) -> usize {
        self.side / 2
    }

    /// Row-major weights.
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Weight at row `fy`, column `fx`.
    pub fn weight(&self, fx: usize, fy: usize) -> f32 {
        self.weights[fy * self.side + fx]
    }
}

#[rustfmt::skip]
const HORIZONTAL_5: [f32; 25] = [
     0.0,  0.0,  0.0,  0.0,  0.0,
     1.0,  1.0,  1.0,  1.0,  1.0,
     0.0,  0.0,  0.0,  0.0,  0.0,
    -1.0, -1.0, -1.0, -1.0, -1.0,
     0.0,  0.0,  0.0,  0.0,  0.0,
];

#[rustfmt::skip]
const VERTICAL_5: [f32; 25] = [
    0.0, 1.0, 0.0, -1.0, 0.0,
    0.0, 1.0, 0.0, -1.0, 0.0,
    0.0, 1.0, 0.0, -1.0, 0.0,
    0.0, 1.0, 0.0, -1.0, 0.0,
    0.0, 1.0, 0.0, -1.0, 0.0,
];

#[rustfmt::skip]
const DIAGONAL_45_5: [f32; 25] = [
    0.0,  0.0,  0.0,  1.0,  0.0,
    0.0,  1.0,  1.0,  0.0, -1.0,
    0.0,  1.0,  0.0, -1.0,  0.0,
    1.0,  0.0, -1.0, -1.0,  0.0,
    0.0, -1.0,  0.0,  0.0,  0.0,
];

#[rustfmt::skip]
const DIAGONAL_MINUS_45_5: [f32; 25] = [
    0.0, -1.0,  0.0,  0.0,  0.0,
    1.0,  0.0, -1.0, -1.0,  0.0,
    0.0,  1.0,  0.0, -1.0,  0.0,
    0.0,  1.0,  1.0,  0.0, -1.0,
    0.0,  0.0,  0.0,  1.0,  0.0,
];

#[rustfmt::skip]
const EDGE_5: [f32; 25] = [
    -1.0, -1.0, -1.0, -1.0, -1.0,
    -1.0, -1.0, -1.0, -1.0, -1.0,
    -1.0, -1.0, 24.0, -1.0, -1.0,
    -1.0, -1.0, -1.0, -1.0, -1.0,
    -1.0, -1.0, -1.0, -1.0, -1.0,
];

#[rustfmt::skip]
const HORIZONTAL_3: [f32; 9] = [
     1.0,  1.0,  1.0,
     0.0,  0.0,  0.0,
    -1.0, -1.0, -1.0,
];

#[rustfmt::skip]
const VERTICAL_3: [f32; 9] = [
    1.0, 0.0, -1.0,
    1.0, 0.0, -1.0,
    1.0, 0.0, -1.0,
];

#[rustfmt::skip]
const DIAGONAL_45_3: [f32; 9] = [
     0.0,  1.0, 1.0,
    -1.0,  0.0, 1.0,
    -1.0, -1.0, 0.0,
];

#[rustfmt::skip]
const DIAGONAL_MINUS_45_3: [f32; 9] = [
    1.0,  1.0,  0.0,
    1.0,  0.0, -1.0,
    0.0, -1.0, -1.0,
];

/// Selects one of the built-in kernel banks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BankKind {
    /// Four 5×5 directional kernels.
    Directional5,
    /// Four 3×3 directional kernels, for small images.
    Directional3,
    /// One 5×5 center-enhancing, ring-suppressing kernel.
    Edge5,
}

impl BankKind {
    /// Side length of every kernel in the bank.
    pub fn side(self) -> usize {
        match self {
            BankKind::Directional5 | BankKind::Edge5 => 5,
            BankKind::Directional3 => 3,
        }
    }
}

/// Ordered set of equally sized kernels applied to every image.
#[derive(Clone, Debug, PartialEq)]
pub struct KernelBank {
    kernels: Vec<Kernel>,
}

impl KernelBank {
    /// Builds a bank from kernels sharing one side length.
    pub fn new(kernels: Vec<Kernel>) -> EdgeMatchResult<Self> {
        let first = kernels.first().ok_or(EdgeMatchError::EmptyKernelBank)?;
        let side = first.side();
        if let Some(bad) = kernels.iter().find(|k| k.side() != side) {
            return Err(EdgeMatchError::InvalidKernel {
                side: bad.side(),
                len: bad.weights().len(),
            });
        }
        Ok(Self { kernels })
    }

    /// Builds one of the built-in banks.
    pub fn from_kind(kind: BankKind) -> Self {
        match kind {
            BankKind::Directional5 => Self::directional_5x5(),
            BankKind::Directional3 => Self::directional_3x3(),
            BankKind::Edge5 => Self::edge_5x5(),
        }
    }

    /// Horizontal, vertical, +45° and −45° 5×5 kernels.
    pub fn directional_5x5() -> Self {
        Self {
            kernels: vec![
                Kernel::from_table(5, &HORIZONTAL_5),
                Kernel::from_table(5, &VERTICAL_5),
                Kernel::from_table(5, &DIAGONAL_45_5),
                Kernel::from_table(5, &DIAGONAL_MINUS_45_5),
            ],
        }
    }

    /// 3×3 reduction of the directional bank, same channel order.
    pub fn directional_3x3() -> Self {
        Self {
            kernels: vec![
                Kernel::from_table(3, &HORIZONTAL_3),
                Kernel::from_table(3, &VERTICAL_3),
                Kernel::from_table(3, &DIAGONAL_45_3),
                Kernel::from_table(3, &DIAGONAL_MINUS_45_3),
            ],
        }
    }

    /// Single Laplacian-like edge kernel.
    pub fn edge_5x5() -> Self {
        Self {
            kernels: vec![Kernel::from_table(5, &EDGE_5)],
        }
    }

    /// Kernels in application order.
    pub fn kernels(&self) -> &[Kernel] {
        &self.kernels
    }

    /// Number of kernels (1 or 4 for the built-in banks).
    pub fn len(&self) -> usize {
        self.kernels.len()
    }

    /// Always false; a bank holds at least one kernel.
    pub fn is_empty(&self) -> bool {
        self.kernels.is_empty()
    }

    /// Shared side length of every kernel in the bank.
    pub fn side(&self) -> usize {
        self.kernels[0].side()
    }
}
