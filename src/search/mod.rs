//! Descriptor distances and nearest-entry selection.
//!
//! Selection is an ordered scan with a strict `<` comparison, so among equal
//! distances the lowest index wins. An empty candidate list yields `None`.

mod matcher;
mod rank;

pub use matcher::Matcher;
pub use rank::rank;

use crate::feature::Descriptor;
use crate::util::{EdgeMatchError, EdgeMatchResult};

/// Per-channel distance function.
///
/// Multi-channel descriptors are compared channel by channel and the
/// per-channel distances are averaged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Metric {
    /// Sum of absolute per-pixel differences.
    #[default]
    L1,
    /// Square root of the sum of squared per-pixel differences.
    L2,
}

/// Gallery entry selected for a query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Match {
    /// Zero-based gallery index.
    pub index: usize,
    /// Distance from the query to this entry.
    pub distance: f32,
}

impl Match {
    /// One-based gallery position, as reported to users.
    pub fn ordinal(&self) -> usize {
        self.index + 1
    }
}

/// Computes the distance between two descriptors.
///
/// Each channel is reduced with a running `f32` sum in row-major order, the
/// same accumulation the reference matcher performs, so near-ties rank
/// identically. Channel results are then averaged.
pub fn distance(a: &Descriptor, b: &Descriptor, metric: Metric) -> EdgeMatchResult<f32> {
    if a.num_channels() != b.num_channels() {
        return Err(EdgeMatchError::ChannelMismatch {
            expected: a.num_channels(),
            got: b.num_channels(),
        });
    }
    if a.shape() != b.shape() {
        return Err(EdgeMatchError::ShapeMismatch {
            expected: a.shape(),
            got: b.shape(),
        });
    }

    let mut total = 0.0f32;
    for (ca, cb) in a.channels().iter().zip(b.channels()) {
        let pairs = ca.data().iter().zip(cb.data());
        total += match metric {
            Metric::L1 => pairs.fold(0.0f32, |acc, (&x, &y)| acc + (x - y).abs()),
            Metric::L2 => pairs
                .fold(0.0f32, |acc, (&x, &y)| {
                    let d = x - y;
                    acc + d * d
                })
                .sqrt(),
        };
    }
    Ok(total / a.num_channels() as f32)
}

/// Picks the first minimum from distances listed in gallery order.
pub fn select_best(distances: &[f32]) -> Option<Match> {
    let mut best: Option<Match> = None;
    for (index, &distance) in distances.iter().enumerate() {
        if distance.is_nan() {
            continue;
        }
        match best {
            Some(current) if distance >= current.distance => {}
            _ => best = Some(Match { index, distance }),
        }
    }
    best
}

/// Compares `query` against every candidate and returns the closest.
pub fn best_match<'a, I>(query: &Descriptor, candidates: I, metric: Metric) -> EdgeMatchResult<Option<Match>>
where
    I: IntoIterator<Item = &'a Descriptor>,
{
    let distances = candidates
        .into_iter()
        .map(|candidate| distance(query, candidate, metric))
        .collect::<EdgeMatchResult<Vec<f32>>>()?;
    Ok(select_best(&distances))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::OwnedImage;

    fn desc(values: &[f32]) -> Descriptor {
        Descriptor::single(OwnedImage::new(values.to_vec(), values.len(), 1).unwrap())
    }

    #[test]
    fn l1_and_l2_match_hand_computed_values() {
        let a = desc(&[0.0, 0.0]);
        let b = desc(&[3.0, -4.0]);
        assert_eq!(distance(&a, &b, Metric::L1).unwrap(), 7.0);
        assert_eq!(distance(&a, &b, Metric::L2).unwrap(), 5.0);
    }

    #[test]
    fn multi_channel_distance_is_averaged() {
        let zero = OwnedImage::new(vec![0.0f32, 0.0], 2, 1).unwrap();
        let a = Descriptor::new(vec![zero.clone(), zero.clone()]).unwrap();
        let b = Descriptor::new(vec![
            OwnedImage::new(vec![3.0f32, 4.0], 2, 1).unwrap(),
            zero,
        ])
        .unwrap();
        assert_eq!(distance(&a, &b, Metric::L2).unwrap(), 2.5);
    }

    #[test]
    fn multi_channel_l1_is_averaged() {
        let a = Descriptor::new(vec![
            OwnedImage::new(vec![1.0f32, 2.0], 2, 1).unwrap(),
            OwnedImage::new(vec![0.0f32, 0.0], 2, 1).unwrap(),
        ])
        .unwrap();
        let b = Descriptor::new(vec![
            OwnedImage::new(vec![4.0f32, -1.0], 2, 1).unwrap(),
            OwnedImage::new(vec![0.5f32, 1.5], 2, 1).unwrap(),
        ])
        .unwrap();
        // Channel sums are 6 and 2.
        assert_eq!(distance(&a, &b, Metric::L1).unwrap(), 4.0);
    }

    #[test]
    fn l1_uses_running_f32_sum() {
        // 2^24 + 1 rounds back to 2^24 in f32; a wider accumulator would give 2^24 + 2.
        let a = desc(&[16_777_216.0, 1.0, 1.0]);
        let b = desc(&[0.0, 0.0, 0.0]);
        assert_eq!(distance(&a, &b, Metric::L1).unwrap(), 16_777_216.0);
    }

    #[test]
    fn distance_rejects_mismatched_descriptors() {
        let a = desc(&[0.0, 0.0]);
        let b = desc(&[0.0, 0.0, 0.0]);
        assert_eq!(
            distance(&a, &b, Metric::L1).err().unwrap(),
            EdgeMatchError::ShapeMismatch {
                expected: (2, 1),
                got: (3, 1),
            }
        );
    }

    #[test]
    fn ties_resolve_to_lowest_index() {
        let best = select_best(&[4.0, 1.0, 3.0, 1.0]).unwrap();
        assert_eq!(best.index, 1);
        assert_eq!(best.ordinal(), 2);
    }

    #[test]
    fn empty_candidates_yield_none() {
        assert_eq!(select_best(&[]), None);
        let query = desc(&[1.0]);
        let none: Vec<Descriptor> = Vec::new();
        assert_eq!(best_match(&query, &none, Metric::L1).unwrap(), None);
    }
}
