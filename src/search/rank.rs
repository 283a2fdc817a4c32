//! Full ordering of gallery entries by distance.

use crate::search::Match;
use std::cmp::Ordering;

fn match_cmp_asc(a: &Match, b: &Match) -> Ordering {
    a.distance
        .total_cmp(&b.distance)
        .then_with(|| a.index.cmp(&b.index))
}

/// Orders distances ascending with lowest-index tie-breaking.
///
/// NaN distances are dropped. The first element, when present, equals
/// [`select_best`](crate::search::select_best) on the same input.
pub fn rank(distances: &[f32]) -> Vec<Match> {
    let mut matches: Vec<Match> = distances
        .iter()
        .enumerate()
        .filter(|(_, d)| !d.is_nan())
        .map(|(index, &distance)| Match { index, distance })
        .collect();
    matches.sort_by(match_cmp_asc);
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::select_best;

    #[test]
    fn rank_orders_by_distance_then_index() {
        let ranked = rank(&[2.0, 0.5, 2.0, f32::NAN, 0.5]);
        let order: Vec<usize> = ranked.iter().map(|m| m.index).collect();
        assert_eq!(order, vec![1, 4, 0, 2]);
    }

    #[test]
    fn rank_head_agrees_with_select_best() {
        let distances = [3.0, 1.0, 1.0, 9.0];
        assert_eq!(rank(&distances).first().copied(), select_best(&distances));
    }
}
