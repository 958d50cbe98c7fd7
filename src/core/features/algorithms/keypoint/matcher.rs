//! Brute-force 2-nearest-neighbour descriptor matching with a ratio test.

use crate::core::features::Descriptor;

/// Distances to the closest and second-closest descriptor in `train`
pub fn two_nearest(query: &Descriptor, train: &[Descriptor]) -> (Option<u32>, Option<u32>) {
    let mut best = u32::MAX;
    let mut second = u32::MAX;

    for candidate in train {
        let d = query.hamming(candidate);
        if d < best {
            second = best;
            best = d;
        } else if d < second {
            second = d;
        }
    }

    let found = |d: u32| (d != u32::MAX).then_some(d);
    (found(best), found(second))
}

/// Whether a nearest-neighbour pair passes the ratio test.
///
/// With no second neighbour the ratio is undefined, so only an exact
/// (distance 0) match passes.
pub fn accept_match(best: Option<u32>, second: Option<u32>, ratio: f32) -> bool {
    match (best, second) {
        (Some(best), Some(second)) => (best as f32) < ratio * second as f32,
        (Some(best), None) => best == 0,
        _ => false,
    }
}

/// Fraction of `a`'s descriptors with an accepted match in `b`.
///
/// Not symmetric: the denominator is always `a.len()`. A set compared
/// with itself scores 1.0 even when it repeats descriptors, which the
/// ratio test alone would reject as ambiguous.
pub fn ratio_test_score(a: &[Descriptor], b: &[Descriptor], ratio: f32) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }

    let accepted = a
        .iter()
        .filter(|descriptor| {
            let (best, second) = two_nearest(descriptor, b);
            accept_match(best, second, ratio)
        })
        .count();

    (accepted as f64 / a.len() as f64).min(1.0)
}
