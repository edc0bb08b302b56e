//! Proportional bar layout.
//!
//! Turns an ordered list of `(label, weight)` pairs into pixel-exact segments
//! that tile a bar of a given width, with a fixed gap between neighbours and a
//! lightness value per segment for the color ramp.

use crate::color::lerp;
use crate::error::{ReadingLogError, Result};

/// Visual gap between two neighbouring segments, in pixels.
pub const GAP: u32 = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct PartitionSegment {
    pub label: String,
    /// Weight as given by the caller.
    pub value: f64,
    /// Integer pixel share after exact rescaling, gaps included.
    pub share: u32,
    /// Visible width once the gap edges are carved out of the share.
    pub width: u32,
    pub x: u32,
    pub lightness: f64,
}

impl PartitionSegment {
    #[inline]
    pub fn end(&self) -> u32 {
        self.x + self.width
    }
}

/// Rescale weights to integer shares summing exactly to `total`.
///
/// Shares are truncated, then the truncation deficit is handed out one pixel
/// at a time in input order, wrapping around if it outnumbers the segments.
pub fn rescale(weights: &[f64], total: u32) -> Vec<u32> {
    if weights.is_empty() {
        return Vec::new();
    }

    let sum: f64 = weights.iter().sum();
    let mut shares: Vec<u32> = weights
        .iter()
        .map(|w| (total as f64 * (w / sum)).floor() as u32)
        .collect();

    let assigned: u64 = shares.iter().map(|&s| s as u64).sum();
    let n = shares.len();
    if assigned <= total as u64 {
        let diff = (total as u64 - assigned) as usize;
        for i in 0..diff {
            shares[i % n] += 1;
        }
    } else {
        // Float noise can push a truncated share one pixel over; take it back
        // from the tail so the sum stays exact.
        let mut excess = assigned - total as u64;
        let mut i = n;
        while excess > 0 {
            i = if i == 0 { n - 1 } else { i - 1 };
            if shares[i] > 0 {
                shares[i] -= 1;
                excess -= 1;
            }
        }
    }

    shares
}

/// Pixels a segment gives up to its gaps: one per neighbour.
#[inline]
fn gap_edges(i: usize, last: usize) -> u32 {
    u32::from(i > 0) + u32::from(i < last)
}

/// Raise every share to its gap edges plus `visible` pixels, paying with
/// pixels from the largest shares so the sum is unchanged. The caller
/// guarantees the total covers every floor.
fn lift_to_gap_edges(mut shares: Vec<u32>, visible: u32) -> Vec<u32> {
    let last = shares.len().saturating_sub(1);
    let floor = |i: usize| gap_edges(i, last) + visible;
    let mut owed = 0u32;
    for (i, share) in shares.iter_mut().enumerate() {
        let needed = floor(i);
        if *share < needed {
            owed += needed - *share;
            *share = needed;
        }
    }

    while owed > 0 {
        // Largest spare share first, earliest on ties.
        let donor = shares
            .iter()
            .enumerate()
            .filter(|&(i, &s)| s > floor(i))
            .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(&a.0)))
            .map(|(i, _)| i);
        let Some(donor) = donor else { break };
        shares[donor] -= 1;
        owed -= 1;
    }

    shares
}

/// Lay out `data` across `total_width` pixels.
///
/// Input order is preserved; callers sort beforehand (largest first).
/// Visible widths plus the `GAP`s between them always sum to `total_width`.
/// A segment too small to pay for its gap edges (plus one visible pixel when
/// the bar has room) is widened at the expense of the largest ones; only a bar
/// narrower than its gaps is rejected.
pub fn layout<L: AsRef<str>>(
    data: &[(L, f64)],
    total_width: u32,
    min_light: f64,
    max_light: f64,
) -> Result<Vec<PartitionSegment>> {
    if data.is_empty() {
        return Err(ReadingLogError::EmptyPartition);
    }
    if total_width == 0 {
        return Err(ReadingLogError::InvalidWidth(total_width));
    }
    if !(0.0..=100.0).contains(&min_light)
        || !(0.0..=100.0).contains(&max_light)
        || min_light > max_light
    {
        return Err(ReadingLogError::InvalidLightness {
            min: min_light,
            max: max_light,
        });
    }
    for (label, weight) in data {
        if !weight.is_finite() || *weight <= 0.0 {
            return Err(ReadingLogError::InvalidWeight {
                label: label.as_ref().to_string(),
                weight: *weight,
            });
        }
    }

    let last = data.len() - 1;
    let gaps = GAP * last as u32;
    if total_width < gaps {
        return Err(ReadingLogError::BarTooNarrow {
            segments: data.len(),
            width: total_width,
            needed: gaps,
        });
    }

    let weights: Vec<f64> = data.iter().map(|(_, w)| *w).collect();
    // Every segment keeps at least one visible pixel when the bar has room.
    let visible = u32::from(total_width >= gaps + data.len() as u32);
    let shares = lift_to_gap_edges(rescale(&weights, total_width), visible);

    let lo = shares.iter().copied().min().unwrap_or(0) as f64;
    let hi = shares.iter().copied().max().unwrap_or(0) as f64;

    let mut segments = Vec::with_capacity(data.len());
    let mut x = 0u32;

    for (i, ((label, value), share)) in data.iter().zip(shares).enumerate() {
        let width = share - gap_edges(i, last);

        if i > 0 {
            x += GAP;
        }

        let lightness =
            lerp((lo, hi), (min_light, max_light), share as f64).clamp(min_light, max_light);

        segments.push(PartitionSegment {
            label: label.as_ref().to_string(),
            value: *value,
            share,
            width,
            x,
            lightness,
        });
        x += width;
    }

    Ok(segments)
}

/// [`layout`] for integer count tables.
pub fn layout_counts<L: AsRef<str>>(
    counts: &[(L, u64)],
    total_width: u32,
    min_light: f64,
    max_light: f64,
) -> Result<Vec<PartitionSegment>> {
    let data: Vec<(&str, f64)> = counts
        .iter()
        .map(|(label, count)| (label.as_ref(), *count as f64))
        .collect();
    layout(&data, total_width, min_light, max_light)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn languages() -> Vec<(&'static str, f64)> {
        vec![
            ("English", 10.0),
            ("French", 5.0),
            ("German", 3.0),
            ("Chinese", 1.0),
            ("Czech", 1.0),
            ("Russian", 1.0),
        ]
    }

    fn covered(segments: &[PartitionSegment]) -> u32 {
        let widths: u32 = segments.iter().map(|s| s.width).sum();
        widths + GAP * (segments.len() as u32 - 1)
    }

    #[test]
    fn test_rescale_sums_exactly() {
        let shares = rescale(&[10.0, 5.0, 3.0, 1.0, 1.0, 1.0], 800);
        assert_eq!(shares, vec![381, 191, 114, 38, 38, 38]);
        assert_eq!(shares.iter().sum::<u32>(), 800);
    }

    #[test]
    fn test_rescale_hands_out_deficit_in_order() {
        // Three equal thirds of 2px all truncate to zero.
        let shares = rescale(&[1.0, 1.0, 1.0], 2);
        assert_eq!(shares, vec![1, 1, 0]);
    }

    #[test]
    fn test_layout_language_bar() {
        let segments = layout(&languages(), 800, 5.0, 22.5).unwrap();

        let widths: Vec<u32> = segments.iter().map(|s| s.width).collect();
        let xs: Vec<u32> = segments.iter().map(|s| s.x).collect();
        assert_eq!(widths, vec![380, 189, 112, 36, 36, 37]);
        assert_eq!(xs, vec![0, 382, 573, 687, 725, 763]);
        assert_eq!(segments[0].share, 381);
        assert_eq!(covered(&segments), 800);
        assert_eq!(segments.last().unwrap().end(), 800);

        assert_eq!(segments[0].lightness, 22.5);
        assert_eq!(segments[5].lightness, 5.0);
        let labels: Vec<&str> = segments.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["English", "French", "German", "Chinese", "Czech", "Russian"]
        );
    }

    #[test]
    fn test_layout_single_segment_fills_bar() {
        let segments = layout(&[("Fiction", 12.0)], 400, 27.5, 55.0).unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].x, 0);
        assert_eq!(segments[0].width, 400);
        assert_eq!(segments[0].lightness, 27.5);
    }

    #[test]
    fn test_layout_equal_weights_use_min_lightness() {
        let segments = layout(&[("a", 2.0), ("b", 2.0)], 400, 10.0, 25.0).unwrap();
        assert!(segments.iter().all(|s| s.lightness == 10.0));
        assert_eq!(covered(&segments), 400);
    }

    #[test]
    fn test_layout_rejects_bad_input() {
        let empty: Vec<(&str, f64)> = Vec::new();
        assert!(matches!(
            layout(&empty, 800, 0.0, 50.0),
            Err(ReadingLogError::EmptyPartition)
        ));
        assert!(matches!(
            layout(&languages(), 0, 0.0, 50.0),
            Err(ReadingLogError::InvalidWidth(0))
        ));
        assert!(matches!(
            layout(&languages(), 800, 60.0, 50.0),
            Err(ReadingLogError::InvalidLightness { .. })
        ));
        assert!(matches!(
            layout(&[("a", 1.0), ("b", 0.0)], 800, 0.0, 50.0),
            Err(ReadingLogError::InvalidWeight { ref label, .. }) if label == "b"
        ));
        assert!(matches!(
            layout(&[("a", f64::NAN)], 800, 0.0, 50.0),
            Err(ReadingLogError::InvalidWeight { .. })
        ));
    }

    #[test]
    fn test_layout_widens_long_tail() {
        let mut counts = vec![("English".to_string(), 300u64)];
        counts.extend((0..10).map(|i| (format!("L{}", i), 1u64)));
        let segments = layout_counts(&counts, 400, 27.5, 55.0).unwrap();

        assert_eq!(segments.len(), 11);
        assert_eq!(covered(&segments), 400);
        assert_eq!(segments.last().unwrap().end(), 400);
        for pair in segments.windows(2) {
            assert_eq!(pair[1].x, pair[0].end() + GAP);
        }
        assert!(segments.iter().all(|s| s.width >= 1));
        // 388 after rescale, minus the 17px lent to the tail.
        assert_eq!(segments[0].share, 371);
        assert_eq!(segments[10].x, 399);
    }

    #[test]
    fn test_layout_tight_bar_is_all_gaps() {
        let segments = layout(&[("a", 1.0), ("b", 1.0), ("c", 1.0)], 4, 0.0, 50.0).unwrap();
        let widths: Vec<u32> = segments.iter().map(|s| s.width).collect();
        assert_eq!(widths, vec![0, 0, 0]);
        assert_eq!(covered(&segments), 4);

        let segments = layout(&[("a", 1.0), ("b", 1.0), ("c", 1.0)], 7, 0.0, 50.0).unwrap();
        let widths: Vec<u32> = segments.iter().map(|s| s.width).collect();
        assert_eq!(widths, vec![1, 1, 1]);
    }

    #[test]
    fn test_layout_rejects_bar_narrower_than_gaps() {
        let err = layout(&[("a", 1.0), ("b", 1.0), ("c", 1.0)], 3, 0.0, 50.0).unwrap_err();
        assert!(matches!(
            err,
            ReadingLogError::BarTooNarrow { segments: 3, width: 3, needed: 4 }
        ));
    }

    #[test]
    fn test_layout_counts() {
        let counts = vec![("Fiction".to_string(), 30u64), ("Non-Fiction".to_string(), 10)];
        let segments = layout_counts(&counts, 400, 5.0, 22.5).unwrap();
        assert_eq!(segments[0].share, 300);
        assert_eq!(segments[1].share, 100);
        assert_eq!(segments[1].x, 301);
        assert_eq!(segments[1].end(), 400);
    }

    proptest! {
        #[test]
        fn prop_widths_and_gaps_sum_to_total(
            weights in prop::collection::vec(
                prop_oneof![1u32..3, 1u32..100, 1000u32..100_000],
                1..16,
            ),
            total in 1u32..20000,
        ) {
            prop_assume!(total >= GAP * (weights.len() as u32 - 1));
            let data: Vec<(String, f64)> = weights
                .iter()
                .enumerate()
                .map(|(i, w)| (format!("s{}", i), *w as f64))
                .collect();
            let segments = layout(&data, total, 0.0, 100.0).unwrap();

            prop_assert_eq!(segments.len(), data.len());
            prop_assert_eq!(covered(&segments), total);
            prop_assert_eq!(segments.last().unwrap().end(), total);
            if total >= GAP * (data.len() as u32 - 1) + data.len() as u32 {
                prop_assert!(segments.iter().all(|s| s.width >= 1));
            }
            for (seg, (label, _)) in segments.iter().zip(&data) {
                prop_assert_eq!(&seg.label, label);
            }
        }

        #[test]
        fn prop_lightness_within_bounds(
            weights in prop::collection::vec(0.5f64..50.0, 1..8),
            min_light in 0.0f64..50.0,
            span in 0.0f64..50.0,
        ) {
            let data: Vec<(&str, f64)> = weights.iter().map(|w| ("x", *w)).collect();
            let max_light = min_light + span;
            let segments = layout(&data, 5000, min_light, max_light).unwrap();
            for seg in &segments {
                prop_assert!(seg.lightness >= min_light && seg.lightness <= max_light);
            }
        }

        #[test]
        fn prop_layout_is_deterministic(
            weights in prop::collection::vec(100u32..1000, 1..12),
        ) {
            let data: Vec<(String, f64)> = weights
                .iter()
                .enumerate()
                .map(|(i, w)| (i.to_string(), *w as f64))
                .collect();
            let a = layout(&data, 10_000, 5.0, 55.0).unwrap();
            let b = layout(&data, 10_000, 5.0, 55.0).unwrap();
            prop_assert_eq!(a, b);
        }
    }
}
