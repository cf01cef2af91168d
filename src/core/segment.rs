//! Category segmentation.
//!
//! Turns a per-sample label stream into the maximal runs of identical labels,
//! expressed as time intervals that can be shaded behind a plot.

use serde::{Deserialize, Serialize};

/// A maximal contiguous run of one label.
///
/// Samples with `start <= t < end` carry `label`; the final interval of a
/// segmentation is closed and also includes its `end` sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryInterval<L> {
    pub label: L,
    pub start: f64,
    pub end: f64,
}

impl<L> CategoryInterval<L> {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Split an aligned `(labels, time)` stream into labeled intervals.
///
/// A new interval opens at `time[i]` whenever `labels[i] != labels[i - 1]`,
/// closing the previous one at the same instant, so consecutive intervals are
/// adjacent and together cover `[time[0], time[last]]` exactly. A single
/// sample yields one zero-width interval; an empty stream yields none.
///
/// Both slices are expected to have the same length; any excess on the longer
/// one is ignored.
pub fn segment<L: PartialEq + Clone>(labels: &[L], time: &[f64]) -> Vec<CategoryInterval<L>> {
    debug_assert_eq!(labels.len(), time.len(), "label and time streams diverged");
    let len = labels.len().min(time.len());
    if len == 0 {
        return Vec::new();
    }

    let mut intervals = Vec::new();
    let mut current = &labels[0];
    let mut start = time[0];

    for i in 1..len {
        if labels[i] != *current {
            intervals.push(CategoryInterval {
                label: current.clone(),
                start,
                end: time[i],
            });
            current = &labels[i];
            start = time[i];
        }
    }

    intervals.push(CategoryInterval {
        label: current.clone(),
        start,
        end: time[len - 1],
    });

    intervals
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn interval(label: char, start: f64, end: f64) -> CategoryInterval<char> {
        CategoryInterval { label, start, end }
    }

    #[test]
    fn test_reference_segmentation() {
        let labels = ['a', 'a', 'b', 'b', 'b', 'a'];
        let time = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];

        let intervals = segment(&labels, &time);
        assert_eq!(
            intervals,
            vec![
                interval('a', 0.0, 2.0),
                interval('b', 2.0, 5.0),
                interval('a', 5.0, 5.0),
            ]
        );
    }

    #[test]
    fn test_single_label_spans_everything() {
        let intervals = segment(&['n', 'n', 'n'], &[0.5, 0.6, 0.7]);
        assert_eq!(intervals, vec![interval('n', 0.5, 0.7)]);
    }

    #[test]
    fn test_single_sample_is_zero_width() {
        let intervals = segment(&['e'], &[1.25]);
        assert_eq!(intervals, vec![interval('e', 1.25, 1.25)]);
        assert_eq!(intervals[0].duration(), 0.0);
    }

    #[test]
    fn test_empty_stream() {
        let intervals: Vec<CategoryInterval<char>> = segment(&[], &[]);
        assert!(intervals.is_empty());
    }

    #[test]
    fn test_starts_at_first_timestamp_not_zero() {
        let intervals = segment(&['a', 'b'], &[3.0, 4.0]);
        assert_eq!(intervals[0].start, 3.0);
    }

    proptest! {
        #[test]
        fn test_intervals_tile_the_time_axis(
            steps in prop::collection::vec((0u8..3, 0.001f64..1.0), 1..200)
        ) {
            let labels: Vec<u8> = steps.iter().map(|(l, _)| *l).collect();
            let mut time = Vec::with_capacity(steps.len());
            let mut t = 0.0;
            for (_, dt) in &steps {
                time.push(t);
                t += dt;
            }

            let intervals = segment(&labels, &time);
            let changes = labels.windows(2).filter(|w| w[0] != w[1]).count();

            prop_assert_eq!(intervals.len(), 1 + changes);
            prop_assert_eq!(intervals[0].start, time[0]);
            prop_assert_eq!(intervals[intervals.len() - 1].end, time[time.len() - 1]);
            for pair in intervals.windows(2) {
                prop_assert_eq!(pair[0].end, pair[1].start);
                prop_assert!(pair[0].label != pair[1].label);
            }

            for (label, t) in labels.iter().zip(&time) {
                let owner = intervals
                    .iter()
                    .enumerate()
                    .find(|(i, iv)| {
                        *t >= iv.start && (*t < iv.end || *i == intervals.len() - 1)
                    })
                    .map(|(_, iv)| iv);
                prop_assert_eq!(owner.map(|iv| iv.label), Some(*label));
            }
        }
    }
}
