//! Range normalization for plotting.
//!
//! Every channel, whatever its native units (ADC counts, degrees, degrees
//! per second), is rescaled into [-1, 1] before it is drawn so that sensors
//! with very different ranges can share one figure.

/// Lower bound of the normalized range.
pub const NORMALIZED_MIN: f64 = -1.0;

/// Upper bound of the normalized range.
pub const NORMALIZED_MAX: f64 = 1.0;

/// Linearly rescale `values` so the minimum maps to -1 and the maximum to +1.
///
/// `out[i] = 2 * (x[i] - min) / (max - min) - 1`
///
/// A channel with no usable dynamic range (constant, all NaN, or a range that
/// is not finite) maps every sample to `0.0`, the midpoint of the output range. The
/// result therefore never contains NaN introduced by the division. An empty
/// input yields an empty output.
pub fn normalize(values: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }
    let Some((min, max)) = bounds(values) else {
        return vec![0.0; values.len()];
    };

    let range = max - min;
    if !(range.is_finite() && range > 0.0) {
        return vec![0.0; values.len()];
    }

    values
        .iter()
        .map(|&x| 2.0 * (x - min) / range - 1.0)
        .collect()
}

/// Minimum and maximum of a slice, ignoring NaN samples.
fn bounds(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|x| !x.is_nan())
        .fold(None, |acc, x| match acc {
            None => Some((x, x)),
            Some((lo, hi)) => Some((lo.min(x), hi.max(x))),
        })
}
