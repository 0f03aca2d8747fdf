//! NaN-skipping reductions over flat slices.
//!
//! Accumulation happens in `f64` regardless of the input type. An input with
//! no valid samples reduces to NaN (or `None` for [`nan_min_max`]).

/// Valid (non-NaN) samples widened to `f64`.
fn valid<T: Copy + Into<f64>>(values: &[T]) -> impl Iterator<Item = f64> + '_ {
    values
        .iter()
        .map(|&v| Into::<f64>::into(v))
        .filter(|v| !v.is_nan())
}

/// Arithmetic mean of the valid samples.
pub fn nan_mean<T: Copy + Into<f64>>(values: &[T]) -> f64 {
    let (sum, count) = valid(values).fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if count == 0 {
        return f64::NAN;
    }
    sum / count as f64
}

/// Median of the valid samples. For even counts, averages the middle two values.
pub fn nan_median<T: Copy + Into<f64>>(values: &[T]) -> f64 {
    let mut sorted: Vec<f64> = valid(values).collect();
    median_in_place(&mut sorted)
}

/// Median of a scratch buffer already stripped of NaN. Reorders the buffer.
pub(crate) fn median_in_place(samples: &mut [f64]) -> f64 {
    let n = samples.len();
    if n == 0 {
        return f64::NAN;
    }
    samples.sort_unstable_by(f64::total_cmp);
    if n % 2 == 1 {
        samples[n / 2]
    } else {
        (samples[n / 2 - 1] + samples[n / 2]) / 2.0
    }
}

/// Population standard deviation (N denominator) of the valid samples.
pub fn nan_std<T: Copy + Into<f64>>(values: &[T]) -> f64 {
    let mean = nan_mean(values);
    if mean.is_nan() {
        return f64::NAN;
    }
    let (sq, count) = valid(values).fold((0.0, 0usize), |(s, n), v| {
        (s + (v - mean) * (v - mean), n + 1)
    });
    (sq / count as f64).sqrt()
}

/// Smallest and largest valid sample.
pub fn nan_min_max<T: Copy + Into<f64>>(values: &[T]) -> Option<(f64, f64)> {
    valid(values).fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}
