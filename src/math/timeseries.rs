//! Gap-aware time-series transforms over positional series.
//!
//! Series are `Option<f64>` slices where `None` marks a missing observation. Every
//! transform returns a new series of the same length; inputs are never modified.

/// Simple returns `x_t / x_{t-1} - 1`; `None` where either side is missing.
///
/// # Examples
/// ```rust
/// use fxcarry::math::pct_change;
///
/// let prices = [Some(100.0), Some(110.0), None, Some(99.0)];
/// let r = pct_change(&prices);
/// assert_eq!(r[0], None);
/// assert!((r[1].unwrap() - 0.10).abs() < 1e-12);
/// assert_eq!(r[2], None);
/// assert_eq!(r[3], None);
/// ```
pub fn pct_change(series: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(series.len());
    out.push(None);
    out.extend(series.windows(2).map(|w| match (w[0], w[1]) {
        (Some(prev), Some(curr)) if prev != 0.0 => Some(curr / prev - 1.0),
        _ => None,
    }));
    out.truncate(series.len());
    out
}

/// Delays a series by `periods`: element `t` takes the value at `t - periods`.
pub fn shift<T: Copy>(series: &[Option<T>], periods: usize) -> Vec<Option<T>> {
    (0..series.len())
        .map(|t| t.checked_sub(periods).and_then(|src| series[src]))
        .collect()
}

/// Trailing mean over `window` positions ending at `t`; `None` unless all are present.
///
/// A zero window has no mean anywhere.
pub fn trailing_mean(series: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; series.len()];
    }
    let mut out = Vec::with_capacity(series.len());
    let mut missing = 0usize;

    for (t, value) in series.iter().enumerate() {
        if value.is_none() {
            missing += 1;
        }
        if t >= window && series[t - window].is_none() {
            missing -= 1;
        }
        if t + 1 >= window && missing == 0 {
            let sum = series[t + 1 - window..=t].iter().flatten().sum::<f64>();
            out.push(Some(sum / window as f64));
        } else {
            out.push(None);
        }
    }
    out
}

/// Carries the last observed value forward over gaps.
///
/// Returns the filled series and how many positions were filled.
pub fn forward_fill(series: &[Option<f64>]) -> (Vec<Option<f64>>, usize) {
    let mut last = None;
    let mut filled = 0usize;
    let out = series
        .iter()
        .map(|value| match value {
            Some(x) => {
                last = Some(*x);
                last
            }
            None => {
                if last.is_some() {
                    filled += 1;
                }
                last
            }
        })
        .collect();
    (out, filled)
}

/// Elementwise ratio `a / b`; `None` where either is missing or `b` is zero.
pub fn ratio(a: &[Option<f64>], b: &[Option<f64>]) -> Vec<Option<f64>> {
    a.iter()
        .zip(b)
        .map(|(x, y)| match (x, y) {
            (Some(x), Some(y)) if *y != 0.0 => Some(x / y),
            _ => None,
        })
        .collect()
}

/// Maps non-finite floats to `None`.
pub fn observed(values: &[f64]) -> Vec<Option<f64>> {
    values
        .iter()
        .map(|x| if x.is_finite() { Some(*x) } else { None })
        .collect()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn pct_change_preserves_length() {
        assert!(pct_change(&[]).is_empty());
        assert_eq!(pct_change(&[Some(1.0)]), vec![None]);
        let r = pct_change(&[Some(2.0), Some(3.0), Some(1.5)]);
        assert_eq!(r.len(), 3);
        assert_relative_eq!(r[1].unwrap(), 0.5, epsilon = 1e-15);
        assert_relative_eq!(r[2].unwrap(), -0.5, epsilon = 1e-15);
    }

    #[test]
    fn shift_delays_values() {
        let s = [Some(1), Some(2), None, Some(4)];
        assert_eq!(shift(&s, 0), s.to_vec());
        assert_eq!(shift(&s, 1), vec![None, Some(1), Some(2), None]);
        assert_eq!(shift(&s, 10), vec![None; 4]);
    }

    #[test]
    fn trailing_mean_needs_full_window() {
        let s = [Some(1.0), Some(2.0), Some(3.0), None, Some(5.0), Some(6.0), Some(7.0)];
        let m = trailing_mean(&s, 2);
        assert_eq!(m[0], None);
        assert_relative_eq!(m[1].unwrap(), 1.5);
        assert_relative_eq!(m[2].unwrap(), 2.5);
        assert_eq!(m[3], None);
        assert_eq!(m[4], None);
        assert_relative_eq!(m[5].unwrap(), 5.5);
        assert_relative_eq!(m[6].unwrap(), 6.5);
        assert_eq!(trailing_mean(&s, 0), vec![None; s.len()]);
    }

    #[test]
    fn forward_fill_counts_filled_positions() {
        let (filled, count) = forward_fill(&[None, Some(1.0), None, None, Some(4.0), None]);
        assert_eq!(
            filled,
            vec![None, Some(1.0), Some(1.0), Some(1.0), Some(4.0), Some(4.0)]
        );
        assert_eq!(count, 3);
    }

    #[test]
    fn ratio_guards_zero_denominator() {
        let r = ratio(&[Some(4.0), Some(1.0), None], &[Some(2.0), Some(0.0), Some(1.0)]);
        assert_eq!(r, vec![Some(2.0), None, None]);
    }

    #[test]
    fn observed_drops_non_finite() {
        assert_eq!(
            observed(&[1.0, f64::NAN, f64::INFINITY]),
            vec![Some(1.0), None, None]
        );
    }
}
