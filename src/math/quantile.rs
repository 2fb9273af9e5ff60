//! Empirical quantiles with selectable interpolation, one-shot and expanding-window.
//!
//! The interpolation rules follow the conventional virtual-index definition
//! `h = q (n - 1)` over the ascending sample, so results agree with the common numerical
//! array libraries for `linear`, `lower`, `higher`, `midpoint` and `nearest`.
//!
//! [`ExpandingQuantile`] keeps two heaps split at order statistic `floor(h)`. Each push
//! costs `O(log n)` and each query `O(1)`, replacing the `O(n log n)` re-sort per date of a
//! naive expanding window.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::core::QuantileMethod;

/// Quantile of an unsorted sample.
///
/// Returns `None` for an empty sample or a level outside `[0, 1]`. Non-finite values are
/// expected to be filtered by the caller.
///
/// # Examples
/// ```rust
/// use fxcarry::core::QuantileMethod;
/// use fxcarry::math::empirical_quantile;
///
/// let sample = [4.0, 1.0, 3.0, 2.0];
/// assert_eq!(empirical_quantile(&sample, 0.5, QuantileMethod::Linear), Some(2.5));
/// assert_eq!(empirical_quantile(&sample, 0.5, QuantileMethod::Lower), Some(2.0));
/// assert_eq!(empirical_quantile(&sample, 0.5, QuantileMethod::Nearest), Some(3.0));
/// ```
pub fn empirical_quantile(sample: &[f64], q: f64, method: QuantileMethod) -> Option<f64> {
    if sample.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }
    let mut sorted = sample.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let lo = lower_index(sorted.len(), q);
    let hi = (lo + 1).min(sorted.len() - 1);
    Some(interpolate(sorted[lo], sorted[hi], sorted.len(), q, method))
}

/// Expanding quantile of a series with gaps.
///
/// Element `t` is the quantile of every observed value at positions `0..=t`; positions
/// before the first observation are `None`. Missing values do not enter the window.
/// A level outside `[0, 1]` yields an all-`None` series.
pub fn expanding_quantile(
    series: &[Option<f64>],
    q: f64,
    method: QuantileMethod,
) -> Vec<Option<f64>> {
    let Some(mut window) = ExpandingQuantile::new(q, method) else {
        return vec![None; series.len()];
    };
    series
        .iter()
        .map(|value| {
            if let Some(x) = value.filter(|x| x.is_finite()) {
                window.push(x);
            }
            window.value()
        })
        .collect()
}

/// Incremental order-statistics structure answering one fixed quantile of all values
/// pushed so far.
#[derive(Debug, Clone)]
pub struct ExpandingQuantile {
    q: f64,
    method: QuantileMethod,
    // Smallest floor(h) + 1 values; top is x_floor(h).
    lower: BinaryHeap<TotalF64>,
    // Remaining values; top is x_floor(h) + 1.
    upper: BinaryHeap<Reverse<TotalF64>>,
}

impl ExpandingQuantile {
    /// Empty window for level `q`; `None` if `q` lies outside `[0, 1]`.
    pub fn new(q: f64, method: QuantileMethod) -> Option<Self> {
        (0.0..=1.0).contains(&q).then(|| Self {
            q,
            method,
            lower: BinaryHeap::new(),
            upper: BinaryHeap::new(),
        })
    }

    pub fn len(&self) -> usize {
        self.lower.len() + self.upper.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Adds one observation.
    pub fn push(&mut self, x: f64) {
        let goes_low = self.lower.peek().is_some_and(|top| x <= top.0);
        if goes_low {
            self.lower.push(TotalF64(x));
        } else {
            self.upper.push(Reverse(TotalF64(x)));
        }
        self.rebalance();
    }

    /// Current quantile, `None` until the first push.
    pub fn value(&self) -> Option<f64> {
        let n = self.len();
        let low = self.lower.peek()?.0;
        let high = self.upper.peek().map_or(low, |top| top.0.0);
        Some(interpolate(low, high, n, self.q, self.method))
    }

    fn rebalance(&mut self) {
        let target = lower_index(self.len(), self.q) + 1;
        while self.lower.len() > target {
            if let Some(top) = self.lower.pop() {
                self.upper.push(Reverse(top));
            }
        }
        while self.lower.len() < target {
            match self.upper.pop() {
                Some(Reverse(bottom)) => self.lower.push(bottom),
                None => break,
            }
        }
    }
}

/// `floor(q (n - 1))` clamped to the sample, for `n >= 1`.
fn lower_index(n: usize, q: f64) -> usize {
    let h = virtual_index(n, q);
    (h.floor() as usize).min(n - 1)
}

fn virtual_index(n: usize, q: f64) -> f64 {
    q * (n as f64 - 1.0)
}

/// Combines order statistics `x_floor(h)` (`low`) and `x_floor(h)+1` (`high`).
fn interpolate(low: f64, high: f64, n: usize, q: f64, method: QuantileMethod) -> f64 {
    let h = virtual_index(n, q);
    let gamma = h - h.floor();
    match method {
        QuantileMethod::Lower => low,
        QuantileMethod::Higher => {
            if gamma > 0.0 {
                high
            } else {
                low
            }
        }
        QuantileMethod::Midpoint => {
            if gamma > 0.0 {
                lerp(low, high, 0.5)
            } else {
                low
            }
        }
        QuantileMethod::Nearest => {
            if h.round_ties_even() > h.floor() {
                high
            } else {
                low
            }
        }
        QuantileMethod::Linear => lerp(low, high, gamma),
    }
}

// Evaluated from the nearer endpoint so that gamma close to 1 reproduces `b` exactly.
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    let diff = b - a;
    if t >= 0.5 {
        b - diff * (1.0 - t)
    } else {
        a + diff * t
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct TotalF64(f64);

impl Eq for TotalF64 {}

impl PartialOrd for TotalF64 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TotalF64 {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}
