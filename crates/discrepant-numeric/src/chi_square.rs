//! Critical chi-square values with memoization
//!
//! Computing a critical chi-square inverts the lower incomplete gamma
//! function, which is expensive enough to be worth caching: the engine
//! asks for the same `(dof, confidence)` pair over and over while
//! iterating. [`ChiSquareCache`] memoizes exact pairs behind a mutex with
//! a most-recently-used fast path; [`global`] is the process-wide default
//! instance.

use crate::special::{gamma, inv_lower_incomplete_gamma};
use std::sync::{Mutex, OnceLock};

/// Degrees of freedom above which the gamma evaluation becomes unstable.
/// The critical value at 340 dof is only slightly larger than at higher
/// dof, so the cap costs little accuracy.
const MAX_DOF: usize = 340;

/// One critical chi-square computation: the value `x` such that
/// `Pr(X < x) = confidence` for `X ~ chi-square(dof)`.
#[derive(Debug, Clone, Copy)]
pub struct CriticalChiSquare {
    dof: usize,
    confidence: f64,
    value: f64,
}

impl CriticalChiSquare {
    /// Compute the critical chi-square for `dof` degrees of freedom at the
    /// given confidence level. `dof` is capped at 340.
    pub fn new(dof: usize, confidence: f64) -> Self {
        let dof = dof.min(MAX_DOF);
        let k = dof as f64 / 2.0;
        let value = 2.0 * inv_lower_incomplete_gamma(k, confidence * gamma(k));
        Self {
            dof,
            confidence,
            value,
        }
    }

    /// The critical chi-square; divided by the (capped) degrees of freedom
    /// when `reduced` is true.
    pub fn value(&self, reduced: bool) -> f64 {
        if reduced {
            self.value / self.dof as f64
        } else {
            self.value
        }
    }

    fn matches(&self, dof: usize, confidence: f64) -> bool {
        self.dof == dof && self.confidence == confidence
    }
}

/// Memoized critical chi-square lookups, keyed by exact
/// `(dof, confidence)` pairs.
#[derive(Debug, Default)]
pub struct ChiSquareCache {
    inner: Mutex<CacheState>,
}

#[derive(Debug, Default)]
struct CacheState {
    entries: Vec<CriticalChiSquare>,
    last: usize,
}

impl ChiSquareCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Critical chi-square for `dof` degrees of freedom (capped at 340) at
    /// the given confidence level, divided by dof when `reduced` is true.
    /// Repeated calls with the same pair return the cached value.
    pub fn critical(&self, dof: usize, confidence: f64, reduced: bool) -> f64 {
        let dof = dof.min(MAX_DOF);
        let mut state = self.inner.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(entry) = state.entries.get(state.last) {
            if entry.matches(dof, confidence) {
                return entry.value(reduced);
            }
        }

        if let Some(i) = state
            .entries
            .iter()
            .position(|e| e.matches(dof, confidence))
        {
            state.last = i;
            return state.entries[i].value(reduced);
        }

        let entry = CriticalChiSquare::new(dof, confidence);
        state.entries.push(entry);
        state.last = state.entries.len() - 1;
        entry.value(reduced)
    }

    /// Number of distinct `(dof, confidence)` pairs computed so far.
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entries
            .len()
    }

    /// True if nothing has been computed yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The process-wide shared cache.
pub fn global() -> &'static ChiSquareCache {
    static CACHE: OnceLock<ChiSquareCache> = OnceLock::new();
    CACHE.get_or_init(ChiSquareCache::new)
}
