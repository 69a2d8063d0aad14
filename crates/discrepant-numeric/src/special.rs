//! Special functions used by the averaging estimators
//!
//! The gamma and error-function families come from `statrs`; this module
//! adds the unregularized incomplete-gamma variants and a bisection-based
//! inverse of the lower incomplete gamma, which has no library
//! implementation.

pub use statrs::function::erf::{erf, erfc, erf_inv};
pub use statrs::function::gamma::{gamma, ln_gamma};

use statrs::function::gamma::{gamma_lr, gamma_ur};
use tracing::debug;

/// Regularized lower incomplete gamma function `P(a, x)`.
pub fn regularized_lower_incomplete_gamma(a: f64, x: f64) -> f64 {
    gamma_lr(a, x)
}

/// Regularized upper incomplete gamma function `Q(a, x)`.
pub fn regularized_upper_incomplete_gamma(a: f64, x: f64) -> f64 {
    gamma_ur(a, x)
}

/// Lower incomplete gamma function, `gamma(a) * P(a, x)`.
pub fn lower_incomplete_gamma(a: f64, x: f64) -> f64 {
    gamma(a) * gamma_lr(a, x)
}

/// Upper incomplete gamma function, `gamma(a) * Q(a, x)`.
pub fn upper_incomplete_gamma(a: f64, x: f64) -> f64 {
    gamma(a) * gamma_ur(a, x)
}

/// Inverse of the lower incomplete gamma function: the `x` such that
/// [`lower_incomplete_gamma`]`(s, x) = y`.
///
/// Bisection on `g(x) = y - lower_incomplete_gamma(s, x)`: the bracket
/// starts at `[0, 10]` and the upper bound grows by 10% until g is
/// negative there. If 2000 bisection steps fail to bring |g| below 1e-6,
/// an adaptive walk from the last midpoint takes over, shrinking its step
/// tenfold on every overshoot.
pub fn inv_lower_incomplete_gamma(s: f64, y: f64) -> f64 {
    const PRECISION: f64 = 1e-6;
    const MAX_ITERATIONS: usize = 2000;

    // The incomplete gamma is only defined for x >= 0; the adaptive walk
    // below could otherwise step past zero.
    let g = |x: f64| {
        if x <= 0.0 {
            return y;
        }
        y - lower_incomplete_gamma(s, x)
    };

    let mut lower = 0.0_f64;
    let mut upper = 10.0_f64;
    let mut g_upper = g(upper);
    while g_upper >= 0.0 {
        lower = upper;
        upper *= 1.1;
        g_upper = g(upper);
    }

    let mut middle = 0.5 * (lower + upper);
    let mut g_middle = g(middle);
    let mut converged = false;
    for _ in 0..MAX_ITERATIONS {
        middle = 0.5 * (lower + upper);
        g_middle = g(middle);
        if g_middle.abs() < PRECISION {
            converged = true;
            break;
        }
        if g_middle < 0.0 {
            upper = middle;
        } else {
            lower = middle;
        }
    }

    if !converged {
        // Walk towards the root from the last midpoint instead.
        debug!(s, y, "bisection failed, falling back to adaptive stepping");
        let direction = g_middle.signum();
        let mut step = 0.1;
        while g_middle.abs() > PRECISION && step > PRECISION {
            middle += direction * step;
            g_middle = g(middle);
            if g_middle.signum() != direction {
                middle -= direction * step;
                step *= 0.1;
            }
        }
    }

    middle
}
