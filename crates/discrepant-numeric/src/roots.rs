//! Scalar root finding and maximization
//!
//! [`uniroot`] is Brent's method: inverse-quadratic interpolation with a
//! secant fallback, guarded by bisection. [`find_max`] is an iterative
//! grid search used for likelihood maximization when no sign-change
//! bracket exists.

use discrepant_core::math::arg_max;
use discrepant_core::{Error, Result};

const EPS: f64 = 1e-20;

/// Find a root of `f` on `[lower, upper]` with Brent's method.
///
/// Returns [`Error::NoBracket`] when `f(lower)` and `f(upper)` have the
/// same sign. Terminates when the bracket collapses below 1e-20, |f| at
/// the best point drops below 1e-20, or after 5000 iterations.
pub fn uniroot<F>(f: F, lower: f64, upper: f64) -> Result<f64>
where
    F: Fn(f64) -> f64,
{
    const MAX_ITERATIONS: usize = 5000;

    let f_lower = f(lower);
    let f_upper = f(upper);

    if f_lower * f_upper > 0.0 {
        return Err(Error::NoBracket {
            lo: lower,
            hi: upper,
        });
    }

    // b is the current best estimate, a the counterpoint.
    let (mut a, mut b, mut fa, mut fb) = if f_lower.abs() < f_upper.abs() {
        (upper, lower, f_upper, f_lower)
    } else {
        (lower, upper, f_lower, f_upper)
    };

    let mut c = a;
    let mut fc = fa;
    let mut d = 0.0_f64;
    let mut bisected = true;

    let mut count = 0;
    while (a - b).abs() > EPS && fb.abs() > EPS && count < MAX_ITERATIONS {
        let mut s = if fa != fc && fb != fc {
            // inverse quadratic interpolation
            a * fb * fc / ((fa - fb) * (fa - fc))
                + b * fa * fc / ((fb - fa) * (fb - fc))
                + c * fa * fb / ((fc - fa) * (fc - fb))
        } else {
            // secant method
            b - fb * (b - a) / (fb - fa)
        };

        let use_bisection = !(0.75 * a + 0.25 * b >= s && s <= b)
            || (bisected && (s - b).abs() >= 0.5 * (b - c).abs())
            || (!bisected && (s - b).abs() >= 0.5 * (c - d).abs())
            || (b - c).abs() < EPS;

        if use_bisection {
            s = 0.5 * (a + b);
            bisected = true;
        } else {
            bisected = false;
        }

        d = c;
        c = b;
        fc = fb;
        let fs = f(s);

        if fa * fs < 0.0 {
            b = s;
            fb = fs;
        } else {
            a = s;
            fa = fs;
        }

        if fa.abs() < fb.abs() {
            std::mem::swap(&mut a, &mut b);
            std::mem::swap(&mut fa, &mut fb);
        }
        count += 1;
    }

    Ok(b)
}

/// Find the `x` maximizing `f` on `[lower, upper]` by iterative grid
/// search: 100 samples per pass, then narrow the interval to the
/// neighbors of the arg-max until its width drops below 1e-20.
pub fn find_max<F>(f: F, lower: f64, upper: f64) -> f64
where
    F: Fn(f64) -> f64,
{
    const N: usize = 100;
    const MAX_PASSES: usize = 500;

    let mut a = lower;
    let mut b = upper;
    let mut x = [0.0_f64; N];
    let mut fx = [0.0_f64; N];

    let sample = |a: f64, b: f64, x: &mut [f64; N], fx: &mut [f64; N]| {
        let dx = (b - a) / (N - 1) as f64;
        for i in 0..N {
            x[i] = a + dx * i as f64;
            fx[i] = f(x[i]);
        }
    };

    let mut passes = 0;
    while b - a > EPS && passes < MAX_PASSES {
        sample(a, b, &mut x, &mut fx);
        let i = arg_max(&fx);
        if i == 0 {
            b = x[1];
        } else if i == N - 1 {
            a = x[i - 1];
        } else {
            a = x[i - 1];
            b = x[i + 1];
        }
        passes += 1;
    }

    sample(a, b, &mut x, &mut fx);
    x[arg_max(&fx)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_uniroot_quadratic() {
        let root = uniroot(|x| x * x - 2.0, 0.0, 2.0).unwrap();
        assert_relative_eq!(root, std::f64::consts::SQRT_2, epsilon = 1e-10);
    }

    #[test]
    fn test_uniroot_linear_is_exact() {
        let root = uniroot(|x| 11.0 - x, 10.0, 12.0).unwrap();
        assert_relative_eq!(root, 11.0, epsilon = 1e-14);
    }

    #[test]
    fn test_uniroot_transcendental() {
        // x = cos(x) near 0.739085
        let root = uniroot(|x| x.cos() - x, 0.0, 1.0).unwrap();
        assert_relative_eq!(root, 0.739_085_133_215_160_6, epsilon = 1e-9);
    }

    #[test]
    fn test_uniroot_no_bracket() {
        let result = uniroot(|x| x * x - 2.0, 3.0, 4.0);
        assert!(matches!(result, Err(Error::NoBracket { .. })));
    }

    #[test]
    fn test_uniroot_root_at_endpoint() {
        let root = uniroot(|x| x - 1.0, 1.0, 2.0).unwrap();
        assert_relative_eq!(root, 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_find_max_parabola() {
        let max = find_max(|x| -(x - 1.3) * (x - 1.3), 0.0, 2.0);
        assert_relative_eq!(max, 1.3, epsilon = 1e-9);
    }

    #[test]
    fn test_find_max_at_boundary() {
        let max = find_max(|x| x, 0.0, 5.0);
        assert_relative_eq!(max, 5.0, epsilon = 1e-9);
    }
}
