//! Sampled-data integration and interpolation.
//!
//! - **Simpson's rule** on irregularly spaced samples, with the
//!   Cartwright correction for a trailing odd interval
//! - **Linear interpolation** clamped to the end values outside the
//!   sample range

use thiserror::Error;

/// Errors from integrating or interpolating sampled data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IntegrateError {
    #[error("Input vectors must have the same length ({0} vs {1})")]
    MismatchedLengths(usize, usize),
    #[error("Input vectors must have at least 2 points, got {0}")]
    InsufficientData(usize),
    #[error("Sample points must not repeat (x = {0})")]
    RepeatedSample(f64),
}

fn check(y: &[f64], x: &[f64]) -> Result<(), IntegrateError> {
    if y.len() != x.len() {
        return Err(IntegrateError::MismatchedLengths(y.len(), x.len()));
    }
    if x.len() < 2 {
        return Err(IntegrateError::InsufficientData(x.len()));
    }
    Ok(())
}

/// Simpson's rule over pairs of intervals in `x[start..=stop]`
fn simpson_pairs(y: &[f64], x: &[f64], stop: usize) -> Result<f64, IntegrateError> {
    let mut sum = 0.0;
    for i in (0..stop).step_by(2) {
        let h0 = x[i + 1] - x[i];
        let h1 = x[i + 2] - x[i + 1];
        if h0 == 0.0 || h1 == 0.0 {
            return Err(IntegrateError::RepeatedSample(x[i + 1]));
        }
        let hsum = h0 + h1;
        let ratio = h0 / h1;
        sum += hsum / 6.0
            * (y[i] * (2.0 - 1.0 / ratio)
                + y[i + 1] * (hsum * hsum / (h0 * h1))
                + y[i + 2] * (2.0 - ratio));
    }
    Ok(sum)
}

/// Integrate `y(x)` with the composite Simpson's rule.
///
/// `x` must be sorted (either direction). Two samples fall back to the
/// trapezoid rule. With an odd number of intervals the first ones are
/// integrated pairwise and the last interval uses a quadratic through the
/// final three samples.
///
/// ```
/// use astrokit_photometry::simpson;
///
/// let x = [0.0, 0.5, 1.0, 1.5, 2.0];
/// let y: Vec<f64> = x.iter().map(|v| v * v).collect();
/// assert!((simpson(&y, &x).unwrap() - 8.0 / 3.0).abs() < 1e-12);
/// ```
pub fn simpson(y: &[f64], x: &[f64]) -> Result<f64, IntegrateError> {
    check(y, x)?;
    let n = x.len();

    if n == 2 {
        return Ok((x[1] - x[0]) * (y[0] + y[1]) / 2.0);
    }
    if n % 2 == 1 {
        return simpson_pairs(y, x, n - 2);
    }

    let head = simpson_pairs(y, x, n - 3)?;

    let h0 = x[n - 2] - x[n - 3];
    let h1 = x[n - 1] - x[n - 2];
    if h0 == 0.0 || h1 == 0.0 {
        return Err(IntegrateError::RepeatedSample(x[n - 2]));
    }
    let alpha = (2.0 * h1 * h1 + 3.0 * h0 * h1) / (6.0 * (h1 + h0));
    let beta = (h1 * h1 + 3.0 * h0 * h1) / (6.0 * h0);
    let eta = h1 * h1 * h1 / (6.0 * h0 * (h0 + h1));

    Ok(head + alpha * y[n - 1] + beta * y[n - 2] - eta * y[n - 3])
}

/// Linearly interpolate `fp(xp)` at `x`. `xp` must be increasing; values
/// outside the range take the nearest end value.
pub fn interp(x: f64, xp: &[f64], fp: &[f64]) -> Result<f64, IntegrateError> {
    if xp.len() != fp.len() {
        return Err(IntegrateError::MismatchedLengths(xp.len(), fp.len()));
    }
    let n = xp.len();
    if n == 0 {
        return Err(IntegrateError::InsufficientData(0));
    }
    if x.is_nan() {
        return Ok(f64::NAN);
    }
    if x <= xp[0] {
        return Ok(fp[0]);
    }
    if x >= xp[n - 1] {
        return Ok(fp[n - 1]);
    }

    // first index with xp[idx] > x, always in 1..n here
    let idx = xp.partition_point(|&v| v <= x);
    if xp[idx - 1] == x {
        return Ok(fp[idx - 1]);
    }

    let (x0, x1) = (xp[idx - 1], xp[idx]);
    let (y0, y1) = (fp[idx - 1], fp[idx]);
    let t = (x - x0) / (x1 - x0);
    Ok(y0 + t * (y1 - y0))
}

/// [`interp`] at every point of `xs`
pub fn interp_all(xs: &[f64], xp: &[f64], fp: &[f64]) -> Result<Vec<f64>, IntegrateError> {
    xs.iter().map(|&x| interp(x, xp, fp)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: &[f64]) -> Vec<f64> {
        x.iter().map(|v| v * v).collect()
    }

    #[test]
    fn test_simpson_even_intervals() {
        let x = [0.0, 0.5, 1.0, 1.5, 2.0];
        assert!((simpson(&square(&x), &x).unwrap() - 8.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_simpson_uneven_spacing() {
        let x = [0.0, 1.0, 3.0];
        assert!((simpson(&square(&x), &x).unwrap() - 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_simpson_odd_intervals_exact_for_quadratics() {
        let x = [0.0, 0.5, 1.5, 2.0];
        assert!((simpson(&square(&x), &x).unwrap() - 8.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_simpson_two_points_is_trapezoid() {
        assert_eq!(simpson(&[1.0, 3.0], &[0.0, 2.0]).unwrap(), 4.0);
    }

    #[test]
    fn test_simpson_descending_x() {
        let x = [2.0, 1.5, 1.0, 0.5, 0.0];
        assert!((simpson(&square(&x), &x).unwrap() + 8.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_simpson_errors() {
        assert_eq!(simpson(&[1.0], &[0.0]), Err(IntegrateError::InsufficientData(1)));
        assert_eq!(simpson(&[1.0, 2.0], &[0.0]), Err(IntegrateError::MismatchedLengths(2, 1)));
        assert!(matches!(simpson(&[1.0, 2.0, 3.0], &[0.0, 0.0, 1.0]), Err(IntegrateError::RepeatedSample(_))));
    }

    #[test]
    fn test_interp() {
        let xp = [1.0, 2.0, 3.0];
        let fp = [3.0, 2.0, 0.0];
        assert_eq!(interp(2.5, &xp, &fp).unwrap(), 1.0);
        assert_eq!(interp(2.0, &xp, &fp).unwrap(), 2.0);
        assert_eq!(interp(0.0, &xp, &fp).unwrap(), 3.0);
        assert_eq!(interp(4.0, &xp, &fp).unwrap(), 0.0);
        assert!(interp(f64::NAN, &xp, &fp).unwrap().is_nan());
    }

    #[test]
    fn test_interp_all() {
        let out = interp_all(&[0.0, 1.5, 5.0], &[1.0, 2.0], &[10.0, 20.0]).unwrap();
        assert_eq!(out, vec![10.0, 15.0, 20.0]);
    }
}
