//! Combination of repeated measurements of one quantity
//!
//! Catalog compilations often hold several measurements of the same
//! quantity: detections with uncertainties, upper and lower limits, and
//! entries that were never measured. [`combine`] reduces them to a single
//! best estimate:
//!
//! 1. only "not measured" entries: `(0, 0, NotMeasured)`
//! 2. any detection: inverse-variance weighted mean and weighted population
//!    standard deviation, with an advisory warning when the result
//!    contradicts the most constraining limit
//! 3. otherwise upper limits: the lowest one
//! 4. otherwise lower limits: the highest one

use crate::flag::{Flag, Input};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

pub const NON_VALID_ERRORS_WARNING: &str =
    "WARNING: Non-valid errors encountered. Setting them to zero";

/// Combined best estimate of a quantity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combined {
    pub value: f64,
    pub error: f64,
    pub flag: Flag,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub warning: Option<String>,
}

impl Combined {
    fn new(value: f64, error: f64, flag: Flag, warning: Option<String>) -> Self {
        Self { value, error, flag, warning }
    }
}

/// Conditions under which no estimate can be produced
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CombineError {
    /// Every entry has a non-finite value or a flag outside `{-1, 0, 1, 2}`.
    /// The rejected arrays are kept for the diagnostic.
    #[error("COMBINE_MEASUREMENTS: ERROR no valid measurement provided: vals: {values:?} errs: {errors:?} flags: {flags:?}")]
    NoValidMeasurement {
        values: Vec<f64>,
        errors: Vec<f64>,
        flags: Vec<i64>,
    },

    #[error("{field} has {got} entries but values has {expected}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        got: usize,
    },
}

impl CombineError {
    /// The `(0, 0, NotMeasured, message)` result for callers that prefer a
    /// sentinel over an error. Shape errors keep their own message.
    pub fn into_sentinel(self) -> Combined {
        Combined::new(0.0, 0.0, Flag::NotMeasured, Some(self.to_string()))
    }
}

/// Combine measurements of one quantity.
///
/// `errors` defaults to zero and `flags` to [`Flag::Detection`]. A scalar
/// `errors` or `flags` alongside a series of values applies to every entry.
///
/// A scalar value (or a one-element series) is passed through unchanged,
/// except that a non-finite error becomes zero and an unusable entry is
/// reported as [`CombineError::NoValidMeasurement`].
pub fn combine(
    values: Input<f64>,
    errors: Option<Input<f64>>,
    flags: Option<Input<i64>>,
) -> Result<Combined, CombineError> {
    if let Some(value) = values.single() {
        return pass_through(value, errors, flags);
    }

    let values = match values {
        Input::Series(v) => v,
        Input::Scalar(v) => vec![v],
    };
    let n = values.len();
    let mut errors = broadcast(errors, n, 0.0, "errors")?;
    let flags = broadcast(flags, n, Flag::Detection.code(), "flags")?;

    let mut warning = None;
    if zero_non_finite(&mut errors) {
        warn!("{}", NON_VALID_ERRORS_WARNING);
        warning = Some(NON_VALID_ERRORS_WARNING.to_string());
    }

    let valid: Vec<(f64, f64, Flag)> = values.iter()
        .zip(&errors)
        .zip(&flags)
        .filter(|((v, _), _)| v.is_finite())
        .filter_map(|((v, e), f)| Flag::try_from(*f).ok().map(|flag| (*v, *e, flag)))
        .collect();

    if valid.is_empty() {
        warn!(values = ?values, errors = ?errors, flags = ?flags, "no valid measurement provided");
        return Err(CombineError::NoValidMeasurement { values, errors, flags });
    }

    let of = |flag: Flag| valid.iter().filter(move |m| m.2 == flag);
    let detections: Vec<(f64, f64)> = of(Flag::Detection).map(|m| (m.0, m.1)).collect();
    let min_upper = of(Flag::UpperLimit).map(|m| m.0).reduce(f64::min);
    let max_lower = of(Flag::LowerLimit).map(|m| m.0).reduce(f64::max);

    if !detections.is_empty() {
        let (value, error) = weighted_mean_std(&detections);

        if let Some(minval) = min_upper {
            if value - error > minval {
                warning = Some(format!(
                    "WARNING: weighted mean of detection larger than upper limit: {} +/- {} > {}",
                    sci3(value), sci3(error), sci3(minval)
                ));
            }
        }

        if let Some(maxval) = max_lower {
            if value + error < maxval {
                warning = Some(format!(
                    "WARNING: weighted mean of detection smaller than lower limit: {}+/- {} < {}",
                    sci3(value), sci3(error), sci3(maxval)
                ));
            }
        }

        if let Some(ref w) = warning {
            warn!(value, error, "{}", w);
        }
        return Ok(Combined::new(value, error, Flag::Detection, warning));
    }

    Ok(match (min_upper, max_lower) {
        (Some(minval), _) => Combined::new(minval, 0.0, Flag::UpperLimit, None),
        (None, Some(maxval)) => Combined::new(maxval, 0.0, Flag::LowerLimit, None),
        // Everything left is flagged not measured
        (None, None) => Combined::new(0.0, 0.0, Flag::NotMeasured, None),
    })
}

fn pass_through(
    value: f64,
    errors: Option<Input<f64>>,
    flags: Option<Input<i64>>,
) -> Result<Combined, CombineError> {
    let error = single_of(errors, 0.0, "errors")?;
    let code = single_of(flags, Flag::Detection.code(), "flags")?;

    let (error, warning) = if error.is_finite() {
        (error, None)
    } else {
        warn!("{}", NON_VALID_ERRORS_WARNING);
        (0.0, Some(NON_VALID_ERRORS_WARNING.to_string()))
    };

    match Flag::try_from(code) {
        Ok(flag) if value.is_finite() => Ok(Combined::new(value, error, flag, warning)),
        _ => {
            warn!(value, error, flag = code, "no valid measurement provided");
            Err(CombineError::NoValidMeasurement {
                values: vec![value],
                errors: vec![error],
                flags: vec![code],
            })
        }
    }
}

fn single_of<T: Copy>(input: Option<Input<T>>, default: T, field: &'static str) -> Result<T, CombineError> {
    match input {
        None => Ok(default),
        Some(input) => input.single().ok_or(CombineError::LengthMismatch {
            field,
            expected: 1,
            got: match input {
                Input::Series(v) => v.len(),
                Input::Scalar(_) => 1,
            },
        }),
    }
}

fn broadcast<T: Copy>(input: Option<Input<T>>, n: usize, default: T, field: &'static str) -> Result<Vec<T>, CombineError> {
    match input {
        None => Ok(vec![default; n]),
        Some(Input::Scalar(v)) => Ok(vec![v; n]),
        Some(Input::Series(v)) if v.len() == n => Ok(v),
        Some(Input::Series(v)) => Err(CombineError::LengthMismatch {
            field,
            expected: n,
            got: v.len(),
        }),
    }
}

/// Replace non-finite entries with zero, reporting whether any were found
fn zero_non_finite(errors: &mut [f64]) -> bool {
    let mut found = false;
    for e in errors.iter_mut().filter(|e| !e.is_finite()) {
        *e = 0.0;
        found = true;
    }
    found
}

/// Weighted mean and weighted population standard deviation of
/// `(value, error)` pairs. Weights are `1/err^2`; if any error is exactly
/// zero all weights are equal.
fn weighted_mean_std(detections: &[(f64, f64)]) -> (f64, f64) {
    if let [(value, error)] = detections {
        return (*value, *error);
    }

    let min_err = detections.iter().map(|d| d.1).fold(f64::INFINITY, f64::min);
    // Scaled by min_err^2 so tiny errors cannot overflow the weights
    let weights: Vec<f64> = if min_err == 0.0 {
        vec![1.0; detections.len()]
    } else {
        detections.iter().map(|d| (min_err / d.1).powi(2)).collect()
    };

    let wsum: f64 = weights.iter().sum();
    let mean = detections.iter().zip(&weights).map(|(d, w)| d.0 * w).sum::<f64>() / wsum;
    let var = detections.iter().zip(&weights)
        .map(|(d, w)| w * (d.0 - mean).powi(2))
        .sum::<f64>() / wsum;

    (mean, var.sqrt())
}

/// Scientific notation with three decimals and a signed two-digit
/// exponent, e.g. `1.100E+01`
pub fn sci3(x: f64) -> String {
    if x.is_nan() {
        return "NAN".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "INF" } else { "-INF" }.to_string();
    }

    let s = format!("{:.3E}", x);
    match s.split_once('E') {
        Some((mantissa, exp)) => {
            let exp: i32 = exp.parse().unwrap_or(0);
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{}E{}{:02}", mantissa, sign, exp.abs())
        }
        None => s,
    }
}
