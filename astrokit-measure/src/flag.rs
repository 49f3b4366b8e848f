//! Measurement classification and input shapes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Quality flag of a single measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i64", try_from = "i64")]
pub enum Flag {
    NotMeasured,
    Detection,
    /// Only a maximum is known; the true value may be lower.
    UpperLimit,
    /// Only a minimum is known; the true value may be higher.
    LowerLimit,
}

impl Flag {
    /// Stand-in code for a flag that is missing or not an integer, so the
    /// entry is dropped like any other out-of-domain flag
    pub const UNUSABLE_CODE: i64 = -99;

    pub const fn code(self) -> i64 {
        match self {
            Flag::NotMeasured => -1,
            Flag::Detection => 0,
            Flag::UpperLimit => 1,
            Flag::LowerLimit => 2,
        }
    }
}

impl TryFrom<i64> for Flag {
    type Error = i64;

    fn try_from(code: i64) -> Result<Self, i64> {
        match code {
            -1 => Ok(Flag::NotMeasured),
            0 => Ok(Flag::Detection),
            1 => Ok(Flag::UpperLimit),
            2 => Ok(Flag::LowerLimit),
            other => Err(other),
        }
    }
}

impl From<Flag> for i64 {
    fn from(flag: Flag) -> i64 {
        flag.code()
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A single value or a series of repeated measurements
#[derive(Debug, Clone, PartialEq)]
pub enum Input<T> {
    Scalar(T),
    Series(Vec<T>),
}

impl<T: Copy> Input<T> {
    /// The only element of a scalar or a one-element series
    pub(crate) fn single(&self) -> Option<T> {
        match self {
            Input::Scalar(v) => Some(*v),
            Input::Series(v) if v.len() == 1 => Some(v[0]),
            Input::Series(_) => None,
        }
    }
}

impl From<f64> for Input<f64> {
    fn from(v: f64) -> Self {
        Input::Scalar(v)
    }
}

impl From<i64> for Input<i64> {
    fn from(v: i64) -> Self {
        Input::Scalar(v)
    }
}

impl<T> From<Vec<T>> for Input<T> {
    fn from(v: Vec<T>) -> Self {
        Input::Series(v)
    }
}

impl<T: Clone> From<&[T]> for Input<T> {
    fn from(v: &[T]) -> Self {
        Input::Series(v.to_vec())
    }
}
