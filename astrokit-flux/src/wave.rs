//! Frequency/wavelength conversion and linear/log10 scale handling

use crate::FluxError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Speed of light in m/s
pub const SPEED_OF_LIGHT: f64 = 2.99792458e8;

/// Convert a wavelength in micron into a frequency in Hz
pub fn micron_to_hertz(micron: f64) -> f64 {
    SPEED_OF_LIGHT / (1e-6 * micron)
}

/// Convert a frequency in Hz into a wavelength in micron
pub fn hertz_to_micron(hertz: f64) -> f64 {
    SPEED_OF_LIGHT / hertz * 1e6
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WavelengthUnit {
    Micron,
    Nanometre,
    Angstrom,
    Centimetre,
    Metre,
}

impl WavelengthUnit {
    pub fn to_metres(self, value: f64) -> f64 {
        match self {
            WavelengthUnit::Micron => value * 1e-6,
            WavelengthUnit::Nanometre => value * 1e-9,
            WavelengthUnit::Angstrom => value * 1e-10,
            WavelengthUnit::Centimetre => value * 1e-2,
            WavelengthUnit::Metre => value,
        }
    }
}

impl FromStr for WavelengthUnit {
    type Err = FluxError;

    fn from_str(s: &str) -> Result<Self, FluxError> {
        match s.trim() {
            "micron" | "um" => Ok(WavelengthUnit::Micron),
            "nm" => Ok(WavelengthUnit::Nanometre),
            "angstr" | "A" => Ok(WavelengthUnit::Angstrom),
            "cm" => Ok(WavelengthUnit::Centimetre),
            "m" => Ok(WavelengthUnit::Metre),
            other => Err(FluxError::UnknownWavelengthUnit(other.to_string())),
        }
    }
}

impl fmt::Display for WavelengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WavelengthUnit::Micron => "micron",
            WavelengthUnit::Nanometre => "nm",
            WavelengthUnit::Angstrom => "angstr",
            WavelengthUnit::Centimetre => "cm",
            WavelengthUnit::Metre => "m",
        };
        f.write_str(s)
    }
}

/// How a number is expressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scale {
    Linear,
    Log10,
}

impl Scale {
    pub fn from_log_flag(log: bool) -> Self {
        if log { Scale::Log10 } else { Scale::Linear }
    }

    /// Express a linear value in this scale
    pub fn from_linear(self, linear: f64) -> f64 {
        match self {
            Scale::Linear => linear,
            Scale::Log10 => linear.log10(),
        }
    }

    /// Express a log10 value in this scale
    pub fn from_log10(self, log: f64) -> f64 {
        match self {
            Scale::Linear => 10f64.powf(log),
            Scale::Log10 => log,
        }
    }
}

/// A number tagged with its scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Scaled {
    Linear(f64),
    Log10(f64),
}

impl Scaled {
    pub fn new(value: f64, scale: Scale) -> Self {
        match scale {
            Scale::Linear => Scaled::Linear(value),
            Scale::Log10 => Scaled::Log10(value),
        }
    }

    pub fn linear(self) -> f64 {
        match self {
            Scaled::Linear(v) => v,
            Scaled::Log10(v) => 10f64.powf(v),
        }
    }

    /// log10 of the value; `what` names the quantity in the error for
    /// non-positive linear input
    pub fn log10(self, what: &str) -> Result<f64, FluxError> {
        match self {
            Scaled::Log10(v) => Ok(v),
            Scaled::Linear(v) if v > 0.0 => Ok(v.log10()),
            Scaled::Linear(v) => Err(FluxError::Domain(format!(
                "{} must be positive to take its logarithm, got {}", what, v
            ))),
        }
    }
}
