//! Flux density, flux and magnitude conversions
//!
//! Flux densities are in (m)Jy, fluxes (nu F_nu) in W/m^2 or erg/s/cm^2.
//! Moving between the two needs the frequency of the observation.

use crate::wave::{micron_to_hertz, Scale, Scaled, WavelengthUnit, SPEED_OF_LIGHT};
use crate::FluxError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 1 Jy in erg/s/cm^2/Hz
pub const JANSKY_CGS: f64 = 1e-23;

/// 1 Jy in W/m^2/Hz
pub const JANSKY_SI: f64 = 1e-26;

/// Convert a flux density in Jy into a flux nu F_nu in erg/s/cm^2 at a
/// wavelength in micron
pub fn jansky_to_erg(fnu: f64, wlen_micron: f64) -> f64 {
    fnu * JANSKY_CGS * micron_to_hertz(wlen_micron)
}

/// Convert a flux nu F_nu in erg/s/cm^2 into a flux density in Jy at a
/// wavelength in micron
pub fn erg_to_jansky(nufnu: f64, wlen_micron: f64) -> f64 {
    nufnu / JANSKY_CGS / micron_to_hertz(wlen_micron)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FluxUnit {
    MilliJansky,
    Jansky,
    WattPerSquareMetre,
    ErgPerSecondPerSquareCentimetre,
}

impl FluxUnit {
    pub fn is_density(self) -> bool {
        matches!(self, FluxUnit::MilliJansky | FluxUnit::Jansky)
    }

    /// Factor to Jy for densities, to W/m^2 for fluxes
    fn to_canonical(self) -> f64 {
        match self {
            FluxUnit::MilliJansky => 1e-3,
            FluxUnit::Jansky => 1.0,
            FluxUnit::WattPerSquareMetre => 1.0,
            FluxUnit::ErgPerSecondPerSquareCentimetre => 1e-3,
        }
    }
}

impl FromStr for FluxUnit {
    type Err = FluxError;

    fn from_str(s: &str) -> Result<Self, FluxError> {
        match s.trim() {
            "mJy" => Ok(FluxUnit::MilliJansky),
            "Jy" => Ok(FluxUnit::Jansky),
            "W/m^2" => Ok(FluxUnit::WattPerSquareMetre),
            "erg/s/cm^2" => Ok(FluxUnit::ErgPerSecondPerSquareCentimetre),
            other => Err(FluxError::UnknownUnit(other.to_string())),
        }
    }
}

impl fmt::Display for FluxUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FluxUnit::MilliJansky => "mJy",
            FluxUnit::Jansky => "Jy",
            FluxUnit::WattPerSquareMetre => "W/m^2",
            FluxUnit::ErgPerSecondPerSquareCentimetre => "erg/s/cm^2",
        };
        f.write_str(s)
    }
}

/// Spectral coordinate of a flux measurement
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Spectral {
    Wavelength(Scaled, WavelengthUnit),
    /// Frequency in Hz
    Frequency(Scaled),
}

impl Spectral {
    pub fn hertz(self) -> f64 {
        match self {
            Spectral::Wavelength(w, unit) => SPEED_OF_LIGHT / unit.to_metres(w.linear()),
            Spectral::Frequency(f) => f.linear(),
        }
    }
}

/// Convert a flux or flux density between units.
///
/// Conversions within densities or within fluxes are pure factors;
/// crossing between them needs `spectral`.
pub fn convert_flux(
    flux: Scaled,
    from: FluxUnit,
    to: FluxUnit,
    spectral: Option<Spectral>,
    out: Scale,
) -> Result<f64, FluxError> {
    let canonical = flux.linear() * from.to_canonical();

    let canonical = if from.is_density() == to.is_density() {
        canonical
    } else {
        let freq = spectral
            .ok_or(FluxError::MissingSpectral { from, to })?
            .hertz();
        if from.is_density() {
            canonical * JANSKY_SI * freq
        } else {
            canonical / JANSKY_SI / freq
        }
    };

    Ok(out.from_linear(canonical / to.to_canonical()))
}

/// Photometric system filter with an approximate Vega zero point.
/// Instrument-to-instrument differences are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Filter {
    // 2MASS
    J,
    H,
    K,
    // WISE
    W1,
    W2,
    W3,
    W4,
    // ISAAC
    L,
    MNb,
    // NACO
    Lp,
    Mp,
    // VISIR / T-ReCS / Michelle
    N,
    Np,
    Q,
}

impl Filter {
    pub fn zero_point_jy(self) -> f64 {
        match self {
            Filter::J => 1594.0,
            Filter::H => 1024.0,
            Filter::K => 666.8,
            Filter::W1 => 309.540,
            Filter::W2 => 171.787,
            Filter::W3 => 31.674,
            Filter::W4 => 8.363,
            Filter::L => 247.2,
            Filter::MNb => 164.5,
            Filter::Lp => 244.2,
            Filter::Mp => 159.7,
            Filter::N => 37.0,
            Filter::Np => 30.0,
            Filter::Q => 10.0,
        }
    }
}

impl FromStr for Filter {
    type Err = FluxError;

    fn from_str(s: &str) -> Result<Self, FluxError> {
        Ok(match s.trim() {
            "J" => Filter::J,
            "H" => Filter::H,
            "K" | "Ks" => Filter::K,
            "W1" => Filter::W1,
            "W2" => Filter::W2,
            "W3" => Filter::W3,
            "W4" => Filter::W4,
            "L" => Filter::L,
            "M" | "M_NB" => Filter::MNb,
            "Lp" => Filter::Lp,
            "Mp" => Filter::Mp,
            "N" => Filter::N,
            "Np" => Filter::Np,
            "Q" => Filter::Q,
            other => return Err(FluxError::UnknownFilter(other.to_string())),
        })
    }
}

/// Magnitude zero point: explicit in Jy or taken from a filter
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZeroPoint {
    Jansky(f64),
    Filter(Filter),
}

impl ZeroPoint {
    pub fn jansky(self) -> f64 {
        match self {
            ZeroPoint::Jansky(zp) => zp,
            ZeroPoint::Filter(f) => f.zero_point_jy(),
        }
    }
}

impl From<Filter> for ZeroPoint {
    fn from(f: Filter) -> Self {
        ZeroPoint::Filter(f)
    }
}

pub fn mag_to_jansky(mag: f64, zp: ZeroPoint) -> f64 {
    zp.jansky() * 10f64.powf(-mag / 2.5)
}

pub fn jansky_to_mag(jy: f64, zp: ZeroPoint) -> Result<f64, FluxError> {
    if jy <= 0.0 {
        return Err(FluxError::Domain(format!(
            "flux density must be positive to convert to a magnitude, got {}", jy
        )));
    }
    Ok(-2.5 * (jy / zp.jansky()).log10())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rel_close(a: f64, b: f64) -> bool {
        ((a - b) / b).abs() < 1e-9
    }

    #[test]
    fn test_jansky_to_erg() {
        // 1 Jy at 10 micron: 1e-23 * 2.998e13 = 2.998e-10 erg/s/cm^2
        assert!(rel_close(jansky_to_erg(1.0, 10.0), 2.99792458e-10));
        assert!(rel_close(erg_to_jansky(jansky_to_erg(3.5, 2.2), 2.2), 3.5));
    }

    #[test]
    fn test_unit_parsing() {
        assert_eq!("W/m^2".parse::<FluxUnit>().unwrap(), FluxUnit::WattPerSquareMetre);
        assert!("Jansky".parse::<FluxUnit>().is_err());
        assert_eq!(FluxUnit::ErgPerSecondPerSquareCentimetre.to_string(), "erg/s/cm^2");
    }

    #[test]
    fn test_simple_conversions() {
        let mjy = convert_flux(Scaled::Linear(2.0), FluxUnit::Jansky, FluxUnit::MilliJansky, None, Scale::Linear).unwrap();
        assert!(rel_close(mjy, 2000.0));
        let jy = convert_flux(Scaled::Linear(2000.0), FluxUnit::MilliJansky, FluxUnit::Jansky, None, Scale::Linear).unwrap();
        assert!(rel_close(jy, 2.0));
        let erg = convert_flux(Scaled::Linear(1.0), FluxUnit::WattPerSquareMetre, FluxUnit::ErgPerSecondPerSquareCentimetre, None, Scale::Linear).unwrap();
        assert!(rel_close(erg, 1e3));
    }

    #[test]
    fn test_crossover_matches_jansky_to_erg() {
        let spectral = Spectral::Wavelength(Scaled::Linear(10.0), WavelengthUnit::Micron);
        let erg = convert_flux(Scaled::Linear(1.0), FluxUnit::Jansky,
            FluxUnit::ErgPerSecondPerSquareCentimetre, Some(spectral), Scale::Linear).unwrap();
        assert!(rel_close(erg, jansky_to_erg(1.0, 10.0)));
    }

    #[test]
    fn test_crossover_round_trip_through_frequency() {
        let spectral = Spectral::Frequency(Scaled::Log10(13.0));
        let w = convert_flux(Scaled::Linear(250.0), FluxUnit::MilliJansky,
            FluxUnit::WattPerSquareMetre, Some(spectral), Scale::Linear).unwrap();
        // 0.25 Jy * 1e-26 * 1e13
        assert!(rel_close(w, 2.5e-14));
        let back = convert_flux(Scaled::Linear(w), FluxUnit::WattPerSquareMetre,
            FluxUnit::MilliJansky, Some(spectral), Scale::Linear).unwrap();
        assert!(rel_close(back, 250.0));
    }

    #[test]
    fn test_log_in_and_out() {
        let out = convert_flux(Scaled::Log10(1.0), FluxUnit::Jansky, FluxUnit::MilliJansky, None, Scale::Log10).unwrap();
        assert!((out - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_crossover_needs_spectral() {
        let err = convert_flux(Scaled::Linear(1.0), FluxUnit::Jansky, FluxUnit::WattPerSquareMetre, None, Scale::Linear).unwrap_err();
        assert!(matches!(err, FluxError::MissingSpectral { .. }));
    }

    #[test]
    fn test_filters() {
        assert_eq!("Ks".parse::<Filter>().unwrap(), Filter::K);
        assert_eq!(Filter::K.zero_point_jy(), 666.8);
        assert_eq!("M".parse::<Filter>().unwrap(), Filter::MNb);
        assert!("V".parse::<Filter>().is_err());
    }

    #[test]
    fn test_magnitudes() {
        assert!(rel_close(mag_to_jansky(0.0, Filter::W1.into()), 309.54));
        assert!(rel_close(mag_to_jansky(2.5, ZeroPoint::Jansky(100.0)), 10.0));
        let mag = jansky_to_mag(10.0, ZeroPoint::Jansky(100.0)).unwrap();
        assert!((mag - 2.5).abs() < 1e-12);
        assert!(jansky_to_mag(0.0, Filter::N.into()).is_err());
    }
}
