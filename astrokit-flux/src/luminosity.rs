//! Luminosity <-> flux conversions for sources at a distance in Mpc
//!
//! Everything is computed in log10 space. Luminosities are in erg/s.

use crate::flux::FluxUnit;
use crate::wave::{Scale, Scaled, SPEED_OF_LIGHT};
use crate::FluxError;
use std::f64::consts::PI;

/// 1 Mpc in cm
pub const MPC_CM: f64 = 3.086e24;

/// log10 of the sphere area 4 pi d^2 in cm^2 for a distance in Mpc
fn log_area(dist_mpc: Scaled) -> Result<f64, FluxError> {
    Ok((4.0 * PI).log10() + 2.0 * dist_mpc.log10("distance")? + 2.0 * MPC_CM.log10())
}

/// log10 of the frequency in Hz for a wavelength in micron
fn log_freq(wlen_micron: Scaled) -> Result<f64, FluxError> {
    Ok(SPEED_OF_LIGHT.log10() - wlen_micron.log10("wavelength")? + 6.0)
}

/// dex to add to a log flux in `unit` to get erg/s/cm^2
fn flux_offset(unit: FluxUnit, operation: &'static str) -> Result<f64, FluxError> {
    match unit {
        FluxUnit::ErgPerSecondPerSquareCentimetre => Ok(0.0),
        FluxUnit::WattPerSquareMetre => Ok(3.0),
        other => Err(FluxError::UnsupportedUnit { unit: other, operation }),
    }
}

/// dex to add to a log flux density in `unit` to get Jy
fn density_offset(unit: FluxUnit, operation: &'static str) -> Result<f64, FluxError> {
    match unit {
        FluxUnit::Jansky => Ok(0.0),
        FluxUnit::MilliJansky => Ok(-3.0),
        other => Err(FluxError::UnsupportedUnit { unit: other, operation }),
    }
}

/// Luminosity of a source with the given flux (erg/s/cm^2 or W/m^2)
pub fn flux_to_lum(flux: Scaled, dist_mpc: Scaled, unit: FluxUnit, out: Scale) -> Result<f64, FluxError> {
    let offset = flux_offset(unit, "flux_to_lum")?;
    let log_flux = flux.log10("flux")? + offset;
    Ok(out.from_log10(log_flux + log_area(dist_mpc)?))
}

/// Flux (erg/s/cm^2 or W/m^2) received from a source of given luminosity
pub fn lum_to_flux(lum: Scaled, dist_mpc: Scaled, unit: FluxUnit, out: Scale) -> Result<f64, FluxError> {
    let offset = flux_offset(unit, "lum_to_flux")?;
    let log_flux = lum.log10("luminosity")? - log_area(dist_mpc)?;
    Ok(out.from_log10(log_flux - offset))
}

/// Monochromatic luminosity nu L_nu of a source with flux density in
/// (m)Jy at a wavelength in micron
pub fn fnu_to_lum(
    fnu: Scaled,
    dist_mpc: Scaled,
    wlen_micron: Scaled,
    unit: FluxUnit,
    out: Scale,
) -> Result<f64, FluxError> {
    let offset = density_offset(unit, "fnu_to_lum")?;
    let log_fnu = fnu.log10("flux density")? + offset;
    let log_nufnu = log_fnu + log_freq(wlen_micron)? - 23.0;
    Ok(out.from_log10(log_nufnu + log_area(dist_mpc)?))
}

/// Flux density in (m)Jy at a wavelength in micron of a source with
/// monochromatic luminosity nu L_nu
pub fn lum_to_fnu(
    lum: Scaled,
    dist_mpc: Scaled,
    wlen_micron: Scaled,
    unit: FluxUnit,
    out: Scale,
) -> Result<f64, FluxError> {
    let offset = density_offset(unit, "lum_to_fnu")?;
    let log_nufnu = lum.log10("luminosity")? - log_area(dist_mpc)?;
    let log_fnu = log_nufnu - log_freq(wlen_micron)? + 23.0;
    Ok(out.from_log10(log_fnu - offset))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ERG: FluxUnit = FluxUnit::ErgPerSecondPerSquareCentimetre;

    #[test]
    fn test_flux_to_lum_at_ten_mpc() {
        // L = 4 pi (10 Mpc)^2 * 1e-12 erg/s/cm^2
        let expected = (4.0 * PI * (10.0 * MPC_CM).powi(2) * 1e-12).log10();
        let lum = flux_to_lum(Scaled::Linear(1e-12), Scaled::Linear(10.0), ERG, Scale::Log10).unwrap();
        assert!((lum - expected).abs() < 1e-10);
    }

    #[test]
    fn test_watts_are_three_dex_above_erg() {
        let a = flux_to_lum(Scaled::Linear(1e-15), Scaled::Linear(5.0), FluxUnit::WattPerSquareMetre, Scale::Log10).unwrap();
        let b = flux_to_lum(Scaled::Linear(1e-12), Scaled::Linear(5.0), ERG, Scale::Log10).unwrap();
        assert!((a - b).abs() < 1e-10);
    }

    #[test]
    fn test_lum_flux_inverse() {
        for unit in [ERG, FluxUnit::WattPerSquareMetre] {
            let lum = flux_to_lum(Scaled::Linear(3e-13), Scaled::Linear(42.0), unit, Scale::Log10).unwrap();
            let flux = lum_to_flux(Scaled::Log10(lum), Scaled::Linear(42.0), unit, Scale::Linear).unwrap();
            assert!(((flux - 3e-13) / 3e-13).abs() < 1e-9);
        }
    }

    #[test]
    fn test_fnu_lum_inverse() {
        for unit in [FluxUnit::Jansky, FluxUnit::MilliJansky] {
            let lum = fnu_to_lum(Scaled::Linear(0.05), Scaled::Log10(1.0), Scaled::Linear(12.0), unit, Scale::Log10).unwrap();
            let fnu = lum_to_fnu(Scaled::Log10(lum), Scaled::Log10(1.0), Scaled::Linear(12.0), unit, Scale::Linear).unwrap();
            assert!(((fnu - 0.05) / 0.05).abs() < 1e-9);
        }
    }

    #[test]
    fn test_millijansky_is_three_dex_below_jansky() {
        let jy = fnu_to_lum(Scaled::Linear(1.0), Scaled::Linear(1.0), Scaled::Linear(10.0), FluxUnit::Jansky, Scale::Log10).unwrap();
        let mjy = fnu_to_lum(Scaled::Linear(1000.0), Scaled::Linear(1.0), Scaled::Linear(10.0), FluxUnit::MilliJansky, Scale::Log10).unwrap();
        assert!((jy - mjy).abs() < 1e-10);
    }

    #[test]
    fn test_fnu_lum_consistent_with_flux_lum() {
        let nufnu = crate::flux::jansky_to_erg(2.0, 10.0);
        let a = fnu_to_lum(Scaled::Linear(2.0), Scaled::Linear(20.0), Scaled::Linear(10.0), FluxUnit::Jansky, Scale::Log10).unwrap();
        let b = flux_to_lum(Scaled::Linear(nufnu), Scaled::Linear(20.0), ERG, Scale::Log10).unwrap();
        assert!((a - b).abs() < 1e-10);
    }

    #[test]
    fn test_unsupported_units() {
        assert!(flux_to_lum(Scaled::Linear(1.0), Scaled::Linear(1.0), FluxUnit::Jansky, Scale::Log10).is_err());
        assert!(fnu_to_lum(Scaled::Linear(1.0), Scaled::Linear(1.0), Scaled::Linear(1.0), ERG, Scale::Log10).is_err());
    }

    #[test]
    fn test_non_positive_distance() {
        let err = flux_to_lum(Scaled::Linear(1.0), Scaled::Linear(0.0), ERG, Scale::Log10).unwrap_err();
        assert!(matches!(err, FluxError::Domain(_)));
    }
}
