//! Synthetic photometry of a flux density spectrum through a filter
//!
//! The filter is normalised against a power-law reference spectrum
//! S_nu ∝ lambda^(-alpha) so that the result is the flux density of the
//! source at the reference wavelength.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::integrate::{interp_all, simpson, IntegrateError};

const SPEED_OF_LIGHT: f64 = 2.99792458e8;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhotometryError {
    #[error("{what}: {left} values but {right} wavelengths")]
    LengthMismatch {
        what: &'static str,
        left: usize,
        right: usize,
    },

    #[error("{what} needs at least 2 usable points, got {got}")]
    InsufficientData { what: &'static str, got: usize },

    #[error("spectrum [{spectrum_min}, {spectrum_max}] does not cover the filter curve [{filter_min}, {filter_max}]")]
    Incomplete {
        filter_min: f64,
        filter_max: f64,
        spectrum_min: f64,
        spectrum_max: f64,
    },

    #[error("spectrum has a hole of {gap} at {at}, larger than the acceptable {acceptable}")]
    Hole { gap: f64, at: f64, acceptable: f64 },

    #[error("filter transmission integrates to zero")]
    ZeroTransmission,

    #[error(transparent)]
    Integrate(#[from] IntegrateError),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthPhotOptions {
    /// Allow a spectrum that does not cover the whole filter curve
    pub ignore_incomplete: bool,
    /// Largest allowed wavelength step inside the filter range
    pub acceptable_hole: f64,
    /// Power-law index of the reference spectrum
    pub alpha: f64,
}

impl Default for SynthPhotOptions {
    fn default() -> Self {
        Self {
            ignore_incomplete: false,
            acceptable_hole: 0.7,
            alpha: -2.0,
        }
    }
}

/// Effective wavelength of a filter for a reference spectrum with
/// power-law slope `alpha`
pub fn effective_wavelength(fwlen: &[f64], ftrans: &[f64], alpha: f64) -> Result<f64, PhotometryError> {
    if fwlen.len() != ftrans.len() {
        return Err(PhotometryError::LengthMismatch { what: "filter", left: ftrans.len(), right: fwlen.len() });
    }
    let weight: Vec<f64> = fwlen.iter().zip(ftrans)
        .map(|(&w, &t)| t * w.powf(-alpha - 1.0))
        .collect();
    let num: Vec<f64> = weight.iter().zip(fwlen).map(|(&k, &w)| k * w).collect();

    let den = simpson(&weight, fwlen)?;
    if den == 0.0 {
        return Err(PhotometryError::ZeroTransmission);
    }
    Ok(simpson(&num, fwlen)? / den)
}

/// Synthetic flux density of the spectrum `(wavelen, fluxden)` through
/// the filter `(fwlen, ftrans)` at `ref_wlen`. Wavelengths share one unit.
pub fn synthphot(
    wavelen: &[f64],
    fluxden: &[f64],
    fwlen: &[f64],
    ftrans: &[f64],
    ref_wlen: f64,
    opts: &SynthPhotOptions,
) -> Result<f64, PhotometryError> {
    let spectrum = prepare_spectrum(wavelen, fluxden, |w| w)?;
    let filter = prepare_filter(fwlen, ftrans, |w| w)?;
    check_coverage(&spectrum.0, fwlen, opts)?;

    apply_filter(spectrum, filter, -opts.alpha, ref_wlen)
}

/// [`synthphot`] carried out in frequency space
pub fn synthphot_freq(
    wavelen: &[f64],
    fluxden: &[f64],
    fwlen: &[f64],
    ftrans: &[f64],
    ref_wlen: f64,
    opts: &SynthPhotOptions,
) -> Result<f64, PhotometryError> {
    let by_wavelength = prepare_spectrum(wavelen, fluxden, |w| w)?;
    check_coverage(&by_wavelength.0, fwlen, opts)?;

    let spectrum = prepare_spectrum(wavelen, fluxden, micron_to_hertz)?;
    let filter = prepare_filter(fwlen, ftrans, micron_to_hertz)?;

    apply_filter(spectrum, filter, opts.alpha, micron_to_hertz(ref_wlen))
}

fn micron_to_hertz(micron: f64) -> f64 {
    SPEED_OF_LIGHT / (1e-6 * micron)
}

type Samples = (Vec<f64>, Vec<f64>);

/// Drop zero wavelengths, map to the integration variable and sort
fn prepare_spectrum(wavelen: &[f64], fluxden: &[f64], to_x: impl Fn(f64) -> f64) -> Result<Samples, PhotometryError> {
    if wavelen.len() != fluxden.len() {
        return Err(PhotometryError::LengthMismatch { what: "spectrum", left: fluxden.len(), right: wavelen.len() });
    }
    let mut pairs: Vec<(f64, f64)> = wavelen.iter().zip(fluxden)
        .filter(|(&w, _)| w != 0.0)
        .map(|(&w, &f)| (to_x(w), f))
        .collect();
    if pairs.len() < 2 {
        return Err(PhotometryError::InsufficientData { what: "spectrum", got: pairs.len() });
    }
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
    Ok(pairs.into_iter().unzip())
}

fn prepare_filter(fwlen: &[f64], ftrans: &[f64], to_x: impl Fn(f64) -> f64) -> Result<Samples, PhotometryError> {
    if fwlen.len() != ftrans.len() {
        return Err(PhotometryError::LengthMismatch { what: "filter", left: ftrans.len(), right: fwlen.len() });
    }
    let mut pairs: Vec<(f64, f64)> = fwlen.iter().zip(ftrans)
        .filter(|(w, _)| w.is_finite())
        .map(|(&w, &t)| (to_x(w), t))
        .collect();
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
    Ok(pairs.into_iter().unzip())
}

/// Spectrum must span the filter and be sampled densely inside it
fn check_coverage(wlen: &[f64], fwlen: &[f64], opts: &SynthPhotOptions) -> Result<(), PhotometryError> {
    if opts.ignore_incomplete {
        return Ok(());
    }

    let finite = || fwlen.iter().copied().filter(|w| !w.is_nan());
    let filter_min = finite().fold(f64::INFINITY, f64::min);
    let filter_max = finite().fold(f64::NEG_INFINITY, f64::max);
    if filter_min > filter_max {
        return Err(PhotometryError::InsufficientData { what: "filter", got: 0 });
    }

    let spectrum_min = wlen[0];
    let spectrum_max = wlen[wlen.len() - 1];
    if filter_min < spectrum_min || filter_max > spectrum_max {
        return Err(PhotometryError::Incomplete { filter_min, filter_max, spectrum_min, spectrum_max });
    }

    let widest = wlen.windows(2)
        .filter(|w| w[1] >= filter_min && w[1] <= filter_max)
        .map(|w| (w[1] - w[0], w[1]))
        .fold(None, |best: Option<(f64, f64)>, cur| match best {
            Some(b) if b.0 >= cur.0 => Some(b),
            _ => Some(cur),
        });

    match widest {
        Some((gap, at)) if gap > opts.acceptable_hole => {
            Err(PhotometryError::Hole { gap, at, acceptable: opts.acceptable_hole })
        }
        _ => Ok(()),
    }
}

/// Normalise the overlapping filter against x^slope, interpolate it onto
/// the spectrum grid and integrate
fn apply_filter(spectrum: Samples, filter: Samples, slope: f64, reference: f64) -> Result<f64, PhotometryError> {
    let (x, flux) = spectrum;
    let (fx, ftrans) = filter;
    let (lo, hi) = (x[0], x[x.len() - 1]);

    let (fx, ftrans): Samples = fx.into_iter().zip(ftrans)
        .filter(|(v, _)| *v >= lo && *v <= hi)
        .unzip();
    if fx.len() < 2 {
        return Err(PhotometryError::InsufficientData { what: "filter overlap", got: fx.len() });
    }

    let weighted: Vec<f64> = fx.iter().zip(&ftrans)
        .map(|(&v, &t)| t / v * v.powf(slope))
        .collect();
    let norm = simpson(&weighted, &fx)?;
    if norm == 0.0 {
        return Err(PhotometryError::ZeroTransmission);
    }
    debug!(points = fx.len(), norm, "normalised filter");
    let ftrans: Vec<f64> = ftrans.iter().map(|t| t / norm).collect();

    let (flo, fhi) = (fx[0], fx[fx.len() - 1]);
    let (x, flux): Samples = x.into_iter().zip(flux)
        .filter(|(v, _)| *v >= flo && *v <= fhi)
        .unzip();
    if x.len() < 2 {
        return Err(PhotometryError::InsufficientData { what: "spectrum inside filter", got: x.len() });
    }

    let trans = interp_all(&x, &fx, &ftrans)?;
    let integrand: Vec<f64> = x.iter().zip(&flux).zip(&trans)
        .map(|((&v, &f), &t)| f * t / v)
        .collect();

    Ok(simpson(&integrand, &x)? * reference.powf(slope))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 8 to 13 micron in steps of 0.25
    fn grid() -> Vec<f64> {
        (0..=20).map(|i| 8.0 + 0.25 * i as f64).collect()
    }

    /// Box filter from 10 to 11 micron on the spectrum grid
    fn box_filter() -> (Vec<f64>, Vec<f64>) {
        let w: Vec<f64> = (0..=4).map(|i| 10.0 + 0.25 * i as f64).collect();
        let t = vec![1.0; w.len()];
        (w, t)
    }

    fn rel_close(a: f64, b: f64) -> bool {
        ((a - b) / b).abs() < 1e-9
    }

    #[test]
    fn test_reference_spectrum_recovered() {
        // F ∝ lambda^2 is the alpha = -2 reference spectrum
        let w = grid();
        let f: Vec<f64> = w.iter().map(|x| 3.0 * x * x).collect();
        let (fw, ft) = box_filter();
        let r = synthphot(&w, &f, &fw, &ft, 10.5, &SynthPhotOptions::default()).unwrap();
        assert!(rel_close(r, 3.0 * 10.5 * 10.5));
    }

    #[test]
    fn test_flat_spectrum_alpha_zero() {
        let w = grid();
        let f = vec![2.0; w.len()];
        let (fw, ft) = box_filter();
        let opts = SynthPhotOptions { alpha: 0.0, ..Default::default() };
        let r = synthphot(&w, &f, &fw, &ft, 10.5, &opts).unwrap();
        assert!(rel_close(r, 2.0));
    }

    #[test]
    fn test_unsorted_input_and_zero_wavelengths() {
        let mut w = grid();
        w.reverse();
        w.push(0.0);
        let f: Vec<f64> = w.iter().map(|x| x * x).collect();
        let (fw, ft) = box_filter();
        let r = synthphot(&w, &f, &fw, &ft, 10.0, &SynthPhotOptions::default()).unwrap();
        assert!(rel_close(r, 100.0));
    }

    #[test]
    fn test_frequency_space_reference_spectrum() {
        // in frequency space the reference spectrum is nu^alpha
        let w = grid();
        let f: Vec<f64> = w.iter().map(|&x| micron_to_hertz(x).powf(-2.0)).collect();
        let (fw, ft) = box_filter();
        let r = synthphot_freq(&w, &f, &fw, &ft, 10.5, &SynthPhotOptions::default()).unwrap();
        assert!(rel_close(r, micron_to_hertz(10.5).powf(-2.0)));
    }

    #[test]
    fn test_incomplete_coverage() {
        let w: Vec<f64> = (0..=8).map(|i| 10.25 + 0.25 * i as f64).collect();
        let f = vec![1.0; w.len()];
        let (fw, ft) = box_filter();
        let err = synthphot(&w, &f, &fw, &ft, 10.5, &SynthPhotOptions::default()).unwrap_err();
        assert!(matches!(err, PhotometryError::Incomplete { .. }));
    }

    #[test]
    fn test_ignore_incomplete_uses_overlap() {
        let w: Vec<f64> = (0..=8).map(|i| 10.25 + 0.25 * i as f64).collect();
        let f = vec![1.0; w.len()];
        let (fw, ft) = box_filter();
        let opts = SynthPhotOptions { ignore_incomplete: true, alpha: 0.0, ..Default::default() };
        let r = synthphot(&w, &f, &fw, &ft, 10.5, &opts).unwrap();
        assert!(rel_close(r, 1.0));
    }

    #[test]
    fn test_hole_in_spectrum() {
        let w = vec![8.0, 9.0, 9.5, 10.0, 11.0, 12.0];
        let f = vec![1.0; w.len()];
        let (fw, ft) = box_filter();
        match synthphot(&w, &f, &fw, &ft, 10.5, &SynthPhotOptions::default()) {
            Err(PhotometryError::Hole { gap, at, .. }) => {
                assert_eq!(gap, 1.0);
                assert_eq!(at, 11.0);
            }
            other => panic!("expected hole, got {:?}", other),
        }
    }

    #[test]
    fn test_wider_hole_allowed() {
        let w = vec![8.0, 9.0, 9.5, 10.0, 11.0, 12.0];
        let f = vec![1.0; w.len()];
        let (fw, ft) = box_filter();
        let opts = SynthPhotOptions { acceptable_hole: 1.5, alpha: 0.0, ..Default::default() };
        assert!(synthphot(&w, &f, &fw, &ft, 10.5, &opts).is_ok());
    }

    #[test]
    fn test_length_mismatch() {
        let err = synthphot(&[1.0, 2.0], &[1.0], &[1.0, 2.0], &[1.0, 1.0], 1.5, &SynthPhotOptions::default()).unwrap_err();
        assert!(matches!(err, PhotometryError::LengthMismatch { what: "spectrum", .. }));
    }

    #[test]
    fn test_effective_wavelength_symmetric_box() {
        let (fw, ft) = box_filter();
        // alpha = -1: ∫T λ dλ / ∫T dλ is the midpoint
        let eff = effective_wavelength(&fw, &ft, -1.0).unwrap();
        assert!((eff - 10.5).abs() < 1e-12);
    }

    #[test]
    fn test_effective_wavelength_zero_filter() {
        let (fw, _) = box_filter();
        let zeros = vec![0.0; fw.len()];
        assert_eq!(effective_wavelength(&fw, &zeros, 0.0), Err(PhotometryError::ZeroTransmission));
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let opts: SynthPhotOptions = serde_json::from_str(r#"{"alpha": 0}"#).unwrap();
        assert_eq!(opts.alpha, 0.0);
        assert_eq!(opts.acceptable_hole, 0.7);
        assert!(!opts.ignore_incomplete);
    }
}
