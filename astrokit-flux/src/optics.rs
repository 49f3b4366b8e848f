use crate::FluxError;

/// Arcseconds per radian
pub const ARCSEC_PER_RAD: f64 = 206264.806247;

/// Diffraction limit in arcsec of a telescope with diameter in m at a
/// wavelength in micron (1.028 lambda/D, the FWHM of the Airy core)
pub fn diffraction_limit(diam_m: f64, wlen_micron: f64) -> Result<f64, FluxError> {
    if diam_m <= 0.0 {
        return Err(FluxError::Domain(format!("diameter must be positive, got {}", diam_m)));
    }
    let x = 1.028 * wlen_micron * 1e-6 / diam_m;
    if !(-1.0..=1.0).contains(&x) {
        return Err(FluxError::Domain(format!(
            "wavelength {} micron is too long for a {} m aperture", wlen_micron, diam_m
        )));
    }
    Ok(x.asin() * ARCSEC_PER_RAD)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vlt_at_ten_micron() {
        // 8.2 m at 10 micron is ~0.26 arcsec
        let lim = diffraction_limit(8.2, 10.0).unwrap();
        assert!((lim - 0.2586).abs() < 1e-3);
    }

    #[test]
    fn test_scales_with_wavelength() {
        let a = diffraction_limit(2.0, 1.0).unwrap();
        let b = diffraction_limit(2.0, 2.0).unwrap();
        assert!((b / a - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(diffraction_limit(0.0, 1.0).is_err());
        assert!(diffraction_limit(1e-6, 10.0).is_err());
    }
}
