use crate::flux::FluxUnit;
use thiserror::Error;

/// Errors from unit, magnitude and luminosity conversions
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FluxError {
    #[error("unknown flux unit '{0}' (valid: mJy, Jy, W/m^2, erg/s/cm^2)")]
    UnknownUnit(String),

    #[error("unknown wavelength unit '{0}' (valid: micron, nm, angstr, cm, m)")]
    UnknownWavelengthUnit(String),

    #[error("unknown filter '{0}' (valid: J, H, K, Ks, W1, W2, W3, W4, L, M, M_NB, Lp, Mp, N, Np, Q)")]
    UnknownFilter(String),

    #[error("{unit} cannot be used for {operation}")]
    UnsupportedUnit {
        unit: FluxUnit,
        operation: &'static str,
    },

    #[error("converting {from} to {to} needs a wavelength or frequency")]
    MissingSpectral { from: FluxUnit, to: FluxUnit },

    #[error("{0}")]
    Domain(String),
}
