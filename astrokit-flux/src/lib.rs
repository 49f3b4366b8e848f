//! Astrokit Flux - Photometric unit conversions
//!
//! Conversions between wavelength and frequency, flux densities and
//! fluxes, magnitudes and flux densities, and between observed fluxes
//! and luminosities. Also the diffraction limit of a telescope.

mod error;
mod wave;
mod flux;
mod luminosity;
mod optics;
mod functions;

pub use error::FluxError;
pub use wave::{hertz_to_micron, micron_to_hertz, Scale, Scaled, WavelengthUnit, SPEED_OF_LIGHT};
pub use flux::{
    convert_flux, erg_to_jansky, jansky_to_erg, jansky_to_mag, mag_to_jansky,
    Filter, FluxUnit, Spectral, ZeroPoint, JANSKY_CGS, JANSKY_SI,
};
pub use luminosity::{flux_to_lum, fnu_to_lum, lum_to_flux, lum_to_fnu, MPC_CM};
pub use optics::{diffraction_limit, ARCSEC_PER_RAD};

use astrokit_plugin::PluginRegistry;

/// Load flux functions into registry
pub fn load_flux_library(registry: PluginRegistry) -> PluginRegistry {
    registry
        // Frequency / wavelength
        .with_function(functions::MicronToHertz)
        .with_function(functions::HertzToMicron)

        // Flux density / flux
        .with_function(functions::JanskyToErg)
        .with_function(functions::ErgToJansky)
        .with_function(functions::ConvertFlux)

        // Magnitudes
        .with_function(functions::ZeroPointFn)
        .with_function(functions::MagToJansky)
        .with_function(functions::JanskyToMag)

        // Luminosity
        .with_function(functions::FluxToLum)
        .with_function(functions::LumToFlux)
        .with_function(functions::FnuToLum)
        .with_function(functions::LumToFnu)

        // Optics
        .with_function(functions::DiffractionLimit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_flux_library() {
        let registry = load_flux_library(PluginRegistry::new());
        assert_eq!(registry.len(), 13);
        assert!(registry.get_function("convert_flux").is_some());
        assert!(registry.get_function("diffraction_limit").is_some());
    }
}
