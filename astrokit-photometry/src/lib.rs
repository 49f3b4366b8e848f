//! Astrokit Photometry
//!
//! Synthetic photometry of flux density spectra through filter curves,
//! in wavelength or frequency space, plus the integration and
//! interpolation it is built on.

mod integrate;
mod synth;
mod functions;

pub use integrate::{interp, interp_all, simpson, IntegrateError};
pub use synth::{effective_wavelength, synthphot, synthphot_freq, PhotometryError, SynthPhotOptions};

use astrokit_plugin::PluginRegistry;

/// Load photometry functions into registry
pub fn load_photometry_library(registry: PluginRegistry) -> PluginRegistry {
    registry
        .with_function(functions::Simpson)
        .with_function(functions::Interp)
        .with_function(functions::EffectiveWavelength)
        .with_function(functions::SynthPhot)
        .with_function(functions::SynthPhotFreq)
}
