//! The function set served over MCP

use astrokit_flux::load_flux_library;
use astrokit_measure::load_measure_library;
use astrokit_names::load_names_library;
use astrokit_photometry::load_photometry_library;
use astrokit_plugin::PluginRegistry;

/// Registry with every astrokit library loaded
pub fn standard_registry() -> PluginRegistry {
    let registry = PluginRegistry::new();
    let registry = load_measure_library(registry);
    let registry = load_flux_library(registry);
    let registry = load_photometry_library(registry);
    load_names_library(registry)
}
