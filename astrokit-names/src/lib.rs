//! Astrokit Names
//!
//! Rewrites object names as found in SIMBAD, 2MRS, HyperLEDA and similar
//! catalogues into the nomenclature NED understands.

mod ned;
mod functions;

pub use ned::{to_ned_name, NameError};

use astrokit_plugin::PluginRegistry;

/// Load name functions into registry
pub fn load_names_library(registry: PluginRegistry) -> PluginRegistry {
    registry.with_function(functions::ToNedName)
}
