//! Astrokit Measurement Combination
//!
//! Reduces repeated catalog measurements of one quantity (detections,
//! upper limits, lower limits, non-measurements) to a single best estimate.

mod flag;
mod combine;
mod functions;

pub use flag::{Flag, Input};
pub use combine::{combine, sci3, Combined, CombineError, NON_VALID_ERRORS_WARNING};

use astrokit_plugin::PluginRegistry;

/// Load measurement functions into registry
pub fn load_measure_library(registry: PluginRegistry) -> PluginRegistry {
    registry.with_function(functions::CombineMeasurements)
}
