//! Astrokit Plugin System
//!
//! Provides the `FunctionPlugin` trait every library function implements,
//! the registry that dispatches calls by name, and argument helpers.

mod traits;
mod registry;
mod context;
pub mod args;

pub use traits::{FunctionPlugin, FunctionMeta, ArgMeta};
pub use registry::PluginRegistry;
pub use context::EvalContext;

/// Re-export core types for plugin authors
pub mod prelude {
    pub use crate::{
        FunctionPlugin, FunctionMeta, ArgMeta, PluginRegistry, EvalContext,
    };
    pub use astrokit_core::prelude::*;
}
