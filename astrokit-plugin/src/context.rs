//! Call context

use crate::PluginRegistry;
use astrokit_core::Value;
use std::sync::Arc;

/// Context passed to every function call
pub struct EvalContext {
    pub registry: Arc<PluginRegistry>,
    /// Advisory warnings (e.g. a detection above an upper limit) become
    /// errors instead of being attached to the result.
    pub warnings_as_errors: bool,
}

impl EvalContext {
    pub fn new(registry: Arc<PluginRegistry>) -> Self {
        Self {
            registry,
            warnings_as_errors: false,
        }
    }

    pub fn with_warnings_as_errors(mut self, enabled: bool) -> Self {
        self.warnings_as_errors = enabled;
        self
    }

    /// Call another registered function with this context
    pub fn call(&self, name: &str, args: &[Value]) -> Value {
        self.registry.call_function(name, args, self)
    }
}
