//! The contract every astrokit library function implements

use astrokit_core::Value;
use crate::EvalContext;
use serde::Serialize;

/// One positional argument as shown by `help`
#[derive(Debug, Clone, Serialize)]
pub struct ArgMeta {
    pub name: &'static str,
    /// Accepted shape, e.g. `List<Number> | Number`
    pub typ: &'static str,
    /// Meaning and physical unit, e.g. "Wavelength in micron"
    pub description: &'static str,
    /// Optional arguments may be omitted or passed as `null`
    pub optional: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<&'static str>,
}

impl ArgMeta {
    pub const fn required(name: &'static str, typ: &'static str, description: &'static str) -> Self {
        Self { name, typ, description, optional: false, default: None }
    }

    pub const fn optional(name: &'static str, typ: &'static str, description: &'static str, default: &'static str) -> Self {
        Self { name, typ, description, optional: true, default: Some(default) }
    }
}

/// What `help` and `list_functions` report about a function
#[derive(Debug, Clone, Serialize)]
pub struct FunctionMeta {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub args: &'static [ArgMeta],
    pub returns: &'static str,
    pub examples: &'static [&'static str],
    /// Library the function belongs to: `measure`, `flux`, `optics`,
    /// `photometry` or `names`
    pub category: &'static str,
    pub related: &'static [&'static str],
}

/// A registered astrokit function.
///
/// Calls never panic. Bad input and numerical failures come back as
/// `Value::Error`, and `ctx.warnings_as_errors` decides whether advisory
/// warnings are attached to the result or returned as errors.
pub trait FunctionPlugin: Send + Sync {
    fn meta(&self) -> FunctionMeta;
    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value;
}
