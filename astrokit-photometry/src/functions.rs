//! Photometry functions for the registry

use astrokit_plugin::args::{extract_number, extract_series, optional_bool, optional_number, required};
use astrokit_plugin::prelude::*;

use crate::integrate::{self, IntegrateError};
use crate::synth::{self, PhotometryError, SynthPhotOptions};

impl From<IntegrateError> for AstroError {
    fn from(e: IntegrateError) -> Self {
        match e {
            IntegrateError::MismatchedLengths(..) => AstroError::length_mismatch(e.to_string()),
            _ => AstroError::domain_error(e.to_string()),
        }
    }
}

impl From<PhotometryError> for AstroError {
    fn from(e: PhotometryError) -> Self {
        match e {
            PhotometryError::Incomplete { .. } => AstroError::new(codes::INCOMPLETE_COVERAGE, e.to_string())
                .with_suggestion("Extend the spectrum or set ignore_incomplete to true"),
            PhotometryError::Hole { .. } => AstroError::new(codes::SPECTRUM_HOLE, e.to_string())
                .with_suggestion("Raise acceptable_hole or set ignore_incomplete to true"),
            PhotometryError::LengthMismatch { .. } => AstroError::length_mismatch(e.to_string()),
            PhotometryError::Integrate(inner) => inner.into(),
            PhotometryError::InsufficientData { .. } | PhotometryError::ZeroTransmission => {
                AstroError::domain_error(e.to_string())
            }
        }
    }
}

// ============ Integration ============

pub struct Simpson;

static SIMPSON_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("y", "List<Number>", "Sampled function values"),
    ArgMeta::required("x", "List<Number>", "Sorted sample points"),
];
static SIMPSON_EXAMPLES: [&str; 1] = ["simpson([0, 0.25, 1, 2.25, 4], [0, 0.5, 1, 1.5, 2]) → 2.6667"];
static SIMPSON_RELATED: [&str; 2] = ["interp", "effective_wavelength"];

impl FunctionPlugin for Simpson {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "simpson",
            description: "Integrate sampled data with Simpson's rule (irregular spacing allowed)",
            usage: "simpson(y, x)",
            args: &SIMPSON_ARGS,
            returns: "Number",
            examples: &SIMPSON_EXAMPLES,
            category: "photometry/integrate",
            related: &SIMPSON_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        let run = || -> Result<Value, AstroError> {
            const NAME: &str = "simpson";
            let y = extract_series(required(args, 0, NAME, 2)?, NAME, "y")?;
            let x = extract_series(required(args, 1, NAME, 2)?, NAME, "x")?;
            let r = integrate::simpson(&y, &x).map_err(|e| AstroError::from(e).in_function(NAME))?;
            Ok(Value::Number(r))
        };
        run().unwrap_or_else(Value::Error)
    }
}

pub struct Interp;

static INTERP_ARGS: [ArgMeta; 3] = [
    ArgMeta::required("x", "Number | List<Number>", "Point(s) to evaluate"),
    ArgMeta::required("xp", "List<Number>", "Increasing sample points"),
    ArgMeta::required("fp", "List<Number>", "Sample values"),
];
static INTERP_EXAMPLES: [&str; 2] = [
    "interp(2.5, [1, 2, 3], [3, 2, 0]) → 1",
    "interp([0, 1.5], [1, 2], [10, 20]) → [10, 15]",
];
static INTERP_RELATED: [&str; 1] = ["simpson"];

impl FunctionPlugin for Interp {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "interp",
            description: "Linear interpolation, clamped to the end values outside the samples",
            usage: "interp(x, xp, fp)",
            args: &INTERP_ARGS,
            returns: "Number | List<Number>",
            examples: &INTERP_EXAMPLES,
            category: "photometry/integrate",
            related: &INTERP_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        let run = || -> Result<Value, AstroError> {
            const NAME: &str = "interp";
            let x = required(args, 0, NAME, 3)?;
            let xp = extract_series(required(args, 1, NAME, 3)?, NAME, "xp")?;
            let fp = extract_series(required(args, 2, NAME, 3)?, NAME, "fp")?;
            let wrap = |e: IntegrateError| AstroError::from(e).in_function(NAME);
            match x {
                Value::Number(n) => Ok(Value::Number(integrate::interp(*n, &xp, &fp).map_err(wrap)?)),
                other => {
                    let xs = extract_series(other, NAME, "x")?;
                    Ok(Value::from(integrate::interp_all(&xs, &xp, &fp).map_err(wrap)?))
                }
            }
        };
        run().unwrap_or_else(Value::Error)
    }
}

// ============ Filters ============

pub struct EffectiveWavelength;

static EFFECTIVE_WAVELENGTH_ARGS: [ArgMeta; 3] = [
    ArgMeta::required("wavelengths", "List<Number>", "Filter curve wavelengths"),
    ArgMeta::required("transmission", "List<Number>", "Filter transmission"),
    ArgMeta::optional("alpha", "Number", "Power-law slope of the reference spectrum", "0"),
];
static EFFECTIVE_WAVELENGTH_EXAMPLES: [&str; 1] = [
    "effective_wavelength([10, 10.5, 11], [1, 1, 1], -1) → 10.5",
];
static EFFECTIVE_WAVELENGTH_RELATED: [&str; 1] = ["synthphot"];

impl FunctionPlugin for EffectiveWavelength {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "effective_wavelength",
            description: "Effective wavelength of a filter for a power-law reference spectrum",
            usage: "effective_wavelength(wavelengths, transmission, alpha?)",
            args: &EFFECTIVE_WAVELENGTH_ARGS,
            returns: "Number",
            examples: &EFFECTIVE_WAVELENGTH_EXAMPLES,
            category: "photometry",
            related: &EFFECTIVE_WAVELENGTH_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        let run = || -> Result<Value, AstroError> {
            const NAME: &str = "effective_wavelength";
            let fwlen = extract_series(required(args, 0, NAME, 2)?, NAME, "wavelengths")?;
            let ftrans = extract_series(required(args, 1, NAME, 2)?, NAME, "transmission")?;
            let alpha = optional_number(args, 2, NAME, "alpha")?.unwrap_or(0.0);
            let eff = synth::effective_wavelength(&fwlen, &ftrans, alpha)
                .map_err(|e| AstroError::from(e).in_function(NAME))?;
            Ok(Value::Number(eff))
        };
        run().unwrap_or_else(Value::Error)
    }
}

// ============ Synthetic photometry ============

static SYNTHPHOT_ARGS: [ArgMeta; 8] = [
    ArgMeta::required("wavelengths", "List<Number>", "Spectrum wavelengths in micron (0 marks invalid points)"),
    ArgMeta::required("flux_densities", "List<Number>", "Spectrum flux densities"),
    ArgMeta::required("filter_wavelengths", "List<Number>", "Filter curve wavelengths in micron"),
    ArgMeta::required("filter_transmission", "List<Number>", "Filter transmission"),
    ArgMeta::required("reference_wavelength", "Number", "Usually the effective wavelength of the filter"),
    ArgMeta::optional("ignore_incomplete", "Bool", "Allow a spectrum not covering the whole filter", "false"),
    ArgMeta::optional("acceptable_hole", "Number", "Largest allowed wavelength step inside the filter", "0.7"),
    ArgMeta::optional("alpha", "Number", "Power-law index of the reference spectrum", "-2"),
];
static SYNTHPHOT_RELATED: [&str; 3] = ["synthphot_freq", "effective_wavelength", "combine_measurements"];

struct SynthArgs {
    wavelen: Vec<f64>,
    fluxden: Vec<f64>,
    fwlen: Vec<f64>,
    ftrans: Vec<f64>,
    ref_wlen: f64,
    opts: SynthPhotOptions,
}

fn synth_args(args: &[Value], func: &str) -> Result<SynthArgs, AstroError> {
    let defaults = SynthPhotOptions::default();
    Ok(SynthArgs {
        wavelen: extract_series(required(args, 0, func, 5)?, func, "wavelengths")?,
        fluxden: extract_series(required(args, 1, func, 5)?, func, "flux_densities")?,
        fwlen: extract_series(required(args, 2, func, 5)?, func, "filter_wavelengths")?,
        ftrans: extract_series(required(args, 3, func, 5)?, func, "filter_transmission")?,
        ref_wlen: extract_number(required(args, 4, func, 5)?, func, "reference_wavelength")?,
        opts: SynthPhotOptions {
            ignore_incomplete: optional_bool(args, 5, func, "ignore_incomplete")?.unwrap_or(defaults.ignore_incomplete),
            acceptable_hole: optional_number(args, 6, func, "acceptable_hole")?.unwrap_or(defaults.acceptable_hole),
            alpha: optional_number(args, 7, func, "alpha")?.unwrap_or(defaults.alpha),
        },
    })
}

pub struct SynthPhot;

static SYNTHPHOT_EXAMPLES: [&str; 1] = [
    "synthphot(spec_wlen, spec_fnu, filt_wlen, filt_trans, 10.5) → flux density at 10.5 micron",
];

impl FunctionPlugin for SynthPhot {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "synthphot",
            description: "Synthetic photometry of a flux density spectrum through a filter curve",
            usage: "synthphot(wavelengths, flux_densities, filter_wavelengths, filter_transmission, reference_wavelength, ignore_incomplete?, acceptable_hole?, alpha?)",
            args: &SYNTHPHOT_ARGS,
            returns: "Number",
            examples: &SYNTHPHOT_EXAMPLES,
            category: "photometry",
            related: &SYNTHPHOT_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        let run = || -> Result<Value, AstroError> {
            const NAME: &str = "synthphot";
            let a = synth_args(args, NAME)?;
            let r = synth::synthphot(&a.wavelen, &a.fluxden, &a.fwlen, &a.ftrans, a.ref_wlen, &a.opts)
                .map_err(|e| AstroError::from(e).in_function(NAME))?;
            Ok(Value::Number(r))
        };
        run().unwrap_or_else(Value::Error)
    }
}

pub struct SynthPhotFreq;

static SYNTHPHOT_FREQ_EXAMPLES: [&str; 1] = [
    "synthphot_freq(spec_wlen, spec_fnu, filt_wlen, filt_trans, 10.5) → flux density at 10.5 micron",
];

impl FunctionPlugin for SynthPhotFreq {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "synthphot_freq",
            description: "Synthetic photometry integrated in frequency space",
            usage: "synthphot_freq(wavelengths, flux_densities, filter_wavelengths, filter_transmission, reference_wavelength, ignore_incomplete?, acceptable_hole?, alpha?)",
            args: &SYNTHPHOT_ARGS,
            returns: "Number",
            examples: &SYNTHPHOT_FREQ_EXAMPLES,
            category: "photometry",
            related: &SYNTHPHOT_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        let run = || -> Result<Value, AstroError> {
            const NAME: &str = "synthphot_freq";
            let a = synth_args(args, NAME)?;
            let r = synth::synthphot_freq(&a.wavelen, &a.fluxden, &a.fwlen, &a.ftrans, a.ref_wlen, &a.opts)
                .map_err(|e| AstroError::from(e).in_function(NAME))?;
            Ok(Value::Number(r))
        };
        run().unwrap_or_else(Value::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn ctx() -> EvalContext {
        EvalContext::new(Arc::new(crate::load_photometry_library(PluginRegistry::new())))
    }

    fn list(v: &[f64]) -> Value {
        Value::from(v.to_vec())
    }

    fn grid() -> Vec<f64> {
        (0..=20).map(|i| 8.0 + 0.25 * i as f64).collect()
    }

    #[test]
    fn test_simpson() {
        let r = Simpson.call(&[list(&[0.0, 0.25, 1.0, 2.25, 4.0]), list(&[0.0, 0.5, 1.0, 1.5, 2.0])], &ctx());
        assert!((r.as_number().unwrap() - 8.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_simpson_length_mismatch() {
        match Simpson.call(&[list(&[1.0, 2.0]), list(&[1.0])], &ctx()) {
            Value::Error(e) => assert_eq!(e.code, codes::LENGTH_MISMATCH),
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[test]
    fn test_interp_scalar_and_list() {
        let xp = list(&[1.0, 2.0]);
        let fp = list(&[10.0, 20.0]);
        let r = Interp.call(&[Value::Number(1.5), xp.clone(), fp.clone()], &ctx());
        assert_eq!(r.as_number(), Some(15.0));
        let r = Interp.call(&[list(&[0.0, 1.5]), xp, fp], &ctx());
        let items = r.as_list().unwrap();
        assert_eq!(items[0].as_number(), Some(10.0));
        assert_eq!(items[1].as_number(), Some(15.0));
    }

    #[test]
    fn test_effective_wavelength() {
        let r = EffectiveWavelength.call(&[list(&[10.0, 10.5, 11.0]), list(&[1.0, 1.0, 1.0]), Value::Number(-1.0)], &ctx());
        assert!((r.as_number().unwrap() - 10.5).abs() < 1e-12);
    }

    #[test]
    fn test_synthphot_flat_spectrum() {
        let w = grid();
        let f = vec![2.0; w.len()];
        let args = [
            list(&w), list(&f), list(&[10.0, 10.5, 11.0]), list(&[1.0, 1.0, 1.0]), Value::Number(10.5),
            Value::Null, Value::Null, Value::Number(0.0),
        ];
        let r = SynthPhot.call(&args, &ctx());
        assert!((r.as_number().unwrap() - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_synthphot_incomplete_code() {
        let w = grid();
        let f = vec![1.0; w.len()];
        let args = [list(&w), list(&f), list(&[7.0, 10.0, 11.0]), list(&[1.0, 1.0, 1.0]), Value::Number(10.0)];
        match SynthPhot.call(&args, &ctx()) {
            Value::Error(e) => assert_eq!(e.code, codes::INCOMPLETE_COVERAGE),
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[test]
    fn test_synthphot_freq_hole_code() {
        let w = [8.0, 9.0, 10.0, 12.0, 13.0];
        let f = vec![1.0; w.len()];
        let args = [list(&w), list(&f), list(&[10.0, 11.0, 12.0]), list(&[1.0, 1.0, 1.0]), Value::Number(11.0)];
        match SynthPhotFreq.call(&args, &ctx()) {
            Value::Error(e) => {
                assert_eq!(e.code, codes::SPECTRUM_HOLE);
                assert_eq!(e.context.and_then(|c| c.function).as_deref(), Some("synthphot_freq"));
            }
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[test]
    fn test_synthphot_needs_reference() {
        let r = SynthPhot.call(&[list(&[1.0, 2.0]), list(&[1.0, 1.0]), list(&[1.0, 2.0]), list(&[1.0, 1.0])], &ctx());
        match r {
            Value::Error(e) => assert_eq!(e.code, codes::ARG_COUNT),
            other => panic!("expected error, got {:?}", other),
        }
    }
}
