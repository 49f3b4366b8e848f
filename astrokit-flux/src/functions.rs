//! Flux, luminosity and optics functions for the registry

use astrokit_plugin::args::{extract_number, extract_text, optional_bool, optional_number, optional_text, required};
use astrokit_plugin::prelude::*;

use crate::flux::{self, Filter, FluxUnit, Spectral, ZeroPoint};
use crate::luminosity;
use crate::optics;
use crate::wave::{self, Scale, Scaled, WavelengthUnit};
use crate::FluxError;

impl From<FluxError> for AstroError {
    fn from(e: FluxError) -> Self {
        match &e {
            FluxError::UnknownUnit(unit) => {
                AstroError::unknown_unit(unit, "mJy, Jy, W/m^2, erg/s/cm^2")
            }
            FluxError::UnknownWavelengthUnit(unit) => {
                AstroError::unknown_unit(unit, "micron, nm, angstr, cm, m")
            }
            FluxError::UnknownFilter(_) => AstroError::new(codes::NOT_FOUND, e.to_string())
                .with_suggestion("Use zero_point with a known filter, or pass the zero point in Jy"),
            FluxError::UnsupportedUnit { .. } => AstroError::domain_error(e.to_string()),
            FluxError::MissingSpectral { .. } => AstroError::domain_error(e.to_string())
                .with_suggestion("Pass a wavelength or a frequency"),
            FluxError::Domain(msg) => AstroError::domain_error(msg.clone()),
        }
    }
}

fn flux_unit(args: &[Value], index: usize, func: &str, arg: &str, default: FluxUnit) -> Result<FluxUnit, AstroError> {
    match optional_text(args, index, func, arg)? {
        Some(s) => s.parse::<FluxUnit>().map_err(|e| AstroError::from(e).in_function(func).for_argument(arg)),
        None => Ok(default),
    }
}

fn zero_point(value: &Value, func: &str) -> Result<ZeroPoint, AstroError> {
    match value {
        Value::Number(zp) => Ok(ZeroPoint::Jansky(*zp)),
        Value::Text(name) => name.parse::<Filter>()
            .map(ZeroPoint::Filter)
            .map_err(|e| AstroError::from(e).in_function(func)),
        Value::Error(e) => Err(e.clone()),
        other => Err(AstroError::arg_type(func, "zero_point", "Number | Text", other.type_name())),
    }
}

// ============ Frequency / wavelength ============

pub struct MicronToHertz;

static MICRON_TO_HERTZ_ARGS: [ArgMeta; 1] = [
    ArgMeta::required("wavelength", "Number", "Wavelength in micron"),
];
static MICRON_TO_HERTZ_EXAMPLES: [&str; 1] = ["micron_to_hertz(10) → 2.99792458e13"];
static MICRON_TO_HERTZ_RELATED: [&str; 1] = ["hertz_to_micron"];

impl FunctionPlugin for MicronToHertz {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "micron_to_hertz",
            description: "Frequency in Hz of a wavelength in micron",
            usage: "micron_to_hertz(wavelength)",
            args: &MICRON_TO_HERTZ_ARGS,
            returns: "Number",
            examples: &MICRON_TO_HERTZ_EXAMPLES,
            category: "flux",
            related: &MICRON_TO_HERTZ_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        let run = || -> Result<Value, AstroError> {
            let micron = extract_number(required(args, 0, "micron_to_hertz", 1)?, "micron_to_hertz", "wavelength")?;
            Ok(Value::Number(wave::micron_to_hertz(micron)))
        };
        run().unwrap_or_else(Value::Error)
    }
}

pub struct HertzToMicron;

static HERTZ_TO_MICRON_ARGS: [ArgMeta; 1] = [
    ArgMeta::required("frequency", "Number", "Frequency in Hz"),
];
static HERTZ_TO_MICRON_EXAMPLES: [&str; 1] = ["hertz_to_micron(2.99792458e13) → 10"];
static HERTZ_TO_MICRON_RELATED: [&str; 1] = ["micron_to_hertz"];

impl FunctionPlugin for HertzToMicron {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "hertz_to_micron",
            description: "Wavelength in micron of a frequency in Hz",
            usage: "hertz_to_micron(frequency)",
            args: &HERTZ_TO_MICRON_ARGS,
            returns: "Number",
            examples: &HERTZ_TO_MICRON_EXAMPLES,
            category: "flux",
            related: &HERTZ_TO_MICRON_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        let run = || -> Result<Value, AstroError> {
            let hz = extract_number(required(args, 0, "hertz_to_micron", 1)?, "hertz_to_micron", "frequency")?;
            Ok(Value::Number(wave::hertz_to_micron(hz)))
        };
        run().unwrap_or_else(Value::Error)
    }
}

// ============ Jansky / erg ============

pub struct JanskyToErg;

static JANSKY_TO_ERG_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("flux_density", "Number", "Flux density in Jy"),
    ArgMeta::required("wavelength", "Number", "Wavelength in micron"),
];
static JANSKY_TO_ERG_EXAMPLES: [&str; 1] = ["jansky_to_erg(1, 10) → 2.99792458e-10"];
static JANSKY_TO_ERG_RELATED: [&str; 2] = ["erg_to_jansky", "convert_flux"];

impl FunctionPlugin for JanskyToErg {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "jansky_to_erg",
            description: "Flux nu F_nu in erg/s/cm^2 of a flux density in Jy",
            usage: "jansky_to_erg(flux_density, wavelength)",
            args: &JANSKY_TO_ERG_ARGS,
            returns: "Number",
            examples: &JANSKY_TO_ERG_EXAMPLES,
            category: "flux",
            related: &JANSKY_TO_ERG_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        let run = || -> Result<Value, AstroError> {
            const NAME: &str = "jansky_to_erg";
            let fnu = extract_number(required(args, 0, NAME, 2)?, NAME, "flux_density")?;
            let wlen = extract_number(required(args, 1, NAME, 2)?, NAME, "wavelength")?;
            Ok(Value::Number(flux::jansky_to_erg(fnu, wlen)))
        };
        run().unwrap_or_else(Value::Error)
    }
}

pub struct ErgToJansky;

static ERG_TO_JANSKY_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("flux", "Number", "Flux nu F_nu in erg/s/cm^2"),
    ArgMeta::required("wavelength", "Number", "Wavelength in micron"),
];
static ERG_TO_JANSKY_EXAMPLES: [&str; 1] = ["erg_to_jansky(2.99792458e-10, 10) → 1"];
static ERG_TO_JANSKY_RELATED: [&str; 2] = ["jansky_to_erg", "convert_flux"];

impl FunctionPlugin for ErgToJansky {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "erg_to_jansky",
            description: "Flux density in Jy of a flux nu F_nu in erg/s/cm^2",
            usage: "erg_to_jansky(flux, wavelength)",
            args: &ERG_TO_JANSKY_ARGS,
            returns: "Number",
            examples: &ERG_TO_JANSKY_EXAMPLES,
            category: "flux",
            related: &ERG_TO_JANSKY_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        let run = || -> Result<Value, AstroError> {
            const NAME: &str = "erg_to_jansky";
            let nufnu = extract_number(required(args, 0, NAME, 2)?, NAME, "flux")?;
            let wlen = extract_number(required(args, 1, NAME, 2)?, NAME, "wavelength")?;
            Ok(Value::Number(flux::erg_to_jansky(nufnu, wlen)))
        };
        run().unwrap_or_else(Value::Error)
    }
}

// ============ Magnitudes ============

pub struct ZeroPointFn;

static ZERO_POINT_ARGS: [ArgMeta; 1] = [
    ArgMeta::required("filter", "Text", "J, H, K, Ks, W1-W4, L, M, M_NB, Lp, Mp, N, Np or Q"),
];
static ZERO_POINT_EXAMPLES: [&str; 2] = ["zero_point(\"K\") → 666.8", "zero_point(\"W3\") → 31.674"];
static ZERO_POINT_RELATED: [&str; 2] = ["mag_to_jansky", "jansky_to_mag"];

impl FunctionPlugin for ZeroPointFn {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "zero_point",
            description: "Approximate Vega zero point in Jy of a filter",
            usage: "zero_point(filter)",
            args: &ZERO_POINT_ARGS,
            returns: "Number",
            examples: &ZERO_POINT_EXAMPLES,
            category: "flux",
            related: &ZERO_POINT_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        let run = || -> Result<Value, AstroError> {
            let name = extract_text(required(args, 0, "zero_point", 1)?, "zero_point", "filter")?;
            let filter = name.parse::<Filter>().map_err(|e| AstroError::from(e).in_function("zero_point"))?;
            Ok(Value::Number(filter.zero_point_jy()))
        };
        run().unwrap_or_else(Value::Error)
    }
}

pub struct MagToJansky;

static MAG_TO_JANSKY_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("mag", "Number", "Magnitude"),
    ArgMeta::required("zero_point", "Number | Text", "Zero point in Jy or a filter name"),
];
static MAG_TO_JANSKY_EXAMPLES: [&str; 2] = [
    "mag_to_jansky(0, \"W1\") → 309.54",
    "mag_to_jansky(2.5, 100) → 10",
];
static MAG_TO_JANSKY_RELATED: [&str; 2] = ["jansky_to_mag", "zero_point"];

impl FunctionPlugin for MagToJansky {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "mag_to_jansky",
            description: "Flux density in Jy of a magnitude",
            usage: "mag_to_jansky(mag, zero_point)",
            args: &MAG_TO_JANSKY_ARGS,
            returns: "Number",
            examples: &MAG_TO_JANSKY_EXAMPLES,
            category: "flux",
            related: &MAG_TO_JANSKY_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        let run = || -> Result<Value, AstroError> {
            const NAME: &str = "mag_to_jansky";
            let mag = extract_number(required(args, 0, NAME, 2)?, NAME, "mag")?;
            let zp = zero_point(required(args, 1, NAME, 2)?, NAME)?;
            Ok(Value::Number(flux::mag_to_jansky(mag, zp)))
        };
        run().unwrap_or_else(Value::Error)
    }
}

pub struct JanskyToMag;

static JANSKY_TO_MAG_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("flux_density", "Number", "Flux density in Jy"),
    ArgMeta::required("zero_point", "Number | Text", "Zero point in Jy or a filter name"),
];
static JANSKY_TO_MAG_EXAMPLES: [&str; 1] = ["jansky_to_mag(10, 100) → 2.5"];
static JANSKY_TO_MAG_RELATED: [&str; 2] = ["mag_to_jansky", "zero_point"];

impl FunctionPlugin for JanskyToMag {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "jansky_to_mag",
            description: "Magnitude of a flux density in Jy",
            usage: "jansky_to_mag(flux_density, zero_point)",
            args: &JANSKY_TO_MAG_ARGS,
            returns: "Number",
            examples: &JANSKY_TO_MAG_EXAMPLES,
            category: "flux",
            related: &JANSKY_TO_MAG_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        let run = || -> Result<Value, AstroError> {
            const NAME: &str = "jansky_to_mag";
            let jy = extract_number(required(args, 0, NAME, 2)?, NAME, "flux_density")?;
            let zp = zero_point(required(args, 1, NAME, 2)?, NAME)?;
            Ok(Value::Number(flux::jansky_to_mag(jy, zp).map_err(|e| AstroError::from(e).in_function(NAME))?))
        };
        run().unwrap_or_else(Value::Error)
    }
}

// ============ Unit conversion ============

pub struct ConvertFlux;

static CONVERT_FLUX_ARGS: [ArgMeta; 9] = [
    ArgMeta::required("flux", "Number", "Flux or flux density"),
    ArgMeta::required("from", "Text", "mJy, Jy, W/m^2 or erg/s/cm^2"),
    ArgMeta::required("to", "Text", "mJy, Jy, W/m^2 or erg/s/cm^2"),
    ArgMeta::optional("wavelength", "Number", "Needed when converting between densities and fluxes", "null"),
    ArgMeta::optional("frequency", "Number", "Frequency in Hz, takes precedence over wavelength", "null"),
    ArgMeta::optional("wavelength_unit", "Text", "micron, nm, angstr, cm or m", "micron"),
    ArgMeta::optional("log_input", "Bool", "flux is given as log10", "false"),
    ArgMeta::optional("log_output", "Bool", "Return log10 of the result", "false"),
    ArgMeta::optional("log_spectral", "Bool", "wavelength or frequency is given as log10", "false"),
];
static CONVERT_FLUX_EXAMPLES: [&str; 3] = [
    "convert_flux(2, \"Jy\", \"mJy\") → 2000",
    "convert_flux(1, \"Jy\", \"erg/s/cm^2\", 10) → 2.99792458e-10",
    "convert_flux(250, \"mJy\", \"W/m^2\", null, 13, null, false, false, true) → 2.5e-14",
];
static CONVERT_FLUX_RELATED: [&str; 2] = ["jansky_to_erg", "erg_to_jansky"];

impl FunctionPlugin for ConvertFlux {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "convert_flux",
            description: "Convert a flux or flux density between mJy, Jy, W/m^2 and erg/s/cm^2",
            usage: "convert_flux(flux, from, to, wavelength?, frequency?, wavelength_unit?, log_input?, log_output?, log_spectral?)",
            args: &CONVERT_FLUX_ARGS,
            returns: "Number",
            examples: &CONVERT_FLUX_EXAMPLES,
            category: "flux",
            related: &CONVERT_FLUX_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        self.run(args).unwrap_or_else(Value::Error)
    }
}

impl ConvertFlux {
    fn run(&self, args: &[Value]) -> Result<Value, AstroError> {
        const NAME: &str = "convert_flux";

        let value = extract_number(required(args, 0, NAME, 3)?, NAME, "flux")?;
        let from = extract_text(required(args, 1, NAME, 3)?, NAME, "from")?;
        let to = extract_text(required(args, 2, NAME, 3)?, NAME, "to")?;
        let from = from.parse::<FluxUnit>().map_err(|e| AstroError::from(e).in_function(NAME).for_argument("from"))?;
        let to = to.parse::<FluxUnit>().map_err(|e| AstroError::from(e).in_function(NAME).for_argument("to"))?;

        let log_input = optional_bool(args, 6, NAME, "log_input")?.unwrap_or(false);
        let log_output = optional_bool(args, 7, NAME, "log_output")?.unwrap_or(false);
        let spectral_scale = Scale::from_log_flag(optional_bool(args, 8, NAME, "log_spectral")?.unwrap_or(false));

        let spectral = match (optional_number(args, 3, NAME, "wavelength")?, optional_number(args, 4, NAME, "frequency")?) {
            (_, Some(freq)) => Some(Spectral::Frequency(Scaled::new(freq, spectral_scale))),
            (Some(wlen), None) => {
                let unit = match optional_text(args, 5, NAME, "wavelength_unit")? {
                    Some(u) => u.parse::<WavelengthUnit>()
                        .map_err(|e| AstroError::from(e).in_function(NAME).for_argument("wavelength_unit"))?,
                    None => WavelengthUnit::Micron,
                };
                Some(Spectral::Wavelength(Scaled::new(wlen, spectral_scale), unit))
            }
            (None, None) => None,
        };

        let flux = Scaled::new(value, Scale::from_log_flag(log_input));
        let out = flux::convert_flux(flux, from, to, spectral, Scale::from_log_flag(log_output))
            .map_err(|e| AstroError::from(e).in_function(NAME))?;
        Ok(Value::Number(out))
    }
}

// ============ Luminosity ============

pub struct FluxToLum;

static FLUX_TO_LUM_ARGS: [ArgMeta; 4] = [
    ArgMeta::required("flux", "Number", "Flux"),
    ArgMeta::required("distance", "Number", "Distance in Mpc"),
    ArgMeta::optional("unit", "Text", "erg/s/cm^2 or W/m^2", "erg/s/cm^2"),
    ArgMeta::optional("log_output", "Bool", "Return log10 of the luminosity", "true"),
];
static FLUX_TO_LUM_EXAMPLES: [&str; 1] = ["flux_to_lum(1e-12, 10) → 40.08"];
static FLUX_TO_LUM_RELATED: [&str; 2] = ["lum_to_flux", "fnu_to_lum"];

impl FunctionPlugin for FluxToLum {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "flux_to_lum",
            description: "Luminosity in erg/s of a source with given flux at a distance in Mpc",
            usage: "flux_to_lum(flux, distance, unit?, log_output?)",
            args: &FLUX_TO_LUM_ARGS,
            returns: "Number",
            examples: &FLUX_TO_LUM_EXAMPLES,
            category: "flux",
            related: &FLUX_TO_LUM_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        let run = || -> Result<Value, AstroError> {
            const NAME: &str = "flux_to_lum";
            let flux = extract_number(required(args, 0, NAME, 2)?, NAME, "flux")?;
            let dist = extract_number(required(args, 1, NAME, 2)?, NAME, "distance")?;
            let unit = flux_unit(args, 2, NAME, "unit", FluxUnit::ErgPerSecondPerSquareCentimetre)?;
            let out = Scale::from_log_flag(optional_bool(args, 3, NAME, "log_output")?.unwrap_or(true));
            let lum = luminosity::flux_to_lum(Scaled::Linear(flux), Scaled::Linear(dist), unit, out)
                .map_err(|e| AstroError::from(e).in_function(NAME))?;
            Ok(Value::Number(lum))
        };
        run().unwrap_or_else(Value::Error)
    }
}

pub struct LumToFlux;

static LUM_TO_FLUX_ARGS: [ArgMeta; 4] = [
    ArgMeta::required("luminosity", "Number", "Luminosity in erg/s"),
    ArgMeta::required("distance", "Number", "Distance in Mpc"),
    ArgMeta::optional("unit", "Text", "erg/s/cm^2 or W/m^2", "erg/s/cm^2"),
    ArgMeta::optional("log_input", "Bool", "luminosity is given as log10", "true"),
];
static LUM_TO_FLUX_EXAMPLES: [&str; 1] = ["lum_to_flux(40.08, 10) → 1e-12"];
static LUM_TO_FLUX_RELATED: [&str; 2] = ["flux_to_lum", "lum_to_fnu"];

impl FunctionPlugin for LumToFlux {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "lum_to_flux",
            description: "Flux received from a source with given luminosity at a distance in Mpc",
            usage: "lum_to_flux(luminosity, distance, unit?, log_input?)",
            args: &LUM_TO_FLUX_ARGS,
            returns: "Number",
            examples: &LUM_TO_FLUX_EXAMPLES,
            category: "flux",
            related: &LUM_TO_FLUX_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        let run = || -> Result<Value, AstroError> {
            const NAME: &str = "lum_to_flux";
            let lum = extract_number(required(args, 0, NAME, 2)?, NAME, "luminosity")?;
            let dist = extract_number(required(args, 1, NAME, 2)?, NAME, "distance")?;
            let unit = flux_unit(args, 2, NAME, "unit", FluxUnit::ErgPerSecondPerSquareCentimetre)?;
            let scale = Scale::from_log_flag(optional_bool(args, 3, NAME, "log_input")?.unwrap_or(true));
            let flux = luminosity::lum_to_flux(Scaled::new(lum, scale), Scaled::Linear(dist), unit, Scale::Linear)
                .map_err(|e| AstroError::from(e).in_function(NAME))?;
            Ok(Value::Number(flux))
        };
        run().unwrap_or_else(Value::Error)
    }
}

pub struct FnuToLum;

static FNU_TO_LUM_ARGS: [ArgMeta; 5] = [
    ArgMeta::required("flux_density", "Number", "Flux density"),
    ArgMeta::required("distance", "Number", "Distance in Mpc"),
    ArgMeta::required("wavelength", "Number", "Wavelength in micron"),
    ArgMeta::optional("unit", "Text", "Jy or mJy", "Jy"),
    ArgMeta::optional("log_output", "Bool", "Return log10 of the luminosity", "true"),
];
static FNU_TO_LUM_EXAMPLES: [&str; 1] = ["fnu_to_lum(0.1, 20, 12) → 42.08"];
static FNU_TO_LUM_RELATED: [&str; 2] = ["lum_to_fnu", "flux_to_lum"];

impl FunctionPlugin for FnuToLum {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "fnu_to_lum",
            description: "Monochromatic luminosity nu L_nu in erg/s of a source with given flux density",
            usage: "fnu_to_lum(flux_density, distance, wavelength, unit?, log_output?)",
            args: &FNU_TO_LUM_ARGS,
            returns: "Number",
            examples: &FNU_TO_LUM_EXAMPLES,
            category: "flux",
            related: &FNU_TO_LUM_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        let run = || -> Result<Value, AstroError> {
            const NAME: &str = "fnu_to_lum";
            let fnu = extract_number(required(args, 0, NAME, 3)?, NAME, "flux_density")?;
            let dist = extract_number(required(args, 1, NAME, 3)?, NAME, "distance")?;
            let wlen = extract_number(required(args, 2, NAME, 3)?, NAME, "wavelength")?;
            let unit = flux_unit(args, 3, NAME, "unit", FluxUnit::Jansky)?;
            let out = Scale::from_log_flag(optional_bool(args, 4, NAME, "log_output")?.unwrap_or(true));
            let lum = luminosity::fnu_to_lum(Scaled::Linear(fnu), Scaled::Linear(dist), Scaled::Linear(wlen), unit, out)
                .map_err(|e| AstroError::from(e).in_function(NAME))?;
            Ok(Value::Number(lum))
        };
        run().unwrap_or_else(Value::Error)
    }
}

pub struct LumToFnu;

static LUM_TO_FNU_ARGS: [ArgMeta; 5] = [
    ArgMeta::required("luminosity", "Number", "Monochromatic luminosity nu L_nu in erg/s"),
    ArgMeta::required("distance", "Number", "Distance in Mpc"),
    ArgMeta::required("wavelength", "Number", "Wavelength in micron"),
    ArgMeta::optional("unit", "Text", "Jy or mJy", "Jy"),
    ArgMeta::optional("log_input", "Bool", "luminosity is given as log10", "true"),
];
static LUM_TO_FNU_EXAMPLES: [&str; 1] = ["lum_to_fnu(42.08, 20, 12) → 0.1"];
static LUM_TO_FNU_RELATED: [&str; 2] = ["fnu_to_lum", "lum_to_flux"];

impl FunctionPlugin for LumToFnu {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "lum_to_fnu",
            description: "Flux density of a source with given monochromatic luminosity",
            usage: "lum_to_fnu(luminosity, distance, wavelength, unit?, log_input?)",
            args: &LUM_TO_FNU_ARGS,
            returns: "Number",
            examples: &LUM_TO_FNU_EXAMPLES,
            category: "flux",
            related: &LUM_TO_FNU_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        let run = || -> Result<Value, AstroError> {
            const NAME: &str = "lum_to_fnu";
            let lum = extract_number(required(args, 0, NAME, 3)?, NAME, "luminosity")?;
            let dist = extract_number(required(args, 1, NAME, 3)?, NAME, "distance")?;
            let wlen = extract_number(required(args, 2, NAME, 3)?, NAME, "wavelength")?;
            let unit = flux_unit(args, 3, NAME, "unit", FluxUnit::Jansky)?;
            let scale = Scale::from_log_flag(optional_bool(args, 4, NAME, "log_input")?.unwrap_or(true));
            let fnu = luminosity::lum_to_fnu(Scaled::new(lum, scale), Scaled::Linear(dist), Scaled::Linear(wlen), unit, Scale::Linear)
                .map_err(|e| AstroError::from(e).in_function(NAME))?;
            Ok(Value::Number(fnu))
        };
        run().unwrap_or_else(Value::Error)
    }
}

// ============ Optics ============

pub struct DiffractionLimit;

static DIFFRACTION_LIMIT_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("diameter", "Number", "Telescope diameter in m"),
    ArgMeta::required("wavelength", "Number", "Wavelength in micron"),
];
static DIFFRACTION_LIMIT_EXAMPLES: [&str; 1] = ["diffraction_limit(8.2, 10) → 0.2586"];
static DIFFRACTION_LIMIT_RELATED: [&str; 1] = ["micron_to_hertz"];

impl FunctionPlugin for DiffractionLimit {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "diffraction_limit",
            description: "Diffraction limited resolution in arcsec (1.028 lambda/D)",
            usage: "diffraction_limit(diameter, wavelength)",
            args: &DIFFRACTION_LIMIT_ARGS,
            returns: "Number",
            examples: &DIFFRACTION_LIMIT_EXAMPLES,
            category: "optics",
            related: &DIFFRACTION_LIMIT_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        let run = || -> Result<Value, AstroError> {
            const NAME: &str = "diffraction_limit";
            let diam = extract_number(required(args, 0, NAME, 2)?, NAME, "diameter")?;
            let wlen = extract_number(required(args, 1, NAME, 2)?, NAME, "wavelength")?;
            let lim = optics::diffraction_limit(diam, wlen).map_err(|e| AstroError::from(e).in_function(NAME))?;
            Ok(Value::Number(lim))
        };
        run().unwrap_or_else(Value::Error)
    }
}
