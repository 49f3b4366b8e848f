//! `combine_measurements` as a registry function

use astrokit_plugin::args::{extract_series, optional, required, to_int};
use astrokit_plugin::prelude::*;

use crate::combine::{combine, CombineError, Combined};
use crate::flag::{Flag, Input};

pub struct CombineMeasurements;

static COMBINE_ARGS: [ArgMeta; 3] = [
    ArgMeta::required("values", "List<Number> | Number",
        "Repeated measurements of one quantity (null for missing)"),
    ArgMeta::optional("errors", "List<Number> | Number",
        "1-sigma uncertainties; non-finite entries are treated as 0", "0"),
    ArgMeta::optional("flags", "List<Integer> | Integer",
        "-1 not measured, 0 detection, 1 upper limit, 2 lower limit", "0"),
];

static COMBINE_EXAMPLES: [&str; 4] = [
    "combine_measurements([10, 12], [1, 1], [0, 0]) → {value: 11, error: 1, flag: 0}",
    "combine_measurements([5, 3, 4], null, [1, 1, 1]) → {value: 3, error: 0, flag: 1}",
    "combine_measurements([5, 3, 4], null, [2, 2, 2]) → {value: 5, error: 0, flag: 2}",
    "combine_measurements([1, 2], [0, 0], [-1, -1]) → {value: 0, error: 0, flag: -1}",
];

static COMBINE_RELATED: [&str; 2] = ["jansky_to_mag", "synthphot"];

impl FunctionPlugin for CombineMeasurements {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "combine_measurements",
            description: "Combine detections, upper/lower limits and non-measurements of one quantity into a best estimate",
            usage: "combine_measurements(values, errors?, flags?)",
            args: &COMBINE_ARGS,
            returns: "Object {value: Number, error: Number, flag: Number, warning: Text | null}",
            examples: &COMBINE_EXAMPLES,
            category: "measure",
            related: &COMBINE_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        match self.run(args, ctx) {
            Ok(v) => v,
            Err(e) => Value::Error(e),
        }
    }
}

impl CombineMeasurements {
    fn run(&self, args: &[Value], ctx: &EvalContext) -> Result<Value, AstroError> {
        const NAME: &str = "combine_measurements";

        let values = float_input(required(args, 0, NAME, 1)?, "values")?;
        let errors = optional(args, 1).map(|v| float_input(v, "errors")).transpose()?;
        let flags = optional(args, 2).map(flag_input).transpose()?;

        let combined = combine(values, errors, flags).map_err(AstroError::from)?;

        if ctx.warnings_as_errors {
            if let Some(w) = &combined.warning {
                return Err(AstroError::advisory(w.clone())
                    .in_function(NAME)
                    .with_note(format!("value {} +/- {}", combined.value, combined.error)));
            }
        }
        Ok(combined.into())
    }
}

fn float_input(value: &Value, arg: &str) -> Result<Input<f64>, AstroError> {
    match value {
        Value::Number(n) => Ok(Input::Scalar(*n)),
        other => extract_series(other, "combine_measurements", arg).map(Input::Series),
    }
}

fn flag_input(value: &Value) -> Result<Input<i64>, AstroError> {
    match value {
        Value::Number(n) => Ok(Input::Scalar(flag_code(*n))),
        other => extract_series(other, "combine_measurements", "flags")
            .map(|codes| Input::Series(codes.into_iter().map(flag_code).collect())),
    }
}

/// Null and fractional flags become an out-of-domain code
fn flag_code(n: f64) -> i64 {
    to_int(n).unwrap_or(Flag::UNUSABLE_CODE)
}

impl From<Combined> for Value {
    fn from(c: Combined) -> Self {
        Value::object([
            ("value", Value::Number(c.value)),
            ("error", Value::Number(c.error)),
            ("flag", Value::from(c.flag.code())),
            ("warning", Value::from(c.warning)),
        ])
    }
}

impl From<CombineError> for AstroError {
    fn from(e: CombineError) -> Self {
        match e {
            CombineError::NoValidMeasurement { .. } => {
                AstroError::new(codes::NO_VALID_MEASUREMENT, e.to_string())
                    .with_suggestion("Provide at least one finite value with a flag in {-1, 0, 1, 2}")
            }
            CombineError::LengthMismatch { .. } => AstroError::length_mismatch(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn list(v: &[f64]) -> Value {
        Value::from(v.to_vec())
    }

    fn ctx() -> EvalContext {
        EvalContext::new(Arc::new(PluginRegistry::new().with_function(CombineMeasurements)))
    }

    #[test]
    fn test_combine_detections() {
        let r = CombineMeasurements.call(&[list(&[10.0, 12.0]), list(&[1.0, 1.0]), list(&[0.0, 0.0])], &ctx());
        assert_eq!(r.get("value").as_number(), Some(11.0));
        assert_eq!(r.get("error").as_number(), Some(1.0));
        assert_eq!(r.get("flag").as_number(), Some(0.0));
        assert!(r.get("warning").is_null());
    }

    #[test]
    fn test_null_errors_use_default() {
        let r = CombineMeasurements.call(&[list(&[5.0, 3.0, 4.0]), Value::Null, list(&[1.0, 1.0, 1.0])], &ctx());
        assert_eq!(r.get("value").as_number(), Some(3.0));
        assert_eq!(r.get("flag").as_number(), Some(1.0));
    }

    #[test]
    fn test_null_values_are_missing() {
        let values = Value::List(vec![Value::Null, Value::Number(4.0), Value::Number(6.0)]);
        let r = CombineMeasurements.call(&[values], &ctx());
        assert_eq!(r.get("value").as_number(), Some(5.0));
    }

    #[test]
    fn test_scalar_pass_through() {
        let r = CombineMeasurements.call(&[Value::Number(5.0), Value::Number(0.2), Value::Number(0.0)], &ctx());
        assert_eq!(r.get("value").as_number(), Some(5.0));
        assert_eq!(r.get("error").as_number(), Some(0.2));
    }

    #[test]
    fn test_no_valid_measurement_is_error() {
        let r = CombineMeasurements.call(&[list(&[f64::NAN]), list(&[0.0]), list(&[5.0])], &ctx());
        match r {
            Value::Error(e) => assert_eq!(e.code, codes::NO_VALID_MEASUREMENT),
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[test]
    fn test_null_or_fractional_flag_drops_entry() {
        let flags = Value::List(vec![Value::Number(0.0), Value::Null, Value::Number(0.0)]);
        let r = CombineMeasurements.call(&[list(&[10.0, 99.0, 12.0]), Value::Null, flags], &ctx());
        assert_eq!(r.get("value").as_number(), Some(11.0));
        assert_eq!(r.get("flag").as_number(), Some(0.0));

        let r = CombineMeasurements.call(&[list(&[10.0, 99.0, 12.0]), Value::Null, list(&[0.0, 0.5, 0.0])], &ctx());
        assert_eq!(r.get("value").as_number(), Some(11.0));
    }

    #[test]
    fn test_fractional_scalar_flag_has_no_valid_entry() {
        let r = CombineMeasurements.call(&[list(&[1.0, 2.0]), Value::Null, Value::Number(0.5)], &ctx());
        match r {
            Value::Error(e) => assert_eq!(e.code, codes::NO_VALID_MEASUREMENT),
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[test]
    fn test_warning_attached_by_default() {
        let r = CombineMeasurements.call(&[list(&[10.0, 12.0, 5.0]), list(&[1.0, 1.0, 0.0]), list(&[0.0, 0.0, 1.0])], &ctx());
        assert!(r.get("warning").as_text().unwrap().contains("upper limit"));
    }

    #[test]
    fn test_warnings_as_errors() {
        let strict = ctx().with_warnings_as_errors(true);
        let r = CombineMeasurements.call(&[list(&[10.0, 12.0, 5.0]), list(&[1.0, 1.0, 0.0]), list(&[0.0, 0.0, 1.0])], &strict);
        match r {
            Value::Error(e) => {
                assert_eq!(e.code, codes::ADVISORY);
                assert_eq!(e.severity, Severity::Warning);
            }
            other => panic!("expected advisory error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_values() {
        let r = CombineMeasurements.call(&[], &ctx());
        assert!(r.is_error());
    }
}
