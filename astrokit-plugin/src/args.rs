//! Argument extraction shared by the function libraries

use astrokit_core::{AstroError, Value};

/// Extract a Number argument
pub fn extract_number(value: &Value, func: &str, arg: &str) -> Result<f64, AstroError> {
    match value {
        Value::Number(n) => Ok(*n),
        Value::Error(e) => Err(e.clone()),
        other => Err(AstroError::arg_type(func, arg, "Number", other.type_name())),
    }
}

/// Extract a Text argument
pub fn extract_text<'a>(value: &'a Value, func: &str, arg: &str) -> Result<&'a str, AstroError> {
    match value {
        Value::Text(s) => Ok(s),
        Value::Error(e) => Err(e.clone()),
        other => Err(AstroError::arg_type(func, arg, "Text", other.type_name())),
    }
}

/// Required argument at `index`
pub fn required<'a>(args: &'a [Value], index: usize, func: &str, expected: usize) -> Result<&'a Value, AstroError> {
    args.get(index).ok_or_else(|| AstroError::arg_count(func, expected, args.len()))
}

/// Optional argument: missing and Null both read as absent
pub fn optional(args: &[Value], index: usize) -> Option<&Value> {
    args.get(index).filter(|v| !v.is_null())
}

pub fn optional_number(args: &[Value], index: usize, func: &str, arg: &str) -> Result<Option<f64>, AstroError> {
    optional(args, index).map(|v| extract_number(v, func, arg)).transpose()
}

pub fn optional_text<'a>(args: &'a [Value], index: usize, func: &str, arg: &str) -> Result<Option<&'a str>, AstroError> {
    optional(args, index).map(|v| extract_text(v, func, arg)).transpose()
}

pub fn optional_bool(args: &[Value], index: usize, func: &str, arg: &str) -> Result<Option<bool>, AstroError> {
    optional(args, index)
        .map(|v| match v {
            Value::Bool(b) => Ok(*b),
            Value::Error(e) => Err(e.clone()),
            other => Err(AstroError::arg_type(func, arg, "Bool", other.type_name())),
        })
        .transpose()
}

/// Extract a List of numbers. `Null` items become NaN so that catalog gaps
/// survive the trip through JSON.
pub fn extract_series(value: &Value, func: &str, arg: &str) -> Result<Vec<f64>, AstroError> {
    match value {
        Value::List(items) => items.iter()
            .map(|item| match item {
                Value::Number(n) => Ok(*n),
                Value::Null => Ok(f64::NAN),
                Value::Error(e) => Err(e.clone()),
                other => Err(AstroError::arg_type(func, arg, "List<Number>", other.type_name())
                    .with_note("list items must be numbers or null")),
            })
            .collect(),
        Value::Error(e) => Err(e.clone()),
        other => Err(AstroError::arg_type(func, arg, "List<Number>", other.type_name())),
    }
}

/// Integral value of a float, if it has one
pub fn to_int(n: f64) -> Option<i64> {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 9.0e15 {
        Some(n as i64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_number() {
        assert_eq!(extract_number(&Value::Number(4.0), "f", "x").unwrap(), 4.0);
        assert!(extract_number(&Value::Text("4".into()), "f", "x").is_err());
    }

    #[test]
    fn test_series_null_becomes_nan() {
        let list = Value::List(vec![Value::Number(1.0), Value::Null]);
        let s = extract_series(&list, "f", "values").unwrap();
        assert_eq!(s[0], 1.0);
        assert!(s[1].is_nan());
    }

    #[test]
    fn test_series_rejects_text() {
        let list = Value::List(vec![Value::Text("a".into())]);
        assert!(extract_series(&list, "f", "values").is_err());
    }

    #[test]
    fn test_to_int() {
        assert_eq!(to_int(-1.0), Some(-1));
        assert_eq!(to_int(2.0), Some(2));
        assert_eq!(to_int(0.5), None);
        assert_eq!(to_int(f64::NAN), None);
    }

    #[test]
    fn test_optional_null_is_absent() {
        let args = vec![Value::Number(1.0), Value::Null];
        assert_eq!(optional_number(&args, 1, "f", "x").unwrap(), None);
        assert_eq!(optional_number(&args, 5, "f", "x").unwrap(), None);
        assert_eq!(optional_number(&args, 0, "f", "x").unwrap(), Some(1.0));
    }

    #[test]
    fn test_required_reports_arg_count() {
        let err = required(&[], 0, "f", 2).unwrap_err();
        assert_eq!(err.code, astrokit_core::codes::ARG_COUNT);
    }
}
