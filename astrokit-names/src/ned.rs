use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NameError {
    #[error("'{0}' has no catalogue prefix; the 2MASS ID is needed to build its name")]
    MissingTwoMassId(String),

    #[error("invalid name pattern: {0}")]
    Pattern(String),
}

/// (catalogue prefix, NED prefix, only for this origin)
static PREFIXES: [(&str, &str, Option<&str>); 15] = [
    ("2dFGRS TGN", "2dFGRS N", None),
    ("2dFGRS TGS", "2dFGRS S", None),
    ("6dFGS gJ", "6dF J", None),
    ("ESDO ", "ESDO F", None),
    ("ESDO FF", "ESDO F", None),
    ("FRL ", "FAIRALL ", None),
    ("IRAS ", "IRAS  ", None),
    ("IRAS   ", "IRAS  ", None),
    ("Mrk ", "MRK ", None),
    ("MCG+", "MCG +", None),
    ("MCG-", "MCG -", None),
    ("Tol ", "TOLOLO ", None),
    ("NGC  ", "NGC ", Some("CDS")),
    ("2MASXJ", "2MASX J", None),
    ("LEDA", "LEDA ", Some("B70")),
];

/// Catalogues whose numbers NED pads with zeros instead of spaces
static ZERO_PADDED: [&str; 8] = ["2MFGC ", "FAIRALL ", "IC ", "LEDA ", "MGC ", "MRK ", "NGC ", "UGC "];

fn letters() -> Result<&'static Regex, NameError> {
    static LETTERS: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    LETTERS
        .get_or_init(|| Regex::new("[a-zA-Z]+"))
        .as_ref()
        .map_err(|e| NameError::Pattern(e.to_string()))
}

fn twomass_name(name: &str, twomass_id: Option<&str>) -> Result<String, NameError> {
    twomass_id
        .map(|id| format!("2MASX J{}", id))
        .ok_or_else(|| NameError::MissingTwoMassId(name.to_string()))
}

/// Convert a catalogue name to NED nomenclature.
///
/// `origin` names the catalogue the name came from (`CDS`, `B70`, `2MRS`);
/// some rewrites only apply to one origin. Names without any letters,
/// and some 2MRS names, are replaced by the 2MASS name built from
/// `twomass_id`.
///
/// ```
/// use astrokit_names::to_ned_name;
///
/// assert_eq!(to_ned_name("Mrk  231", None, None).unwrap(), "MRK 0231");
/// assert_eq!(to_ned_name("ESO 323-77", None, None).unwrap(), "ESO 323- G 077");
/// ```
pub fn to_ned_name(name: &str, origin: Option<&str>, twomass_id: Option<&str>) -> Result<String, NameError> {
    let original_len = name.chars().count();
    let mut name = name.to_string();

    if let Some(&(from, to, only)) = PREFIXES.iter().find(|rule| name.starts_with(rule.0)) {
        let allowed = match (only, origin) {
            (Some(required), Some(given)) => required == given,
            _ => true,
        };
        if allowed {
            name = name.replace(from, to);
        }
    }

    if name.starts_with("ESO") && original_len < 14 {
        name = eso_name(&name);
    }

    if !name.is_empty() && !letters()?.is_match(&name) {
        name = twomass_name(&name, twomass_id)?;
    }

    if origin == Some("2MRS") {
        name = name.replace('_', " ");
        if name.starts_with('A') && !name.contains('M') {
            name = twomass_name(&name, twomass_id)?;
        }
        if name.starts_with('g') {
            name = twomass_name(&name, twomass_id)?;
        }
    }

    if let Some(prefix) = ZERO_PADDED.iter().find(|p| name.starts_with(*p)) {
        for width in (1..=5).rev() {
            let spaced = format!("{}{}", prefix, " ".repeat(width));
            let padded = format!("{}{}", prefix, "0".repeat(width));
            name = name.replace(&spaced, &padded);
        }
    }

    // LEDA numbers carry leading zeros only up to 6 digits
    if name.starts_with("LEDA 0") && name.chars().count() == 12 {
        name = name.replace("LEDA 0", "LEDA ");
    }

    if name.starts_with("MGC") && name.chars().count() == 9 {
        name = name.replace("MGC ", "MGC 00");
    }

    Ok(name)
}

/// ESO catalogue names: zero-padded field, `- G ` separator and a
/// three-digit object number
fn eso_name(name: &str) -> String {
    let mut name = name
        .replace("ESO   ", "ESO 00")
        .replace("ESO  ", "ESO 0")
        .replace('-', "- G ")
        .replace("G G", "G ")
        .replace(" G IG", "IG ")
        .replace(" G ?", " G?");

    match name.chars().count() {
        12 => name = name.replace("G ", "G 00"),
        13 => name = name.replace("G ", "G 0").replace("G?", "G?0"),
        _ => {}
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ned(name: &str) -> String {
        to_ned_name(name, None, None).unwrap()
    }

    #[test]
    fn test_prefix_rewrites() {
        assert_eq!(ned("Tol 1238-364"), "TOLOLO 1238-364");
        assert_eq!(ned("6dFGS gJ012345"), "6dF J012345");
        assert_eq!(ned("2dFGRS TGN123Z456"), "2dFGRS N123Z456");
        assert_eq!(ned("ESDO 123"), "ESDO F123");
        assert_eq!(ned("MCG+01-02-003"), "MCG +01-02-003");
        assert_eq!(ned("IRAS 12345+6789"), "IRAS  12345+6789");
        assert_eq!(ned("2MASXJ01234567+0123456"), "2MASX J01234567+0123456");
    }

    #[test]
    fn test_zero_padding() {
        assert_eq!(ned("Mrk  231"), "MRK 0231");
        assert_eq!(ned("MRK    1"), "MRK 0001");
        assert_eq!(ned("FRL   51"), "FAIRALL 0051");
        assert_eq!(ned("IC   10"), "IC 0010");
        assert_eq!(ned("UGC    12"), "UGC 00012");
        assert_eq!(ned("2MFGC  123"), "2MFGC 0123");
    }

    #[test]
    fn test_origin_restricted_prefix() {
        assert_eq!(to_ned_name("NGC   253", None, None).unwrap(), "NGC 0253");
        assert_eq!(to_ned_name("NGC   253", Some("CDS"), None).unwrap(), "NGC 0253");
        // rule skipped for other origins, padding still applies
        assert_eq!(to_ned_name("NGC   253", Some("B70"), None).unwrap(), "NGC 00253");
        assert_eq!(to_ned_name("LEDA12345", Some("B70"), None).unwrap(), "LEDA 12345");
        assert_eq!(to_ned_name("LEDA12345", Some("CDS"), None).unwrap(), "LEDA12345");
    }

    #[test]
    fn test_leda_six_digits() {
        assert_eq!(ned("LEDA  12345"), "LEDA 012345");
        assert_eq!(ned("LEDA 0123456"), "LEDA 00123456");
    }

    #[test]
    fn test_mgc_double_zero() {
        assert_eq!(ned("MGC 12345"), "MGC 0012345");
    }

    #[test]
    fn test_eso_names() {
        assert_eq!(ned("ESO 323-77"), "ESO 323- G 077");
        assert_eq!(ned("ESO  23-G4"), "ESO 023- G 004");
        assert_eq!(ned("ESO   1-G1"), "ESO 001- G 001");
        assert_eq!(ned("ESO 323-IG77"), "ESO 323-IG 077");
        assert_eq!(ned("ESO 97-?13"), "ESO 97- G?13");
    }

    #[test]
    fn test_numeric_name_needs_twomass_id() {
        assert_eq!(
            to_ned_name("12345678+1234567", None, Some("01234567+0123456")).unwrap(),
            "2MASX J01234567+0123456"
        );
        assert_eq!(
            to_ned_name("12345678+1234567", None, None),
            Err(NameError::MissingTwoMassId("12345678+1234567".to_string()))
        );
    }

    #[test]
    fn test_twomrs_names() {
        assert_eq!(to_ned_name("2MASX_J0123", Some("2MRS"), None).unwrap(), "2MASX J0123");
        assert_eq!(to_ned_name("A123", Some("2MRS"), Some("X1")).unwrap(), "2MASX JX1");
        assert_eq!(to_ned_name("AM 1234", Some("2MRS"), Some("X1")).unwrap(), "AM 1234");
        assert_eq!(to_ned_name("g123", Some("2MRS"), Some("X1")).unwrap(), "2MASX JX1");
        assert!(to_ned_name("g123", Some("2MRS"), None).is_err());
    }

    #[test]
    fn test_empty_name() {
        assert_eq!(ned(""), "");
    }
}
