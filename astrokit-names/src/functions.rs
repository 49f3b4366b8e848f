use astrokit_plugin::args::{extract_text, optional_text, required};
use astrokit_plugin::prelude::*;

use crate::ned::{to_ned_name, NameError};

impl From<NameError> for AstroError {
    fn from(e: NameError) -> Self {
        match e {
            NameError::MissingTwoMassId(_) => AstroError::domain_error(e.to_string())
                .with_suggestion("Pass the 2MASS ID as the third argument"),
            NameError::Pattern(msg) => AstroError::internal(msg),
        }
    }
}

pub struct ToNedName;

static TO_NED_NAME_ARGS: [ArgMeta; 3] = [
    ArgMeta::required("name", "Text", "Object name as given by the catalogue"),
    ArgMeta::optional("origin", "Text", "Catalogue of origin (CDS, B70, 2MRS)", "null"),
    ArgMeta::optional("twomass_id", "Text", "2MASS ID for names without a catalogue prefix", "null"),
];
static TO_NED_NAME_EXAMPLES: [&str; 3] = [
    "to_ned_name(\"Mrk  231\") → \"MRK 0231\"",
    "to_ned_name(\"ESO 323-77\") → \"ESO 323- G 077\"",
    "to_ned_name(\"A123\", \"2MRS\", \"01234567+0123456\") → \"2MASX J01234567+0123456\"",
];
static TO_NED_NAME_RELATED: [&str; 0] = [];

impl FunctionPlugin for ToNedName {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "to_ned_name",
            description: "Rewrite a catalogue object name in NED nomenclature",
            usage: "to_ned_name(name, origin?, twomass_id?)",
            args: &TO_NED_NAME_ARGS,
            returns: "Text",
            examples: &TO_NED_NAME_EXAMPLES,
            category: "names",
            related: &TO_NED_NAME_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        let run = || -> Result<Value, AstroError> {
            const NAME: &str = "to_ned_name";
            let name = extract_text(required(args, 0, NAME, 1)?, NAME, "name")?;
            let origin = optional_text(args, 1, NAME, "origin")?;
            let twomass_id = optional_text(args, 2, NAME, "twomass_id")?;
            let ned = to_ned_name(name, origin, twomass_id).map_err(|e| AstroError::from(e).in_function(NAME))?;
            Ok(Value::Text(ned))
        };
        run().unwrap_or_else(Value::Error)
    }
}
