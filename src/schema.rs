use std::sync::OnceLock;

use jsonschema::Validator;
use serde_json::Value;

use crate::error::Error;
use crate::Result;

const RESPONSE_SCHEMA: &str = include_str!("response-schema.json");

fn validator() -> Result<&'static Validator> {
    static VALIDATOR: OnceLock<std::result::Result<Validator, String>> = OnceLock::new();
    VALIDATOR
        .get_or_init(|| {
            let schema: Value =
                serde_json::from_str(RESPONSE_SCHEMA).map_err(|e| e.to_string())?;
            Validator::new(&schema).map_err(|e| e.to_string())
        })
        .as_ref()
        .map_err(|e| Error::Schema(format!("response schema failed to compile: {e}")))
}

/// Check a single response object.
pub fn validate(response: &Value) -> Result<()> {
    let validator = validator()?;
    let violations: Vec<String> = validator
        .iter_errors(response)
        .map(|err| err.to_string())
        .collect();
    if violations.is_empty() {
        Ok(())
    } else {
        Err(Error::Schema(violations.join("; ")))
    }
}

/// Check a response body: each element of a batch, or the lone object.
pub fn validate_body(body: &Value) -> Result<()> {
    match body {
        Value::Array(responses) => responses.iter().try_for_each(validate),
        response => validate(response),
    }
}
