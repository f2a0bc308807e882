use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{Error, RpcError};
use crate::jsonrpc;
use crate::schema;
use crate::Result;

/// The result of a single request: a success or a protocol-level error.
///
/// An `Error` outcome is ordinary data. Use [`Outcome::into_result`] to treat
/// it as a failure.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Ok {
        result: Value,
        id: Value,
    },
    Error {
        code: i64,
        message: String,
        data: Option<Value>,
        id: Value,
    },
}

impl Outcome {
    /// What an empty body means for a lone notification.
    pub fn noop() -> Self {
        Outcome::Ok {
            result: Value::Null,
            id: Value::Null,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Ok { .. })
    }

    /// The raw `id` the server sent back; `null` is passed through as-is.
    pub fn id(&self) -> &Value {
        match self {
            Outcome::Ok { id, .. } | Outcome::Error { id, .. } => id,
        }
    }

    pub fn into_result(self) -> Result<Value> {
        match self {
            Outcome::Ok { result, .. } => Ok(result),
            Outcome::Error {
                code,
                message,
                data,
                ..
            } => Err(RpcError {
                code,
                message,
                data,
            }
            .into()),
        }
    }

    /// Escalate an error outcome and decode the result into `T`.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T> {
        serde_json::from_value(self.into_result()?).map_err(Error::Decode)
    }
}

/// A parsed response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed {
    Single(Outcome),
    Batch(Vec<Outcome>),
}

impl Parsed {
    pub fn single(&self) -> Option<&Outcome> {
        match self {
            Parsed::Single(outcome) => Some(outcome),
            Parsed::Batch(_) => None,
        }
    }

    pub fn batch(&self) -> Option<&[Outcome]> {
        match self {
            Parsed::Single(_) => None,
            Parsed::Batch(outcomes) => Some(outcomes),
        }
    }

    pub fn outcomes(&self) -> &[Outcome] {
        match self {
            Parsed::Single(outcome) => std::slice::from_ref(outcome),
            Parsed::Batch(outcomes) => outcomes,
        }
    }

    pub fn total_ok(&self) -> usize {
        self.outcomes().iter().filter(|o| o.is_ok()).count()
    }

    pub fn total_errors(&self) -> usize {
        self.outcomes().len() - self.total_ok()
    }
}

fn empty(batch: bool) -> Parsed {
    if batch {
        // only notifications were sent
        Parsed::Batch(Vec::new())
    } else {
        Parsed::Single(Outcome::noop())
    }
}

/// Parse a response body.
///
/// `batch` only matters for an empty body: it decides between an empty batch
/// and the no-op outcome of a lone notification. Otherwise the shape of the
/// body decides.
pub fn parse(text: &str, batch: bool, validate: bool) -> Result<Parsed> {
    if text.is_empty() {
        return Ok(empty(batch));
    }
    let value: Value = serde_json::from_str(text).map_err(Error::Parse)?;
    parse_value(value, batch, validate)
}

/// Parse an already deserialized response body. `null` counts as empty.
pub fn parse_value(value: Value, batch: bool, validate: bool) -> Result<Parsed> {
    if value.is_null() {
        return Ok(empty(batch));
    }
    if validate {
        schema::validate_body(&value)?;
    }
    match value {
        Value::Array(responses) => {
            let mut outcomes = Vec::with_capacity(responses.len());
            for response in responses {
                let response = into_object(response)?;
                if response.contains_key("id") {
                    outcomes.push(classify(response)?);
                }
            }
            Ok(Parsed::Batch(outcomes))
        }
        response => {
            let response = into_object(response)?;
            if !response.contains_key("id") {
                return Ok(Parsed::Single(Outcome::noop()));
            }
            classify(response).map(Parsed::Single)
        }
    }
}

fn into_object(value: Value) -> Result<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(Error::Schema(format!(
            "a response must be an object, got {other}"
        ))),
    }
}

fn classify(mut response: Map<String, Value>) -> Result<Outcome> {
    let id = response.remove("id").unwrap_or(Value::Null);
    if let Some(result) = response.remove("result") {
        return Ok(Outcome::Ok { result, id });
    }
    match response.remove("error") {
        Some(error) => {
            let error: jsonrpc::Error = serde_json::from_value(error)
                .map_err(|e| Error::Schema(format!("malformed error object: {e}")))?;
            Ok(Outcome::Error {
                code: error.code,
                message: error.message,
                data: error.data,
                id,
            })
        }
        None => Err(Error::Schema(
            "a response must have either result or error".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn single_success() {
        let parsed = parse(r#"{"jsonrpc":"2.0","result":5,"id":1}"#, false, true).unwrap();
        assert_eq!(
            parsed,
            Parsed::Single(Outcome::Ok {
                result: json!(5),
                id: json!(1)
            })
        );
    }

    #[test]
    fn single_error_keeps_null_id() {
        let parsed = parse(
            r#"{"jsonrpc":"2.0","error":{"code":-32000,"message":"Not Found"},"id":null}"#,
            false,
            true,
        )
        .unwrap();
        assert_eq!(
            parsed,
            Parsed::Single(Outcome::Error {
                code: -32000,
                message: "Not Found".to_string(),
                data: None,
                id: Value::Null,
            })
        );
        assert_eq!(parsed.total_errors(), 1);
        assert_eq!(parsed.total_ok(), 0);
    }

    #[test]
    fn integral_float_error_code() {
        let body = r#"{"jsonrpc":"2.0","error":{"code":-32000.0,"message":"Not Found"},"id":1}"#;
        for validate in [true, false] {
            assert_eq!(
                parse(body, false, validate).unwrap(),
                Parsed::Single(Outcome::Error {
                    code: -32000,
                    message: "Not Found".to_string(),
                    data: None,
                    id: json!(1),
                })
            );
        }

        let fractional = r#"{"jsonrpc":"2.0","error":{"code":-1.5,"message":"x"},"id":1}"#;
        assert!(matches!(parse(fractional, false, true), Err(Error::Schema(_))));
        assert!(matches!(parse(fractional, false, false), Err(Error::Schema(_))));
    }

    #[test]
    fn error_data_is_kept() {
        let parsed = parse(
            r#"{"jsonrpc":"2.0","error":{"code":-32602,"message":"Invalid params","data":{"field":"x"}},"id":"a"}"#,
            false,
            true,
        )
        .unwrap();
        let Parsed::Single(Outcome::Error { data, id, .. }) = parsed else {
            panic!("expected an error outcome");
        };
        assert_eq!(data, Some(json!({"field": "x"})));
        assert_eq!(id, json!("a"));
    }

    #[test]
    fn batch_keeps_order() {
        let parsed = parse(
            r#"[{"jsonrpc":"2.0","result":1,"id":1},{"jsonrpc":"2.0","result":2,"id":2}]"#,
            true,
            true,
        )
        .unwrap();
        assert_eq!(
            parsed,
            Parsed::Batch(vec![
                Outcome::Ok {
                    result: json!(1),
                    id: json!(1)
                },
                Outcome::Ok {
                    result: json!(2),
                    id: json!(2)
                },
            ])
        );
        assert_eq!(parsed.single(), None);
        assert_eq!(parsed.total_ok(), 2);
    }

    #[test]
    fn batch_mixes_ok_and_error() {
        let parsed = parse(
            r#"[{"jsonrpc":"2.0","error":{"code":-32601,"message":"Method not found"},"id":"1"},{"jsonrpc":"2.0","result":["hello",5],"id":"9"}]"#,
            true,
            true,
        )
        .unwrap();
        let outcomes = parsed.batch().unwrap();
        assert!(!outcomes[0].is_ok());
        assert!(outcomes[1].is_ok());
        assert_eq!(outcomes[1].id(), &json!("9"));
    }

    #[test]
    fn batch_drops_entries_without_id() {
        let parsed = parse(
            r#"[{"jsonrpc":"2.0","result":"foo","id":1},{"jsonrpc":"2.0","result":"bar"}]"#,
            true,
            false,
        )
        .unwrap();
        assert_eq!(parsed.outcomes().len(), 1);
        assert_eq!(parsed.outcomes()[0].id(), &json!(1));
    }

    #[test]
    fn empty_body() {
        assert_eq!(parse("", false, true).unwrap(), Parsed::Single(Outcome::noop()));
        assert_eq!(parse("", true, true).unwrap(), Parsed::Batch(vec![]));
        assert_eq!(
            parse_value(Value::Null, false, true).unwrap(),
            Parsed::Single(Outcome::noop())
        );
        assert_eq!(parse_value(Value::Null, true, true).unwrap(), Parsed::Batch(vec![]));
        assert!(Outcome::noop().is_ok());
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        assert!(matches!(parse("{dodgy}", false, true), Err(Error::Parse(_))));
        assert!(matches!(parse("{dodgy}", false, false), Err(Error::Parse(_))));
    }

    #[test]
    fn invalid_jsonrpc_is_a_schema_violation() {
        assert!(matches!(
            parse(r#"{"json": "2.0"}"#, false, true),
            Err(Error::Schema(_))
        ));
        assert!(matches!(
            parse(r#"[{"jsonrpc":"2.0","result":1,"id":1}, 5]"#, true, true),
            Err(Error::Schema(_))
        ));
    }

    #[test]
    fn unvalidated_responses_are_still_checked_when_classified() {
        parse(r#"{"jsonrpc":"2.0","result":"foo","id":1}"#, false, false).unwrap();
        assert!(matches!(
            parse(r#"{"jsonrpc":"2.0","id":1}"#, false, false),
            Err(Error::Schema(_))
        ));
        assert!(matches!(
            parse(r#"{"jsonrpc":"2.0","error":{"code":"x"},"id":1}"#, false, false),
            Err(Error::Schema(_))
        ));
        assert!(matches!(parse("5", false, false), Err(Error::Schema(_))));
        // a lone response without id is treated like no response at all
        assert_eq!(
            parse(r#"{"jsonrpc":"2.0","result":"foo"}"#, false, false).unwrap(),
            Parsed::Single(Outcome::noop())
        );
    }

    #[test]
    fn parsing_is_repeatable() {
        let text = r#"[{"jsonrpc":"2.0","result":1,"id":1},{"jsonrpc":"2.0","error":{"code":1,"message":"x"},"id":2}]"#;
        assert_eq!(parse(text, true, true).unwrap(), parse(text, true, true).unwrap());
    }

    #[test]
    fn outcome_escalation_and_decoding() {
        let ok = Outcome::Ok {
            result: json!(["a", "b"]),
            id: json!(1),
        };
        let names: Vec<String> = ok.decode().unwrap();
        assert_eq!(names, vec!["a", "b"]);

        let err = Outcome::Error {
            code: -32000,
            message: "Not Found".to_string(),
            data: None,
            id: Value::Null,
        };
        match err.into_result() {
            Err(Error::Rpc(rpc)) => assert_eq!(rpc.code, -32000),
            other => panic!("expected rpc error, got {other:?}"),
        }

        let wrong = Outcome::Ok {
            result: json!("text"),
            id: json!(1),
        };
        assert!(matches!(wrong.decode::<i64>(), Err(Error::Decode(_))));
    }
}
