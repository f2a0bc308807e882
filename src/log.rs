use serde_json::{Map, Value};

// "--> {request}" and "<-- {response}" at INFO, under separate targets
pub const REQUEST_TARGET: &str = "jsonrpc_yet::request";
pub const RESPONSE_TARGET: &str = "jsonrpc_yet::response";

const LONGEST_STRING: usize = 30;
const LONGEST_LIST: usize = 30;

fn trim_string(message: &str) -> String {
    let len = message.chars().count();
    if len <= LONGEST_STRING {
        return message.to_string();
    }
    let keep = LONGEST_STRING / 3;
    let head: String = message.chars().take(keep).collect();
    let tail: String = message.chars().skip(len - keep).collect();
    format!("{head}...{tail}")
}

fn trim_list(items: Vec<Value>) -> Vec<Value> {
    if items.len() <= LONGEST_LIST {
        return items;
    }
    let keep = LONGEST_LIST / 3;
    let len = items.len();
    let mut trimmed = Vec::with_capacity(keep * 2 + 1);
    for (i, item) in items.into_iter().enumerate() {
        if i < keep || i >= len - keep {
            trimmed.push(item);
        } else if i == keep {
            trimmed.push(Value::String("...".to_string()));
        }
    }
    trimmed
}

// strings are only shortened as object values, list items are left alone
fn trim_object(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter()
        .map(|(k, v)| {
            let v = match v {
                Value::String(s) => Value::String(trim_string(&s)),
                Value::Array(items) => Value::Array(trim_list(items)),
                Value::Object(inner) => Value::Object(trim_object(inner)),
                other => other,
            };
            (k, v)
        })
        .collect()
}

/// Abbreviate long strings and lists in a JSON message.
///
/// Text which isn't a JSON object or batch is abbreviated as a plain string.
pub fn trim_message(message: &str) -> String {
    match serde_json::from_str::<Value>(message) {
        Ok(Value::Object(map)) => Value::Object(trim_object(map)).to_string(),
        Ok(Value::Array(batch)) => Value::Array(
            batch
                .into_iter()
                .map(|item| match item {
                    Value::Object(map) => Value::Object(trim_object(map)),
                    other => other,
                })
                .collect(),
        )
        .to_string(),
        _ => trim_string(message),
    }
}

/// Flatten a message onto one line.
fn clean(message: &str) -> String {
    message
        .replace('\n', "")
        .replace("  ", " ")
        .replace("{ ", "{")
}

fn prepare(message: &str, trim: bool) -> String {
    let message = clean(message);
    if trim {
        trim_message(&message)
    } else {
        message
    }
}

pub fn log_request(message: &str, trim: bool) {
    tracing::info!(target: REQUEST_TARGET, "--> {}", prepare(message, trim));
}

pub fn log_response(message: &str, trim: bool) {
    tracing::info!(target: RESPONSE_TARGET, "<-- {}", prepare(message, trim));
}
