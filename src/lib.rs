pub mod client;
pub mod config;
mod error;
pub mod id;
pub mod log;
mod request;
mod response;
pub mod schema;

/// https://www.jsonrpc.org/specification
mod jsonrpc {
    use serde::de::{self, Deserialize, Deserializer};
    use serde::ser::{Serialize, Serializer};
    use serde_json::Value;

    pub const VERSION: &str = "2.0";

    /// The `jsonrpc` member, which must be exactly "2.0".
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Version;

    impl Serialize for Version {
        fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.serialize_str(VERSION)
        }
    }

    /// A JSON-RPC error object.
    #[derive(serde::Deserialize, Debug, Clone)]
    pub struct Error {
        #[serde(deserialize_with = "integer_code")]
        pub code: i64,
        pub message: String,
        #[serde(default)]
        pub data: Option<Value>,
    }

    // JSON Schema counts -32000.0 as an integer, so accept it here too
    fn integer_code<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let code = Value::deserialize(deserializer)?;
        code.as_i64()
            .or_else(|| {
                code.as_f64()
                    .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                    .map(|f| f as i64)
            })
            .ok_or_else(|| de::Error::custom(format!("error code {code} is not an i64 integer")))
    }
}

pub use client::{Client, RequestOptions, Response, Transport};
pub use config::ClientConfig;
pub use error::{Error, RpcError};
pub use id::{Id, IdGenerator};
pub use request::{build, serialize, Arguments, Message, Notification, Payload, Request};
pub use response::{parse, parse_value, Outcome, Parsed};

pub type Result<T> = std::result::Result<T, Error>;
