use serde_json::Value;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Rpc error {0}")]
    Rpc(RpcError),
    #[error("Parse error {0}")]
    Parse(serde_json::Error),
    #[error("Schema violation: {0}")]
    Schema(String),
    #[error("Encode error {0}")]
    Encode(serde_json::Error),
    #[error("Invalid request text {0}")]
    Request(serde_json::Error),
    #[error("Decode error {0}")]
    Decode(serde_json::Error),
    #[error("Transport error {0}")]
    Transport(Box<dyn std::error::Error + Send + Sync>),
    #[error("Config error {0}")]
    Config(#[from] toml::de::Error),
    #[error("Io error {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Wrap an error raised by a transport binding.
    pub fn transport<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Error::Transport(err.into())
    }
}

/// A protocol-level error the caller chose to escalate.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    pub data: Option<Value>,
}

impl std::fmt::Display for RpcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "RpcError: {{\"code\": {}, \"message\": \"{}\"",
            self.code, self.message
        )?;
        if let Some(ref data) = self.data {
            write!(f, ", \"data\": {}", data)?;
        }
        write!(f, "}}")
    }
}
impl std::error::Error for RpcError {}

impl From<RpcError> for Error {
    fn from(err: RpcError) -> Self {
        Error::Rpc(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rpc_error_display() {
        let err = RpcError {
            code: -32000,
            message: "Not Found".to_string(),
            data: None,
        };
        assert_eq!(
            err.to_string(),
            r#"RpcError: {"code": -32000, "message": "Not Found"}"#
        );

        let err = RpcError {
            data: Some(serde_json::json!("missing")),
            ..err
        };
        assert_eq!(
            Error::from(err).to_string(),
            r#"Rpc error RpcError: {"code": -32000, "message": "Not Found", "data": "missing"}"#
        );
    }
}
