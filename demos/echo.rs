use serde_json::{json, Value};

use jsonrpc_yet::{
    args, Client, ClientConfig, Error, Message, Notification, Request, Result, Transport,
};

/// Stands in for a network binding: answers `sum` requests, rejects the rest.
struct Loopback;

impl Loopback {
    fn answer(request: &Value) -> Option<Value> {
        let id = request.get("id")?.clone();
        let reply = match request["method"].as_str() {
            Some("sum") => {
                let sum: i64 = request["params"]
                    .as_array()
                    .map(|params| params.iter().filter_map(Value::as_i64).sum())
                    .unwrap_or_default();
                json!({"jsonrpc": "2.0", "result": sum, "id": id})
            }
            _ => json!({
                "jsonrpc": "2.0",
                "error": {"code": -32601, "message": "Method not found"},
                "id": id,
            }),
        };
        Some(reply)
    }
}

impl Transport for Loopback {
    async fn send_message(&self, request: &str, _response_expected: bool) -> Result<String> {
        let request: Value = serde_json::from_str(request).map_err(Error::transport)?;
        let reply = match request {
            Value::Array(batch) => {
                let replies: Vec<Value> = batch.iter().filter_map(Self::answer).collect();
                (!replies.is_empty()).then(|| Value::Array(replies))
            }
            single => Self::answer(&single),
        };
        Ok(reply.map(|r| r.to_string()).unwrap_or_default())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

    let client = Client::with_config(Loopback, ClientConfig::load_default()?);

    let sum: i64 = client.call("sum", args![1, 2, 3]).await?;
    println!("sum = {}", sum);

    let response = client.request("subtract", args![5, 3]).await?;
    println!("{} {:?}", response, response.data);

    if let Err(err) = client.call::<Value>("subtract", args![5, 3]).await {
        println!("escalated: {}", err);
    }

    client.notify("update", args![1, 2]).await?;

    let ids = jsonrpc_yet::id::Decimal::new(100);
    let batch: Vec<Message> = vec![
        Request::new("sum", args![1, 2], &ids).into(),
        Notification::new("notify_hello", args![7]).into(),
        Request::new("get_data", args![], &ids).into(),
    ];
    let response = client.send(batch).await?;
    for outcome in response.data.outcomes() {
        println!("{:?}", outcome);
    }
    Ok(())
}
