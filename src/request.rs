use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::Error;
use crate::id::{Id, IdGenerator};
use crate::jsonrpc::Version;
use crate::Result;

/// Arguments of a remote call, positional and keyword.
///
/// Both kinds may be given at once. The keyword arguments then travel as a
/// trailing object after the positional ones, e.g. `["Foo", {"age": 42}]`,
/// which strict JSON-RPC 2.0 does not allow but many servers accept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    positional: Vec<Value>,
    keyword: Map<String, Value>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.keyword.insert(name.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keyword.is_empty()
    }

    /// Resolve the `params` member.
    ///
    /// A lone array or object argument is sent as-is rather than wrapped in
    /// another array, and no arguments at all means no `params` member.
    pub fn into_params(self) -> Option<Value> {
        let mut params = self.positional;
        if !self.keyword.is_empty() {
            params.push(Value::Object(self.keyword));
        }
        match params.len() {
            0 => None,
            1 if params[0].is_array() || params[0].is_object() => params.pop(),
            _ => Some(Value::Array(params)),
        }
    }
}

impl From<Vec<Value>> for Arguments {
    fn from(positional: Vec<Value>) -> Self {
        Self {
            positional,
            keyword: Map::new(),
        }
    }
}

impl From<Map<String, Value>> for Arguments {
    fn from(keyword: Map<String, Value>) -> Self {
        Self {
            positional: Vec::new(),
            keyword,
        }
    }
}

/// Build [`Arguments`]: positional values first, keyword pairs after a `;`.
///
/// ```
/// use jsonrpc_yet::args;
///
/// let positional = args!["Foo", 5];
/// let keyword = args!(; name = "Yoko", age = 5);
/// let both = args!("Foo"; age = 42);
/// # let _ = (positional, keyword, both);
/// ```
#[macro_export]
macro_rules! args {
    ($($value:expr),* $(,)? ; $($name:ident = $kv:expr),* $(,)?) => {
        $crate::Arguments::new()
            $(.arg($value))*
            $(.kwarg(stringify!($name), $kv))*
    };
    ($($value:expr),* $(,)?) => {
        $crate::Arguments::new()
            $(.arg($value))*
    };
}

/// A request which does not expect a response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    jsonrpc: Version,
    method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<Value>,
}

impl Notification {
    pub fn new(method: impl Into<String>, args: Arguments) -> Self {
        Self {
            jsonrpc: Version,
            method: method.into(),
            params: args.into_params(),
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn params(&self) -> Option<&Value> {
        self.params.as_ref()
    }
}

/// A request which expects a response carrying the same `id`.
// field order is the canonical key order: jsonrpc, method, params, id
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Request {
    jsonrpc: Version,
    method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<Value>,
    id: Id,
}

impl Request {
    pub fn new(method: impl Into<String>, args: Arguments, ids: &dyn IdGenerator) -> Self {
        Self::with_id(method, args, ids.next_id())
    }

    pub fn with_id(method: impl Into<String>, args: Arguments, id: impl Into<Id>) -> Self {
        Self {
            jsonrpc: Version,
            method: method.into(),
            params: args.into_params(),
            id: id.into(),
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn params(&self) -> Option<&Value> {
        self.params.as_ref()
    }

    pub fn id(&self) -> &Id {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Message {
    Notification(Notification),
    Request(Request),
}

impl Message {
    pub fn method(&self) -> &str {
        match self {
            Message::Notification(n) => n.method(),
            Message::Request(r) => r.method(),
        }
    }

    pub fn id(&self) -> Option<&Id> {
        match self {
            Message::Notification(_) => None,
            Message::Request(r) => Some(r.id()),
        }
    }

    pub fn expects_response(&self) -> bool {
        matches!(self, Message::Request(_))
    }
}

impl From<Notification> for Message {
    fn from(n: Notification) -> Self {
        Message::Notification(n)
    }
}

impl From<Request> for Message {
    fn from(r: Request) -> Self {
        Message::Request(r)
    }
}

/// Build a message.
///
/// When `wants_response` is false the result is a [`Notification`] and the
/// generator is left untouched. Otherwise the request takes `explicit_id`, or
/// the next id from `ids` when none is given.
pub fn build(
    method: impl Into<String>,
    args: Arguments,
    wants_response: bool,
    explicit_id: Option<Id>,
    ids: &dyn IdGenerator,
) -> Message {
    if !wants_response {
        return Notification::new(method, args).into();
    }
    let id = match explicit_id {
        Some(id) => id,
        None => ids.next_id(),
    };
    Request::with_id(method, args, id).into()
}

/// What a client hands to its transport: one message or a batch of them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Single(Message),
    Batch(Vec<Message>),
}

impl Payload {
    pub fn is_batch(&self) -> bool {
        matches!(self, Payload::Batch(_))
    }

    /// A batch always gets a reply, even if it's an empty body.
    pub fn expects_response(&self) -> bool {
        match self {
            Payload::Single(message) => message.expects_response(),
            Payload::Batch(_) => true,
        }
    }
}

impl From<Message> for Payload {
    fn from(message: Message) -> Self {
        Payload::Single(message)
    }
}

impl From<Request> for Payload {
    fn from(r: Request) -> Self {
        Payload::Single(r.into())
    }
}

impl From<Notification> for Payload {
    fn from(n: Notification) -> Self {
        Payload::Single(n.into())
    }
}

impl From<Vec<Message>> for Payload {
    fn from(batch: Vec<Message>) -> Self {
        Payload::Batch(batch)
    }
}

/// Serialize to compact JSON text: `jsonrpc`, `method`, `params`, then `id`.
pub fn serialize<T: Serialize + ?Sized>(message: &T) -> Result<String> {
    serde_json::to_string(message).map_err(Error::Encode)
}

macro_rules! display_as_json {
    ($($ty: ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    let text = serde_json::to_string(self).map_err(|_| fmt::Error)?;
                    f.write_str(&text)
                }
            }
        )*
    };
}

display_as_json!(Notification, Request, Message, Payload);
