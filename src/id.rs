use std::fmt;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An identifier established by the Client, a String or a Number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Number(i64),
    String(String),
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::Number(n) => write!(f, "{}", n),
            Id::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Id {
    fn from(n: i64) -> Self {
        Id::Number(n)
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Id::String(s.to_string())
    }
}

impl From<String> for Id {
    fn from(s: String) -> Self {
        Id::String(s)
    }
}

impl From<Id> for Value {
    fn from(id: Id) -> Self {
        match id {
            Id::Number(n) => Value::from(n),
            Id::String(s) => Value::String(s),
        }
    }
}

/// An endless source of request ids.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> Id;
}

impl<G: IdGenerator + ?Sized> IdGenerator for Arc<G> {
    fn next_id(&self) -> Id {
        (**self).next_id()
    }
}

/// Increments from `start`: 1, 2, 3, .. 9, 10, 11.
#[derive(Debug)]
pub struct Decimal {
    next: AtomicI64,
}

impl Decimal {
    pub fn new(start: i64) -> Self {
        Self {
            next: AtomicI64::new(start),
        }
    }
}

impl Default for Decimal {
    fn default() -> Self {
        Self::new(1)
    }
}

impl IdGenerator for Decimal {
    fn next_id(&self) -> Id {
        Id::Number(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

/// Incremental lower-case hexadecimal strings: "1", .. "9", "a", "b".
#[derive(Debug)]
pub struct Hexadecimal {
    next: AtomicU64,
}

impl Hexadecimal {
    pub fn new(start: u64) -> Self {
        Self {
            next: AtomicU64::new(start),
        }
    }
}

impl Default for Hexadecimal {
    fn default() -> Self {
        Self::new(1)
    }
}

impl IdGenerator for Hexadecimal {
    fn next_id(&self) -> Id {
        Id::String(format!("{:x}", self.next.fetch_add(1, Ordering::Relaxed)))
    }
}

pub const DEFAULT_RANDOM_LENGTH: usize = 8;
pub const DEFAULT_RANDOM_ALPHABET: &str = "0123456789abcdefghijklmnopqrstuvwxyz";

/// A random string such as "fubui5e6".
///
/// Not unique: with the default length and alphabet the chance of a collision
/// is about one in 36^8.
#[derive(Debug, Clone)]
pub struct Random {
    length: usize,
    alphabet: Vec<char>,
}

impl Random {
    /// An empty alphabet yields empty ids.
    pub fn new(length: usize, alphabet: &str) -> Self {
        Self {
            length,
            alphabet: alphabet.chars().collect(),
        }
    }
}

impl Default for Random {
    fn default() -> Self {
        Self::new(DEFAULT_RANDOM_LENGTH, DEFAULT_RANDOM_ALPHABET)
    }
}

impl IdGenerator for Random {
    fn next_id(&self) -> Id {
        let mut rng = rand::thread_rng();
        Id::String(
            (0..self.length)
                .filter_map(|_| self.alphabet.choose(&mut rng))
                .collect(),
        )
    }
}

/// Version 4 uuid strings, e.g. "9bfe2c93-717e-4a45-b91b-55422c5af4ff".
#[derive(Debug, Clone, Copy, Default)]
pub struct Uuid;

impl IdGenerator for Uuid {
    fn next_id(&self) -> Id {
        Id::String(uuid::Uuid::new_v4().to_string())
    }
}

/// Names a generator so it can be picked from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdKind {
    #[default]
    Decimal,
    Hexadecimal,
    Random,
    Uuid,
}

impl IdKind {
    pub fn generator(self) -> Arc<dyn IdGenerator> {
        match self {
            IdKind::Decimal => Arc::new(Decimal::default()),
            IdKind::Hexadecimal => Arc::new(Hexadecimal::default()),
            IdKind::Random => Arc::new(Random::default()),
            IdKind::Uuid => Arc::new(Uuid),
        }
    }
}
