//! The catalog of recognized overlay settings.
//!
//! Every key the crate ever parses or rewrites lives in [`SCHEMA`]. Each entry
//! carries the key's name, its [`Kind`] (which drives both decoding and
//! formatting), and its default [`Value`]. The parser, writer, controller, and
//! auditor are all generic over this table — adding a setting to the system
//! means adding one entry here and nothing else.
//!
//! Keys not in the catalog are never touched: unknown assignments in the
//! backing file pass through every rewrite byte-for-byte.

use std::fmt;

/// The value type of a schema key.
///
/// Floats carry their display precision because the backing file is rewritten
/// textually: the formatted token must be stable across round trips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Signed base-10 integer.
    Int,
    /// Decimal float, formatted at a fixed number of places.
    Float { precision: usize },
    /// Lowercase `true` / `false`.
    Bool,
}

/// A typed setting value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Value {
    /// Format the value as it appears in an assignment statement.
    ///
    /// The `kind` supplies float precision; int and bool formatting ignore it.
    pub fn render(&self, kind: Kind) -> String {
        match (self, kind) {
            (Value::Float(f), Kind::Float { precision }) => format!("{f:.precision$}"),
            (Value::Int(i), _) => i.to_string(),
            (Value::Float(f), _) => format!("{f:.2}"),
            (Value::Bool(b), _) => b.to_string(),
        }
    }

    /// Decode a raw value token per the expected kind.
    ///
    /// Returns `None` on any parse failure — the caller falls back to the
    /// key's default, per the recoverable-decode contract.
    pub fn decode(kind: Kind, token: &str) -> Option<Value> {
        let token = token.trim();
        match kind {
            Kind::Int => token.parse::<i64>().ok().map(Value::Int),
            Kind::Float { .. } => token.parse::<f64>().ok().map(Value::Float),
            Kind::Bool => match token {
                "true" => Some(Value::Bool(true)),
                "false" => Some(Value::Bool(false)),
                _ => None,
            },
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// One entry in the settings catalog.
#[derive(Debug, Clone, Copy)]
pub struct KeySpec {
    pub name: &'static str,
    pub kind: Kind,
    pub default: Value,
}

/// Two-decimal float, the common case.
const FLOAT2: Kind = Kind::Float { precision: 2 };

/// The full catalog of recognized keys, in backing-file order.
///
/// Names must be unique; [`lookup`] relies on it.
pub const SCHEMA: &[KeySpec] = &[
    KeySpec { name: "ENABLE_BULLETS_SQUARE", kind: Kind::Bool, default: Value::Bool(true) },
    KeySpec { name: "ENABLE_BULLETS_RECT", kind: Kind::Bool, default: Value::Bool(true) },
    KeySpec { name: "GLOBAL_HUE_OFFSET", kind: Kind::Int, default: Value::Int(0) },
    KeySpec { name: "GLOBAL_HUE_DEFAULT", kind: Kind::Int, default: Value::Int(0) },
    KeySpec { name: "GLOBAL_BRIGHTNESS", kind: FLOAT2, default: Value::Float(1.0) },
    KeySpec { name: "GLOBAL_COLOR_BRIGHTNESS", kind: FLOAT2, default: Value::Float(1.0) },
    KeySpec { name: "STAR_HUE_OFFSET", kind: Kind::Int, default: Value::Int(0) },
    KeySpec { name: "STAR_COLOR_BRIGHTNESS", kind: FLOAT2, default: Value::Float(1.0) },
    KeySpec { name: "STAR_SECONDARY_HUE_OFFSET", kind: Kind::Int, default: Value::Int(0) },
    KeySpec { name: "STAR_SECONDARY_COLOR_BRIGHTNESS", kind: FLOAT2, default: Value::Float(1.0) },
    KeySpec { name: "STAR_SECONDARY_OFFSET_DEG", kind: Kind::Int, default: Value::Int(0) },
    // Animation speed renders at one decimal place; overlays treat finer
    // steps as jitter.
    KeySpec { name: "STAR_SPEED", kind: Kind::Float { precision: 1 }, default: Value::Float(1.0) },
    KeySpec { name: "GLOSSY_INTENSITY", kind: FLOAT2, default: Value::Float(1.0) },
    KeySpec { name: "DAILY_KICKS_GOAL", kind: Kind::Int, default: Value::Int(10) },
    KeySpec { name: "SUB_GOAL_CONFIG", kind: Kind::Int, default: Value::Int(5) },
    KeySpec { name: "GLOW_KICK_DOCK", kind: Kind::Bool, default: Value::Bool(true) },
    KeySpec { name: "GLOW_SUB_DOCK", kind: Kind::Bool, default: Value::Bool(true) },
    KeySpec { name: "GLOW_KICK_RECT", kind: Kind::Bool, default: Value::Bool(true) },
    KeySpec { name: "GLOW_SUB_RECT", kind: Kind::Bool, default: Value::Bool(true) },
    KeySpec { name: "SHOW_BORDER_KICK_DOCK", kind: Kind::Bool, default: Value::Bool(true) },
    KeySpec { name: "SHOW_BORDER_SUB_DOCK", kind: Kind::Bool, default: Value::Bool(true) },
    KeySpec { name: "SHOW_BORDER_KICK_RECT", kind: Kind::Bool, default: Value::Bool(true) },
];

/// The namespace prefix every assignment statement carries.
pub const NAMESPACE: &str = "window";

/// Find a key's schema index by name.
pub fn lookup(name: &str) -> Option<usize> {
    SCHEMA.iter().position(|spec| spec.name == name)
}

/// Look up a key's spec by name.
pub fn spec(name: &str) -> Option<&'static KeySpec> {
    lookup(name).map(|idx| &SCHEMA[idx])
}
