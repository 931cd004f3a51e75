//! The controller's in-memory value set.
//!
//! A [`Snapshot`] always holds a value for every schema key, in schema order.
//! It starts from defaults (or a parsed document) and is mutated in place as
//! change events arrive. It is never persisted directly — the store re-reads
//! the on-disk document and applies changed keys onto it, so a snapshot is a
//! view, not the file.

use crate::schema::{self, KeySpec, Value, SCHEMA};

/// A complete typed value set, one slot per schema key.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    values: Vec<Value>,
}

impl Snapshot {
    /// A snapshot holding every key's schema default.
    pub fn defaults() -> Self {
        Snapshot {
            values: SCHEMA.iter().map(|spec| spec.default).collect(),
        }
    }

    /// Value for a key by schema index.
    pub fn value_at(&self, idx: usize) -> Value {
        self.values[idx]
    }

    /// Value for a key by name. `None` only for names outside the schema.
    pub fn get(&self, key: &str) -> Option<Value> {
        schema::lookup(key).map(|idx| self.values[idx])
    }

    /// Set a key by schema index.
    pub fn set_at(&mut self, idx: usize, value: Value) {
        self.values[idx] = value;
    }

    /// Set a key by name. Returns the schema index, or `None` if the key is
    /// not in the schema (in which case nothing changes).
    pub fn set(&mut self, key: &str, value: Value) -> Option<usize> {
        let idx = schema::lookup(key)?;
        self.values[idx] = value;
        Some(idx)
    }

    /// Iterate `(spec, value)` pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static KeySpec, Value)> + '_ {
        SCHEMA.iter().zip(self.values.iter().copied())
    }

    /// The `(spec, value)` pairs for a set of schema indices, in schema order.
    ///
    /// This is the shape the writer consumes: only the listed keys are
    /// rewritten in the document.
    pub fn select(&self, indices: &[usize]) -> Vec<(&'static KeySpec, Value)> {
        let mut picked: Vec<usize> = indices.to_vec();
        picked.sort_unstable();
        picked.dedup();
        picked
            .into_iter()
            .map(|idx| (&SCHEMA[idx], self.values[idx]))
            .collect()
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Snapshot::defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_key() {
        let snap = Snapshot::defaults();
        for spec in SCHEMA {
            assert_eq!(snap.get(spec.name), Some(spec.default));
        }
    }

    #[test]
    fn set_and_get_by_name() {
        let mut snap = Snapshot::defaults();
        let idx = snap.set("GLOBAL_HUE_OFFSET", Value::Int(120)).unwrap();
        assert_eq!(snap.get("GLOBAL_HUE_OFFSET"), Some(Value::Int(120)));
        assert_eq!(snap.value_at(idx), Value::Int(120));
    }

    #[test]
    fn set_unknown_key_is_none() {
        let mut snap = Snapshot::defaults();
        assert!(snap.set("NOT_A_KEY", Value::Int(1)).is_none());
        assert_eq!(snap, Snapshot::defaults());
    }

    #[test]
    fn select_is_sorted_and_deduped() {
        let mut snap = Snapshot::defaults();
        let hue = snap.set("GLOBAL_HUE_OFFSET", Value::Int(45)).unwrap();
        let glossy = snap.set("GLOSSY_INTENSITY", Value::Float(0.5)).unwrap();

        let changes = snap.select(&[glossy, hue, hue]);
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].0.name, "GLOBAL_HUE_OFFSET");
        assert_eq!(changes[1].0.name, "GLOSSY_INTENSITY");
    }

    #[test]
    fn snapshots_compare_by_value() {
        let mut a = Snapshot::defaults();
        let b = Snapshot::defaults();
        assert_eq!(a, b);
        a.set("STAR_SPEED", Value::Float(2.0));
        assert_ne!(a, b);
    }
}
