//! Parse and rewrite assignment statements in the backing file.
//!
//! The backing file is not a structured document. Overlays load it as a
//! script, so it carries comments, helper functions, and base-color tables
//! the controller must never disturb. This module treats the text as opaque
//! except for statements of the form:
//!
//! ```text
//! window.GLOBAL_HUE_OFFSET = 190;
//! ```
//!
//! [`parse`] extracts the current value of every schema key (falling back to
//! defaults), and [`apply`] substitutes new values in place — touching only
//! the value token between `=` and `;` — appending assignments for keys the
//! document lacks. Both are pure string functions; all I/O lives in
//! [`store`](crate::store).
//!
//! # Round-trip guarantees
//!
//! - Applying a key's current value is a textual no-op.
//! - Rewriting key K never alters any other assignment or any unrelated text.
//! - When the same key is assigned more than once, the first assignment is
//!   the one parsed and the one rewritten; later duplicates pass through
//!   untouched.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::schema::{self, KeySpec, NAMESPACE, SCHEMA, Value};
use crate::snapshot::Snapshot;

/// Matches one assignment statement: namespace dot key, `=` with any
/// surrounding whitespace, a value token, and the `;` terminator. Group 1 is
/// the key name, group 2 the value token.
static ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"{NAMESPACE}\.([A-Za-z_][A-Za-z0-9_]*)\s*=\s*([^;\n]+);"
    ))
    .expect("assignment pattern is valid")
});

/// Extract the current value of every schema key from `document`.
///
/// Total function: keys that are absent, or whose value token fails to decode
/// for the declared kind, take their schema default. The empty string parses
/// to a full default snapshot.
pub fn parse(document: &str) -> Snapshot {
    let mut snapshot = Snapshot::defaults();
    let mut seen = vec![false; SCHEMA.len()];

    for caps in ASSIGNMENT.captures_iter(document) {
        let Some(idx) = schema::lookup(&caps[1]) else {
            continue; // unknown key: preserved, never interpreted
        };
        if seen[idx] {
            continue; // first match wins
        }
        seen[idx] = true;
        if let Some(value) = Value::decode(SCHEMA[idx].kind, &caps[2]) {
            snapshot.set_at(idx, value);
        }
    }

    snapshot
}

/// Rewrite `document` so each `(key, value)` in `changes` holds.
///
/// Existing assignments get their value token substituted in place; keys with
/// no assignment are appended at the end (preceded by a newline when the
/// document does not already end with one). Everything else is preserved
/// byte-for-byte.
pub fn apply(document: &str, changes: &[(&'static KeySpec, Value)]) -> String {
    // A key repeated in `changes` resolves like repeated sets: the last
    // entry wins and the key is written once.
    let mut effective: Vec<(&'static KeySpec, Value)> = Vec::with_capacity(changes.len());
    for &(spec, value) in changes {
        match effective.iter_mut().find(|(s, _)| s.name == spec.name) {
            Some(slot) => slot.1 = value,
            None => effective.push((spec, value)),
        }
    }

    // First assignment's value-token range per changed key.
    let mut substitutions: Vec<(Range<usize>, String)> = Vec::new();
    let mut found = vec![false; effective.len()];

    for caps in ASSIGNMENT.captures_iter(document) {
        let name = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        for (slot, (spec, value)) in effective.iter().enumerate() {
            if found[slot] || spec.name != name {
                continue;
            }
            found[slot] = true;
            let token = caps.get(2).expect("value group always present");
            substitutions.push((token.range(), value.render(spec.kind)));
        }
    }

    substitutions.sort_by_key(|(range, _)| range.start);

    let mut out = String::with_capacity(document.len() + 64);
    let mut cursor = 0;
    for (range, replacement) in &substitutions {
        out.push_str(&document[cursor..range.start]);
        out.push_str(replacement);
        cursor = range.end;
    }
    out.push_str(&document[cursor..]);

    for (slot, (spec, value)) in effective.iter().enumerate() {
        if found[slot] {
            continue;
        }
        if !out.is_empty() && !out.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(&render_assignment(spec, *value));
    }

    out
}

/// A full assignment statement for `spec` holding `value`.
fn render_assignment(spec: &KeySpec, value: Value) -> String {
    format!("{NAMESPACE}.{} = {};", spec.name, value.render(spec.kind))
}
