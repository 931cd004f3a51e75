//! Settings synchronization for independently-rendered browser overlays.
//!
//! A streaming setup renders several browser overlays, all styled by one
//! shared settings file (`Settings/settings.js`) that each overlay loads on
//! its own cadence. An operator tunes hue, brightness, glow toggles, and
//! goal numbers interactively; this crate is the layer that carries those
//! edits into the file without corrupting it, thrashing the disk, or letting
//! a reader observe a half-written state.
//!
//! # Design: one schema table, generic everything else
//!
//! The [`schema::SCHEMA`] table is the single source of truth for which keys
//! exist, their types, their defaults, and their formatting. The parser,
//! writer, controller, and auditor are all parameterized by that table —
//! adding a setting is one new table entry, with no per-key code anywhere.
//! (The behavior this replaces was a per-key thicket of bespoke substitution
//! blocks; the table is what keeps it from growing back.)
//!
//! # The backing file is not ours
//!
//! Overlays execute the settings file as script: it carries comments, helper
//! functions, and color tables this crate must round-trip untouched.
//! [`document`] therefore treats the text as opaque except for recognized
//! `window.KEY = value;` assignments, substituting value tokens in place and
//! appending assignments that are missing. Rewriting the same values twice
//! is a textual no-op.
//!
//! # Write discipline
//!
//! Every commit in [`store`] re-reads the on-disk text, applies only the
//! keys changed since the last successful commit, and replaces the file
//! atomically (same-directory temp file + rename). Readers see fully-old or
//! fully-new content, never an intermediate; keys this process did not touch
//! survive edits made by anyone else. One writer process is assumed — there
//! is no multi-writer locking.
//!
//! # Coalescing
//!
//! Slider input arrives faster than the file should change. The
//! [`controller::Controller`] debounces: every change lands in the in-memory
//! snapshot immediately, and the disk write fires once a quiet interval
//! passes with no further changes. Discrete toggles skip the debounce and
//! commit at once. The pending flush is a logical deadline the caller polls,
//! not a thread.
//!
//! # Tools
//!
//! Two binaries ship alongside the library:
//!
//! - `overlay-audit` — scans the overlay documents and reports which of them
//!   load the settings file and which schema keys each references, plus
//!   per-key coverage counts ([`audit`]).
//! - `hue-action` — fire-and-forget hue adjustment (`+30`, `-10`, `reset`,
//!   absolute degrees) for hotkey automation; best-effort by contract, it
//!   silently no-ops when the file is missing or the token is malformed
//!   ([`adjust`]).

pub mod adjust;
pub mod audit;
pub mod cli;
pub mod controller;
pub mod document;
pub mod error;
pub mod schema;
pub mod snapshot;
pub mod store;

pub use controller::{Controller, FlushOutcome, FlushStatus};
pub use error::SyncError;
pub use schema::{Kind, KeySpec, SCHEMA, Value};
pub use snapshot::Snapshot;
pub use store::{Commit, Store};
