//! The controller: snapshot ownership plus write coalescing.
//!
//! Interactive sliders emit change events far faster than the backing file
//! should be rewritten. The [`Controller`] absorbs every event into its
//! in-memory snapshot immediately — no event is ever dropped — and defers
//! the disk commit behind a classic debounce: each change (re)schedules a
//! flush at `now + quiet_interval`, so a burst of slider motion collapses to
//! one write after the burst ends.
//!
//! Discrete toggle events take the immediate path instead: they cancel any
//! pending flush and commit synchronously, folding in whatever continuous
//! changes had accumulated.
//!
//! The pending flush is a logical timer, not a thread or a sleep. Callers
//! drive it: [`next_deadline`](Controller::next_deadline) tells the event
//! loop when to wake, and [`poll`](Controller::poll) fires the flush once the
//! deadline has passed. Everything runs on one control flow; tests drive the
//! clock with synthetic [`Instant`]s.
//!
//! # State machine
//!
//! ```text
//! Idle --change--> PendingFlush(now + quiet)
//! PendingFlush --change--> PendingFlush(now + quiet)   (reschedule)
//! PendingFlush --deadline--> Idle                      (poll fires commit)
//! PendingFlush --toggle--> Idle                        (immediate commit)
//! ```
//!
//! While loading mode is active (initialization from disk, bulk restore),
//! change notifications mutate the snapshot but never schedule or fire
//! commits, so the file is not spuriously rewritten with transient values.

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use log::warn;

use crate::error::SyncError;
use crate::schema::{Value, SCHEMA};
use crate::snapshot::Snapshot;
use crate::store::{Commit, Store};

/// Quiet interval before a scheduled flush fires.
pub const DEFAULT_QUIET_INTERVAL: Duration = Duration::from_millis(80);

/// Key whose value tracks the reset baseline for the hue offset.
pub const HUE_KEY: &str = "GLOBAL_HUE_OFFSET";
/// The baseline [`HUE_KEY`] resets to.
pub const HUE_DEFAULT_KEY: &str = "GLOBAL_HUE_DEFAULT";

/// Operator-facing status of the last persistence attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlushStatus {
    /// No commit attempted yet.
    Ready,
    /// Last commit succeeded (or found nothing to write).
    Saved,
    /// Last commit failed; the prior on-disk content is still valid.
    Failed(String),
}

/// What a flush did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushOutcome {
    Written,
    Unchanged,
    /// The commit errored. Dirty keys are retained for the next attempt.
    Failed,
}

/// Owns the snapshot, the dirty-key set, and the pending-flush timer.
#[derive(Debug)]
pub struct Controller {
    store: Store,
    snapshot: Snapshot,
    dirty: BTreeSet<usize>,
    pending: Option<Instant>,
    quiet: Duration,
    loading: bool,
    status: FlushStatus,
}

impl Controller {
    /// Initialize from the backing file. Missing file means defaults; the
    /// load runs in loading mode so nothing is written back.
    pub fn load(store: Store) -> Result<Self, SyncError> {
        let snapshot = store.load()?;
        Ok(Controller {
            store,
            snapshot,
            dirty: BTreeSet::new(),
            pending: None,
            quiet: DEFAULT_QUIET_INTERVAL,
            loading: false,
            status: FlushStatus::Ready,
        })
    }

    /// Override the quiet interval (default [`DEFAULT_QUIET_INTERVAL`]).
    pub fn with_quiet_interval(mut self, quiet: Duration) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn status(&self) -> &FlushStatus {
        &self.status
    }

    /// Deadline of the pending flush, if one is scheduled.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending
    }

    /// Enter loading mode: change notifications update the snapshot but do
    /// not schedule or fire commits until [`finish_loading`](Self::finish_loading).
    pub fn begin_loading(&mut self) {
        self.loading = true;
    }

    pub fn finish_loading(&mut self) {
        self.loading = false;
    }

    /// Re-read the backing file, replacing the in-memory snapshot.
    pub fn reload(&mut self) -> Result<(), SyncError> {
        self.begin_loading();
        let result = self.store.load();
        self.finish_loading();
        self.snapshot = result?;
        self.dirty.clear();
        self.pending = None;
        Ok(())
    }

    /// A continuous-control change event (slider motion).
    ///
    /// The snapshot is updated unconditionally; persistence is scheduled for
    /// `now + quiet_interval`, replacing any earlier schedule. Returns `false`
    /// for keys outside the schema, which are ignored.
    pub fn change(&mut self, key: &str, value: Value, now: Instant) -> bool {
        let Some(idx) = self.snapshot.set(key, value) else {
            warn!("ignoring change for unknown key {key}");
            return false;
        };
        self.dirty.insert(idx);
        if !self.loading {
            self.pending = Some(now + self.quiet);
        }
        true
    }

    /// A discrete toggle event. Bypasses the debounce: cancels any pending
    /// flush and commits immediately, carrying along accumulated changes.
    pub fn toggle(&mut self, key: &str, on: bool, _now: Instant) -> FlushOutcome {
        let Some(idx) = self.snapshot.set(key, Value::Bool(on)) else {
            warn!("ignoring toggle for unknown key {key}");
            return FlushOutcome::Unchanged;
        };
        self.dirty.insert(idx);
        if self.loading {
            return FlushOutcome::Unchanged;
        }
        self.flush_now()
    }

    /// Fire the pending flush if its deadline has passed.
    ///
    /// Returns `None` while idle or still waiting.
    pub fn poll(&mut self, now: Instant) -> Option<FlushOutcome> {
        match self.pending {
            Some(deadline) if deadline <= now => Some(self.flush_now()),
            _ => None,
        }
    }

    /// Commit all dirty keys right now, canceling any scheduled flush.
    ///
    /// On failure the dirty set is retained so the next flush retries, and
    /// the error is surfaced through [`status`](Self::status).
    pub fn flush_now(&mut self) -> FlushOutcome {
        self.pending = None;
        let indices: Vec<usize> = self.dirty.iter().copied().collect();
        let changes = self.snapshot.select(&indices);
        match self.store.commit(&changes) {
            Ok(commit) => {
                self.dirty.clear();
                self.status = FlushStatus::Saved;
                match commit {
                    Commit::Written => FlushOutcome::Written,
                    Commit::Unchanged => FlushOutcome::Unchanged,
                }
            }
            Err(e) => {
                warn!("flush failed: {e}");
                self.status = FlushStatus::Failed(e.to_string());
                FlushOutcome::Failed
            }
        }
    }

    /// Persist the current snapshot as the new baseline: copies the hue
    /// offset into its default-tracking key, then commits immediately.
    pub fn persist_as_defaults(&mut self) -> FlushOutcome {
        if let Some(hue) = self.snapshot.get(HUE_KEY) {
            if let Some(idx) = self.snapshot.set(HUE_DEFAULT_KEY, hue) {
                self.dirty.insert(idx);
            }
        }
        self.flush_now()
    }

    /// Restore every key to its schema default and commit once.
    ///
    /// The reset itself runs in loading mode so the per-key updates cannot
    /// schedule their own flushes; a single immediate commit follows.
    pub fn restore_defaults(&mut self) -> FlushOutcome {
        self.begin_loading();
        for spec in SCHEMA {
            self.change(spec.name, spec.default, Instant::now());
        }
        self.finish_loading();
        self.flush_now()
    }
}
