//! Hue adjustment for the standalone `hue-action` entry point.
//!
//! External automation (hotkey daemons, stream deck buttons) invokes this
//! path with a single token: `reset`, a signed-magnitude shift like `+30` or
//! `-10`, or a bare absolute value. The contract is deliberately best-effort:
//! a missing settings file or an unparseable token is a silent no-op, never
//! an error, so a calling process can fire-and-forget.
//!
//! The resulting hue is normalized into `[0, 360)` with a euclidean
//! remainder, so shifts past either end of the circle wrap.

use log::debug;

use crate::controller::{HUE_DEFAULT_KEY, HUE_KEY};
use crate::document;
use crate::error::SyncError;
use crate::schema::{self, Value};
use crate::store::{Commit, Store};

/// A parsed adjustment token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjustCommand {
    /// Restore the tracked baseline (`GLOBAL_HUE_DEFAULT`).
    Reset,
    /// Relative shift: `+N` or `-N`.
    Shift(i64),
    /// Absolute set: a bare integer.
    Set(i64),
}

impl AdjustCommand {
    /// Parse a raw token. `None` means the token is not a command — the
    /// caller no-ops, per the best-effort contract.
    pub fn parse(token: &str) -> Option<Self> {
        if token.eq_ignore_ascii_case("reset") {
            return Some(AdjustCommand::Reset);
        }
        if let Some(magnitude) = token.strip_prefix('+') {
            return magnitude.parse::<i64>().ok().map(AdjustCommand::Shift);
        }
        if let Some(magnitude) = token.strip_prefix('-') {
            return magnitude
                .parse::<i64>()
                .ok()
                .map(|m| AdjustCommand::Shift(-m));
        }
        token.parse::<i64>().ok().map(AdjustCommand::Set)
    }

    /// The hue this command lands on, given the current value and the
    /// tracked baseline, normalized into `[0, 360)`.
    pub fn target(&self, current: i64, baseline: i64) -> i64 {
        let raw = match self {
            AdjustCommand::Reset => baseline,
            AdjustCommand::Shift(delta) => current + delta,
            AdjustCommand::Set(value) => *value,
        };
        raw.rem_euclid(360)
    }
}

/// Apply `command` to the hue key in `store`'s backing file.
///
/// Returns `Ok(None)` when the file does not exist (silent no-op — this
/// entry point never creates the file). On success the commit goes through
/// the usual atomic path.
pub fn apply(store: &Store, command: AdjustCommand) -> Result<Option<Commit>, SyncError> {
    let Some(text) = store.read_document()? else {
        debug!("{} missing, hue adjustment skipped", store.path().display());
        return Ok(None);
    };

    let snapshot = document::parse(&text);
    let current = snapshot
        .get(HUE_KEY)
        .and_then(|v| v.as_int())
        .unwrap_or_default();
    let baseline = snapshot
        .get(HUE_DEFAULT_KEY)
        .and_then(|v| v.as_int())
        .unwrap_or_default();

    let next = command.target(current, baseline);
    let hue = schema::spec(HUE_KEY).expect("hue key is in the schema");
    let commit = store.commit(&[(hue, Value::Int(next))])?;
    Ok(Some(commit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn store_with(dir: &TempDir, content: &str) -> Store {
        let path = dir.path().join("settings.js");
        fs::write(&path, content).unwrap();
        Store::new(path)
    }

    #[test]
    fn parse_reset_case_insensitive() {
        assert_eq!(AdjustCommand::parse("reset"), Some(AdjustCommand::Reset));
        assert_eq!(AdjustCommand::parse("RESET"), Some(AdjustCommand::Reset));
    }

    #[test]
    fn parse_signed_shifts() {
        assert_eq!(AdjustCommand::parse("+30"), Some(AdjustCommand::Shift(30)));
        assert_eq!(AdjustCommand::parse("-10"), Some(AdjustCommand::Shift(-10)));
    }

    #[test]
    fn parse_bare_integer_is_absolute() {
        assert_eq!(AdjustCommand::parse("120"), Some(AdjustCommand::Set(120)));
        assert_eq!(AdjustCommand::parse("0"), Some(AdjustCommand::Set(0)));
    }

    #[test]
    fn parse_garbage_is_none() {
        assert_eq!(AdjustCommand::parse("sideways"), None);
        assert_eq!(AdjustCommand::parse("+abc"), None);
        assert_eq!(AdjustCommand::parse(""), None);
    }

    #[test]
    fn shift_wraps_past_360() {
        // 50 + 370 = 420, normalized to 60.
        assert_eq!(AdjustCommand::Shift(370).target(50, 0), 60);
    }

    #[test]
    fn shift_wraps_below_zero() {
        // 5 - 10 = -5, normalized to 355.
        assert_eq!(AdjustCommand::Shift(-10).target(5, 0), 355);
    }

    #[test]
    fn reset_restores_baseline_exactly() {
        assert_eq!(AdjustCommand::Reset.target(311, 190), 190);
    }

    #[test]
    fn absolute_set_is_normalized_too() {
        assert_eq!(AdjustCommand::Set(400).target(0, 0), 40);
    }

    #[test]
    fn apply_shift_rewrites_offset_only() {
        let dir = TempDir::new().unwrap();
        let store = store_with(
            &dir,
            "window.GLOBAL_HUE_OFFSET = 50;\nwindow.GLOBAL_HUE_DEFAULT = 190;\n",
        );

        let commit = apply(&store, AdjustCommand::Shift(370)).unwrap();
        assert_eq!(commit, Some(Commit::Written));

        let content = fs::read_to_string(store.path()).unwrap();
        assert!(content.contains("window.GLOBAL_HUE_OFFSET = 60;"));
        assert!(content.contains("window.GLOBAL_HUE_DEFAULT = 190;"));
    }

    #[test]
    fn apply_reset_uses_tracked_default() {
        let dir = TempDir::new().unwrap();
        let store = store_with(
            &dir,
            "window.GLOBAL_HUE_OFFSET = 50;\nwindow.GLOBAL_HUE_DEFAULT = 190;\n",
        );

        apply(&store, AdjustCommand::Reset).unwrap();
        let content = fs::read_to_string(store.path()).unwrap();
        assert!(content.contains("window.GLOBAL_HUE_OFFSET = 190;"));
    }

    #[test]
    fn apply_missing_file_is_silent_noop() {
        let dir = TempDir::new().unwrap();
        let store = Store::new(dir.path().join("settings.js"));

        let commit = apply(&store, AdjustCommand::Set(120)).unwrap();
        assert_eq!(commit, None);
        assert!(!store.path().exists());
    }

    #[test]
    fn apply_same_value_skips_write() {
        let dir = TempDir::new().unwrap();
        let store = store_with(&dir, "window.GLOBAL_HUE_OFFSET = 60;\n");

        let commit = apply(&store, AdjustCommand::Set(60)).unwrap();
        assert_eq!(commit, Some(Commit::Unchanged));
    }
}
