//! Standalone hue adjustment, safe to fire from external automation.
//!
//! Exit code is always 0 for domain-level no-ops (missing file, bad token):
//! a hotkey daemon must never see this tool "crash" because a stream setup
//! is half-installed.

use clap::Parser;
use clap::error::ErrorKind;
use log::{debug, warn};

use overlaysync::adjust;
use overlaysync::cli::HueActionArgs;
use overlaysync::store::{Store, resolve_settings_path};

fn main() {
    env_logger::init();

    let args = match HueActionArgs::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        // Structural arg errors are part of the best-effort contract.
        Err(e) => {
            debug!("ignoring unparseable invocation: {e}");
            return;
        }
    };

    let Some((command, override_path)) = args.into_command() else {
        debug!("ignoring unparseable adjustment token");
        return;
    };

    let path = resolve_settings_path(override_path.as_deref());
    let store = Store::new(path);

    match adjust::apply(&store, command) {
        Ok(Some(commit)) => debug!("hue adjustment {command:?}: {commit:?}"),
        Ok(None) => debug!("settings file missing, nothing to do"),
        // Best-effort: report and leave the prior state intact.
        Err(e) => warn!("{e}"),
    }
}
