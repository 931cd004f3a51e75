//! Offline audit of which overlays consume which settings keys.
//!
//! No flags: scans the `Overlays` directory next to the executable and
//! prints the per-overlay report plus the per-key coverage summary. Exits 1
//! only when no overlay documents were found to scan — coverage gaps are
//! advisory, not failures.

use std::process::ExitCode;

use log::warn;

use overlaysync::audit::{self, CONSUMER_DIR};
use overlaysync::store::base_dir;

fn main() -> ExitCode {
    env_logger::init();

    let overlays_dir = base_dir().join(CONSUMER_DIR);
    let consumers = match audit::scan_consumers(&overlays_dir) {
        Ok(consumers) => consumers,
        Err(e) => {
            warn!("{e}");
            Vec::new()
        }
    };

    if consumers.is_empty() {
        println!("No overlay files found.");
        return ExitCode::FAILURE;
    }

    print!("{}", audit::audit(&consumers));
    ExitCode::SUCCESS
}
