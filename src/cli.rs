//! Clap adapter for the `hue-action` entry point.
//!
//! The adapter is the only place clap types appear; it converts parsed
//! arguments into the framework-agnostic [`AdjustCommand`], and all logic
//! downstream of that is clap-free (see [`adjust`](crate::adjust)).
//!
//! `hue-action` takes no flags, only positionals, because it is invoked by
//! external automation that composes a fixed command line:
//!
//! ```text
//! hue-action +30
//! hue-action reset /path/to/Settings
//! ```

use std::path::PathBuf;

use clap::Parser;

use crate::adjust::AdjustCommand;

/// Positional arguments for `hue-action`.
#[derive(Debug, Parser)]
#[command(name = "hue-action", about = "Adjust the shared overlay hue offset")]
pub struct HueActionArgs {
    /// `reset`, a signed shift (`+30` / `-10`), or an absolute hue in degrees.
    #[arg(allow_hyphen_values = true)]
    pub value: Option<String>,

    /// Settings file or directory override (default: `Settings/settings.js`
    /// next to the executable).
    pub settings: Option<PathBuf>,
}

impl HueActionArgs {
    /// Convert parsed args into a command and the optional path override.
    ///
    /// A missing value token defaults to `0` (absolute set), matching the
    /// historical invocation contract. Returns `None` when the token is not
    /// parseable — the caller no-ops silently.
    pub fn into_command(self) -> Option<(AdjustCommand, Option<PathBuf>)> {
        let token = self.value.unwrap_or_else(|| "0".to_string());
        let command = AdjustCommand::parse(&token)?;
        Some((command, self.settings))
    }
}
