//! Errors at the process boundary.
//!
//! None of these are fatal. `Launcher::launch` logs them and the menu carries on.

use thiserror::Error;

#[derive(Debug, Error)]
#[cfg_attr(not(windows), allow(dead_code))]
pub enum LaunchError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// `ShellExecuteW` returned a code <= 32 (e.g. 5 = access denied, also seen when
    /// the user declines UAC).
    #[error("elevation request for {program} was rejected (ShellExecute code {code})")]
    ElevationRejected { program: String, code: isize },

    #[error("argument for {program} contains an interior NUL")]
    InvalidArgument { program: String },

    #[error("elevated launch is not supported on this platform")]
    Unsupported,
}
