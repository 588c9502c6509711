//! # Launcher Module
//!
//! Runs a [`ScriptDescriptor`], one of two ways:
//!
//! 1. **Unelevated**: the interpreter is spawned detached, hidden, and never waited on.
//!    `powershell -ExecutionPolicy Bypass -File <path>`
//! 2. **Elevated**: the same command is handed to the [`Elevator`] as a single argument
//!    string with the path quoted, which on Windows ends in `ShellExecuteW("runas")`
//!    and the UAC prompt.
//!
//! Both paths are fire-and-forget. [`Launcher::launch`] logs failures and returns;
//! [`Launcher::try_launch`] hands the outcome to callers that want it.

use std::ffi::OsString;
use std::path::Path;
use log::{error, info};
use crate::error::LaunchError;
use crate::scanner::ScriptDescriptor;
use crate::system::{Elevator, NativeSystem, Spawner};

pub const DEFAULT_INTERPRETER: &str = "powershell";

/// Arguments that make PowerShell ignore the local execution policy and run a file.
pub const BYPASS_ARGS: &[&str] = &["-ExecutionPolicy", "Bypass", "-File"];

/// The program that runs scripts, and the arguments placed before the script path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpreter {
    program: String,
    arguments: Vec<String>,
}

impl Interpreter {
    pub fn new<I, S>(program: impl Into<String>, arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            arguments: arguments.into_iter().map(Into::into).collect(),
        }
    }

    /// `powershell -ExecutionPolicy Bypass -File`
    pub fn powershell() -> Self {
        Self::new(DEFAULT_INTERPRETER, BYPASS_ARGS.iter().copied())
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Argument vector for a direct spawn. The path stays a single `OsString`.
    fn spawn_args(&self, script: &Path) -> Vec<OsString> {
        self.arguments
            .iter()
            .map(OsString::from)
            .chain(std::iter::once(script.as_os_str().to_os_string()))
            .collect()
    }

    /// Flat argument string for the elevation request, e.g.
    /// `-ExecutionPolicy Bypass -File "C:\My Scripts\fix.ps1"`.
    ///
    /// The path is wrapped in double quotes so spaces do not split it.
    /// Windows paths cannot contain `"`, so no escaping is needed.
    fn elevated_args(&self, script: &Path) -> String {
        let quoted = format!("\"{}\"", script.to_string_lossy());
        self.arguments
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(quoted.as_str()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::powershell()
    }
}

/// What the OS accepted. Nothing more is ever learned about the script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Launched {
    /// Detached child started.
    Spawned { pid: u32 },
    /// The elevation request was handed to the OS.
    ElevationRequested,
}

/// Stateless: every launch is independent, nothing is tracked afterwards.
#[derive(Debug, Clone)]
pub struct Launcher<S = NativeSystem> {
    interpreter: Interpreter,
    system: S,
}

impl Launcher<NativeSystem> {
    /// PowerShell against the real OS.
    pub fn native() -> Self {
        Self::new(Interpreter::powershell(), NativeSystem)
    }
}

impl<S: Spawner + Elevator> Launcher<S> {
    pub fn new(interpreter: Interpreter, system: S) -> Self {
        Self { interpreter, system }
    }

    /// Starts the script and reports what the OS accepted. Never waits for the script.
    pub fn try_launch(&self, script: &ScriptDescriptor) -> Result<Launched, LaunchError> {
        let program = self.interpreter.program();
        if script.requires_elevation() {
            let args = self.interpreter.elevated_args(script.path());
            info!("Requesting elevation: {} {}", program, args);
            self.system.request_elevated_run(program, &args)?;
            Ok(Launched::ElevationRequested)
        } else {
            let args = self.interpreter.spawn_args(script.path());
            info!("Launching: {} {:?}", program, args);
            let pid = self.system.spawn_detached(program, &args)?;
            Ok(Launched::Spawned { pid })
        }
    }

    /// Fire-and-forget. Failures are logged, never returned.
    pub fn launch(&self, script: &ScriptDescriptor) {
        match self.try_launch(script) {
            Ok(Launched::Spawned { pid }) => info!("Started {:?} (pid {})", script.name(), pid),
            Ok(Launched::ElevationRequested) => {
                info!("Elevation requested for {:?}", script.name())
            }
            Err(e) => error!("Failed to launch {:?}: {}", script.name(), e),
        }
    }
}
