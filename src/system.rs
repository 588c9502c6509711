use std::ffi::OsString;
use std::process::{Command, Stdio};
use crate::elevation;
use crate::error::LaunchError;

/// Starts a process in the background without waiting for it.
pub trait Spawner {
    /// Spawns `program` with `args`, hidden and with stdio detached.
    ///
    /// Returns the child's pid. The child is never waited on.
    fn spawn_detached(&self, program: &str, args: &[OsString]) -> Result<u32, LaunchError>;
}

/// Asks the OS to run a program with elevated rights.
///
/// Implementations return once the request was handed to the OS. The user's answer
/// to the consent prompt is not observable.
pub trait Elevator {
    fn request_elevated_run(&self, program: &str, args: &str) -> Result<(), LaunchError>;
}

/// The real OS (Production).
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeSystem;

impl Spawner for NativeSystem {
    fn spawn_detached(&self, program: &str, args: &[OsString]) -> Result<u32, LaunchError> {
        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            use windows::Win32::System::Threading::CREATE_NO_WINDOW;
            cmd.creation_flags(CREATE_NO_WINDOW.0);
        }

        let child = cmd.spawn().map_err(|source| LaunchError::Spawn {
            program: program.to_string(),
            source,
        })?;
        // Dropping the handle does not kill the child; it simply runs on unobserved.
        Ok(child.id())
    }
}

impl Elevator for NativeSystem {
    fn request_elevated_run(&self, program: &str, args: &str) -> Result<(), LaunchError> {
        elevation::shell_execute_runas(program, args)
    }
}

/// A Mock System for Testing. Records every request instead of touching the OS.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockSystem {
    pub spawned: std::sync::Mutex<Vec<(String, Vec<OsString>)>>,
    pub elevated: std::sync::Mutex<Vec<(String, String)>>,
    /// When set, every request fails as if the interpreter were missing.
    pub fail: bool,
}

#[cfg(test)]
impl MockSystem {
    pub fn failing() -> Self {
        Self { fail: true, ..Default::default() }
    }
}

#[cfg(test)]
impl Spawner for MockSystem {
    fn spawn_detached(&self, program: &str, args: &[OsString]) -> Result<u32, LaunchError> {
        if self.fail {
            return Err(LaunchError::Spawn {
                program: program.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "mock: not found"),
            });
        }
        let mut spawned = self.spawned.lock().unwrap();
        spawned.push((program.to_string(), args.to_vec()));
        Ok(1000 + spawned.len() as u32)
    }
}

#[cfg(test)]
impl Elevator for MockSystem {
    fn request_elevated_run(&self, program: &str, args: &str) -> Result<(), LaunchError> {
        if self.fail {
            return Err(LaunchError::ElevationRejected { program: program.to_string(), code: 5 });
        }
        self.elevated.lock().unwrap().push((program.to_string(), args.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_program_is_spawn_error() {
        let err = NativeSystem
            .spawn_detached("scriptdeck-no-such-interpreter", &[])
            .unwrap_err();
        assert!(matches!(
            err,
            LaunchError::Spawn { ref program, .. } if program == "scriptdeck-no-such-interpreter"
        ));
    }
}
