//! # Elevation Module
//!
//! Thin wrappers over the Windows APIs that deal with User Account Control (UAC).
//!
//! - [`is_elevated`] reads the current process token.
//! - [`shell_execute_runas`] asks the shell to start a program with the `runas` verb,
//!   which shows the native consent prompt.
//!
//! On other platforms there is no UAC: `is_elevated` is `false` and elevated runs fail
//! with [`LaunchError::Unsupported`].

use crate::error::LaunchError;

/// Checks if the current process has administrative privileges.
///
/// It opens the current process token and queries `TokenElevation`.
#[cfg(windows)]
pub fn is_elevated() -> bool {
    use windows::Win32::Foundation::{CloseHandle, HANDLE};
    use windows::Win32::Security::{
        GetTokenInformation, TokenElevation, TOKEN_ELEVATION, TOKEN_QUERY,
    };
    use windows::Win32::System::Threading::{GetCurrentProcess, OpenProcessToken};

    let mut token = HANDLE::default();
    unsafe {
        if OpenProcessToken(GetCurrentProcess(), TOKEN_QUERY, &mut token).is_err() {
            return false;
        }
        let mut elevation = TOKEN_ELEVATION::default();
        let mut size = 0;
        let queried = GetTokenInformation(
            token,
            TokenElevation,
            Some(&mut elevation as *mut _ as *mut _),
            std::mem::size_of::<TOKEN_ELEVATION>() as u32,
            &mut size,
        )
        .is_ok();
        let _ = CloseHandle(token);
        queried && elevation.TokenIsElevated != 0
    }
}

#[cfg(not(windows))]
pub fn is_elevated() -> bool {
    false
}

/// Starts `program` with `parameters` through `ShellExecuteW` and the `runas` verb.
///
/// Returns once the shell has accepted or refused the request. Whether the user
/// consented, and what the elevated process does afterwards, is never reported back.
///
/// # Safety
/// Uses `unsafe` Win32 calls. The wide strings passed to the shell are owned
/// `HSTRING`s that outlive the call.
#[cfg(windows)]
pub fn shell_execute_runas(program: &str, parameters: &str) -> Result<(), LaunchError> {
    use windows::Win32::UI::Shell::ShellExecuteW;
    use windows::Win32::UI::WindowsAndMessaging::SW_SHOWNORMAL;
    use windows::core::{HSTRING, PCWSTR, w};

    if program.contains('\0') || parameters.contains('\0') {
        return Err(LaunchError::InvalidArgument { program: program.to_string() });
    }

    let file = HSTRING::from(program);
    let params = HSTRING::from(parameters);

    let result = unsafe {
        ShellExecuteW(
            None, // Parent window (None = Desktop)
            w!("runas"),
            PCWSTR(file.as_ptr()),
            PCWSTR(params.as_ptr()),
            PCWSTR::null(), // Working directory (NULL = current)
            SW_SHOWNORMAL,
        )
    };

    // ShellExecute returns an HINSTANCE > 32 on success.
    let code = result.0 as isize;
    if code > 32 {
        Ok(())
    } else {
        Err(LaunchError::ElevationRejected { program: program.to_string(), code })
    }
}

#[cfg(not(windows))]
pub fn shell_execute_runas(_program: &str, _parameters: &str) -> Result<(), LaunchError> {
    Err(LaunchError::Unsupported)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_elevated_does_not_panic() {
        let _ = is_elevated();
    }

    #[cfg(not(windows))]
    #[test]
    fn test_runas_unsupported_off_windows() {
        let err = shell_execute_runas("powershell", "-File \"x.ps1\"").unwrap_err();
        assert!(matches!(err, LaunchError::Unsupported));
    }
}
