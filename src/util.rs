//! Utility functions for general-purpose use across the application.

use std::process::ExitStatus;

/// Translate a child's exit status into the status this process reports.
///
/// A normal exit passes its code through. A child killed by a signal is
/// reported as `128 + signal`, the way a shell reports it.
///
/// # Examples
///
/// ```no_run
/// use entrypoint::util::exit_status_code;
/// use std::process::Command;
///
/// let status = Command::new("false").status().unwrap();
/// assert_eq!(exit_status_code(status), 1);
/// ```
pub fn exit_status_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}
