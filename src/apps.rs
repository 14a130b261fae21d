//! Application termination boundary.
//!
//! Closing an application means forcefully terminating every process whose
//! image name matches. Errors are suppressed: the user hears the same
//! confirmation whether or not anything was actually running.

use sysinfo::{ProcessesToUpdate, System};
use tracing::debug;

/// Closes desktop applications by process image name.
pub trait AppControl: Send {
    /// Issue a forceful termination request to every matching process.
    /// Best-effort; returns how many requests were issued.
    fn terminate(&self, app_name: &str) -> usize;
}

/// Process-table backed implementation.
#[derive(Debug, Default)]
pub struct ProcessKiller;

impl AppControl for ProcessKiller {
    fn terminate(&self, app_name: &str) -> usize {
        let needle = app_name.trim().to_lowercase();
        if needle.is_empty() {
            return 0;
        }

        let mut system = System::new();
        system.refresh_processes(ProcessesToUpdate::All, true);

        let mut signalled = 0;
        for process in system.processes().values() {
            if image_name_matches(&process.name().to_string_lossy(), &needle)
                && process.kill()
            {
                signalled += 1;
            }
        }

        debug!("terminate \"{needle}\": {signalled} process(es) signalled");
        signalled
    }
}

/// Match a process image name against the spoken application name.
/// Case-insensitive; a trailing `.exe` on the image is ignored.
fn image_name_matches(image: &str, needle: &str) -> bool {
    let image = image.to_lowercase();
    let stem = image.strip_suffix(".exe").unwrap_or(&image);
    stem == needle || stem.starts_with(needle)
}
