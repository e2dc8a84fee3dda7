//! Ctrl+C handling.
//!
//! The first interrupt sets a shared flag that the walker polls, so the scan
//! stops and the partial report is still printed. A second interrupt exits
//! immediately, for when a read is stuck and the flag is never polled.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Exit code for an interrupted run (128 + SIGINT).
pub const EXIT_CODE_INTERRUPTED: u8 = 130;

/// Set the shutdown flag. Returns `true` when it was already set, i.e. this
/// is a repeated request.
pub fn request_shutdown(flag: &AtomicBool) -> bool {
    flag.swap(true, Ordering::SeqCst)
}

/// Install the process-wide Ctrl+C handler and return its shutdown flag.
pub fn install_handler() -> Result<Arc<AtomicBool>, ctrlc::Error> {
    let flag = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&flag);
    ctrlc::set_handler(move || {
        if request_shutdown(&handler_flag) {
            eprintln!("Interrupted again, exiting now");
            std::process::exit(i32::from(EXIT_CODE_INTERRUPTED));
        }
        eprintln!("Interrupted, finishing current file... (Ctrl+C again to force)");
    })?;
    Ok(flag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_request_is_reported_as_repeat() {
        let flag = AtomicBool::new(false);
        assert!(!request_shutdown(&flag));
        assert!(flag.load(Ordering::SeqCst));
        assert!(request_shutdown(&flag));
    }
}
