//! Debug tracing shared by the interpreter and the command-line driver.


use std::sync::atomic::{AtomicBool, Ordering};


pub(crate) static DEBUG: AtomicBool = AtomicBool::new(false);

/// Turn the debug trace on or off for the whole process.
pub fn set_debug(enabled: bool) {
    DEBUG.store(enabled, Ordering::Relaxed);
}

/// Whether the debug trace is currently enabled.
pub fn debug_enabled() -> bool {
    DEBUG.load(Ordering::Relaxed)
}

// Trace goes to stderr so it never mixes with program output.
macro_rules! debug_println {
    ($($arg:tt)*) => {
        if $crate::common::DEBUG.load(::std::sync::atomic::Ordering::Relaxed) {
            eprintln!($($arg)*);
        }
    };
}

pub(crate) use debug_println;
