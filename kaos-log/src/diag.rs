//! Diagnostic side channel.
//!
//! Routed through `tracing` when the feature is on, stderr otherwise.

macro_rules! diag_warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "tracing")]
        tracing::warn!($($arg)*);

        #[cfg(not(feature = "tracing"))]
        eprintln!($($arg)*);
    }};
}

macro_rules! diag_error {
    ($($arg:tt)*) => {{
        #[cfg(feature = "tracing")]
        tracing::error!($($arg)*);

        #[cfg(not(feature = "tracing"))]
        eprintln!($($arg)*);
    }};
}

macro_rules! diag_debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "tracing")]
        tracing::debug!($($arg)*);
    }};
}

pub(crate) use diag_debug;
pub(crate) use diag_error;
pub(crate) use diag_warn;
