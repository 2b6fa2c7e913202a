//! Crate-internal logging macros
//!
//! With the `tracing` feature these forward to `tracing`; without it they
//! expand to nothing, so call sites cost nothing in the default build.
//! Only cold paths log. Never call these from the per-sample path.

macro_rules! debug_event {
    ($($arg:tt)*) => {{
        #[cfg(feature = "tracing")]
        { tracing::debug!($($arg)*); }
    }};
}

macro_rules! trace_event {
    ($($arg:tt)*) => {{
        #[cfg(feature = "tracing")]
        { tracing::trace!($($arg)*); }
    }};
}
