//! Logging macros that forward to `tracing` when the `tracing` feature is
//! enabled and expand to nothing otherwise.
//!
//! The macros are crate-private and never part of the public API:
//!
//! ```compile_fail
//! lopper::debug!("not exported");
//! ```

#[cfg(feature = "tracing")]
macro_rules! debug {
    ($($tt:tt)*) => { ::tracing::debug!($($tt)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! debug {
    ($($tt:tt)*) => {};
}

#[cfg(feature = "tracing")]
macro_rules! trace {
    ($($tt:tt)*) => { ::tracing::trace!($($tt)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace {
    ($($tt:tt)*) => {};
}

pub(crate) use {debug, trace};
