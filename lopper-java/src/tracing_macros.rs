//! Logging macro that forwards to `tracing` when the `tracing` feature is
//! enabled and expands to nothing otherwise.
//!
//! The macro is crate-private and never part of the public API:
//!
//! ```compile_fail
//! lopper_java::debug!("not exported");
//! ```

#[cfg(feature = "tracing")]
macro_rules! debug {
    ($($tt:tt)*) => { ::tracing::debug!($($tt)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! debug {
    ($($tt:tt)*) => {};
}

pub(crate) use debug;
