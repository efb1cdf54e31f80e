//! Thin wrappers around `tracing` so every crate logs through the same targets.
//!
//! The CLI formatter keys its prefixes off these targets, so library code should
//! prefer these macros over calling `tracing` directly for user-facing messages.

#[doc(hidden)]
pub use tracing as __tracing;

pub const SUCCESS_TARGET: &str = "sonar::success";
pub const PRINT_TARGET: &str = "sonar::print";

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::logging::__tracing::info!($($arg)*)
    };
}

#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::logging::__tracing::info!(target: "sonar::success", $($arg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::logging::__tracing::warn!($($arg)*)
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::logging::__tracing::error!($($arg)*)
    };
}
