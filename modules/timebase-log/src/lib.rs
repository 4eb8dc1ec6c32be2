//! Logging macros for the timebase timer multiplexer
//!
//! The level macros wrap `defmt`. With the `log-base` feature off they expand
//! to nothing, so neither the format string nor the arguments are evaluated.
//! The subsystem macros (`slot_log!`, `timer_log!`, `irq_log!`, `clock_log!`) are gated
//! independently so interrupt-time logging can stay off while attach/detach
//! logging is on.
//!
//! Callers must depend on `defmt` themselves when they enable `log-base`,
//! since the expansion names `defmt::` directly.

#![no_std]

#[cfg(feature = "log-rtt")]
use defmt_rtt as _;

#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => { $crate::__log!(debug, $($arg)*) };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => { $crate::__log!(error, $($arg)*) };
}

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => { $crate::__log!(info, $($arg)*) };
}

#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => { $crate::__log!(trace, $($arg)*) };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => { $crate::__log!(warn, $($arg)*) };
}

#[cfg(feature = "log-base")]
#[doc(hidden)]
#[macro_export]
macro_rules! __log {
    ($level:ident, $($arg:tt)*) => {
        defmt::$level!($($arg)*)
    };
}

#[cfg(not(feature = "log-base"))]
#[doc(hidden)]
#[macro_export]
macro_rules! __log {
    ($level:ident, $($arg:tt)*) => {};
}

// Slot attach/detach and one-shot programming
#[cfg(feature = "log-slot")]
#[macro_export]
macro_rules! slot_log {
    ($level:ident, $($args:tt)*) => { $crate::$level!($($args)*); };
}

#[cfg(not(feature = "log-slot"))]
#[macro_export]
macro_rules! slot_log {
    ($level:ident, $($args:tt)*) => {};
}

// Timer register programming
#[cfg(feature = "log-timer")]
#[macro_export]
macro_rules! timer_log {
    ($level:ident, $($args:tt)*) => { $crate::$level!($($args)*); };
}

#[cfg(not(feature = "log-timer"))]
#[macro_export]
macro_rules! timer_log {
    ($level:ident, $($args:tt)*) => {};
}

// Interrupt line control and dispatch. Keep off in timing-sensitive builds.
#[cfg(feature = "log-irq")]
#[macro_export]
macro_rules! irq_log {
    ($level:ident, $($args:tt)*) => { $crate::$level!($($args)*); };
}

#[cfg(not(feature = "log-irq"))]
#[macro_export]
macro_rules! irq_log {
    ($level:ident, $($args:tt)*) => {};
}

// Clock tree capture and reference clock selection
#[cfg(feature = "log-clock")]
#[macro_export]
macro_rules! clock_log {
    ($level:ident, $($args:tt)*) => { $crate::$level!($($args)*); };
}

#[cfg(not(feature = "log-clock"))]
#[macro_export]
macro_rules! clock_log {
    ($level:ident, $($args:tt)*) => {};
}
