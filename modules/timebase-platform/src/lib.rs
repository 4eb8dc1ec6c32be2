#![cfg_attr(not(test), no_std)]

//! Platform abstraction layer for the timebase timer multiplexer
//!
//! The multiplexer core never touches registers itself. It talks to the
//! hardware through the traits in [`traits`], and finds physical timers
//! through the read-only [`TimerCatalog`].
//!
//! ## Organization
//!
//! - [`traits`]: collaborator traits
//!   - [`TimerRegisters`]: prescaler/period programming, update flag, counter control
//!   - [`ClockSource`]: system and bus clock queries
//!   - [`InterruptLines`]: interrupt controller line control
//!   - [`Platform`]: bundles the above with a catalog
//! - [`types`]: timer ids, interrupt lines, clock buses, priorities, the catalog
//! - `chip::stm32f401re`: STM32F401RE implementation (feature `stm32f401re`)
//! - `mock`: register-level fake used by host tests (feature `mock`)

#[macro_use]
extern crate timebase_log;

pub mod traits;
pub mod types;

#[cfg(feature = "stm32f401re")]
pub mod chip;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use traits::{ClockSource, InterruptLines, Platform, TimerRegisters};
pub use types::{ClockBus, CounterWidth, IrqLine, Priority, TimerCatalog, TimerId, TimerInfo};

#[cfg(feature = "stm32f401re")]
pub use chip::stm32f401re::{init_platform, PlatformImpl, DEFAULT_BINDINGS};
