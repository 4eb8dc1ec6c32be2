//! Mock platform for hardware-free testing
//!
//! Keeps a register-level model of each timer and interrupt line so tests
//! can assert exactly what the multiplexer programmed, and can simulate
//! counter overflows with [`MockPlatform::fire`].

mod clocks;
mod nvic;
mod platform;
mod timer;

pub use clocks::MockClocks;
pub use nvic::{LineState, MockNvic};
pub use platform::{MockPlatform, MOCK_CATALOG};
pub use timer::{MockTimers, TimerState};
