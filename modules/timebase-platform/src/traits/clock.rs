//! Clock source query trait

use crate::types::ClockBus;

/// Read access to the clock tree.
pub trait ClockSource: Sync {
    /// Core/system clock in Hz.
    fn sysclk_hz(&self) -> u32;

    /// Peripheral bus clock (PCLKx) in Hz.
    ///
    /// This is the bus clock, not the timer kernel clock. On STM32 the timer
    /// kernel runs at twice PCLKx whenever the APB prescaler is not 1.
    fn bus_hz(&self, bus: ClockBus) -> u32;
}
