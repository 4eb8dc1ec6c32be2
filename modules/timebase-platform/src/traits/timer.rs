//! Timer register access trait
//!
//! The multiplexer only needs the update-event side of a timer: a prescaler,
//! an auto-reload period, the update interrupt enable, the update pending
//! flag and the counter enable. Capture/compare channels are out of reach on
//! purpose.

use crate::types::TimerInfo;

/// Raw register access for physical timers.
///
/// Every method addresses the timer through its catalog entry so a single
/// implementation can serve all timers on a chip. Implementations must be
/// callable from interrupt context.
pub trait TimerRegisters: Sync {
    /// Program prescaler and auto-reload value and latch both immediately.
    ///
    /// Latching must not leave the update pending flag set. The period is
    /// written as-is: a value wider than the counter is truncated by the
    /// register, not rejected here.
    fn configure_time_base(&self, timer: &TimerInfo, prescaler: u16, period: u32);

    /// Enable or disable the update-event interrupt source (DIER.UIE).
    fn set_update_interrupt(&self, timer: &TimerInfo, enabled: bool);

    /// Start or stop the counter (CR1.CEN).
    fn set_counter_enabled(&self, timer: &TimerInfo, enabled: bool);

    /// Write zero to the counter.
    fn reset_counter(&self, timer: &TimerInfo);

    /// Return the time base registers to their reset values.
    ///
    /// Stops the counter, clears every interrupt enable and pending flag,
    /// and sets prescaler 0, period = counter maximum.
    fn deinit(&self, timer: &TimerInfo);

    /// Is the update-event flag (SR.UIF) set?
    fn update_pending(&self, timer: &TimerInfo) -> bool;

    /// Clear the update-event flag without touching other flags.
    fn clear_update_pending(&self, timer: &TimerInfo);
}
