//! Platform bundle trait definition

use super::{ClockSource, InterruptLines, TimerRegisters};
use crate::types::TimerCatalog;

/// Everything the multiplexer needs from a chip.
///
/// Implemented once per chip (and by the host mock). The core holds a
/// `&'static dyn Platform` and only ever stores timer ids, never copies of
/// hardware state.
pub trait Platform: Sync {
    /// Physical timers available on this chip.
    fn catalog(&self) -> &TimerCatalog;

    /// Timer register access.
    fn timers(&self) -> &dyn TimerRegisters;

    /// Clock tree queries.
    fn clocks(&self) -> &dyn ClockSource;

    /// Interrupt controller.
    fn interrupts(&self) -> &dyn InterruptLines;
}
