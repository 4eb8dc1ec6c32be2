//! Interrupt controller trait

use crate::types::{IrqLine, Priority};

/// Line-level control of the platform interrupt controller.
pub trait InterruptLines: Sync {
    /// Set the priority of a line. Does not change whether it is enabled.
    fn set_priority(&self, line: IrqLine, priority: Priority);

    /// Enable delivery of a line.
    fn unmask(&self, line: IrqLine);

    /// Disable delivery of a line. A pending request stays pending.
    fn mask(&self, line: IrqLine);

    /// Is delivery of the line enabled?
    fn is_enabled(&self, line: IrqLine) -> bool;
}
