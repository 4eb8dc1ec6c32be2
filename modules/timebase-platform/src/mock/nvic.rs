//! Mock interrupt controller

use core::cell::RefCell;

use critical_section::Mutex;

use crate::traits::InterruptLines;
use crate::types::{IrqLine, Priority};

const LINE_COUNT: usize = 96;

/// Snapshot of one mock interrupt line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineState {
    pub enabled: bool,
    pub priority: Option<Priority>,
}

/// Mock [`InterruptLines`].
pub struct MockNvic {
    lines: Mutex<RefCell<[LineState; LINE_COUNT]>>,
}

impl MockNvic {
    pub const fn new() -> Self {
        const OFF: LineState = LineState {
            enabled: false,
            priority: None,
        };
        Self {
            lines: Mutex::new(RefCell::new([OFF; LINE_COUNT])),
        }
    }

    pub fn state(&self, line: IrqLine) -> LineState {
        critical_section::with(|cs| self.lines.borrow_ref(cs)[line.number() as usize])
    }

    fn update(&self, line: IrqLine, f: impl FnOnce(&mut LineState)) {
        critical_section::with(|cs| f(&mut self.lines.borrow_ref_mut(cs)[line.number() as usize]))
    }
}

impl Default for MockNvic {
    fn default() -> Self {
        Self::new()
    }
}

impl InterruptLines for MockNvic {
    fn set_priority(&self, line: IrqLine, priority: Priority) {
        self.update(line, |l| l.priority = Some(priority))
    }

    fn unmask(&self, line: IrqLine) {
        self.update(line, |l| l.enabled = true)
    }

    fn mask(&self, line: IrqLine) {
        self.update(line, |l| l.enabled = false)
    }

    fn is_enabled(&self, line: IrqLine) -> bool {
        self.state(line).enabled
    }
}
