//! NVIC access for timer interrupt lines

use core::sync::atomic::{compiler_fence, Ordering};

use cortex_m::interrupt::InterruptNumber;
use cortex_m::peripheral::NVIC;

use crate::traits::InterruptLines;
use crate::types::{IrqLine, Priority};

#[derive(Clone, Copy)]
struct Line(u16);

// safety: catalog lines are valid vector numbers for this chip
unsafe impl InterruptNumber for Line {
    fn number(self) -> u16 {
        self.0
    }
}

impl From<IrqLine> for Line {
    fn from(line: IrqLine) -> Self {
        Line(line.number())
    }
}

/// [`InterruptLines`] backed by the Cortex-M NVIC.
pub struct Stm32Nvic {
    _private: (),
}

impl Stm32Nvic {
    pub(crate) const fn new() -> Self {
        Self { _private: () }
    }
}

impl InterruptLines for Stm32Nvic {
    fn set_priority(&self, line: IrqLine, priority: Priority) {
        irq_log!(trace, "line {} priority {}", line.number(), priority.level());
        // safety: IPR writes are single byte stores; changing the priority of
        // a line does not break any priority-based critical section here,
        // the core never uses BASEPRI
        unsafe {
            let mut nvic = cortex_m::Peripherals::steal().NVIC;
            nvic.set_priority(Line::from(line), priority.to_nvic());
        }
    }

    fn unmask(&self, line: IrqLine) {
        compiler_fence(Ordering::SeqCst);
        // safety: handlers for every catalog line are defined by the core
        unsafe { NVIC::unmask(Line::from(line)) }
    }

    fn mask(&self, line: IrqLine) {
        NVIC::mask(Line::from(line));
        compiler_fence(Ordering::SeqCst);
    }

    fn is_enabled(&self, line: IrqLine) -> bool {
        NVIC::is_enabled(Line::from(line))
    }
}
