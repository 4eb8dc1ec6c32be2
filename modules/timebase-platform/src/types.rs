//! Hardware resource descriptions
//!
//! These types describe physical timers the way the chip wiring fixes them:
//! which register block, which interrupt line, which clock bus. They are
//! created once, usually in a `static`, and only read afterwards.

use core::fmt;

use timebase_cfg::NVIC_PRIO_BITS;

/// Identifier of a physical timer peripheral.
///
/// On STM32 parts the id is the timer number (`TimerId::new(3)` is TIM3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerId(u8);

impl TimerId {
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn raw(self) -> u8 {
        self.0
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TIM{}", self.0)
    }
}

/// Interrupt line number as seen by the platform interrupt controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IrqLine(u16);

impl IrqLine {
    pub const fn new(number: u16) -> Self {
        Self(number)
    }

    pub const fn number(self) -> u16 {
        self.0
    }
}

/// Peripheral clock bus a timer is clocked from.
///
/// Timers on different buses can run at different rates on the same chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockBus {
    Apb1,
    Apb2,
}

/// Width of a timer's counter and auto-reload register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CounterWidth {
    Bits16,
    Bits32,
}

impl CounterWidth {
    /// Largest value the auto-reload register can hold.
    pub const fn max_period(self) -> u32 {
        match self {
            CounterWidth::Bits16 => u16::MAX as u32,
            CounterWidth::Bits32 => u32::MAX,
        }
    }
}

/// Interrupt priority level.
///
/// Lower values preempt higher ones. Only the low [`NVIC_PRIO_BITS`] bits are
/// kept; [`Priority::to_nvic`] shifts them into the implemented register bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Priority(u8);

impl Priority {
    const MASK: u8 = (1 << NVIC_PRIO_BITS) - 1;

    pub const fn new(level: u8) -> Self {
        Self(level & Self::MASK)
    }

    pub const fn level(self) -> u8 {
        self.0
    }

    /// Raw value for the 8-bit NVIC priority register.
    pub const fn to_nvic(self) -> u8 {
        self.0 << (8 - NVIC_PRIO_BITS)
    }
}

/// Static description of one physical timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerInfo {
    /// timer identifier
    pub id: TimerId,
    /// register block base address (0 on platforms without memory-mapped timers)
    pub base: usize,
    /// update-event interrupt line
    pub line: IrqLine,
    /// bus the timer kernel clock comes from
    pub bus: ClockBus,
    /// counter width
    pub width: CounterWidth,
}

impl TimerInfo {
    pub const fn new(id: u8, base: usize, line: u16, bus: ClockBus, width: CounterWidth) -> Self {
        Self {
            id: TimerId::new(id),
            base,
            line: IrqLine::new(line),
            bus,
            width,
        }
    }
}

/// Read-only table of the physical timers a platform exposes.
///
/// Ids need not be contiguous; lookup is a linear scan over a handful of
/// entries.
#[derive(Debug, Clone, Copy)]
pub struct TimerCatalog {
    timers: &'static [TimerInfo],
}

impl TimerCatalog {
    pub const fn new(timers: &'static [TimerInfo]) -> Self {
        Self { timers }
    }

    pub fn get(&self, id: TimerId) -> Option<&'static TimerInfo> {
        self.timers.iter().find(|t| t.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static TimerInfo> {
        self.timers.iter()
    }

    /// Timers whose update event is routed to `line`. Several timers may
    /// share one line (TIM1 update and TIM10 on the F4 parts).
    pub fn on_line(&self, line: IrqLine) -> impl Iterator<Item = &'static TimerInfo> {
        self.timers.iter().filter(move |t| t.line == line)
    }
}
