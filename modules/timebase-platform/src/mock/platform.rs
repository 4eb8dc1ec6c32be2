//! Mock Platform implementation for testing

use super::{LineState, MockClocks, MockNvic, MockTimers, TimerState};
use crate::traits::{ClockSource, InterruptLines, Platform, TimerRegisters};
use crate::types::{ClockBus, CounterWidth, TimerCatalog, TimerId, TimerInfo};

// Same ids, lines, buses and widths as the STM32F401RE, without addresses.
static MOCK_TIMERS: [TimerInfo; 8] = [
    TimerInfo::new(1, 0, 25, ClockBus::Apb2, CounterWidth::Bits16),
    TimerInfo::new(2, 0, 28, ClockBus::Apb1, CounterWidth::Bits32),
    TimerInfo::new(3, 0, 29, ClockBus::Apb1, CounterWidth::Bits16),
    TimerInfo::new(4, 0, 30, ClockBus::Apb1, CounterWidth::Bits16),
    TimerInfo::new(5, 0, 50, ClockBus::Apb1, CounterWidth::Bits32),
    TimerInfo::new(9, 0, 24, ClockBus::Apb2, CounterWidth::Bits16),
    TimerInfo::new(10, 0, 25, ClockBus::Apb2, CounterWidth::Bits16),
    TimerInfo::new(11, 0, 26, ClockBus::Apb2, CounterWidth::Bits16),
];

/// Catalog used by [`MockPlatform`].
pub static MOCK_CATALOG: TimerCatalog = TimerCatalog::new(&MOCK_TIMERS);

/// Mock Platform implementation
///
/// Provides register-level fakes for hardware-free testing. The default
/// clock tree matches an STM32F401RE at 84 MHz: PCLK1 42 MHz, PCLK2 84 MHz.
///
/// # Example
///
/// ```ignore
/// use timebase_platform::mock::MockPlatform;
/// use timebase_platform::{Platform, TimerId, TimerRegisters};
///
/// let platform = MockPlatform::new();
/// let tim3 = platform.catalog().get(TimerId::new(3)).unwrap();
/// platform.timers().set_counter_enabled(tim3, true);
/// assert!(platform.timer(TimerId::new(3)).counting);
/// ```
pub struct MockPlatform {
    timers: MockTimers,
    clocks: MockClocks,
    nvic: MockNvic,
}

impl MockPlatform {
    pub const SYSCLK_HZ: u32 = 84_000_000;
    pub const PCLK1_HZ: u32 = 42_000_000;
    pub const PCLK2_HZ: u32 = 84_000_000;

    /// Create a new mock platform
    pub const fn new() -> Self {
        Self::with_clocks(Self::SYSCLK_HZ, Self::PCLK1_HZ, Self::PCLK2_HZ)
    }

    pub const fn with_clocks(sysclk_hz: u32, apb1_hz: u32, apb2_hz: u32) -> Self {
        Self {
            timers: MockTimers::new(),
            clocks: MockClocks::new(sysclk_hz, apb1_hz, apb2_hz),
            nvic: MockNvic::new(),
        }
    }

    pub fn mock_clocks(&self) -> &MockClocks {
        &self.clocks
    }

    fn info(&self, id: TimerId) -> &'static TimerInfo {
        match MOCK_CATALOG.get(id) {
            Some(info) => info,
            None => panic!("{} is not in the mock catalog", id),
        }
    }

    /// Register snapshot of a timer.
    ///
    /// # Panics
    /// If `id` is not in [`MOCK_CATALOG`].
    pub fn timer(&self, id: TimerId) -> TimerState {
        self.timers.state(self.info(id))
    }

    /// State of the interrupt line a timer is wired to.
    pub fn line_of(&self, id: TimerId) -> LineState {
        self.nvic.state(self.info(id).line)
    }

    /// Simulate a counter overflow.
    ///
    /// Sets the update flag if the counter is running and returns whether the
    /// interrupt controller would deliver the interrupt: update interrupt
    /// enabled in the timer and line unmasked.
    pub fn fire(&self, id: TimerId) -> bool {
        let info = self.info(id);
        let raised = self.timers.update(info, |t| {
            if t.counting {
                t.pending = true;
            }
            t.pending && t.update_interrupt
        });
        raised && self.nvic.state(info.line).enabled
    }

    /// Set the update flag regardless of counter state, as a stray event would.
    pub fn force_pending(&self, id: TimerId) {
        self.timers.update(self.info(id), |t| t.pending = true)
    }
}

impl Default for MockPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for MockPlatform {
    fn catalog(&self) -> &TimerCatalog {
        &MOCK_CATALOG
    }

    fn timers(&self) -> &dyn TimerRegisters {
        &self.timers
    }

    fn clocks(&self) -> &dyn ClockSource {
        &self.clocks
    }

    fn interrupts(&self) -> &dyn InterruptLines {
        &self.nvic
    }
}
