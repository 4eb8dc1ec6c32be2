//! Mock timer registers

use core::cell::RefCell;

use critical_section::Mutex;
use timebase_cfg::MAX_TIMERS;

use crate::traits::TimerRegisters;
use crate::types::TimerInfo;

/// Snapshot of one mock timer's registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerState {
    pub prescaler: u16,
    pub period: u32,
    pub update_interrupt: bool,
    pub counting: bool,
    pub counter: u32,
    pub pending: bool,
    /// number of `configure_time_base` calls
    pub configured: u32,
    /// number of `deinit` calls
    pub deinits: u32,
}

impl TimerState {
    const RESET: TimerState = TimerState {
        prescaler: 0,
        period: u16::MAX as u32,
        update_interrupt: false,
        counting: false,
        counter: 0,
        pending: false,
        configured: 0,
        deinits: 0,
    };
}

impl Default for TimerState {
    fn default() -> Self {
        Self::RESET
    }
}

/// Mock [`TimerRegisters`] indexed by timer id.
pub struct MockTimers {
    state: Mutex<RefCell<[TimerState; MAX_TIMERS]>>,
}

impl MockTimers {
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(RefCell::new([TimerState::RESET; MAX_TIMERS])),
        }
    }

    pub fn state(&self, timer: &TimerInfo) -> TimerState {
        critical_section::with(|cs| self.state.borrow_ref(cs)[timer.id.index()])
    }

    pub(crate) fn update<R>(&self, timer: &TimerInfo, f: impl FnOnce(&mut TimerState) -> R) -> R {
        critical_section::with(|cs| f(&mut self.state.borrow_ref_mut(cs)[timer.id.index()]))
    }
}

impl Default for MockTimers {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerRegisters for MockTimers {
    fn configure_time_base(&self, timer: &TimerInfo, prescaler: u16, period: u32) {
        let max = timer.width.max_period();
        self.update(timer, |t| {
            t.prescaler = prescaler;
            // the register keeps only as many bits as the counter has
            t.period = period & max;
            t.counter = 0;
            t.configured += 1;
        })
    }

    fn set_update_interrupt(&self, timer: &TimerInfo, enabled: bool) {
        self.update(timer, |t| t.update_interrupt = enabled)
    }

    fn set_counter_enabled(&self, timer: &TimerInfo, enabled: bool) {
        self.update(timer, |t| t.counting = enabled)
    }

    fn reset_counter(&self, timer: &TimerInfo) {
        self.update(timer, |t| t.counter = 0)
    }

    fn deinit(&self, timer: &TimerInfo) {
        let max = timer.width.max_period();
        self.update(timer, |t| {
            *t = TimerState {
                period: max,
                configured: t.configured,
                deinits: t.deinits + 1,
                ..TimerState::RESET
            };
        })
    }

    fn update_pending(&self, timer: &TimerInfo) -> bool {
        self.update(timer, |t| t.pending)
    }

    fn clear_update_pending(&self, timer: &TimerInfo) {
        self.update(timer, |t| t.pending = false)
    }
}
