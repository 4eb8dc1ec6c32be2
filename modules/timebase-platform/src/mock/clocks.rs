//! Mock clock tree

use portable_atomic::{AtomicU32, Ordering};

use crate::traits::ClockSource;
use crate::types::ClockBus;

/// Mock [`ClockSource`] with settable frequencies.
pub struct MockClocks {
    sysclk: AtomicU32,
    apb1: AtomicU32,
    apb2: AtomicU32,
}

impl MockClocks {
    pub const fn new(sysclk_hz: u32, apb1_hz: u32, apb2_hz: u32) -> Self {
        Self {
            sysclk: AtomicU32::new(sysclk_hz),
            apb1: AtomicU32::new(apb1_hz),
            apb2: AtomicU32::new(apb2_hz),
        }
    }

    pub fn set_sysclk_hz(&self, hz: u32) {
        clock_log!(debug, "mock sysclk {} Hz", hz);
        self.sysclk.store(hz, Ordering::Relaxed);
    }

    pub fn set_bus_hz(&self, bus: ClockBus, hz: u32) {
        clock_log!(debug, "mock bus clock {} Hz", hz);
        match bus {
            ClockBus::Apb1 => self.apb1.store(hz, Ordering::Relaxed),
            ClockBus::Apb2 => self.apb2.store(hz, Ordering::Relaxed),
        }
    }
}

impl ClockSource for MockClocks {
    fn sysclk_hz(&self) -> u32 {
        self.sysclk.load(Ordering::Relaxed)
    }

    fn bus_hz(&self, bus: ClockBus) -> u32 {
        match bus {
            ClockBus::Apb1 => self.apb1.load(Ordering::Relaxed),
            ClockBus::Apb2 => self.apb2.load(Ordering::Relaxed),
        }
    }
}
