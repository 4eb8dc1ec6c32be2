//! Clock tree capture
//!
//! The clock tree is configured once with the HAL during platform bring-up.
//! The resulting frequencies are copied here so the timer code can read them
//! from any context without holding the HAL `Clocks` value.

use portable_atomic::{AtomicU32, Ordering};
use stm32f4xx_hal::rcc::Clocks;

use crate::traits::ClockSource;
use crate::types::ClockBus;

static SYSCLK_HZ: AtomicU32 = AtomicU32::new(0);
static PCLK1_HZ: AtomicU32 = AtomicU32::new(0);
static PCLK2_HZ: AtomicU32 = AtomicU32::new(0);

/// Store clock configuration from the HAL for timer use.
///
/// Must run before any timer is attached; until then every query returns 0.
pub fn store_clock_config(clocks: &Clocks) {
    SYSCLK_HZ.store(clocks.sysclk().raw(), Ordering::Relaxed);
    PCLK1_HZ.store(clocks.pclk1().raw(), Ordering::Relaxed);
    PCLK2_HZ.store(clocks.pclk2().raw(), Ordering::Relaxed);

    clock_log!(
        info,
        "sysclk {} Hz, pclk1 {} Hz, pclk2 {} Hz",
        clocks.sysclk().raw(),
        clocks.pclk1().raw(),
        clocks.pclk2().raw()
    );
}

/// [`ClockSource`] reading the stored clock tree.
pub struct Stm32Clocks {
    _private: (),
}

impl Stm32Clocks {
    pub(crate) const fn new() -> Self {
        Self { _private: () }
    }
}

impl ClockSource for Stm32Clocks {
    fn sysclk_hz(&self) -> u32 {
        SYSCLK_HZ.load(Ordering::Relaxed)
    }

    fn bus_hz(&self, bus: ClockBus) -> u32 {
        match bus {
            ClockBus::Apb1 => PCLK1_HZ.load(Ordering::Relaxed),
            ClockBus::Apb2 => PCLK2_HZ.load(Ordering::Relaxed),
        }
    }
}
