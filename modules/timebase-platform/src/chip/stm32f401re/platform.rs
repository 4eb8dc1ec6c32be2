use spin::Once;
use stm32f4xx_hal::rcc::Clocks;

use super::clocks::{store_clock_config, Stm32Clocks};
use super::nvic::Stm32Nvic;
use super::timer_driver::Stm32TimerRegisters;
use super::CATALOG;
use crate::traits::{ClockSource, InterruptLines, Platform, TimerRegisters};
use crate::types::TimerCatalog;

/// STM32F401RE platform implementation
///
/// Bundles the timer register driver, the NVIC wrapper and the captured
/// clock tree behind the [`Platform`] trait.
///
/// ## Expected clock configuration
///
/// - **SYSCLK**: 84 MHz from an 8 MHz HSE through the PLL
/// - **APB1**: 42 MHz (PCLK1), timers on APB1 are clocked at 84 MHz
/// - **APB2**: 84 MHz (PCLK2)
pub struct PlatformImpl {
    timers: Stm32TimerRegisters,
    clocks: Stm32Clocks,
    nvic: Stm32Nvic,
}

impl PlatformImpl {
    /// Capture the clock tree and enable the timer bus clocks.
    ///
    /// # Parameters
    /// - `clocks`: the frozen clock configuration from the HAL
    fn new(clocks: &Clocks) -> Self {
        store_clock_config(clocks);

        let timers = Stm32TimerRegisters::new();
        timers.enable_clocks();

        PlatformImpl {
            timers,
            clocks: Stm32Clocks::new(),
            nvic: Stm32Nvic::new(),
        }
    }
}

impl Platform for PlatformImpl {
    fn catalog(&self) -> &TimerCatalog {
        &CATALOG
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

static PLATFORM: Once<PlatformImpl> = Once::new();

/// Bring up the platform once. Later calls return the first instance and
/// ignore `clocks`.
pub fn init_platform(clocks: &Clocks) -> &'static PlatformImpl {
    PLATFORM.call_once(|| PlatformImpl::new(clocks))
}
