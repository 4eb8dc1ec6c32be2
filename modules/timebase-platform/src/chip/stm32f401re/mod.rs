//! STM32F401RE platform
//!
//! Timer catalog, register driver, NVIC wrapper and clock capture for the
//! STM32F401RE. TIM2..TIM5 sit on APB1, TIM1 and TIM9..TIM11 on APB2.
//! TIM2 and TIM5 have 32-bit counters.

pub mod clocks;
pub mod nvic;
pub mod platform;
pub mod timer_driver;

pub use platform::{init_platform, PlatformImpl};

use timebase_cfg::SLOT_COUNT;

use crate::types::{ClockBus, CounterWidth, TimerCatalog, TimerId, TimerInfo};

/*
*********************************************************************************************************
*                                           timer catalog
*********************************************************************************************************
*/

/// Timer interrupt lines, vector numbers from RM0368 table 38.
pub mod lines {
    use crate::types::IrqLine;

    pub const TIM1_BRK_TIM9: IrqLine = IrqLine::new(24);
    pub const TIM1_UP_TIM10: IrqLine = IrqLine::new(25);
    pub const TIM1_TRG_COM_TIM11: IrqLine = IrqLine::new(26);
    pub const TIM2: IrqLine = IrqLine::new(28);
    pub const TIM3: IrqLine = IrqLine::new(29);
    pub const TIM4: IrqLine = IrqLine::new(30);
    pub const TIM5: IrqLine = IrqLine::new(50);
}

static TIMERS: [TimerInfo; 8] = [
    TimerInfo::new(1, 0x4001_0000, lines::TIM1_UP_TIM10.number(), ClockBus::Apb2, CounterWidth::Bits16),
    TimerInfo::new(2, 0x4000_0000, lines::TIM2.number(), ClockBus::Apb1, CounterWidth::Bits32),
    TimerInfo::new(3, 0x4000_0400, lines::TIM3.number(), ClockBus::Apb1, CounterWidth::Bits16),
    TimerInfo::new(4, 0x4000_0800, lines::TIM4.number(), ClockBus::Apb1, CounterWidth::Bits16),
    TimerInfo::new(5, 0x4000_0c00, lines::TIM5.number(), ClockBus::Apb1, CounterWidth::Bits32),
    TimerInfo::new(9, 0x4001_4000, lines::TIM1_BRK_TIM9.number(), ClockBus::Apb2, CounterWidth::Bits16),
    TimerInfo::new(10, 0x4001_4400, lines::TIM1_UP_TIM10.number(), ClockBus::Apb2, CounterWidth::Bits16),
    TimerInfo::new(11, 0x4001_4800, lines::TIM1_TRG_COM_TIM11.number(), ClockBus::Apb2, CounterWidth::Bits16),
];

/// Physical timers usable by the multiplexer on this chip.
pub static CATALOG: TimerCatalog = TimerCatalog::new(&TIMERS);

/// Slot bindings used by the runtime: slots 0..=2 for user callbacks on
/// TIM3, TIM4 and TIM9, slot 3 (pulse-width input) on TIM11, slot 4 (system
/// clock) on the 32-bit TIM5. TIM2 is left free for one-shot delays.
pub const DEFAULT_BINDINGS: [TimerId; SLOT_COUNT] = [
    TimerId::new(3),
    TimerId::new(4),
    TimerId::new(9),
    TimerId::new(11),
    TimerId::new(5),
];
