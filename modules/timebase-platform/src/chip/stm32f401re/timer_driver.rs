/*
*********************************************************************************************************
*                                 Platform Timer Driver - STM32F401RE
*********************************************************************************************************
*/

//! STM32F401RE timer register driver
//!
//! Implements [`TimerRegisters`] for every timer in the chip catalog. All
//! timers share the same layout for CR1, DIER, SR, EGR, CNT and PSC, so they
//! are accessed through the 16-bit general purpose register block. Only the
//! auto-reload register differs: TIM2 and TIM5 are written through the
//! 32-bit block so the full period reaches the hardware.

use core::sync::atomic::{compiler_fence, Ordering};

use stm32_metapac::timer::{regs, vals, TimGp16, TimGp32};
use stm32_metapac::RCC;

use super::CATALOG;
use crate::traits::TimerRegisters;
use crate::types::{CounterWidth, TimerInfo};

/// Timer enable/disable constants for readability
const DISABLE: bool = false;
const ENABLE: bool = true;

/// Register driver for the STM32F401RE general purpose and advanced timers.
pub struct Stm32TimerRegisters {
    _private: (),
}

impl Stm32TimerRegisters {
    pub(crate) const fn new() -> Self {
        Self { _private: () }
    }

    /// Turn on the bus clock of every timer in the catalog.
    pub(crate) fn enable_clocks(&self) {
        for timer in CATALOG.iter() {
            enable_timer(timer.id.raw());
        }
    }
}

fn gp16(timer: &TimerInfo) -> TimGp16 {
    // safety: catalog base addresses are the RM0368 register block addresses
    unsafe { TimGp16::from_ptr(timer.base as *mut ()) }
}

fn gp32(timer: &TimerInfo) -> TimGp32 {
    // safety: only called for timers the catalog marks as 32-bit
    unsafe { TimGp32::from_ptr(timer.base as *mut ()) }
}

fn write_period(timer: &TimerInfo, period: u32) {
    match timer.width {
        CounterWidth::Bits16 => gp16(timer).arr().write(|w| w.set_arr(period as u16)),
        CounterWidth::Bits32 => gp32(timer).arr().write(|w| w.set_arr(period)),
    }
}

impl TimerRegisters for Stm32TimerRegisters {
    fn configure_time_base(&self, timer: &TimerInfo, prescaler: u16, period: u32) {
        timer_log!(trace, "configure {} psc={} arr={}", timer.id, prescaler, period);
        let r = gp16(timer);

        r.psc().write_value(prescaler);
        write_period(timer, period);

        // The prescaler is buffered and only loaded on an update event. Set
        // URS so the forced update below does not raise UIF, generate it,
        // then let overflows raise UIF again.
        r.cr1().modify(|w| w.set_urs(vals::Urs::COUNTERONLY));
        r.egr().write(|w| w.set_ug(true));
        r.cr1().modify(|w| w.set_urs(vals::Urs::ANYEVENT));
    }

    fn set_update_interrupt(&self, timer: &TimerInfo, enabled: bool) {
        gp16(timer).dier().modify(|w| w.set_uie(enabled));
    }

    fn set_counter_enabled(&self, timer: &TimerInfo, enabled: bool) {
        compiler_fence(Ordering::SeqCst);
        gp16(timer).cr1().modify(|w| w.set_cen(enabled));
    }

    fn reset_counter(&self, timer: &TimerInfo) {
        gp16(timer).cnt().write(|w| w.set_cnt(0));
    }

    fn deinit(&self, timer: &TimerInfo) {
        let r = gp16(timer);
        r.cr1().modify(|w| w.set_cen(DISABLE));
        r.dier().write_value(regs::DierGp16(0));
        r.cr1().write_value(regs::Cr1Gp16(0));
        r.cnt().write(|w| w.set_cnt(0));
        r.psc().write_value(0);
        write_period(timer, timer.width.max_period());
        // SR bits are rc_w0
        r.sr().write_value(regs::SrGp16(0));
    }

    fn update_pending(&self, timer: &TimerInfo) -> bool {
        gp16(timer).sr().read().uif()
    }

    fn clear_update_pending(&self, timer: &TimerInfo) {
        // Write 1 to every other flag so only UIF is cleared. A
        // read-modify-write could drop a flag set between the two accesses.
        let mut sr = regs::SrGp16(!0);
        sr.set_uif(false);
        gp16(timer).sr().write_value(sr);
    }
}

fn enable_timer(id: u8) {
    match id {
        1 => RCC.apb2enr().modify(|v| v.set_tim1en(ENABLE)),
        2 => RCC.apb1enr().modify(|v| v.set_tim2en(ENABLE)),
        3 => RCC.apb1enr().modify(|v| v.set_tim3en(ENABLE)),
        4 => RCC.apb1enr().modify(|v| v.set_tim4en(ENABLE)),
        5 => RCC.apb1enr().modify(|v| v.set_tim5en(ENABLE)),
        9 => RCC.apb2enr().modify(|v| v.set_tim9en(ENABLE)),
        10 => RCC.apb2enr().modify(|v| v.set_tim10en(ENABLE)),
        11 => RCC.apb2enr().modify(|v| v.set_tim11en(ENABLE)),
        _ => timer_log!(warn, "no clock gate for TIM{}", id),
    }
}
