//! STM32F401RE timer interrupt handlers
//!
//! Each vector hands its line to [`crate::on_line_interrupt`], which serves
//! every timer the chip catalog wires to that line. The update-flag guard in
//! dispatch sorts out which of them actually overflowed.

#![allow(non_snake_case)]

use timebase_platform::chip::stm32f401re::lines;

use crate::on_line_interrupt;

/// TIM1 update and TIM10 global interrupt
#[unsafe(no_mangle)]
pub extern "C" fn TIM1_UP_TIM10() {
    irq_log!(trace, "TIM1_UP_TIM10");
    on_line_interrupt(lines::TIM1_UP_TIM10);
}

/// TIM1 break and TIM9 global interrupt
#[unsafe(no_mangle)]
pub extern "C" fn TIM1_BRK_TIM9() {
    irq_log!(trace, "TIM1_BRK_TIM9");
    on_line_interrupt(lines::TIM1_BRK_TIM9);
}

/// TIM1 trigger/commutation and TIM11 global interrupt
#[unsafe(no_mangle)]
pub extern "C" fn TIM1_TRG_COM_TIM11() {
    irq_log!(trace, "TIM1_TRG_COM_TIM11");
    on_line_interrupt(lines::TIM1_TRG_COM_TIM11);
}

#[unsafe(no_mangle)]
pub extern "C" fn TIM2() {
    irq_log!(trace, "TIM2");
    on_line_interrupt(lines::TIM2);
}

#[unsafe(no_mangle)]
pub extern "C" fn TIM3() {
    irq_log!(trace, "TIM3");
    on_line_interrupt(lines::TIM3);
}

#[unsafe(no_mangle)]
pub extern "C" fn TIM4() {
    irq_log!(trace, "TIM4");
    on_line_interrupt(lines::TIM4);
}

#[unsafe(no_mangle)]
pub extern "C" fn TIM5() {
    irq_log!(trace, "TIM5");
    on_line_interrupt(lines::TIM5);
}
