#![no_std]

//! Configuration constants for the timebase timer multiplexer
//!
//! Everything here is fixed at build time. The reference clock used to plan
//! periodic slots is picked with the `timer-clock-*` features; see [`clock`].

/// reference clock selection
mod clock;

/*
*********************************************************************************************************
*                                              slot table
*********************************************************************************************************
*/

/// Number of logical timer slots.
///
/// Slots 0..=2 are for user callbacks, slot 3 is reserved for pulse-width
/// input capture and slot 4 for the system clock.
pub const SLOT_COUNT: usize = 5;

/// Size of the per-physical-timer callback table used by one-shot timers.
/// Timer ids index into it directly, so it bounds the largest usable id.
pub const MAX_TIMERS: usize = 18;

/*
*********************************************************************************************************
*                                              planner
*********************************************************************************************************
*/

/// Requests at or above this rate run the counter without a prescaler.
pub const HIGH_REGIME_MIN_HZ: u32 = 2000;

/// Counter rate after prescaling in the low-frequency regime.
///
/// period = 2 gives 2 kHz, period = 0xffff gives ~0.061 Hz.
pub const LOW_REGIME_BASE_HZ: u32 = 4000;

/// Largest auto-reload value accepted in the low-frequency regime.
pub const MAX_PERIOD: u32 = 0xffff;

/// Smallest auto-reload value accepted in the low-frequency regime.
pub const MIN_PERIOD: u32 = 1;

/// Counter rate of one-shot microsecond timers.
pub const ONE_SHOT_TICK_HZ: u32 = 1_000_000;

/*
*********************************************************************************************************
*                                              priorities
*********************************************************************************************************
*/

/// NVIC priority of slot 0 (lower value preempts higher).
pub const PRIMARY_SLOT_PRIORITY: u8 = 0xe;

/// NVIC priority of every slot other than 0.
pub const SLOT_PRIORITY: u8 = 0xf;

/// NVIC priority of one-shot microsecond timers.
pub const ONE_SHOT_PRIORITY: u8 = 0xd;

/// Number of implemented NVIC priority bits. Priorities are stored in the
/// upper bits of the 8-bit priority register.
pub const NVIC_PRIO_BITS: u8 = 4;

/// Reference clock for periodic slots, in Hz.
///
/// `None` means "ask the clock source for the system clock at attach time".
pub const TIMER_PERIPH_HZ: Option<u32> = clock::TIMER_PERIPH_HZ;
