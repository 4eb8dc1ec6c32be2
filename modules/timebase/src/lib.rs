#![cfg_attr(not(test), no_std)]

//! Hardware timer interrupt multiplexer
//!
//! A fixed set of logical timer slots, each backed by one physical timer.
//! Firmware modules ask for a periodic callback at some frequency on a slot,
//! or for a one-shot callback some microseconds from now on a physical
//! timer; the multiplexer programs the timer, arms its interrupt line and
//! runs the callback from the timer's update interrupt.
//!
//! ## Organization
//!
//! - [`planner`]: frequency to (prescaler, period)
//! - [`registry`]: slot bindings, stored callbacks, timer programming
//! - [`irq`]: line control and update-event dispatch
//! - [`Timebase`]: the three above bundled over one [`Platform`]
//! - free functions (`attach_timer_interrupt`, ...) over the instance
//!   installed with [`install`]
//!
//! ## Usage
//!
//! ```ignore
//! let dp = pac::Peripherals::take().unwrap();
//! let clocks = dp.RCC.constrain().cfgr.sysclk(84.MHz()).freeze();
//! let platform = timebase_platform::init_platform(&clocks);
//! timebase::install(platform, timebase_platform::DEFAULT_BINDINGS);
//!
//! timebase::attach_timer_interrupt(0, blink, 2)?;
//! ```

#[macro_use]
extern crate timebase_log;

mod callback;
pub mod error;
#[cfg(feature = "stm32f401re")]
mod handlers;
pub mod irq;
pub mod planner;
pub mod registry;

use spin::Once;
use timebase_cfg::SLOT_COUNT;

pub use callback::Callback;
pub use error::{Result, TimebaseError};
pub use irq::{Dispatch, InterruptController};
pub use planner::{plan, Dividers, Frequency, PlanError, Regime};
pub use registry::SlotRegistry;
pub use timebase_platform::{IrqLine, Platform, TimerId};

/*
*********************************************************************************************************
*                                               Timebase
*********************************************************************************************************
*/

/// Slot registry and interrupt controller over one platform.
pub struct Timebase<'a> {
    registry: SlotRegistry<'a>,
    irq: InterruptController<'a>,
}

impl<'a> Timebase<'a> {
    /// `bindings[i]` is the physical timer backing slot `i`.
    pub fn new(platform: &'a dyn Platform, bindings: [TimerId; SLOT_COUNT]) -> Self {
        Self {
            registry: SlotRegistry::new(platform, bindings),
            irq: InterruptController::new(platform),
        }
    }

    pub fn registry(&self) -> &SlotRegistry<'a> {
        &self.registry
    }

    pub fn irq(&self) -> &InterruptController<'a> {
        &self.irq
    }

    /// See [`SlotRegistry::attach`].
    pub fn attach(&self, slot: usize, callback: Callback, frequency: Frequency) -> Result<Dividers> {
        self.registry.attach(slot, callback, frequency)
    }

    /// See [`SlotRegistry::detach`].
    pub fn detach(&self, slot: usize) -> Result<()> {
        self.registry.detach(slot)
    }

    /// See [`SlotRegistry::attach_one_shot`].
    pub fn attach_one_shot(&self, timer: TimerId, callback: Callback, delay_us: u32) -> Result<u32> {
        self.registry.attach_one_shot(timer, callback, delay_us)
    }

    pub fn disable_all(&self) {
        self.irq.global_disable(&self.registry)
    }

    pub fn enable_all(&self) {
        self.irq.global_enable(&self.registry)
    }

    /// Dispatch a pending update event of `slot`.
    pub fn isr(&self, slot: usize) -> Dispatch {
        self.irq.dispatch(&self.registry, slot)
    }

    /// Dispatch a pending update event of physical `timer`.
    pub fn on_timer_interrupt(&self, timer: TimerId) -> Dispatch {
        self.irq.on_timer_interrupt(&self.registry, timer)
    }

    /// Dispatch pending update events of every timer wired to `line`.
    pub fn on_line_interrupt(&self, line: IrqLine) -> Dispatch {
        self.irq.on_line_interrupt(&self.registry, line)
    }
}

/*
*********************************************************************************************************
*                                            global instance
*********************************************************************************************************
*/

static TIMEBASE: Once<Timebase<'static>> = Once::new();

/// Install the global instance. Only the first call has any effect; later
/// calls return the existing instance and ignore their arguments.
pub fn install(platform: &'static dyn Platform, bindings: [TimerId; SLOT_COUNT]) -> &'static Timebase<'static> {
    TIMEBASE.call_once(|| {
        info!("timebase: {} slots installed", SLOT_COUNT);
        Timebase::new(platform, bindings)
    })
}

/// The global instance.
#[inline(always)]
pub fn timebase() -> Result<&'static Timebase<'static>> {
    TIMEBASE.get().ok_or(TimebaseError::NotInstalled)
}

/// Call `callback` from `slot` at `frequency`.
///
/// Integers are taken as whole hertz; pass a [`Frequency`] for fractional
/// rates. On error the slot is left as it was.
pub fn attach_timer_interrupt(slot: usize, callback: fn(), frequency: impl Into<Frequency>) -> Result<Dividers> {
    timebase()?.attach(slot, Callback::new(callback), frequency.into())
}

/// Stop calling `slot`'s callback.
pub fn detach_timer_interrupt(slot: usize) -> Result<()> {
    timebase()?.detach(slot)
}

/// Mask the interrupt line of every slot. Does nothing before [`install`].
pub fn no_timer_interrupts() {
    if let Some(tb) = TIMEBASE.get() {
        tb.disable_all();
    }
}

/// Unmask the interrupt line of every slot. Does nothing before [`install`].
pub fn timer_interrupts() {
    if let Some(tb) = TIMEBASE.get() {
        tb.enable_all();
    }
}

/// Call `callback` once, `delay_us` microseconds from now, from `timer`.
/// Returns the bus clock the delay was computed from.
pub fn attach_timer_callback(timer: TimerId, callback: fn(), delay_us: u32) -> Result<u32> {
    timebase()?.attach_one_shot(timer, Callback::new(callback), delay_us)
}

/// Interrupt-time entry for a slot.
pub fn timebase_isr(slot: usize) -> Dispatch {
    match TIMEBASE.get() {
        Some(tb) => tb.isr(slot),
        None => Dispatch::Spurious,
    }
}

/// Interrupt-time entry for a physical timer.
pub fn on_timer_interrupt(timer: TimerId) -> Dispatch {
    match TIMEBASE.get() {
        Some(tb) => tb.on_timer_interrupt(timer),
        None => Dispatch::Spurious,
    }
}

/// Interrupt-time entry for an interrupt line; used by the vector handlers.
pub fn on_line_interrupt(line: IrqLine) -> Dispatch {
    match TIMEBASE.get() {
        Some(tb) => tb.on_line_interrupt(line),
        None => Dispatch::Spurious,
    }
}
