/*
*********************************************************************************************************
*                                            Slot Registry
*********************************************************************************************************
*/

//! Logical slot bindings and stored callbacks
//!
//! Each logical slot is bound to one physical timer for the lifetime of the
//! registry. Attaching a slot programs that timer and stores the callback;
//! detaching forgets the callback and stops update interrupts from the timer.
//!
//! One-shot microsecond timers bypass the slots: they address a physical
//! timer directly and keep their callback in a per-timer table.

use timebase_cfg::{
    MAX_TIMERS, ONE_SHOT_PRIORITY, ONE_SHOT_TICK_HZ, PRIMARY_SLOT_PRIORITY, SLOT_COUNT,
    SLOT_PRIORITY, TIMER_PERIPH_HZ,
};
use timebase_platform::{Platform, Priority, TimerId, TimerInfo};

use crate::callback::{Callback, CallbackCell};
use crate::error::{Result, TimebaseError};
use crate::irq::InterruptController;
use crate::planner::{self, Dividers, Frequency};

/// One logical timer slot.
struct Slot {
    /// physical timer backing this slot
    timer: TimerId,
    /// None exactly when the slot is inactive
    callback: CallbackCell,
}

/// Priority a slot's line is enabled at. Slot 0 preempts the others; the
/// rest share one level.
pub const fn slot_priority(slot: usize) -> Priority {
    if slot == 0 {
        Priority::new(PRIMARY_SLOT_PRIORITY)
    } else {
        Priority::new(SLOT_PRIORITY)
    }
}

/// Owns the slot-to-timer bindings and the stored callbacks.
pub struct SlotRegistry<'a> {
    platform: &'a dyn Platform,
    slots: [Slot; SLOT_COUNT],
    one_shot: [CallbackCell; MAX_TIMERS],
}

impl<'a> SlotRegistry<'a> {
    /// Create a registry with every slot inactive.
    ///
    /// `bindings[i]` is the physical timer backing slot `i`. Bindings are not
    /// checked against the catalog here; attaching a slot whose timer is
    /// missing fails with [`TimebaseError::UnknownTimer`].
    pub fn new(platform: &'a dyn Platform, bindings: [TimerId; SLOT_COUNT]) -> Self {
        Self {
            platform,
            slots: bindings.map(|timer| Slot {
                timer,
                callback: CallbackCell::empty(),
            }),
            one_shot: core::array::from_fn(|_| CallbackCell::empty()),
        }
    }

    fn irq(&self) -> InterruptController<'a> {
        InterruptController::new(self.platform)
    }

    /// Every slot index, in order.
    pub fn slots(&self) -> core::ops::Range<usize> {
        0..SLOT_COUNT
    }

    /// Physical timer bound to `slot`.
    pub fn binding(&self, slot: usize) -> Option<TimerId> {
        self.slots.get(slot).map(|s| s.timer)
    }

    /// Catalog entry of the timer bound to `slot`.
    pub fn timer_info(&self, slot: usize) -> Result<&'static TimerInfo> {
        let timer = self.binding(slot).ok_or(TimebaseError::InvalidSlot(slot))?;
        self.platform
            .catalog()
            .get(timer)
            .ok_or(TimebaseError::UnknownTimer(timer))
    }

    /// Catalog entries of every slot's timer, in slot order. Slots whose
    /// timer is missing from the catalog are skipped.
    pub fn bound_timers(&self) -> impl Iterator<Item = &'static TimerInfo> + '_ {
        (0..SLOT_COUNT).filter_map(|slot| self.timer_info(slot).ok())
    }

    /// Slots bound to `timer`.
    pub fn slots_on(&self, timer: TimerId) -> impl Iterator<Item = usize> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(move |(_, s)| s.timer == timer)
            .map(|(slot, _)| slot)
    }

    /// Callback stored in `slot`, if the slot is active.
    pub fn callback(&self, slot: usize) -> Option<Callback> {
        self.slots.get(slot).and_then(|s| s.callback.load())
    }

    pub fn is_active(&self, slot: usize) -> bool {
        self.callback(slot).is_some()
    }

    /// Clock the planner divides for periodic slots: the configured
    /// peripheral clock, or the system clock when none is configured.
    pub fn reference_clock_hz(&self) -> Result<u32> {
        let hz = TIMER_PERIPH_HZ.unwrap_or_else(|| self.platform.clocks().sysclk_hz());
        if hz == 0 {
            return Err(TimebaseError::ClockUnavailable);
        }
        Ok(hz)
    }

    /// Start calling `callback` at `frequency` from `slot`.
    ///
    /// On success the bound timer is programmed and counting, its update
    /// interrupt is enabled, and its line is enabled at
    /// [`slot_priority`]. Re-attaching an active slot replaces its callback
    /// and dividers.
    ///
    /// If the planner rejects `frequency` nothing changes: the slot keeps its
    /// previous callback and the timer its previous setup.
    pub fn attach(&self, slot: usize, callback: Callback, frequency: Frequency) -> Result<Dividers> {
        let timer = self.timer_info(slot)?;
        let clk = self.reference_clock_hz()?;

        let dividers = match planner::plan(frequency, clk) {
            Ok(d) => d,
            Err(err) => {
                slot_log!(warn, "slot {}: {} rejected", slot, frequency);
                return Err(err.into());
            }
        };

        slot_log!(
            debug,
            "slot {} on {}: {} -> psc {} arr {}",
            slot,
            timer.id,
            frequency,
            dividers.prescaler,
            dividers.period
        );

        // Store first so the first update event already finds the callback.
        self.slots[slot].callback.store(callback);
        // The timer now serves this slot; a leftover one-shot must not
        // capture its events.
        if let Some(cell) = self.one_shot.get(timer.id.index()) {
            cell.take();
        }

        let regs = self.platform.timers();
        regs.configure_time_base(timer, dividers.prescaler, dividers.period);
        regs.set_update_interrupt(timer, true);
        regs.set_counter_enabled(timer, true);

        self.irq().enable_line(timer.line, slot_priority(slot));

        Ok(dividers)
    }

    /// Forget `slot`'s callback and stop update interrupts from its timer.
    ///
    /// The counter keeps running and the interrupt line stays enabled. Call
    /// [`SlotRegistry::attach`] again to restart the slot.
    pub fn detach(&self, slot: usize) -> Result<()> {
        let timer = self.timer_info(slot)?;

        self.slots[slot].callback.take();
        self.platform.timers().set_update_interrupt(timer, false);

        slot_log!(debug, "slot {} detached from {}", slot, timer.id);
        Ok(())
    }

    /// Call `callback` once, `delay_us` microseconds from now, from `timer`.
    ///
    /// The timer is driven directly, without a logical slot. Its counter is
    /// clocked from the *bus* clock of the timer, which is returned so the
    /// caller can cross-check the clock setup.
    ///
    /// The measured delay is half of `delay_us` on parts whose APB prescaler
    /// is not 1: the timer kernel then runs at twice the bus clock this
    /// divides. The arithmetic is kept as it is until it has been checked
    /// against the counting semantics on hardware.
    pub fn attach_one_shot(&self, timer: TimerId, callback: Callback, delay_us: u32) -> Result<u32> {
        if delay_us == 0 {
            return Err(TimebaseError::ZeroDelay);
        }
        let info = self
            .platform
            .catalog()
            .get(timer)
            .ok_or(TimebaseError::UnknownTimer(timer))?;
        let cell = self
            .one_shot
            .get(timer.index())
            .ok_or(TimebaseError::UnknownTimer(timer))?;

        let pclk = self.platform.clocks().bus_hz(info.bus);
        if pclk == 0 {
            return Err(TimebaseError::ClockUnavailable);
        }

        let prescaler = (pclk / ONE_SHOT_TICK_HZ).wrapping_sub(1) as u16;
        let period = delay_us - 1;
        slot_log!(
            debug,
            "one-shot on {}: {} us, pclk {} Hz, psc {} arr {}",
            timer,
            delay_us,
            pclk,
            prescaler,
            period
        );

        // Quiesce the timer first: an update event latched by a previous
        // user must not reach the new callback.
        let regs = self.platform.timers();
        regs.set_counter_enabled(info, false);
        regs.deinit(info);
        regs.configure_time_base(info, prescaler, period);
        regs.reset_counter(info);
        regs.clear_update_pending(info);

        cell.store(callback);
        regs.set_update_interrupt(info, true);
        regs.set_counter_enabled(info, true);
        self.irq().enable_line(info.line, Priority::new(ONE_SHOT_PRIORITY));

        Ok(pclk)
    }

    /// Is a one-shot callback waiting on `timer`?
    pub fn has_one_shot(&self, timer: TimerId) -> bool {
        self.one_shot
            .get(timer.index())
            .is_some_and(|cell| cell.load().is_some())
    }

    pub(crate) fn take_one_shot(&self, timer: TimerId) -> Option<Callback> {
        self.one_shot.get(timer.index()).and_then(CallbackCell::take)
    }
}

#[cfg(test)]
mod tests {
    use core::sync::atomic::{AtomicUsize, Ordering};

    use timebase_platform::mock::MockPlatform;
    use timebase_platform::{
        ClockBus, ClockSource, InterruptLines, IrqLine, TimerCatalog, TimerRegisters,
    };

    use super::*;
    use crate::planner::PlanError;

    /// Interrupt controller that counts unmasks which would deliver a
    /// request at once: a timer on the line with its update flag latched
    /// and its update interrupt enabled.
    struct LatchWatch<'p> {
        inner: &'p MockPlatform,
        delivered: AtomicUsize,
    }

    impl InterruptLines for LatchWatch<'_> {
        fn set_priority(&self, line: IrqLine, priority: Priority) {
            self.inner.interrupts().set_priority(line, priority)
        }

        fn unmask(&self, line: IrqLine) {
            for timer in self.inner.catalog().on_line(line) {
                let state = self.inner.timer(timer.id);
                if state.pending && state.update_interrupt {
                    self.delivered.fetch_add(1, Ordering::SeqCst);
                }
            }
            self.inner.interrupts().unmask(line)
        }

        fn mask(&self, line: IrqLine) {
            self.inner.interrupts().mask(line)
        }

        fn is_enabled(&self, line: IrqLine) -> bool {
            self.inner.interrupts().is_enabled(line)
        }
    }

    struct WatchedPlatform<'p> {
        inner: &'p MockPlatform,
        nvic: LatchWatch<'p>,
    }

    impl<'p> WatchedPlatform<'p> {
        fn new(inner: &'p MockPlatform) -> Self {
            Self {
                inner,
                nvic: LatchWatch {
                    inner,
                    delivered: AtomicUsize::new(0),
                },
            }
        }

        fn delivered_on_unmask(&self) -> usize {
            self.nvic.delivered.load(Ordering::SeqCst)
        }
    }

    impl Platform for WatchedPlatform<'_> {
        fn catalog(&self) -> &TimerCatalog {
            self.inner.catalog()
        }

        fn timers(&self) -> &dyn TimerRegisters {
            self.inner.timers()
        }

        fn clocks(&self) -> &dyn ClockSource {
            self.inner.clocks()
        }

        fn interrupts(&self) -> &dyn InterruptLines {
            &self.nvic
        }
    }

    const BINDINGS: [TimerId; SLOT_COUNT] = [
        TimerId::new(3),
        TimerId::new(4),
        TimerId::new(9),
        TimerId::new(11),
        TimerId::new(5),
    ];

    static TICKS: AtomicUsize = AtomicUsize::new(0);

    fn tick() {
        TICKS.fetch_add(1, Ordering::SeqCst);
    }

    fn other() {}

    #[test]
    fn test_attach_programs_bound_timer() {
        let platform = MockPlatform::new();
        let registry = SlotRegistry::new(&platform, BINDINGS);

        let d = registry.attach(0, Callback::new(tick), Frequency::hz(1000)).unwrap();
        assert_eq!((d.prescaler, d.period), (20999, 3));

        let tim3 = platform.timer(TimerId::new(3));
        assert_eq!(tim3.prescaler, 20999);
        assert_eq!(tim3.period, 3);
        assert!(tim3.update_interrupt);
        assert!(tim3.counting);
        assert!(registry.is_active(0));

        let line = platform.line_of(TimerId::new(3));
        assert!(line.enabled);
        assert_eq!(line.priority, Some(Priority::new(0xe)));
    }

    #[test]
    fn test_non_primary_slots_share_lower_priority() {
        let platform = MockPlatform::new();
        let registry = SlotRegistry::new(&platform, BINDINGS);

        for slot in 1..SLOT_COUNT {
            registry.attach(slot, Callback::new(other), Frequency::hz(50)).unwrap();
            let timer = registry.binding(slot).unwrap();
            assert_eq!(platform.line_of(timer).priority, Some(Priority::new(0xf)));
        }
    }

    #[test]
    fn test_rejected_attach_changes_nothing() {
        let platform = MockPlatform::new();
        let registry = SlotRegistry::new(&platform, BINDINGS);
        registry.attach(1, Callback::new(other), Frequency::hz(10)).unwrap();
        let before = platform.timer(TimerId::new(4));

        let err = registry
            .attach(1, Callback::new(tick), Frequency::millihertz(60))
            .unwrap_err();
        assert_eq!(
            err,
            TimebaseError::Rejected(PlanError::PeriodOutOfRange { period: 66665 })
        );

        assert_eq!(platform.timer(TimerId::new(4)), before);
        assert!(registry.is_active(1));
    }

    #[test]
    fn test_rejected_attach_on_inactive_slot_stays_inactive() {
        let platform = MockPlatform::new();
        let registry = SlotRegistry::new(&platform, BINDINGS);

        assert!(registry.attach(2, Callback::new(tick), Frequency::hz(0)).is_err());
        assert!(!registry.is_active(2));
        assert_eq!(platform.timer(TimerId::new(9)).configured, 0);
        assert!(!platform.line_of(TimerId::new(9)).enabled);
    }

    #[test]
    fn test_detach_leaves_counter_and_line_running() {
        let platform = MockPlatform::new();
        let registry = SlotRegistry::new(&platform, BINDINGS);
        registry.attach(0, Callback::new(tick), Frequency::hz(100)).unwrap();

        registry.detach(0).unwrap();

        assert!(!registry.is_active(0));
        let tim3 = platform.timer(TimerId::new(3));
        assert!(!tim3.update_interrupt);
        assert!(tim3.counting);
        assert!(platform.line_of(TimerId::new(3)).enabled);
    }

    #[test]
    fn test_invalid_slot() {
        let platform = MockPlatform::new();
        let registry = SlotRegistry::new(&platform, BINDINGS);

        assert_eq!(
            registry.attach(SLOT_COUNT, Callback::new(tick), Frequency::hz(1)),
            Err(TimebaseError::InvalidSlot(SLOT_COUNT))
        );
        assert_eq!(registry.detach(7), Err(TimebaseError::InvalidSlot(7)));
    }

    #[test]
    fn test_unknown_binding() {
        let platform = MockPlatform::new();
        let mut bindings = BINDINGS;
        bindings[2] = TimerId::new(6);
        let registry = SlotRegistry::new(&platform, bindings);

        assert_eq!(
            registry.attach(2, Callback::new(tick), Frequency::hz(1)),
            Err(TimebaseError::UnknownTimer(TimerId::new(6)))
        );
        assert_eq!(registry.bound_timers().count(), SLOT_COUNT - 1);
    }

    #[test]
    fn test_zero_reference_clock() {
        let platform = MockPlatform::with_clocks(0, 42_000_000, 84_000_000);
        let registry = SlotRegistry::new(&platform, BINDINGS);

        if TIMER_PERIPH_HZ.is_none() {
            assert_eq!(
                registry.attach(0, Callback::new(tick), Frequency::hz(1)),
                Err(TimebaseError::ClockUnavailable)
            );
        }
    }

    #[test]
    fn test_one_shot_programs_microsecond_timebase() {
        let platform = MockPlatform::new();
        let registry = SlotRegistry::new(&platform, BINDINGS);
        platform.force_pending(TimerId::new(2));

        // TIM2 sits on APB1 at 42 MHz
        let pclk = registry.attach_one_shot(TimerId::new(2), Callback::new(tick), 500).unwrap();
        assert_eq!(pclk, 42_000_000);

        let tim2 = platform.timer(TimerId::new(2));
        assert_eq!(tim2.prescaler, 41);
        assert_eq!(tim2.period, 499);
        assert_eq!(tim2.counter, 0);
        assert!(!tim2.pending);
        assert!(tim2.update_interrupt);
        assert!(tim2.counting);
        assert_eq!(tim2.deinits, 1);

        let line = platform.line_of(TimerId::new(2));
        assert!(line.enabled);
        assert_eq!(line.priority, Some(Priority::new(0xd)));
        assert!(registry.has_one_shot(TimerId::new(2)));
    }

    #[test]
    fn test_one_shot_uses_the_timers_own_bus() {
        let platform = MockPlatform::new();
        platform.mock_clocks().set_bus_hz(ClockBus::Apb2, 72_000_000);
        let registry = SlotRegistry::new(&platform, BINDINGS);

        let pclk = registry.attach_one_shot(TimerId::new(10), Callback::new(tick), 20).unwrap();
        assert_eq!(pclk, 72_000_000);
        assert_eq!(platform.timer(TimerId::new(10)).prescaler, 71);
        assert_eq!(platform.timer(TimerId::new(10)).period, 19);
    }

    #[test]
    fn test_one_shot_rejects_bad_input() {
        let platform = MockPlatform::new();
        let registry = SlotRegistry::new(&platform, BINDINGS);

        assert_eq!(
            registry.attach_one_shot(TimerId::new(2), Callback::new(tick), 0),
            Err(TimebaseError::ZeroDelay)
        );
        assert_eq!(
            registry.attach_one_shot(TimerId::new(7), Callback::new(tick), 10),
            Err(TimebaseError::UnknownTimer(TimerId::new(7)))
        );
        assert!(!registry.has_one_shot(TimerId::new(2)));
    }

    #[test]
    fn test_attach_evicts_one_shot_on_same_timer() {
        let platform = MockPlatform::new();
        let registry = SlotRegistry::new(&platform, BINDINGS);

        registry.attach_one_shot(TimerId::new(4), Callback::new(other), 100).unwrap();
        registry.attach(1, Callback::new(tick), Frequency::hz(2)).unwrap();

        assert!(!registry.has_one_shot(TimerId::new(4)));
        assert_eq!(platform.line_of(TimerId::new(4)).priority, Some(Priority::new(0xf)));
    }

    static LATCHED_SHOTS: AtomicUsize = AtomicUsize::new(0);
    static LATCHED_SLOT: AtomicUsize = AtomicUsize::new(0);

    fn latched_shot() {
        LATCHED_SHOTS.fetch_add(1, Ordering::SeqCst);
    }

    fn latched_slot() {
        LATCHED_SLOT.fetch_add(1, Ordering::SeqCst);
    }

    #[test]
    fn test_one_shot_ignores_event_latched_before_arming() {
        let mock = MockPlatform::new();
        let platform = WatchedPlatform::new(&mock);
        let registry = SlotRegistry::new(&platform, BINDINGS);
        let irq = InterruptController::new(&platform);

        // slot 0 overflows while its line is masked
        registry.attach(0, Callback::new(latched_slot), Frequency::hz(1000)).unwrap();
        irq.disable_line(mock.catalog().get(TimerId::new(3)).unwrap().line);
        assert!(!mock.fire(TimerId::new(3)));
        assert!(mock.timer(TimerId::new(3)).pending);
        let delivered_before = platform.delivered_on_unmask();

        registry.attach_one_shot(TimerId::new(3), Callback::new(latched_shot), 1000).unwrap();

        assert_eq!(platform.delivered_on_unmask(), delivered_before);
        assert!(!mock.timer(TimerId::new(3)).pending);
        assert!(registry.has_one_shot(TimerId::new(3)));
        assert_eq!(irq.on_timer_interrupt(&registry, TimerId::new(3)), crate::Dispatch::Spurious);
        assert_eq!(LATCHED_SHOTS.load(Ordering::SeqCst), 0);

        // the real expiry goes to the one-shot, not to slot 0
        assert!(mock.fire(TimerId::new(3)));
        assert_eq!(irq.on_timer_interrupt(&registry, TimerId::new(3)), crate::Dispatch::Invoked);
        assert_eq!(LATCHED_SHOTS.load(Ordering::SeqCst), 1);
        assert_eq!(LATCHED_SLOT.load(Ordering::SeqCst), 0);
    }
}
