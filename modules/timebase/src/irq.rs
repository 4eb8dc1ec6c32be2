/*
*********************************************************************************************************
*                                         Interrupt Control Plane
*********************************************************************************************************
*/

//! Interrupt line control and update-event dispatch
//!
//! Dispatch is guarded by the timer's update flag: several timers can share
//! one interrupt line, so a handler runs the dispatch for every timer wired
//! to its line and only the ones that actually overflowed do any work.

use timebase_platform::{IrqLine, Platform, Priority, TimerId};

use crate::registry::SlotRegistry;

/// Outcome of one dispatch.
///
/// Ordered by how much work was done, so the outcome of several dispatches
/// from one handler is their maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dispatch {
    /// update flag was clear; nothing touched
    Spurious,
    /// flag cleared, no callback stored
    Discarded,
    /// flag cleared and the callback ran
    Invoked,
}

pub struct InterruptController<'a> {
    platform: &'a dyn Platform,
}

impl<'a> InterruptController<'a> {
    pub const fn new(platform: &'a dyn Platform) -> Self {
        Self { platform }
    }

    /// Set the line's priority, then unmask it.
    pub fn enable_line(&self, line: IrqLine, priority: Priority) {
        irq_log!(trace, "line {} on at priority {}", line.number(), priority.level());
        let lines = self.platform.interrupts();
        lines.set_priority(line, priority);
        lines.unmask(line);
    }

    pub fn disable_line(&self, line: IrqLine) {
        irq_log!(trace, "line {} masked", line.number());
        self.platform.interrupts().mask(line);
    }

    /// Unmask without touching the priority.
    pub fn unmask_line(&self, line: IrqLine) {
        self.platform.interrupts().unmask(line);
    }

    /// Mask the line of every slot, active or not.
    ///
    /// Update flags keep latching while masked; the pending events are
    /// delivered once [`InterruptController::global_enable`] runs.
    pub fn global_disable(&self, registry: &SlotRegistry<'_>) {
        for timer in registry.bound_timers() {
            self.disable_line(timer.line);
        }
    }

    /// Unmask the line of every slot. Priorities are left as they are.
    pub fn global_enable(&self, registry: &SlotRegistry<'_>) {
        for timer in registry.bound_timers() {
            self.unmask_line(timer.line);
        }
    }

    /// Service an update event for `slot`.
    pub fn dispatch(&self, registry: &SlotRegistry<'_>, slot: usize) -> Dispatch {
        let Ok(timer) = registry.timer_info(slot) else {
            return Dispatch::Spurious;
        };

        let regs = self.platform.timers();
        if !regs.update_pending(timer) {
            return Dispatch::Spurious;
        }
        regs.clear_update_pending(timer);

        match registry.callback(slot) {
            Some(callback) => {
                callback.invoke();
                Dispatch::Invoked
            }
            None => {
                irq_log!(trace, "slot {}: update with no callback", slot);
                Dispatch::Discarded
            }
        }
    }

    /// Service an update event of a one-shot timer.
    ///
    /// The timer is stopped and its callback consumed before the callback
    /// runs, so the callback may arm a new one-shot on the same timer.
    pub fn dispatch_one_shot(&self, registry: &SlotRegistry<'_>, timer: TimerId) -> Dispatch {
        let Some(info) = self.platform.catalog().get(timer) else {
            return Dispatch::Spurious;
        };

        let regs = self.platform.timers();
        if !regs.update_pending(info) {
            return Dispatch::Spurious;
        }
        regs.clear_update_pending(info);

        match registry.take_one_shot(timer) {
            Some(callback) => {
                regs.set_update_interrupt(info, false);
                regs.set_counter_enabled(info, false);
                callback.invoke();
                Dispatch::Invoked
            }
            None => Dispatch::Discarded,
        }
    }

    /// Route an update event of physical `timer`.
    ///
    /// A pending one-shot owns the timer; otherwise every slot bound to it
    /// is dispatched.
    pub fn on_timer_interrupt(&self, registry: &SlotRegistry<'_>, timer: TimerId) -> Dispatch {
        if registry.has_one_shot(timer) {
            return self.dispatch_one_shot(registry, timer);
        }

        registry
            .slots_on(timer)
            .map(|slot| self.dispatch(registry, slot))
            .max()
            .unwrap_or(Dispatch::Spurious)
    }

    /// Route a request on interrupt `line` to every timer the catalog wires
    /// to it. Each timer is dispatched even after another one did work.
    pub fn on_line_interrupt(&self, registry: &SlotRegistry<'_>, line: IrqLine) -> Dispatch {
        self.platform
            .catalog()
            .on_line(line)
            .map(|timer| self.on_timer_interrupt(registry, timer.id))
            .max()
            .unwrap_or(Dispatch::Spurious)
    }
}

#[cfg(test)]
mod tests {
    use core::sync::atomic::{AtomicUsize, Ordering};

    use timebase_cfg::SLOT_COUNT;
    use timebase_platform::mock::{MockPlatform, TimerState};
    use timebase_platform::InterruptLines;

    use super::*;
    use crate::callback::Callback;
    use crate::planner::Frequency;

    const BINDINGS: [TimerId; SLOT_COUNT] = [
        TimerId::new(3),
        TimerId::new(4),
        TimerId::new(9),
        TimerId::new(11),
        TimerId::new(5),
    ];

    static SLOT0_CALLS: AtomicUsize = AtomicUsize::new(0);
    static DETACHED_CALLS: AtomicUsize = AtomicUsize::new(0);
    static ONE_SHOT_CALLS: AtomicUsize = AtomicUsize::new(0);
    static SHARED_CALLS: AtomicUsize = AtomicUsize::new(0);

    fn slot0() {
        SLOT0_CALLS.fetch_add(1, Ordering::SeqCst);
    }

    fn detached() {
        DETACHED_CALLS.fetch_add(1, Ordering::SeqCst);
    }

    fn one_shot() {
        ONE_SHOT_CALLS.fetch_add(1, Ordering::SeqCst);
    }

    fn shared() {
        SHARED_CALLS.fetch_add(1, Ordering::SeqCst);
    }

    fn noop() {}

    #[test]
    fn test_dispatch_invokes_and_clears_flag() {
        let platform = MockPlatform::new();
        let registry = SlotRegistry::new(&platform, BINDINGS);
        let irq = InterruptController::new(&platform);
        registry.attach(0, Callback::new(slot0), Frequency::hz(1000)).unwrap();

        assert!(platform.fire(TimerId::new(3)));
        assert_eq!(irq.dispatch(&registry, 0), Dispatch::Invoked);
        assert_eq!(SLOT0_CALLS.load(Ordering::SeqCst), 1);
        assert!(!platform.timer(TimerId::new(3)).pending);

        // nothing pending any more
        assert_eq!(irq.dispatch(&registry, 0), Dispatch::Spurious);
        assert_eq!(SLOT0_CALLS.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_detached_slot_discards_event() {
        let platform = MockPlatform::new();
        let registry = SlotRegistry::new(&platform, BINDINGS);
        let irq = InterruptController::new(&platform);
        registry.attach(2, Callback::new(detached), Frequency::hz(5)).unwrap();
        registry.detach(2).unwrap();

        // a late event latched before detach
        platform.force_pending(TimerId::new(9));
        assert_eq!(irq.dispatch(&registry, 2), Dispatch::Discarded);
        assert!(!platform.timer(TimerId::new(9)).pending);
        assert_eq!(DETACHED_CALLS.load(Ordering::SeqCst), 0);

        // update interrupt is off, so the next overflow is not delivered
        assert!(!platform.fire(TimerId::new(9)));
    }

    #[test]
    fn test_spurious_dispatch_touches_nothing() {
        let platform = MockPlatform::new();
        let registry = SlotRegistry::new(&platform, BINDINGS);
        let irq = InterruptController::new(&platform);

        assert_eq!(irq.dispatch(&registry, 1), Dispatch::Spurious);
        assert_eq!(irq.dispatch(&registry, SLOT_COUNT), Dispatch::Spurious);
        assert_eq!(platform.timer(TimerId::new(4)), TimerState::default());
    }

    #[test]
    fn test_global_disable_suppresses_every_slot() {
        let platform = MockPlatform::new();
        let registry = SlotRegistry::new(&platform, BINDINGS);
        let irq = InterruptController::new(&platform);
        for slot in registry.slots() {
            registry.attach(slot, Callback::new(noop), Frequency::hz(100)).unwrap();
        }

        irq.global_disable(&registry);
        for timer in BINDINGS {
            assert!(!platform.fire(timer), "{} still delivered", timer);
            // the event stays latched in the timer
            assert!(platform.timer(timer).pending);
        }

        irq.global_enable(&registry);
        for (slot, timer) in BINDINGS.into_iter().enumerate() {
            let line = platform.line_of(timer);
            assert!(line.enabled);
            assert_eq!(line.priority, Some(crate::registry::slot_priority(slot)));
            assert!(platform.fire(timer));
        }
    }

    #[test]
    fn test_global_disable_covers_inactive_slots() {
        let platform = MockPlatform::new();
        let registry = SlotRegistry::new(&platform, BINDINGS);
        let irq = InterruptController::new(&platform);
        registry.attach(4, Callback::new(noop), Frequency::hz(1)).unwrap();
        platform.interrupts().unmask(platform.catalog().get(TimerId::new(11)).unwrap().line);

        irq.global_disable(&registry);

        assert!(!platform.line_of(TimerId::new(5)).enabled);
        assert!(!platform.line_of(TimerId::new(11)).enabled);
    }

    #[test]
    fn test_one_shot_fires_once() {
        let platform = MockPlatform::new();
        let registry = SlotRegistry::new(&platform, BINDINGS);
        let irq = InterruptController::new(&platform);
        registry.attach_one_shot(TimerId::new(2), Callback::new(one_shot), 250).unwrap();

        assert!(platform.fire(TimerId::new(2)));
        assert_eq!(irq.on_timer_interrupt(&registry, TimerId::new(2)), Dispatch::Invoked);
        assert_eq!(ONE_SHOT_CALLS.load(Ordering::SeqCst), 1);

        let tim2 = platform.timer(TimerId::new(2));
        assert!(!tim2.counting);
        assert!(!tim2.update_interrupt);
        assert!(!registry.has_one_shot(TimerId::new(2)));

        assert!(!platform.fire(TimerId::new(2)));
        assert_eq!(irq.on_timer_interrupt(&registry, TimerId::new(2)), Dispatch::Spurious);
        assert_eq!(ONE_SHOT_CALLS.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_shared_line_routes_by_pending_flag() {
        // TIM1 and TIM10 share a line; only TIM10 backs a slot
        let mut bindings = BINDINGS;
        bindings[0] = TimerId::new(10);
        let platform = MockPlatform::new();
        let registry = SlotRegistry::new(&platform, bindings);
        let irq = InterruptController::new(&platform);
        registry.attach(0, Callback::new(shared), Frequency::hz(1000)).unwrap();

        assert!(platform.fire(TimerId::new(10)));
        assert_eq!(irq.on_timer_interrupt(&registry, TimerId::new(1)), Dispatch::Spurious);
        assert_eq!(irq.on_timer_interrupt(&registry, TimerId::new(10)), Dispatch::Invoked);
        assert_eq!(SHARED_CALLS.load(Ordering::SeqCst), 1);
    }

    static TIM1_CALLS: AtomicUsize = AtomicUsize::new(0);
    static TIM10_CALLS: AtomicUsize = AtomicUsize::new(0);

    fn on_tim1() {
        TIM1_CALLS.fetch_add(1, Ordering::SeqCst);
    }

    fn on_tim10() {
        TIM10_CALLS.fetch_add(1, Ordering::SeqCst);
    }

    #[test]
    fn test_line_interrupt_serves_every_timer_on_the_line() {
        let mut bindings = BINDINGS;
        bindings[1] = TimerId::new(1);
        bindings[2] = TimerId::new(10);
        let platform = MockPlatform::new();
        let registry = SlotRegistry::new(&platform, bindings);
        let irq = InterruptController::new(&platform);
        registry.attach(1, Callback::new(on_tim1), Frequency::hz(100)).unwrap();
        registry.attach(2, Callback::new(on_tim10), Frequency::hz(100)).unwrap();
        let line = platform.catalog().get(TimerId::new(1)).unwrap().line;

        assert!(platform.fire(TimerId::new(10)));
        assert_eq!(irq.on_line_interrupt(&registry, line), Dispatch::Invoked);
        assert_eq!(TIM1_CALLS.load(Ordering::SeqCst), 0);
        assert_eq!(TIM10_CALLS.load(Ordering::SeqCst), 1);

        // both overflowed before the handler ran
        assert!(platform.fire(TimerId::new(1)));
        assert!(platform.fire(TimerId::new(10)));
        assert_eq!(irq.on_line_interrupt(&registry, line), Dispatch::Invoked);
        assert_eq!(TIM1_CALLS.load(Ordering::SeqCst), 1);
        assert_eq!(TIM10_CALLS.load(Ordering::SeqCst), 2);

        assert_eq!(irq.on_line_interrupt(&registry, line), Dispatch::Spurious);
        assert_eq!(irq.on_line_interrupt(&registry, IrqLine::new(90)), Dispatch::Spurious);
    }

    #[test]
    fn test_unbound_timer_is_spurious() {
        let platform = MockPlatform::new();
        let registry = SlotRegistry::new(&platform, BINDINGS);
        let irq = InterruptController::new(&platform);

        platform.force_pending(TimerId::new(2));
        assert_eq!(irq.on_timer_interrupt(&registry, TimerId::new(2)), Dispatch::Spurious);
        assert_eq!(irq.on_timer_interrupt(&registry, TimerId::new(17)), Dispatch::Spurious);
    }

    #[test]
    fn test_dispatch_ordering() {
        assert!(Dispatch::Spurious < Dispatch::Discarded);
        assert!(Dispatch::Discarded < Dispatch::Invoked);
    }
}
