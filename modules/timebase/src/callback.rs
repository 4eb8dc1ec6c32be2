//! Callback storage shared between foreground code and interrupt handlers

use core::cell::Cell;
use core::fmt;

use critical_section::Mutex;

/// A zero-argument procedure run from interrupt context.
///
/// Holds a plain function pointer, so the multiplexer never owns any state
/// the callback uses. The callback runs at the priority of its timer line
/// and must return well within one period.
#[derive(Clone, Copy)]
pub struct Callback(fn());

impl Callback {
    pub const fn new(f: fn()) -> Self {
        Self(f)
    }

    #[inline(always)]
    pub fn invoke(self) {
        (self.0)()
    }
}

impl From<fn()> for Callback {
    fn from(f: fn()) -> Self {
        Self(f)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callback({:p})", self.0 as *const ())
    }
}

/// Optional [`Callback`] swapped and read inside critical sections.
///
/// A foreground store can never interleave with an interrupt-time load, so
/// the handler sees either the old or the new callback, never a torn value.
/// The value is copied out before it is invoked; the callback itself runs
/// with interrupts enabled.
pub(crate) struct CallbackCell {
    inner: Mutex<Cell<Option<Callback>>>,
}

impl CallbackCell {
    pub(crate) const fn empty() -> Self {
        Self {
            inner: Mutex::new(Cell::new(None)),
        }
    }

    /// Store `callback`, returning the previous one.
    pub(crate) fn store(&self, callback: Callback) -> Option<Callback> {
        critical_section::with(|cs| self.inner.borrow(cs).replace(Some(callback)))
    }

    pub(crate) fn take(&self) -> Option<Callback> {
        critical_section::with(|cs| self.inner.borrow(cs).take())
    }

    pub(crate) fn load(&self) -> Option<Callback> {
        critical_section::with(|cs| self.inner.borrow(cs).get())
    }
}
