//! Error types
//!
//! Every failure the multiplexer can detect is reported before any register
//! is touched. Nothing here panics; arithmetic the hardware itself bounds
//! (high regime periods, prescalers from unusual clocks) is passed through
//! unchecked and is not an error.

use core::fmt;

use timebase_platform::TimerId;

use crate::planner::PlanError;

/// Result type for timebase operations
pub type Result<T> = core::result::Result<T, TimebaseError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimebaseError {
    /// Slot index outside `0..SLOT_COUNT`
    InvalidSlot(usize),
    /// Timer id not present in the platform catalog
    UnknownTimer(TimerId),
    /// The planner rejected the requested frequency; nothing was changed
    Rejected(PlanError),
    /// A one-shot delay of 0 us has no period
    ZeroDelay,
    /// The clock source reported 0 Hz for the clock the timer needs
    ClockUnavailable,
    /// [`crate::install`] has not run yet
    NotInstalled,
}

impl From<PlanError> for TimebaseError {
    fn from(err: PlanError) -> Self {
        TimebaseError::Rejected(err)
    }
}

impl fmt::Display for TimebaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimebaseError::InvalidSlot(slot) => write!(f, "no timer slot {}", slot),
            TimebaseError::UnknownTimer(id) => write!(f, "{} is not in the timer catalog", id),
            TimebaseError::Rejected(e) => write!(f, "frequency rejected: {}", e),
            TimebaseError::ZeroDelay => write!(f, "zero microsecond delay"),
            TimebaseError::ClockUnavailable => write!(f, "timer clock not configured"),
            TimebaseError::NotInstalled => write!(f, "timebase not installed"),
        }
    }
}
