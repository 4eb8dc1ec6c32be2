//! Frequency planning
//!
//! Turns a requested update rate into a (prescaler, period) pair for a timer
//! fed by a `clk` Hz kernel clock. The update rate is
//! `clk / ((prescaler + 1) * (period + 1))`.
//!
//! The ideal split makes prescaler and period both about `sqrt(clk / f)`.
//! Square roots are avoided by fixing one of the two per regime:
//!
//! - **high** (`f >= 2000 Hz`): no prescaler, `period = clk / f - 1`. The
//!   period is not range checked; keeping it within the counter width is up
//!   to the caller.
//! - **low** (`f < 2000 Hz`): the counter is prescaled to 4 kHz,
//!   `period = 4000 / f - 1`. Requests whose period falls outside
//!   `[1, 65535]` are rejected.
//!
//! Periodic callbacks do not need sub-percent accuracy, so the truncation in
//! both regimes is acceptable.

use core::fmt;

use timebase_cfg::{HIGH_REGIME_MIN_HZ, LOW_REGIME_BASE_HZ, MAX_PERIOD, MIN_PERIOD};

const MILLIHERTZ_PER_HZ: u64 = 1000;

/// A requested update rate.
///
/// Stored in millihertz so rates below 1 Hz can be requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frequency {
    millihertz: u64,
}

impl Frequency {
    pub const fn hz(hz: u32) -> Self {
        Self {
            millihertz: hz as u64 * MILLIHERTZ_PER_HZ,
        }
    }

    pub const fn millihertz(millihertz: u64) -> Self {
        Self { millihertz }
    }

    pub const fn as_millihertz(self) -> u64 {
        self.millihertz
    }

    pub const fn is_zero(self) -> bool {
        self.millihertz == 0
    }
}

impl From<u32> for Frequency {
    fn from(hz: u32) -> Self {
        Frequency::hz(hz)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:03} Hz",
            self.millihertz / MILLIHERTZ_PER_HZ,
            self.millihertz % MILLIHERTZ_PER_HZ
        )
    }
}

/// Which way the planner split the division.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Regime {
    /// prescaler fixed at 0
    High,
    /// counter prescaled to [`LOW_REGIME_BASE_HZ`]
    Low,
}

/// Planner output, ready for the prescaler and auto-reload registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Dividers {
    pub prescaler: u16,
    pub period: u32,
    pub regime: Regime,
}

impl Dividers {
    /// Update rate these dividers produce from a `clk_hz` kernel clock.
    pub fn update_rate(&self, clk_hz: u32) -> Frequency {
        let ticks = (self.prescaler as u64 + 1) * (self.period as u64 + 1);
        Frequency::millihertz(clk_hz as u64 * MILLIHERTZ_PER_HZ / ticks)
    }
}

/// Why a request was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlanError {
    /// A rate of zero has no period.
    ZeroFrequency,
    /// Low regime period outside `[1, 65535]`.
    PeriodOutOfRange { period: u64 },
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanError::ZeroFrequency => write!(f, "zero frequency"),
            PlanError::PeriodOutOfRange { period } => {
                write!(f, "period {} outside [{}, {}]", period, MIN_PERIOD, MAX_PERIOD)
            }
        }
    }
}

/// Compute prescaler and period for `frequency` from a `clk_hz` kernel clock.
///
/// Arithmetic at the hardware boundary is unchecked: in the high regime
/// `frequency > clk_hz` wraps the period to `u32::MAX`, and in the low regime
/// a clock above ~262 MHz or below 4 kHz truncates or wraps the prescaler.
pub fn plan(frequency: Frequency, clk_hz: u32) -> Result<Dividers, PlanError> {
    let f = frequency.as_millihertz();
    if f == 0 {
        return Err(PlanError::ZeroFrequency);
    }

    if frequency >= Frequency::hz(HIGH_REGIME_MIN_HZ) {
        // clk / f <= clk / 2000, fits easily
        let ticks = (clk_hz as u64 * MILLIHERTZ_PER_HZ / f) as u32;
        return Ok(Dividers {
            prescaler: 0,
            period: ticks.wrapping_sub(1),
            regime: Regime::High,
        });
    }

    // f < 2000 Hz, so 4000 / f >= 2 and the subtraction cannot underflow
    let period = LOW_REGIME_BASE_HZ as u64 * MILLIHERTZ_PER_HZ / f - 1;
    if !(MIN_PERIOD as u64..=MAX_PERIOD as u64).contains(&period) {
        return Err(PlanError::PeriodOutOfRange { period });
    }

    Ok(Dividers {
        prescaler: (clk_hz / LOW_REGIME_BASE_HZ).wrapping_sub(1) as u16,
        period: period as u32,
        regime: Regime::Low,
    })
}
