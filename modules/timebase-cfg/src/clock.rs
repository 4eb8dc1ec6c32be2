// Timers sit on APB1/APB2, which do not necessarily run at the system clock.
// On the F40x/F41x parts the clock tree is set up with both buses feeding the
// timers at 84 MHz.

#[cfg(any(
    all(feature = "timer-clock-84mhz", feature = "timer-clock-72mhz"),
    all(feature = "timer-clock-84mhz", feature = "timer-clock-48mhz"),
    all(feature = "timer-clock-72mhz", feature = "timer-clock-48mhz"),
))]
compile_error!("only one timer-clock-* feature may be enabled");

#[cfg(feature = "timer-clock-84mhz")]
pub const TIMER_PERIPH_HZ: Option<u32> = Some(84_000_000);

#[cfg(feature = "timer-clock-72mhz")]
pub const TIMER_PERIPH_HZ: Option<u32> = Some(72_000_000);

#[cfg(feature = "timer-clock-48mhz")]
pub const TIMER_PERIPH_HZ: Option<u32> = Some(48_000_000);

#[cfg(not(any(
    feature = "timer-clock-84mhz",
    feature = "timer-clock-72mhz",
    feature = "timer-clock-48mhz"
)))]
pub const TIMER_PERIPH_HZ: Option<u32> = None;
