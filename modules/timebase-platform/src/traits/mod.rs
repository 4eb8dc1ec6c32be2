//! Platform trait definitions

pub mod clock;
pub mod interrupt;
pub mod platform;
pub mod timer;

// Re-export for convenience
pub use clock::ClockSource;
pub use interrupt::InterruptLines;
pub use platform::Platform;
pub use timer::TimerRegisters;
