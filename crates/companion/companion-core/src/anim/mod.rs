//! Animation phases as explicit state structs with per-tick step functions.
//!
//! Each phase writes only the transforms it is handed; the pet decides which
//! phase owns the sprite at any moment.

pub mod eat;
pub mod flight;
pub mod idle;

pub use eat::EatOscillator;
pub use flight::FlightInterpolator;
pub use idle::IdleOscillator;

/// Result of advancing a finite phase by one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Running,
    /// Returned exactly once, from the tick that committed the terminal pose.
    Completed,
    /// Any tick after completion; nothing was written.
    Finished,
}
