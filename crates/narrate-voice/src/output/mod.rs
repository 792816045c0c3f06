//! Output device implementations.
//!
//! | Feature   | Module        | Device             |
//! |-----------|---------------|--------------------|
//! | (always)  | [`simulated`] | `SimulatedDevice`  |
//! | `speaker` | `speaker`     | `SpeakerDevice`    |

pub mod simulated;
#[cfg(feature = "speaker")]
pub mod speaker;

pub use simulated::{SimulatedDevice, SimulatedLine};
#[cfg(feature = "speaker")]
pub use speaker::{SpeakerDevice, SpeakerLine};
