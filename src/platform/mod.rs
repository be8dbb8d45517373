//! Platform layer
//!
//! Everything between browser events and the deterministic core:
//! - `input`: device events latched into a per-tick `ControlIntent`
//! - `session`: frame timestamps, start/stop, restart and audio routing

pub mod input;
pub mod session;

pub use input::{Button, InputLatch};
pub use session::Session;
