//! Platform abstraction layer
//!
//! Browser/native-independent pieces of the front end:
//! - Fixed-timestep frame pacing
//! - Key name to action mapping

pub mod input;
pub mod time;

pub use input::{Action, action_for_key};
pub use time::FrameClock;
