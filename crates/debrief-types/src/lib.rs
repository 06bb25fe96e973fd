//! Shared data model for the debrief session recorder.

mod debug_log;
mod exchange;
mod session;
mod stats;

pub use debug_log::*;
pub use exchange::*;
pub use session::*;
pub use stats::*;
