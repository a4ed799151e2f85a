//! Find-then-pick session state machine.
//!
//! ```text
//! Idle -> Locating -> Scanning -> Results -> Picking -> Winner
//!            |           |                     ^  |
//!            +---> Error <+                    +--+ tick
//! ```
//!
//! `Reset` returns to `Idle` from any state and clears everything the
//! session collected.

mod machine;
mod types;

pub use machine::Session;
pub use types::{LocationError, SessionError, SessionEvent, SessionState, NO_RESULTS_MESSAGE};
