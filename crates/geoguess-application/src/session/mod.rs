//! Session screens' state machine.
//!
//! - `state`: in-memory session state and the phase enum
//! - `controller`: the per-screen controller driving rounds, scoring and persistence

mod controller;
mod state;


pub use controller::{
    BootstrapOutcome, GuessOutcome, SessionController, SessionServices, SkipReason,
    SubmissionOutcome,
};
pub use state::{SessionPhase, SessionState};
