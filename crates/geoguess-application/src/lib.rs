pub mod lifecycle;
pub mod prefetch;
pub mod session;
pub mod summary_timer;
pub mod suppression;

pub use lifecycle::{
    LifecycleHandler, LifecycleHub, LifecycleObserver, LifecycleSource, LifecycleSubscription,
};
pub use prefetch::{FetchStatus, PrefetchHandle, PrefetchSlot};
pub use session::{
    BootstrapOutcome, GuessOutcome, SessionController, SessionPhase, SessionServices,
    SessionState, SkipReason, SubmissionOutcome,
};
pub use summary_timer::SummaryTimer;
pub use suppression::SuppressionFlag;
