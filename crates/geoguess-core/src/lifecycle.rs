//! App lifecycle events delivered to session screens.

use serde::{Deserialize, Serialize};

/// OS-level application state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppStateChange {
    Active,
    Inactive,
    Background,
}

impl AppStateChange {
    /// Inactive and background both mean "the user can no longer see us".
    pub fn is_leaving_foreground(&self) -> bool {
        matches!(self, AppStateChange::Inactive | AppStateChange::Background)
    }
}

/// Events a screen's lifecycle observer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "state", rename_all = "camelCase")]
pub enum LifecycleEvent {
    /// The app moved between foreground and background.
    AppState(AppStateChange),
    /// The screen is being destroyed (navigated away or unmounted).
    Teardown,
}
