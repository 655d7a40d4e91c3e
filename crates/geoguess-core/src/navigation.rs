//! Navigation contract used when a session is abandoned.

/// The screen router owned by the presentation layer.
pub trait Navigator: Send + Sync {
    /// Leaves the session screen for the main menu.
    fn return_to_menu(&self);
}
