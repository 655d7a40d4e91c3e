use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use colored::Colorize;
use geoguess_core::navigation::Navigator;

/// Ends the REPL when the session hands control back to the menu.
#[derive(Debug, Clone, Default)]
pub struct MenuNavigator {
    requested: Arc<AtomicBool>,
}

impl MenuNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn menu_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }
}

impl Navigator for MenuNavigator {
    fn return_to_menu(&self) {
        self.requested.store(true, Ordering::SeqCst);
        println!("{}", "Back to the menu.".bright_black());
    }
}
