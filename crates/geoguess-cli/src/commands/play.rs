//! Interactive session on one screen.
//!
//! `:bg` and `:fg` go through the lifecycle hub exactly like OS callbacks
//! would, so a session can be backgrounded, killed (Ctrl-D) and resumed on
//! the next `geoguess play`.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use geoguess_application::{
    BootstrapOutcome, LifecycleHub, LifecycleObserver, SessionController, SessionPhase,
    SessionServices,
};
use geoguess_core::GameError;
use geoguess_core::clock::SystemClock;
use geoguess_core::lifecycle::AppStateChange;
use geoguess_core::opponent::Opponent;
use geoguess_core::snapshot::ScreenKind;
use geoguess_infrastructure::paths::GamePaths;
use geoguess_infrastructure::{
    CatalogRoundSource, FileKeyValueStorage, FileLeaderboard, LocalSessionRegistrar,
    SimulatedOpponent, SnapshotStore,
};
use rustyline::Editor;
use rustyline::error::ReadlineError;
use tokio::sync::Mutex;

use crate::helper::CliHelper;
use crate::navigator::MenuNavigator;
use crate::render;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Guess(String),
    Next,
    Continue,
    NewGame,
    Retry,
    Show,
    Submit(bool),
    Background,
    Foreground,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    fn parse(input: &str) -> Self {
        let input = input.trim();
        if !input.starts_with(':') {
            return Command::Guess(input.to_string());
        }

        let mut parts = input.split_whitespace();
        match (parts.next().unwrap_or_default(), parts.next()) {
            (":next" | ":n", None) => Command::Next,
            (":continue" | ":c", None) => Command::Continue,
            (":new", None) => Command::NewGame,
            (":retry", None) => Command::Retry,
            (":show", None) => Command::Show,
            (":submit", Some("on")) => Command::Submit(true),
            (":submit", Some("off")) => Command::Submit(false),
            (":bg", None) => Command::Background,
            (":fg", None) => Command::Foreground,
            (":help" | ":h", None) => Command::Help,
            (":quit" | ":q" | ":menu", None) => Command::Quit,
            _ => Command::Unknown(input.to_string()),
        }
    }
}

pub async fn run(
    paths: &GamePaths,
    config: Option<PathBuf>,
    screen: ScreenKind,
    image_base_url: Option<String>,
) -> Result<()> {
    let game = super::config_service(paths, config).game_config();

    let store = SnapshotStore::new(
        Arc::new(FileKeyValueStorage::new(paths.snapshots_dir()?)),
        Arc::new(SystemClock),
    );
    let mut rounds = CatalogRoundSource::new();
    if let (ScreenKind::Panorama, Some(base)) = (screen, image_base_url) {
        rounds = rounds.with_image_base_url(base);
    }
    let opponent: Option<Arc<dyn Opponent>> = match screen {
        ScreenKind::Duel => Some(Arc::new(SimulatedOpponent::new(game.max_attempts))),
        _ => None,
    };
    let navigator = MenuNavigator::new();

    let services = SessionServices {
        rounds: Arc::new(rounds),
        registrar: Arc::new(LocalSessionRegistrar),
        submitter: Arc::new(FileLeaderboard::new(paths.data_dir()?)),
        navigator: Arc::new(navigator.clone()),
        opponent,
        store,
    };

    let controller = Arc::new(Mutex::new(SessionController::new(screen, game, services)));
    let hub = LifecycleHub::new();
    let subscription = LifecycleObserver::attach(&hub, controller.clone());

    render::banner(screen);
    {
        let mut session = controller.lock().await;
        match session.bootstrap().await {
            Ok(BootstrapOutcome::Restored) => {
                println!("{}", "Resuming your last session.".bright_green())
            }
            Ok(BootstrapOutcome::Started) => {}
            Err(e) => tracing::warn!("[play] Bootstrap failed: {}", e),
        }
        show(&mut session);
    }

    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    loop {
        let line = match rl.readline(">> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type ':quit' to leave.".yellow());
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Closing the terminal behaves like the OS killing the app.
                println!("{}", "Saving and exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }
        let _ = rl.add_history_entry(line.as_str());

        match Command::parse(&line) {
            Command::Background => {
                hub.app_state(AppStateChange::Background);
                println!("{}", "App sent to background.".bright_black());
            }
            Command::Foreground => {
                hub.app_state(AppStateChange::Active);
                println!(
                    "{}",
                    "App back in the foreground. ':show' redraws.".bright_black()
                );
            }
            Command::Help => render::help(),
            Command::Unknown(input) => {
                println!("{}", format!("Unknown command {}", input).bright_black())
            }
            command => {
                let mut session = controller.lock().await;
                execute(&mut session, command).await;
            }
        }

        if navigator.menu_requested() {
            break;
        }
    }

    hub.teardown();
    subscription.closed().await;
    Ok(())
}

async fn execute(session: &mut SessionController, command: Command) {
    let result: Result<(), GameError> = match command {
        Command::Guess(text) => match session.submit_guess(&text).await {
            Ok(outcome) => {
                render::guess(&outcome);
                if session.phase() == SessionPhase::RoundComplete {
                    show(session);
                    if session.wait_for_summary().await {
                        show(session);
                    }
                }
                Ok(())
            }
            Err(e) => Err(e),
        },
        Command::Next => session.advance().await.map(|()| show(session)),
        Command::Continue => session.continue_session().await.map(|()| show(session)),
        Command::NewGame => session.new_game().await.map(|outcome| {
            render::submission(&outcome);
            show(session);
        }),
        Command::Retry => session.bootstrap().await.map(|_| show(session)),
        Command::Show => {
            session.poll_summary();
            show(session);
            Ok(())
        }
        Command::Submit(enabled) => {
            session.set_submit_to_leaderboard(enabled);
            println!(
                "Leaderboard submission {}.",
                if enabled { "on" } else { "off" }
            );
            Ok(())
        }
        Command::Quit => {
            let outcome = session.abandon().await;
            render::submission(&outcome);
            Ok(())
        }
        Command::Background | Command::Foreground | Command::Help | Command::Unknown(_) => Ok(()),
    };

    if let Err(e) = result {
        render::error(&e);
    }
    if let Some(alert) = session.take_alert() {
        render::alert(&alert);
    }
}

fn show(session: &mut SessionController) {
    if let Some(alert) = session.take_alert() {
        render::alert(&alert);
    }
    render::screen(session);
}
