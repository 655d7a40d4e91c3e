//! Terminal rendering of controller state.

use colored::Colorize;
use geoguess_application::{GuessOutcome, SessionController, SessionPhase, SubmissionOutcome};
use geoguess_core::GameError;
use geoguess_core::snapshot::{RoundOutcome, ScreenKind};

use crate::helper::COMMANDS;

pub fn banner(screen: ScreenKind) {
    println!(
        "{}",
        format!("=== geoguess: {} ===", screen).bright_magenta().bold()
    );
    println!(
        "{}",
        "Type a country name or code to guess, ':help' for commands.".bright_black()
    );
    println!();
}

pub fn help() {
    println!("{}", "Commands:".bright_yellow());
    for cmd in COMMANDS {
        println!("  {}", cmd.bright_cyan());
    }
}

/// Renders whatever the current phase puts on screen.
pub fn screen(controller: &SessionController) {
    match controller.phase() {
        SessionPhase::Bootstrapping => {
            println!("{}", "No round loaded. Type ':retry' to try again.".yellow())
        }
        SessionPhase::AwaitingInput => round(controller),
        SessionPhase::RoundComplete => round_result(controller),
        SessionPhase::SessionComplete => summary(controller),
        SessionPhase::Evaluating | SessionPhase::Abandoned => {}
    }
}

fn scoreline(controller: &SessionController) -> String {
    let state = controller.state();
    let mut line = format!("score {}  best {}", state.score, state.high_score);
    if controller.screen() == ScreenKind::Duel {
        line.push_str(&format!("  opponent {}", state.opponent_score));
    }
    if state.continued {
        line.push_str("  (continued)");
    }
    line
}

pub fn round(controller: &SessionController) {
    let state = controller.state();
    let Some(round) = &state.round else {
        return;
    };

    println!(
        "{}  {}",
        format!(
            "Round {}/{}",
            state.round_index,
            controller.config().session_length
        )
        .bright_yellow()
        .bold(),
        scoreline(controller).bright_black()
    );
    if let Some(url) = &round.image_url {
        println!("  image: {}", url.bright_blue());
    }
    if let Some(hint) = &round.hint {
        println!("  hint: {}", hint.bright_blue());
    }
    if !state.incorrect_guesses.is_empty() {
        println!(
            "  tried: {}",
            state.incorrect_guesses.join(", ").bright_black()
        );
    }
    let left = controller
        .config()
        .max_attempts
        .saturating_sub(state.guess_count);
    println!("  {} attempt(s) left", left);
}

fn round_result(controller: &SessionController) {
    let state = controller.state();
    if let (Some(outcome), Some(answer)) = (state.round_outcome, state.revealed_answer()) {
        match outcome {
            RoundOutcome::Solved { points } => println!(
                "{}",
                format!("{} ({}) +{}", answer.name, answer.code, points).green()
            ),
            RoundOutcome::Failed { penalty } => println!(
                "{}",
                format!("It was {} ({}) -{}", answer.name, answer.code, penalty).red()
            ),
        }
    }
    println!("{}", scoreline(controller).bright_black());
    if state.completed_rounds < controller.config().session_length {
        println!("{}", "Type ':next' for the next round.".bright_black());
    }
}

pub fn summary(controller: &SessionController) {
    let state = controller.state();
    println!("{}", "=== Session complete ===".bright_magenta().bold());
    println!(
        "Final score {}  best {}",
        state.score.to_string().bright_green().bold(),
        state.high_score
    );
    println!(
        "{} of {} rounds solved, {} on the first try",
        state.stats.rounds_solved, state.stats.rounds_played, state.stats.first_try_solves
    );
    if controller.screen() == ScreenKind::Duel {
        println!("Opponent scored {}", state.opponent_score);
    }
    println!(
        "{}",
        "Type ':continue' to keep playing (misses cost a point) or ':new' for a new game."
            .bright_black()
    );
}

pub fn guess(outcome: &GuessOutcome) {
    match outcome {
        GuessOutcome::Correct {
            points,
            new_high_score,
        } => {
            println!("{}", format!("Correct! +{}", points).bright_green().bold());
            if *new_high_score {
                println!("{}", "New high score!".bright_yellow());
            }
        }
        GuessOutcome::Incorrect { attempts_left } => {
            println!(
                "{}",
                format!("Nope. {} attempt(s) left.", attempts_left).yellow()
            )
        }
        GuessOutcome::Failed { answer, penalty } => {
            let mut line = format!("Out of attempts. It was {}.", answer.name);
            if *penalty > 0 {
                line.push_str(&format!(" -{}", penalty));
            }
            println!("{}", line.red());
        }
        GuessOutcome::Repeated => {
            println!("{}", "Already tried that one.".bright_black())
        }
    }
}

pub fn submission(outcome: &SubmissionOutcome) {
    match outcome {
        SubmissionOutcome::Submitted => println!("{}", "Score saved to the leaderboard.".green()),
        SubmissionOutcome::Skipped(reason) => {
            println!("{}", format!("Score not submitted ({:?}).", reason).bright_black())
        }
        SubmissionOutcome::Failed(message) => {
            println!("{}", format!("Couldn't submit score: {}", message).yellow())
        }
    }
}

pub fn error(err: &GameError) {
    match err {
        GameError::InvalidTransition { .. } | GameError::InvalidGuess(_) => {
            println!("{}", err.to_string().yellow())
        }
        other => eprintln!("{}", other.to_string().red()),
    }
}

pub fn alert(message: &str) {
    println!("{}", format!("! {}", message).bright_red().bold());
}
