//! rustyline helper: completion, hints and highlighting for `:` commands.

use std::borrow::Cow::{self, Borrowed, Owned};

use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

pub const COMMANDS: &[&str] = &[
    ":next",
    ":continue",
    ":new",
    ":retry",
    ":show",
    ":submit on",
    ":submit off",
    ":bg",
    ":fg",
    ":help",
    ":quit",
];

#[derive(Clone, Default)]
pub struct CliHelper;

impl CliHelper {
    pub fn new() -> Self {
        Self
    }

    fn matching<'a>(line: &'a str) -> impl Iterator<Item = &'static str> + 'a {
        COMMANDS.iter().copied().filter(move |cmd| cmd.starts_with(line))
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        if !line.starts_with(':') {
            return Ok((0, vec![]));
        }

        let candidates = Self::matching(line)
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with(':') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];
        if !line.starts_with(':') {
            return None;
        }
        Self::matching(line)
            .find(|cmd| cmd.len() > line.len())
            .map(|cmd| cmd[line.len()..].to_string())
    }
}

impl Validator for CliHelper {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_colon_lines_match_commands() {
        assert_eq!(CliHelper::matching(":ne").collect::<Vec<_>>(), vec![":next", ":new"]);
        assert_eq!(CliHelper::matching(":sub").count(), 2);
        assert_eq!(CliHelper::matching(":zzz").count(), 0);
    }
}
