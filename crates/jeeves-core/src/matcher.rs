//! Command matching
//!
//! Maps a raw command string against an agent's declared patterns.

use crate::agent::CommandPattern;
use tracing::debug;

/// Check a command against a single pattern (case-insensitive).
///
/// - wildcard: the command starts with the verb
/// - verb + noun: the command contains both, in any order
/// - verb only: the command contains the verb
#[must_use]
pub fn matches(command: &str, pattern: &CommandPattern) -> bool {
    let command = command.to_lowercase();
    let verb = pattern.verb.to_lowercase();

    if pattern.wildcard {
        return command.starts_with(&verb);
    }

    match &pattern.noun {
        Some(noun) => command.contains(&verb) && command.contains(&noun.to_lowercase()),
        None => command.contains(&verb),
    }
}

/// Whether any of the patterns matches the command
#[must_use]
pub fn supports(command: &str, patterns: &[CommandPattern]) -> bool {
    match patterns.iter().find(|pattern| matches(command, pattern)) {
        Some(pattern) => {
            debug!(
                command = %command,
                verb = %pattern.verb,
                noun = ?pattern.noun,
                wildcard = pattern.wildcard,
                "Command matched"
            );
            true
        }
        None => {
            debug!(command = %command, "No pattern matched");
            false
        }
    }
}
