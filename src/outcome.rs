use std::fmt;
use std::process;

use crate::State;

/// A decided check result: a [State] and the message printed after it.
///
/// An outcome is consumed by [Outcome::print_and_exit], so a plugin can only ever print one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome {
    state: State,
    message: String,
}

impl Outcome {
    pub fn new(state: State, message: impl fmt::Display) -> Self {
        Self {
            state,
            message: message.to_string(),
        }
    }

    pub fn ok(message: impl fmt::Display) -> Self {
        Self::new(State::Ok, message)
    }

    pub fn warning(message: impl fmt::Display) -> Self {
        Self::new(State::Warning, message)
    }

    pub fn critical(message: impl fmt::Display) -> Self {
        Self::new(State::Critical, message)
    }

    pub fn unknown(message: impl fmt::Display) -> Self {
        Self::new(State::Unknown, message)
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn exit_code(&self) -> i32 {
        self.state.exit_code()
    }

    /// Prints `"{STATE} - {message}"` to stdout and exits with the state's exit code.
    pub fn print_and_exit(self) -> ! {
        println!("{}", self);
        process::exit(self.exit_code());
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.state, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_line() {
        let cases = [
            (Outcome::ok("x"), "OK - x", 0),
            (Outcome::warning("x"), "WARNING - x", 1),
            (Outcome::critical("x"), "CRITICAL - x", 2),
            (Outcome::unknown("x"), "UNKNOWN - x", 3),
        ];

        for (outcome, line, code) in cases {
            assert_eq!(outcome.to_string(), line);
            assert_eq!(outcome.exit_code(), code);
        }
    }

    #[test]
    fn test_outcome_keeps_multiline_message() {
        let outcome = Outcome::new(State::Ok, "up | \nline1 | \n'a'=1");
        assert_eq!(outcome.state(), State::Ok);
        assert_eq!(outcome.message(), "up | \nline1 | \n'a'=1");
        assert_eq!(outcome.to_string(), "OK - up | \nline1 | \n'a'=1");
    }
}
