use std::fmt::Display;

use crate::Outcome;

/// Turns a fallible check into exactly one [Outcome].
///
/// Errors end up as UNKNOWN with the error message unless an [Runner::on_error] handler
/// classifies them differently.
///
/// ```rust,no_run
/// use monitoringplugins::{Outcome, Runner};
///
/// Runner::new()
///     .on_error(|e: &std::io::Error| Outcome::critical(format!("disk unreadable: {}", e)))
///     .safe_run(|| {
///         let entries = std::fs::read_dir("/var/spool")?.count();
///         Ok(Outcome::ok(format!("{} entries", entries)))
///     })
///     .print_and_exit()
/// ```
pub struct Runner<E> {
    on_error: Option<Box<dyn FnOnce(&E) -> Outcome>>,
}

impl<E: Display> Runner<E> {
    pub fn new() -> Self {
        Self { on_error: None }
    }

    pub fn on_error(mut self, f: impl FnOnce(&E) -> Outcome + 'static) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }

    pub fn safe_run(self, f: impl FnOnce() -> Result<Outcome, E>) -> Outcome {
        match f() {
            Ok(outcome) => outcome,
            Err(err) => match self.on_error {
                Some(on_error) => on_error(&err),
                None => Outcome::unknown(err),
            },
        }
    }
}

impl<E: Display> Default for Runner<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::State;

    #[derive(Debug, thiserror::Error)]
    #[error("woops")]
    struct EmptyError;

    #[test]
    fn test_runner_ok() {
        let outcome = Runner::<EmptyError>::new()
            .on_error(|_| panic!("handler called for a successful check"))
            .safe_run(|| Ok(Outcome::warning("slow")));

        assert_eq!(outcome, Outcome::warning("slow"));
    }

    #[test]
    fn test_runner_error_defaults_to_unknown() {
        let outcome = Runner::new().safe_run(|| Err(EmptyError));

        assert_eq!(outcome.state(), State::Unknown);
        assert_eq!(outcome.to_string(), "UNKNOWN - woops");
    }

    #[test]
    fn test_runner_error_handler() {
        let outcome = Runner::<EmptyError>::new()
            .on_error(|e| Outcome::critical(format!("check failed: {}", e)))
            .safe_run(|| Err(EmptyError));

        assert_eq!(outcome.to_string(), "CRITICAL - check failed: woops");
    }
}
