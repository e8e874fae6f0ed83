//! The monitoringplugins crate provides a base to write monitoring plugins for nagios and the
//! tools built on it (naemon, icinga, shinken, centreon, opsview, sensu).
//!
//! A plugin creates a [Monitor], which parses the command line and sets up logging, then does its
//! checks, fills the short output, long output and performance data and finally raises
//! exactly one of the four outcomes. Raising an outcome prints the formatted line and exits the
//! process with the matching exit code.
//!
//! ```rust,no_run
//! use monitoringplugins::{Monitor, Substitutions};
//!
//! let mut monitor = Monitor::new();
//! monitor.set_short_output("service up");
//! monitor.push_long_output("line1");
//! monitor.push_perfdata("'latency'=12ms;100;200;0;500");
//!
//! match monitor.output(&Substitutions::new(), None) {
//!     Ok(out) => monitor.ok(out),
//!     Err(e) => monitor.unknown(e),
//! }
//! ```

use std::fmt;

mod logging;

pub mod monitor;
pub mod outcome;
pub mod output;
pub mod perfdata;
pub mod runner;

#[cfg(feature = "ftp")]
pub mod ftp;

pub use crate::monitor::{
    define_base_options, define_plugin_options, BaseOptions, Monitor, PluginOptions,
};
pub use crate::outcome::Outcome;
pub use crate::output::{render, FormatError, Substitutions};
pub use crate::perfdata::{PerfData, PerfDataError, TriggerIfValue, Unit};
pub use crate::runner::Runner;

/// Represents a service state from nagios.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum State {
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl State {
    /// Returns the corresponding nagios exit code to signal the service state of self.
    pub fn exit_code(&self) -> i32 {
        match self {
            State::Ok => 0,
            State::Warning => 1,
            State::Critical => 2,
            State::Unknown => 3,
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            State::Ok => "OK",
            State::Warning => "WARNING",
            State::Critical => "CRITICAL",
            State::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use crate::State;

    #[test]
    fn test_state() {
        assert_eq!(State::Ok.exit_code(), 0);
        assert_eq!(State::Warning.exit_code(), 1);
        assert_eq!(State::Critical.exit_code(), 2);
        assert_eq!(State::Unknown.exit_code(), 3);

        assert_eq!(&State::Ok.to_string(), "OK");
        assert_eq!(&State::Warning.to_string(), "WARNING");
        assert_eq!(&State::Critical.to_string(), "CRITICAL");
        assert_eq!(&State::Unknown.to_string(), "UNKNOWN");
    }
}
