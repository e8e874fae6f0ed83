//! The base plugin runner.
//!
//! A [Monitor] goes through the option lifecycle when it is created: the base options are
//! defined first ([define_base_options]), then the check adds its own through
//! [PluginOptions::define_sub_options], the command line is parsed and logging is set up. A
//! command line the parser rejects ends the plugin with an UNKNOWN outcome.

use std::ffi::OsString;
use std::fmt::Display;

use clap::error::ErrorKind;
use clap::{Arg, ArgAction, ArgMatches, Command};
use log::{debug, LevelFilter};

use crate::logging;
use crate::outcome::Outcome;
use crate::output::{render, single_line, FormatError, Substitutions};

/// Hook for a check to register its own command line options.
///
/// The default keeps the common host and credential options. An implementation that still wants
/// them calls [define_plugin_options] itself, leaving it out gives a plugin with only its own
/// options.
///
/// ```rust
/// use clap::{Arg, Command};
/// use monitoringplugins::{define_plugin_options, PluginOptions};
///
/// struct HttpOptions;
///
/// impl PluginOptions for HttpOptions {
///     fn define_sub_options(cmd: Command) -> Command {
///         define_plugin_options(cmd)
///             .next_help_heading("Http Options")
///             .arg(Arg::new("url").long("url").required(true))
///     }
/// }
/// ```
pub trait PluginOptions {
    fn define_sub_options(cmd: Command) -> Command {
        define_plugin_options(cmd)
    }
}

/// Options of a plugin without options of its own: debug, host and credentials.
pub struct BaseOptions;

impl PluginOptions for BaseOptions {}

/// Registers `-D/--debug`. Always the first options of a plugin.
pub fn define_base_options(cmd: Command) -> Command {
    cmd.about("Plugin for Monitor.").arg(
        Arg::new("debug")
            .short('D')
            .long("debug")
            .action(ArgAction::SetTrue)
            .help("Show debug informations."),
    )
}

/// Registers the options shared by all plugins: `-H/--host`, `-u/--user` and `-p/--password`.
pub fn define_plugin_options(cmd: Command) -> Command {
    cmd.next_help_heading("Plugin Options")
        .arg(
            Arg::new("host")
                .short('H')
                .long("host")
                .required(true)
                .help("Host IP address or DNS"),
        )
        .arg(Arg::new("user").short('u').long("user").help("User name"))
        .arg(
            Arg::new("password")
                .short('p')
                .long("password")
                .help("User password"),
        )
}

pub struct Monitor {
    short_output: String,
    long_output: Vec<String>,
    perf_data: Vec<String>,
    args: ArgMatches,
    log_level: LevelFilter,
}

impl Monitor {
    /// Creates a plugin with only the base options from the process arguments.
    pub fn new() -> Self {
        Self::try_new(std::env::args_os()).unwrap_or_else(|o| o.print_and_exit())
    }

    /// Same as [Monitor::new] with explicit arguments. Unlike the FTP constructors this closes
    /// the debug block, nothing else gets initialized after it.
    pub fn try_new(
        args: impl IntoIterator<Item = impl Into<OsString> + Clone>,
    ) -> Result<Self, Outcome> {
        let monitor = Self::try_from_args::<BaseOptions>(args)?;
        debug!("===== END DEBUG =====");
        Ok(monitor)
    }

    /// Creates a plugin with the options of `P` from the process arguments. Exits with UNKNOWN if
    /// they can't be parsed.
    pub fn with_options<P: PluginOptions>() -> Self {
        Self::try_from_args::<P>(std::env::args_os()).unwrap_or_else(|o| o.print_and_exit())
    }

    /// Same as [Monitor::with_options] with explicit arguments, the first one being the program
    /// name. A parse failure is handed back as the UNKNOWN outcome instead of exiting.
    pub fn try_from_args<P: PluginOptions>(
        args: impl IntoIterator<Item = impl Into<OsString> + Clone>,
    ) -> Result<Self, Outcome> {
        let cmd = P::define_sub_options(define_base_options(Command::new("monitor")));

        let args = match cmd.try_get_matches_from(args) {
            Ok(args) => args,
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                e.exit()
            }
            Err(e) => {
                return Err(Outcome::unknown(format!(
                    "Parser arguments error: {}",
                    describe_parse_error(&e)
                )))
            }
        };

        let log_level = if args.get_flag("debug") {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        };
        logging::init(log_level);

        debug!("===== BEGIN DEBUG =====");
        debug!("Init Monitor");

        Ok(Monitor {
            short_output: String::new(),
            long_output: Vec::new(),
            perf_data: Vec::new(),
            args,
            log_level,
        })
    }

    /// The parsed command line.
    pub fn args(&self) -> &ArgMatches {
        &self.args
    }

    /// Value of a string option, `None` if it wasn't given or isn't defined by this plugin.
    pub fn arg(&self, id: &str) -> Option<&str> {
        self.args
            .try_get_one::<String>(id)
            .ok()
            .flatten()
            .map(String::as_str)
    }

    pub fn host(&self) -> Option<&str> {
        self.arg("host")
    }

    pub fn user(&self) -> Option<&str> {
        self.arg("user")
    }

    pub fn password(&self) -> Option<&str> {
        self.arg("password")
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn short_output(&self) -> &str {
        &self.short_output
    }

    pub fn set_short_output(&mut self, short_output: impl Into<String>) {
        self.short_output = short_output.into();
    }

    pub fn long_output(&self) -> &[String] {
        &self.long_output
    }

    pub fn push_long_output(&mut self, line: impl Into<String>) {
        self.long_output.push(line.into());
    }

    pub fn perf_data(&self) -> &[String] {
        &self.perf_data
    }

    /// Appends a performance data token, usually a [crate::PerfData].
    pub fn push_perfdata(&mut self, perf_data: impl ToString) {
        self.perf_data.push(perf_data.to_string());
    }

    /// Renders the accumulated output, see [crate::output::render].
    pub fn output(
        &self,
        substitutions: &Substitutions,
        long_output_limit: Option<usize>,
    ) -> Result<String, FormatError> {
        render(
            &self.short_output,
            &self.long_output,
            &self.perf_data,
            long_output_limit,
            substitutions,
        )
    }

    pub fn ok(&self, msg: impl Display) -> ! {
        Outcome::ok(msg).print_and_exit()
    }

    pub fn warning(&self, msg: impl Display) -> ! {
        Outcome::warning(msg).print_and_exit()
    }

    pub fn critical(&self, msg: impl Display) -> ! {
        Outcome::critical(msg).print_and_exit()
    }

    pub fn unknown(&self, msg: impl Display) -> ! {
        Outcome::unknown(msg).print_and_exit()
    }
}

impl Default for Monitor {
    fn default() -> Self {
        Self::new()
    }
}

// clap renders "error: <message>\n\nUsage: ...", keep the message on one line.
fn describe_parse_error(e: &clap::Error) -> String {
    let rendered = e.to_string();
    let head = rendered.split("\n\n").next().unwrap_or_default();
    single_line(head.strip_prefix("error: ").unwrap_or(head))
}
