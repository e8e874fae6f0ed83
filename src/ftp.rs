//! FTP check: connect and log in to an FTP server, then quit.

use std::ffi::OsString;
use std::io::{self, Write};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use ::ftp::{status, FtpError, FtpStream};
use clap::{value_parser, Arg, ArgMatches, Command};
use log::debug;

use crate::monitor::{define_plugin_options, Monitor, PluginOptions};
use crate::outcome::Outcome;
use crate::output::single_line;

pub const DEFAULT_PORT: u16 = 21;

/// Timeout value meaning "wait forever".
pub const NO_TIMEOUT: i64 = -999;

const ANONYMOUS: &str = "anonymous";

// Reply codes the client has no constants for.
const SUPERFLUOUS: u32 = 202;
const NEED_ACCOUNT: u32 = 332;

/// Timeout of the control connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Timeout {
    Disabled,
    After(Duration),
}

fn parse_timeout(s: &str) -> Result<Timeout, String> {
    let secs: i64 = s
        .parse()
        .map_err(|e| format!("invalid timeout '{}': {}", s, e))?;

    match secs {
        NO_TIMEOUT => Ok(Timeout::Disabled),
        secs if secs > 0 => Ok(Timeout::After(Duration::from_secs(secs as u64))),
        _ => Err(format!(
            "timeout must be a positive number of seconds or {}",
            NO_TIMEOUT
        )),
    }
}

/// Host and credential options plus the ftp ones.
pub struct FtpOptions;

impl PluginOptions for FtpOptions {
    fn define_sub_options(cmd: Command) -> Command {
        define_ftp_options(define_plugin_options(cmd))
    }
}

/// Registers `-P/--port`, `-t/--timeout` and `-a/--acct`.
pub fn define_ftp_options(cmd: Command) -> Command {
    cmd.next_help_heading("Ftp Options")
        .arg(
            Arg::new("port")
                .short('P')
                .long("port")
                .default_value("21")
                .value_parser(value_parser!(u16).range(1..))
                .help("ftp server port"),
        )
        .arg(
            Arg::new("timeout")
                .short('t')
                .long("timeout")
                .default_value("-999")
                .allow_negative_numbers(true)
                .value_parser(parse_timeout)
                .help("ftp timeout in seconds, -999 waits forever"),
        )
        .arg(
            Arg::new("acct")
                .short('a')
                .long("acct")
                .help("acct for ftp login, sent when the server asks for it, empty by default"),
        )
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FtpArgs {
    pub host: String,
    pub port: u16,
    pub timeout: Timeout,
    pub user: Option<String>,
    pub password: Option<String>,
    pub acct: String,
}

impl FtpArgs {
    fn from_matches(args: &ArgMatches) -> Result<FtpArgs, String> {
        let string = |id: &str| args.try_get_one::<String>(id).ok().flatten().cloned();

        Ok(FtpArgs {
            host: string("host").ok_or("no host given")?,
            port: args
                .try_get_one::<u16>("port")
                .ok()
                .flatten()
                .copied()
                .unwrap_or(DEFAULT_PORT),
            timeout: args
                .try_get_one::<Timeout>("timeout")
                .ok()
                .flatten()
                .copied()
                .unwrap_or(Timeout::Disabled),
            user: string("user"),
            password: string("password"),
            acct: string("acct").unwrap_or_default(),
        })
    }

    /// User and password for the login. Without a user the login is anonymous, and an anonymous
    /// login without a password (or with `-`) uses `anonymous@`.
    pub fn credentials(&self) -> (&str, &str) {
        let user = self
            .user
            .as_deref()
            .filter(|u| !u.is_empty())
            .unwrap_or(ANONYMOUS);
        let password = self.password.as_deref().unwrap_or_default();

        if user == ANONYMOUS && (password.is_empty() || password == "-") {
            (user, "anonymous@")
        } else {
            (user, password)
        }
    }
}

/// Connects, applies the timeout to the control socket and logs in.
///
/// The login follows the USER/PASS/ACCT sequence: PASS is sent when USER asks for a password and
/// ACCT when USER or PASS ask for an account.
fn login(args: &FtpArgs) -> Result<FtpStream, FtpError> {
    let mut stream = FtpStream::connect((args.host.as_str(), args.port))?;

    if let Timeout::After(timeout) = args.timeout {
        let tcp = stream.get_ref();
        tcp.set_read_timeout(Some(timeout))
            .and_then(|_| tcp.set_write_timeout(Some(timeout)))
            .map_err(FtpError::ConnectionError)?;
    }

    let (user, password) = args.credentials();

    send(&stream, &format!("USER {}", user))?;
    let mut code = stream
        .read_response_in(&[status::LOGGED_IN, status::NEED_PASSWORD, NEED_ACCOUNT])?
        .0;

    if code == status::NEED_PASSWORD {
        debug!("ftp >> PASS ****");
        send(&stream, &format!("PASS {}", password))?;
        code = stream
            .read_response_in(&[status::LOGGED_IN, SUPERFLUOUS, NEED_ACCOUNT])?
            .0;
    }

    if code == NEED_ACCOUNT {
        send(&stream, &format!("ACCT {}", args.acct))?;
        stream.read_response_in(&[status::LOGGED_IN, SUPERFLUOUS])?;
    }

    Ok(stream)
}

// Commands the client has no method for go straight to the control socket, replies are still
// read through the client.
fn send(stream: &FtpStream, command: &str) -> Result<(), FtpError> {
    if !command.starts_with("PASS ") {
        debug!("ftp >> {}", command);
    }
    let mut tcp = stream.get_ref();
    tcp.write_all(format!("{}\r\n", command).as_bytes())
        .map_err(FtpError::ConnectionError)
}

/// A plugin probing an FTP server.
///
/// [Ftp::connect] and [Ftp::quit] end the plugin with UNKNOWN on any error, so the check logic
/// only handles the successful path.
pub struct Ftp {
    monitor: Monitor,
    args: FtpArgs,
    stream: Option<FtpStream>,
}

impl Ftp {
    pub fn new() -> Self {
        Self::with_options::<FtpOptions>()
    }

    /// `O` has to keep the ftp options, usually by calling [define_ftp_options].
    pub fn with_options<O: PluginOptions>() -> Self {
        Self::try_from_args::<O>(std::env::args_os()).unwrap_or_else(|o| o.print_and_exit())
    }

    pub fn try_from_args<O: PluginOptions>(
        args: impl IntoIterator<Item = impl Into<OsString> + Clone>,
    ) -> Result<Self, Outcome> {
        let monitor = Monitor::try_from_args::<O>(args)?;
        let args = FtpArgs::from_matches(monitor.args())
            .map_err(|e| Outcome::unknown(format!("Parser arguments error: {}", e)))?;
        debug!("Init Ftp");

        Ok(Ftp {
            monitor,
            args,
            stream: None,
        })
    }

    pub fn monitor(&self) -> &Monitor {
        &self.monitor
    }

    pub fn monitor_mut(&mut self) -> &mut Monitor {
        &mut self.monitor
    }

    pub fn args(&self) -> &FtpArgs {
        &self.args
    }

    /// Connects and logs in to the server.
    pub fn connect(&mut self) -> &mut FtpStream {
        match self.open() {
            Ok(stream) => {
                debug!("ftp connect succeed.");
                self.stream.insert(stream)
            }
            Err(e) => self.monitor.unknown(format!(
                "Can not connect to the ftp: {}",
                single_line(&e.to_string())
            )),
        }
    }

    // The ftp client blocks on the TCP handshake and the greeting, so a bounded connect runs on
    // a worker. A worker still stuck after the timeout is dropped with the process.
    fn open(&self) -> Result<FtpStream, FtpError> {
        debug!(
            "connect to {}:{} with timeout {:?}",
            self.args.host, self.args.port, self.args.timeout
        );

        let Timeout::After(timeout) = self.args.timeout else {
            return login(&self.args);
        };

        let (tx, rx) = mpsc::channel();
        let args = self.args.clone();
        thread::spawn(move || {
            let _ = tx.send(login(&args));
        });

        match rx.recv_timeout(timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(FtpError::ConnectionError(io::Error::new(
                io::ErrorKind::TimedOut,
                format!("no answer within {}s", timeout.as_secs()),
            ))),
            Err(RecvTimeoutError::Disconnected) => Err(FtpError::ConnectionError(
                io::Error::new(io::ErrorKind::Other, "connect worker died"),
            )),
        }
    }

    /// Sends QUIT and closes the connection opened by [Ftp::connect].
    pub fn quit(&mut self) {
        let Some(stream) = self.stream.as_mut() else {
            self.monitor.unknown("quit connect error: not connected")
        };

        match stream.quit() {
            Ok(()) => {
                self.stream = None;
                debug!("quit connect succeed.");
            }
            Err(e) => self.monitor.unknown(format!(
                "quit connect error: {}",
                single_line(&e.to_string())
            )),
        }
    }
}

impl Default for Ftp {
    fn default() -> Self {
        Self::new()
    }
}
