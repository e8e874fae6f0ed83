//! Check that an FTP server accepts a login.
//!
//! Connects, logs in and quits, and reports the time this took as performance data. The check
//! goes WARNING or CRITICAL when the time exceeds `--warning` or `--critical` seconds.

use std::time::Instant;

use clap::{value_parser, Arg, Command};
use monitoringplugins::ftp::{Ftp, FtpOptions};
use monitoringplugins::{
    Outcome, PerfData, PluginOptions, Runner, Substitutions, TriggerIfValue, Unit,
};

struct CheckFtpOptions;

impl PluginOptions for CheckFtpOptions {
    fn define_sub_options(cmd: Command) -> Command {
        FtpOptions::define_sub_options(cmd)
            .next_help_heading("Threshold Options")
            .arg(
                Arg::new("warning")
                    .short('w')
                    .long("warning")
                    .value_parser(value_parser!(f64))
                    .help("Login time in seconds above which the check is WARNING"),
            )
            .arg(
                Arg::new("critical")
                    .short('c')
                    .long("critical")
                    .value_parser(value_parser!(f64))
                    .help("Login time in seconds above which the check is CRITICAL"),
            )
    }
}

fn main() {
    let mut ftp = Ftp::with_options::<CheckFtpOptions>();
    let warning = ftp.monitor().args().get_one::<f64>("warning").copied();
    let critical = ftp.monitor().args().get_one::<f64>("critical").copied();

    let started = Instant::now();
    ftp.connect();
    ftp.quit();
    let elapsed = (started.elapsed().as_secs_f64() * 1000.0).round() / 1000.0;

    let time = PerfData::new("time", elapsed)
        .with_unit(Unit::Seconds)
        .with_thresholds(warning, critical, TriggerIfValue::Greater)
        .with_min(0.0);
    let state = time.state();

    let mut substitutions = Substitutions::new();
    substitutions.insert("host".to_owned(), ftp.args().host.clone());
    substitutions.insert("port".to_owned(), ftp.args().port.to_string());
    substitutions.insert("time".to_owned(), format!("{:.3}", elapsed));

    let monitor = ftp.monitor_mut();
    monitor.set_short_output("FTP login to {host}:{port} took {time}s");
    monitor.push_perfdata(time);

    let monitor = ftp.monitor();
    Runner::new()
        .safe_run(|| {
            monitor
                .output(&substitutions, None)
                .map(|out| Outcome::new(state, out))
        })
        .print_and_exit()
}
