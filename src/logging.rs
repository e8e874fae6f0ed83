use std::io::Write;

use log::LevelFilter;

/// Sends log records to stderr as `[LEVEL] (module) message`. Stdout belongs to the plugin output.
///
/// Only the first call installs the logger, later calls just move the level.
pub(crate) fn init(level: LevelFilter) {
    let _ = env_logger::Builder::new()
        .target(env_logger::Target::Stderr)
        .filter_level(LevelFilter::Trace)
        .format(|buf, record| {
            let module = record
                .module_path()
                .and_then(|path| path.rsplit("::").next())
                .unwrap_or_else(|| record.target());
            writeln!(buf, "[{}] ({}) {}", record.level(), module, record.args())
        })
        .try_init();

    log::set_max_level(level);
}
