use std::sync::Mutex;

use log::{Log, Metadata, Record};
use monitoringplugins::Monitor;

/// Keeps the messages logged by the library. Installed before any plugin sets up its own logger,
/// which then stays out of the way.
struct Capture(Mutex<Vec<String>>);

impl Log for Capture {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.target().starts_with("monitoringplugins")
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            self.0.lock().unwrap().push(record.args().to_string());
        }
    }

    fn flush(&self) {}
}

static CAPTURE: Capture = Capture(Mutex::new(Vec::new()));

fn take() -> Vec<String> {
    std::mem::take(&mut *CAPTURE.0.lock().unwrap())
}

// One test, the logger is process wide.
#[test]
fn test_debug_block_markers() {
    log::set_logger(&CAPTURE).unwrap();

    Monitor::try_new(["check", "-D", "-H", "h"]).unwrap();
    assert_eq!(
        take(),
        ["===== BEGIN DEBUG =====", "Init Monitor", "===== END DEBUG ====="]
    );

    #[cfg(feature = "ftp")]
    {
        use monitoringplugins::ftp::{Ftp, FtpOptions};

        Ftp::try_from_args::<FtpOptions>(["check_ftp", "-D", "-H", "h"]).unwrap();
        assert_eq!(
            take(),
            ["===== BEGIN DEBUG =====", "Init Monitor", "Init Ftp"]
        );
    }

    Monitor::try_new(["check", "-H", "h"]).unwrap();
    assert!(take().is_empty());
}
