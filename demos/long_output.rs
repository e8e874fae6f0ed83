use monitoringplugins::{Monitor, PerfData, Substitutions, TriggerIfValue, Unit};

// Usage: cargo run --example long_output -- -H localhost
//        cargo run --example long_output -- -H localhost -D

fn main() {
    let mut monitor = Monitor::new();

    let mounts = [("/", 41), ("/var", 87), ("/home", 63)];
    let worst = mounts
        .iter()
        .map(|(_, used)| *used)
        .max()
        .unwrap_or_default();

    for (mount, used) in mounts {
        monitor.push_long_output(format!("{} is {}% full", mount, used));
        monitor.push_perfdata(
            PerfData::new(mount, used)
                .with_unit(Unit::Percentage)
                .with_thresholds(80, 90, TriggerIfValue::Greater)
                .with_min(0)
                .with_max(100),
        );
    }
    monitor.set_short_output("{count} filesystems checked on {host}");

    let mut substitutions = Substitutions::new();
    substitutions.insert("count".to_owned(), mounts.len().to_string());
    substitutions.insert(
        "host".to_owned(),
        monitor.host().unwrap_or_default().to_owned(),
    );

    // Only the first two mounts are listed, the trailer tells about the rest.
    let out = match monitor.output(&substitutions, Some(2)) {
        Ok(out) => out,
        Err(e) => monitor.unknown(e),
    };

    if worst > 90 {
        monitor.critical(out)
    } else if worst > 80 {
        monitor.warning(out)
    } else {
        monitor.ok(out)
    }
}
