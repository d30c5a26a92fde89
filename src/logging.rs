use chrono::{SecondsFormat, Utc};
use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Writes each record to stderr, prefixed by a UTC timestamp and the level,
/// so stdout stays free for command output.
pub struct Logger {
    level: LevelFilter,
}

impl Log for Logger {
    fn enabled(&self, meta: &Metadata) -> bool {
        meta.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let time_string = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
            eprintln!(
                "{} {:5}| {}",
                &time_string[2..],
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {}
}

pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    //! Install the [`Logger`] as the global `log` backend. Only the first
    //! call succeeds.

    let logger: &'static Logger = Box::leak(Box::new(Logger { level }));
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}
