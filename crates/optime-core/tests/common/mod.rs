use std::sync::Arc;

use optime_core::{Level, Logger, ManualClock, MemorySink, Tick};

/// Create a logger over a fresh in-memory sink with every level enabled
#[allow(dead_code)]
pub fn memory_logger() -> (MemorySink, Logger) {
    let sink = MemorySink::new();
    let logger = Logger::new(sink.clone());
    (sink, logger)
}

/// Create a logger over a level-filtered sink, timed by a manual clock
///
/// The clock starts well away from zero so tests can move it backwards.
#[allow(dead_code)]
pub fn manual_logger(min_level: Level) -> (MemorySink, Logger, Arc<ManualClock>) {
    let sink = MemorySink::with_min_level(min_level);
    let clock = Arc::new(ManualClock::new(Tick::from_nanos(60_000_000_000)));
    let logger = Logger::new(sink.clone()).with_clock(clock.clone());
    (sink, logger, clock)
}

/// A plain I/O error for exception attachment tests
#[allow(dead_code)]
pub fn failure(message: &str) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, message.to_string())
}
