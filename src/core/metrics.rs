use std::time::{Duration, Instant};
use tracing::{debug, info, Level};

/// Timer for provider round-trips and exports
pub struct Timer {
    operation: String,
    start: Instant,
    log_level: Level,
}

impl Timer {
    /// Start a new timer with info level logging
    pub fn start(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            start: Instant::now(),
            log_level: Level::INFO,
        }
    }

    /// Start a new timer with debug level logging
    pub fn start_debug(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            start: Instant::now(),
            log_level: Level::DEBUG,
        }
    }

    /// Stop the timer and log the duration of a successful operation
    pub fn stop(self) -> Duration {
        self.log(true)
    }

    /// Stop the timer and log the duration along with whether `result` is Ok
    pub fn stop_with_result<T, E>(self, result: &Result<T, E>) -> Duration {
        self.log(result.is_ok())
    }

    fn log(self, succeeded: bool) -> Duration {
        let duration = self.start.elapsed();
        match self.log_level {
            Level::INFO => {
                info!(
                    operation = %self.operation,
                    duration_ms = duration.as_millis(),
                    succeeded,
                    "Operation completed"
                );
            }
            Level::DEBUG => {
                debug!(
                    operation = %self.operation,
                    duration_ms = duration.as_millis(),
                    succeeded,
                    "Operation completed"
                );
            }
            _ => {}
        }
        duration
    }
}
