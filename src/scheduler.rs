use crate::error::ConfigError;
use crate::pipeline::{CycleOutcome, Pipeline};
use std::str::FromStr;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TimeUnit {
    Seconds,
    Minutes,
    Hours,
}

impl TimeUnit {
    fn seconds(&self) -> u64 {
        match self {
            TimeUnit::Seconds => 1,
            TimeUnit::Minutes => 60,
            TimeUnit::Hours => 60 * 60,
        }
    }
}

impl FromStr for TimeUnit {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "s" | "seconds" => Ok(TimeUnit::Seconds),
            "m" | "minutes" => Ok(TimeUnit::Minutes),
            "h" | "hours" => Ok(TimeUnit::Hours),
            other => Err(ConfigError::invalid(
                "unit_time",
                format!("unknown time unit '{}'", other),
            )),
        }
    }
}

/// Validated, strictly positive polling interval.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Interval(Duration);

impl Interval {
    pub fn new(value: i64, unit: TimeUnit) -> Result<Self, ConfigError> {
        if value <= 0 {
            return Err(ConfigError::invalid(
                "delta_time",
                format!("must be > 0, got {}", value),
            ));
        }
        let seconds = (value as u64)
            .checked_mul(unit.seconds())
            .ok_or_else(|| ConfigError::invalid("delta_time", format!("{} is too large", value)))?;
        Ok(Interval(Duration::from_secs(seconds)))
    }

    pub fn as_duration(&self) -> Duration {
        self.0
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Schedule {
    /// Run exactly one cycle
    Once,
    /// Run a cycle every interval until cancelled
    Every(Interval),
}

/// What the scheduler did before it returned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunReport {
    pub cycles: usize,
    pub last_outcome: Option<CycleOutcome>,
}

pub struct Scheduler {
    schedule: Schedule,
    poll_increment: Duration,
}

impl Scheduler {
    pub fn new(schedule: Schedule, poll_increment: Duration) -> Self {
        Self {
            schedule,
            poll_increment,
        }
    }

    pub async fn run(&self, pipeline: &mut Pipeline, cancel: &CancellationToken) -> RunReport {
        match self.schedule {
            Schedule::Once => {
                let outcome = pipeline.run_cycle(cancel).await;
                RunReport {
                    cycles: 1,
                    last_outcome: Some(outcome),
                }
            }
            Schedule::Every(interval) => self.run_every(interval.as_duration(), pipeline, cancel).await,
        }
    }

    async fn run_every(
        &self,
        interval: Duration,
        pipeline: &mut Pipeline,
        cancel: &CancellationToken,
    ) -> RunReport {
        let mut report = RunReport {
            cycles: 0,
            last_outcome: None,
        };
        let mut next_due = Instant::now();

        tracing::info!(interval_sec = interval.as_secs(), "Starting scraper loop");
        loop {
            if cancel.is_cancelled() {
                break;
            }

            let now = Instant::now();
            if now >= next_due {
                next_due = now + interval;
                let outcome = pipeline.run_cycle(cancel).await;
                report.cycles += 1;
                report.last_outcome = Some(outcome);
                tracing::debug!(cycle = report.cycles, ?outcome, "Cycle finished");
                if outcome == CycleOutcome::Cancelled {
                    break;
                }
            }

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = sleep(self.poll_increment) => {}
            }
        }

        tracing::info!("Stopping scraper.");
        report
    }
}
