//local shortcuts

//third-party shortcuts
use tokio::time::Instant;

//standard shortcuts
use core::fmt::{Debug, Display};
use core::future::Future;
use std::fmt::Write;
use std::time::Duration;

//-------------------------------------------------------------------------------------------------------------------

/// Outcome of one task run (one play session or bootstrap call).
#[derive(Debug, Clone)]
pub struct TaskResult
{
    pub start_time: Instant,
    pub end_time: Instant,
    pub success: bool,
    /// Groups results in the failure summary.
    pub category: String,
    /// Failure reason. Empty on success, never empty on failure.
    pub err: String,
}

impl TaskResult
{
    pub fn success(category: impl Into<String>, start_time: Instant, end_time: Instant) -> TaskResult
    {
        TaskResult{ start_time, end_time, success: true, category: category.into(), err: String::default() }
    }

    pub fn failure(
        category   : impl Into<String>,
        start_time : Instant,
        end_time   : Instant,
        err        : impl Into<String>,
    ) -> TaskResult
    {
        let mut err = err.into();
        if err.is_empty() { err = String::from("unknown error"); }
        TaskResult{ start_time, end_time, success: false, category: category.into(), err }
    }

    /// Run a task and time it.
    pub async fn timed<E, F>(category: impl Into<String>, task: F) -> TaskResult
    where
        E: Display,
        F: Future<Output = Result<(), E>>,
    {
        let start_time = Instant::now();
        let result = task.await;
        let end_time = Instant::now();

        match result
        {
            Ok(())   => TaskResult::success(category, start_time, end_time),
            Err(err) => TaskResult::failure(category, start_time, end_time, err.to_string()),
        }
    }

    /// Time from start to end. Never negative.
    pub fn process_time(&self) -> Duration
    {
        self.end_time.saturating_duration_since(self.start_time)
    }
}

//-------------------------------------------------------------------------------------------------------------------

/// Running totals over every [`TaskResult`] observed by the aggregator.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct SerialTaskResult
{
    pub success_num: u64,
    pub failure_num: u64,
    /// Sum of every observed process time.
    pub process_time: Duration,
    /// Wall-clock time from orchestration start to the last observed result.
    pub serial_time: Duration,
    pub max_time: Duration,
    /// Zero until the first result is observed.
    pub min_time: Duration,
}

impl SerialTaskResult
{
    /// Fold a result into the totals.
    pub fn record(&mut self, result: &TaskResult)
    {
        let first = self.total() == 0;
        match result.success
        {
            true  => self.success_num += 1,
            false => self.failure_num += 1,
        }

        let process_time = result.process_time();
        self.process_time += process_time;
        self.max_time = self.max_time.max(process_time);
        self.min_time = match first { true => process_time, false => self.min_time.min(process_time) };
    }

    /// Number of results observed.
    pub fn total(&self) -> u64
    {
        self.success_num + self.failure_num
    }

    /// Mean process time, or zero if nothing was observed.
    pub fn average_time(&self) -> Duration
    {
        let total = self.total();
        if total == 0 { return Duration::ZERO; }
        Duration::from_nanos((self.process_time.as_nanos() / total as u128) as u64)
    }

    /// Render the final report.
    pub fn report(&self) -> String
    {
        let mut report = String::new();
        let _ = writeln!(report, "{} task(s) succeeded, {} task(s) failed", self.success_num, self.failure_num);
        let _ = writeln!(report, "tasks takes {} ms", self.serial_time.as_millis());
        let _ = writeln!(report, "process takes {} ms", self.process_time.as_millis());
        let _ = writeln!(report, "max process takes {} ms", self.max_time.as_millis());
        let _ = writeln!(report, "min process takes {} ms", self.min_time.as_millis());
        let _ = writeln!(report, "avg process takes {} ms", self.average_time().as_millis());

        report
    }

    /// Print the final report to stdout.
    pub fn print(&self)
    {
        print!("{}", self.report());
    }
}

//-------------------------------------------------------------------------------------------------------------------
