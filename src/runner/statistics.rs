//local shortcuts
use crate::*;

//third-party shortcuts
use tokio::sync::mpsc;
use tokio::time::Instant;

//standard shortcuts
use core::fmt::Debug;
use std::collections::BTreeMap;

//-------------------------------------------------------------------------------------------------------------------

/// Aggregates [`TaskResult`]s while workers run.
///
/// The aggregator is the only writer of its totals.
#[derive(Debug)]
pub struct ResultStatistics
{
    started_at: Instant,
    last_observed: Option<Instant>,
    totals: SerialTaskResult,
    /// failure count per (category, error text)
    failures: BTreeMap<(String, String), u64>,
}

impl ResultStatistics
{
    pub fn new(started_at: Instant) -> ResultStatistics
    {
        ResultStatistics{ started_at, last_observed: None, totals: SerialTaskResult::default(), failures: BTreeMap::new() }
    }

    /// Fold one result into the totals.
    pub fn observe(&mut self, result: TaskResult)
    {
        self.last_observed = Some(Instant::now());
        self.totals.record(&result);

        if !result.success
        {
            tracing::debug!(category = %result.category, err = %result.err, "task failed");
            *self.failures.entry((result.category, result.err)).or_default() += 1;
        }
    }

    /// Totals so far. The serial time is only set by [`Self::finish()`].
    pub fn totals(&self) -> &SerialTaskResult
    {
        &self.totals
    }

    /// Compute the serial time and log failure groups.
    pub fn finish(mut self) -> SerialTaskResult
    {
        let last = self.last_observed.unwrap_or(self.started_at);
        self.totals.serial_time = last.saturating_duration_since(self.started_at);

        for ((category, err), count) in self.failures.iter()
        {
            tracing::warn!(%category, %err, count, "failed tasks");
        }

        self.totals
    }

    /// Drain `results` until every sender is dropped, then print and return the totals.
    pub async fn watch(mut self, mut results: mpsc::Receiver<TaskResult>) -> SerialTaskResult
    {
        while let Some(result) = results.recv().await
        {
            self.observe(result);
        }

        let totals = self.finish();
        totals.print();

        totals
    }
}

//-------------------------------------------------------------------------------------------------------------------
