//local shortcuts
use crate::*;

//third-party shortcuts
use tokio::sync::mpsc;
use tokio::time::Instant;

//standard shortcuts
use core::fmt::Debug;
use core::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

//-------------------------------------------------------------------------------------------------------------------

/// Config for a [`StressClient`] run.
#[derive(Debug, Clone)]
pub struct StressConfig
{
    /// Number of tasks to run. Defaults to 1.
    pub total: usize,
    /// Number of parallel workers. Values below 1 are treated as 1. Defaults to 1.
    pub concurrency: usize,
    /// Throttles task starts. Defaults to no limit.
    pub rate_limit: Option<RateLimitConfig>,
    /// Capacity of the result channel. Workers wait when it is full. Defaults to 1000.
    pub result_capacity: usize,
}

impl Default for StressConfig
{
    fn default() -> StressConfig
    {
        StressConfig{
                total           : 1,
                concurrency     : 1,
                rate_limit      : None,
                result_capacity : 1000,
            }
    }
}

//-------------------------------------------------------------------------------------------------------------------

/// Handed to each worker in [`StressClient::run_multi()`].
#[derive(Debug, Clone)]
pub struct WorkerContext
{
    worker: usize,
    total: usize,
    cursor: Arc<AtomicUsize>,
    limiter: Option<Arc<RateLimiter>>,
    results: mpsc::Sender<TaskResult>,
}

impl WorkerContext
{
    /// Index of this worker.
    pub fn worker(&self) -> usize
    {
        self.worker
    }

    /// Claim the next task. Returns its index, or `None` once every task has been claimed.
    ///
    /// Waits for a rate limiter token before returning a claimed task.
    pub async fn next_task(&self) -> Option<usize>
    {
        let index = self.cursor.fetch_add(1, Ordering::AcqRel);
        if index >= self.total { return None; }
        if let Some(limiter) = &self.limiter { limiter.take().await; }

        Some(index)
    }

    /// Hand a result to the aggregator. Waits while the result channel is full.
    pub async fn submit(&self, result: TaskResult)
    {
        if self.results.send(result).await.is_err()
        {
            tracing::error!(worker = self.worker, "result aggregator is gone, dropping task result");
        }
    }
}

//-------------------------------------------------------------------------------------------------------------------

/// Runs tasks across parallel workers and aggregates their results.
///
/// The aggregator starts before the workers. The result channel closes only after every worker has finished, and a
/// run returns only after the aggregator has observed every result.
#[derive(Debug)]
pub struct StressClient
{
    config: StressConfig,
    limiter: Option<Arc<RateLimiter>>,
}

impl StressClient
{
    pub fn new(config: StressConfig) -> StressClient
    {
        let limiter = config.rate_limit.map(|limit| Arc::new(RateLimiter::new(limit)));
        StressClient{ config, limiter }
    }

    pub fn config(&self) -> &StressConfig
    {
        &self.config
    }

    fn concurrency(&self) -> usize
    {
        self.config.concurrency.max(1)
    }

    /// Describe the run.
    pub fn header(&self) -> String
    {
        let mut header = format!("{} task(s) ready to run with {} thread(s)", self.config.total, self.concurrency());
        if let Some(limit) = &self.config.rate_limit
        {
            match limit.period == Duration::from_secs(1)
            {
                true  => header += &format!(", with {} task(s) limitation per second", limit.max_count),
                false => header += &format!(", with {} task(s) limitation per {:?}", limit.max_count, limit.period),
            }
        }

        header
    }

    /// Run `task` exactly `total` times. Each call receives the task index.
    pub async fn run<F, Fut>(&self, task: F) -> SerialTaskResult
    where
        F: Fn(usize) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = TaskResult> + Send + 'static,
    {
        let task = Arc::new(task);
        self.run_multi(move |context: WorkerContext|
            {
                let task = task.clone();
                async move {
                    while let Some(index) = context.next_task().await
                    {
                        let result = task(index).await;
                        context.submit(result).await;
                    }
                }
            }
        ).await
    }

    /// Run `concurrency` copies of `worker`. Workers claim tasks through their [`WorkerContext`] until the shared
    /// total is exhausted, and may submit any number of results per task.
    pub async fn run_multi<F, Fut>(&self, worker: F) -> SerialTaskResult
    where
        F: Fn(WorkerContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let started_at = Instant::now();
        let (results, results_receiver) = mpsc::channel(self.config.result_capacity.max(1));
        let aggregator = tokio::spawn(ResultStatistics::new(started_at).watch(results_receiver));

        let cursor = Arc::new(AtomicUsize::new(0));
        let mut workers = Vec::with_capacity(self.concurrency());
        for index in 0..self.concurrency()
        {
            let context = WorkerContext{
                    worker  : index,
                    total   : self.config.total,
                    cursor  : cursor.clone(),
                    limiter : self.limiter.clone(),
                    results : results.clone(),
                };
            workers.push(tokio::spawn(worker(context)));
        }

        // every worker must finish pushing before the channel closes
        for worker in workers
        {
            if let Err(err) = worker.await
            {
                tracing::error!(?err, "stress worker failed");
            }
        }
        drop(results);

        match aggregator.await
        {
            Ok(totals) => totals,
            Err(err) =>
            {
                tracing::error!(?err, "result aggregator failed");
                SerialTaskResult::default()
            }
        }
    }
}

//-------------------------------------------------------------------------------------------------------------------
