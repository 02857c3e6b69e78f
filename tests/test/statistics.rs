//local shortcuts
use cometd_stress::*;

//third-party shortcuts
use tokio::time::Instant;

//standard shortcuts
use std::time::Duration;

//-------------------------------------------------------------------------------------------------------------------

fn result_taking(millis: u64, success: bool) -> TaskResult
{
    let start = Instant::now();
    let end = start + Duration::from_millis(millis);
    match success
    {
        true  => TaskResult::success("test", start, end),
        false => TaskResult::failure("test", start, end, "boom"),
    }
}

//-------------------------------------------------------------------------------------------------------------------
//-------------------------------------------------------------------------------------------------------------------

#[test]
fn totals_track_counts_and_extremes()
{
    let mut totals = SerialTaskResult::default();
    totals.record(&result_taking(10, true));
    totals.record(&result_taking(50, false));
    totals.record(&result_taking(30, true));

    assert_eq!(totals.success_num, 2);
    assert_eq!(totals.failure_num, 1);
    assert_eq!(totals.total(), 3);
    assert_eq!(totals.process_time, Duration::from_millis(90));
    assert_eq!(totals.max_time, Duration::from_millis(50));
    assert_eq!(totals.min_time, Duration::from_millis(10));
    assert_eq!(totals.average_time(), Duration::from_millis(30));

    let report = totals.report();
    assert!(report.contains("2 task(s) succeeded, 1 task(s) failed\n"));
    assert!(report.contains("process takes 90 ms\n"));
    assert!(report.contains("max process takes 50 ms\n"));
    assert!(report.contains("min process takes 10 ms\n"));
    assert!(report.contains("avg process takes 30 ms\n"));
}

#[test]
fn empty_totals_report_zeros()
{
    let totals = SerialTaskResult::default();
    assert_eq!(totals.average_time(), Duration::ZERO);
    assert_eq!(totals.report(), "0 task(s) succeeded, 0 task(s) failed\n\
        tasks takes 0 ms\n\
        process takes 0 ms\n\
        max process takes 0 ms\n\
        min process takes 0 ms\n\
        avg process takes 0 ms\n");
}

#[test]
fn failures_always_carry_a_reason()
{
    let now = Instant::now();
    let result = TaskResult::failure("test", now, now, "");
    assert!(!result.success);
    assert!(!result.err.is_empty());

    // end before start clamps to zero
    let result = TaskResult::success("test", now + Duration::from_millis(5), now);
    assert_eq!(result.process_time(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn timed_tasks_record_outcome_and_duration()
{
    let result = TaskResult::timed("ok", async {
            tokio::time::sleep(Duration::from_millis(40)).await;
            Ok::<(), SessionError>(())
        }).await;
    assert!(result.success);
    assert!(result.err.is_empty());
    assert_eq!(result.process_time(), Duration::from_millis(40));

    let result = TaskResult::timed("bad", async { Err::<(), _>(SessionError::JoinRejected) }).await;
    assert!(!result.success);
    assert_eq!(result.category, "bad");
    assert_eq!(result.err, "SessionError::JoinRejected");
}

#[tokio::test(start_paused = true)]
async fn aggregator_drains_until_senders_are_gone()
{
    let started_at = Instant::now();
    let (sender, receiver) = tokio::sync::mpsc::channel(2);
    let aggregator = tokio::spawn(ResultStatistics::new(started_at).watch(receiver));

    for n in 0..5
    {
        tokio::time::sleep(Duration::from_millis(20)).await;
        sender.send(result_taking(n * 10, n % 2 == 0)).await.unwrap();
    }
    drop(sender);

    let totals = aggregator.await.unwrap();
    assert_eq!(totals.success_num, 3);
    assert_eq!(totals.failure_num, 2);
    assert_eq!(totals.max_time, Duration::from_millis(40));
    assert_eq!(totals.min_time, Duration::ZERO);
    assert_eq!(totals.serial_time, Duration::from_millis(100));
}

#[test]
fn finish_without_results_has_no_serial_time()
{
    let mut statistics = ResultStatistics::new(Instant::now());
    statistics.observe(result_taking(5, false));
    assert_eq!(statistics.totals().failure_num, 1);

    let totals = ResultStatistics::new(Instant::now()).finish();
    assert_eq!(totals, SerialTaskResult::default());
}

//-------------------------------------------------------------------------------------------------------------------
