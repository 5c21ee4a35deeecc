use async_trait::async_trait;
use ctastreams::cta::kafka::{
    ConsumedRecord, ConsumerError, DrainOutcome, DropReason, KafkaClientError, Payload, PollSource,
    drain_once, handler_fn, run_poll_loop, stop_channel,
};
use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::Instant;

/// Source replaying a fixed script, then reporting empty polls forever
struct ScriptedSource {
    script: VecDeque<Result<ConsumedRecord, ConsumerError>>,
    poll_times: Vec<Instant>,
}

impl ScriptedSource {
    fn new(script: Vec<Result<ConsumedRecord, ConsumerError>>) -> Self {
        Self {
            script: script.into(),
            poll_times: Vec::new(),
        }
    }

    fn empty() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl PollSource for ScriptedSource {
    fn label(&self) -> &str {
        "org.chicago.cta.turnstiles"
    }

    async fn poll(&mut self) -> Option<Result<ConsumedRecord, ConsumerError>> {
        self.poll_times.push(Instant::now());
        self.script.pop_front()
    }
}

fn turnstile(offset: i64) -> ConsumedRecord {
    ConsumedRecord::new(
        "org.chicago.cta.turnstiles",
        0,
        offset,
        Payload::Null,
        Payload::Raw(format!(r#"{{"station_id": {}}}"#, 40000 + offset).into_bytes()),
    )
}

#[tokio::test(start_paused = true)]
async fn test_empty_polls_sleep_between_cycles() {
    let interval = Duration::from_secs(1);
    let (stop, signal) = stop_channel();
    let mut source = ScriptedSource::empty();
    let mut handler = handler_fn(|_: &ConsumedRecord| Ok(()));

    let task = tokio::spawn(async move {
        let stats = run_poll_loop(&mut source, &mut handler, interval, signal).await;
        (stats, source.poll_times)
    });

    tokio::time::sleep(Duration::from_millis(3500)).await;
    stop.stop();
    let (stats, poll_times) = task.await.unwrap();

    assert_eq!(poll_times.len(), 4);
    assert_eq!(stats.idle_cycles, 4);
    assert_eq!(stats.processed, 0);
    for pair in poll_times.windows(2) {
        assert!(pair[1] - pair[0] >= interval);
    }
}

#[tokio::test(start_paused = true)]
async fn test_burst_is_drained_without_sleeping() {
    let (stop, signal) = stop_channel();
    let mut source = ScriptedSource::new((1..=3).map(|o| Ok(turnstile(o))).collect());
    let mut handler = handler_fn(|_: &ConsumedRecord| Ok(()));

    let task = tokio::spawn(async move {
        let stats = run_poll_loop(&mut source, &mut handler, Duration::from_secs(5), signal).await;
        (stats, source.poll_times)
    });

    tokio::time::sleep(Duration::from_millis(500)).await;
    stop.stop();
    let (stats, poll_times) = task.await.unwrap();

    assert_eq!(stats.processed, 3);
    assert_eq!(stats.idle_cycles, 1);
    assert_eq!(poll_times.len(), 4);
    assert_eq!(poll_times[0], poll_times[3]);
}

#[tokio::test]
async fn test_failing_message_is_logged_and_skipped() {
    let mut source = ScriptedSource::new(vec![Ok(turnstile(1)), Ok(turnstile(2))]);
    let mut attempts = Vec::new();
    let mut handler = handler_fn(|record: &ConsumedRecord| {
        attempts.push(record.offset);
        if record.offset == 1 {
            Err("turnstile record rejected".into())
        } else {
            Ok(())
        }
    });

    let first = drain_once(&mut source, &mut handler).await;
    let second = drain_once(&mut source, &mut handler).await;
    let third = drain_once(&mut source, &mut handler).await;
    drop(handler);

    assert_eq!(
        first,
        DrainOutcome::Dropped(DropReason::Handler("turnstile record rejected".to_string()))
    );
    assert_eq!(second, DrainOutcome::Processed);
    assert_eq!(third, DrainOutcome::Idle);
    assert_eq!(attempts, vec![1, 2]);
}

#[tokio::test]
async fn test_progress_only_when_handled() {
    let mut source = ScriptedSource::new(vec![
        Err(KafkaClientError::Timeout),
        Ok(turnstile(7)),
    ]);
    let mut handler = handler_fn(|_: &ConsumedRecord| Ok(()));

    let transport = drain_once(&mut source, &mut handler).await;
    let handled = drain_once(&mut source, &mut handler).await;
    let idle = drain_once(&mut source, &mut handler).await;

    assert!(!transport.made_progress());
    assert!(matches!(
        transport,
        DrainOutcome::Dropped(DropReason::Transport(_))
    ));
    assert!(handled.made_progress());
    assert!(!idle.made_progress());
}

#[tokio::test(start_paused = true)]
async fn test_stop_before_start_skips_polling() {
    let (stop, signal) = stop_channel();
    stop.stop();
    let mut source = ScriptedSource::new(vec![Ok(turnstile(1))]);
    let mut handler = handler_fn(|_: &ConsumedRecord| Ok(()));

    let stats = run_poll_loop(&mut source, &mut handler, Duration::from_secs(1), signal).await;

    assert_eq!(stats.processed, 0);
    assert!(source.poll_times.is_empty());
}
