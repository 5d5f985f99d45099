// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Worker loop behavior with a scripted poster.

use async_trait::async_trait;
use osem_relay::{
    Backlog, OutcomeSink, Payload, PayloadBuilder, PostReceipt, PostRecord, Record,
    SensorMapping, SensorSpec, UploadError, UploadOutcome, UploadPolicy, UploadWorker,
};
use osem_units::UnitSystem;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Poster that fails a fixed number of times, then succeeds.
struct FlakyPoster {
    failures_left: Mutex<u32>,
    calls: Mutex<Vec<(Instant, String)>>,
}

impl FlakyPoster {
    fn new(failures: u32) -> Arc<Self> {
        Arc::new(Self {
            failures_left: Mutex::new(failures),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn always_failing() -> Arc<Self> {
        Self::new(u32::MAX)
    }

    fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    fn bodies(&self) -> Vec<String> {
        self.calls.lock().iter().map(|(_, b)| b.clone()).collect()
    }

    fn call_times(&self) -> Vec<Instant> {
        self.calls.lock().iter().map(|(t, _)| *t).collect()
    }
}

#[async_trait]
impl PostRecord for FlakyPoster {
    async fn post(&self, payload: &Payload) -> Result<PostReceipt, UploadError> {
        self.calls
            .lock()
            .push((Instant::now(), payload.body_str().to_string()));

        let mut left = self.failures_left.lock();
        if *left > 0 {
            *left -= 1;
            return Err(UploadError::http_status(500, "Internal Server Error"));
        }
        Ok(PostReceipt {
            status: 201,
            body: "\"Measurements saved in box\"".into(),
        })
    }

    fn redacted_url(&self) -> String {
        "http://mock/boxes/XXXXXXXXXXXXXX/data".into()
    }
}

/// Poster that holds every request for a fixed time before accepting it.
struct SlowPoster {
    delay: Duration,
    calls: Mutex<Vec<String>>,
}

#[async_trait]
impl PostRecord for SlowPoster {
    async fn post(&self, payload: &Payload) -> Result<PostReceipt, UploadError> {
        self.calls.lock().push(payload.body_str().to_string());
        tokio::time::sleep(self.delay).await;
        Ok(PostReceipt {
            status: 201,
            body: "\"Measurements saved in box\"".into(),
        })
    }

    fn redacted_url(&self) -> String {
        "http://mock/boxes/XXXXXXXXXXXXXX/data".into()
    }
}

/// Sink that records everything it is told.
#[derive(Default)]
struct CollectingSink {
    attempts: Mutex<Vec<(u32, u32)>>,
    outcomes: Mutex<Vec<(i64, UploadOutcome)>>,
}

impl OutcomeSink for CollectingSink {
    fn attempt_failed(&self, _record: &Record, attempt: u32, max_tries: u32, error: &UploadError) {
        assert!(!error.to_string().is_empty());
        self.attempts.lock().push((attempt, max_tries));
    }

    fn outcome(&self, record: &Record, outcome: &UploadOutcome) {
        self.outcomes.lock().push((record.date_time, outcome.clone()));
    }
}

fn mapping() -> Arc<SensorMapping> {
    Arc::new(SensorMapping::new().with("outTemp", SensorSpec::new("S1")))
}

fn rec(t: i64) -> Record {
    Record::new(t, UnitSystem::Metric).with("outTemp", 20.0)
}

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

fn fast_policy() -> UploadPolicy {
    UploadPolicy::default()
        .with_max_tries(3)
        .with_retry_wait(Duration::from_millis(50))
}

fn worker(
    backlog: &Arc<Backlog>,
    poster: &Arc<FlakyPoster>,
    sink: &Arc<CollectingSink>,
    policy: UploadPolicy,
) -> UploadWorker<Arc<FlakyPoster>, Arc<CollectingSink>> {
    UploadWorker::new(
        Arc::clone(backlog),
        Arc::clone(poster),
        Arc::clone(sink),
        PayloadBuilder::new(mapping(), false),
        policy,
    )
}

#[tokio::test]
async fn test_exhausted_retries_are_spaced_and_bounded() {
    let backlog = Arc::new(Backlog::new(8));
    let poster = FlakyPoster::always_failing();
    let sink = Arc::new(CollectingSink::default());
    let mut w = worker(&backlog, &poster, &sink, fast_policy());

    let outcome = w.process(rec(now())).await;

    match outcome {
        UploadOutcome::Failed { attempts, reason } => {
            assert_eq!(attempts, 3);
            assert!(matches!(reason, UploadError::HttpStatus { status: 500, .. }));
        }
        other => panic!("expected Failed, got {:?}", other),
    }
    assert_eq!(poster.call_count(), 3);
    assert_eq!(*sink.attempts.lock(), vec![(1, 3), (2, 3), (3, 3)]);

    let times = poster.call_times();
    for pair in times.windows(2) {
        assert!(pair[1] - pair[0] >= Duration::from_millis(50));
    }
}

#[tokio::test]
async fn test_single_try_does_not_wait() {
    let backlog = Arc::new(Backlog::new(8));
    let poster = FlakyPoster::always_failing();
    let sink = Arc::new(CollectingSink::default());
    let policy = UploadPolicy::default()
        .with_max_tries(1)
        .with_retry_wait(Duration::from_secs(30));
    let mut w = worker(&backlog, &poster, &sink, policy);

    let started = Instant::now();
    let outcome = w.process(rec(now())).await;

    assert!(matches!(outcome, UploadOutcome::Failed { attempts: 1, .. }));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_stale_record_makes_no_attempt() {
    let backlog = Arc::new(Backlog::new(8));
    let poster = FlakyPoster::new(0);
    let sink = Arc::new(CollectingSink::default());
    let policy = fast_policy().with_stale(Some(Duration::from_secs(600)));
    let mut w = worker(&backlog, &poster, &sink, policy);

    let outcome = w.process(rec(now() - 3_600)).await;

    assert!(matches!(outcome, UploadOutcome::Stale { .. }));
    assert_eq!(poster.call_count(), 0);
    assert!(sink.attempts.lock().is_empty());
}

#[tokio::test]
async fn test_empty_payload_is_not_posted() {
    let backlog = Arc::new(Backlog::new(8));
    let poster = FlakyPoster::new(0);
    let sink = Arc::new(CollectingSink::default());
    let mut w = worker(&backlog, &poster, &sink, fast_policy());

    let record = Record::new(now(), UnitSystem::Metric).with("barometer", 1013.0);
    assert_eq!(w.process(record).await, UploadOutcome::Empty);
    assert_eq!(poster.call_count(), 0);
}

#[tokio::test]
async fn test_skip_upload_formats_but_never_posts() {
    let backlog = Arc::new(Backlog::new(8));
    let poster = FlakyPoster::new(0);
    let sink = Arc::new(CollectingSink::default());
    let mut w = worker(&backlog, &poster, &sink, fast_policy().with_skip_upload(true));

    assert_eq!(w.process(rec(now())).await, UploadOutcome::SkippedUpload);
    assert_eq!(poster.call_count(), 0);
}

#[tokio::test]
async fn test_stop_during_retry_wait_abandons_record() {
    let backlog = Arc::new(Backlog::new(8));
    let poster = FlakyPoster::always_failing();
    let sink = Arc::new(CollectingSink::default());
    let policy = UploadPolicy::default()
        .with_max_tries(5)
        .with_retry_wait(Duration::from_secs(30));
    let w = worker(&backlog, &poster, &sink, policy);

    backlog.push(rec(now()));
    let join = tokio::spawn(w.run());

    // Let the first attempt happen, then stop while the worker waits.
    tokio::time::sleep(Duration::from_millis(100)).await;
    backlog.stop();

    let stats = tokio::time::timeout(Duration::from_secs(5), join)
        .await
        .expect("worker did not stop")
        .expect("join");

    assert_eq!(poster.call_count(), 1);
    assert_eq!(stats.abandoned, 1);
    assert_eq!(stats.failed, 0);
    match &sink.outcomes.lock()[0].1 {
        UploadOutcome::Abandoned {
            attempts,
            last_failure,
        } => {
            assert_eq!(*attempts, 1);
            assert!(matches!(
                last_failure,
                Some(UploadError::HttpStatus { status: 500, .. })
            ));
        }
        other => panic!("expected Abandoned, got {:?}", other),
    };
}

#[tokio::test]
async fn test_close_drains_backlog_in_order() {
    let backlog = Arc::new(Backlog::new(8));
    let poster = FlakyPoster::new(0);
    let sink = Arc::new(CollectingSink::default());
    let w = worker(&backlog, &poster, &sink, fast_policy());

    let base = now();
    for i in 0..4 {
        let record = Record::new(base + i, UnitSystem::Metric).with("outTemp", i as f64);
        backlog.push(record);
    }
    backlog.close();

    let stats = tokio::time::timeout(Duration::from_secs(5), w.run())
        .await
        .expect("worker did not drain");

    assert_eq!(stats.posted, 4);
    assert_eq!(
        poster.bodies(),
        vec![
            r#"{"S1":"0.0"}"#,
            r#"{"S1":"1.0"}"#,
            r#"{"S1":"2.0"}"#,
            r#"{"S1":"3.0"}"#,
        ]
    );
    let order: Vec<i64> = sink.outcomes.lock().iter().map(|(t, _)| *t).collect();
    assert_eq!(order, vec![base, base + 1, base + 2, base + 3]);
}

#[tokio::test]
async fn test_failure_does_not_block_following_records() {
    let backlog = Arc::new(Backlog::new(8));
    // First record burns all three tries, second succeeds.
    let poster = FlakyPoster::new(3);
    let sink = Arc::new(CollectingSink::default());
    let w = worker(&backlog, &poster, &sink, fast_policy());

    backlog.push(rec(now()));
    backlog.push(rec(now() + 1));
    backlog.close();

    let stats = tokio::time::timeout(Duration::from_secs(5), w.run())
        .await
        .expect("worker did not drain");

    assert_eq!(stats.failed, 1);
    assert_eq!(stats.posted, 1);
    assert_eq!(stats.attempts, 4);
}

#[tokio::test]
async fn test_extreme_timestamps_do_not_stop_the_worker() {
    let backlog = Arc::new(Backlog::new(8));
    let poster = FlakyPoster::new(0);
    let sink = Arc::new(CollectingSink::default());
    let policy = fast_policy().with_stale(Some(Duration::from_secs(600)));
    let w = worker(&backlog, &poster, &sink, policy);

    backlog.push(Record::new(i64::MIN, UnitSystem::Metric).with("outTemp", 1.0));
    backlog.push(rec(now()));
    backlog.close();

    let stats = tokio::time::timeout(Duration::from_secs(5), tokio::spawn(w.run()))
        .await
        .expect("worker did not drain")
        .expect("worker panicked");

    assert_eq!(stats.stale, 1);
    assert_eq!(stats.posted, 1);
    assert_eq!(
        sink.outcomes.lock()[0].1,
        UploadOutcome::Stale { age_secs: i64::MAX }
    );
}

#[tokio::test]
async fn test_extreme_timestamps_with_post_interval() {
    let backlog = Arc::new(Backlog::new(8));
    let poster = FlakyPoster::new(0);
    let sink = Arc::new(CollectingSink::default());
    let policy = fast_policy().with_post_interval(Some(Duration::from_secs(60)));
    let w = worker(&backlog, &poster, &sink, policy);

    backlog.push(rec(i64::MAX));
    backlog.push(rec(i64::MIN));
    backlog.close();

    let stats = tokio::time::timeout(Duration::from_secs(5), tokio::spawn(w.run()))
        .await
        .expect("worker did not drain")
        .expect("worker panicked");

    assert_eq!(stats.posted, 1);
    assert_eq!(stats.rate_limited, 1);
    assert_eq!(
        sink.outcomes.lock()[1].1,
        UploadOutcome::RateLimited {
            since_last_secs: i64::MIN
        }
    );
}

#[tokio::test]
async fn test_stop_during_post_finishes_attempt_and_drops_queue() {
    let backlog = Arc::new(Backlog::new(8));
    let poster = Arc::new(SlowPoster {
        delay: Duration::from_millis(300),
        calls: Mutex::new(Vec::new()),
    });
    let sink = Arc::new(CollectingSink::default());
    let w = UploadWorker::new(
        Arc::clone(&backlog),
        Arc::clone(&poster),
        Arc::clone(&sink),
        PayloadBuilder::new(mapping(), false),
        fast_policy(),
    );

    let base = now();
    backlog.push(rec(base));
    backlog.push(rec(base + 1));
    let join = tokio::spawn(w.run());

    // First POST is in flight; the second record is still queued.
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(backlog.stop(), 1);

    let stats = tokio::time::timeout(Duration::from_secs(5), join)
        .await
        .expect("worker did not stop")
        .expect("join");

    assert_eq!(poster.calls.lock().len(), 1);
    assert_eq!(stats.posted, 1);
    assert_eq!(stats.attempts, 1);
    assert_eq!(
        *sink.outcomes.lock(),
        vec![(base, UploadOutcome::Posted { attempts: 1 })]
    );
    assert!(backlog.is_empty());
}
