//! # Pipeline tests
//!
//! End-to-end runs of the controller against a scripted knowledge base and
//! an in-memory sink.

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use common::{ScriptedKb, inception, named};
use mediaminer::{
    Controller, ErrorKind, FileTask, ItemQueue, MemorySink, MinerConfig, MinerError, OutputSink,
    QueueItem, Stage, UpdateBatch, VecQueue,
};
use mediaminer_core::update::{NIE_CONTENT_CREATED, NIE_TITLE, NMM_MPAA_RATING, Object};

fn controller(kb: Arc<ScriptedKb>, sink: Arc<dyn OutputSink>) -> Controller {
    Controller::new(kb, sink, &MinerConfig::default()).unwrap()
}

#[tokio::test]
async fn inception_end_to_end() {
    // --- Arrange ---
    let kb = Arc::new(ScriptedKb::default().film("Inception", "X", 80.0, inception()));
    let sink = Arc::new(MemorySink::new());
    let mut controller = controller(Arc::clone(&kb), sink.clone());
    let (item, rx) = QueueItem::with_completion("file:///videos/Inception.2010.mkv", "urn:video:1");
    let mut queue = VecQueue::new([item]);

    // --- Act ---
    let report = controller.drain(&mut queue).await;

    // --- Assert ---
    assert_eq!(report.succeeded, 1);
    let done = rx.await.unwrap().unwrap();
    assert_eq!(done.identity.title, "Inception");
    assert!(!done.identity.is_episodic());
    assert_eq!(done.id.as_str(), "X");
    assert_eq!(done.record.title.as_deref(), Some("Inception"));
    assert_eq!(done.record.release_date_iso().as_deref(), Some("2010-10-24T00:00:00Z"));
    assert_eq!(done.record.rating.as_deref(), Some("PG-13"));
    assert!(!done.record.is_episodic);

    assert_eq!(kb.calls(), ["search:Inception", "topic:X"]);
    assert_eq!(sink.objects("urn:video:1", NIE_TITLE), [Object::Literal("Inception".into())]);
    assert_eq!(
        sink.objects("urn:video:1", NIE_CONTENT_CREATED),
        [Object::DateTime("2010-10-24T00:00:00Z".into())]
    );
    assert_eq!(sink.objects("urn:video:1", NMM_MPAA_RATING), [Object::Literal("PG-13".into())]);
}

#[tokio::test]
async fn episode_end_to_end() {
    let topic = named("The Dundies").with(
        mediaminer_core::extract::properties::EPISODE_SEASON_NUMBER,
        mediaminer_core::TopicValue::Double(2.0),
    );
    let kb = Arc::new(ScriptedKb::default().episode("The Office", 2, 1, "/m/02x5gl", topic));
    let sink = Arc::new(MemorySink::new());
    let mut controller = controller(Arc::clone(&kb), sink.clone());
    let (item, rx) = QueueItem::with_completion("file:///tv/The%20Office.S02E01.mkv", "urn:video:2");

    controller.drain(&mut VecQueue::new([item])).await;

    let done = rx.await.unwrap().unwrap();
    assert!(done.record.is_episodic);
    assert_eq!((done.record.season, done.record.episode), (2, 1));
    assert_eq!(kb.calls(), ["mql:The Office:2:1", "topic:/m/02x5gl"]);
    assert_eq!(sink.objects("urn:video:2", NIE_TITLE), [Object::Literal("The Dundies".into())]);
}

#[tokio::test]
async fn failed_file_does_not_stop_draining() {
    let kb = Arc::new(
        ScriptedKb {
            broken: vec!["Broken".into()],
            ..Default::default()
        }
        .film("Movie One", "/m/1", 90.0, named("Movie One"))
        .film("Movie Three", "/m/3", 90.0, named("Movie Three")),
    );
    let sink = Arc::new(MemorySink::new());
    let mut controller = controller(Arc::clone(&kb), sink.clone());

    let (one, rx1) = QueueItem::with_completion("file:///v/Movie.One.mkv", "urn:1");
    let (two, rx2) = QueueItem::with_completion("file:///v/Broken.mkv", "urn:2");
    let (three, rx3) = QueueItem::with_completion("file:///v/Movie.Three.mkv", "urn:3");
    let mut queue = VecQueue::new([one, two, three]);

    let report = controller.drain(&mut queue).await;

    assert_eq!(report.processed, 3);
    assert_eq!(report.succeeded, 2);
    assert_eq!(report.failed, 1);
    assert_eq!(report.next_requests, 3);
    assert_eq!(queue.requests(), 3, "never asks an empty queue");

    assert_eq!(
        kb.calls(),
        ["search:Movie One", "topic:/m/1", "search:Broken", "search:Movie Three", "topic:/m/3"]
    );

    assert!(rx1.await.unwrap().is_ok());
    let failure = rx2.await.unwrap().unwrap_err();
    assert_eq!(failure.stage, Stage::Resolving);
    assert_eq!(failure.error.kind(), ErrorKind::Service);
    assert_eq!(failure.urn, "urn:2");
    assert_eq!(failure.uri, "file:///v/Broken.mkv");
    assert!(rx3.await.unwrap().is_ok());

    assert!(sink.objects("urn:2", NIE_TITLE).is_empty());
}

#[tokio::test]
async fn not_found_emits_nothing() {
    let kb = Arc::new(ScriptedKb::default().film("Obscure", "/m/weak", 50.0, named("Obscure")));
    let sink = Arc::new(MemorySink::new());
    let mut controller = controller(Arc::clone(&kb), sink.clone());
    let (item, rx) = QueueItem::with_completion("file:///v/Obscure.mkv", "urn:weak");

    controller.drain(&mut VecQueue::new([item])).await;

    let failure = rx.await.unwrap().unwrap_err();
    assert_eq!(failure.error.kind(), ErrorKind::NotFound);
    assert_eq!(kb.calls(), ["search:Obscure"]);
    assert!(sink.is_empty());
}

#[tokio::test]
async fn reprocessing_is_idempotent() {
    let kb = Arc::new(ScriptedKb::default().film("Inception", "X", 80.0, inception()));
    let sink = Arc::new(MemorySink::new());
    let mut controller = controller(kb, sink.clone());

    for _ in 0..2 {
        let mut queue = VecQueue::new([QueueItem::new("file:///v/Inception.2010.mkv", "urn:video:1")]);
        controller.drain(&mut queue).await;
    }

    assert_eq!(sink.objects("urn:video:1", NIE_TITLE), [Object::Literal("Inception".into())]);
    assert_eq!(sink.objects("urn:video:1", NIE_CONTENT_CREATED).len(), 1);
    let first = sink.quads().len();

    let mut queue = VecQueue::new([QueueItem::new("file:///v/Inception.2010.mkv", "urn:video:1")]);
    controller.drain(&mut queue).await;
    assert_eq!(sink.quads().len(), first);
}

#[tokio::test]
async fn cancelled_file_does_not_cancel_the_next() {
    let kb = Arc::new(
        ScriptedKb {
            stalled: vec!["Slow".into()],
            ..Default::default()
        }
        .film("Inception", "X", 80.0, inception()),
    );
    let sink = Arc::new(MemorySink::new());
    let mut controller = controller(Arc::clone(&kb), sink.clone());
    let handle = controller.handle();

    let (slow, rx_slow) = QueueItem::with_completion("file:///v/Slow.mkv", "urn:slow");
    let (next, rx_next) = QueueItem::with_completion("file:///v/Inception.mkv", "urn:next");
    let mut queue = VecQueue::new([slow, next]);

    let canceller = async {
        kb.stalled_entered.notified().await;
        handle.cancel_current();
    };
    let (report, ()) = tokio::join!(controller.drain(&mut queue), canceller);

    assert_eq!(report.processed, 2);
    let failure = rx_slow.await.unwrap().unwrap_err();
    assert!(failure.error.is_cancelled());
    assert_eq!(failure.error.kind(), ErrorKind::Service);
    assert_eq!(failure.stage, Stage::Resolving);
    assert!(rx_next.await.unwrap().is_ok());
}

#[tokio::test]
async fn pause_stops_draining_until_resumed() {
    let kb = Arc::new(
        ScriptedKb {
            stalled: vec!["Slow".into()],
            ..Default::default()
        }
        .film("Inception", "X", 80.0, inception()),
    );
    let sink = Arc::new(MemorySink::new());
    let mut controller = controller(Arc::clone(&kb), sink.clone());
    let handle = controller.handle();

    let (slow, rx_slow) = QueueItem::with_completion("file:///v/Slow.mkv", "urn:slow");
    let mut queue = VecQueue::new([slow, QueueItem::new("file:///v/Inception.mkv", "urn:next")]);

    let pauser = async {
        kb.stalled_entered.notified().await;
        handle.pause();
    };
    let (report, ()) = tokio::join!(controller.drain(&mut queue), pauser);

    assert_eq!(report.processed, 1);
    assert!(rx_slow.await.unwrap().unwrap_err().error.is_cancelled());
    assert_eq!(queue.remaining(), 1);

    handle.resume();
    let report = controller.drain(&mut queue).await;
    assert_eq!(report.succeeded, 1);
    assert_eq!(queue.remaining(), 0);
}

#[tokio::test]
async fn paused_controller_does_not_start_a_handed_out_file() {
    let kb = Arc::new(ScriptedKb::default().film("Inception", "X", 80.0, inception()));
    let sink = Arc::new(MemorySink::new());
    let controller = controller(Arc::clone(&kb), sink.clone());
    let (item, rx) = QueueItem::with_completion("file:///v/Inception.mkv", "urn:video:1");
    let task = FileTask::from(item);

    controller.handle().pause();
    let outcome = controller.process(&task).await;
    task.complete(outcome);

    let failure = rx.await.unwrap().unwrap_err();
    assert!(failure.error.is_cancelled());
    assert_eq!(failure.stage, Stage::Guessing);
    assert!(kb.calls().is_empty());
    assert!(sink.is_empty());

    controller.handle().resume();
    let task = FileTask::from(QueueItem::new("file:///v/Inception.mkv", "urn:video:1"));
    assert!(controller.process(&task).await.is_ok());
}

struct RejectingSink;

#[async_trait]
impl OutputSink for RejectingSink {
    async fn apply(&self, _batch: &UpdateBatch) -> mediaminer::Result<()> {
        Err(MinerError::Sink("store is read-only".into()))
    }
}

#[tokio::test]
async fn sink_failure_is_reported() {
    let kb = Arc::new(ScriptedKb::default().film("Inception", "X", 80.0, inception()));
    let mut controller = controller(kb, Arc::new(RejectingSink));
    let (item, rx) = QueueItem::with_completion("file:///v/Inception.mkv", "urn:video:1");

    let report = controller.drain(&mut VecQueue::new([item])).await;

    assert_eq!(report.failed, 1);
    let failure = rx.await.unwrap().unwrap_err();
    assert_eq!(failure.stage, Stage::Persisting);
    assert_eq!(failure.error.kind(), ErrorKind::Sink);
}
