//! End-to-end behavior of the badge worker: dispatch, rendering, clear
//! idempotence, the reset codeword, and the bitmap path.

mod common;

use std::sync::{Arc, Mutex};

use common::{badge_addr, FixedBattery, PanelCall, RecordingPanel, RestartCounter};
use inkbadge::badge::{BadgeWorker, Font};
use inkbadge::config::Config;
use inkbadge::protocol::Frame;

type TestWorker = BadgeWorker<RecordingPanel, FixedBattery, RestartCounter>;

fn worker(width: u32, height: u32) -> (TestWorker, TestHandles) {
    let (panel, log) = RecordingPanel::new();
    let control = RestartCounter::default();
    let worker = BadgeWorker::new(
        panel,
        FixedBattery(4000.0),
        control.clone(),
        width,
        height,
    );
    (worker, TestHandles { log, control })
}

struct TestHandles {
    log: Arc<Mutex<Vec<PanelCall>>>,
    control: RestartCounter,
}

impl TestHandles {
    fn calls(&self) -> Vec<PanelCall> {
        self.log.lock().unwrap().clone()
    }
}

fn frame(payload: &[u8]) -> Frame {
    Frame::new(badge_addr(), payload.to_vec())
}

#[test]
fn text_message_renders_cleaned_fields_without_touching_the_bitmap_path() {
    let (mut worker, handles) = worker(800, 480);
    worker.handle_frame(&frame(
        br#"{"first_name":"Jana","last_name":"Novakova","additional_info":"Booth 12"}"#,
    ));

    let calls = handles.calls();
    let texts: Vec<&str> = calls
        .iter()
        .filter_map(|c| match c {
            PanelCall::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(texts, vec!["Jana", "Novakova", "Booth 12", "4.00V"]);
    assert!(calls.iter().all(|c| !matches!(c, PanelCall::Bitmap { .. })));
    assert_eq!(calls.last(), Some(&PanelCall::Refresh));
    assert!(!worker.transfer_in_progress());
}

#[test]
fn name_lines_pick_the_largest_font_that_fits() {
    let (mut worker, handles) = worker(800, 480);
    // "Jana" is 4 * 80 = 320 px in Large (fits); the long line only fits Small.
    worker.handle_frame(&frame(
        br#"{"first_name":"Jana","last_name":"Anna-Marie Hollandova"}"#,
    ));

    let fonts: Vec<(String, Font)> = handles
        .calls()
        .iter()
        .filter_map(|c| match c {
            PanelCall::Text { text, font, .. } => Some((text.clone(), *font)),
            _ => None,
        })
        .collect();
    assert_eq!(fonts[0], ("Jana".to_string(), Font::Large));
    assert_eq!(fonts[1].1, Font::Small);
}

#[test]
fn additional_info_is_pinned_near_the_bottom() {
    let (mut worker, handles) = worker(800, 480);
    worker.handle_frame(&frame(br#"{"additional_info":"Booth 12"}"#));

    let info = handles
        .calls()
        .iter()
        .find_map(|c| match c {
            PanelCall::Text { text, y, font, .. } if text == "Booth 12" => Some((*y, *font)),
            _ => None,
        })
        .expect("info line rendered");
    // Small font is 70 px tall, pinned 20 px above the 480 px bottom edge.
    assert_eq!(info, (480 - 70 - 20, Font::Small));
}

#[test]
fn clear_is_idempotent() {
    let (mut worker, handles) = worker(800, 480);
    worker.handle_frame(&frame(br#"{"clear":"1"}"#));
    let after_first = handles.calls();
    worker.handle_frame(&frame(br#"{"clear":"1"}"#));
    let after_second = handles.calls();

    // The second clear replays exactly the same visible sequence.
    assert_eq!(after_second.len(), after_first.len() * 2);
    assert_eq!(&after_second[after_first.len()..], &after_first[..]);
    assert_eq!(after_first.first(), Some(&PanelCall::Clear));
    assert_eq!(after_first.last(), Some(&PanelCall::Refresh));
}

#[test]
fn clear_abandons_a_partial_transfer() {
    let (mut worker, _handles) = worker(40, 20); // 100-byte bitmap
    worker.handle_frame(&frame(&[0xFF; 60]));
    assert!(worker.transfer_in_progress());
    worker.handle_frame(&frame(br#"{"clear":"1"}"#));
    assert!(!worker.transfer_in_progress());
}

#[test]
fn reset_codeword_restarts_instead_of_rendering() {
    let (mut worker, handles) = worker(800, 480);
    worker.handle_frame(&frame(br#"{"additional_info":"reset666"}"#));
    assert_eq!(handles.control.count(), 1);
    assert!(handles.calls().is_empty());
}

#[test]
fn completed_transfer_blits_the_full_bitmap() {
    let (mut worker, handles) = worker(40, 20); // 100-byte bitmap
    worker.handle_frame(&frame(&[0xAA; 50]));
    assert!(handles.calls().is_empty(), "no render mid-transfer");
    worker.handle_frame(&frame(&[0x55; 50]));

    let calls = handles.calls();
    assert!(calls.contains(&PanelCall::Bitmap {
        x: 0,
        y: 0,
        len: 100,
        width: 40,
        height: 20,
    }));
    assert_eq!(calls.last(), Some(&PanelCall::Refresh));
    assert!(!worker.transfer_in_progress());
}

#[test]
fn overflowing_fragment_resets_and_next_transfer_succeeds() {
    let (mut worker, handles) = worker(40, 20); // 100-byte bitmap
    worker.handle_frame(&frame(&[0x01; 80]));
    worker.handle_frame(&frame(&[0x02; 80])); // 160 > 100: overflow, no render
    assert!(handles.calls().is_empty());
    assert!(!worker.transfer_in_progress());

    worker.handle_frame(&frame(&[0x03; 100]));
    assert!(handles
        .calls()
        .iter()
        .any(|c| matches!(c, PanelCall::Bitmap { len: 100, .. })));
}

#[tokio::test]
async fn worker_task_drains_the_frame_queue() {
    let (w, handles) = worker(40, 20);
    let (queue, receiver) = inkbadge::protocol::frame_queue(8);
    // Drive the same worker through the async loop.
    let task = tokio::spawn(async move {
        w.run(receiver).await;
    });

    assert!(queue.try_enqueue(frame(&[0x0F; 100])));
    assert!(queue.try_enqueue(frame(br#"{"clear":"1"}"#)));
    drop(queue); // closing every producer ends the worker loop
    task.await.unwrap();

    let calls = handles.calls();
    assert!(calls.iter().any(|c| matches!(c, PanelCall::Bitmap { .. })));
    assert_eq!(calls.last(), Some(&PanelCall::Refresh));
}

#[tokio::test]
async fn config_builds_the_queue_and_worker() {
    let mut config = Config::default();
    config.badge.width = 40;
    config.badge.height = 20;
    config.badge.queue_depth = 2;

    let (queue, receiver) = config.badge.frame_queue();
    assert!(queue.try_enqueue(frame(&[0x0F; 50])));
    assert!(queue.try_enqueue(frame(&[0xF0; 50])));
    // Depth comes from the config section, not the library default.
    assert!(!queue.try_enqueue(frame(&[0x00; 1])));

    let (panel, log) = RecordingPanel::new();
    let w = BadgeWorker::from_config(
        panel,
        FixedBattery(4000.0),
        RestartCounter::default(),
        &config.badge,
    );
    drop(queue);
    w.run(receiver).await;

    // The two queued fragments complete the 100-byte bitmap for 40x20.
    assert!(log
        .lock()
        .unwrap()
        .iter()
        .any(|c| matches!(c, PanelCall::Bitmap { len: 100, .. })));
}

#[test]
fn malformed_control_message_has_no_effect() {
    let (mut worker, handles) = worker(800, 480);
    worker.handle_frame(&frame(b"{definitely not json"));
    assert!(handles.calls().is_empty());
    assert!(!worker.transfer_in_progress());
}
