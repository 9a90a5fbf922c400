//! End-to-end tests for the remote control
//!
//! Drives a real page: keys go through window dispatch, mutations
//! through the observer and deferred work through the page clock.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use vidkeys::{
    discover, Config, KeyContext, Plugin, RecordingNotifier, RemoteController, VideoHandle,
};
use vidkeys_dom::{
    Document, EventType, Key, KeyModifiers, KeyboardEvent, ListenerOptions, NodeId, Page,
};

// ============================================================================
// Fixtures
// ============================================================================

fn add_video(doc: &mut Document, parent: NodeId, src: &str) -> NodeId {
    let video = doc.create_element("video");
    doc.set_attribute(video, "src", src).unwrap();
    doc.append_child(parent, video).unwrap();
    video
}

fn page_with_videos(srcs: &[&str]) -> (Page, Vec<NodeId>) {
    let mut page = Page::parse("https://example.com/watch").unwrap();
    let doc = page.document_mut();
    let body = doc.body();
    let videos = srcs.iter().map(|src| add_video(doc, body, src)).collect();
    (page, videos)
}

fn started(page: &mut Page) -> (RemoteController, RecordingNotifier) {
    let notes = RecordingNotifier::new();
    let mut remote = RemoteController::new(Config::default(), Box::new(notes.clone())).unwrap();
    remote.start(page).unwrap();
    (remote, notes)
}

fn media<'a>(page: &'a Page, video: NodeId) -> &'a vidkeys_dom::MediaState {
    page.document().media(video).unwrap()
}

/// Records every key the host page's own bubble listener receives
fn host_listener(page: &mut Page) -> Rc<RefCell<Vec<Key>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = seen.clone();
    page.add_event_listener(
        EventType::KeyDown,
        ListenerOptions::default(),
        Box::new(move |event, _| {
            if let Some(key) = event.as_keyboard() {
                log.borrow_mut().push(key.key.clone());
            }
        }),
    );
    seen
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_single_video_is_selected() {
    let (mut page, videos) = page_with_videos(&["clip.mp4"]);
    let (remote, _) = started(&mut page);

    assert_eq!(remote.videos(), vec![VideoHandle::top_level(videos[0])]);
    assert_eq!(remote.selected_index(), 0);
}

#[test]
fn test_volume_steps_down_to_half() {
    let (mut page, videos) = page_with_videos(&["clip.mp4"]);
    let (_remote, notes) = started(&mut page);

    for _ in 0..5 {
        let (down, up) = page.press(Key::ArrowDown);
        assert!(down.is_default_prevented());
        assert!(up.is_default_prevented());
    }

    assert_eq!(media(&page, videos[0]).volume, 0.5);
    assert!(!media(&page, videos[0]).muted);
    assert_eq!(notes.messages().len(), 5);
}

#[test]
fn test_mute_restores_previous_volume() {
    let (mut page, videos) = page_with_videos(&["clip.mp4"]);
    page.document_mut().media_mut(videos[0]).unwrap().volume = 0.7;
    let (_remote, _) = started(&mut page);

    page.press(Key::Character('m'));
    assert_eq!(media(&page, videos[0]).volume, 0.0);
    page.press(Key::Character('m'));
    assert_eq!(media(&page, videos[0]).volume, 0.7);
}

#[test]
fn test_removing_last_video_drops_keys() {
    let (mut page, videos) = page_with_videos(&["clip.mp4"]);
    let (remote, notes) = started(&mut page);
    let host = host_listener(&mut page);

    page.document_mut().remove(videos[0]).unwrap();
    page.run_until_idle();

    assert!(remote.videos().is_empty());
    assert!(remote.active_video().is_none());

    let (down, _) = page.press(Key::Space);
    assert!(!down.is_default_prevented());
    assert_eq!(*host.borrow(), vec![Key::Space]);
    assert!(notes.messages().is_empty());
}

#[test]
fn test_keys_pass_through_right_after_removal() {
    let (mut page, videos) = page_with_videos(&["clip.mp4"]);
    let (remote, notes) = started(&mut page);
    let host = host_listener(&mut page);

    // No manual pumping: the next key must see the updated list
    page.document_mut().remove(videos[0]).unwrap();
    let (down, up) = page.press(Key::Space);
    assert!(!down.is_default_prevented());
    assert!(!up.is_default_prevented());
    page.press(Key::Space);

    assert!(remote.videos().is_empty());
    assert_eq!(*host.borrow(), vec![Key::Space, Key::Space]);
    assert!(notes.messages().is_empty());
}

#[test]
fn test_removing_other_video_updates_list_immediately() {
    let (mut page, videos) = page_with_videos(&["a.mp4", "b.mp4"]);
    let (remote, _) = started(&mut page);

    page.document_mut().remove(videos[1]).unwrap();
    assert_eq!(remote.videos().len(), 2);
    page.run_until_idle();
    assert_eq!(remote.videos(), vec![VideoHandle::top_level(videos[0])]);
    assert_eq!(page.now(), Duration::ZERO);
}

#[test]
fn test_claimed_key_never_reaches_host() {
    let (mut page, videos) = page_with_videos(&["clip.mp4"]);
    let host = host_listener(&mut page);
    let (_remote, _) = started(&mut page);

    // Host listener was registered first, but ours runs in capture phase
    let (down, _) = page.press(Key::Character('d'));
    assert!(down.is_default_prevented());
    assert!(down.is_immediate_propagation_stopped());
    assert!(host.borrow().is_empty());
    assert_eq!(media(&page, videos[0]).playback_rate, 1.25);

    page.press(Key::Character('q'));
    assert_eq!(*host.borrow(), vec![Key::Character('q')]);
}

#[test]
fn test_claim_stops_later_capture_listeners() {
    let (mut page, _) = page_with_videos(&["clip.mp4"]);
    let (_remote, _) = started(&mut page);
    let later = Rc::new(RefCell::new(0));
    let count = later.clone();
    page.add_event_listener(
        EventType::KeyDown,
        ListenerOptions::capture(),
        Box::new(move |_, _| *count.borrow_mut() += 1),
    );

    page.press(Key::Space);
    assert_eq!(*later.borrow(), 0);
}

// ============================================================================
// Discovery
// ============================================================================

#[test]
fn test_discovery_order_and_idempotence() {
    let mut page = Page::parse("https://example.com/").unwrap();
    let doc = page.document_mut();
    let body = doc.body();
    let section = doc.create_element("section");
    doc.append_child(body, section).unwrap();

    let first = add_video(doc, section, "1.mp4");
    let frame = doc.create_element("iframe");
    doc.append_child(body, frame).unwrap();
    let second = add_video(doc, body, "2.mp4");

    let mut inner = Document::parse("https://example.com/frame").unwrap();
    let inner_body = inner.body();
    let nested = add_video(&mut inner, inner_body, "3.mp4");
    doc.set_frame_document(frame, inner).unwrap();

    let found = discover(page.document());
    assert_eq!(
        found,
        vec![
            VideoHandle::top_level(first),
            VideoHandle::top_level(second),
            VideoHandle::new(vec![frame], nested),
        ]
    );
    assert_eq!(discover(page.document()), found);
}

#[test]
fn test_keys_reach_video_in_same_origin_frame() {
    let mut page = Page::parse("https://example.com/").unwrap();
    let doc = page.document_mut();
    let frame = doc.create_element("iframe");
    let body = doc.body();
    doc.append_child(body, frame).unwrap();
    let mut inner = Document::parse("https://example.com/player").unwrap();
    let inner_body = inner.body();
    let video = add_video(&mut inner, inner_body, "movie.mp4");
    doc.set_frame_document(frame, inner).unwrap();

    let (remote, _) = started(&mut page);
    assert_eq!(remote.videos().len(), 1);

    page.press(Key::Space);
    let inner = page.document().frame_document(frame, page.document().origin()).unwrap().unwrap();
    assert!(!inner.media(video).unwrap().paused);
}

#[test]
fn test_cross_origin_video_is_not_controlled() {
    let mut page = Page::parse("https://example.com/").unwrap();
    let doc = page.document_mut();
    let frame = doc.create_element("iframe");
    let body = doc.body();
    doc.append_child(body, frame).unwrap();
    let mut foreign = Document::parse("https://other.example.org/").unwrap();
    let foreign_body = foreign.body();
    add_video(&mut foreign, foreign_body, "ad.mp4");
    doc.set_frame_document(frame, foreign).unwrap();

    let (remote, _) = started(&mut page);
    assert!(remote.videos().is_empty());

    let (down, _) = page.press(Key::Space);
    assert!(!down.is_default_prevented());
}

#[test]
fn test_late_player_found_after_settle_delay() {
    let (mut page, _) = page_with_videos(&[]);
    let (remote, _) = started(&mut page);

    let doc = page.document_mut();
    let container = doc.create_element("div");
    doc.set_attribute(container, "class", "VideoPlayer").unwrap();
    let body = doc.body();
    doc.append_child(body, container).unwrap();
    page.run_until_idle();

    // Player fills in its video before the settle delay elapses
    let doc = page.document_mut();
    add_video(doc, container, "late.mp4");

    page.advance(Duration::from_millis(999));
    assert!(remote.videos().is_empty());
    page.advance(Duration::from_millis(1));
    assert_eq!(remote.videos().len(), 1);
    assert_eq!(remote.selected_index(), 0);
}

#[test]
fn test_overlapping_rediscoveries_all_run() {
    let (mut page, _) = page_with_videos(&[]);
    let (remote, _) = started(&mut page);

    let doc = page.document_mut();
    let body = doc.body();
    add_video(doc, body, "a.mp4");
    add_video(doc, body, "b.mp4");
    page.run_until_idle();
    assert_eq!(page.timers().pending(), 2);

    page.advance(Duration::from_secs(1));
    assert_eq!(page.timers().pending(), 0);
    assert_eq!(remote.videos().len(), 2);
}

#[test]
fn test_hash_change_rediscovers() {
    let (mut page, _) = page_with_videos(&["a.mp4"]);
    let (remote, _) = started(&mut page);

    let doc = page.document_mut();
    let body = doc.body();
    add_video(doc, body, "b.mp4");

    // No settle delay: navigation rescans on the spot
    page.navigate_hash("next");
    assert_eq!(remote.videos().len(), 2);
    assert_eq!(page.now(), Duration::ZERO);
}

#[test]
fn test_restart_after_stop() {
    let (mut page, _) = page_with_videos(&["a.mp4"]);
    let (mut remote, _) = started(&mut page);

    remote.stop(&mut page);
    let doc = page.document_mut();
    let body = doc.body();
    add_video(doc, body, "b.mp4");
    page.advance(Duration::from_secs(2));
    assert_eq!(remote.videos().len(), 1);

    remote.start(&mut page).unwrap();
    assert_eq!(remote.videos().len(), 2);
}

#[test]
fn test_selection_survives_rediscovery() {
    let (mut page, _) = page_with_videos(&["a.mp4", "b.mp4", "c.mp4"]);
    let (remote, _) = started(&mut page);
    remote.select(2).unwrap();

    let doc = page.document_mut();
    let body = doc.body();
    add_video(doc, body, "d.mp4");
    page.advance(Duration::from_secs(1));

    assert_eq!(remote.videos().len(), 4);
    assert_eq!(remote.selected_index(), 2);
}

#[test]
fn test_active_index_out_of_range_is_absent() {
    let (mut page, videos) = page_with_videos(&["a.mp4", "b.mp4"]);
    let (remote, _) = started(&mut page);
    remote.select(1).unwrap();

    page.document_mut().remove(videos[1]).unwrap();
    page.run_until_idle();

    assert_eq!(remote.selected_index(), 1);
    assert!(remote.active_video().is_none());
    let (down, _) = page.press(Key::Space);
    assert!(!down.is_default_prevented());
    assert!(media(&page, videos[0]).paused);
}

// ============================================================================
// Routing
// ============================================================================

#[test]
fn test_typing_in_search_box_passes_through() {
    let (mut page, videos) = page_with_videos(&["clip.mp4"]);
    let (_remote, _) = started(&mut page);
    let doc = page.document_mut();
    let input = doc.create_element("input");
    let body = doc.body();
    doc.append_child(body, input).unwrap();
    doc.focus(input).unwrap();

    let (down, _) = page.press(Key::Space);
    assert!(!down.is_default_prevented());
    assert!(media(&page, videos[0]).paused);

    page.document_mut().blur();
    page.press(Key::Space);
    assert!(!media(&page, videos[0]).paused);
}

#[test]
fn test_chords_pass_through() {
    let (mut page, videos) = page_with_videos(&["clip.mp4"]);
    let (_remote, _) = started(&mut page);

    let ctrl_f = KeyboardEvent::key_down(Key::Character('f'))
        .with_modifiers(KeyModifiers::from_flags(false, true, false, false));
    let event = page.dispatch_key(ctrl_f);
    assert!(!event.is_default_prevented());
    assert_eq!(page.document().fullscreen_element(), None);

    let shift_f = KeyboardEvent::key_down(Key::Character('F'))
        .with_modifiers(KeyModifiers::from_flags(true, false, false, false));
    let event = page.dispatch_key(shift_f);
    assert!(event.is_default_prevented());
    assert_eq!(page.document().fullscreen_element(), Some(videos[0]));
}

/// Counts calls per direction and claims nothing
struct Counter {
    downs: Rc<RefCell<usize>>,
    ups: Rc<RefCell<usize>>,
}

impl Plugin for Counter {
    fn name(&self) -> &'static str {
        "counter"
    }

    fn handles(&self, _key: &Key) -> bool {
        false
    }

    fn on_key_down(&mut self, _ctx: &mut KeyContext<'_>) -> bool {
        *self.downs.borrow_mut() += 1;
        false
    }

    fn on_key_up(&mut self, _ctx: &mut KeyContext<'_>) -> bool {
        *self.ups.borrow_mut() += 1;
        false
    }
}

#[test]
fn test_every_plugin_runs_once_per_event() {
    let (mut page, _) = page_with_videos(&["clip.mp4"]);
    let downs = Rc::new(RefCell::new(0));
    let ups = Rc::new(RefCell::new(0));
    let mut plugins = vidkeys::plugins::default_plugins(&Config::default());
    plugins.push(Box::new(Counter {
        downs: downs.clone(),
        ups: ups.clone(),
    }));
    let mut remote = RemoteController::with_plugins(
        Config::default(),
        plugins,
        Box::new(RecordingNotifier::new()),
    )
    .unwrap();
    remote.start(&mut page).unwrap();

    // Claimed by pause, unclaimed by anyone
    page.press(Key::Space);
    page.press(Key::Character('z'));

    assert_eq!(*downs.borrow(), 2);
    assert_eq!(*ups.borrow(), 2);
}

#[test]
fn test_unload_disconnects_observer() {
    let (mut page, _) = page_with_videos(&["a.mp4"]);
    let (mut remote, _) = started(&mut page);

    page.unload();
    assert_eq!(page.document().observer_count(), 0);

    remote.stop(&mut page);
    assert!(!remote.is_running());
}
