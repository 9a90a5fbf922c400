//! Remote Controller
//!
//! Owns the selection, router and picker, and wires them into a page:
//! capture-phase key listeners, a body mutation observer, hash-change
//! and unload listeners.

use std::cell::RefCell;
use std::rc::Rc;

use vidkeys_dom::timers::TimerCallback;
use vidkeys_dom::{
    Document, EventType, KeyboardEvent, ListenerId, ListenerOptions, MutationObserverInit, ObserverId, Page,
};

use crate::picker::{self, Picker, PickerEntry};
use crate::{
    discover, Config, KeyRouter, MutationWatcher, Notifier, Plugin, RemoteError, SelectionState, VideoHandle,
};

/// State shared with the page callbacks
struct Remote {
    selection: SelectionState,
    router: KeyRouter,
    picker: Picker,
    notifier: Box<dyn Notifier>,
}

impl Remote {
    fn refresh(&mut self, document: &Document) {
        let videos = discover(document);
        if self.selection.replace(videos) {
            tracing::debug!("Selected first video");
        }
    }

    fn handle_key(&mut self, event: &mut KeyboardEvent, document: &mut Document) -> bool {
        let Self {
            selection,
            router,
            notifier,
            ..
        } = self;
        router.route(event, document, selection.active(), notifier.as_mut())
    }
}

/// Re-run discovery now
fn refresh(remote: &RefCell<Remote>, document: &Document) {
    match remote.try_borrow_mut() {
        Ok(mut remote) => remote.refresh(document),
        Err(_) => tracing::warn!("Remote busy, skipping discovery"),
    }
}

/// Deferred discovery task for the timer queue
fn refresh_task(remote: &Rc<RefCell<Remote>>) -> TimerCallback {
    let remote = Rc::clone(remote);
    Box::new(move |scope| refresh(&remote, scope.document))
}

/// What `start` registered on the page
#[derive(Debug)]
struct Installation {
    listeners: Vec<ListenerId>,
    observer: ObserverId,
}

/// Keyboard remote control for one page
pub struct RemoteController {
    remote: Rc<RefCell<Remote>>,
    watcher: MutationWatcher,
    installation: Option<Installation>,
}

impl RemoteController {
    /// Create a controller with the built-in plugins
    pub fn new(config: Config, notifier: Box<dyn Notifier>) -> Result<Self, RemoteError> {
        config.validate()?;
        let router = KeyRouter::from_config(&config);
        Ok(Self::with_router(&config, router, notifier))
    }

    /// Create a controller with a custom plugin set
    pub fn with_plugins(
        config: Config,
        plugins: Vec<Box<dyn Plugin>>,
        notifier: Box<dyn Notifier>,
    ) -> Result<Self, RemoteError> {
        config.validate()?;
        Ok(Self::with_router(&config, KeyRouter::new(plugins), notifier))
    }

    fn with_router(config: &Config, router: KeyRouter, notifier: Box<dyn Notifier>) -> Self {
        Self {
            remote: Rc::new(RefCell::new(Remote {
                selection: SelectionState::new(),
                router,
                picker: Picker::new(),
                notifier,
            })),
            watcher: MutationWatcher::from_config(config),
            installation: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.installation.is_some()
    }

    /// Install listeners and the observer, then discover
    pub fn start(&mut self, page: &mut Page) -> Result<(), RemoteError> {
        if self.installation.is_some() {
            return Err(RemoteError::AlreadyStarted);
        }
        if page.is_unloaded() {
            return Err(RemoteError::PageUnloaded);
        }

        let body = page.document().body();
        let watcher = self.watcher.clone();
        let remote = Rc::clone(&self.remote);
        let observer = page.observe_mutations(
            body,
            MutationObserverInit::subtree_child_list(),
            Box::new(move |records, scope| {
                watcher.schedule(records, scope, &mut || refresh_task(&remote));
            }),
        );

        let mut listeners = Vec::with_capacity(4);
        for event_type in [EventType::KeyDown, EventType::KeyUp] {
            let remote = Rc::clone(&self.remote);
            listeners.push(page.add_event_listener(
                event_type,
                ListenerOptions::capture(),
                Box::new(move |event, scope| {
                    let Some(key) = event.as_keyboard_mut() else {
                        return;
                    };
                    match remote.try_borrow_mut() {
                        Ok(mut remote) => {
                            remote.handle_key(key, scope.document);
                        }
                        Err(_) => tracing::warn!("Remote busy, passing {:?} through", key.key),
                    }
                }),
            ));
        }

        let remote = Rc::clone(&self.remote);
        listeners.push(page.add_event_listener(
            EventType::HashChange,
            ListenerOptions::default(),
            Box::new(move |_, scope| refresh(&remote, scope.document)),
        ));
        listeners.push(page.add_event_listener(
            EventType::Unload,
            ListenerOptions::default(),
            Box::new(move |_, scope| {
                scope.document.disconnect(observer);
                tracing::info!("Page unloading, stopped watching for videos");
            }),
        ));

        refresh(&self.remote, page.document());
        self.installation = Some(Installation { listeners, observer });
        tracing::info!(
            "Remote control started on {} with {} videos",
            page.document().url(),
            self.remote.borrow().selection.len()
        );
        Ok(())
    }

    /// Remove everything `start` installed. Safe to call repeatedly.
    pub fn stop(&mut self, page: &mut Page) {
        let Some(installation) = self.installation.take() else {
            return;
        };
        page.disconnect_observer(installation.observer);
        for id in installation.listeners {
            page.remove_event_listener(id);
        }
        self.remote.borrow_mut().picker.clear(page.document_mut());
        tracing::info!("Remote control stopped");
    }

    /// Re-run discovery outside the automatic triggers
    pub fn rediscover(&self, page: &Page) {
        refresh(&self.remote, page.document());
    }

    /// Current video list
    pub fn videos(&self) -> Vec<VideoHandle> {
        self.remote.borrow().selection.videos().to_vec()
    }

    pub fn selected_index(&self) -> usize {
        self.remote.borrow().selection.index()
    }

    /// The video keys act on, if the index is in range
    pub fn active_video(&self) -> Option<VideoHandle> {
        self.remote.borrow().selection.active().cloned()
    }

    /// Pick the video keys act on
    pub fn select(&self, index: usize) -> Result<(), RemoteError> {
        self.remote.borrow_mut().selection.select(index)?;
        tracing::debug!("Selected video {}", index);
        Ok(())
    }

    /// Picker rows for the current list
    pub fn picker_entries(&self, page: &Page) -> Vec<PickerEntry> {
        picker::entries(&self.remote.borrow().selection, page.document())
    }

    /// Outline the video behind picker row `index`
    pub fn hover(&self, page: &mut Page, index: usize) -> Result<bool, RemoteError> {
        let mut remote = self.remote.borrow_mut();
        let video = Self::video_at(&remote.selection, index)?;
        Ok(remote.picker.show_outline(page.document_mut(), &video))
    }

    /// Remove the outline for picker row `index`
    pub fn unhover(&self, page: &mut Page, index: usize) -> Result<bool, RemoteError> {
        let mut remote = self.remote.borrow_mut();
        let video = Self::video_at(&remote.selection, index)?;
        Ok(remote.picker.hide_outline(page.document_mut(), &video))
    }

    fn video_at(selection: &SelectionState, index: usize) -> Result<VideoHandle, RemoteError> {
        selection
            .videos()
            .get(index)
            .cloned()
            .ok_or(RemoteError::SelectionOutOfRange {
                index,
                len: selection.len(),
            })
    }
}

impl std::fmt::Debug for RemoteController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let remote = self.remote.try_borrow();
        f.debug_struct("RemoteController")
            .field("running", &self.is_running())
            .field("videos", &remote.as_ref().map(|r| r.selection.len()).ok())
            .field("router", &remote.as_ref().map(|r| &r.router).ok())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConfigError, RecordingNotifier};
    use vidkeys_dom::Key;

    fn page_with_videos(n: usize) -> Page {
        let mut page = Page::parse("https://example.com/").unwrap();
        let doc = page.document_mut();
        let body = doc.body();
        for i in 0..n {
            let video = doc.create_element("video");
            doc.set_attribute(video, "src", &format!("v{i}.mp4")).unwrap();
            doc.append_child(body, video).unwrap();
        }
        page
    }

    fn controller() -> (RemoteController, RecordingNotifier) {
        let notes = RecordingNotifier::new();
        let remote = RemoteController::new(Config::default(), Box::new(notes.clone())).unwrap();
        (remote, notes)
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = Config {
            speed_step: -1.0,
            ..Config::default()
        };
        let result = RemoteController::new(config, Box::new(RecordingNotifier::new()));
        assert!(matches!(
            result,
            Err(RemoteError::Config(ConfigError::NonPositiveStep { .. }))
        ));
    }

    #[test]
    fn test_start_discovers_and_installs() {
        let mut page = page_with_videos(2);
        let (mut remote, _) = controller();

        remote.start(&mut page).unwrap();
        assert!(remote.is_running());
        assert_eq!(remote.videos().len(), 2);
        assert_eq!(remote.selected_index(), 0);
        assert_eq!(page.window().listener_count(EventType::KeyDown), 1);
        assert_eq!(page.window().listener_count(EventType::KeyUp), 1);
        assert_eq!(page.document().observer_count(), 1);

        assert!(matches!(remote.start(&mut page), Err(RemoteError::AlreadyStarted)));
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut page = page_with_videos(1);
        let (mut remote, notes) = controller();
        remote.start(&mut page).unwrap();

        remote.stop(&mut page);
        remote.stop(&mut page);
        assert!(!remote.is_running());
        assert_eq!(page.document().observer_count(), 0);
        assert_eq!(page.window().listener_count(EventType::KeyDown), 0);

        let (down, _) = page.press(Key::Space);
        assert!(!down.is_default_prevented());
        assert!(notes.messages().is_empty());

        // Can be started again
        remote.start(&mut page).unwrap();
    }

    #[test]
    fn test_select_and_hover() {
        let mut page = page_with_videos(3);
        let (mut remote, _) = controller();
        remote.start(&mut page).unwrap();

        remote.select(2).unwrap();
        assert_eq!(remote.active_video(), Some(remote.videos()[2].clone()));
        assert!(matches!(
            remote.select(3),
            Err(RemoteError::SelectionOutOfRange { index: 3, len: 3 })
        ));

        let entries = remote.picker_entries(&page);
        assert_eq!(entries.len(), 3);
        assert!(entries[2].active);
        assert_eq!(entries[0].label, "1. v0.mp4");

        assert!(remote.hover(&mut page, 1).unwrap());
        assert!(!remote.hover(&mut page, 1).unwrap());
        assert!(remote.unhover(&mut page, 1).unwrap());
        assert!(remote.hover(&mut page, 7).is_err());
    }

    #[test]
    fn test_start_on_unloaded_page() {
        let mut page = page_with_videos(1);
        page.unload();
        let (mut remote, _) = controller();
        assert!(matches!(remote.start(&mut page), Err(RemoteError::PageUnloaded)));
    }
}
