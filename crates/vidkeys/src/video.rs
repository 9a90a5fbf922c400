//! Video Handles
//!
//! A handle names a `<video>` by the chain of frame elements leading to
//! its document plus the element itself. Handles are resolved against
//! the top document on every use, so one that went stale (element
//! removed, frame navigated away or unloaded) simply resolves to nothing.

use vidkeys_dom::{Document, MediaState, NodeId};

/// Reference to a video element somewhere in the page
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoHandle {
    frames: Vec<NodeId>,
    node: NodeId,
}

impl VideoHandle {
    pub fn new(frames: Vec<NodeId>, node: NodeId) -> Self {
        Self { frames, node }
    }

    /// Video in the top document
    pub fn top_level(node: NodeId) -> Self {
        Self::new(Vec::new(), node)
    }

    /// The same video as seen from the document that owns `frame`
    pub(crate) fn nested_in(mut self, frame: NodeId) -> Self {
        self.frames.insert(0, frame);
        self
    }

    /// Element id inside its own document
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Frame elements from the top document down
    pub fn frame_path(&self) -> &[NodeId] {
        &self.frames
    }

    /// Number of frame boundaries crossed
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Document owning the video
    pub fn document<'a>(&self, top: &'a Document) -> Option<&'a Document> {
        let requester = top.origin();
        let mut document = top;
        for &frame in &self.frames {
            if !document.is_connected(frame) {
                return None;
            }
            document = document.frame_document(frame, requester).ok()??;
        }
        Some(document)
    }

    /// Mutable document owning the video
    pub fn document_mut<'a>(&self, top: &'a mut Document) -> Option<&'a mut Document> {
        let requester = top.origin().clone();
        let mut document = top;
        for &frame in &self.frames {
            if !document.is_connected(frame) {
                return None;
            }
            document = document.frame_document_mut(frame, &requester).ok()??;
        }
        Some(document)
    }

    /// Whether the handle still points at a connected media element
    pub fn is_live(&self, top: &Document) -> bool {
        self.media(top).is_some()
    }

    /// Current media state
    pub fn media<'a>(&self, top: &'a Document) -> Option<&'a MediaState> {
        let document = self.document(top)?;
        if !document.is_connected(self.node) {
            return None;
        }
        document.media(self.node)
    }

    /// Apply `f` to the media state; None if the handle is stale
    pub fn with_media<R>(&self, top: &mut Document, f: impl FnOnce(&mut MediaState) -> R) -> Option<R> {
        let document = self.document_mut(top)?;
        if !document.is_connected(self.node) {
            return None;
        }
        document.media_mut(self.node).map(f)
    }

    /// Resolved playback source
    pub fn source(&self, top: &Document) -> Option<String> {
        let document = self.document(top)?;
        if !document.is_connected(self.node) {
            return None;
        }
        document.resolved_source(self.node)
    }

    /// Enter or leave fullscreen. Returns the new state.
    pub fn toggle_fullscreen(&self, top: &mut Document) -> Option<bool> {
        let document = self.document_mut(top)?;
        if document.fullscreen_element() == Some(self.node) {
            document.exit_fullscreen();
            return Some(false);
        }
        document.request_fullscreen(self.node).ok()?;
        Some(true)
    }

    /// Enter or leave picture-in-picture. Returns the new state.
    pub fn toggle_picture_in_picture(&self, top: &mut Document) -> Option<bool> {
        let document = self.document_mut(top)?;
        if document.picture_in_picture_element() == Some(self.node) {
            document.exit_picture_in_picture();
            return Some(false);
        }
        document.request_picture_in_picture(self.node).ok()?;
        Some(true)
    }
}
