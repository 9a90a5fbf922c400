//! Document - High-level document API
//!
//! Structural mutations go through the document so that mutation
//! observers see them. Frame access is checked against the caller's
//! origin, the way script access to `contentDocument` is.

use url::{Origin, Url};

use crate::observer::ObserverRegistry;
use crate::{DomError, DomTree, MediaState, MutationObserverInit, MutationRecord, NodeId, ObserverId};

/// `<input type>` values that accept free text
const TEXT_INPUT_TYPES: &[&str] = &[
    "text", "search", "email", "password", "url", "tel", "number", "date",
    "datetime-local", "month", "time", "week",
];

/// HTML Document
#[derive(Debug)]
pub struct Document {
    /// The DOM tree
    tree: DomTree,
    /// Document URL
    url: Url,
    /// Security origin
    origin: Origin,
    html_element: NodeId,
    head_element: NodeId,
    body_element: NodeId,
    /// Focused element
    active_element: Option<NodeId>,
    fullscreen_element: Option<NodeId>,
    picture_in_picture_element: Option<NodeId>,
    observers: ObserverRegistry,
}

impl Document {
    /// Create a document with `<html>`, `<head>` and `<body>`
    pub fn new(url: Url) -> Self {
        let mut tree = DomTree::new();
        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        // Fresh detached nodes under a fresh root cannot violate hierarchy
        let _ = tree.append_child(tree.root(), html);
        let _ = tree.append_child(html, head);
        let _ = tree.append_child(html, body);

        let origin = url.origin();
        Self {
            tree,
            url,
            origin,
            html_element: html,
            head_element: head,
            body_element: body,
            active_element: None,
            fullscreen_element: None,
            picture_in_picture_element: None,
            observers: ObserverRegistry::default(),
        }
    }

    /// Parse the URL and create a document
    pub fn parse(url: &str) -> Result<Self, DomError> {
        let url = Url::parse(url).map_err(|e| DomError::InvalidUrl(format!("{url}: {e}")))?;
        Ok(Self::new(url))
    }

    /// Get document URL
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Get security origin
    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    /// Replace the URL fragment (in-page navigation)
    pub fn set_fragment(&mut self, fragment: Option<&str>) {
        self.url.set_fragment(fragment);
    }

    /// Get <html> element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get <head> element
    pub fn head(&self) -> NodeId {
        self.head_element
    }

    /// Get <body> element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Whether the node is attached to this document
    pub fn is_connected(&self, node: NodeId) -> bool {
        self.tree.is_connected(node)
    }

    // ------------------------------------------------------------------
    // Structure
    // ------------------------------------------------------------------

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.tree.create_element(tag)
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.tree.create_text(content)
    }

    /// Set an attribute on an element
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        self.tree
            .element_mut(node)
            .ok_or(DomError::NotAnElement(node))?
            .set_attr(name, value);
        Ok(())
    }

    /// Read an attribute
    pub fn get_attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.tree.element(node)?.get_attr(name)
    }

    /// Append a child, queueing mutation records
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let old_parent = self.tree.append_child(parent, child)?;
        if let Some(old) = old_parent {
            self.observers.queue(&self.tree, MutationRecord::removed(old, child));
        }
        self.observers.queue(&self.tree, MutationRecord::added(parent, child));
        Ok(())
    }

    /// Insert `node` as the next sibling of `reference`
    pub fn insert_after(&mut self, reference: NodeId, node: NodeId) -> Result<(), DomError> {
        let old_parent = self.tree.insert_after(reference, node)?;
        if let Some(old) = old_parent {
            self.observers.queue(&self.tree, MutationRecord::removed(old, node));
        }
        if let Some(parent) = self.tree.parent(node) {
            self.observers.queue(&self.tree, MutationRecord::added(parent, node));
        }
        Ok(())
    }

    /// Remove a node from its parent. Removing a detached node is a no-op.
    pub fn remove(&mut self, node: NodeId) -> Result<(), DomError> {
        let Some(parent) = self.tree.detach(node)? else {
            return Ok(());
        };
        self.observers.queue(&self.tree, MutationRecord::removed(parent, node));

        // Focus and immersive modes do not survive disconnection
        if self.active_element.is_some_and(|n| self.tree.contains(node, n)) {
            self.active_element = None;
        }
        if self.fullscreen_element.is_some_and(|n| self.tree.contains(node, n)) {
            self.fullscreen_element = None;
        }
        if self.picture_in_picture_element.is_some_and(|n| self.tree.contains(node, n)) {
            self.picture_in_picture_element = None;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Mutation observation
    // ------------------------------------------------------------------

    /// Start observing a node
    pub fn observe(&mut self, target: NodeId, options: MutationObserverInit) -> ObserverId {
        self.observers.observe(target, options)
    }

    /// Stop an observation. Returns false if it was already gone.
    pub fn disconnect(&mut self, id: ObserverId) -> bool {
        self.observers.disconnect(id)
    }

    /// Whether an observation is still active
    pub fn is_observing(&self, id: ObserverId) -> bool {
        self.observers.is_observing(id)
    }

    /// Number of active observations
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Whether records are waiting for delivery
    pub fn has_pending_records(&self) -> bool {
        self.observers.has_pending()
    }

    /// Take queued records, tagged with their observation
    pub fn take_records(&mut self) -> Vec<(ObserverId, MutationRecord)> {
        self.observers.take_records()
    }

    // ------------------------------------------------------------------
    // Media
    // ------------------------------------------------------------------

    /// Playback state of a media element
    pub fn media(&self, node: NodeId) -> Option<&MediaState> {
        self.tree.element(node)?.media.as_ref()
    }

    /// Mutable playback state of a media element
    pub fn media_mut(&mut self, node: NodeId) -> Option<&mut MediaState> {
        self.tree.element_mut(node)?.media.as_mut()
    }

    /// The element's playback source, resolved against the document URL.
    ///
    /// Uses `src`, falling back to the first `<source src>` child.
    pub fn resolved_source(&self, node: NodeId) -> Option<String> {
        let element = self.tree.element(node)?;
        element.media.as_ref()?;

        let raw = element
            .get_attr("src")
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .or_else(|| {
                self.tree.children(node).find_map(|(_, child)| {
                    child
                        .as_element()
                        .filter(|e| e.is("source"))
                        .and_then(|e| e.get_attr("src"))
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                })
            })?;

        Some(match self.url.join(raw) {
            Ok(resolved) => resolved.to_string(),
            Err(_) => raw.to_string(),
        })
    }

    // ------------------------------------------------------------------
    // Frames
    // ------------------------------------------------------------------

    /// Whether the node is an `<iframe>` or `<frame>`
    pub fn is_frame(&self, node: NodeId) -> bool {
        self.tree.element(node).is_some_and(|e| e.is_frame())
    }

    /// Load a document into a frame element.
    ///
    /// `about:` documents inherit this document's origin.
    pub fn set_frame_document(&mut self, frame: NodeId, mut document: Document) -> Result<(), DomError> {
        if document.url.scheme() == "about" {
            document.origin = self.origin.clone();
        }
        let element = self.tree.element_mut(frame).ok_or(DomError::NotAnElement(frame))?;
        if !element.is_frame() {
            return Err(DomError::NotAFrame(frame));
        }
        element.content_document = Some(Box::new(document));
        Ok(())
    }

    fn check_frame_access(&self, document: &Document, requester: &Origin) -> Result<(), DomError> {
        if &document.origin == requester {
            Ok(())
        } else {
            Err(DomError::FrameAccessDenied {
                frame: document.origin.ascii_serialization(),
                requester: requester.ascii_serialization(),
            })
        }
    }

    /// The frame's document as seen by script running at `requester`
    pub fn frame_document(&self, frame: NodeId, requester: &Origin) -> Result<Option<&Document>, DomError> {
        let element = self.tree.element(frame).ok_or(DomError::NotAnElement(frame))?;
        if !element.is_frame() {
            return Err(DomError::NotAFrame(frame));
        }
        match element.content_document.as_deref() {
            Some(document) => {
                self.check_frame_access(document, requester)?;
                Ok(Some(document))
            }
            None => Ok(None),
        }
    }

    /// Mutable access to the frame's document
    pub fn frame_document_mut(
        &mut self,
        frame: NodeId,
        requester: &Origin,
    ) -> Result<Option<&mut Document>, DomError> {
        self.frame_document(frame, requester)?;
        let element = self.tree.element_mut(frame).ok_or(DomError::NotAnElement(frame))?;
        Ok(element.content_document.as_deref_mut())
    }

    /// Frame elements of this document, in document order
    pub fn frames(&self) -> Vec<NodeId> {
        self.tree
            .descendants(self.tree.root())
            .filter(|&id| self.is_frame(id))
            .collect()
    }

    // ------------------------------------------------------------------
    // Focus
    // ------------------------------------------------------------------

    /// Focus an element
    pub fn focus(&mut self, node: NodeId) -> Result<(), DomError> {
        if self.tree.element(node).is_none() {
            return Err(DomError::NotAnElement(node));
        }
        if !self.tree.is_connected(node) {
            return Err(DomError::NotConnected(node));
        }
        self.active_element = Some(node);
        Ok(())
    }

    /// Clear focus
    pub fn blur(&mut self) {
        self.active_element = None;
    }

    /// Currently focused element
    pub fn active_element(&self) -> Option<NodeId> {
        self.active_element.filter(|&n| self.tree.is_connected(n))
    }

    /// Whether typing into this element produces text
    pub fn is_text_entry(&self, node: NodeId) -> bool {
        let Some(element) = self.tree.element(node) else {
            return false;
        };
        if element
            .get_attr("contenteditable")
            .is_some_and(|v| !v.eq_ignore_ascii_case("false"))
        {
            return true;
        }
        match element.tag.as_str() {
            "textarea" => true,
            "input" => {
                let kind = element.get_attr("type").unwrap_or("text").trim().to_ascii_lowercase();
                kind.is_empty() || TEXT_INPUT_TYPES.contains(&kind.as_str())
            }
            _ => false,
        }
    }

    // ------------------------------------------------------------------
    // Fullscreen / picture-in-picture
    // ------------------------------------------------------------------

    /// Current fullscreen element
    pub fn fullscreen_element(&self) -> Option<NodeId> {
        self.fullscreen_element
    }

    /// Make an element fullscreen
    pub fn request_fullscreen(&mut self, node: NodeId) -> Result<(), DomError> {
        if !self.tree.is_connected(node) {
            return Err(DomError::NotConnected(node));
        }
        self.fullscreen_element = Some(node);
        Ok(())
    }

    /// Leave fullscreen. Returns false if nothing was fullscreen.
    pub fn exit_fullscreen(&mut self) -> bool {
        self.fullscreen_element.take().is_some()
    }

    /// Current picture-in-picture element
    pub fn picture_in_picture_element(&self) -> Option<NodeId> {
        self.picture_in_picture_element
    }

    /// Pop a video out into picture-in-picture
    pub fn request_picture_in_picture(&mut self, node: NodeId) -> Result<(), DomError> {
        if !self.tree.element(node).is_some_and(|e| e.is("video")) {
            return Err(DomError::NotSupported("picture-in-picture needs a <video>".into()));
        }
        if !self.tree.is_connected(node) {
            return Err(DomError::NotConnected(node));
        }
        self.picture_in_picture_element = Some(node);
        Ok(())
    }

    /// Leave picture-in-picture. Returns false if nothing was popped out.
    pub fn exit_picture_in_picture(&mut self) -> bool {
        self.picture_in_picture_element.take().is_some()
    }
}
