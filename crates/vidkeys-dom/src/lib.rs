//! vidkeys DOM - Host page model
//!
//! Arena DOM tree, documents with origins, nested frames, media elements,
//! keyboard events, window listeners, mutation observers and a virtual
//! timer queue. This is the page a remote control gets injected into.

mod node;
mod tree;
mod document;
pub mod media;
pub mod observer;
pub mod events;
pub mod timers;
pub mod page;

pub use node::{Node, NodeData, ElementData, Attribute};
pub use tree::{DomTree, Descendants};
pub use document::Document;
pub use media::MediaState;
pub use observer::{MutationObserverInit, MutationRecord, ObserverId};
pub use events::{
    EventType, Key, KeyModifiers, KeyboardEvent, KeyboardEventType, ListenerId,
    ListenerOptions, Window, WindowEvent,
};
pub use timers::{TimerId, TimerQueue};
pub use page::{Page, Scope};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root (document) node ID
    pub const ROOT: NodeId = NodeId(0);
    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check that this is not the sentinel
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Raw arena index
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// DOM error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    #[error("Not an element: {0:?}")]
    NotAnElement(NodeId),

    #[error("Cannot insert {child:?} under {parent:?}")]
    HierarchyRequest { parent: NodeId, child: NodeId },

    #[error("Node is not connected to the document: {0:?}")]
    NotConnected(NodeId),

    #[error("Not a frame element: {0:?}")]
    NotAFrame(NodeId),

    #[error("Blocked access to frame with origin {frame} from {requester}")]
    FrameAccessDenied { frame: String, requester: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Not supported: {0}")]
    NotSupported(String),
}
