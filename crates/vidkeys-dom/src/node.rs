//! DOM Node
//!
//! Nodes link to each other through `NodeId` instead of pointers, so a
//! detached node can still be inspected after removal.

use crate::{Document, MediaState, NodeId};

/// DOM Node - Core structure
#[derive(Debug)]
pub struct Node {
    /// Parent node (NONE if root or detached)
    pub parent: NodeId,
    /// First child
    pub first_child: NodeId,
    /// Last child (for O(1) append)
    pub last_child: NodeId,
    /// Previous sibling
    pub prev_sibling: NodeId,
    /// Next sibling
    pub next_sibling: NodeId,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    fn with_data(data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data,
        }
    }

    /// Create a new element node
    pub fn element(tag: &str) -> Self {
        Self::with_data(NodeData::Element(ElementData::new(tag)))
    }

    /// Create a new text node
    pub fn text(content: String) -> Self {
        Self::with_data(NodeData::Text(content))
    }

    /// Create a document node
    pub fn document() -> Self {
        Self::with_data(NodeData::Document)
    }

    /// Check if this is an element
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get mutable element data
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }
}

/// Node-specific data
#[derive(Debug)]
pub enum NodeData {
    /// Document root
    Document,
    /// Element
    Element(ElementData),
    /// Text content
    Text(String),
}

/// Element-specific data
#[derive(Debug)]
pub struct ElementData {
    /// Lowercase tag name
    pub tag: String,
    /// Attributes in insertion order
    pub attrs: Vec<Attribute>,
    /// Playback state for `<video>` and `<audio>`
    pub media: Option<MediaState>,
    /// Browsing context of an `<iframe>` or `<frame>`
    pub content_document: Option<Box<Document>>,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        let tag = tag.to_ascii_lowercase();
        let media = matches!(tag.as_str(), "video" | "audio").then(MediaState::new);
        Self {
            tag,
            attrs: Vec::new(),
            media,
            content_document: None,
        }
    }

    /// Check the tag name
    #[inline]
    pub fn is(&self, tag: &str) -> bool {
        self.tag.eq_ignore_ascii_case(tag)
    }

    /// Whether this element hosts a nested browsing context
    #[inline]
    pub fn is_frame(&self) -> bool {
        matches!(self.tag.as_str(), "iframe" | "frame")
    }

    /// Get an attribute value
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| a.value.as_str())
    }

    /// Check attribute presence
    pub fn has_attr(&self, name: &str) -> bool {
        self.get_attr(name).is_some()
    }

    /// Set an attribute
    pub fn set_attr(&mut self, name: &str, value: &str) {
        if let Some(attr) = self.attrs.iter_mut().find(|a| a.name.eq_ignore_ascii_case(name)) {
            attr.value = value.to_string();
            return;
        }
        self.attrs.push(Attribute {
            name: name.to_ascii_lowercase(),
            value: value.to_string(),
        });
    }

    /// Remove an attribute, returning its old value
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let pos = self.attrs.iter().position(|a| a.name.eq_ignore_ascii_case(name))?;
        Some(self.attrs.remove(pos).value)
    }

    /// The raw `class` attribute ("" when absent)
    pub fn class_name(&self) -> &str {
        self.get_attr("class").unwrap_or("")
    }
}

/// Attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_gets_media_state() {
        let video = ElementData::new("VIDEO");
        assert_eq!(video.tag, "video");
        assert!(video.media.is_some());

        let div = ElementData::new("div");
        assert!(div.media.is_none());
    }

    #[test]
    fn test_attributes() {
        let mut el = ElementData::new("div");
        el.set_attr("Class", "a b");
        el.set_attr("class", "c  d");
        assert_eq!(el.attrs.len(), 1);
        assert_eq!(el.class_name(), "c  d");
        assert_eq!(el.remove_attr("CLASS").as_deref(), Some("c  d"));
        assert!(!el.has_attr("class"));
    }

    #[test]
    fn test_frame_tags() {
        assert!(ElementData::new("iframe").is_frame());
        assert!(ElementData::new("frame").is_frame());
        assert!(!ElementData::new("frameset").is_frame());
    }
}
