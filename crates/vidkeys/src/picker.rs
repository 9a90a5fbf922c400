//! Video Picker
//!
//! Labels for the video list and an outline overlay that marks a video
//! while its picker entry is hovered.

use std::collections::HashMap;

use url::Url;
use vidkeys_dom::{Document, NodeId};

use crate::{SelectionState, VideoHandle};

/// Class carried by outline overlays
pub const OUTLINE_CLASS: &str = "vidkeys-outline";

const OUTLINE_STYLE: &str = "position:absolute;pointer-events:none;box-sizing:border-box;border:3px solid #e0245e;";

/// One row of the picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerEntry {
    pub index: usize,
    pub label: String,
    pub active: bool,
}

/// Picker rows for the current selection
pub fn entries(selection: &SelectionState, top: &Document) -> Vec<PickerEntry> {
    selection
        .videos()
        .iter()
        .enumerate()
        .map(|(index, video)| PickerEntry {
            index,
            label: label(index, video, top),
            active: index == selection.index(),
        })
        .collect()
}

fn label(index: usize, video: &VideoHandle, top: &Document) -> String {
    let name = match video.source(top) {
        Some(source) => source_name(&source),
        None => "(unavailable)".to_string(),
    };
    format!("{}. {}", index + 1, name)
}

/// Last path segment of a source URL, or the whole source
fn source_name(source: &str) -> String {
    Url::parse(source)
        .ok()
        .and_then(|url| {
            url.path_segments()
                .and_then(|segments| segments.filter(|s| !s.is_empty()).last().map(str::to_string))
        })
        .unwrap_or_else(|| source.to_string())
}

/// Outline overlays currently in the page
#[derive(Debug, Default)]
pub struct Picker {
    outlines: HashMap<VideoHandle, NodeId>,
}

impl Picker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of outlines we believe are shown
    pub fn outline_count(&self) -> usize {
        self.outlines.len()
    }

    /// The overlay element marking `video`, if one is shown
    pub fn outline(&self, video: &VideoHandle) -> Option<NodeId> {
        self.outlines.get(video).copied()
    }

    /// Insert an outline next to `video`. Returns false if one is
    /// already shown or the video is gone.
    pub fn show_outline(&mut self, top: &mut Document, video: &VideoHandle) -> bool {
        let Some(document) = video.document_mut(top) else {
            return false;
        };
        if let Some(&existing) = self.outlines.get(video) {
            if document.is_connected(existing) {
                return false;
            }
            self.outlines.remove(video);
        }
        if !document.is_connected(video.node()) {
            return false;
        }

        let outline = document.create_element("div");
        let inserted = document
            .set_attribute(outline, "class", OUTLINE_CLASS)
            .and_then(|()| document.set_attribute(outline, "style", OUTLINE_STYLE))
            .and_then(|()| document.insert_after(video.node(), outline));
        if let Err(err) = inserted {
            tracing::debug!("Could not outline {:?}: {}", video.node(), err);
            return false;
        }
        self.outlines.insert(video.clone(), outline);
        true
    }

    /// Remove the outline next to `video`. Returns false if none was shown.
    pub fn hide_outline(&mut self, top: &mut Document, video: &VideoHandle) -> bool {
        let Some(outline) = self.outlines.remove(video) else {
            return false;
        };
        if let Some(document) = video.document_mut(top) {
            // Removal of an already detached node is a no-op
            let _ = document.remove(outline);
        }
        true
    }

    /// Remove every outline
    pub fn clear(&mut self, top: &mut Document) {
        let videos: Vec<VideoHandle> = self.outlines.keys().cloned().collect();
        for video in videos {
            self.hide_outline(top, &video);
        }
    }
}
