//! Selection State
//!
//! The current video list and the index of the video keys act on.

use crate::{RemoteError, VideoHandle, VideoList};

/// Discovered videos plus the selected index
#[derive(Debug, Default, Clone)]
pub struct SelectionState {
    videos: VideoList,
    index: usize,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a fresh discovery result.
    ///
    /// The index is kept as-is, except that the first non-empty list
    /// after an empty one selects its first video. Returns true when
    /// that reset happened.
    pub fn replace(&mut self, videos: VideoList) -> bool {
        let reset = self.videos.is_empty() && !videos.is_empty();
        self.videos = videos;
        if reset {
            self.index = 0;
        }
        reset
    }

    pub fn videos(&self) -> &[VideoHandle] {
        &self.videos
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.videos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }

    /// The selected video, if the index is in range
    pub fn active(&self) -> Option<&VideoHandle> {
        self.videos.get(self.index)
    }

    /// Select the video at `index`
    pub fn select(&mut self, index: usize) -> Result<(), RemoteError> {
        if index >= self.videos.len() {
            return Err(RemoteError::SelectionOutOfRange {
                index,
                len: self.videos.len(),
            });
        }
        self.index = index;
        Ok(())
    }
}
