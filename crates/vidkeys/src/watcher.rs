//! Mutation Watcher
//!
//! Decides which child-list mutations can change the video list and
//! schedules a re-discovery for each of them. Additions wait for a
//! settle delay so a freshly inserted player can finish building its
//! subtree; removals re-scan on the next turn.

use std::time::Duration;

use vidkeys_dom::timers::TimerCallback;
use vidkeys_dom::{Document, MutationRecord, NodeId, Scope};

use crate::Config;

/// Relevance filter and scheduling policy for DOM mutations
#[derive(Debug, Clone)]
pub struct MutationWatcher {
    settle_delay: Duration,
    class_hints: Vec<String>,
}

impl MutationWatcher {
    pub fn new(settle_delay: Duration, class_hints: Vec<String>) -> Self {
        Self {
            settle_delay,
            class_hints: class_hints.into_iter().map(|h| h.to_lowercase()).collect(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.settle_delay(), config.video_class_hints.clone())
    }

    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    /// Whether adding or removing `node` may change the video list.
    ///
    /// Matches videos, frames, elements whose class looks like a player,
    /// and anything containing a video or frame. Detached nodes are
    /// still inspected.
    pub fn is_relevant(&self, document: &Document, node: NodeId) -> bool {
        let tree = document.tree();
        let Some(element) = tree.element(node) else {
            return false;
        };
        if element.is("video") || element.is_frame() {
            return true;
        }

        let class = element.class_name().to_lowercase();
        if self.class_hints.iter().any(|hint| !hint.is_empty() && class.contains(hint.as_str())) {
            return true;
        }

        tree.descendants(node)
            .any(|id| tree.element(id).is_some_and(|e| e.is("video") || e.is_frame()))
    }

    /// Delay for every relevant node in the batch, in record order.
    ///
    /// One entry per node: bursts are not coalesced.
    pub fn plan(&self, document: &Document, records: &[MutationRecord]) -> Vec<Duration> {
        let mut delays = Vec::new();
        for record in records {
            for &node in &record.added_nodes {
                if self.is_relevant(document, node) {
                    delays.push(self.settle_delay);
                }
            }
            for &node in &record.removed_nodes {
                if self.is_relevant(document, node) {
                    delays.push(Duration::ZERO);
                }
            }
        }
        delays
    }

    /// Schedule one task per relevant node. Returns how many were queued.
    pub fn schedule(
        &self,
        records: &[MutationRecord],
        scope: &mut Scope<'_>,
        task: &mut dyn FnMut() -> TimerCallback,
    ) -> usize {
        let delays = self.plan(scope.document, records);
        for &delay in &delays {
            tracing::debug!("Scheduling rediscovery in {:?}", delay);
            scope.set_timeout(delay, task());
        }
        delays.len()
    }
}

impl Default for MutationWatcher {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
