//! Mutation Observer API
//!
//! Child-list observation of a document subtree. Records are queued when
//! the document mutates and handed out in batches by the page.

use crate::{DomTree, NodeId};

/// Handle for a registered observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u64);

/// Mutation observer options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MutationObserverInit {
    pub child_list: bool,
    pub subtree: bool,
}

impl MutationObserverInit {
    /// Additions and removals anywhere below the target
    pub fn subtree_child_list() -> Self {
        Self {
            child_list: true,
            subtree: true,
        }
    }
}

/// Child-list mutation record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    pub target: NodeId,
    pub added_nodes: Vec<NodeId>,
    pub removed_nodes: Vec<NodeId>,
}

impl MutationRecord {
    pub fn added(target: NodeId, node: NodeId) -> Self {
        Self {
            target,
            added_nodes: vec![node],
            removed_nodes: Vec::new(),
        }
    }

    pub fn removed(target: NodeId, node: NodeId) -> Self {
        Self {
            target,
            added_nodes: Vec::new(),
            removed_nodes: vec![node],
        }
    }
}

#[derive(Debug, Clone)]
struct Observation {
    id: ObserverId,
    target: NodeId,
    options: MutationObserverInit,
}

impl Observation {
    fn wants(&self, tree: &DomTree, record: &MutationRecord) -> bool {
        if !self.options.child_list {
            return false;
        }
        if self.options.subtree {
            tree.contains(self.target, record.target)
        } else {
            self.target == record.target
        }
    }
}

/// Observations and queued records of one document
#[derive(Debug, Default)]
pub(crate) struct ObserverRegistry {
    observations: Vec<Observation>,
    pending: Vec<(ObserverId, MutationRecord)>,
    next_id: u64,
}

impl ObserverRegistry {
    pub fn observe(&mut self, target: NodeId, options: MutationObserverInit) -> ObserverId {
        self.next_id += 1;
        let id = ObserverId(self.next_id);
        self.observations.push(Observation { id, target, options });
        id
    }

    /// Drop an observation and any records still queued for it
    pub fn disconnect(&mut self, id: ObserverId) -> bool {
        let before = self.observations.len();
        self.observations.retain(|o| o.id != id);
        self.pending.retain(|(owner, _)| *owner != id);
        self.observations.len() < before
    }

    pub fn is_observing(&self, id: ObserverId) -> bool {
        self.observations.iter().any(|o| o.id == id)
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Queue a record for every observation interested in it
    pub fn queue(&mut self, tree: &DomTree, record: MutationRecord) {
        for observation in &self.observations {
            if observation.wants(tree, &record) {
                self.pending.push((observation.id, record.clone()));
            }
        }
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn take_records(&mut self) -> Vec<(ObserverId, MutationRecord)> {
        std::mem::take(&mut self.pending)
    }
}
