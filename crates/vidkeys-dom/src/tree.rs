//! DOM Tree (arena-based allocation)

use crate::{DomError, ElementData, Node, NodeId};

/// Arena-based DOM tree
///
/// Node 0 is always the document node. Removed nodes stay in the arena,
/// unlinked from the root, so they can still be inspected.
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::document()],
        }
    }

    /// Document node
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Get element data
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id)?.as_element()
    }

    /// Get mutable element data
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id)?.as_element_mut()
    }

    /// Tag name of an element
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|e| e.tag.as_str())
    }

    /// Number of nodes in the arena (including detached ones)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the document node exists from construction
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(Node::element(tag))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(Node::text(content.to_string()))
    }

    fn check(&self, id: NodeId) -> Result<(), DomError> {
        if self.get(id).is_some() {
            Ok(())
        } else {
            Err(DomError::NodeNotFound(id))
        }
    }

    /// Parent of a node
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).map(|n| n.parent).filter(|p| p.is_valid())
    }

    /// Whether `ancestor` is `node` or one of its ancestors
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = node;
        while current.is_valid() {
            if current == ancestor {
                return true;
            }
            current = match self.get(current) {
                Some(n) => n.parent,
                None => return false,
            };
        }
        false
    }

    /// Whether the node is reachable from the document node
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.get(id).is_some() && self.contains(NodeId::ROOT, id)
    }

    /// Unlink a node from its parent; its own subtree stays intact
    pub fn detach(&mut self, id: NodeId) -> Result<Option<NodeId>, DomError> {
        self.check(id)?;
        let (parent, prev, next) = {
            let node = &self.nodes[id.index()];
            (node.parent, node.prev_sibling, node.next_sibling)
        };
        if !parent.is_valid() {
            return Ok(None);
        }

        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = next;
        } else {
            self.nodes[parent.index()].first_child = next;
        }
        if next.is_valid() {
            self.nodes[next.index()].prev_sibling = prev;
        } else {
            self.nodes[parent.index()].last_child = prev;
        }

        let node = &mut self.nodes[id.index()];
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
        Ok(Some(parent))
    }

    fn check_insertion(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.check(parent)?;
        self.check(child)?;
        let parent_accepts = self.get(parent).is_some_and(|n| !matches!(n.data, crate::NodeData::Text(_)));
        if child == NodeId::ROOT || !parent_accepts || self.contains(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        Ok(())
    }

    /// Append `child` as the last child of `parent`, moving it if attached.
    ///
    /// Returns the previous parent when the node was moved.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<Option<NodeId>, DomError> {
        self.check_insertion(parent, child)?;
        let old_parent = self.detach(child)?;

        let last = self.nodes[parent.index()].last_child;
        {
            let node = &mut self.nodes[child.index()];
            node.parent = parent;
            node.prev_sibling = last;
        }
        if last.is_valid() {
            self.nodes[last.index()].next_sibling = child;
        } else {
            self.nodes[parent.index()].first_child = child;
        }
        self.nodes[parent.index()].last_child = child;
        Ok(old_parent)
    }

    /// Insert `node` immediately after `reference`.
    ///
    /// Returns the previous parent when the node was moved.
    pub fn insert_after(&mut self, reference: NodeId, node: NodeId) -> Result<Option<NodeId>, DomError> {
        let parent = self.parent(reference).ok_or(DomError::NotConnected(reference))?;
        self.check_insertion(parent, node)?;
        if reference == node {
            return Err(DomError::HierarchyRequest { parent, child: node });
        }
        let old_parent = self.detach(node)?;

        let next = self.nodes[reference.index()].next_sibling;
        {
            let n = &mut self.nodes[node.index()];
            n.parent = parent;
            n.prev_sibling = reference;
            n.next_sibling = next;
        }
        self.nodes[reference.index()].next_sibling = node;
        if next.is_valid() {
            self.nodes[next.index()].prev_sibling = node;
        } else {
            self.nodes[parent.index()].last_child = node;
        }
        Ok(old_parent)
    }

    /// Iterate over direct children
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = (NodeId, &Node)> {
        let first = self.get(id).map(|n| n.first_child).unwrap_or(NodeId::NONE);
        std::iter::successors(
            Some(first).filter(|c| c.is_valid()),
            move |&c| Some(self.nodes[c.index()].next_sibling).filter(|n| n.is_valid()),
        )
        .map(move |c| (c, &self.nodes[c.index()]))
    }

    /// Depth-first, pre-order walk of everything below `root` (excluding it)
    pub fn descendants(&self, root: NodeId) -> Descendants<'_> {
        let next = self.get(root).map(|n| n.first_child).unwrap_or(NodeId::NONE);
        Descendants { tree: self, root, next }
    }

    /// Elements with the given tag below `root`, in document order
    pub fn elements_by_tag_name(&self, root: NodeId, tag: &str) -> Vec<NodeId> {
        self.descendants(root)
            .filter(|&id| self.element(id).is_some_and(|e| e.is(tag)))
            .collect()
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Pre-order subtree iterator
pub struct Descendants<'a> {
    tree: &'a DomTree,
    root: NodeId,
    next: NodeId,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next;
        if !current.is_valid() {
            return None;
        }
        let node = &self.tree.nodes[current.index()];

        self.next = if node.first_child.is_valid() {
            node.first_child
        } else {
            // Climb until a sibling exists, never leaving the subtree
            let mut cursor = current;
            loop {
                if cursor == self.root {
                    break NodeId::NONE;
                }
                let n = &self.tree.nodes[cursor.index()];
                if n.next_sibling.is_valid() {
                    break n.next_sibling;
                }
                cursor = n.parent;
                if !cursor.is_valid() || cursor == self.root {
                    break NodeId::NONE;
                }
            }
        };
        Some(current)
    }
}
