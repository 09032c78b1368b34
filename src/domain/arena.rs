use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::segment::VesselSegment;

/// Tree node in the arena-based forest.
#[derive(Debug)]
pub struct TreeNode {
    /// Vessel segment held by this node
    pub data: VesselSegment,
    /// Index of parent node in the arena, None for root nodes
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena, in attachment order
    pub children: Vec<Index>,
}

/// Arena-based forest of vessel segments.
///
/// Uses a generational arena so indices of removed nodes never resolve again.
/// Roots are kept in the order they became roots.
#[derive(Debug)]
pub struct TreeArena {
    /// Arena storage for all tree nodes
    arena: Arena<TreeNode>,
    /// Indices of the root nodes
    roots: Vec<Index>,
}

impl Default for TreeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeArena {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            roots: Vec::new(),
        }
    }

    #[instrument(level = "trace", skip(self, data), fields(segment = %data.name()))]
    pub fn insert_node(&mut self, data: VesselSegment, parent: Option<Index>) -> Index {
        // a stale parent index leaves the node as a root
        let parent = parent.filter(|&idx| self.arena.contains(idx));
        let node = TreeNode {
            data,
            parent,
            children: Vec::new(),
        };
        let node_idx = self.arena.insert(node);

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(node_idx);
            }
        } else {
            self.roots.push(node_idx);
        }

        node_idx
    }

    /// Move the root `child` below `parent`. Returns false, changing nothing,
    /// when `child` is not a root or either index is stale.
    #[instrument(level = "trace", skip(self))]
    pub fn attach(&mut self, child: Index, parent: Index) -> bool {
        if child == parent || !self.arena.contains(parent) || !self.is_root(child) {
            return false;
        }
        self.roots.retain(|&root| root != child);
        if let Some(node) = self.arena.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.arena.get_mut(parent) {
            node.children.push(child);
        }
        true
    }

    /// Remove `idx` and all its descendants. Descendants come before their
    /// ancestors in the returned list.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_subtree(&mut self, idx: Index) -> Vec<(Index, VesselSegment)> {
        let Some(parent) = self.arena.get(idx).map(|node| node.parent) else {
            return Vec::new();
        };

        match parent {
            Some(parent_idx) => {
                if let Some(parent) = self.arena.get_mut(parent_idx) {
                    parent.children.retain(|&child| child != idx);
                }
            }
            None => self.roots.retain(|&root| root != idx),
        }

        let order = self.postorder_from(idx);
        order
            .into_iter()
            .filter_map(|node_idx| {
                self.arena
                    .remove(node_idx)
                    .map(|node| (node_idx, node.data))
            })
            .collect()
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub fn get_node_mut(&mut self, idx: Index) -> Option<&mut TreeNode> {
        self.arena.get_mut(idx)
    }

    pub fn contains(&self, idx: Index) -> bool {
        self.arena.contains(idx)
    }

    pub fn is_root(&self, idx: Index) -> bool {
        self.arena
            .get(idx)
            .is_some_and(|node| node.parent.is_none())
    }

    pub fn roots(&self) -> &[Index] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Topmost ancestor of `idx`, `idx` itself for a root.
    pub fn root_of(&self, idx: Index) -> Option<Index> {
        let mut current = idx;
        let mut node = self.arena.get(current)?;
        // bounded by the node count so a corrupted parent chain cannot spin
        for _ in 0..self.arena.len() {
            match node.parent {
                Some(parent_idx) => {
                    current = parent_idx;
                    node = self.arena.get(current)?;
                }
                None => return Some(current),
            }
        }
        None
    }

    /// Pre-order traversal over every tree, roots in order.
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self, self.roots.clone())
    }

    /// Pre-order traversal of the subtree rooted at `idx`.
    pub fn iter_from(&self, idx: Index) -> TreeIterator<'_> {
        TreeIterator::new(self, vec![idx])
    }

    /// Post-order traversal over every tree, roots in order.
    pub fn iter_postorder(&self) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self, self.roots.clone())
    }

    fn postorder_from(&self, idx: Index) -> Vec<Index> {
        PostOrderIterator::new(self, vec![idx])
            .map(|(node_idx, _, _)| node_idx)
            .collect()
    }

    /// Number of levels of the deepest tree, 0 for an empty forest.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.iter()
            .map(|(_, _, depth)| depth + 1)
            .max()
            .unwrap_or(0)
    }

    /// Names of all leaf segments, in pre-order.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_nodes(&self) -> Vec<String> {
        self.iter()
            .filter(|(_, node, _)| node.children.is_empty())
            .map(|(_, node, _)| node.data.name().to_string())
            .collect()
    }
}

/// Depth-first pre-order iterator yielding `(index, node, depth)`.
pub struct TreeIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<(Index, usize)>,
}

impl<'a> TreeIterator<'a> {
    fn new(arena: &'a TreeArena, starts: Vec<Index>) -> Self {
        // Push in reverse order for left-to-right traversal
        let stack = starts.into_iter().rev().map(|idx| (idx, 0)).collect();
        Self { arena, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode, usize);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, depth)) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                for &child in node.children.iter().rev() {
                    self.stack.push((child, depth + 1));
                }
                return Some((current_idx, node, depth));
            }
        }
        None
    }
}

/// Depth-first post-order iterator yielding `(index, node, depth)`.
pub struct PostOrderIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<(Index, usize, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(arena: &'a TreeArena, starts: Vec<Index>) -> Self {
        let stack = starts
            .into_iter()
            .rev()
            .map(|idx| (idx, 0, false))
            .collect();
        Self { arena, stack }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a TreeNode, usize);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, depth, visited)) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                if visited {
                    return Some((current_idx, node, depth));
                }
                self.stack.push((current_idx, depth, true));
                for &child in node.children.iter().rev() {
                    self.stack.push((child, depth + 1, false));
                }
            }
        }
        None
    }
}
