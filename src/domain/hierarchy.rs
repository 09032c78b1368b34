//! Vessel hierarchy: a forest of segments linked by endpoint identity.
//!
//! Segment B is a child of segment A iff `B.start` is the same point as `A.end`.
//! The parent is decided once, when B is inserted. A root inserted before its
//! eventual parent is re-attached when that parent arrives.

use std::collections::HashMap;
use std::fmt;

use generational_arena::Index;
use tracing::{debug, instrument, warn};

use crate::domain::arena::TreeArena;
use crate::domain::entities::{PointId, SceneId};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::segment::VesselSegment;

/// Stable handle to a node, valid until the node or one of its ancestors is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle(Index);

impl NodeHandle {
    fn index(self) -> Index {
        self.0
    }
}

impl fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (slot, generation) = self.0.into_raw_parts();
        write!(f, "node#{}.{}", slot, generation)
    }
}

/// One row of the presentation tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    pub handle: NodeHandle,
    pub name: String,
    pub depth: usize,
    pub parent: Option<NodeHandle>,
    pub child_count: usize,
}

/// Forest of vessel segments.
#[derive(Debug, Default)]
pub struct VesselHierarchy {
    tree: TreeArena,
    /// Live nodes in insertion order
    order: Vec<NodeHandle>,
    /// Point -> nodes whose end point it is, in insertion order
    end_index: HashMap<PointId, Vec<NodeHandle>>,
    /// Point -> nodes whose start point it is, in insertion order
    start_index: HashMap<PointId, Vec<NodeHandle>>,
}

impl VesselHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check that `segment` can be inserted without closing a cycle.
    pub fn check_insert(&self, segment: &VesselSegment) -> DomainResult<()> {
        let cycle = || DomainError::CycleDetected {
            segment: segment.name().to_string(),
        };

        if segment.start_point().is_some() && segment.start_point() == segment.end_point() {
            return Err(cycle());
        }

        let (start, end) = Self::linkable_points(segment);
        let parent = start.and_then(|p| self.parent_candidate(p));
        let parent_root = parent.and_then(|p| self.tree.root_of(p.index()));
        if let Some(parent_root) = parent_root {
            // the new node would adopt the root of its own tree
            if self
                .adoptable_roots(end)
                .any(|root| root.index() == parent_root)
            {
                return Err(cycle());
            }
        }
        Ok(())
    }

    /// Insert `segment` and place it by endpoint identity.
    ///
    /// The parent is the earliest live node whose end point is the segment's
    /// start point. Existing roots whose start point is the segment's end
    /// point become its children. Nodes that already have a parent never move.
    /// A segment missing either extremity is placed as a permanent root.
    #[instrument(level = "debug", skip(self, segment), fields(segment = %segment.name()))]
    pub fn insert(&mut self, segment: VesselSegment) -> DomainResult<NodeHandle> {
        self.check_insert(&segment)?;

        if !segment.has_extremities() {
            warn!("unresolved extremities, vessel stays a root");
        }

        let (start, end) = Self::linkable_points(&segment);
        let parent = start.and_then(|p| self.parent_candidate(p));
        let adopted: Vec<NodeHandle> = self.adoptable_roots(end).collect();

        let handle = NodeHandle(
            self.tree
                .insert_node(segment, parent.map(NodeHandle::index)),
        );
        for child in adopted {
            if self.tree.attach(child.index(), handle.index()) {
                debug!("re-attached {} below {}", child, handle);
            }
        }

        if let Some(start) = start {
            self.start_index.entry(start).or_default().push(handle);
        }
        if let Some(end) = end {
            self.end_index.entry(end).or_default().push(handle);
        }
        self.order.push(handle);

        debug!(parent = ?parent, "inserted {}", handle);
        Ok(handle)
    }

    /// Rename the segment behind `handle`. Tree shape is unaffected.
    /// Returns false for a stale handle.
    #[instrument(level = "debug", skip(self))]
    pub fn rename(&mut self, handle: NodeHandle, new_name: &str) -> bool {
        match self.tree.get_node_mut(handle.index()) {
            Some(node) => {
                node.data.rename(new_name);
                true
            }
            None => false,
        }
    }

    /// Delete the node and every descendant.
    ///
    /// Returns the owned artifacts of all removed segments, to be disposed by
    /// the caller. Start and end points are never part of it. A stale handle is
    /// a no-op and yields `None`.
    #[instrument(level = "debug", skip(self))]
    pub fn delete(&mut self, handle: NodeHandle) -> Option<Vec<SceneId>> {
        if !self.contains(handle) {
            debug!("stale handle, nothing to delete");
            return None;
        }

        let removed = self.tree.remove_subtree(handle.index());
        let mut disposals = Vec::new();
        for (idx, mut segment) in removed {
            let removed_handle = NodeHandle(idx);
            self.unindex(removed_handle, &segment);
            debug!("removing {} '{}'", removed_handle, segment.name());
            disposals.extend(segment.release());
        }
        let tree = &self.tree;
        self.order.retain(|h| tree.contains(h.index()));

        Some(disposals)
    }

    pub fn contains(&self, handle: NodeHandle) -> bool {
        self.tree.contains(handle.index())
    }

    /// Resolve `handle` or fail with `InvalidHandle`.
    pub fn require(&self, handle: NodeHandle) -> DomainResult<&VesselSegment> {
        self.segment(handle)
            .ok_or(DomainError::InvalidHandle(handle))
    }

    pub fn segment(&self, handle: NodeHandle) -> Option<&VesselSegment> {
        self.tree.get_node(handle.index()).map(|node| &node.data)
    }

    /// Number of direct children, `None` for a stale handle.
    pub fn child_count(&self, handle: NodeHandle) -> Option<usize> {
        self.tree
            .get_node(handle.index())
            .map(|node| node.children.len())
    }

    /// Structural parent, `None` for roots and stale handles.
    pub fn parent(&self, handle: NodeHandle) -> Option<NodeHandle> {
        self.tree
            .get_node(handle.index())
            .and_then(|node| node.parent)
            .map(NodeHandle)
    }

    pub fn children(&self, handle: NodeHandle) -> Vec<NodeHandle> {
        self.tree
            .get_node(handle.index())
            .map(|node| node.children.iter().copied().map(NodeHandle).collect())
            .unwrap_or_default()
    }

    /// `handle` and its descendants in pre-order, empty for a stale handle.
    pub fn subtree(&self, handle: NodeHandle) -> Vec<NodeHandle> {
        self.tree
            .iter_from(handle.index())
            .map(|(idx, _, _)| NodeHandle(idx))
            .collect()
    }

    pub fn roots(&self) -> Vec<NodeHandle> {
        self.tree.roots().iter().copied().map(NodeHandle).collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Segments in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeHandle, &VesselSegment)> {
        self.order
            .iter()
            .filter_map(|&handle| self.segment(handle).map(|segment| (handle, segment)))
    }

    /// First segment named `name`, in insertion order.
    pub fn find_by_name(&self, name: &str) -> Option<NodeHandle> {
        self.iter()
            .find(|(_, segment)| segment.name() == name)
            .map(|(handle, _)| handle)
    }

    /// Pre-order rows for a tree widget.
    pub fn rows(&self) -> Vec<TreeRow> {
        self.tree
            .iter()
            .map(|(idx, node, depth)| TreeRow {
                handle: NodeHandle(idx),
                name: node.data.name().to_string(),
                depth,
                parent: node.parent.map(NodeHandle),
                child_count: node.children.len(),
            })
            .collect()
    }

    pub fn depth(&self) -> usize {
        self.tree.depth()
    }

    pub fn leaf_names(&self) -> Vec<String> {
        self.tree.leaf_nodes()
    }

    /// Points usable for linking: both or neither.
    fn linkable_points(segment: &VesselSegment) -> (Option<PointId>, Option<PointId>) {
        if segment.has_extremities() {
            (segment.start_point(), segment.end_point())
        } else {
            (None, None)
        }
    }

    fn parent_candidate(&self, start: PointId) -> Option<NodeHandle> {
        self.end_index
            .get(&start)
            .and_then(|nodes| nodes.first().copied())
    }

    fn adoptable_roots(&self, end: Option<PointId>) -> impl Iterator<Item = NodeHandle> + '_ {
        end.and_then(|end| self.start_index.get(&end))
            .into_iter()
            .flatten()
            .copied()
            .filter(|handle| self.tree.is_root(handle.index()))
    }

    fn unindex(&mut self, handle: NodeHandle, segment: &VesselSegment) {
        for (index, point) in [
            (&mut self.start_index, segment.start_point()),
            (&mut self.end_index, segment.end_point()),
        ] {
            let Some(point) = point else { continue };
            if let Some(nodes) = index.get_mut(&point) {
                nodes.retain(|&h| h != handle);
                if nodes.is_empty() {
                    index.remove(&point);
                }
            }
        }
    }
}
