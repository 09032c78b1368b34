//! Vessel tree service
//!
//! Couples the in-memory hierarchy with the scene: disposes what a deletion
//! releases and keeps scene names in step with vessel names.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::application::ApplicationResult;
use crate::domain::{NodeHandle, SceneId, VesselHierarchy, VesselSegment};
use crate::infrastructure::traits::ResourceManager;

/// Per-row action offered by the presentation tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowAction {
    Rename(String),
    Delete,
}

/// What a cascading delete removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletionReport {
    /// Names of the removed vessels, the target first
    pub vessels: Vec<String>,
    /// Names of the disposed artifacts
    pub disposed: Vec<String>,
}

/// Service owning the vessel hierarchy.
pub struct VesselTreeService {
    hierarchy: VesselHierarchy,
    resources: Arc<dyn ResourceManager>,
}

impl VesselTreeService {
    pub fn new(resources: Arc<dyn ResourceManager>) -> Self {
        Self {
            hierarchy: VesselHierarchy::new(),
            resources,
        }
    }

    pub fn hierarchy(&self) -> &VesselHierarchy {
        &self.hierarchy
    }

    pub fn resources(&self) -> &Arc<dyn ResourceManager> {
        &self.resources
    }

    /// Insert a vessel into the tree.
    ///
    /// A vessel rejected by the hierarchy has its artifacts disposed before
    /// the error is returned, so nothing is left orphaned in the scene.
    #[instrument(level = "debug", skip(self, segment), fields(segment = %segment.name()))]
    pub fn add_vessel(&mut self, mut segment: VesselSegment) -> ApplicationResult<NodeHandle> {
        if let Err(e) = self.hierarchy.check_insert(&segment) {
            warn!("rejected: {}", e);
            self.resources.dispose(&segment.release());
            return Err(e.into());
        }

        self.sync_names(&segment);
        let handle = self.hierarchy.insert(segment)?;
        info!(
            "added vessel {} (parent: {:?})",
            handle,
            self.hierarchy.parent(handle)
        );
        Ok(handle)
    }

    /// Rename a vessel and its artifacts in the scene. False for a stale handle.
    #[instrument(level = "debug", skip(self))]
    pub fn rename(&mut self, handle: NodeHandle, name: &str) -> bool {
        if !self.hierarchy.rename(handle, name) {
            debug!("stale handle, nothing to rename");
            return false;
        }
        if let Some(segment) = self.hierarchy.segment(handle) {
            self.sync_names(segment);
        }
        true
    }

    /// Delete a vessel and its descendants, disposing their artifacts.
    ///
    /// Start and end points stay in the scene. Returns `None` for a stale handle.
    #[instrument(level = "debug", skip(self))]
    pub fn delete(&mut self, handle: NodeHandle) -> Option<DeletionReport> {
        let vessels: Vec<String> = self
            .hierarchy
            .subtree(handle)
            .into_iter()
            .filter_map(|h| self.hierarchy.segment(h).map(|s| s.name().to_string()))
            .collect();

        let disposals = self.hierarchy.delete(handle)?;
        let disposed = self.names_of(&disposals);
        self.resources.dispose(&disposals);
        info!(
            "deleted {} vessel(s), disposed {} artifact(s)",
            vessels.len(),
            disposed.len()
        );

        Some(DeletionReport { vessels, disposed })
    }

    /// Apply a row action. False when the handle is stale.
    pub fn trigger(&mut self, handle: NodeHandle, action: RowAction) -> bool {
        match action {
            RowAction::Rename(name) => self.rename(handle, &name),
            RowAction::Delete => self.delete(handle).is_some(),
        }
    }

    fn sync_names(&self, segment: &VesselSegment) {
        for artifact in segment.artifacts() {
            if !self.resources.set_name(artifact.id, &artifact.name) {
                warn!("artifact {} of '{}' is not in the scene", artifact.id, segment.name());
            }
        }
    }

    fn names_of(&self, ids: &[SceneId]) -> Vec<String> {
        ids.iter().filter_map(|&id| self.resources.name(id)).collect()
    }
}
