//! Collaborator traits at the edge of the vessel core
//!
//! The core never touches scene storage or image processing directly. These
//! traits abstract both, so services can be driven by the in-memory scene
//! here or by a real scene graph.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use generational_arena::Arena;
use tracing::{debug, instrument, trace};

use crate::domain::{artifact_name, ArtifactKind, PointId, SceneId, VesselSegment};

/// Scene / resource manager abstraction.
pub trait ResourceManager: Send + Sync {
    /// Create a named landmark.
    fn create_point(&self, name: &str, position: [f64; 3]) -> PointId;

    /// Create a named volume not owned by any vessel (e.g. the source image).
    fn create_volume(&self, name: &str) -> SceneId;

    /// Create a named artifact of the given kind.
    fn create_artifact(&self, kind: ArtifactKind, name: &str) -> SceneId;

    /// Remove objects from the scene. Unknown ids are ignored.
    fn dispose(&self, ids: &[SceneId]);

    /// Check whether the object is still in the scene.
    fn is_present(&self, id: SceneId) -> bool;

    /// Display name of the object, None when absent.
    fn name(&self, id: SceneId) -> Option<String>;

    /// Set the display name. Returns false when the object is absent.
    fn set_name(&self, id: SceneId, name: &str) -> bool;
}

/// Vessel segmentation and centerline extraction.
pub trait SegmentationEngine: Send + Sync {
    /// Extract the vessel between `start` and `end` from `source_volume`.
    ///
    /// The returned segment is named `name`, carries both extremities and
    /// owns every artifact produced along the way.
    fn extract(
        &self,
        name: &str,
        source_volume: SceneId,
        start: PointId,
        end: PointId,
    ) -> Result<VesselSegment, String>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// What a scene object is.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneObjectKind {
    Point { position: [f64; 3] },
    Volume,
    Artifact(ArtifactKind),
}

/// Object stored in the in-memory scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub name: String,
    pub kind: SceneObjectKind,
}

/// In-memory scene backed by a generational arena.
#[derive(Debug, Default)]
pub struct InMemoryScene {
    objects: Mutex<Arena<SceneObject>>,
}

impl InMemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects().is_empty()
    }

    pub fn get(&self, id: SceneId) -> Option<SceneObject> {
        self.objects().get(id.index()).cloned()
    }

    pub fn position(&self, point: PointId) -> Option<[f64; 3]> {
        match self.get(point.scene_id())?.kind {
            SceneObjectKind::Point { position } => Some(position),
            _ => None,
        }
    }

    fn insert(&self, name: &str, kind: SceneObjectKind) -> SceneId {
        let id = SceneId::from(self.objects().insert(SceneObject {
            name: name.to_string(),
            kind,
        }));
        trace!("scene: created {} '{}'", id, name);
        id
    }

    fn objects(&self) -> MutexGuard<'_, Arena<SceneObject>> {
        // the arena holds no invariant a panicking writer could break
        self.objects.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ResourceManager for InMemoryScene {
    fn create_point(&self, name: &str, position: [f64; 3]) -> PointId {
        PointId::new(self.insert(name, SceneObjectKind::Point { position }))
    }

    fn create_volume(&self, name: &str) -> SceneId {
        self.insert(name, SceneObjectKind::Volume)
    }

    fn create_artifact(&self, kind: ArtifactKind, name: &str) -> SceneId {
        self.insert(name, SceneObjectKind::Artifact(kind))
    }

    #[instrument(level = "debug", skip(self))]
    fn dispose(&self, ids: &[SceneId]) {
        let mut objects = self.objects();
        for id in ids {
            if let Some(object) = objects.remove(id.index()) {
                debug!("scene: disposed {} '{}'", id, object.name);
            }
        }
    }

    fn is_present(&self, id: SceneId) -> bool {
        self.objects().contains(id.index())
    }

    fn name(&self, id: SceneId) -> Option<String> {
        self.objects().get(id.index()).map(|object| object.name.clone())
    }

    fn set_name(&self, id: SceneId, name: &str) -> bool {
        match self.objects().get_mut(id.index()) {
            Some(object) => {
                object.name = name.to_string();
                true
            }
            None => false,
        }
    }
}

/// Segmentation engine producing empty placeholder artifacts.
///
/// Stands in for the image-processing pipeline: every extraction yields one
/// artifact of each kind, registered in the scene under its derived name.
pub struct PlaceholderEngine {
    resources: Arc<dyn ResourceManager>,
}

impl PlaceholderEngine {
    pub fn new(resources: Arc<dyn ResourceManager>) -> Self {
        Self { resources }
    }

    fn create(&self, name: &str, kind: ArtifactKind) -> SceneId {
        self.resources
            .create_artifact(kind, &artifact_name(name, kind))
    }
}

impl SegmentationEngine for PlaceholderEngine {
    #[instrument(level = "debug", skip(self))]
    fn extract(
        &self,
        name: &str,
        source_volume: SceneId,
        start: PointId,
        end: PointId,
    ) -> Result<VesselSegment, String> {
        if !self.resources.is_present(source_volume) {
            return Err(format!("source volume {} is not in the scene", source_volume));
        }
        for point in [start, end] {
            if !self.resources.is_present(point.scene_id()) {
                return Err(format!("{} is not in the scene", point));
            }
        }

        let mut segment = VesselSegment::new(name);
        segment.set_extremities(start, end);
        segment.set_vesselness_volume(self.create(name, ArtifactKind::VesselnessVolume));
        segment.set_segmentation(
            self.create(name, ArtifactKind::SegmentationSeeds),
            self.create(name, ArtifactKind::SegmentedVolume),
            self.create(name, ArtifactKind::SegmentedModel),
        );
        segment.set_centerline(
            self.create(name, ArtifactKind::Centerline),
            self.create(name, ArtifactKind::VoronoiModel),
        );
        Ok(segment)
    }
}
