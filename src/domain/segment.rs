//! Vessel segment: one extracted vessel, its owned artifacts and its extremities

use std::collections::BTreeMap;

use tracing::{debug, instrument};

use crate::domain::entities::{Artifact, ArtifactKind, PointId, SceneId};

/// Default prefix for generated vessel names.
pub const DEFAULT_VESSEL_PREFIX: &str = "Vessel";

/// Generates `"<prefix><n>"` names, n starting at 1.
#[derive(Debug, Clone)]
pub struct VesselNameSequence {
    prefix: String,
    next: usize,
}

impl Default for VesselNameSequence {
    fn default() -> Self {
        Self::new(DEFAULT_VESSEL_PREFIX)
    }
}

impl VesselNameSequence {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The name `next()` will yield, without consuming it.
    pub fn peek(&self) -> String {
        format!("{}{}", self.prefix, self.next)
    }
}

impl Iterator for VesselNameSequence {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        let name = self.peek();
        self.next += 1;
        Some(name)
    }
}

/// One extracted vessel.
///
/// The segment exclusively owns its artifacts. The start and end points are
/// shared landmarks: they are never released by the segment and their names
/// are never touched by it.
///
/// Segments cannot be cloned, so an artifact is never released twice:
///
/// ```compile_fail
/// use rvessel::domain::VesselSegment;
///
/// let segment = VesselSegment::new("Vessel1");
/// let copy = segment.clone();
/// ```
#[derive(Debug, PartialEq, Eq)]
pub struct VesselSegment {
    name: String,
    start_point: Option<PointId>,
    end_point: Option<PointId>,
    artifacts: BTreeMap<ArtifactKind, Artifact>,
}

impl VesselSegment {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start_point: None,
            end_point: None,
            artifacts: BTreeMap::new(),
        }
    }

    /// Create a segment named `name`, or with the next generated name when `None`.
    pub fn create(name: Option<&str>, names: &mut VesselNameSequence) -> Self {
        match name {
            Some(name) => Self::new(name),
            None => {
                // the sequence is unbounded
                let generated = names
                    .next()
                    .unwrap_or_else(|| DEFAULT_VESSEL_PREFIX.to_string());
                Self::new(generated)
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start_point(&self) -> Option<PointId> {
        self.start_point
    }

    pub fn end_point(&self) -> Option<PointId> {
        self.end_point
    }

    pub fn has_extremities(&self) -> bool {
        self.start_point.is_some() && self.end_point.is_some()
    }

    /// Set both structural points. Placement in a hierarchy is decided on insertion.
    pub fn set_extremities(&mut self, start: PointId, end: PointId) {
        self.start_point = Some(start);
        self.end_point = Some(end);
    }

    pub fn set_start_point(&mut self, start: PointId) {
        self.start_point = Some(start);
    }

    pub fn set_end_point(&mut self, end: PointId) {
        self.end_point = Some(end);
    }

    /// Attach an owned artifact, named after this segment.
    ///
    /// Returns the artifact previously held for `kind`, which the caller now
    /// owns and must dispose. Re-attaching the same id replaces nothing.
    #[instrument(level = "trace", skip(self), fields(segment = %self.name))]
    pub fn attach(&mut self, kind: ArtifactKind, id: SceneId) -> Option<SceneId> {
        let artifact = Artifact::owned_by(&self.name, id, kind);
        self.artifacts
            .insert(kind, artifact)
            .map(|previous| previous.id)
            .filter(|&previous| previous != id)
    }

    pub fn set_vesselness_volume(&mut self, volume: SceneId) -> Option<SceneId> {
        self.attach(ArtifactKind::VesselnessVolume, volume)
    }

    /// Attach segmentation output. Returns the replaced handles.
    pub fn set_segmentation(
        &mut self,
        seeds: SceneId,
        volume: SceneId,
        model: SceneId,
    ) -> Vec<SceneId> {
        [
            self.attach(ArtifactKind::SegmentationSeeds, seeds),
            self.attach(ArtifactKind::SegmentedVolume, volume),
            self.attach(ArtifactKind::SegmentedModel, model),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Attach centerline extraction output. Returns the replaced handles.
    pub fn set_centerline(&mut self, centerline: SceneId, voronoi_model: SceneId) -> Vec<SceneId> {
        [
            self.attach(ArtifactKind::Centerline, centerline),
            self.attach(ArtifactKind::VoronoiModel, voronoi_model),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Rename the segment and every owned artifact. Endpoints keep their names.
    #[instrument(level = "debug", skip(self), fields(old = %self.name))]
    pub fn rename(&mut self, new_name: &str) {
        self.name = new_name.to_string();
        for artifact in self.artifacts.values_mut() {
            artifact.rename_owner(&self.name);
        }
    }

    /// Detach every owned artifact and return the handles to dispose.
    ///
    /// Start and end points are left in place. A second call returns nothing.
    #[instrument(level = "debug", skip(self), fields(segment = %self.name))]
    pub fn release(&mut self) -> Vec<SceneId> {
        let released: Vec<SceneId> = std::mem::take(&mut self.artifacts)
            .into_values()
            .map(|artifact| artifact.id)
            .collect();
        debug!("released {} artifacts", released.len());
        released
    }

    pub fn artifact(&self, kind: ArtifactKind) -> Option<&Artifact> {
        self.artifacts.get(&kind)
    }

    /// Owned artifacts in kind order.
    pub fn artifacts(&self) -> impl Iterator<Item = &Artifact> {
        self.artifacts.values()
    }

    pub fn vesselness_volume(&self) -> Option<SceneId> {
        self.artifact_id(ArtifactKind::VesselnessVolume)
    }

    pub fn segmentation_seeds(&self) -> Option<SceneId> {
        self.artifact_id(ArtifactKind::SegmentationSeeds)
    }

    pub fn segmented_volume(&self) -> Option<SceneId> {
        self.artifact_id(ArtifactKind::SegmentedVolume)
    }

    pub fn segmented_model(&self) -> Option<SceneId> {
        self.artifact_id(ArtifactKind::SegmentedModel)
    }

    pub fn segmented_centerline(&self) -> Option<SceneId> {
        self.artifact_id(ArtifactKind::Centerline)
    }

    pub fn segmented_voronoi_model(&self) -> Option<SceneId> {
        self.artifact_id(ArtifactKind::VoronoiModel)
    }

    fn artifact_id(&self, kind: ArtifactKind) -> Option<SceneId> {
        self.artifacts.get(&kind).map(|artifact| artifact.id)
    }
}
