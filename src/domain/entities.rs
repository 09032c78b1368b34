//! Domain entities: scene identities and vessel artifacts

use std::fmt;

use generational_arena::Index;

/// Identity of an object living in the scene (a landmark or an artifact).
///
/// Equality is identity: two ids are equal only when they name the same
/// scene object. Ids are generational, so a disposed object's id never
/// aliases an object created later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SceneId(Index);

impl SceneId {
    pub fn index(self) -> Index {
        self.0
    }
}

impl From<Index> for SceneId {
    fn from(index: Index) -> Self {
        Self(index)
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (slot, generation) = self.0.into_raw_parts();
        write!(f, "#{}.{}", slot, generation)
    }
}

/// Landmark handle shared by reference across segments.
///
/// A point is the join key of the hierarchy: segment B hangs below segment A
/// when `B.start == A.end`. Coordinates play no part in that comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointId(SceneId);

impl PointId {
    pub fn new(id: SceneId) -> Self {
        Self(id)
    }

    pub fn scene_id(self) -> SceneId {
        self.0
    }
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "point{}", self.0)
    }
}

/// Kind of artifact a segment owns.
///
/// Declaration order is the order in which artifacts are released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArtifactKind {
    VesselnessVolume,
    SegmentationSeeds,
    SegmentedVolume,
    SegmentedModel,
    Centerline,
    VoronoiModel,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 6] = [
        ArtifactKind::VesselnessVolume,
        ArtifactKind::SegmentationSeeds,
        ArtifactKind::SegmentedVolume,
        ArtifactKind::SegmentedModel,
        ArtifactKind::Centerline,
        ArtifactKind::VoronoiModel,
    ];

    /// Suffix appended to the segment name to form the artifact's display name.
    pub fn suffix(self) -> &'static str {
        match self {
            ArtifactKind::VesselnessVolume => "Vesselness",
            ArtifactKind::SegmentationSeeds => "Seeds",
            ArtifactKind::SegmentedVolume => "SegmentedVolume",
            ArtifactKind::SegmentedModel => "SegmentedModel",
            ArtifactKind::Centerline => "Centerline",
            ArtifactKind::VoronoiModel => "VoronoiModel",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ArtifactKind::VesselnessVolume => "vesselness volume",
            ArtifactKind::SegmentationSeeds => "segmentation seeds",
            ArtifactKind::SegmentedVolume => "segmented volume",
            ArtifactKind::SegmentedModel => "segmented model",
            ArtifactKind::Centerline => "centerline",
            ArtifactKind::VoronoiModel => "voronoi model",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display name of an artifact of `kind` owned by a segment named `segment_name`.
///
/// Single source of the naming convention: used at attach time and at rename time.
pub fn artifact_name(segment_name: &str, kind: ArtifactKind) -> String {
    format!("{}{}", segment_name, kind.suffix())
}

/// Artifact exclusively owned by one segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub id: SceneId,
    pub kind: ArtifactKind,
    /// Derived display name, always `artifact_name(owner, kind)`
    pub name: String,
}

impl Artifact {
    pub(crate) fn owned_by(segment_name: &str, id: SceneId, kind: ArtifactKind) -> Self {
        Self {
            id,
            kind,
            name: artifact_name(segment_name, kind),
        }
    }

    pub(crate) fn rename_owner(&mut self, segment_name: &str) {
        self.name = artifact_name(segment_name, self.kind);
    }
}
