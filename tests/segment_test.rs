//! Tests for VesselSegment artifact ownership and naming

use rstest::rstest;

use rvessel::domain::{artifact_name, ArtifactKind, SceneId, VesselSegment};
use rvessel::infrastructure::traits::{InMemoryScene, ResourceManager};

fn populated(scene: &InMemoryScene, name: &str) -> VesselSegment {
    let create = |kind| scene.create_artifact(kind, &artifact_name(name, kind));
    let mut segment = VesselSegment::new(name);
    segment.set_extremities(
        scene.create_point("start", [0.0, 0.0, 0.0]),
        scene.create_point("end", [0.0, 0.0, 10.0]),
    );
    segment.set_vesselness_volume(create(ArtifactKind::VesselnessVolume));
    segment.set_segmentation(
        create(ArtifactKind::SegmentationSeeds),
        create(ArtifactKind::SegmentedVolume),
        create(ArtifactKind::SegmentedModel),
    );
    segment.set_centerline(
        create(ArtifactKind::Centerline),
        create(ArtifactKind::VoronoiModel),
    );
    segment
}

#[rstest]
#[case("LAD")]
#[case("Vessel 12")]
#[case("")]
fn given_populated_segment_when_renamed_then_every_artifact_carries_new_name(#[case] name: &str) {
    let scene = InMemoryScene::new();
    let mut segment = populated(&scene, "Vessel1");

    segment.rename(name);

    assert_eq!(segment.name(), name);
    assert_eq!(segment.artifacts().count(), ArtifactKind::ALL.len());
    for artifact in segment.artifacts() {
        assert!(artifact.name.contains(name), "{}", artifact.name);
        assert_eq!(artifact.name, artifact_name(name, artifact.kind));
    }
}

#[test]
fn given_rename_when_checking_extremities_then_points_are_untouched() {
    let scene = InMemoryScene::new();
    let mut segment = populated(&scene, "Vessel1");
    let (start, end) = (segment.start_point(), segment.end_point());

    segment.rename("LCX");

    assert_eq!(segment.start_point(), start);
    assert_eq!(segment.end_point(), end);
    let start_name = start.and_then(|p| scene.name(p.scene_id()));
    assert_eq!(start_name.as_deref(), Some("start"));
}

#[test]
fn given_released_segment_when_releasing_again_then_nothing_returned() {
    let scene = InMemoryScene::new();
    let mut segment = populated(&scene, "Vessel1");

    let first = segment.release();
    let second = segment.release();

    assert_eq!(first.len(), ArtifactKind::ALL.len());
    assert!(second.is_empty());
    assert_eq!(segment.vesselness_volume(), None);
    assert!(segment.has_extremities());
}

#[test]
fn given_release_when_inspecting_handles_then_points_are_excluded() {
    let scene = InMemoryScene::new();
    let mut segment = populated(&scene, "Vessel1");
    let points: Vec<SceneId> = [segment.start_point(), segment.end_point()]
        .into_iter()
        .flatten()
        .map(|p| p.scene_id())
        .collect();

    let released = segment.release();

    assert!(points.iter().all(|p| !released.contains(p)));
}

#[test]
fn given_existing_centerline_when_replaced_then_old_handles_returned() {
    let scene = InMemoryScene::new();
    let mut segment = populated(&scene, "Vessel1");
    let old_centerline = segment.segmented_centerline();
    let old_voronoi = segment.segmented_voronoi_model();

    let new_centerline = scene.create_artifact(ArtifactKind::Centerline, "c");
    let new_voronoi = scene.create_artifact(ArtifactKind::VoronoiModel, "v");
    let replaced = segment.set_centerline(new_centerline, new_voronoi);

    let expected: Vec<SceneId> = [old_centerline, old_voronoi].into_iter().flatten().collect();
    assert_eq!(replaced, expected);
    assert_eq!(segment.segmented_centerline(), Some(new_centerline));
    let artifact = segment.artifact(ArtifactKind::Centerline).unwrap();
    assert_eq!(artifact.name, "Vessel1Centerline");
}
