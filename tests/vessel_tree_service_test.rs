//! Tests for VesselTreeService: scene disposal and name syncing

use std::sync::Arc;

use rstest::{fixture, rstest};

use rvessel::application::services::{RowAction, VesselTreeService};
use rvessel::application::ApplicationError;
use rvessel::domain::{DomainError, PointId, SceneId, VesselSegment};
use rvessel::infrastructure::traits::{
    InMemoryScene, PlaceholderEngine, ResourceManager, SegmentationEngine,
};
use rvessel::util::testing::{self, present_names};

struct Harness {
    scene: Arc<InMemoryScene>,
    engine: PlaceholderEngine,
    tree: VesselTreeService,
    volume: SceneId,
}

impl Harness {
    fn point(&self, name: &str) -> PointId {
        self.scene.create_point(name, [0.0, 0.0, 0.0])
    }

    fn extract(&self, name: &str, start: PointId, end: PointId) -> VesselSegment {
        self.engine.extract(name, self.volume, start, end).unwrap()
    }
}

#[fixture]
fn harness() -> Harness {
    testing::init_test_setup();
    let scene = Arc::new(InMemoryScene::new());
    let resources: Arc<dyn ResourceManager> = scene.clone();
    let volume = scene.create_volume("CTA");
    Harness {
        engine: PlaceholderEngine::new(Arc::clone(&resources)),
        tree: VesselTreeService::new(resources),
        scene,
        volume,
    }
}

fn owned(segment: &VesselSegment) -> Vec<SceneId> {
    segment.artifacts().map(|a| a.id).collect()
}

#[rstest]
fn given_vessel_when_deleted_then_artifacts_gone_and_points_remain(mut harness: Harness) {
    let (p1, p2) = (harness.point("p1"), harness.point("p2"));
    let segment = harness.extract("Vessel1", p1, p2);
    let artifacts = owned(&segment);
    let handle = harness.tree.add_vessel(segment).unwrap();

    let report = harness.tree.delete(handle).unwrap();

    assert!(harness.scene.is_present(p1.scene_id()));
    assert!(harness.scene.is_present(p2.scene_id()));
    assert!(harness.scene.is_present(harness.volume));
    assert!(artifacts.iter().all(|&id| !harness.scene.is_present(id)));
    assert_eq!(report.vessels, vec!["Vessel1"]);
    assert_eq!(report.disposed.len(), artifacts.len());
}

#[rstest]
fn given_parent_with_child_when_parent_deleted_then_child_artifacts_disposed(mut harness: Harness) {
    let (p1, p2, p3) = (harness.point("p1"), harness.point("p2"), harness.point("p3"));
    let parent = harness.extract("trunk", p1, p2);
    let child = harness.extract("branch", p2, p3);
    let child_artifacts = owned(&child);
    let parent_handle = harness.tree.add_vessel(parent).unwrap();
    let child_handle = harness.tree.add_vessel(child).unwrap();

    let report = harness.tree.delete(parent_handle).unwrap();

    assert_eq!(report.vessels, vec!["trunk", "branch"]);
    assert!(!harness.tree.hierarchy().contains(child_handle));
    assert!(present_names(&harness.scene, &child_artifacts).is_empty());
    assert!(harness.scene.is_present(p3.scene_id()));
}

#[rstest]
fn given_vessel_when_renamed_then_scene_names_follow(mut harness: Harness) {
    let (p1, p2) = (harness.point("p1"), harness.point("p2"));
    let segment = harness.extract("Vessel1", p1, p2);
    let artifacts = owned(&segment);
    let handle = harness.tree.add_vessel(segment).unwrap();

    assert!(harness.tree.rename(handle, "LAD"));

    let names = present_names(&harness.scene, &artifacts);
    assert_eq!(names.len(), artifacts.len());
    assert!(names.iter().all(|n| n.starts_with("LAD")), "{names:?}");
    assert_eq!(harness.scene.name(p1.scene_id()).as_deref(), Some("p1"));
}

#[rstest]
fn given_closing_segment_when_added_then_rejected_and_artifacts_disposed(mut harness: Harness) {
    let (p1, p2) = (harness.point("p1"), harness.point("p2"));
    let first = harness.extract("there", p1, p2);
    harness.tree.add_vessel(first).unwrap();
    let back = harness.extract("back", p2, p1);
    let back_artifacts = owned(&back);

    let result = harness.tree.add_vessel(back);

    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::CycleDetected { .. }))
    ));
    assert!(present_names(&harness.scene, &back_artifacts).is_empty());
    assert_eq!(harness.tree.hierarchy().len(), 1);
}

#[rstest]
fn given_row_actions_when_triggered_then_applied_and_stale_is_noop(mut harness: Harness) {
    let (p1, p2) = (harness.point("p1"), harness.point("p2"));
    let segment = harness.extract("Vessel1", p1, p2);
    let handle = harness.tree.add_vessel(segment).unwrap();

    assert!(harness
        .tree
        .trigger(handle, RowAction::Rename("Aorta".to_string())));
    assert_eq!(harness.tree.hierarchy().find_by_name("Aorta"), Some(handle));

    assert!(harness.tree.trigger(handle, RowAction::Delete));
    assert!(!harness.tree.trigger(handle, RowAction::Delete));
    assert!(!harness
        .tree
        .trigger(handle, RowAction::Rename("ghost".to_string())));
    assert!(harness.tree.hierarchy().is_empty());
}
