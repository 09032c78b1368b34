//! Tests for ExtractionService: selection handling and point advance

use std::sync::Arc;

use rstest::{fixture, rstest};

use rvessel::application::services::{ExtractionService, VesselTreeService};
use rvessel::application::ApplicationError;
use rvessel::config::Settings;
use rvessel::domain::{DomainError, PointId, SceneId, VesselSegment};
use rvessel::infrastructure::traits::{
    InMemoryScene, PlaceholderEngine, ResourceManager, SegmentationEngine,
};
use rvessel::util::testing;

struct Harness {
    scene: Arc<InMemoryScene>,
    tree: VesselTreeService,
    engine: Arc<dyn SegmentationEngine>,
    volume: SceneId,
}

impl Harness {
    fn point(&self, name: &str) -> PointId {
        self.scene.create_point(name, [0.0, 0.0, 0.0])
    }

    fn service(&self, settings: &Settings) -> ExtractionService {
        let mut service = ExtractionService::new(Arc::clone(&self.engine), settings);
        service.select_source_volume(Some(self.volume));
        service
    }
}

#[fixture]
fn harness() -> Harness {
    testing::init_test_setup();
    let scene = Arc::new(InMemoryScene::new());
    let resources: Arc<dyn ResourceManager> = scene.clone();
    let volume = scene.create_volume("CTA");
    Harness {
        engine: Arc::new(PlaceholderEngine::new(Arc::clone(&resources))),
        tree: VesselTreeService::new(resources),
        scene,
        volume,
    }
}

/// Engine that always fails, to check nothing reaches the tree.
struct FailingEngine;

impl SegmentationEngine for FailingEngine {
    fn extract(
        &self,
        _name: &str,
        _source_volume: SceneId,
        _start: PointId,
        _end: PointId,
    ) -> Result<VesselSegment, String> {
        Err("no vessel found".to_string())
    }
}

#[rstest]
fn given_consecutive_extractions_when_reusing_end_point_then_vessels_chain(mut harness: Harness) {
    let (p0, p1, p2) = (harness.point("p0"), harness.point("p1"), harness.point("p2"));
    let mut service = harness.service(&Settings::default());

    service.select_start(Some(p0));
    service.select_end(Some(p1));
    let first = service.extract(&mut harness.tree, None).unwrap();

    assert_eq!(service.selection().start, Some(p1));
    assert_eq!(service.selection().end, None);
    assert!(!service.can_extract());

    service.select_end(Some(p2));
    let second = service.extract(&mut harness.tree, None).unwrap();

    let hierarchy = harness.tree.hierarchy();
    assert_eq!(hierarchy.parent(second), Some(first));
    assert_eq!(hierarchy.segment(first).map(|s| s.name()), Some("Vessel1"));
    assert_eq!(hierarchy.segment(second).map(|s| s.name()), Some("Vessel2"));
}

#[rstest]
fn given_custom_prefix_and_no_advance_when_extracting_then_selection_kept(mut harness: Harness) {
    let (p0, p1) = (harness.point("p0"), harness.point("p1"));
    let settings = Settings {
        vessel_prefix: "Branch".to_string(),
        advance_start_point: false,
    };
    let mut service = harness.service(&settings);
    service.select_start(Some(p0));
    service.select_end(Some(p1));

    let handle = service.extract(&mut harness.tree, None).unwrap();

    assert_eq!(service.selection().start, Some(p0));
    assert_eq!(service.selection().end, Some(p1));
    let name = harness.tree.hierarchy().segment(handle).map(|s| s.name().to_string());
    assert_eq!(name.as_deref(), Some("Branch1"));
}

#[rstest]
#[case::no_volume(false, true, true, "source volume")]
#[case::no_start(true, false, true, "start point")]
#[case::no_end(true, true, false, "end point")]
fn given_incomplete_selection_when_extracting_then_errors(
    mut harness: Harness,
    #[case] volume: bool,
    #[case] start: bool,
    #[case] end: bool,
    #[case] expected: &str,
) {
    let (p0, p1) = (harness.point("p0"), harness.point("p1"));
    let mut service = harness.service(&Settings::default());
    if !volume {
        service.select_source_volume(None);
    }
    service.select_start(start.then_some(p0));
    service.select_end(end.then_some(p1));

    let result = service.extract(&mut harness.tree, Some("x"));

    match result {
        Err(ApplicationError::IncompleteSelection { missing }) => assert_eq!(missing, expected),
        other => panic!("expected IncompleteSelection, got {:?}", other),
    }
    assert!(harness.tree.hierarchy().is_empty());
}

#[rstest]
fn given_failing_engine_when_extracting_then_error_and_selection_unchanged(mut harness: Harness) {
    let (p0, p1) = (harness.point("p0"), harness.point("p1"));
    let mut service = ExtractionService::new(Arc::new(FailingEngine), &Settings::default());
    service.select_source_volume(Some(harness.volume));
    service.select_start(Some(p0));
    service.select_end(Some(p1));

    let result = service.extract(&mut harness.tree, None);

    assert!(matches!(result, Err(ApplicationError::Extraction { .. })));
    assert_eq!(service.selection().end, Some(p1));
    assert!(harness.tree.hierarchy().is_empty());
}

#[rstest]
fn given_rejected_loop_extraction_when_extracting_again_then_generated_name_not_skipped(
    mut harness: Harness,
) {
    let (p0, p1) = (harness.point("p0"), harness.point("p1"));
    let mut service = harness.service(&Settings::default());
    service.select_start(Some(p0));
    service.select_end(Some(p0));

    let rejected = service.extract(&mut harness.tree, None);

    assert!(matches!(
        rejected,
        Err(ApplicationError::Domain(DomainError::CycleDetected { .. }))
    ));
    assert_eq!(service.selection().start, Some(p0));

    service.select_end(Some(p1));
    let handle = service.extract(&mut harness.tree, None).unwrap();

    let name = harness.tree.hierarchy().segment(handle).map(|s| s.name().to_string());
    assert_eq!(name.as_deref(), Some("Vessel1"));
}

#[rstest]
fn given_engine_failure_when_extracting_again_then_generated_name_not_skipped(
    mut harness: Harness,
) {
    let (p0, p1, gone) = (harness.point("p0"), harness.point("p1"), harness.point("gone"));
    harness.scene.dispose(&[gone.scene_id()]);
    let mut service = harness.service(&Settings::default());
    service.select_start(Some(p0));
    service.select_end(Some(gone));
    assert!(matches!(
        service.extract(&mut harness.tree, None),
        Err(ApplicationError::Extraction { .. })
    ));

    // explicit names leave the sequence alone
    service.select_end(Some(p1));
    service.extract(&mut harness.tree, Some("LM")).unwrap();
    service.select_end(Some(harness.point("p2")));
    let handle = service.extract(&mut harness.tree, None).unwrap();

    let name = harness.tree.hierarchy().segment(handle).map(|s| s.name().to_string());
    assert_eq!(name.as_deref(), Some("Vessel1"));
}

#[rstest]
fn given_disposed_end_point_when_extracting_then_engine_refuses(mut harness: Harness) {
    let (p0, p1) = (harness.point("p0"), harness.point("p1"));
    harness.scene.dispose(&[p1.scene_id()]);
    let mut service = harness.service(&Settings::default());
    service.select_start(Some(p0));
    service.select_end(Some(p1));

    let result = service.extract(&mut harness.tree, None);

    assert!(matches!(result, Err(ApplicationError::Extraction { .. })));
}
