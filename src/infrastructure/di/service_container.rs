//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{ExtractionService, VesselTreeService};
use crate::config::Settings;
use crate::infrastructure::traits::{
    InMemoryScene, PlaceholderEngine, ResourceManager, SegmentationEngine,
};

/// Container holding the collaborators shared by all services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Scene holding points, volumes and artifacts
    pub resources: Arc<dyn ResourceManager>,

    /// Vessel segmentation engine
    pub engine: Arc<dyn SegmentationEngine>,
}

impl ServiceContainer {
    /// Create a container over an in-memory scene and the placeholder engine.
    pub fn new(settings: Settings) -> Self {
        let resources: Arc<dyn ResourceManager> = Arc::new(InMemoryScene::new());
        let engine = Arc::new(PlaceholderEngine::new(Arc::clone(&resources)));
        Self::with_deps(settings, resources, engine)
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        resources: Arc<dyn ResourceManager>,
        engine: Arc<dyn SegmentationEngine>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            resources,
            engine,
        }
    }

    pub fn tree_service(&self) -> VesselTreeService {
        VesselTreeService::new(Arc::clone(&self.resources))
    }

    pub fn extraction_service(&self) -> ExtractionService {
        ExtractionService::new(Arc::clone(&self.engine), &self.settings)
    }
}
