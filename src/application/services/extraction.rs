//! Vessel extraction service
//!
//! Drives the segmentation engine from the current point selection and files
//! each extracted vessel into the tree.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::services::VesselTreeService;
use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::{NodeHandle, PointId, SceneId, VesselNameSequence};
use crate::infrastructure::traits::SegmentationEngine;

/// Current extraction inputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub source_volume: Option<SceneId>,
    pub start: Option<PointId>,
    pub end: Option<PointId>,
}

/// Service for extracting vessels one at a time.
pub struct ExtractionService {
    engine: Arc<dyn SegmentationEngine>,
    names: VesselNameSequence,
    advance_start_point: bool,
    selection: Selection,
}

impl ExtractionService {
    pub fn new(engine: Arc<dyn SegmentationEngine>, settings: &Settings) -> Self {
        Self {
            engine,
            names: VesselNameSequence::new(settings.vessel_prefix.clone()),
            advance_start_point: settings.advance_start_point,
            selection: Selection::default(),
        }
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn select_source_volume(&mut self, volume: Option<SceneId>) {
        self.selection.source_volume = volume;
    }

    pub fn select_start(&mut self, point: Option<PointId>) {
        self.selection.start = point;
    }

    pub fn select_end(&mut self, point: Option<PointId>) {
        self.selection.end = point;
    }

    /// True when volume, start and end are all selected.
    pub fn can_extract(&self) -> bool {
        self.required().is_ok()
    }

    /// Extract a vessel from the current selection and add it to `tree`.
    ///
    /// Without `name`, the next generated name is used. On success the end
    /// point becomes the next start point and the end selection is cleared,
    /// unless disabled in the settings.
    #[instrument(level = "debug", skip(self, tree))]
    pub fn extract(
        &mut self,
        tree: &mut VesselTreeService,
        name: Option<&str>,
    ) -> ApplicationResult<NodeHandle> {
        let (volume, start, end) = self.required()?;
        // a generated name is only taken once the vessel is in the tree
        let generated = name.is_none();
        let name = match name {
            Some(name) => name.to_string(),
            None => self.names.peek(),
        };

        let segment = self
            .engine
            .extract(&name, volume, start, end)
            .map_err(|message| ApplicationError::Extraction { message })?;
        let handle = tree.add_vessel(segment)?;
        if generated {
            self.names.next();
        }

        if self.advance_start_point {
            self.selection.start = Some(end);
            self.selection.end = None;
            debug!("next start point: {}", end);
        }
        Ok(handle)
    }

    fn required(&self) -> ApplicationResult<(SceneId, PointId, PointId)> {
        let missing = |what: &'static str| ApplicationError::IncompleteSelection { missing: what };
        let volume = self
            .selection
            .source_volume
            .ok_or_else(|| missing("source volume"))?;
        let start = self.selection.start.ok_or_else(|| missing("start point"))?;
        let end = self.selection.end.ok_or_else(|| missing("end point"))?;
        Ok((volume, start, end))
    }
}
