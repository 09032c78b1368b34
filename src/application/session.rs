//! Session scripts
//!
//! A session names the landmarks of a study and lists the tree edits made on
//! them, in order. Replaying it drives the extraction and tree services exactly
//! as interactive use would.
//!
//! ```toml
//! volume = "CTACardio"
//!
//! [[points]]
//! name = "ostium"
//! position = [176.9, -17.4, 52.7]
//!
//! [[steps]]
//! action = "extract"
//! start = "ostium"
//! end = "bifurcation"
//! name = "trunk"
//!
//! [[steps]]
//! action = "delete"
//! vessel = "trunk"
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::application::services::{DeletionReport, ExtractionService, VesselTreeService};
use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::{NodeHandle, PointId};
use crate::infrastructure::traits::{ResourceManager, SegmentationEngine};

fn default_volume() -> String {
    "source".to_string()
}

/// Named landmark.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PointSpec {
    pub name: String,
    #[serde(default)]
    pub position: [f64; 3],
}

/// One edit of the vessel tree.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Extract between two points. Without `start`, the current start
    /// selection is used (the previous vessel's end point by default).
    Extract {
        #[serde(default)]
        start: Option<String>,
        end: String,
        #[serde(default)]
        name: Option<String>,
    },
    Rename {
        vessel: String,
        to: String,
    },
    Delete {
        vessel: String,
    },
}

/// Parsed session script.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Session {
    /// Name of the source volume
    #[serde(default = "default_volume")]
    pub volume: String,
    #[serde(default)]
    pub points: Vec<PointSpec>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// Outcome of one replayed step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepRecord {
    Extracted {
        vessel: String,
        parent: Option<String>,
    },
    Renamed {
        from: String,
        to: String,
    },
    Deleted(DeletionReport),
}

/// State after a replay.
pub struct SessionOutcome {
    pub tree: VesselTreeService,
    pub points: BTreeMap<String, PointId>,
    pub records: Vec<StepRecord>,
}

impl Session {
    /// Parse session TOML. `path` is only used in error messages.
    pub fn parse(content: &str, path: &Path) -> ApplicationResult<Self> {
        let session: Session = toml::from_str(content).map_err(|e| ApplicationError::Session {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let mut seen = BTreeMap::new();
        for point in &session.points {
            if seen.insert(point.name.as_str(), ()).is_some() {
                return Err(ApplicationError::Session {
                    path: path.to_path_buf(),
                    message: format!("point '{}' declared twice", point.name),
                });
            }
        }
        Ok(session)
    }

    /// Create the session's volume and points in `resources`, then run every step.
    #[instrument(level = "debug", skip_all, fields(steps = self.steps.len()))]
    pub fn replay(
        &self,
        resources: Arc<dyn ResourceManager>,
        engine: Arc<dyn SegmentationEngine>,
        settings: &Settings,
    ) -> ApplicationResult<SessionOutcome> {
        let volume = resources.create_volume(&self.volume);
        let points: BTreeMap<String, PointId> = self
            .points
            .iter()
            .map(|p| (p.name.clone(), resources.create_point(&p.name, p.position)))
            .collect();

        let mut tree = VesselTreeService::new(resources);
        let mut extraction = ExtractionService::new(engine, settings);
        extraction.select_source_volume(Some(volume));

        let mut records = Vec::with_capacity(self.steps.len());
        for step in &self.steps {
            debug!("step: {:?}", step);
            let record = match step {
                Step::Extract { start, end, name } => {
                    if let Some(start) = start {
                        extraction.select_start(Some(lookup_point(&points, start)?));
                    }
                    extraction.select_end(Some(lookup_point(&points, end)?));
                    let handle = extraction.extract(&mut tree, name.as_deref())?;
                    let hierarchy = tree.hierarchy();
                    StepRecord::Extracted {
                        vessel: vessel_name(&tree, handle),
                        parent: hierarchy.parent(handle).map(|p| vessel_name(&tree, p)),
                    }
                }
                Step::Rename { vessel, to } => {
                    let handle = lookup_vessel(&tree, vessel)?;
                    tree.rename(handle, to);
                    StepRecord::Renamed {
                        from: vessel.clone(),
                        to: to.clone(),
                    }
                }
                Step::Delete { vessel } => {
                    let handle = lookup_vessel(&tree, vessel)?;
                    let report = tree
                        .delete(handle)
                        .ok_or_else(|| ApplicationError::UnknownVessel(vessel.clone()))?;
                    StepRecord::Deleted(report)
                }
            };
            records.push(record);
        }

        Ok(SessionOutcome {
            tree,
            points,
            records,
        })
    }
}

fn lookup_point(points: &BTreeMap<String, PointId>, name: &str) -> ApplicationResult<PointId> {
    points
        .get(name)
        .copied()
        .ok_or_else(|| ApplicationError::UnknownPoint(name.to_string()))
}

fn lookup_vessel(tree: &VesselTreeService, name: &str) -> ApplicationResult<NodeHandle> {
    tree.hierarchy()
        .find_by_name(name)
        .ok_or_else(|| ApplicationError::UnknownVessel(name.to_string()))
}

fn vessel_name(tree: &VesselTreeService, handle: NodeHandle) -> String {
    tree.hierarchy()
        .segment(handle)
        .map(|segment| segment.name().to_string())
        .unwrap_or_default()
}
