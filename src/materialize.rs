use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{enter_span, DirectoryPlan, PlanRoots, ScaffoldError};

/// Whether confirmed plans touch the filesystem.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunMode {
    #[default]
    DryRun,
    Live,
}

impl RunMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::DryRun => Self::Live,
            Self::Live => Self::DryRun,
        }
    }

    pub fn is_live(self) -> bool {
        matches!(self, Self::Live)
    }
}

/// What happened (or would happen, in a dry run) to each planned directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterializeReport {
    pub mode: RunMode,
    /// Directories created, or that would be created in a dry run.
    pub created: Vec<PathBuf>,
    pub existing: Vec<PathBuf>,
}

/// Fails if either root is missing. Must pass before a plan is built.
pub fn ensure_roots_exist(roots: &PlanRoots) -> anyhow::Result<()> {
    for (label, path) in [("checkpoint", &roots.checkpoints), ("LoRA", &roots.loras)] {
        let exists = path
            .try_exists()
            .with_context(|| format!("checking root: {:?}", path))?;
        if !exists || !path.is_dir() {
            return Err(ScaffoldError::MissingRoot {
                label,
                path: path.clone(),
            }
            .into());
        }
        debug!(?path, "root found");
    }
    Ok(())
}

/// Ensures every directory in the plan exists.
///
/// Existing directories are left alone, so running the same plan again changes nothing.
/// In `RunMode::DryRun` nothing is created and the report lists what a live run would do.
pub fn materialize(plan: &DirectoryPlan, mode: RunMode) -> anyhow::Result<MaterializeReport> {
    let _span = enter_span!(DEBUG, "materialize");

    let mut report = MaterializeReport {
        mode,
        ..MaterializeReport::default()
    };

    for dir_path in plan.iter() {
        if dir_path
            .try_exists()
            .with_context(|| format!("checking dir: {:?}", dir_path))?
        {
            debug!(?dir_path, "already exists");
            report.existing.push(dir_path.to_path_buf());
        } else {
            if mode.is_live() {
                create_dir(dir_path)?;
            }
            report.created.push(dir_path.to_path_buf());
        }
    }

    Ok(report)
}

fn create_dir(dir_path: &Path) -> anyhow::Result<()> {
    info!(?dir_path, "creating directory and parents");
    fs::create_dir_all(dir_path).with_context(|| format!("creating dir: {:?}", dir_path))
}
