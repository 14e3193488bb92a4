use std::path::{Path, PathBuf};

use clap::ValueEnum;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;

use crate::{
    catalog::{validate_names, UNSORTED_DIR},
    utils::common_ancestor,
    ScaffoldError,
};

// Ruleset ////////////////////////////////////////////////////////////////////

/// Named layout variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum RulesetPreset {
    /// `I2V` and `T2V` under each video model.
    #[default]
    Standard,
    /// `I2V`, `T2V` and `Combination` under each video model.
    Combination,
    /// Like `standard`, but LoRA categories of video models go under each video subfolder.
    Nested,
}

impl RulesetPreset {
    pub fn video_subfolders(self) -> Vec<String> {
        match self {
            Self::Standard | Self::Nested => vec!["I2V".into(), "T2V".into()],
            Self::Combination => vec!["I2V".into(), "T2V".into(), "Combination".into()],
        }
    }

    pub fn nest_loras_under_video(self) -> bool {
        matches!(self, Self::Nested)
    }
}

/// Structural rules applied while expanding selections into paths.
#[derive(SmartDefault, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ruleset {
    #[default(crate::catalog::to_strings(crate::catalog::DEFAULT_VIDEO_MODELS))]
    pub video_models: Vec<String>,

    #[default(RulesetPreset::Standard.video_subfolders())]
    pub video_subfolders: Vec<String>,

    #[default(false)]
    pub nest_loras_under_video: bool,
}

impl Ruleset {
    /// An empty `video_models` list is fine, it just means no video subfolders.
    pub fn validate(&self) -> Result<(), ScaffoldError> {
        validate_names("video model", &self.video_models)?;
        validate_names("video subfolder", &self.video_subfolders)
    }

    pub fn is_video_model(&self, model: &str) -> bool {
        self.video_models.iter().any(|m| m.eq_ignore_ascii_case(model))
    }
}

// Roots //////////////////////////////////////////////////////////////////////

/// The two directories every planned path lives under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanRoots {
    pub checkpoints: PathBuf,
    pub loras: PathBuf,
}

impl PlanRoots {
    /// Deepest directory containing both roots, used to anchor the preview.
    pub fn anchor(&self) -> PathBuf {
        common_ancestor(&[self.checkpoints.as_path(), self.loras.as_path()])
    }
}

// Plan ///////////////////////////////////////////////////////////////////////

/// Ordered, duplicate-free list of directories to ensure exist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryPlan {
    paths: Vec<PathBuf>,
}

impl DirectoryPlan {
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().map(PathBuf::as_path)
    }
}

/// Expands the selected model types and LoRA categories into every directory to create.
///
/// Checkpoint directories come first, followed by `Unsorted`, then the LoRA directories and
/// their own `Unsorted`. Category order follows `categories` as resolved.
pub fn build_plan(
    roots: &PlanRoots,
    models: &[String],
    categories: &[String],
    ruleset: &Ruleset,
) -> DirectoryPlan {
    let mut paths = vec![];

    for model in models {
        let model_dir = roots.checkpoints.join(model);
        paths.push(model_dir.clone());
        if ruleset.is_video_model(model) {
            paths.extend(ruleset.video_subfolders.iter().map(|v| model_dir.join(v)));
        }
    }
    paths.push(roots.checkpoints.join(UNSORTED_DIR));

    for model in models {
        let model_dir = roots.loras.join(model);
        paths.push(model_dir.clone());

        if ruleset.nest_loras_under_video && ruleset.is_video_model(model) {
            for variant in &ruleset.video_subfolders {
                let variant_dir = model_dir.join(variant);
                paths.push(variant_dir.clone());
                paths.extend(categories.iter().map(|c| variant_dir.join(c)));
            }
        } else {
            paths.extend(categories.iter().map(|c| model_dir.join(c)));
        }
    }
    paths.push(roots.loras.join(UNSORTED_DIR));

    DirectoryPlan {
        paths: paths.into_iter().unique().collect(),
    }
}
