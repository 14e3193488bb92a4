use std::{
    env::VarError,
    fs,
    path::{Component, Path, PathBuf},
};

use anyhow::Context;
use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use shellexpand::LookupError;
use smart_default::SmartDefault;
use tracing::debug;

use crate::{
    args::Args,
    catalog::{self, Catalog},
    PlanRoots, Ruleset, RulesetPreset, RunMode, ScaffoldError,
};

// Config /////////////////////////////////////////////////////////////////////

// Note: Deserialization impl is further down

#[derive(SmartDefault, Debug, Clone, Serialize)]
pub struct Config {
    pub layout: Layout,
    pub catalogs: Catalogs,
    pub ruleset: Ruleset,

    /// Installation root. Filled from `Args`, never read from the file.
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(skip)]
    pub mode: RunMode,
}

impl Config {
    /// Reads the config file named by `args` (or defaults), then applies the CLI overrides.
    ///
    /// A missing file is only tolerated at the default location.
    pub fn create(args: &Args) -> anyhow::Result<Self> {
        let mut config = match &args.config_path {
            Some(path) => Self::from_file(path)?,
            None => match Args::default_config_path() {
                Some(path) if path.try_exists().unwrap_or(false) => Self::from_file(&path)?,
                path => {
                    debug!(?path, "no config file, using defaults");
                    Self::default()
                }
            },
        };

        config.root = match &args.root {
            Some(root) => root.shell_expand().context("expanding root path")?,
            None => std::env::current_dir().context("getting current directory")?,
        };

        if let Some(preset) = args.ruleset {
            config.ruleset.video_subfolders = preset.video_subfolders();
            config.ruleset.nest_loras_under_video = preset.nest_loras_under_video();
        }

        if let Some(raw) = &args.custom_categories {
            config.catalogs.lora_categories = Catalog::from_custom_list(LORA_LABEL, raw)
                .context("parsing custom categories")?
                .options()
                .to_vec();
        }

        config.mode = if args.live {
            RunMode::Live
        } else {
            RunMode::DryRun
        };

        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading config file: {:?}", path))?;
        serde_yml::from_str(&contents).with_context(|| format!("parsing config file: {:?}", path))
    }

    /// Rejects any layout or name that could put a planned path outside its root.
    pub fn validate(&self) -> Result<(), ScaffoldError> {
        self.layout.validate()?;
        Catalog::new(MODEL_LABEL, self.catalogs.base_models.clone())?;
        Catalog::new(LORA_LABEL, self.catalogs.lora_categories.clone())?;
        self.ruleset.validate()
    }

    pub fn roots(&self) -> PlanRoots {
        let models = self.root.join(&self.layout.models_dir);
        PlanRoots {
            checkpoints: models.join(&self.layout.checkpoints_dir),
            loras: models.join(&self.layout.loras_dir),
        }
    }

    pub fn model_catalog(&self) -> anyhow::Result<Catalog> {
        Ok(Catalog::new(MODEL_LABEL, self.catalogs.base_models.clone())?)
    }

    pub fn category_catalog(&self) -> anyhow::Result<Catalog> {
        Ok(Catalog::new(LORA_LABEL, self.catalogs.lora_categories.clone())?)
    }
}

pub const MODEL_LABEL: &str = "model type";
pub const LORA_LABEL: &str = "LoRA category";

// Layout /////////////////////////////////////////////////////////////////////

#[derive(SmartDefault, Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Layout {
    #[default("models")]
    pub models_dir: String,

    #[default("checkpoints")]
    pub checkpoints_dir: String,

    #[default("loras")]
    pub loras_dir: String,
}

impl Layout {
    /// `models_dir` may span several components, the two roots are single names below it.
    pub fn validate(&self) -> Result<(), ScaffoldError> {
        let models_dir = Path::new(&self.models_dir);
        let relative = models_dir
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if self.models_dir.is_empty() || self.models_dir.contains('\\') || !relative {
            return Err(ScaffoldError::InvalidLayout(format!(
                "models_dir {:?} must be a relative path without \"..\"",
                self.models_dir
            )));
        }

        catalog::validate_dir_name("checkpoints_dir", &self.checkpoints_dir)?;
        catalog::validate_dir_name("loras_dir", &self.loras_dir)?;
        if self.checkpoints_dir.eq_ignore_ascii_case(&self.loras_dir) {
            return Err(ScaffoldError::InvalidLayout(format!(
                "checkpoints_dir and loras_dir are both {:?}",
                self.loras_dir
            )));
        }
        Ok(())
    }
}

// Catalogs ///////////////////////////////////////////////////////////////////

#[derive(SmartDefault, Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Catalogs {
    #[default(catalog::to_strings(catalog::DEFAULT_BASE_MODELS))]
    pub base_models: Vec<String>,

    #[default(catalog::to_strings(catalog::DEFAULT_LORA_CATEGORIES))]
    pub lora_categories: Vec<String>,
}

// Config - Deserialization ///////////////////////////////////////////////////

#[derive(SmartDefault, Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawConfig {
    pub layout: Layout,
    pub catalogs: Catalogs,
    pub ruleset: RawRuleset,
}

/// Video models plus a preset with optional per-field overrides.
#[derive(SmartDefault, Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawRuleset {
    pub preset: RulesetPreset,

    #[default(catalog::to_strings(catalog::DEFAULT_VIDEO_MODELS))]
    pub video_models: Vec<String>,

    pub video_subfolders: Option<Vec<String>>,
    pub nest_loras_under_video: Option<bool>,
}

macro_rules! unwrap_raw_setting_or_preset {
    ($raw:ident, $field:ident) => {{
        $raw.$field.clone().unwrap_or_else(|| $raw.preset.$field())
    }};
}

impl<'de> Deserialize<'de> for Config {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw_config = RawConfig::deserialize(deserializer)?;
        let raw_ruleset = &raw_config.ruleset;

        let ruleset = Ruleset {
            video_models: raw_ruleset.video_models.clone(),
            video_subfolders: unwrap_raw_setting_or_preset!(raw_ruleset, video_subfolders),
            nest_loras_under_video: unwrap_raw_setting_or_preset!(
                raw_ruleset,
                nest_loras_under_video
            ),
        };

        let config = Config {
            layout: raw_config.layout,
            catalogs: raw_config.catalogs,
            ruleset,
            ..Config::default()
        };
        config.validate().map_err(D::Error::custom)?;
        Ok(config)
    }
}

// Shell expansions ///////////////////////////////////////////////////////////

/// Trait Extension for PathBuf for shell expansions.
pub trait PathBufExpand {
    fn shell_expand(&self) -> Result<PathBuf, LookupError<VarError>>;
}

impl PathBufExpand for PathBuf {
    fn shell_expand(&self) -> Result<PathBuf, LookupError<VarError>> {
        self.to_str()
            .map(|s| -> Result<PathBuf, _> {
                Ok(PathBuf::from(shellexpand::full(s)?.into_owned()))
            })
            .unwrap_or_else(|| Ok(self.clone()))
    }
}
