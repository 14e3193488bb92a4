use clap::{ArgAction, Parser};
use smart_default::SmartDefault;
use std::{env, ffi::OsString, path::PathBuf};

use crate::RulesetPreset;

#[derive(Debug, Parser, SmartDefault)]
#[command(author, version, about)]
pub struct Args {
    /// Path to config file [default: $XDG_CONFIG_HOME/modeldirs/config.yml]
    #[arg(short, long = "config")]
    pub config_path: Option<PathBuf>,

    /// Installation root containing the models directory [default: current directory]
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Base model types: letters, names, or "all" (e.g. "a,c" or "Flux, SDXL")
    #[arg(short, long)]
    pub models: Option<String>,

    /// LoRA categories: letters, names, or "all"
    #[arg(short = 'k', long)]
    pub categories: Option<String>,

    /// Comma list replacing the LoRA category catalog
    #[arg(long)]
    pub custom_categories: Option<String>,

    /// Directory layout variant
    #[arg(long, value_enum)]
    pub ruleset: Option<RulesetPreset>,

    /// Create directories after confirmation instead of only previewing them
    #[arg(long, visible_alias = "execute")]
    pub live: bool,

    /// Answer yes to the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Increase log verbosity
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// The interactive menu runs unless a selection was passed on the command line.
    pub fn is_interactive(&self) -> bool {
        self.models.is_none() && self.categories.is_none()
    }

    pub fn default_config_path() -> Option<PathBuf> {
        Self::config_path_from(env::var_os("XDG_CONFIG_HOME"), env::var_os("HOME"))
    }

    /// `None` when neither variable holds an absolute path. Relative values are ignored.
    pub fn config_path_from(
        xdg_config_home: Option<OsString>,
        home: Option<OsString>,
    ) -> Option<PathBuf> {
        let config_dir = xdg_config_home
            .map(PathBuf::from)
            .filter(|p| p.is_absolute())
            .or_else(|| {
                home.map(PathBuf::from)
                    .filter(|p| p.is_absolute())
                    .map(|p| p.join(".config"))
            })?;

        Some(config_dir.join("modeldirs").join("config.yml"))
    }
}
