use std::path::{Component, Path};

use itertools::Itertools;

use crate::ScaffoldError;

// Default tables /////////////////////////////////////////////////////////////

pub const DEFAULT_BASE_MODELS: &[&str] = &[
    "Flux",
    "HiDream",
    "Hunyuan",
    "Illustrious",
    "LTXV",
    "Lumina",
    "Mochi",
    "NoobAI",
    "Pony",
    "SD1.5",
    "SD3.5",
    "SDXL",
    "Wan",
];

pub const DEFAULT_LORA_CATEGORIES: &[&str] = &[
    "Backgrounds",
    "Characters",
    "Clothing",
    "Concepts",
    "Effects",
    "Poses",
    "Styles",
    "Tools",
];

/// Base model types that get image-to-video / text-to-video subfolders.
pub const DEFAULT_VIDEO_MODELS: &[&str] = &["Hunyuan", "LTXV", "Mochi", "Wan"];

/// Catch-all folder created once under each root.
pub const UNSORTED_DIR: &str = "Unsorted";

pub fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

// Name checks ////////////////////////////////////////////////////////////////

/// Accepts only names that join onto a parent as exactly one new child directory.
pub fn validate_dir_name(label: &str, name: &str) -> Result<(), ScaffoldError> {
    let mut components = Path::new(name).components();
    let single_normal = match (components.next(), components.next()) {
        (Some(Component::Normal(part)), None) => part == name,
        _ => false,
    };
    if !single_normal || name.contains('\\') || name.trim() != name {
        return Err(ScaffoldError::InvalidName {
            label: label.to_string(),
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Checks every name and rejects repeats. Names are compared ignoring case, as lookups are.
pub fn validate_names(label: &str, names: &[String]) -> Result<(), ScaffoldError> {
    for (idx, name) in names.iter().enumerate() {
        validate_dir_name(label, name)?;
        if names[..idx].iter().any(|n| n.eq_ignore_ascii_case(name)) {
            return Err(ScaffoldError::DuplicateOption {
                label: label.to_string(),
                name: name.to_string(),
            });
        }
    }
    Ok(())
}

// Catalog ////////////////////////////////////////////////////////////////////

/// An ordered, non-empty set of canonical option names, each a valid directory name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    label: String,
    options: Vec<String>,
}

impl Catalog {
    pub fn new(label: impl Into<String>, options: Vec<String>) -> Result<Self, ScaffoldError> {
        let label = label.into();
        if options.is_empty() {
            return Err(ScaffoldError::EmptyCatalog(label));
        }
        validate_names(&label, &options)?;
        Ok(Self { label, options })
    }

    /// Builds a catalog from a user-supplied comma list.
    ///
    /// Names are trimmed, sorted and deduplicated ignoring case. Empty pieces are dropped, and
    /// names that would escape their parent directory are rejected.
    pub fn from_custom_list(label: impl Into<String>, raw: &str) -> Result<Self, ScaffoldError> {
        let options = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .sorted()
            .unique_by(|s| s.to_ascii_lowercase())
            .collect();
        Self::new(label, options)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Entry addressed by a menu letter, `a` being the first.
    pub fn by_letter(&self, letter: char) -> Option<&String> {
        let lower = letter.to_ascii_lowercase();
        if !lower.is_ascii_lowercase() {
            return None;
        }
        self.options.get((lower as u8 - b'a') as usize)
    }

    /// Case-insensitive exact name lookup, returning the canonical spelling.
    pub fn by_name(&self, name: &str) -> Option<&String> {
        self.options.iter().find(|o| o.eq_ignore_ascii_case(name))
    }

    /// Menu letter for an index, if the index is reachable by letter at all.
    pub fn letter_for(index: usize) -> Option<char> {
        (index < 26).then(|| (b'a' + index as u8) as char)
    }
}
