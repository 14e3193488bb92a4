use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::{Catalog, SelectionError};

/// Token that selects the whole catalog. Matched case-sensitively.
pub const SELECT_ALL: &str = "all";

static SELECTION_FORMAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z,\s]*$").expect("selection format regex is valid")
});

/// Outcome of resolving one selection string against a catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Canonical entries, in the order they were first accepted.
    pub selected: Vec<String>,
    /// Raw pieces that matched neither a letter nor a name.
    pub invalid: Vec<String>,
    /// Raw pieces that resolved to an entry already accepted.
    pub duplicates: Vec<String>,
}

impl Resolution {
    pub fn has_warnings(&self) -> bool {
        !self.invalid.is_empty() || !self.duplicates.is_empty()
    }

    /// All problems of this resolution, one line per kind.
    pub fn warnings(&self) -> Vec<String> {
        let mut lines = vec![];
        if !self.invalid.is_empty() {
            lines.push(format!("Ignored invalid entries: {}", self.invalid.join(", ")));
        }
        if !self.duplicates.is_empty() {
            lines.push(format!(
                "Ignored duplicate entries: {}",
                self.duplicates.join(", ")
            ));
        }
        lines
    }
}

/// Resolves a selection string such as `"a, c, Flux"` or `"all"` against `catalog`.
///
/// Single letters index into the catalog (`a` is the first entry) and take precedence over
/// names, so a one-letter catalog name can only be reached through its letter. Any other
/// piece is matched by name, ignoring case. Unknown and repeated pieces are collected in the
/// returned `Resolution` instead of failing the call.
pub fn resolve(raw: &str, catalog: &Catalog) -> Result<Resolution, SelectionError> {
    let input = raw.trim();

    if input == SELECT_ALL {
        return Ok(Resolution {
            selected: catalog.options().to_vec(),
            ..Resolution::default()
        });
    }

    if !SELECTION_FORMAT.is_match(input) {
        return Err(SelectionError::Format {
            input: raw.to_string(),
        });
    }

    let mut resolution = Resolution::default();

    for piece in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let Some(entry) = lookup(piece, catalog) else {
            push_once(&mut resolution.invalid, piece);
            continue;
        };

        if resolution.selected.iter().any(|s| s == entry) {
            push_once(&mut resolution.duplicates, piece);
        } else {
            resolution.selected.push(entry.clone());
        }
    }

    debug!(
        catalog = catalog.label(),
        selected = ?resolution.selected,
        invalid = ?resolution.invalid,
        duplicates = ?resolution.duplicates,
        "resolved selection"
    );

    Ok(resolution)
}

/// Reported entries are sets, so `z, Z` is listed once.
fn push_once(list: &mut Vec<String>, piece: &str) {
    if !list.iter().any(|p| p.eq_ignore_ascii_case(piece)) {
        list.push(piece.to_string());
    }
}

fn lookup<'a>(piece: &str, catalog: &'a Catalog) -> Option<&'a String> {
    let mut chars = piece.chars();
    if let (Some(letter), None) = (chars.next(), chars.next()) {
        if let Some(entry) = catalog.by_letter(letter) {
            return Some(entry);
        }
    }
    catalog.by_name(piece)
}
