use std::path::{Path, PathBuf};

// fs helpers /////////////////////////////////////////////////////////////////

/// Longest path shared by every input, component-wise. Empty if nothing is shared.
pub fn common_ancestor(paths: &[&Path]) -> PathBuf {
    let Some((first, rest)) = paths.split_first() else {
        return PathBuf::new();
    };

    let mut ancestor = first.to_path_buf();
    for path in rest {
        while !path.starts_with(&ancestor) {
            if !ancestor.pop() {
                return PathBuf::new();
            }
        }
    }
    ancestor
}

/// Last component of a path as an owned display string.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// logger addons //////////////////////////////////////////////////////////////

/// Creates and enters a new Tracing span.
#[macro_export]
macro_rules! enter_span {
    ($level:ident, $($args:expr),+) => {
        tracing::span!(tracing::Level::$level, $($args),+).entered()
    };
}
