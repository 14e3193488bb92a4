#![allow(dead_code)]

use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use itertools::Itertools;
use modeldirs::{Catalog, Config, PlanRoots};
use tempfile::TempDir;
use tracing::debug;
use walkdir::WalkDir;

pub fn create_test_env() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let test_path = temp_dir.path().to_path_buf();
    (temp_dir, test_path)
}

/// A temp install root with `models/checkpoints` and `models/loras` already present.
pub fn create_install_env() -> (TempDir, PathBuf, PlanRoots) {
    let (temp_dir, root) = create_test_env();
    let roots = PlanRoots {
        checkpoints: root.join("models").join("checkpoints"),
        loras: root.join("models").join("loras"),
    };
    fs::create_dir_all(&roots.checkpoints).expect("failed to create checkpoint root");
    fs::create_dir_all(&roots.loras).expect("failed to create lora root");
    (temp_dir, root, roots)
}

pub fn test_config(root: &Path) -> Config {
    Config {
        root: root.to_path_buf(),
        ..Config::default()
    }
}

pub fn catalog(label: &str, options: &[&str]) -> Catalog {
    Catalog::new(label, options.iter().map(|s| s.to_string()).collect())
        .expect("failed to create catalog")
}

pub fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

#[macro_export]
macro_rules! let_paths {
    (base = $base_dir:expr, $(( $var:ident, $file:expr $(, create = $create:tt)? )),+ $(,)?) => {
        $(
            let $var = $base_dir.join($file);
            $(
                match $create {
                    "file" => create_files!(&$var),
                    "dir" => create_dirs!(&$var),
                    _ => panic!("Invalid create type: {}", $create),
                }
            )?
        )+
    };
}

#[macro_export]
macro_rules! create_dirs {
    ($($dir:expr),+) => {{
        $(
            fs::create_dir_all($dir.clone()).expect("failed to create dirs");
        )+
    }};
}

#[macro_export]
macro_rules! create_files {
    ($($file:expr),+) => {{
        $(
            fs::File::create($file.clone()).expect("failed to create files");
        )+
    }};
}

pub fn collect_tree(root: &Path) -> HashSet<PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .map(|e| {
            e.unwrap()
                .path()
                .strip_prefix(root)
                .expect("failed to strip prefix")
                .to_path_buf()
        })
        .filter(|p| !p.as_os_str().is_empty())
        .collect::<HashSet<PathBuf>>()
}

pub fn create_exp_tree(paths: Vec<&str>) -> HashSet<PathBuf> {
    paths.iter().map(|&s| PathBuf::from(s)).collect()
}

pub fn sort_hashset(set: &HashSet<PathBuf>) -> Vec<&PathBuf> {
    set.iter().sorted_by(|a, b| a.cmp(b)).collect::<Vec<_>>()
}

pub fn assert_cur_and_exp_trees_eq(root: &Path, paths: Vec<&str>) {
    let tree = collect_tree(root);
    debug!("Sorted hashset real: {:?}", sort_hashset(&tree));

    let expected_tree = create_exp_tree(paths);
    debug!("Sorted hashset expe: {:?}", sort_hashset(&expected_tree));

    assert_eq!(sort_hashset(&tree), sort_hashset(&expected_tree));
}
