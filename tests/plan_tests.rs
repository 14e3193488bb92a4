mod common;

use std::{fs, path::PathBuf};

use common::{assert_cur_and_exp_trees_eq, create_install_env, create_test_env, strings};
use modeldirs::{
    build_plan, ensure_roots_exist, materialize, resolve, DirectoryPlan, Logger, PathTree,
    PlanRoots, Ruleset, RulesetPreset, RunMode, ScaffoldError,
};

fn fake_roots() -> PlanRoots {
    PlanRoots {
        checkpoints: PathBuf::from("/install/models/checkpoints"),
        loras: PathBuf::from("/install/models/loras"),
    }
}

fn ruleset(preset: RulesetPreset, video_models: &[&str]) -> Ruleset {
    Ruleset {
        video_models: strings(video_models),
        video_subfolders: preset.video_subfolders(),
        nest_loras_under_video: preset.nest_loras_under_video(),
    }
}

fn relative(plan: &DirectoryPlan) -> Vec<String> {
    plan.iter()
        .map(|p| {
            p.strip_prefix("/install/models")
                .expect("plan path outside models dir")
                .display()
                .to_string()
        })
        .collect()
}

#[test]
fn letters_plan_without_video_models() {
    let catalog = common::catalog("model type", &["Flux", "Hunyuan", "Illustrious"]);
    let models = resolve("a,c", &catalog).unwrap().selected;
    assert_eq!(models, strings(&["Flux", "Illustrious"]));

    let plan = build_plan(
        &fake_roots(),
        &models,
        &[],
        &ruleset(RulesetPreset::Standard, &["Hunyuan"]),
    );
    let checkpoints: Vec<_> = relative(&plan)
        .into_iter()
        .filter(|p| p.starts_with("checkpoints"))
        .collect();
    assert_eq!(
        checkpoints,
        strings(&[
            "checkpoints/Flux",
            "checkpoints/Illustrious",
            "checkpoints/Unsorted"
        ])
    );
}

#[test]
fn all_models_cross_categories() {
    let catalog = common::catalog("model type", &["Flux", "Hunyuan", "Illustrious"]);
    let models = resolve("all", &catalog).unwrap().selected;
    let categories = strings(&["Characters", "Styles"]);

    let plan = build_plan(
        &fake_roots(),
        &models,
        &categories,
        &ruleset(RulesetPreset::Standard, &["Hunyuan"]),
    );

    assert_eq!(
        relative(&plan),
        strings(&[
            "checkpoints/Flux",
            "checkpoints/Hunyuan",
            "checkpoints/Hunyuan/I2V",
            "checkpoints/Hunyuan/T2V",
            "checkpoints/Illustrious",
            "checkpoints/Unsorted",
            "loras/Flux",
            "loras/Flux/Characters",
            "loras/Flux/Styles",
            "loras/Hunyuan",
            "loras/Hunyuan/Characters",
            "loras/Hunyuan/Styles",
            "loras/Illustrious",
            "loras/Illustrious/Characters",
            "loras/Illustrious/Styles",
            "loras/Unsorted",
        ])
    );
}

#[test]
fn combination_preset_adds_third_video_folder() {
    let plan = build_plan(
        &fake_roots(),
        &strings(&["Wan"]),
        &strings(&["Styles"]),
        &ruleset(RulesetPreset::Combination, &["Wan"]),
    );
    assert_eq!(
        relative(&plan),
        strings(&[
            "checkpoints/Wan",
            "checkpoints/Wan/I2V",
            "checkpoints/Wan/T2V",
            "checkpoints/Wan/Combination",
            "checkpoints/Unsorted",
            "loras/Wan",
            "loras/Wan/Styles",
            "loras/Unsorted",
        ])
    );
}

#[test]
fn nested_preset_puts_categories_under_video_folders() {
    let plan = build_plan(
        &fake_roots(),
        &strings(&["Flux", "Wan"]),
        &strings(&["Styles", "Poses"]),
        &ruleset(RulesetPreset::Nested, &["wan"]),
    );
    assert_eq!(
        relative(&plan),
        strings(&[
            "checkpoints/Flux",
            "checkpoints/Wan",
            "checkpoints/Wan/I2V",
            "checkpoints/Wan/T2V",
            "checkpoints/Unsorted",
            "loras/Flux",
            "loras/Flux/Styles",
            "loras/Flux/Poses",
            "loras/Wan",
            "loras/Wan/I2V",
            "loras/Wan/I2V/Styles",
            "loras/Wan/I2V/Poses",
            "loras/Wan/T2V",
            "loras/Wan/T2V/Styles",
            "loras/Wan/T2V/Poses",
            "loras/Unsorted",
        ])
    );
}

#[test]
fn plan_is_deterministic_and_duplicate_free() {
    let roots = fake_roots();
    let models = strings(&["Flux", "Unsorted", "Flux"]);
    let categories = strings(&["Styles"]);
    let rules = Ruleset::default();

    let first = build_plan(&roots, &models, &categories, &rules);
    let second = build_plan(&roots, &models, &categories, &rules);
    assert_eq!(first, second);

    // "Unsorted" as a model collides with the catch-all folder
    assert_eq!(
        relative(&first),
        strings(&[
            "checkpoints/Flux",
            "checkpoints/Unsorted",
            "loras/Flux",
            "loras/Flux/Styles",
            "loras/Unsorted",
            "loras/Unsorted/Styles",
        ])
    );
    assert!(first
        .iter()
        .all(|p| p.starts_with(&roots.checkpoints) ^ p.starts_with(&roots.loras)));
}

#[test]
fn preview_tree_is_sorted_and_anchored_at_models() {
    let roots = fake_roots();
    let plan = build_plan(
        &roots,
        &strings(&["SDXL", "Flux"]),
        &strings(&["Styles"]),
        &Ruleset::default(),
    );
    let before = plan.clone();

    let tree = PathTree::new(&roots.anchor(), plan.iter());
    assert_eq!(tree.label, "models");
    assert_eq!(tree.len(), 10);
    assert_eq!(
        tree.to_string(),
        "\
models
├── checkpoints
│   ├── Flux
│   ├── SDXL
│   └── Unsorted
└── loras
    ├── Flux
    │   └── Styles
    ├── SDXL
    │   └── Styles
    └── Unsorted
"
    );
    assert_eq!(plan, before);
}

#[test]
fn missing_roots_are_fatal() {
    let (_tmp, root) = create_test_env();
    let roots = PlanRoots {
        checkpoints: root.join("models").join("checkpoints"),
        loras: root.join("models").join("loras"),
    };

    let err = ensure_roots_exist(&roots).unwrap_err();
    assert_eq!(
        err.downcast_ref::<ScaffoldError>(),
        Some(&ScaffoldError::MissingRoot {
            label: "checkpoint",
            path: roots.checkpoints.clone(),
        })
    );

    fs::create_dir_all(&roots.checkpoints).unwrap();
    let err = ensure_roots_exist(&roots).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ScaffoldError>(),
        Some(ScaffoldError::MissingRoot { label, .. }) if *label == "LoRA"
    ));

    fs::create_dir_all(&roots.loras).unwrap();
    ensure_roots_exist(&roots).unwrap();

    // nothing besides the roots themselves was created
    assert_cur_and_exp_trees_eq(&root, vec!["models", "models/checkpoints", "models/loras"]);
}

#[test]
fn dry_run_touches_nothing() {
    let (_tmp, root, roots) = create_install_env();
    let plan = build_plan(
        &roots,
        &strings(&["Flux"]),
        &strings(&["Styles"]),
        &Ruleset::default(),
    );

    let report = materialize(&plan, RunMode::DryRun).unwrap();
    assert_eq!(report.created, plan.paths());
    assert!(report.existing.is_empty());
    assert_cur_and_exp_trees_eq(&root, vec!["models", "models/checkpoints", "models/loras"]);
}

#[test]
fn materialize_is_idempotent() {
    let (_tmp, root, roots) = create_install_env();
    let plan = build_plan(
        &roots,
        &strings(&["Flux", "Wan"]),
        &strings(&["Styles"]),
        &Ruleset::default(),
    );
    let expected = vec![
        "models",
        "models/checkpoints",
        "models/checkpoints/Flux",
        "models/checkpoints/Wan",
        "models/checkpoints/Wan/I2V",
        "models/checkpoints/Wan/T2V",
        "models/checkpoints/Unsorted",
        "models/loras",
        "models/loras/Flux",
        "models/loras/Flux/Styles",
        "models/loras/Wan",
        "models/loras/Wan/Styles",
        "models/loras/Unsorted",
    ];

    let first = materialize(&plan, RunMode::Live).unwrap();
    assert_eq!(first.created.len(), plan.len());
    assert!(first.existing.is_empty());
    assert_cur_and_exp_trees_eq(&root, expected.clone());

    let logger = Logger::capture();
    let second = materialize(&plan, RunMode::Live).unwrap();
    assert!(second.created.is_empty());
    assert_eq!(second.existing, plan.paths());
    assert_cur_and_exp_trees_eq(&root, expected);

    let messages = logger.messages();
    assert_eq!(
        messages
            .iter()
            .filter(|m| m.starts_with("already exists"))
            .count(),
        plan.len()
    );
    assert!(!messages.iter().any(|m| m.starts_with("creating directory")));
}

#[test]
fn materialize_keeps_existing_content() {
    let (_tmp, root, roots) = create_install_env();
    let_paths!(
        base = roots.checkpoints,
        (flux_dir, "Flux", create = "dir"),
        (flux_model, "Flux/model.safetensors", create = "file"),
    );

    let plan = build_plan(&roots, &strings(&["Flux"]), &strings(&["Styles"]), &Ruleset::default());
    let report = materialize(&plan, RunMode::Live).unwrap();
    assert_eq!(report.existing, vec![flux_dir]);
    assert!(flux_model.exists());

    assert_cur_and_exp_trees_eq(
        &root,
        vec![
            "models",
            "models/checkpoints",
            "models/checkpoints/Flux",
            "models/checkpoints/Flux/model.safetensors",
            "models/checkpoints/Unsorted",
            "models/loras",
            "models/loras/Flux",
            "models/loras/Flux/Styles",
            "models/loras/Unsorted",
        ],
    );
}
