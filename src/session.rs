use anyhow::Context;
use colored::Colorize;
use tracing::{info, warn};

use crate::{
    build_plan,
    config::{Config, LORA_LABEL},
    ensure_roots_exist, materialize, resolve, Action, Catalog, DirectoryPlan, Frontend,
    MaterializeReport, PathTree, Ruleset, RunMode, ScaffoldError, SelectionError,
};

// SessionState ///////////////////////////////////////////////////////////////

/// Everything a frontend needs to draw the menu. Lives for one run only.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub model_catalog: Catalog,
    pub category_catalog: Catalog,
    pub models: Vec<String>,
    pub categories: Vec<String>,
    pub mode: RunMode,
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Completed(MaterializeReport),
    Declined,
    Quit,
}

// Session ////////////////////////////////////////////////////////////////////

/// Drives a `Frontend` through select, preview, confirm and create.
pub struct Session<'a> {
    config: &'a Config,
    ruleset: Ruleset,
    state: SessionState,
}

impl<'a> Session<'a> {
    pub fn new(config: &'a Config) -> anyhow::Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ruleset: config.ruleset.clone(),
            state: SessionState {
                model_catalog: config.model_catalog()?,
                category_catalog: config.category_catalog()?,
                models: vec![],
                categories: vec![],
                mode: config.mode,
            },
        })
    }

    pub fn run(&mut self, frontend: &mut impl Frontend) -> anyhow::Result<Outcome> {
        loop {
            frontend.render(&self.state)?;

            match frontend.read_action()? {
                Action::SelectModels(raw) => {
                    if let Some(selected) = select(frontend, &raw, &self.state.model_catalog)? {
                        self.state.models = selected;
                    }
                }
                Action::SelectCategories(raw) => {
                    if let Some(selected) = select(frontend, &raw, &self.state.category_catalog)? {
                        self.state.categories = selected;
                    }
                }
                Action::CustomCategories(raw) => {
                    match Catalog::from_custom_list(LORA_LABEL, &raw) {
                        Ok(catalog) => {
                            info!(options = ?catalog.options(), "using custom categories");
                            self.state.category_catalog = catalog;
                            self.state.categories.clear();
                        }
                        Err(e) if frontend.can_retry() => frontend.warn(&e.to_string())?,
                        Err(e) => return Err(e).context("setting custom categories"),
                    }
                }
                Action::ToggleMode => self.state.mode = self.state.mode.toggled(),
                Action::Preview => {
                    if let Some(plan) = self.plan(frontend)? {
                        self.preview(frontend, &plan)?;
                    }
                }
                Action::Execute => {
                    if let Some(plan) = self.plan(frontend)? {
                        return self.execute(frontend, &plan);
                    }
                }
                Action::Quit => return Ok(Outcome::Quit),
            }
        }
    }

    /// Checks roots and selections, then builds the plan.
    ///
    /// Returns `None` when an empty selection was reported to a frontend that can retry.
    fn plan(&self, frontend: &mut impl Frontend) -> anyhow::Result<Option<DirectoryPlan>> {
        let roots = self.config.roots();
        ensure_roots_exist(&roots)?;

        for (catalog, selected) in [
            (&self.state.model_catalog, &self.state.models),
            (&self.state.category_catalog, &self.state.categories),
        ] {
            if selected.is_empty() {
                let err = ScaffoldError::EmptySelection(catalog.label().to_string());
                if frontend.can_retry() {
                    frontend.warn(&err.to_string())?;
                    return Ok(None);
                }
                return Err(err.into());
            }
        }

        Ok(Some(build_plan(
            &roots,
            &self.state.models,
            &self.state.categories,
            &self.ruleset,
        )))
    }

    fn preview(&self, frontend: &mut impl Frontend, plan: &DirectoryPlan) -> anyhow::Result<()> {
        let tree = PathTree::new(&self.config.roots().anchor(), plan.iter());
        frontend.print(&format!("{}", "Planned directories:".bold()))?;
        frontend.print(tree.to_string().trim_end())
    }

    fn execute(
        &self,
        frontend: &mut impl Frontend,
        plan: &DirectoryPlan,
    ) -> anyhow::Result<Outcome> {
        self.preview(frontend, plan)?;

        let mode = self.state.mode;
        let question = match mode {
            RunMode::Live => format!("Create {} directories?", plan.len()),
            RunMode::DryRun => format!("Check {} directories (dry run)?", plan.len()),
        };
        if !frontend.confirm(&question)? {
            frontend.print("Aborted, nothing was changed.")?;
            return Ok(Outcome::Declined);
        }

        let report = materialize(plan, mode)?;
        for path in &report.existing {
            frontend.print(&format!("{} {}", "already exists:".dimmed(), path.display()))?;
        }
        for path in &report.created {
            let label = if mode.is_live() {
                "created:".green()
            } else {
                "would create:".yellow()
            };
            frontend.print(&format!("{label} {}", path.display()))?;
        }

        if mode.is_live() {
            info!(
                created = report.created.len(),
                existing = report.existing.len(),
                "done"
            );
            frontend.print(&format!(
                "Created {} directories, {} already existed.",
                report.created.len(),
                report.existing.len()
            ))?;
        } else {
            frontend.print(&format!(
                "Dry run: {} directories would be created, nothing was changed.",
                report.created.len()
            ))?;
        }

        Ok(Outcome::Completed(report))
    }
}

/// Resolves `raw` and reports its warnings once.
///
/// A format error is returned to frontends that cannot retry; otherwise it is shown and `None`
/// leaves the previous selection untouched.
fn select(
    frontend: &mut impl Frontend,
    raw: &str,
    catalog: &Catalog,
) -> anyhow::Result<Option<Vec<String>>> {
    match resolve(raw, catalog) {
        Ok(resolution) => {
            if resolution.has_warnings() {
                let lines = resolution.warnings();
                warn!(catalog = catalog.label(), "{}", lines.join("; "));
                for line in lines {
                    frontend.warn(&line)?;
                }
            }
            Ok(Some(resolution.selected))
        }
        Err(e @ SelectionError::Format { .. }) => {
            if frontend.can_retry() {
                frontend.warn(&e.to_string())?;
                Ok(None)
            } else {
                Err(e).with_context(|| format!("selecting {}", catalog.label()))
            }
        }
    }
}
