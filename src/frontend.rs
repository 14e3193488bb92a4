use std::{
    collections::VecDeque,
    io::{BufRead, Write},
};

use anyhow::Context;
use colored::Colorize;

use crate::{Catalog, RunMode, SessionState};

// Action /////////////////////////////////////////////////////////////////////

/// A single user request, however it was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SelectModels(String),
    SelectCategories(String),
    CustomCategories(String),
    ToggleMode,
    Preview,
    Execute,
    Quit,
}

// Frontend ///////////////////////////////////////////////////////////////////

/// Where actions come from and where output goes.
pub trait Frontend {
    /// Shows the current selections. May do nothing.
    fn render(&mut self, state: &SessionState) -> anyhow::Result<()>;

    fn read_action(&mut self) -> anyhow::Result<Action>;

    /// Asks a yes/no question. Anything but yes is a no.
    fn confirm(&mut self, question: &str) -> anyhow::Result<bool>;

    fn print(&mut self, text: &str) -> anyhow::Result<()>;

    fn warn(&mut self, text: &str) -> anyhow::Result<()> {
        self.print(&format!("{} {}", "warning:".yellow().bold(), text))
    }

    /// Interactive frontends can re-prompt after a bad selection.
    fn can_retry(&self) -> bool;
}

fn read_trimmed_line(input: &mut impl BufRead) -> anyhow::Result<Option<String>> {
    let mut line = String::new();
    let read = input.read_line(&mut line).context("reading input")?;
    Ok((read > 0).then(|| line.trim().to_string()))
}

fn is_yes(answer: &str) -> bool {
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}

// FlagFrontend ///////////////////////////////////////////////////////////////

/// Replays the selections given on the command line, then executes once.
pub struct FlagFrontend<R, W> {
    actions: VecDeque<Action>,
    assume_yes: bool,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> FlagFrontend<R, W> {
    pub fn new(
        models: Option<&str>,
        categories: Option<&str>,
        assume_yes: bool,
        input: R,
        output: W,
    ) -> Self {
        let actions = [
            Action::SelectModels(models.unwrap_or_default().to_string()),
            Action::SelectCategories(categories.unwrap_or_default().to_string()),
            Action::Execute,
        ]
        .into();

        Self {
            actions,
            assume_yes,
            input,
            output,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Frontend for FlagFrontend<R, W> {
    fn render(&mut self, _state: &SessionState) -> anyhow::Result<()> {
        Ok(())
    }

    fn read_action(&mut self) -> anyhow::Result<Action> {
        Ok(self.actions.pop_front().unwrap_or(Action::Quit))
    }

    fn confirm(&mut self, question: &str) -> anyhow::Result<bool> {
        if self.assume_yes {
            return Ok(true);
        }
        write!(self.output, "{} ", format!("{question} [y/N]:").magenta())?;
        self.output.flush()?;
        Ok(read_trimmed_line(&mut self.input)?.is_some_and(|a| is_yes(&a)))
    }

    fn print(&mut self, text: &str) -> anyhow::Result<()> {
        writeln!(self.output, "{text}").context("writing output")
    }

    fn can_retry(&self) -> bool {
        false
    }
}

// InteractiveFrontend ////////////////////////////////////////////////////////

/// Line-oriented menu. End of input is treated as quit.
pub struct InteractiveFrontend<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> InteractiveFrontend<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn prompt(&mut self, text: &str) -> anyhow::Result<Option<String>> {
        write!(self.output, "{} ", text.cyan().bold())?;
        self.output.flush()?;
        read_trimmed_line(&mut self.input)
    }

    fn render_catalog(&mut self, catalog: &Catalog, selected: &[String]) -> anyhow::Result<()> {
        for (idx, option) in catalog.options().iter().enumerate() {
            let letter = Catalog::letter_for(idx).unwrap_or(' ');
            let line = format!("  {letter}) {option}");
            if selected.contains(option) {
                writeln!(self.output, "{} {}", line.green(), "*".green().bold())?;
            } else {
                writeln!(self.output, "{line}")?;
            }
        }
        Ok(())
    }
}

impl<R: BufRead, W: Write> Frontend for InteractiveFrontend<R, W> {
    fn render(&mut self, state: &SessionState) -> anyhow::Result<()> {
        let mode = match state.mode {
            RunMode::DryRun => "dry run".yellow(),
            RunMode::Live => "live".red().bold(),
        };
        writeln!(self.output)?;
        writeln!(self.output, "{} ({mode})", "Model directory setup".bold())?;

        writeln!(self.output, "{}", "Base model types:".bold())?;
        self.render_catalog(&state.model_catalog, &state.models)?;

        writeln!(self.output, "{}", "LoRA categories:".bold())?;
        self.render_catalog(&state.category_catalog, &state.categories)?;

        writeln!(
            self.output,
            "[m] models  [k] categories  [u] custom categories  [d] toggle dry run  \
             [p] preview  [x] execute  [q] quit"
        )?;
        Ok(())
    }

    fn read_action(&mut self) -> anyhow::Result<Action> {
        loop {
            let Some(choice) = self.prompt("Action:")? else {
                return Ok(Action::Quit);
            };

            let action = match choice.to_ascii_lowercase().as_str() {
                "m" => Action::SelectModels(
                    self.prompt("Models (letters, names or all):")?.unwrap_or_default(),
                ),
                "k" => Action::SelectCategories(
                    self.prompt("Categories (letters, names or all):")?.unwrap_or_default(),
                ),
                "u" => Action::CustomCategories(
                    self.prompt("Custom categories (comma separated):")?.unwrap_or_default(),
                ),
                "d" => Action::ToggleMode,
                "p" => Action::Preview,
                "x" | "execute" => Action::Execute,
                "q" | "quit" => Action::Quit,
                other => {
                    self.warn(&format!("unknown action {other:?}"))?;
                    continue;
                }
            };
            return Ok(action);
        }
    }

    fn confirm(&mut self, question: &str) -> anyhow::Result<bool> {
        let answer = self.prompt(&format!("{question} [y/N]:"))?;
        Ok(answer.is_some_and(|a| is_yes(&a)))
    }

    fn print(&mut self, text: &str) -> anyhow::Result<()> {
        writeln!(self.output, "{text}").context("writing output")
    }

    fn can_retry(&self) -> bool {
        true
    }
}
