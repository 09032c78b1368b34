//! Command dispatch

use std::io;
use std::path::Path;
use std::sync::Arc;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::session::{SessionOutcome, StepRecord};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::files::load_session;
use crate::tree_traits::TreeNodeConvert;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Run { session }) => run(session),
        Some(Commands::Tree { session }) => tree(session),
        Some(Commands::Leaves { session }) => leaves(session),
        Some(Commands::Config { command }) => match command {
            ConfigCommands::Show { dir } => config_show(dir.as_deref()),
            ConfigCommands::Path => config_path(),
        },
        Some(Commands::Completion { shell }) => completion(*shell),
        None => Err(CliError::Usage(
            "no command given, see `rvessel --help`".to_string(),
        )),
    }
}

fn replay(session_path: &Path) -> CliResult<SessionOutcome> {
    let session = load_session(session_path)?;
    let settings = Settings::load(session_path.parent())?;
    let container = ServiceContainer::new(settings);
    let outcome = session.replay(
        Arc::clone(&container.resources),
        Arc::clone(&container.engine),
        &container.settings,
    )?;
    Ok(outcome)
}

#[instrument]
fn run(session_path: &Path) -> CliResult<()> {
    let outcome = replay(session_path)?;

    output::header(&format!("Session {}", session_path.display()));
    for record in &outcome.records {
        match record {
            StepRecord::Extracted { vessel, parent } => output::step(
                "extracted",
                &format!("{} (parent: {})", vessel, parent.as_deref().unwrap_or("none")),
            ),
            StepRecord::Renamed { from, to } => {
                output::step("renamed", &format!("{} -> {}", from, to))
            }
            StepRecord::Deleted(report) => {
                output::removal("deleted", &report.vessels.iter().join(", "));
                output::detail(&format!("disposed {} artifact(s)", report.disposed.len()));
            }
        }
    }

    let resources = outcome.tree.resources();
    let kept = outcome
        .points
        .values()
        .filter(|point| resources.is_present(point.scene_id()))
        .count();
    debug!("{} of {} points still in the scene", kept, outcome.points.len());

    output::header("Tree");
    output::data(&outcome.tree.hierarchy().to_tree_string());
    output::detail(&format!(
        "{} vessel(s), {} landmark(s)",
        outcome.tree.hierarchy().len(),
        kept
    ));
    Ok(())
}

#[instrument]
fn tree(session_path: &Path) -> CliResult<()> {
    let outcome = replay(session_path)?;
    output::data(&outcome.tree.hierarchy().to_tree_string());
    Ok(())
}

#[instrument]
fn leaves(session_path: &Path) -> CliResult<()> {
    let outcome = replay(session_path)?;
    let leaves = outcome.tree.hierarchy().leaf_names();
    if leaves.is_empty() {
        output::warning("session leaves no vessels");
    }
    for leaf in &leaves {
        output::data(leaf);
    }
    Ok(())
}

fn config_show(dir: Option<&Path>) -> CliResult<()> {
    let dir = dir.unwrap_or_else(|| Path::new("."));
    let settings = Settings::load(Some(dir))?;
    output::data(&settings.to_toml()?);
    Ok(())
}

fn config_path() -> CliResult<()> {
    match global_config_path() {
        Some(path) => output::data(&format!("global: {}", path.display())),
        None => output::warning("no config directory on this platform"),
    }
    output::data(&format!(
        "local:  {}",
        local_config_path(Path::new(".")).display()
    ));
    Ok(())
}

fn completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
