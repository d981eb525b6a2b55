use std::io::{self, Write};
use std::path::{Path, PathBuf};

use pathtree::ext::BestEffortPathExt;
use pathtree::{PathError, PathNode, PathTree, RemoveMode};
use snafu::Snafu;
use snafu::prelude::*;
use tracing::{debug, warn};

use crate::application::RuntimeConfig;
use crate::application::render::{node_listing, node_summary};
use crate::cli::Command;

pub struct Application;

impl Application {
    pub fn run(config: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let stdout = io::stdout();
        Self::run_with_output(config, &mut stdout.lock())
    }

    pub fn run_with_output(
        config: impl Into<RuntimeConfig>,
        out: &mut impl Write,
    ) -> Result<(), ApplicationError> {
        let config: RuntimeConfig = config.into();
        colored::control::set_override(config.color);
        debug!("Runtime config: {:?}", config);

        match config.command {
            Command::Show {
                path,
                recursive: false,
            } => {
                let node = Self::open(&path)?;
                writeln!(out, "{}", node_summary(&node)).context(OutputSnafu)?;
                if node.is_directory() {
                    let listing = node_listing(&node).context(OpenSnafu { path: &path })?;
                    for line in listing {
                        writeln!(out, "{}", line).context(OutputSnafu)?;
                    }
                }
            }
            Command::Show {
                path,
                recursive: true,
            } => {
                let tree = PathTree::open(&path).context(OpenSnafu { path: &path })?;
                for failure in tree.failures() {
                    warn!("Skipped {}: {}", failure.path.display(), failure.error);
                }
                write!(out, "{}", tree).context(OutputSnafu)?;
                writeln!(
                    out,
                    "{} nodes, {} bytes, {} skipped",
                    tree.len(),
                    tree.total_size(),
                    tree.failures().len()
                )
                .context(OutputSnafu)?;
            }
            Command::Navigate { path, segments } => {
                let mut node = Self::open(&path)?;
                for segment in &segments {
                    node.navigate(segment).context(NavigateSnafu { segment })?;
                    debug!("Now at {}", node.full_path().display());
                }
                writeln!(out, "{}", node.full_path().display()).context(OutputSnafu)?;
                writeln!(out, "{}", node_summary(&node)).context(OutputSnafu)?;
            }
            Command::Mkfile { directory, name } => {
                let mut node = Self::open(&directory)?;
                let created = node.create_file(&name).context(MutationSnafu {
                    action: "create file",
                    name: &name,
                })?;
                writeln!(out, "Created {}", created.display()).context(OutputSnafu)?;
            }
            Command::Mkdir { directory, name } => {
                let mut node = Self::open(&directory)?;
                let created = node.create_directory(&name).context(MutationSnafu {
                    action: "create directory",
                    name: &name,
                })?;
                writeln!(out, "Created {}", created.display()).context(OutputSnafu)?;
            }
            Command::Rm {
                directory,
                name,
                recursive,
            } => {
                let mode = if recursive {
                    RemoveMode::Recursive
                } else {
                    RemoveMode::Single
                };
                let mut node = Self::open(&directory)?;
                node.remove(&name, mode).context(MutationSnafu {
                    action: "remove",
                    name: &name,
                })?;
                writeln!(out, "Removed {}", directory.join(&name).display()).context(OutputSnafu)?;
            }
        }

        Ok(())
    }

    fn open(path: &Path) -> Result<PathNode, ApplicationError> {
        PathNode::open(path).context(OpenSnafu { path })
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Failed to open {}", path.best_effort_path_display()))]
    OpenError { path: PathBuf, source: PathError },
    #[snafu(display("Failed to navigate to '{}'", segment))]
    NavigateError { segment: String, source: PathError },
    #[snafu(display("Failed to {} '{}'", action, name))]
    MutationError {
        action: &'static str,
        name: String,
        source: PathError,
    },
    #[snafu(display("Failed to write output"))]
    OutputError { source: io::Error },
}
