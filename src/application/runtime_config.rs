use supports_color::Stream;

use crate::cli::{Cli, Command};

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub command: Command,
    /// Colour the output; only when stdout can show it.
    pub color: bool,
}

impl From<Cli> for RuntimeConfig {
    fn from(cli: Cli) -> Self {
        Self {
            command: cli.command,
            color: supports_color::on(Stream::Stdout).is_some(),
        }
    }
}
