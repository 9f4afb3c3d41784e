//! Command line interface
//!
//! - `repl` (default): read commands from stdin, one per line
//! - `send`: dispatch a single command and exit

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use jeeves_core::InputSource;

use crate::{loader, repl};

/// Jeeves focus coach
#[derive(Parser, Debug)]
#[command(name = "jeeves")]
#[command(about = "Agent-coordinated focus coach")]
#[command(version)]
pub struct Cli {
    /// Persist the session context to this JSON file
    #[arg(long, global = true)]
    pub session: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive session (default)
    Repl,
    /// Dispatch one command and print the response
    Send {
        /// Command text, e.g. "start timer"
        command: String,
        /// Where the input comes from
        #[arg(long, value_enum, default_value_t = Source::Text)]
        source: Source,
    },
}

/// Input source as accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Source {
    Text,
    Audio,
    Ui,
}

impl From<Source> for InputSource {
    fn from(source: Source) -> Self {
        match source {
            Source::Text => InputSource::Text,
            Source::Audio => InputSource::Audio,
            Source::Ui => InputSource::Ui,
        }
    }
}

/// Run the CLI command
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = loader::load_config()?;
    let session = cli.session.or_else(|| config.session.path.clone());
    let app = repl::App::start(config, session).await?;

    let result = match cli.command {
        Some(Commands::Send { command, source }) => app.send(source.into(), &command).await,
        Some(Commands::Repl) | None => app.repl().await,
    };

    app.shutdown().await;
    result
}
