use std::future::Future;
use std::io::Write;

use crate::domain::DomainError;
use crate::infrastructure::AskAgent;

pub const USAGE: &str = "Usage: ask-core.py [question|--reindex]";
pub const REINDEX_FLAG: &str = "--reindex";
pub const RELOADED: &str = "Index reloaded!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Usage,
    Reindex,
    Ask(String),
}

impl Command {
    /// Parses the arguments after the program name. Only the first argument is
    /// checked for `--reindex`; anything else is joined into one question.
    pub fn parse<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        match args.first().map(String::as_str) {
            None => Self::Usage,
            Some(REINDEX_FLAG) => Self::Reindex,
            Some(_) => Self::Ask(args.join(" ")),
        }
    }
}

/// Runs `command`, writing its output to `out`.
///
/// `connect` is only called when the command needs an agent. Building the
/// agent already indexes the directory, so `--reindex` costs one load.
pub async fn run<F, Fut, W>(command: Command, connect: F, out: &mut W) -> anyhow::Result<()>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<AskAgent, DomainError>>,
    W: Write,
{
    match command {
        Command::Usage => writeln!(out, "{USAGE}")?,
        Command::Reindex => {
            let agent = connect().await?;
            tracing::info!(
                dir = %agent.config().docs_dir,
                documents = agent.index().document_count(),
                "reindexed"
            );
            writeln!(out, "{RELOADED}")?;
        }
        Command::Ask(question) => {
            let agent = connect().await?;
            let answer = agent.query(&question).await?;
            writeln!(out, "{answer}")?;
        }
    }
    Ok(())
}
