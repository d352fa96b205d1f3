use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::watch;
use tracing::debug;

use crate::api::BalanceStore;
use crate::directory::ClientDirectory;
use crate::report::default_file_name;
use crate::shell::{BalanceDraft, FetchOutcome, Session, SessionError, render_connection, render_listing, render_statement};
use crate::storage::Storage;
use crate::types::{ClientId, format_currency, today};

const HELP: &str = "\
Commands:
  search [TEXT]                         list clients matching TEXT
  select <CLIENT_ID>                    choose the client to work with
  fetch                                 load movements for the selected client
  balance <DIGITS> [-n] [YYYY-MM-DD]    set the initial balance (cents, -n for negative)
  retry                                 resubmit the last initial balance that failed
  delete                                remove the initial balance
  export [PATH]                         write the movements to .xlsx or .csv
  quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Search(String),
    Select(ClientId),
    Fetch,
    SaveBalance(BalanceDraft),
    RetryBalance,
    DeleteBalance,
    Export(Option<PathBuf>),
    Quit,
    Nothing,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, String> {
        let mut tokens = line.split_whitespace();

        let Some(name) = tokens.next() else {
            return Ok(Command::Nothing)
        };

        let arguments: Vec<&str> = tokens.collect();

        match name.to_lowercase().as_str() {
            "help" | "?" => Ok(Command::Help),
            "search" | "clients" => Ok(Command::Search(arguments.join(" "))),
            "select" => match arguments.as_slice() {
                [id] => id.parse().map(Command::Select).map_err(|_| format!("Invalid client id [{id}]")),
                _ => Err("Usage: select <CLIENT_ID>".to_string()),
            },
            "fetch" => Ok(Command::Fetch),
            "balance" => parse_balance(&arguments).map(Command::SaveBalance),
            "retry" => Ok(Command::RetryBalance),
            "delete" => Ok(Command::DeleteBalance),
            "export" => match arguments.as_slice() {
                [] => Ok(Command::Export(None)),
                [path] => Ok(Command::Export(Some(PathBuf::from(path)))),
                _ => Err("Usage: export [PATH]".to_string()),
            },
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(format!("Unknown command [{other}], type 'help' for a list")),
        }
    }
}

fn parse_balance(arguments: &[&str]) -> Result<BalanceDraft, String> {
    let negative = arguments.iter().any(|argument| matches!(*argument, "-n" | "--negative"));
    let values: Vec<&str> = arguments.iter()
        .copied()
        .filter(|argument| !matches!(*argument, "-n" | "--negative"))
        .collect();

    match values.as_slice() {
        [amount] => Ok(BalanceDraft { amount_text: amount.to_string(), negative, date: None }),
        [amount, date] => Ok(BalanceDraft { amount_text: amount.to_string(), negative, date: Some(date.to_string()) }),
        _ => Err("Usage: balance <DIGITS> [-n] [YYYY-MM-DD]".to_string()),
    }
}

/// Line-driven operator session.
pub struct Shell<S: Storage, B: BalanceStore> {
    session: Session<S, B>,
    directory: Arc<ClientDirectory<S>>,
    connectivity: watch::Receiver<bool>,
}

impl<S: Storage, B: BalanceStore> Shell<S, B> {
    pub fn new(session: Session<S, B>, directory: Arc<ClientDirectory<S>>, connectivity: watch::Receiver<bool>) -> Self {
        Self { session, directory, connectivity }
    }

    #[cfg(test)]
    pub fn session(&self) -> &Session<S, B> {
        &self.session
    }

    pub async fn run<R, W>(&mut self, input: R, output: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut lines = input.lines();

        writeln!(output, "Type 'help' for a list of commands.")?;
        self.prompt(output)?;

        while let Some(line) = lines.next_line().await? {
            match Command::parse(&line) {
                Ok(Command::Quit) => break,
                Ok(command) => self.execute(command, output).await?,
                Err(message) => writeln!(output, "{message}")?,
            }

            self.prompt(output)?;
        }

        Ok(())
    }

    fn prompt<W: Write>(&self, output: &mut W) -> Result<()> {
        let connected = *self.connectivity.borrow();

        if let Some(banner) = render_connection(connected, self.session.statement()) {
            writeln!(output, "{banner}")?;
        }

        match self.session.selected() {
            Some(client_id) => write!(output, "[{client_id}]> ")?,
            None => write!(output, "> ")?,
        }

        output.flush()?;

        Ok(())
    }

    pub async fn execute<W: Write>(&mut self, command: Command, output: &mut W) -> Result<()> {
        debug!("Executing {command:?}");

        match command {
            Command::Help => writeln!(output, "{HELP}")?,
            Command::Search(query) => match self.directory.listing().await {
                Ok(listing) => write!(output, "{}", render_listing(&listing, &query))?,
                Err(error) => writeln!(output, "{}", error.user_message())?,
            },
            Command::Select(client_id) => self.select(client_id, output).await?,
            Command::Fetch => self.fetch(output).await?,
            Command::SaveBalance(draft) => self.save_balance(draft, output).await?,
            Command::RetryBalance => match self.session.pending_balance().cloned() {
                Some(draft) => self.save_balance(draft, output).await?,
                None => writeln!(output, "There is no pending initial balance to retry.")?,
            },
            Command::DeleteBalance => match self.session.delete_balance().await {
                Ok(()) => {
                    writeln!(output, "Initial balance deleted.")?;
                    self.fetch(output).await?;
                }
                Err(error) => writeln!(output, "{}", error.user_message())?,
            },
            Command::Export(path) => self.export(path, output)?,
            Command::Quit | Command::Nothing => {}
        }

        Ok(())
    }

    async fn select<W: Write>(&mut self, client_id: ClientId, output: &mut W) -> Result<()> {
        // Without a listing the id cannot be checked, so it is taken as typed.
        if let Ok(listing) = self.directory.listing().await {
            match listing.find(client_id) {
                Some(entry) => writeln!(output, "{}", entry.label)?,
                None => {
                    writeln!(output, "{}", SessionError::NoClientSelected.user_message())?;
                    return Ok(())
                }
            }
        }

        if let Err(error) = self.session.select(client_id) {
            writeln!(output, "{}", error.user_message())?;
        }

        Ok(())
    }

    async fn fetch<W: Write>(&mut self, output: &mut W) -> Result<()> {
        match self.session.fetch().await {
            Ok(FetchOutcome::Updated) => {
                if let Some(statement) = self.session.statement() {
                    write!(output, "{}", render_statement(statement, today()))?;
                }
            }
            Ok(FetchOutcome::Discarded) => {}
            Err(error) => writeln!(output, "{}", error.user_message())?,
        }

        Ok(())
    }

    async fn save_balance<W: Write>(&mut self, draft: BalanceDraft, output: &mut W) -> Result<()> {
        match self.session.save_balance(draft).await {
            Ok(balance) => {
                writeln!(output, "Initial balance saved: {} ({})", format_currency(balance.amount), balance.date)?;
                self.fetch(output).await?;
            }
            Err(error) => {
                writeln!(output, "{}", error.user_message())?;
                if self.session.pending_balance().is_some() {
                    writeln!(output, "Your entry was kept, type 'retry' to submit it again.")?;
                }
            }
        }

        Ok(())
    }

    fn export<W: Write>(&self, path: Option<PathBuf>, output: &mut W) -> Result<()> {
        let path = match (path, self.session.selected()) {
            (Some(path), _) => path,
            (None, Some(client_id)) => PathBuf::from(default_file_name(client_id)),
            (None, None) => {
                writeln!(output, "{}", SessionError::NoClientSelected.user_message())?;
                return Ok(())
            }
        };

        match self.session.export(&path) {
            Ok(written) => writeln!(output, "Exported to {}", written.display())?,
            Err(error) => writeln!(output, "{}", error.user_message())?,
        }

        Ok(())
    }
}
