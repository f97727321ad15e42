//! Line-oriented terminal front end.
//!
//! Reads one command per line and writes the affected panel after each one.
//! Commands that change the query wait for the new fetch to settle before
//! printing the study table.

use std::fmt::Write as _;
use std::str::FromStr;

use serde_json::json;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::catalog::TermCatalog;
use crate::formatters;
use crate::models::SortKey;
use crate::pipeline::QueryPipeline;

/// Help text listing every command.
pub const HELP: &str = "\
Terms:   terms | search <text> | clear | tnext | tprev | tfirst | tlast | pick <n>
Query:   query [text] | add <text> | show
Studies: sort <year|journal|title|authors> | next | prev | first | last | page <n>
Other:   help | quit";

/// How panels are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables
    #[default]
    Text,
    /// One JSON object per response
    Json,
}

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show the current term page.
    Terms,
    /// Filter terms.
    Search(String),
    /// Clear the term filter.
    Clear,
    /// Term page navigation.
    TermsNext,
    /// Term page navigation.
    TermsPrevious,
    /// Term page navigation.
    TermsFirst,
    /// Term page navigation.
    TermsLast,
    /// Append the n-th (1-based) term of the current page to the query.
    Pick(usize),
    /// Replace the query; empty clears it.
    Query(String),
    /// Append free text to the query.
    Add(String),
    /// Show the study panel.
    Show,
    /// Click a column header.
    Sort(SortKey),
    /// Study page navigation.
    Next,
    /// Study page navigation.
    Previous,
    /// Study page navigation.
    First,
    /// Study page navigation.
    Last,
    /// Jump to a study page.
    Page(usize),
    /// Print the command list.
    Help,
    /// Leave.
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        let number = |what: &str| {
            rest.parse::<usize>().map_err(|_| format!("'{word}' expects a {what} number"))
        };
        let text = || {
            if rest.is_empty() {
                Err(format!("'{word}' expects some text"))
            } else {
                Ok(rest.to_string())
            }
        };

        match word.to_lowercase().as_str() {
            "terms" => Ok(Self::Terms),
            "search" => Ok(Self::Search(rest.to_string())),
            "clear" => Ok(Self::Clear),
            "tnext" => Ok(Self::TermsNext),
            "tprev" => Ok(Self::TermsPrevious),
            "tfirst" => Ok(Self::TermsFirst),
            "tlast" => Ok(Self::TermsLast),
            "pick" => number("term").map(Self::Pick),
            "query" => Ok(Self::Query(rest.to_string())),
            "add" => text().map(Self::Add),
            "show" => Ok(Self::Show),
            "sort" => rest.parse().map(Self::Sort),
            "next" => Ok(Self::Next),
            "prev" | "previous" => Ok(Self::Previous),
            "first" => Ok(Self::First),
            "last" => Ok(Self::Last),
            "page" => number("page").map(Self::Page),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(format!("unknown command '{other}', try 'help'")),
        }
    }
}

/// Result of one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Text to print.
    Output(String),
    /// Stop reading input.
    Quit,
}

/// Term catalog plus query pipeline driven by commands.
#[derive(Debug)]
pub struct Session {
    catalog: TermCatalog,
    pipeline: QueryPipeline,
    format: OutputFormat,
}

impl Session {
    /// Wire the catalog's picks into the pipeline's query.
    #[must_use]
    pub fn new(mut catalog: TermCatalog, pipeline: QueryPipeline, format: OutputFormat) -> Self {
        catalog.on_pick(pipeline.pick_handler());
        Self { catalog, pipeline, format }
    }

    /// The term catalog.
    #[must_use]
    pub const fn catalog(&self) -> &TermCatalog {
        &self.catalog
    }

    /// The query pipeline.
    #[must_use]
    pub const fn pipeline(&self) -> &QueryPipeline {
        &self.pipeline
    }

    /// Run one command.
    pub async fn execute(&mut self, command: Command) -> Reply {
        let panel = command_panel(&command);
        match command {
            Command::Terms => {}
            Command::Search(text) => self.catalog.set_search(text),
            Command::Clear => self.catalog.clear_search(),
            Command::TermsNext => self.catalog.next_page(),
            Command::TermsPrevious => self.catalog.previous_page(),
            Command::TermsFirst => self.catalog.first_page(),
            Command::TermsLast => self.catalog.last_page(),
            Command::Pick(n) => {
                if n == 0 || self.catalog.select(n - 1).is_none() {
                    return Reply::Output(format!("No term {n} on this page"));
                }
                return Reply::Output(self.settled_studies().await);
            }
            Command::Query(text) => {
                self.pipeline.query().set(text);
                return Reply::Output(self.settled_studies().await);
            }
            Command::Add(text) => {
                self.pipeline.query().append(&text);
                return Reply::Output(self.settled_studies().await);
            }
            Command::Show => return Reply::Output(self.settled_studies().await),
            Command::Sort(key) => {
                self.pipeline.studies().sort_by(key);
                return Reply::Output(self.render_studies());
            }
            Command::Next => self.pipeline.studies().next_page(),
            Command::Previous => self.pipeline.studies().previous_page(),
            Command::First => self.pipeline.studies().first_page(),
            Command::Last => self.pipeline.studies().last_page(),
            Command::Page(n) => self.pipeline.studies().go_to_page(n),
            Command::Help => return Reply::Output(HELP.to_string()),
            Command::Quit => return Reply::Quit,
        }

        match panel {
            Panel::Terms => Reply::Output(self.render_terms()),
            Panel::Studies => Reply::Output(self.render_studies()),
        }
    }

    async fn settled_studies(&self) -> String {
        self.pipeline.studies().wait_settled().await;
        self.render_studies()
    }

    /// Term panel in the session's format.
    #[must_use]
    pub fn render_terms(&self) -> String {
        let render = self.catalog.render_state();
        match self.format {
            OutputFormat::Text => {
                let mut output = String::new();
                if !self.catalog.search().trim().is_empty() {
                    let _ = writeln!(output, "Search: {}", self.catalog.search().trim());
                }
                output.push_str(&formatters::format_terms(&render));
                output
            }
            OutputFormat::Json => {
                let mut value = formatters::terms_json(&render);
                value["search"] = json!(self.catalog.search());
                value.to_string()
            }
        }
    }

    /// Study panel in the session's format.
    #[must_use]
    pub fn render_studies(&self) -> String {
        let studies = self.pipeline.studies();
        let query = self.pipeline.query().get();
        let render = studies.render_state();
        let order = studies.sort_order();

        match self.format {
            OutputFormat::Text => {
                if query.is_empty() {
                    return "Query is empty. Pick a term or type 'query <text>'.".to_string();
                }
                let mut output = format!("Query: {query}\n");
                let summary = self.pipeline.summary();
                if studies.is_loading() {
                    output.push('\n');
                } else {
                    let _ = writeln!(output, "{summary}\n");
                }
                output.push_str(&formatters::format_studies(&render, order));
                output
            }
            OutputFormat::Json => {
                let mut value = formatters::studies_json(&render, order);
                value["query"] = json!(query);
                value["summary"] = json!(self.pipeline.summary());
                value.to_string()
            }
        }
    }
}

enum Panel {
    Terms,
    Studies,
}

const fn command_panel(command: &Command) -> Panel {
    match command {
        Command::Terms
        | Command::Search(_)
        | Command::Clear
        | Command::TermsNext
        | Command::TermsPrevious
        | Command::TermsFirst
        | Command::TermsLast => Panel::Terms,
        _ => Panel::Studies,
    }
}

/// Read commands from `reader` until EOF or `quit`, writing replies to `writer`.
pub async fn run<R, W>(mut session: Session, reader: R, mut writer: W) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();

    tracing::info!("Ready, waiting for commands...");

    while let Some(line) = lines.next_line().await? {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let output = match trimmed.parse::<Command>() {
            Ok(command) => {
                tracing::debug!(?command, "Received command");
                match session.execute(command).await {
                    Reply::Output(output) => output,
                    Reply::Quit => break,
                }
            }
            Err(message) => message,
        };

        writer.write_all(output.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }

    tracing::info!("Input closed, shutting down");
    Ok(())
}
