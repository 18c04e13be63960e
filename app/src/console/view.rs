//! Console presentation state.
//!
//! Owned by the presentation loop and mutated only there, either in
//! response to user input or when a run's result is delivered.

use gplay_dispatch::{to_envelope, EnvelopeBody, Outcome, RunId, StatusClass};
use std::fmt;
use std::io::{self, Write};

/// Status line shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Nothing started yet
    Ready,
    /// A run is in flight
    Running,
    /// Last delivered run succeeded
    Finished,
    /// Last delivered run failed
    Error,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Ready => "Ready",
            Self::Running => "Running...",
            Self::Finished => "Finished",
            Self::Error => "Error",
        };
        f.write_str(label)
    }
}

const HELP: &str = "\
Usage: <action> key=value ...

Actions:
  app        appId=<id> [fields=a,b] [lang=] [country=] [assets=SMALL|MEDIUM|LARGE|ORIGINAL]
  search     query=<terms> [fields=a,b] [count=] [lang=] [country=]
  reviews    appId=<id> [fields=a,b] [count=] [lang=] [country=] [sort=NEWEST|RATING|RELEVANT]
  developer  developerId=<id> [fields=a,b] [count=] [lang=] [country=]

Quote values containing spaces: search query=\"productivity apps\"
Other commands: help, quit";

/// Status line, last result and the output streams they render to.
pub struct ConsoleView<O, E> {
    out: O,
    err: E,
    status: Status,
    result: Option<String>,
}

impl<O: Write, E: Write> ConsoleView<O, E> {
    /// Create a view rendering results to `out` and alerts to `err`.
    pub fn new(out: O, err: E) -> Self {
        Self {
            out,
            err,
            status: Status::Ready,
            result: None,
        }
    }

    /// Current status.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Rendered body of the last successful run, if the last delivery
    /// succeeded.
    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    /// Print the greeting and usage.
    pub fn banner(&mut self) -> io::Result<()> {
        writeln!(self.out, "GPlay console v{}", env!("CARGO_PKG_VERSION"))?;
        writeln!(self.out, "Type 'help' for usage.")?;
        self.out.flush()
    }

    /// Print usage.
    pub fn help(&mut self) -> io::Result<()> {
        writeln!(self.out, "{HELP}")?;
        self.out.flush()
    }

    /// Report a line that could not be parsed.
    pub fn input_error(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.err, "error: {message}")?;
        self.err.flush()
    }

    /// A run was started. Clears the previous result.
    pub fn started(&mut self, id: RunId, action: &str) -> io::Result<()> {
        self.status = Status::Running;
        self.result = None;
        writeln!(self.out, "[{id}] {action}: {}", self.status)?;
        self.out.flush()
    }

    /// A run's outcome was delivered.
    pub fn finished(&mut self, id: RunId, outcome: Outcome) -> io::Result<()> {
        let envelope = to_envelope(outcome);

        if envelope.status == StatusClass::Ok {
            let rendered = envelope.body_pretty();
            writeln!(self.out, "{rendered}")?;
            self.result = Some(rendered);
            self.status = Status::Finished;
            writeln!(self.out, "[{id}] {}", self.status)?;
            return self.out.flush();
        }

        self.result = None;
        self.status = Status::Error;
        writeln!(self.out, "[{id}] {}", self.status)?;
        self.out.flush()?;

        writeln!(self.err, "+--- GPlay Scraper ({}) ---", envelope.status)?;
        if let EnvelopeBody::Error { error, details } = &envelope.body {
            writeln!(self.err, "| {error}")?;
            if let Some(details) = details {
                writeln!(self.err, "| details: {details}")?;
            }
        }
        writeln!(self.err, "+---")?;
        self.err.flush()
    }

    /// Prompt for the next line.
    pub fn prompt(&mut self) -> io::Result<()> {
        write!(self.out, "> ")?;
        self.out.flush()
    }

    /// Consume the view, returning its output streams.
    pub fn into_parts(self) -> (O, E) {
        (self.out, self.err)
    }
}
