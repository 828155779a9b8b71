//! `LogSink<W>` — bridges `TransitionObserver` to any `io::Write`.

use std::io::{self, Stdout, Write};

use dp_core::{AgentId, AgentState};
use dp_protocol::TransitionObserver;
use tracing::warn;

use crate::{OutputError, OutputResult, format_line};

/// A [`TransitionObserver`] that writes one contract line per transition.
///
/// The table calls observers under its lock, so lines come out in the order
/// the transitions happened.  Write errors are stored internally because
/// observer callbacks have no return value; check them with
/// [`take_error`][Self::take_error] once the run is over.
pub struct LogSink<W: Write + Send> {
    writer:     W,
    lines:      u64,
    last_error: Option<OutputError>,
}

impl LogSink<Stdout> {
    /// Log to standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> LogSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, lines: 0, last_error: None }
    }

    /// Lines written successfully so far.
    pub fn lines(&self) -> u64 {
        self.lines
    }

    /// Take the stored write error (if any).
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Flush the writer.
    pub fn finish(&mut self) -> OutputResult<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Flush and unwrap the inner writer.
    pub fn into_inner(mut self) -> OutputResult<W> {
        self.finish()?;
        Ok(self.writer)
    }
}

impl<W: Write + Send> TransitionObserver for LogSink<W> {
    fn on_transition(&mut self, id: AgentId, state: AgentState) {
        match writeln!(self.writer, "{}", format_line(id, state)) {
            Ok(()) => self.lines += 1,
            Err(e) => {
                // Keep only the first error.
                if self.last_error.is_none() {
                    warn!(error = %e, "transition log write failed");
                    self.last_error = Some(e.into());
                }
            }
        }
    }
}
