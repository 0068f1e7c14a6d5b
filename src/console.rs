//! Console output channels
//!
//! The normal channel is always printed. The verbose channel is printed only
//! when verbose output is enabled. Registry log events are routed to one of
//! the two by [`LogCriteria`].

use crate::options::LogCriteria;
use crate::registry::LogEvent;
use colored::Colorize;
use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

type Sink = Mutex<Box<dyn Write + Send>>;

/// User-facing output with a normal and a verbose channel
pub struct Console {
    out: Sink,
    err: Sink,
    verbose: bool,
}

impl Console {
    /// Create a console writing to the given streams
    pub fn new(
        out: impl Write + Send + 'static,
        err: impl Write + Send + 'static,
        verbose: bool,
    ) -> Self {
        Self {
            out: Mutex::new(Box::new(out)),
            err: Mutex::new(Box::new(err)),
            verbose,
        }
    }

    /// Console on the process stdout and stderr
    pub fn stdio(verbose: bool) -> Self {
        Self::new(io::stdout(), io::stderr(), verbose)
    }

    /// Console writing both streams into one in-memory buffer
    pub fn buffered(verbose: bool) -> (Self, MemorySink) {
        let sink = MemorySink::default();
        (Self::new(sink.clone(), sink.clone(), verbose), sink)
    }

    fn print(sink: &Sink, line: &str) {
        let mut writer = sink.lock().unwrap_or_else(PoisonError::into_inner);
        // Nothing sensible to do when the terminal is gone
        let _ = writeln!(writer, "{}", line);
        let _ = writer.flush();
    }

    /// Print a line on the normal channel
    pub fn writeln(&self, line: &str) {
        Self::print(&self.out, line);
    }

    /// Print an error line on the normal channel
    pub fn error(&self, line: &str) {
        Self::print(&self.err, &line.red().to_string());
    }

    /// Print a success line on the normal channel
    pub fn ok(&self, line: &str) {
        Self::print(&self.out, &line.green().to_string());
    }

    /// Print a line on the verbose channel
    pub fn verbose_writeln(&self, line: &str) {
        if self.verbose {
            Self::print(&self.out, &line.dimmed().to_string());
        }
    }

    /// Print an error line on the verbose channel
    pub fn verbose_error(&self, line: &str) {
        if self.verbose {
            Self::print(&self.err, &line.red().to_string());
        }
    }

    /// Print a registry event on the channel chosen by `criteria`
    pub fn registry_event(&self, event: &LogEvent, criteria: &LogCriteria) {
        let line = event.to_string();
        match (criteria.is_normal(event), event.level.is_error()) {
            (true, true) => self.error(&line),
            (true, false) => self.writeln(&line),
            (false, true) => self.verbose_error(&line),
            (false, false) => self.verbose_writeln(&line),
        }
    }
}

impl fmt::Debug for Console {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Console")
            .field("verbose", &self.verbose)
            .finish_non_exhaustive()
    }
}

/// Shared in-memory writer, handy for capturing console output
#[derive(Clone, Default)]
pub struct MemorySink {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl MemorySink {
    /// Everything written so far, lossily decoded
    pub fn contents(&self) -> String {
        let buffer = self.buffer.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

impl Write for MemorySink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
