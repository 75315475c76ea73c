//! Diagnostics collected while a conversion runs.
//!
//! Every recoverable problem (a stray tag, an illegal value, a duplicate
//! object) becomes a [`Diagnostic`]. Producers hold their own
//! [`DiagnosticHandle`], so the lexer thread and the validator thread append
//! without coordinating with each other. The [`DiagnosticSink`] keeps the
//! handles in registration order and drains them all when flushed.
//!
//! Flushing writes one block per run:
//!
//! ```text
//! 2026-10-16 09:14:03.512731
//! # Errors:
//! Char 57: Found incorrect tag: "<fild>"
//! String 12: Not a proper closing tag to <name>: "</type>"
//! #
//! DONE: 412 characters analyzed in 0.001873 seconds
//! ```

use crate::{Error, Result};
use chrono::{DateTime, Local};
use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Where a diagnostic was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Context {
    /// Character offset into the input, reported by the lexer
    Char(usize),
    /// 1-based index of the token being validated
    Token(usize),
    /// 1-based index of the completed record being serialized
    Object(usize),
    /// Not tied to a position (resource problems)
    Run,
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Context::Char(n) => write!(f, "Char {n}"),
            Context::Token(n) => write!(f, "String {n}"),
            Context::Object(n) => write!(f, "Object {n}"),
            Context::Run => Ok(()),
        }
    }
}

/// One recorded problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub context: Context,
    pub message: String,
    pub offending: Option<String>,
}

impl Diagnostic {
    /// Creates a diagnostic; `offending` is dropped if it is not printable.
    #[must_use]
    pub fn new(context: Context, message: impl Into<String>, offending: Option<&str>) -> Self {
        Diagnostic {
            context,
            message: message.into(),
            offending: offending.filter(|text| is_printable(text)).map(str::to_string),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.context != Context::Run {
            write!(f, "{}: ", self.context)?;
        }
        f.write_str(&self.message)?;
        if let Some(text) = &self.offending {
            write!(f, ": \"{text}\"")?;
        }
        Ok(())
    }
}

/// Format (Cf) and private-use (Co) ranges.
const INVISIBLE: &[(char, char)] = &[
    ('\u{00AD}', '\u{00AD}'),
    ('\u{0600}', '\u{0605}'),
    ('\u{061C}', '\u{061C}'),
    ('\u{06DD}', '\u{06DD}'),
    ('\u{070F}', '\u{070F}'),
    ('\u{0890}', '\u{0891}'),
    ('\u{08E2}', '\u{08E2}'),
    ('\u{180E}', '\u{180E}'),
    ('\u{200B}', '\u{200F}'),
    ('\u{202A}', '\u{202E}'),
    ('\u{2060}', '\u{2064}'),
    ('\u{2066}', '\u{206F}'),
    ('\u{E000}', '\u{F8FF}'),
    ('\u{FEFF}', '\u{FEFF}'),
    ('\u{FFF9}', '\u{FFFB}'),
    ('\u{110BD}', '\u{110BD}'),
    ('\u{110CD}', '\u{110CD}'),
    ('\u{13430}', '\u{1343F}'),
    ('\u{1BCA0}', '\u{1BCA3}'),
    ('\u{1D173}', '\u{1D17A}'),
    ('\u{E0001}', '\u{E0001}'),
    ('\u{E0020}', '\u{E007F}'),
    ('\u{F0000}', '\u{FFFFD}'),
    ('\u{100000}', '\u{10FFFD}'),
];

fn is_invisible(ch: char) -> bool {
    let code = u32::from(ch);
    let noncharacter = code & 0xFFFE == 0xFFFE || (0xFDD0..=0xFDEF).contains(&code);
    noncharacter || INVISIBLE.iter().any(|&(lo, hi)| (lo..=hi).contains(&ch))
}

/// Returns `true` if every character of `text` would render visibly.
///
/// The plain space is printable. Control, format and private-use characters,
/// noncharacters, and every other space or line separator are not.
#[must_use]
pub fn is_printable(text: &str) -> bool {
    text.chars().all(|ch| {
        ch == ' ' || !(ch.is_control() || ch.is_whitespace() || is_invisible(ch))
    })
}

type Stream = Arc<Mutex<Vec<Diagnostic>>>;

fn lock(stream: &Stream) -> MutexGuard<'_, Vec<Diagnostic>> {
    stream.lock().unwrap_or_else(PoisonError::into_inner)
}

/// An append-only handle to one diagnostics stream.
///
/// Handles are cheap to clone and can be moved to other threads.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticHandle {
    stream: Stream,
}

impl DiagnosticHandle {
    /// Creates a detached handle, mostly useful in tests.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, diagnostic: Diagnostic) {
        tracing::debug!(target: "tagson::diagnostics", "{diagnostic}");
        lock(&self.stream).push(diagnostic);
    }

    pub fn report(&self, context: Context, message: impl Into<String>, offending: Option<&str>) {
        self.push(Diagnostic::new(context, message, offending));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.stream).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies the diagnostics recorded so far.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Diagnostic> {
        lock(&self.stream).clone()
    }

    fn drain(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *lock(&self.stream))
    }
}

/// Owns every diagnostics stream of a run.
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    streams: Vec<DiagnosticHandle>,
}

impl DiagnosticSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new stream and returns its handle.
    pub fn add_stream(&mut self) -> DiagnosticHandle {
        let handle = DiagnosticHandle::new();
        self.streams.push(handle.clone());
        handle
    }

    /// Total number of pending diagnostics across all streams.
    #[must_use]
    pub fn len(&self) -> usize {
        self.streams.iter().map(DiagnosticHandle::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies every pending diagnostic, stream by stream.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Diagnostic> {
        self.streams
            .iter()
            .flat_map(DiagnosticHandle::snapshot)
            .collect()
    }

    /// Drains every stream into `writer` as one timestamped block.
    ///
    /// # Errors
    ///
    /// Returns any error raised by `writer`.
    pub fn flush<W: Write>(
        &self,
        writer: &mut W,
        run: &RunContext,
        chars: usize,
    ) -> io::Result<()> {
        writeln!(writer, "{}", Local::now().format("%Y-%m-%d %H:%M:%S%.6f"))?;
        writeln!(writer, "# Errors:")?;
        for stream in &self.streams {
            for diagnostic in stream.drain() {
                writeln!(writer, "{diagnostic}")?;
            }
        }
        writeln!(writer, "#")?;
        writeln!(
            writer,
            "DONE: {chars} characters analyzed in {:.6} seconds",
            run.elapsed_seconds()
        )?;
        writeln!(writer)?;
        writer.flush()
    }

    /// Appends the flushed block to the file at `path`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LogUnwritable`] if the file cannot be opened or written.
    pub fn flush_to_path(
        &self,
        path: impl AsRef<Path>,
        run: &RunContext,
        chars: usize,
    ) -> Result<()> {
        let path = path.as_ref();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| Error::log_unwritable(path, e))?;
        self.flush(&mut file, run, chars)
            .map_err(|e| Error::log_unwritable(path, e))?;
        tracing::info!(
            path = %path.display(),
            started = %run.started().format("%H:%M:%S"),
            "diagnostics flushed"
        );
        Ok(())
    }
}

/// Process-level facts about the current run, created once at startup.
#[derive(Debug, Clone, Copy)]
pub struct RunContext {
    started: DateTime<Local>,
}

impl RunContext {
    /// Marks the start of a run.
    #[must_use]
    pub fn start() -> Self {
        RunContext {
            started: Local::now(),
        }
    }

    #[must_use]
    pub fn started(&self) -> DateTime<Local> {
        self.started
    }

    /// Wall time since [`RunContext::start`], in seconds.
    #[must_use]
    pub fn elapsed_seconds(&self) -> f64 {
        let elapsed = Local::now() - self.started;
        match elapsed.num_microseconds() {
            Some(micros) => micros as f64 / 1_000_000.0,
            None => elapsed.num_seconds() as f64,
        }
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::start()
    }
}
