//! Character-level lexing of the markup dialect.
//!
//! The [`Lexer`] reads its source one character at a time and yields
//! [`Token`]s. It performs the first validation pass: tags must be known to
//! the schema, and text is only forwarded right after the open tag of a leaf,
//! provided it contains no illegal or non-printable characters. Problems are
//! reported through a [`DiagnosticHandle`] and the offending token is dropped;
//! lexing only stops at end of input or on an I/O failure.
//!
//! ## Usage
//!
//! ```rust
//! use tagson::{DiagnosticHandle, Lexer, Schema, Token};
//!
//! let schema = Schema::bundled().unwrap();
//! let diagnostics = DiagnosticHandle::new();
//! let mut lexer = Lexer::new("<obj_name>A</obj_name>".as_bytes(), &schema, diagnostics);
//!
//! let tokens = lexer.tokenize().unwrap();
//! assert_eq!(tokens[1], Token::Value("A".to_string()));
//! ```

use crate::diagnostics::{is_printable, Context};
use crate::{DiagnosticHandle, Error, Result, Schema, Token};
use std::io::{self, BufRead};
use std::sync::mpsc::SyncSender;

const ILLEGAL_CHARACTERS: [char; 5] = ['<', '>', '"', '\'', '&'];

/// Decodes UTF-8 from a buffered reader one scalar at a time.
///
/// Bytes are pulled with `fill_buf`/`consume`, so at most one buffer of input
/// is held ahead of the lexer and a multibyte sequence may span refills.
struct CharSource<R> {
    reader: R,
    peeked: Option<char>,
    consumed: usize,
}

/// Length of the sequence introduced by `lead`, or 0 if it cannot start one.
fn sequence_len(lead: u8) -> usize {
    match lead {
        0x00..=0x7F => 1,
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 0,
    }
}

fn invalid_utf8() -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        "stream did not contain valid UTF-8",
    )
}

impl<R: BufRead> CharSource<R> {
    fn new(reader: R) -> Self {
        CharSource {
            reader,
            peeked: None,
            consumed: 0,
        }
    }

    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        let byte = loop {
            match self.reader.fill_buf() {
                Ok(buf) => break buf.first().copied(),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        };
        if byte.is_some() {
            self.reader.consume(1);
        }
        Ok(byte)
    }

    fn decode(&mut self) -> io::Result<Option<char>> {
        let Some(lead) = self.next_byte()? else {
            return Ok(None);
        };
        let len = sequence_len(lead);
        if len == 0 {
            return Err(invalid_utf8());
        }

        let mut bytes = [lead, 0, 0, 0];
        for slot in bytes.iter_mut().take(len).skip(1) {
            match self.next_byte()? {
                Some(byte) if byte & 0xC0 == 0x80 => *slot = byte,
                _ => return Err(invalid_utf8()),
            }
        }
        std::str::from_utf8(&bytes[..len])
            .ok()
            .and_then(|s| s.chars().next())
            .map(Some)
            .ok_or_else(invalid_utf8)
    }

    fn peek_char(&mut self) -> io::Result<Option<char>> {
        if self.peeked.is_none() {
            self.peeked = self.decode()?;
        }
        Ok(self.peeked)
    }

    fn next_char(&mut self) -> io::Result<Option<char>> {
        let ch = match self.peeked.take() {
            Some(ch) => Some(ch),
            None => self.decode()?,
        };
        if ch.is_some() {
            self.consumed += 1;
        }
        Ok(ch)
    }
}

/// Streaming lexer over any buffered reader.
pub struct Lexer<'s, R> {
    source: CharSource<R>,
    schema: &'s Schema,
    diagnostics: DiagnosticHandle,
    expect_value: bool,
}

impl<'s, R: BufRead> Lexer<'s, R> {
    pub fn new(reader: R, schema: &'s Schema, diagnostics: DiagnosticHandle) -> Self {
        Lexer {
            source: CharSource::new(reader),
            schema,
            diagnostics,
            expect_value: false,
        }
    }

    /// Number of characters consumed from the source so far.
    #[must_use]
    pub fn chars_read(&self) -> usize {
        self.source.consumed
    }

    fn error(&self, start: usize, message: &str, text: &str) {
        self.diagnostics
            .report(Context::Char(start), message, Some(text));
    }

    /// Reads the next well-formed token, skipping and reporting bad ones.
    ///
    /// Returns `Ok(None)` at end of input.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the source fails or is not valid UTF-8.
    pub fn next_token(&mut self) -> io::Result<Option<Token>> {
        loop {
            let start = self.source.consumed;
            let Some(ch) = self.source.next_char()? else {
                return Ok(None);
            };

            if ch == '<' {
                self.expect_value = false;
                let mut raw = String::from(ch);
                loop {
                    match self.source.next_char()? {
                        Some(c) => {
                            raw.push(c);
                            if c == '>' {
                                break;
                            }
                        }
                        None => {
                            self.error(start, "Unterminated tag", &raw);
                            return Ok(None);
                        }
                    }
                }

                match self.classify(&raw) {
                    Some(token) => {
                        if let Token::Open(name) = &token {
                            self.expect_value = self.schema.is_leaf_tag(name);
                        }
                        return Ok(Some(token));
                    }
                    None => self.error(start, "Found incorrect tag", &raw),
                }
            } else {
                let mut text = String::from(ch);
                while let Some(c) = self.source.peek_char()? {
                    if c == '<' {
                        break;
                    }
                    text.push(c);
                    self.source.next_char()?;
                }

                if std::mem::take(&mut self.expect_value) {
                    if self.check_value(start, &text) {
                        return Ok(Some(Token::Value(text)));
                    }
                } else if !text.trim().is_empty() {
                    self.error(start, "Found incorrectly placed text", &text);
                }
            }
        }
    }

    fn classify(&self, raw: &str) -> Option<Token> {
        let token = Token::from_tag(raw)?;
        let known = token
            .tag_name()
            .map_or(false, |name| self.schema.is_known_tag(name));
        known.then_some(token)
    }

    fn check_value(&self, start: usize, value: &str) -> bool {
        if value.contains(ILLEGAL_CHARACTERS) {
            self.error(start, "Found illegal characters in value", value);
            false
        } else if !is_printable(value) {
            self.error(start, "Found non-printable characters in value", value);
            false
        } else {
            true
        }
    }

    /// Lexes the whole source into a vector.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the source fails.
    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        while let Some(token) = self
            .next_token()
            .map_err(|e| Error::io(&e.to_string()))?
        {
            tokens.push(token);
        }
        Ok(tokens)
    }

    /// Feeds every token into `sender`, blocking while the channel is full.
    ///
    /// Returns when the source is exhausted, the receiver hangs up, or the
    /// source fails. Dropping `sender` on return is what tells the consumer
    /// the stream is complete.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the source fails; a diagnostic is recorded too.
    pub fn run(&mut self, sender: SyncSender<Token>) -> Result<()> {
        loop {
            match self.next_token() {
                Ok(Some(token)) => {
                    if sender.send(token).is_err() {
                        tracing::warn!("token receiver hung up before end of input");
                        return Ok(());
                    }
                }
                Ok(None) => {
                    tracing::debug!(chars = self.chars_read(), "lexer reached end of input");
                    return Ok(());
                }
                Err(e) => {
                    self.diagnostics.report(
                        Context::Char(self.chars_read()),
                        "Unable to read input",
                        Some(&e.to_string()),
                    );
                    return Err(Error::io(&e.to_string()));
                }
            }
        }
    }
}
