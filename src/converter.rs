//! The conversion pipeline.
//!
//! A [`Converter`] wires the stages together:
//!
//! ```text
//! reader -> Lexer --(bounded channel)--> Validator -> records -> Serializer -> Document
//! ```
//!
//! The lexer runs on a scoped thread and the validator consumes on the
//! calling thread. The channel is bounded, so the lexer blocks while the
//! validator lags behind; when the lexer returns, its sender is dropped and the
//! validator sees the end of the stream once the channel is drained.

use crate::diagnostics::Context;
use crate::{
    ser, ConvertOptions, DiagnosticHandle, DiagnosticSink, Document, Error, Lexer,
    ResolvedShape, Result, Schema, Serializer, Validator,
};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::sync::mpsc;
use std::thread;

/// The result of one conversion run.
#[derive(Debug, Clone)]
pub struct Conversion {
    document: Document,
    records: usize,
    chars: usize,
    input_error: Option<Error>,
}

impl Conversion {
    /// The accepted objects.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    #[must_use]
    pub fn into_document(self) -> Document {
        self.document
    }

    /// Number of records whose root tag closed, before name checks.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.records
    }

    /// Characters consumed from the input.
    #[must_use]
    pub fn chars_read(&self) -> usize {
        self.chars
    }

    /// The I/O failure that cut the input short, if any.
    #[must_use]
    pub fn input_error(&self) -> Option<&Error> {
        self.input_error.as_ref()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.document.is_empty()
    }
}

/// What [`Converter::write`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written { objects: usize },
    NothingToWrite,
}

/// Runs conversions against one schema and collects their diagnostics.
#[derive(Debug)]
pub struct Converter {
    schema: Schema,
    shape: ResolvedShape,
    options: ConvertOptions,
    sink: DiagnosticSink,
    lexer_diagnostics: DiagnosticHandle,
    diagnostics: DiagnosticHandle,
}

impl Converter {
    /// Binds `options.shape` to `schema`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidShape`] if the shape does not fit the schema.
    pub fn new(schema: Schema, options: ConvertOptions) -> Result<Self> {
        let shape = options.shape.resolve(&schema)?;
        let mut sink = DiagnosticSink::new();
        let lexer_diagnostics = sink.add_stream();
        let diagnostics = sink.add_stream();
        Ok(Converter {
            schema,
            shape,
            options,
            sink,
            lexer_diagnostics,
            diagnostics,
        })
    }

    /// A converter for the bundled schema with default options.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the bundled schema and shape match.
    pub fn bundled() -> Result<Self> {
        Converter::new(Schema::bundled()?, ConvertOptions::default())
    }

    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    #[must_use]
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Diagnostics from every run so far: lexer stream first, then the rest.
    #[must_use]
    pub fn diagnostics(&self) -> &DiagnosticSink {
        &self.sink
    }

    /// Lexes and validates `reader` concurrently, then collects the document.
    pub fn convert<R: BufRead + Send>(&self, reader: R) -> Conversion {
        let capacity = self.options.channel_capacity.max(1);
        let (sender, receiver) = mpsc::sync_channel(capacity);

        let (records, chars, lexed) = thread::scope(|scope| {
            let lexer_diagnostics = self.lexer_diagnostics.clone();
            let schema = &self.schema;
            let producer = scope.spawn(move || {
                let mut lexer = Lexer::new(reader, schema, lexer_diagnostics);
                let lexed = lexer.run(sender);
                (lexer.chars_read(), lexed)
            });

            let validator = Validator::new(&self.schema, self.diagnostics.clone());
            let records = validator.run(receiver);
            match producer.join() {
                Ok((chars, lexed)) => (records, chars, lexed),
                Err(panic) => std::panic::resume_unwind(panic),
            }
        });

        let document = Serializer::new(self.shape, &self.diagnostics).collect(&records);
        tracing::info!(
            chars,
            records = records.len(),
            objects = document.len(),
            "conversion finished"
        );
        Conversion {
            document,
            records: records.len(),
            chars,
            input_error: lexed.err(),
        }
    }

    /// Converts an in-memory string.
    pub fn convert_str(&self, input: &str) -> Conversion {
        self.convert(input.as_bytes())
    }

    /// Converts the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InputNotFound`] or [`Error::InputUnreadable`] if the
    /// file cannot be opened. Both are also recorded as diagnostics. A read
    /// failure after opening does not fail the call; see
    /// [`Conversion::input_error`].
    pub fn convert_file(&self, path: impl AsRef<Path>) -> Result<Conversion> {
        let path = path.as_ref();
        let shown = path.display().to_string();
        if !path.is_file() {
            self.diagnostics
                .report(Context::Run, "Could not find file", Some(&shown));
            return Err(Error::input_not_found(path));
        }
        let file = File::open(path).map_err(|e| {
            self.diagnostics
                .report(Context::Run, "Unable to open file", Some(&shown));
            Error::input_unreadable(path, e)
        })?;
        let conversion = self.convert(BufReader::new(file));
        Ok(match conversion.input_error {
            Some(Error::Io(msg)) => Conversion {
                input_error: Some(Error::input_unreadable(path, msg)),
                ..conversion
            },
            _ => conversion,
        })
    }

    /// Renders a conversion as JSON text.
    #[must_use]
    pub fn to_json(&self, conversion: &Conversion) -> String {
        ser::to_string(conversion.document(), &self.options)
    }

    /// Overwrites `path` with the conversion's JSON.
    ///
    /// An empty document is not written; a diagnostic is recorded instead.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutputUnwritable`] if the file cannot be created or
    /// written; a diagnostic is recorded too.
    pub fn write(&self, conversion: &Conversion, path: impl AsRef<Path>) -> Result<WriteOutcome> {
        let path = path.as_ref();
        let shown = path.display().to_string();
        if conversion.is_empty() {
            self.diagnostics
                .report(Context::Run, "Nothing to write to file", Some(&shown));
            return Ok(WriteOutcome::NothingToWrite);
        }

        let written = File::create(path).and_then(|file| {
            let mut writer = BufWriter::new(file);
            ser::to_writer(&mut writer, conversion.document(), &self.options)?;
            writer.flush()
        });
        if let Err(e) = written {
            self.diagnostics
                .report(Context::Run, "Unable to create file", Some(&shown));
            return Err(Error::output_unwritable(path, e));
        }

        let objects = conversion.document().len();
        tracing::info!(path = %shown, objects, "output written");
        Ok(WriteOutcome::Written { objects })
    }
}
