//! Metadata output in JSON and JSON Lines.
//!
//! JSON writes the whole [`ProcessingMetadata`] document. JSON Lines writes a
//! summary line followed by one line per applied record, which suits log
//! shippers that want one event per line.

use serde::Serialize;
use std::io::{self, Write};

use crate::error::DirectiveError;
use crate::types::{ImageSize, ProcessingMetadata};

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Single JSON document
    #[default]
    Json,
    /// One JSON object per line (newline-delimited JSON)
    JsonLines,
}

impl OutputFormat {
    /// Parse format from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "jsonl" | "jsonlines" | "ndjson" => Some(Self::JsonLines),
            _ => None,
        }
    }
}

/// First line of a JSON Lines metadata stream.
#[derive(Serialize)]
struct Summary<'a> {
    original_image_size: &'a ImageSize,
    input_region_count: usize,
    applied_count: usize,
    skipped: Vec<String>,
}

/// Writes run metadata to any `Write` sink.
pub struct OutputWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    pretty: bool,
}

impl<W: Write> OutputWriter<W> {
    /// Create a new output writer. `pretty` only affects JSON output.
    pub fn new(writer: W, format: OutputFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
        }
    }

    /// Write a single item on its own.
    pub fn write<T: Serialize>(&mut self, item: &T) -> io::Result<()> {
        if self.pretty && self.format == OutputFormat::Json {
            serde_json::to_writer_pretty(&mut self.writer, item).map_err(io::Error::other)?;
        } else {
            serde_json::to_writer(&mut self.writer, item).map_err(io::Error::other)?;
        }
        writeln!(self.writer)
    }

    /// Write the audit record of one run.
    ///
    /// `skipped` only appears in the JSON Lines summary; the JSON document
    /// keeps exactly the metadata shape.
    pub fn write_metadata(
        &mut self,
        metadata: &ProcessingMetadata,
        skipped: &[DirectiveError],
    ) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => self.write(metadata),
            OutputFormat::JsonLines => {
                self.write(&Summary {
                    original_image_size: &metadata.original_size,
                    input_region_count: metadata.input_region_count,
                    applied_count: metadata.applied.len(),
                    skipped: skipped.iter().map(ToString::to_string).collect(),
                })?;
                for record in &metadata.applied {
                    self.write(record)?;
                }
                Ok(())
            }
        }
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
