//! Multi-document loader.
//!
//! A stream is cut on lines consisting solely of `---`. Each non-blank
//! segment is handed to a [`Decoder`]; segments that decode to null are
//! dropped. The first segment that fails to decode aborts the whole load.

use tracing::debug;

use crate::error::{BoxError, DecodeError};
use crate::value::{self, Value};

use super::{Manifest, Resource};

/// The line that separates two documents.
pub const DOCUMENT_SEPARATOR: &str = "---";

/// Decoder turns the text of one document segment into a document tree.
pub trait Decoder {
    fn decode(&self, segment: &str) -> Result<Value, BoxError>;
}

impl<F, E> Decoder for F
where
    F: Fn(&str) -> Result<Value, E>,
    E: Into<BoxError>,
{
    fn decode(&self, segment: &str) -> Result<Value, BoxError> {
        self(segment).map_err(Into::into)
    }
}

/// Decodes YAML segments. Segments holding only comments decode to null.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlDecoder;

impl Decoder for YamlDecoder {
    fn decode(&self, segment: &str) -> Result<Value, BoxError> {
        let comments_only = segment
            .lines()
            .all(|l| l.trim().is_empty() || l.trim_start().starts_with('#'));
        if comments_only {
            return Ok(Value::Null);
        }
        Ok(value::from_yaml(segment)?)
    }
}

/// Decodes JSON segments.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDecoder;

impl Decoder for JsonDecoder {
    fn decode(&self, segment: &str) -> Result<Value, BoxError> {
        Ok(value::from_json(segment)?)
    }
}

/// Segment is the raw text between two separators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    /// 1-based ordinal of the segment in the stream.
    pub position: usize,
    /// 1-based line on which the segment starts.
    pub line: usize,
    pub text: &'a str,
}

impl Segment<'_> {
    /// Returns true if the segment holds nothing but whitespace.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Splits `text` into document segments.
///
/// A separator line may carry trailing whitespace (including `\r`) but no
/// other content. A stream with n separators yields n + 1 segments, some of
/// which may be blank. The exception is a block of `%` directives: the
/// separator that ends it is the document's own start marker, so the
/// directives stay attached to the document that follows.
pub fn split_documents(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut start_line = 1;
    let mut offset = 0;

    for (index, line) in text.split_inclusive('\n').enumerate() {
        let line_end = offset + line.len();
        let is_separator = line.trim_end() == DOCUMENT_SEPARATOR;
        if is_separator && !is_directive_block(&text[start..offset]) {
            segments.push(Segment {
                position: segments.len() + 1,
                line: start_line,
                text: &text[start..offset],
            });
            start = line_end;
            start_line = index + 2;
        }
        offset = line_end;
    }

    segments.push(Segment {
        position: segments.len() + 1,
        line: start_line,
        text: &text[start..],
    });
    segments
}

/// Returns true if `text` holds at least one `%` directive and otherwise
/// only blank or comment lines.
fn is_directive_block(text: &str) -> bool {
    let mut found = false;
    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if !line.starts_with('%') {
            return false;
        }
        found = true;
    }
    found
}

/// Decodes every document in `text`, preserving stream order.
///
/// All or nothing: on the first decode failure no manifest is returned.
pub fn load<D>(text: &str, decoder: &D) -> Result<Manifest, DecodeError>
where
    D: Decoder + ?Sized,
{
    let segments = split_documents(text);
    let mut resources = Vec::with_capacity(segments.len());

    for segment in &segments {
        if segment.is_blank() {
            continue;
        }
        let doc = decoder.decode(segment.text).map_err(|source| DecodeError {
            position: segment.position,
            line: segment.line,
            source,
        })?;
        if doc.is_null() {
            continue;
        }
        resources.push(Resource::new(doc));
    }

    debug!(
        segments = segments.len(),
        resources = resources.len(),
        "decoded manifest"
    );
    Ok(Manifest::from_resources(resources))
}
